// file: src/pipeline/indexing.rs
// description: build phase feeding parsed records into a document indexer

use crate::engine::DocumentIndexer;
use crate::error::Result;
use crate::models::DocumentRecord;
use crate::pipeline::progress::ProgressTracker;
use tracing::{debug, info};

/// Hands every record to `indexer`, then finalizes it.
///
/// The first parse or indexing error aborts the phase and the index is left
/// uncommitted.
pub fn index_corpus<I, X>(records: I, indexer: &mut X, progress: &ProgressTracker) -> Result<u64>
where
    I: IntoIterator<Item = Result<DocumentRecord>>,
    X: DocumentIndexer + ?Sized,
{
    let mut indexed = 0u64;

    for record in records {
        let record = record?;
        debug!("Indexing document {}", record.id);
        indexer.index(record)?;
        indexed += 1;
        progress.inc_documents_indexed();
    }

    progress.set_message("Committing index".to_string());
    indexer.finalize()?;
    info!("Indexed {} documents", indexed);

    Ok(indexed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineSettings, RankedRetriever, TantivyIndexer};
    use crate::error::PipelineError;
    use crate::parser::RecordParser;
    use crate::query::escape;
    use std::io::Cursor;

    #[derive(Default)]
    struct CollectingIndexer {
        ids: Vec<String>,
        finalized: bool,
    }

    impl DocumentIndexer for CollectingIndexer {
        fn index(&mut self, document: DocumentRecord) -> Result<()> {
            self.ids.push(document.id);
            Ok(())
        }

        fn finalize(&mut self) -> Result<()> {
            self.finalized = true;
            Ok(())
        }
    }

    fn parser(input: &str) -> RecordParser<Cursor<Vec<u8>>> {
        RecordParser::new(Cursor::new(input.as_bytes().to_vec()), "corpus")
    }

    #[test]
    fn test_every_record_reaches_indexer() {
        let mut indexer = CollectingIndexer::default();
        let progress = ProgressTracker::hidden();

        let records = parser(".I 1\n.W\na\n.I 2\n.W\nb\n.I 3\n");
        let count = index_corpus(records, &mut indexer, &progress).unwrap();

        assert_eq!(count, 3);
        assert_eq!(indexer.ids, vec!["1", "2", "3"]);
        assert!(indexer.finalized);
        assert_eq!(progress.get_stats().documents_indexed, 3);
    }

    #[test]
    fn test_malformed_record_stops_before_finalize() {
        let mut indexer = CollectingIndexer::default();
        let progress = ProgressTracker::hidden();

        let result = index_corpus(parser(".I 1\n.W\na\n.I\n.W\nb\n"), &mut indexer, &progress);

        assert!(matches!(result, Err(PipelineError::MalformedRecord { .. })));
        assert!(!indexer.finalized);
    }

    #[test]
    fn test_indexed_corpus_is_searchable() {
        let mut indexer = TantivyIndexer::in_memory(EngineSettings::default()).unwrap();
        let progress = ProgressTracker::hidden();
        let corpus = "\
.I 1
.T
supersonic inlet
.W
shock waves in inlets
.I 2
.T
heat transfer
.W
laminar heating of plates
";

        index_corpus(parser(corpus), &mut indexer, &progress).unwrap();

        let searcher = indexer.searcher().unwrap();
        let hits = searcher.search(&escape("laminar heat"), 10).unwrap();
        assert_eq!(hits[0].doc_id, "2");
    }
}
