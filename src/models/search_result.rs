// file: src/models/search_result.rs
// description: ranked hits returned by the retriever and run-file result lines
// reference: trec_eval run format

use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal placed between the query id and the document id.
pub const ITERATION_TOKEN: &str = "Q0";

/// Run identifier closing every run-file line.
pub const RUN_TAG: &str = "STANDARD";

/// One hit as returned by the retriever, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedHit {
    pub doc_id: String,
    pub score: f32,
}

impl RankedHit {
    pub fn new(doc_id: impl Into<String>, score: f32) -> Self {
        Self {
            doc_id: doc_id.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub query_id: u32,
    /// Zero-based position in the result list of the query.
    pub rank: usize,
    pub doc_id: String,
    pub score: f32,
}

impl fmt::Display for ScoredResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.query_id, ITERATION_TOKEN, self.doc_id, self.rank, self.score, RUN_TAG
        )
    }
}

/// Every result of a single query, in engine order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultBlock {
    pub query_id: u32,
    pub results: Vec<ScoredResult>,
}

impl ResultBlock {
    /// Assigns ranks by position; the hits are never reordered.
    pub fn from_hits(query_id: u32, hits: Vec<RankedHit>) -> Self {
        let results = hits
            .into_iter()
            .enumerate()
            .map(|(rank, hit)| ScoredResult {
                query_id,
                rank,
                doc_id: hit.doc_id,
                score: hit.score,
            })
            .collect();

        Self { query_id, results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_line_format() {
        let result = ScoredResult {
            query_id: 3,
            rank: 0,
            doc_id: "DOC0042".to_string(),
            score: 12.875,
        };

        assert_eq!(result.to_string(), "3 Q0 DOC0042 0 12.875 STANDARD");
    }

    #[test]
    fn test_block_keeps_engine_order() {
        let hits = vec![
            RankedHit::new("9", 1.5),
            RankedHit::new("4", 2.5),
            RankedHit::new("9", 0.5),
        ];

        let block = ResultBlock::from_hits(7, hits);

        assert_eq!(block.len(), 3);
        let ranks: Vec<usize> = block.results.iter().map(|r| r.rank).collect();
        let docs: Vec<&str> = block.results.iter().map(|r| r.doc_id.as_str()).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
        assert_eq!(docs, vec!["9", "4", "9"]);
        assert!(block.results.iter().all(|r| r.query_id == 7));
    }

    #[test]
    fn test_empty_block() {
        let block = ResultBlock::from_hits(1, Vec::new());
        assert!(block.is_empty());
    }
}
