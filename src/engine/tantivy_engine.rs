// file: src/engine/tantivy_engine.rs
// description: BM25 indexing and search over the corpus fields using tantivy
// reference: https://docs.rs/tantivy

use crate::engine::analyzer::{AnalyzerKind, default_stop_words, register_analyzers};
use crate::engine::{DocumentIndexer, RankedRetriever};
use crate::error::{PipelineError, Result};
use crate::models::{DocumentRecord, RankedHit};
use crate::query::EscapedQuery;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{
    Field, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing, TextOptions, Value,
};
use tantivy::tokenizer::TokenStream;
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term, doc};
use tracing::{debug, info, warn};

const META_FILE: &str = "meta.json";

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub analyzer: AnalyzerKind,
    pub stop_words: Vec<String>,
    pub writer_memory_bytes: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerKind::default(),
            stop_words: default_stop_words(),
            writer_memory_bytes: 50 * 1_048_576,
        }
    }
}

/// Analysis settings recorded in the commit payload of a built index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedAnalysis {
    pub analyzer: AnalyzerKind,
    pub stop_words: Vec<String>,
}

/// Schema handles for the stored record fields.
#[derive(Debug, Clone, Copy)]
pub struct CorpusFields {
    pub id: Field,
    pub title: Field,
    pub author: Field,
    pub bibliography: Field,
    pub content: Field,
}

impl CorpusFields {
    pub fn build_schema(analyzer: AnalyzerKind) -> (Schema, Self) {
        let text_options = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer(analyzer.tokenizer_name())
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();

        let mut builder = Schema::builder();
        let fields = Self {
            id: builder.add_text_field("id", STRING | STORED),
            title: builder.add_text_field("title", text_options.clone()),
            author: builder.add_text_field("author", text_options.clone()),
            bibliography: builder.add_text_field("bibliography", text_options.clone()),
            content: builder.add_text_field("content", text_options),
        };

        (builder.build(), fields)
    }

    pub fn from_schema(schema: &Schema) -> Result<Self> {
        let field = |name: &str| {
            schema
                .get_field(name)
                .map_err(|e| PipelineError::Index(format!("index schema lacks `{name}`: {e}")))
        };

        Ok(Self {
            id: field("id")?,
            title: field("title")?,
            author: field("author")?,
            bibliography: field("bibliography")?,
            content: field("content")?,
        })
    }

    /// Fields searched by every query.
    pub fn text_fields(&self) -> Vec<Field> {
        vec![self.title, self.author, self.bibliography, self.content]
    }
}

fn index_error(action: &'static str) -> impl FnOnce(tantivy::TantivyError) -> PipelineError {
    move |e| PipelineError::Index(format!("{action}: {e}"))
}

/// Build-phase handle. Owns the only index writer.
pub struct TantivyIndexer {
    index: Index,
    fields: CorpusFields,
    settings: EngineSettings,
    writer: Option<IndexWriter>,
    documents_indexed: u64,
}

impl TantivyIndexer {
    /// Creates a fresh index at `path`, replacing an index already stored there.
    pub fn create(path: &Path, settings: EngineSettings) -> Result<Self> {
        prepare_index_dir(path)?;

        let (schema, fields) = CorpusFields::build_schema(settings.analyzer);
        let index =
            Index::create_in_dir(path, schema).map_err(index_error("failed to create index"))?;

        info!(
            "Created index at {} (analyzer: {})",
            path.display(),
            settings.analyzer
        );
        Self::with_index(index, fields, settings)
    }

    pub fn in_memory(settings: EngineSettings) -> Result<Self> {
        let (schema, fields) = CorpusFields::build_schema(settings.analyzer);
        Self::with_index(Index::create_in_ram(schema), fields, settings)
    }

    fn with_index(index: Index, fields: CorpusFields, settings: EngineSettings) -> Result<Self> {
        register_analyzers(index.tokenizers(), &settings.stop_words);

        // one indexing thread keeps documents in corpus order
        let writer: IndexWriter = index
            .writer_with_num_threads(1, settings.writer_memory_bytes)
            .map_err(index_error("failed to open index writer"))?;

        Ok(Self {
            index,
            fields,
            settings,
            writer: Some(writer),
            documents_indexed: 0,
        })
    }

    pub fn is_finalized(&self) -> bool {
        self.writer.is_none()
    }

    /// Read-only view over the committed index.
    pub fn searcher(&self) -> Result<TantivySearcher> {
        if !self.is_finalized() {
            return Err(PipelineError::Index(
                "index must be finalized before searching".to_string(),
            ));
        }
        TantivySearcher::from_index(self.index.clone(), &self.settings.stop_words)
    }
}

impl DocumentIndexer for TantivyIndexer {
    fn index(&mut self, document: DocumentRecord) -> Result<()> {
        let fields = self.fields;
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| PipelineError::Index("index already finalized".to_string()))?;

        writer
            .add_document(doc!(
                fields.id => document.id,
                fields.title => document.title,
                fields.author => document.author,
                fields.bibliography => document.bibliography,
                fields.content => document.content,
            ))
            .map_err(index_error("failed to add document"))?;

        self.documents_indexed += 1;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };

        let analysis = IndexedAnalysis {
            analyzer: self.settings.analyzer,
            stop_words: self.settings.stop_words.clone(),
        };
        let payload = serde_json::to_string(&analysis)
            .map_err(|e| PipelineError::Serialization(e.to_string()))?;

        let mut prepared = writer
            .prepare_commit()
            .map_err(index_error("commit failed"))?;
        prepared.set_payload(&payload);
        prepared.commit().map_err(index_error("commit failed"))?;
        writer
            .wait_merging_threads()
            .map_err(index_error("segment merge failed"))?;

        info!("Committed {} documents", self.documents_indexed);
        Ok(())
    }
}

fn prepare_index_dir(path: &Path) -> Result<()> {
    if path.join(META_FILE).is_file() {
        info!("Replacing existing index at {}", path.display());
        fs::remove_dir_all(path)?;
    } else if path.is_dir() && fs::read_dir(path)?.next().is_some() {
        return Err(PipelineError::Index(format!(
            "{} is not empty and does not contain an index",
            path.display()
        )));
    }

    fs::create_dir_all(path)?;
    Ok(())
}

/// Query-phase handle over a committed index. Safe to share across threads.
pub struct TantivySearcher {
    index: Index,
    reader: IndexReader,
    fields: CorpusFields,
    stop_words: Vec<String>,
}

impl TantivySearcher {
    /// Opens a committed index with the stop words it was built with.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.join(META_FILE).is_file() {
            return Err(PipelineError::Index(format!(
                "no index found at {}",
                path.display()
            )));
        }

        let index = Index::open_in_dir(path).map_err(index_error("failed to open index"))?;
        let metas = index
            .load_metas()
            .map_err(index_error("failed to read index metadata"))?;

        let recorded = metas
            .payload
            .as_deref()
            .map(serde_json::from_str::<IndexedAnalysis>);
        let stop_words = match recorded {
            Some(Ok(analysis)) => analysis.stop_words,
            Some(Err(e)) => {
                return Err(PipelineError::Index(format!(
                    "unreadable analysis settings in {}: {e}",
                    path.display()
                )));
            }
            None => {
                warn!(
                    "Index at {} records no stop words, using the built-in list",
                    path.display()
                );
                default_stop_words()
            }
        };

        info!("Opened index at {}", path.display());
        Self::from_index(index, &stop_words)
    }

    fn from_index(index: Index, stop_words: &[String]) -> Result<Self> {
        register_analyzers(index.tokenizers(), stop_words);

        let fields = CorpusFields::from_schema(&index.schema())?;
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(index_error("failed to open index reader"))?;

        Ok(Self {
            index,
            reader,
            fields,
            stop_words: stop_words.to_vec(),
        })
    }

    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Stop words the index was built with.
    pub fn stop_words(&self) -> &[String] {
        &self.stop_words
    }

    /// Reads the escaped text literally, analyzes it per field and ORs every
    /// resulting term. `None` when analysis leaves no term.
    fn build_query(&self, query: &EscapedQuery) -> Result<Option<BooleanQuery>> {
        let text = query.literal_text();
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();

        for field in self.fields.text_fields() {
            let mut analyzer = self
                .index
                .tokenizer_for_field(field)
                .map_err(|e| PipelineError::Query(format!("no analyzer for field: {e}")))?;
            let mut stream = analyzer.token_stream(&text);
            while stream.advance() {
                let term = Term::from_field_text(field, &stream.token().text);
                clauses.push((
                    Occur::Should,
                    Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)),
                ));
            }
        }

        if clauses.is_empty() {
            return Ok(None);
        }
        Ok(Some(BooleanQuery::new(clauses)))
    }
}

impl RankedRetriever for TantivySearcher {
    fn search(&self, query: &EscapedQuery, limit: usize) -> Result<Vec<RankedHit>> {
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let Some(parsed) = self.build_query(query)? else {
            debug!("Query `{}` has no searchable terms", query);
            return Ok(Vec::new());
        };

        let searcher = self.reader.searcher();
        let top_docs = searcher
            .search(&parsed, &TopDocs::with_limit(limit))
            .map_err(|e| PipelineError::Query(format!("search failed for `{query}`: {e}")))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let stored: TantivyDocument = searcher
                .doc(address)
                .map_err(|e| PipelineError::Query(format!("cannot load hit: {e}")))?;
            let doc_id = stored
                .get_first(self.fields.id)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            hits.push(RankedHit::new(doc_id, score));
        }

        debug!("Query `{}` returned {} hits", query, hits.len());
        Ok(hits)
    }
}
