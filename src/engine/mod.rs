// file: src/engine/mod.rs
// description: retrieval engine capabilities used by the pipeline
// reference: build phase / query phase split of the index

//! The pipeline only talks to an engine through two capabilities:
//!
//! - [`DocumentIndexer`] during the build phase (single writer),
//! - [`RankedRetriever`] once the index is finalized (many readers).
//!
//! [`TantivyIndexer`] and [`TantivySearcher`] implement them with BM25
//! ranking; tests substitute in-memory stubs.

pub mod analyzer;
pub mod tantivy_engine;

use crate::error::Result;
use crate::models::{DocumentRecord, RankedHit};
use crate::query::EscapedQuery;

pub use analyzer::{AnalyzerKind, DEFAULT_STOP_WORDS, default_stop_words};
pub use tantivy_engine::{CorpusFields, EngineSettings, TantivyIndexer, TantivySearcher};

pub trait DocumentIndexer {
    /// Adds one record to the index under construction.
    fn index(&mut self, document: DocumentRecord) -> Result<()>;

    /// Commits everything indexed so far. No document may be added afterwards.
    fn finalize(&mut self) -> Result<()>;
}

pub trait RankedRetriever: Send + Sync {
    /// Returns at most `limit` hits, best first.
    fn search(&self, query: &EscapedQuery, limit: usize) -> Result<Vec<RankedHit>>;
}
