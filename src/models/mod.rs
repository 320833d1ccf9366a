// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod query;
pub mod search_result;

pub use document::{DocumentRecord, RecordField};
pub use query::QueryRecord;
pub use search_result::{ITERATION_TOKEN, RUN_TAG, RankedHit, ResultBlock, ScoredResult};
