// file: src/parser/mod.rs
// description: collection parsing module exports
// reference: internal module structure

pub mod queries;
pub mod records;
pub mod tags;

pub use queries::QueryBatchReader;
pub use records::{ParserState, RecordParser, Transition};
pub use tags::{LineKind, classify};
