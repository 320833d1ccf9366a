// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod engine;
pub mod error;
pub mod exporter;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod query;
pub mod utils;

pub use config::{Config, CorpusConfig, EvaluationConfig, IndexConfig};
pub use engine::{
    AnalyzerKind, DocumentIndexer, EngineSettings, RankedRetriever, TantivyIndexer,
    TantivySearcher,
};
pub use error::{PipelineError, Result};
pub use exporter::{CommittedRun, RunManifest, RunWriter, StagedRunFile};
pub use models::{DocumentRecord, QueryRecord, RankedHit, RecordField, ResultBlock, ScoredResult};
pub use parser::{QueryBatchReader, RecordParser};
pub use pipeline::{
    BatchEvaluator, EvaluationSummary, PipelineOrchestrator, PipelineStats, ProgressTracker,
};
pub use query::{EscapedQuery, escape};
pub use utils::{OperationTimer, PerformanceMetrics, Validator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(escape("a+b").as_str(), "a\\+b");
    }
}
