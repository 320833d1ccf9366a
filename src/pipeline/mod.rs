// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

pub mod evaluator;
pub mod indexing;
mod orchestrator;
mod progress;

pub use evaluator::{BatchEvaluator, EvaluationSummary};
pub use indexing::index_corpus;
pub use orchestrator::PipelineOrchestrator;
pub use progress::{PipelineStats, ProgressTracker};
