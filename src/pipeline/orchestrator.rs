// file: src/pipeline/orchestrator.rs
// description: coordinates the indexing phase and the query batch phase
// reference: orchestrates blocking engine work from the async runtime

use crate::config::Config;
use crate::engine::{TantivyIndexer, TantivySearcher};
use crate::error::{PipelineError, Result};
use crate::exporter::{RunManifest, StagedRunFile, manifest_path_for, write_manifest};
use crate::parser::{QueryBatchReader, RecordParser};
use crate::pipeline::evaluator::BatchEvaluator;
use crate::pipeline::indexing::index_corpus;
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::utils::{OperationTimer, Validator};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub struct PipelineOrchestrator {
    config: Config,
    colored: bool,
}

impl PipelineOrchestrator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            colored: true,
        }
    }

    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Both phases in sequence. Queries are only evaluated once the index is
    /// committed.
    pub async fn run(&self) -> Result<PipelineStats> {
        let indexing = self.run_indexing().await?;
        let mut stats = self.run_query_batch().await?;

        stats.documents_indexed = indexing.documents_indexed;
        stats.duration_secs += indexing.duration_secs;
        Ok(stats)
    }

    pub async fn run_indexing(&self) -> Result<PipelineStats> {
        let documents_path = self.config.corpus.documents_path.clone();
        Validator::validate_source_file(&documents_path, "Corpus file")?;

        let index_path = self.config.index.path.clone();
        let settings = self.config.index.engine_settings();
        let colored = self.colored;

        info!(
            "Indexing {} into {} ({} analyzer)",
            documents_path.display(),
            index_path.display(),
            settings.analyzer
        );
        let timer = OperationTimer::new("indexing phase");

        let stats = tokio::task::spawn_blocking(move || {
            let reader = open_source(&documents_path)?;
            let records = RecordParser::new(reader, documents_path.display().to_string());
            let mut indexer = TantivyIndexer::create(&index_path, settings)?;

            let progress = ProgressTracker::with_color("indexing", colored);
            index_corpus(records, &mut indexer, &progress)?;
            progress.finish();
            Ok::<_, PipelineError>(progress.get_stats())
        })
        .await
        .map_err(|e| PipelineError::Index(format!("Indexing task failed: {}", e)))??;

        timer.finish(stats.documents_indexed);
        self.log_final_stats(&stats);
        Ok(stats)
    }

    pub async fn run_query_batch(&self) -> Result<PipelineStats> {
        let corpus = &self.config.corpus;
        let evaluation = &self.config.evaluation;

        Validator::validate_source_file(&corpus.queries_path, "Query file")?;
        Validator::validate_index_dir(&self.config.index.path)?;
        Validator::validate_output_distinct(
            &evaluation.run_path,
            &[corpus.queries_path.as_path(), corpus.documents_path.as_path()],
        )?;

        let timer = OperationTimer::new("query batch phase");
        let index_path = self.config.index.path.clone();
        let searcher = tokio::task::spawn_blocking(move || TantivySearcher::open(&index_path))
            .await
            .map_err(|e| PipelineError::Index(format!("Index open task failed: {}", e)))??;
        timer.checkpoint(&format!("index opened with {} documents", searcher.num_docs()));

        if searcher.stop_words() != self.config.index.stop_words.as_slice() {
            warn!(
                "Configured stop words differ from the index at {}; using the indexed list",
                self.config.index.path.display()
            );
        }

        let queries = QueryBatchReader::new(
            open_source(&corpus.queries_path)?,
            corpus.queries_path.display().to_string(),
        );
        let evaluator = BatchEvaluator::new(
            Arc::new(searcher),
            evaluation.result_depth,
            evaluation.parallel_workers,
        );

        info!(
            "Evaluating queries from {} (depth {}, {} workers)",
            corpus.queries_path.display(),
            evaluation.result_depth,
            evaluation.parallel_workers
        );
        let progress = ProgressTracker::with_color("queries", self.colored);
        let mut staged = StagedRunFile::create(&evaluation.run_path)?;

        let outcome = evaluator.evaluate(queries, staged.writer(), &progress).await;
        let summary = match outcome {
            Ok(summary) => summary,
            Err(e) => {
                progress.finish();
                warn!(
                    "Query batch aborted; partial output left at {}",
                    staged.staging_path().display()
                );
                return Err(e);
            }
        };
        progress.finish();

        let committed = staged.commit()?;
        timer.finish(summary.queries_evaluated);

        if evaluation.write_manifest {
            let manifest = RunManifest::for_run_file(
                &committed.path,
                self.config.index.analyzer.to_string(),
                evaluation.result_depth,
                summary.queries_evaluated,
                summary.result_lines,
                summary.queries_without_results.clone(),
            )?;
            write_manifest(&manifest, &manifest_path_for(&committed.path), true)?;
        }

        let stats = progress.get_stats();
        self.log_final_stats(&stats);
        Ok(stats)
    }

    fn log_final_stats(&self, stats: &PipelineStats) {
        info!("=== Pipeline Execution Summary ===");
        info!("Duration: {:.2} seconds", stats.duration_secs);
        if stats.documents_indexed > 0 {
            info!("Documents indexed: {}", stats.documents_indexed);
            info!(
                "Indexing speed: {:.2} documents/sec",
                stats.documents_per_second()
            );
        }
        if stats.queries_evaluated > 0 {
            info!("Queries evaluated: {}", stats.queries_evaluated);
            info!("Result lines written: {}", stats.result_lines);
            info!(
                "Queries without results: {}",
                stats.queries_without_results
            );
            info!(
                "Mean results per query: {:.2}",
                stats.mean_results_per_query()
            );
            info!("Query speed: {:.2} queries/sec", stats.queries_per_second());
        }
        info!("=================================");
    }
}

fn open_source(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| PipelineError::SourceRead {
        origin: path.display().to_string(),
        source,
    })?;
    Ok(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CorpusConfig, EvaluationConfig, IndexConfig};
    use crate::engine::{AnalyzerKind, default_stop_words};
    use crate::exporter::staging_path_for;
    use std::fs;
    use tempfile::TempDir;

    const CORPUS: &str = "\
.I 1
.T
experimental investigation of the aerodynamics of a
wing in a slipstream .
.A
brenckman,m.
.B
j. ae. scs. 25, 1958, 324.
.W
an experimental study of a wing in a propeller slipstream was made .
.I 2
.T
simple shear flow past a flat plate in an incompressible fluid of small
viscosity .
.A
ting-yili
.B
department of aeronautical engineering, rensselaer polytechnic institute
.W
in the study of high-speed viscous flow past a two-dimensional body .
.I 3
.T
the boundary layer in simple shear flow past a flat plate .
.A
m. b. glauert
.B
rae tm aero. 2479, 1956.
.W
the boundary-layer equations are presented for steady incompressible flow .
";

    const QUERIES: &str = "\
.I 001
.W
what similarity laws must be obeyed when constructing aeroelastic models
of heated high speed aircraft .
.I 002
.W
what are the structural and aeroelastic problems associated with flight
of high speed aircraft .
.I 004
.W
what problems of heat conduction in composite slabs have been solved so
far .
";

    fn config(temp: &TempDir, queries: &[u8]) -> Config {
        let documents_path = temp.path().join("cran.all.1400");
        let queries_path = temp.path().join("cran.qry");
        fs::write(&documents_path, CORPUS).unwrap();
        fs::write(&queries_path, queries).unwrap();

        Config {
            corpus: CorpusConfig {
                documents_path,
                queries_path,
            },
            index: IndexConfig {
                path: temp.path().join("index"),
                analyzer: AnalyzerKind::English,
                writer_memory_mb: 15,
                stop_words: default_stop_words(),
            },
            evaluation: EvaluationConfig {
                run_path: temp.path().join("out").join("results.txt"),
                result_depth: 2,
                parallel_workers: 2,
                write_manifest: true,
            },
        }
    }

    #[tokio::test]
    async fn test_full_run_writes_run_file_and_manifest() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp, QUERIES.as_bytes());
        let run_path = config.evaluation.run_path.clone();
        let orchestrator = PipelineOrchestrator::new(config).with_color(false);

        let stats = orchestrator.run().await.unwrap();

        assert_eq!(stats.documents_indexed, 3);
        assert_eq!(stats.queries_evaluated, 3);

        let output = fs::read_to_string(&run_path).unwrap();
        assert_eq!(output.lines().count() as u64, stats.result_lines);
        for line in output.lines() {
            let fields: Vec<&str> = line.split(' ').collect();
            assert_eq!(fields.len(), 6);
            assert_eq!(fields[1], "Q0");
            assert_eq!(fields[5], "STANDARD");
            assert!(["1", "2", "3"].contains(&fields[0]));
            assert!(fields[4].parse::<f32>().is_ok());
        }

        assert!(!staging_path_for(&run_path).exists());
        let manifest: RunManifest =
            serde_json::from_str(&fs::read_to_string(manifest_path_for(&run_path)).unwrap())
                .unwrap();
        assert_eq!(manifest.result_depth, 2);
        assert_eq!(manifest.result_lines, stats.result_lines);
    }

    #[tokio::test]
    async fn test_query_phase_requires_index() {
        let temp = TempDir::new().unwrap();
        let orchestrator =
            PipelineOrchestrator::new(config(&temp, QUERIES.as_bytes())).with_color(false);

        let result = orchestrator.run_query_batch().await;

        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unreadable_queries_leave_incomplete_output() {
        let temp = TempDir::new().unwrap();
        let mut queries = b".I 001\n.W\nslipstream wing\n.I 002\n.W\n".to_vec();
        queries.extend_from_slice(&[0xff, 0xfe, b'\n']);
        let config = config(&temp, &queries);
        let run_path = config.evaluation.run_path.clone();
        let orchestrator = PipelineOrchestrator::new(config).with_color(false);

        orchestrator.run_indexing().await.unwrap();
        let result = orchestrator.run_query_batch().await;

        assert!(matches!(result, Err(PipelineError::SourceRead { .. })));
        assert!(!run_path.exists());
        assert!(staging_path_for(&run_path).exists());
        assert!(!manifest_path_for(&run_path).exists());
    }

    #[tokio::test]
    async fn test_missing_corpus_fails_validation() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp, QUERIES.as_bytes());
        config.corpus.documents_path = temp.path().join("missing");

        let result = PipelineOrchestrator::new(config)
            .with_color(false)
            .run_indexing()
            .await;

        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }
}
