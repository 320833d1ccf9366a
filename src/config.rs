// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::engine::{AnalyzerKind, EngineSettings, default_stop_words};
use crate::error::{PipelineError, Result};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "CRAN_SEARCH";
const MIN_WRITER_MEMORY_MB: usize = 15;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub index: IndexConfig,
    pub evaluation: EvaluationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorpusConfig {
    pub documents_path: PathBuf,
    pub queries_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub analyzer: AnalyzerKind,
    pub writer_memory_mb: usize,
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvaluationConfig {
    pub run_path: PathBuf,
    pub result_depth: usize,
    pub parallel_workers: usize,
    #[serde(default = "default_write_manifest")]
    pub write_manifest: bool,
}

fn default_write_manifest() -> bool {
    true
}

impl IndexConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            analyzer: self.analyzer,
            stop_words: self.stop_words.clone(),
            writer_memory_bytes: self.writer_memory_mb * 1_048_576,
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

impl Config {
    /// Built-in defaults, overlaid with `path` (when given) and then with
    /// `CRAN_SEARCH__*` variables from the environment or `.env`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();
        Self::load_with_environment(path, environment())
    }

    fn load_with_environment(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let mut builder = Self::with_defaults(config::Config::builder())
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(environment)
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    // stop_words stays out: list defaults are supplied by serde
    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> std::result::Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        let defaults = Self::default_config();
        let path = |p: &Path| p.to_string_lossy().into_owned();
        let (corpus, index, evaluation) = (defaults.corpus, defaults.index, defaults.evaluation);

        builder
            .set_default("corpus.documents_path", path(&corpus.documents_path))?
            .set_default("corpus.queries_path", path(&corpus.queries_path))?
            .set_default("index.path", path(&index.path))?
            .set_default("index.analyzer", index.analyzer.to_string())?
            .set_default("index.writer_memory_mb", index.writer_memory_mb as i64)?
            .set_default("evaluation.run_path", path(&evaluation.run_path))?
            .set_default("evaluation.result_depth", evaluation.result_depth as i64)?
            .set_default("evaluation.parallel_workers", evaluation.parallel_workers as i64)?
            .set_default("evaluation.write_manifest", evaluation.write_manifest)
    }

    pub fn default_config() -> Self {
        Self {
            corpus: CorpusConfig {
                documents_path: PathBuf::from("./data/cran.all.1400"),
                queries_path: PathBuf::from("./data/cran.qry"),
            },
            index: IndexConfig {
                path: PathBuf::from("./index"),
                analyzer: AnalyzerKind::English,
                writer_memory_mb: 50,
                stop_words: default_stop_words(),
            },
            evaluation: EvaluationConfig {
                run_path: PathBuf::from("./results.txt"),
                result_depth: 50,
                parallel_workers: 4,
                write_manifest: true,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.evaluation.result_depth == 0 {
            return Err(PipelineError::Config(
                "result_depth must be greater than 0".to_string(),
            ));
        }

        if self.evaluation.parallel_workers == 0 {
            return Err(PipelineError::Config(
                "parallel_workers must be greater than 0".to_string(),
            ));
        }

        if self.index.writer_memory_mb < MIN_WRITER_MEMORY_MB {
            return Err(PipelineError::Config(format!(
                "writer_memory_mb must be at least {}",
                MIN_WRITER_MEMORY_MB
            )));
        }

        Ok(())
    }
}
