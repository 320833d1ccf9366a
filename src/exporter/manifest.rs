// file: src/exporter/manifest.rs
// description: json manifest describing a committed run file

use crate::error::{PipelineError, Result};
use crate::models::RUN_TAG;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::info;

const MANIFEST_SUFFIX: &str = ".manifest.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub exported_at: String,
    pub run_file: String,
    pub run_tag: String,
    pub analyzer: String,
    pub result_depth: usize,
    pub queries_evaluated: u64,
    pub result_lines: u64,
    pub queries_without_results: Vec<u32>,
    pub sha256: String,
}

impl RunManifest {
    pub fn for_run_file(
        run_file: &Path,
        analyzer: impl Into<String>,
        result_depth: usize,
        queries_evaluated: u64,
        result_lines: u64,
        queries_without_results: Vec<u32>,
    ) -> Result<Self> {
        Ok(Self {
            exported_at: Utc::now().to_rfc3339(),
            run_file: run_file.display().to_string(),
            run_tag: RUN_TAG.to_string(),
            analyzer: analyzer.into(),
            result_depth,
            queries_evaluated,
            result_lines,
            queries_without_results,
            sha256: file_sha256(run_file)?,
        })
    }
}

pub fn manifest_path_for(run_file: &Path) -> PathBuf {
    let mut name = run_file.as_os_str().to_os_string();
    name.push(MANIFEST_SUFFIX);
    PathBuf::from(name)
}

pub fn write_manifest(manifest: &RunManifest, path: &Path, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(manifest)
    } else {
        serde_json::to_string(manifest)
    }
    .map_err(|e| PipelineError::Serialization(e.to_string()))?;

    fs::write(path, json).map_err(|source| PipelineError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Run manifest written to {}", path.display());
    Ok(())
}

fn file_sha256(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
