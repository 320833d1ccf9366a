// file: src/exporter/run_file.rs
// description: trec_eval run file writer with staged commit
// reference: trec_eval run format, write-then-rename publication

use crate::error::{PipelineError, Result};
use crate::models::ResultBlock;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const STAGING_SUFFIX: &str = ".incomplete";

/// Writes result blocks as run-file lines, one line per result.
pub struct RunWriter<W: Write> {
    sink: W,
    destination: PathBuf,
    lines_written: u64,
    blocks_written: u64,
}

impl<W: Write> RunWriter<W> {
    /// `destination` names the sink in write errors.
    pub fn new(sink: W, destination: impl Into<PathBuf>) -> Self {
        Self {
            sink,
            destination: destination.into(),
            lines_written: 0,
            blocks_written: 0,
        }
    }

    pub fn write_block(&mut self, block: &ResultBlock) -> Result<()> {
        for result in &block.results {
            writeln!(self.sink, "{result}").map_err(|source| self.write_error(source))?;
        }

        self.lines_written += block.len() as u64;
        self.blocks_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush().map_err(|source| self.write_error(source))
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn blocks_written(&self) -> u64 {
        self.blocks_written
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn write_error(&self, source: std::io::Error) -> PipelineError {
        PipelineError::OutputWrite {
            path: self.destination.clone(),
            source,
        }
    }
}

/// Summary of a published run file.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedRun {
    pub path: PathBuf,
    pub lines_written: u64,
    pub blocks_written: u64,
}

/// Run file written under `<target>.incomplete` and renamed on commit.
///
/// Dropping it without committing leaves only the `.incomplete` file.
pub struct StagedRunFile {
    writer: RunWriter<BufWriter<File>>,
    staging_path: PathBuf,
    target_path: PathBuf,
}

impl StagedRunFile {
    pub fn create(target: &Path) -> Result<Self> {
        let output_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| PipelineError::OutputWrite { path, source }
        };

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(output_error(parent))?;
        }

        // a stale run must not pass for the result of this one
        if target.exists() {
            fs::remove_file(target).map_err(output_error(target))?;
        }

        let staging_path = staging_path_for(target);
        let file = File::create(&staging_path).map_err(output_error(&staging_path))?;
        debug!("Staging run output at {}", staging_path.display());

        Ok(Self {
            writer: RunWriter::new(BufWriter::new(file), staging_path.clone()),
            staging_path,
            target_path: target.to_path_buf(),
        })
    }

    pub fn writer(&mut self) -> &mut RunWriter<BufWriter<File>> {
        &mut self.writer
    }

    pub fn staging_path(&self) -> &Path {
        &self.staging_path
    }

    pub fn commit(mut self) -> Result<CommittedRun> {
        self.writer.flush()?;

        let lines_written = self.writer.lines_written();
        let blocks_written = self.writer.blocks_written();
        let file = self
            .writer
            .into_inner()
            .into_inner()
            .map_err(|e| PipelineError::OutputWrite {
                path: self.staging_path.clone(),
                source: e.into_error(),
            })?;
        file.sync_all().map_err(|source| PipelineError::OutputWrite {
            path: self.staging_path.clone(),
            source,
        })?;
        drop(file);

        fs::rename(&self.staging_path, &self.target_path).map_err(|source| {
            PipelineError::OutputWrite {
                path: self.target_path.clone(),
                source,
            }
        })?;

        info!(
            "Wrote {} result lines for {} queries to {}",
            lines_written,
            blocks_written,
            self.target_path.display()
        );

        Ok(CommittedRun {
            path: self.target_path,
            lines_written,
            blocks_written,
        })
    }
}

pub fn staging_path_for(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(STAGING_SUFFIX);
    PathBuf::from(name)
}
