// file: src/utils/validation.rs
// description: pre-flight checks on source and output paths
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::fs::{self, File};
use std::path::Path;

pub struct Validator;

impl Validator {
    /// Fails unless `path` is an existing, readable regular file.
    pub fn validate_source_file(path: &Path, role: &str) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            PipelineError::Validation(format!(
                "{} {} cannot be resolved: {}",
                role,
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(PipelineError::Validation(format!(
                "{} is not a file: {}",
                role,
                canonical.display()
            )));
        }

        File::open(&canonical).map_err(|e| {
            PipelineError::Validation(format!(
                "{} {} is not readable: {}",
                role,
                canonical.display(),
                e
            ))
        })?;

        Ok(())
    }

    pub fn validate_index_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PipelineError::Validation(format!(
                "Index directory does not exist: {} (run `index` first)",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Index path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Refuses an output path that would overwrite one of the inputs.
    pub fn validate_output_distinct(output: &Path, inputs: &[&Path]) -> Result<()> {
        let Ok(output) = fs::canonicalize(output) else {
            return Ok(());
        };

        for input in inputs {
            if fs::canonicalize(input).is_ok_and(|input| input == output) {
                return Err(PipelineError::Validation(format!(
                    "Output {} would overwrite an input file",
                    output.display()
                )));
            }
        }

        Ok(())
    }
}
