// file: src/exporter/mod.rs
// description: run output module exports

pub mod manifest;
pub mod run_file;

pub use manifest::{RunManifest, manifest_path_for, write_manifest};
pub use run_file::{CommittedRun, RunWriter, StagedRunFile, staging_path_for};
