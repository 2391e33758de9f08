#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::UTF_8;
use schema_standardizer::{
    SourceTable, StandardizeOutput, Standardizer, StandardizerConfig,
    platform::{Platform, ResourceType},
};
use tempfile::{TempDir, tempdir};

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory that is removed on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.join(name);
        fs::write(&path, contents).expect("write temp file contents");
        path
    }
}

pub fn csv_table(text: &str) -> SourceTable {
    SourceTable::from_csv_reader(text.as_bytes(), b',', UTF_8).expect("parse csv")
}

pub fn json_table(text: &str) -> SourceTable {
    SourceTable::from_json_str(text).expect("parse json")
}

/// Standardizes `source` with an otherwise empty configuration.
pub fn standardize(platform: Platform, resource: ResourceType, source: &SourceTable) -> StandardizeOutput {
    standardize_with(StandardizerConfig::new(platform, resource), source)
}

pub fn standardize_with(config: StandardizerConfig, source: &SourceTable) -> StandardizeOutput {
    Standardizer::new(&config)
        .expect("valid configuration")
        .standardize(source)
        .expect("standardize")
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
