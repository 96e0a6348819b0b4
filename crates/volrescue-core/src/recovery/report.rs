//! Per-run recovery report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Recovery report with detailed results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryReport {
    pub volume_path: PathBuf,
    pub output_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub volume_size: u64,
    /// Ranges found by the carver, written or not
    pub carved_ranges: usize,
    pub recovered: Vec<RecoveredFile>,
    pub failures: Vec<RecoveryFailure>,
    /// Set when the run could not start (unreadable volume, unusable output dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal_error: Option<String>,
}

/// A carved range that was written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveredFile {
    pub start: usize,
    pub end: usize,
    pub format: String,
    /// Name before collision handling
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    /// Hex SHA-256 of the written content
    pub sha256: String,
}

/// A carved range that could not be written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryFailure {
    pub start: usize,
    pub format: String,
    pub error: String,
}

impl RecoveryReport {
    pub fn new(volume_path: &Path, output_dir: &Path) -> Self {
        Self {
            volume_path: volume_path.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            started_at: Utc::now(),
            volume_size: 0,
            carved_ranges: 0,
            recovered: Vec::new(),
            failures: Vec::new(),
            fatal_error: None,
        }
    }

    pub fn recovered_count(&self) -> usize {
        self.recovered.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn total_bytes_recovered(&self) -> u64 {
        self.recovered.iter().map(|f| f.size).sum()
    }

    /// Save the report as pretty-printed JSON
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl RecoveredFile {
    /// File name actually written
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}
