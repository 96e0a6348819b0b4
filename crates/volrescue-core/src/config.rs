/// Recovery engine configuration
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RecoveryError, Result};
use crate::provenance::DEFAULT_SEARCH_WINDOW;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Bytes before a carved file searched for deleted directory entries.
    /// Zero disables name recovery.
    pub search_window: usize,
    /// Remove and recreate the output directory before each run
    pub clear_output: bool,
    /// Map the volume instead of reading it into a heap buffer
    pub use_mmap: bool,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            search_window: DEFAULT_SEARCH_WINDOW,
            clear_output: true,
            use_mmap: true,
        }
    }
}

impl RecoveryConfig {
    /// Load a config from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            RecoveryError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&text)
            .map_err(|e| RecoveryError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn with_search_window(mut self, window: usize) -> Self {
        self.search_window = window;
        self
    }
}
