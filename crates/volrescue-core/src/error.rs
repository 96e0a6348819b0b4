//! Error types for the recovery engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the recovery engine.
///
/// Only `VolumeNotFound` escapes engine construction; the other variants are
/// contained per file or per run and end up in the [`RecoveryReport`].
///
/// [`RecoveryReport`]: crate::recovery::RecoveryReport
#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("Volume file not found: {0}")]
    VolumeNotFound(PathBuf),

    #[error("Failed to read volume {path}: {source}")]
    VolumeRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write image at offset {offset} to {path}: {source}")]
    Write {
        offset: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Report serialization failed: {0}")]
    Report(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RecoveryError>;
