//! Image recovery from volumes whose directory metadata is gone.
//!
//! Files are located by header/footer signatures alone ([`carving`]), named
//! from surviving deleted directory entries where possible ([`provenance`]),
//! and written out with collision-safe names ([`recovery`]).

use std::path::Path;

pub mod carving;
pub mod config;
pub mod error;
pub mod fixture;
pub mod provenance;
pub mod recovery;
pub mod volume;

pub use carving::{find_all_images, CarvedRange, FileSignature};
pub use config::RecoveryConfig;
pub use error::{RecoveryError, Result};
pub use provenance::{find_original_filename, DirectoryEntryRemnant, ProvenanceResolver};
pub use recovery::{
    RecoveredFile, RecoveryEngine, RecoveryFailure, RecoveryProgress, RecoveryReport,
    ResolvedRange,
};
pub use volume::VolumeBuffer;

/// Recover every image in `volume_path` into `output_dir` with default
/// settings, returning the number of files written
pub fn recover_images(volume_path: &Path, output_dir: &Path) -> Result<usize> {
    let engine = RecoveryEngine::new(volume_path, output_dir, RecoveryConfig::default())?;
    Ok(engine.recover_images())
}

/// Carve and name every image in `volume_path` without writing anything
pub fn scan_volume(volume_path: &Path, config: &RecoveryConfig) -> Result<Vec<ResolvedRange>> {
    if !volume_path.exists() {
        return Err(RecoveryError::VolumeNotFound(volume_path.to_path_buf()));
    }

    let volume = VolumeBuffer::open(volume_path, config.use_mmap)?;
    let resolver = ProvenanceResolver::new(config.search_window);
    Ok(recovery::engine::resolve_ranges(
        &volume,
        carving::SIGNATURES,
        &resolver,
    ))
}
