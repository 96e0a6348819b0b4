/// Recovery orchestration: load, carve, name, write
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::carving::{find_images_with, CarvedRange, FileSignature, SIGNATURES};
use crate::config::RecoveryConfig;
use crate::error::{RecoveryError, Result};
use crate::provenance::ProvenanceResolver;
use crate::recovery::naming::{create_unique, sanitize_name};
use crate::recovery::report::{RecoveredFile, RecoveryFailure, RecoveryReport};
use crate::volume::VolumeBuffer;

/// A carved range together with the name it will be written under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRange {
    pub range: CarvedRange,
    pub name: String,
}

/// Carve `buffer` with `catalog` and name each range, in start order
pub fn resolve_ranges(
    buffer: &[u8],
    catalog: &'static [FileSignature],
    resolver: &ProvenanceResolver,
) -> Vec<ResolvedRange> {
    find_images_with(buffer, catalog)
        .into_iter()
        .map(|range| ResolvedRange {
            name: resolver.find_original_filename(buffer, range.start, range.tag()),
            range,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct RecoveryProgress {
    /// Ranges handled so far, written or failed
    pub processed: usize,
    pub total: usize,
    pub current_offset: usize,
    pub recovered: usize,
}

/// Recovers carved images from a single volume into an output directory
pub struct RecoveryEngine {
    volume_path: PathBuf,
    output_dir: PathBuf,
    config: RecoveryConfig,
    resolver: ProvenanceResolver,
    progress_callback: Option<Box<dyn Fn(RecoveryProgress) + Send + Sync>>,
}

impl RecoveryEngine {
    /// Create an engine for `volume_path`. Fails fast if the volume does not
    /// exist; nothing is touched on disk until [`run`](Self::run).
    pub fn new(
        volume_path: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        config: RecoveryConfig,
    ) -> Result<Self> {
        let volume_path = volume_path.as_ref();
        if !volume_path.exists() {
            return Err(RecoveryError::VolumeNotFound(volume_path.to_path_buf()));
        }

        Ok(Self {
            volume_path: volume_path.to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            resolver: ProvenanceResolver::new(config.search_window),
            config,
            progress_callback: None,
        })
    }

    pub fn set_progress_callback<F>(&mut self, callback: F)
    where
        F: Fn(RecoveryProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Box::new(callback));
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run recovery and return how many files were written.
    /// Errors are logged and reflected in a zero or partial count.
    pub fn recover_images(&self) -> usize {
        self.run().recovered_count()
    }

    /// Run recovery and return the full report
    pub fn run(&self) -> RecoveryReport {
        let mut report = RecoveryReport::new(&self.volume_path, &self.output_dir);

        tracing::info!(
            "🔍 Recovering images from {} into {}",
            self.volume_path.display(),
            self.output_dir.display()
        );

        if let Err(e) = self.prepare_output_dir() {
            tracing::error!("{}", e);
            report.fatal_error = Some(e.to_string());
            return report;
        }

        let volume = match self.load_volume() {
            Ok(volume) => volume,
            Err(e) => {
                tracing::error!("Error reading volume: {}", e);
                report.fatal_error = Some(e.to_string());
                return report;
            }
        };

        report.volume_size = volume.size();
        self.recover_from_buffer(&volume, &mut report);

        tracing::info!(
            "✅ Recovery complete: {}/{} carved images written, {} failed",
            report.recovered_count(),
            report.carved_ranges,
            report.failed_count()
        );

        report
    }

    /// Carve and name every image without writing anything
    pub fn scan(&self) -> Result<Vec<ResolvedRange>> {
        let volume = self.load_volume()?;
        Ok(self.resolve(&volume))
    }

    /// Carve `buffer` and resolve a name for each range, in start order
    pub fn resolve(&self, buffer: &[u8]) -> Vec<ResolvedRange> {
        resolve_ranges(buffer, SIGNATURES, &self.resolver)
    }

    /// Carve `buffer` and write every range into the output directory.
    /// Per-file failures are recorded in `report` and do not stop the loop.
    pub fn recover_from_buffer(&self, buffer: &[u8], report: &mut RecoveryReport) {
        let resolved = self.resolve(buffer);
        let total = resolved.len();
        report.carved_ranges += total;

        tracing::info!("Found {} candidate images", total);

        for (index, item) in resolved.iter().enumerate() {
            let range = &item.range;

            match self.write_range(buffer, item) {
                Ok(file) => {
                    tracing::debug!("Recovered: {}", file.file_name());
                    report.recovered.push(file);
                }
                Err(e) => {
                    tracing::warn!("Error recovering image at position {}: {}", range.start, e);
                    report.failures.push(RecoveryFailure {
                        start: range.start,
                        format: range.tag().to_string(),
                        error: e.to_string(),
                    });
                }
            }

            self.emit_progress(RecoveryProgress {
                processed: index + 1,
                total,
                current_offset: range.start,
                recovered: report.recovered_count(),
            });
        }
    }

    fn load_volume(&self) -> Result<VolumeBuffer> {
        VolumeBuffer::open(&self.volume_path, self.config.use_mmap)
    }

    /// Clear (if configured) and recreate the output directory
    fn prepare_output_dir(&self) -> Result<()> {
        let dir_err = |source: std::io::Error| RecoveryError::OutputDir {
            path: self.output_dir.clone(),
            source,
        };

        if self.config.clear_output && self.output_dir.exists() {
            tracing::debug!("Clearing output directory {}", self.output_dir.display());
            std::fs::remove_dir_all(&self.output_dir).map_err(dir_err)?;
        }
        std::fs::create_dir_all(&self.output_dir).map_err(dir_err)?;

        Ok(())
    }

    fn write_range(&self, buffer: &[u8], item: &ResolvedRange) -> Result<RecoveredFile> {
        let range = &item.range;
        let content = range.slice(buffer);
        let name = sanitize_name(&item.name);

        let (path, mut file) =
            create_unique(&self.output_dir, &name).map_err(|source| RecoveryError::Write {
                offset: range.start,
                path: self.output_dir.join(&name),
                source,
            })?;

        let written = file.write_all(content).and_then(|_| file.flush());
        drop(file);

        if let Err(source) = written {
            // Don't leave a truncated image behind
            let _ = std::fs::remove_file(&path);
            return Err(RecoveryError::Write {
                offset: range.start,
                path,
                source,
            });
        }

        Ok(RecoveredFile {
            start: range.start,
            end: range.end,
            format: range.tag().to_string(),
            name,
            path,
            size: content.len() as u64,
            sha256: format!("{:x}", Sha256::digest(content)),
        })
    }

    fn emit_progress(&self, progress: RecoveryProgress) {
        if let Some(ref callback) = self.progress_callback {
            callback(progress);
        }
    }
}
