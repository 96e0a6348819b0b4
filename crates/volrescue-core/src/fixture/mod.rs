//! Synthetic volume generator
//!
//! Builds a small FAT32-looking image: a boot sector, a metadata region, then
//! each stored file behind a 4-byte little-endian length prefix, zero-filled
//! to a fixed size. Corruption is simulated by zeroing the metadata region
//! after the files are placed. The recovery engine never reads the length
//! prefixes; they only exist so the layout resembles a naive writer's output.

use anyhow::{Context, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use crate::provenance::remnant::{encode_deleted_entry, ENTRY_SIZE};

/// Boot sector signature at offset 510
pub const BOOT_SIGNATURE: [u8; 2] = [0x55, 0xAA];

const OEM_NAME: &[u8; 8] = b"MSDOS5.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Total size of the generated volume
    pub volume_size: usize,
    pub sector_size: usize,
    /// Sectors reserved for directory/allocation metadata after the boot sector
    pub metadata_sectors: usize,
    /// Zero the metadata region once the files are written
    pub corrupt_metadata: bool,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            volume_size: 10 * 1024 * 1024,
            sector_size: 512,
            metadata_sectors: 8,
            corrupt_metadata: true,
        }
    }
}

impl FixtureConfig {
    pub fn metadata_offset(&self) -> usize {
        self.sector_size
    }

    pub fn metadata_len(&self) -> usize {
        self.metadata_sectors * self.sector_size
    }

    /// First byte after the metadata region
    pub fn data_offset(&self) -> usize {
        self.metadata_offset() + self.metadata_len()
    }
}

/// A generated volume and where each stored file's content begins
#[derive(Debug, Clone)]
pub struct FixtureVolume {
    pub bytes: Vec<u8>,
    pub file_offsets: Vec<usize>,
}

/// Build a 512-byte FAT32-style boot sector
pub fn boot_sector() -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(vec![0u8; 512]);

    cursor.write_all(&[0xEB, 0x58, 0x90])?; // JMP + NOP
    cursor.write_all(OEM_NAME)?;

    // BIOS parameter block
    cursor.write_u16::<LittleEndian>(512)?; // bytes per sector
    cursor.write_u8(8)?; // sectors per cluster
    cursor.write_u16::<LittleEndian>(32)?; // reserved sectors
    cursor.write_u8(2)?; // number of FATs
    cursor.write_u16::<LittleEndian>(0)?; // root entries
    cursor.write_u16::<LittleEndian>(0)?; // small sectors
    cursor.write_u8(0xF8)?; // media type

    cursor.set_position(510);
    cursor.write_all(&BOOT_SIGNATURE)?;

    Ok(cursor.into_inner())
}

/// Builder for synthetic volumes
#[derive(Debug, Clone, Default)]
pub struct FixtureBuilder {
    config: FixtureConfig,
    files: Vec<Vec<u8>>,
    remnants: Vec<(String, String)>,
}

impl FixtureBuilder {
    pub fn new(config: FixtureConfig) -> Self {
        Self {
            config,
            files: Vec::new(),
            remnants: Vec::new(),
        }
    }

    /// Store a file in the data region, in insertion order
    pub fn add_file(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.files.push(content.into());
        self
    }

    /// Plant a deleted directory entry in the metadata region
    pub fn add_remnant(mut self, name: impl Into<String>, extension: impl Into<String>) -> Self {
        self.remnants.push((name.into(), extension.into()));
        self
    }

    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    pub fn build(&self) -> Result<FixtureVolume> {
        let config = &self.config;
        if config.volume_size < config.data_offset() {
            anyhow::bail!(
                "Volume size {} is smaller than boot sector plus metadata ({})",
                config.volume_size,
                config.data_offset()
            );
        }
        if self.remnants.len() * ENTRY_SIZE > config.metadata_len() {
            anyhow::bail!(
                "{} directory entries do not fit in a {}-byte metadata region",
                self.remnants.len(),
                config.metadata_len()
            );
        }

        let mut bytes = vec![0u8; config.volume_size];
        let boot = boot_sector()?;
        let boot_len = boot.len().min(config.sector_size);
        bytes[..boot_len].copy_from_slice(&boot[..boot_len]);

        let mut entry_pos = config.metadata_offset();
        for (name, extension) in &self.remnants {
            bytes[entry_pos..entry_pos + ENTRY_SIZE]
                .copy_from_slice(&encode_deleted_entry(name, extension));
            entry_pos += ENTRY_SIZE;
        }

        let mut file_offsets = Vec::with_capacity(self.files.len());
        let mut data_pos = config.data_offset();
        for (index, content) in self.files.iter().enumerate() {
            let end = data_pos + 4 + content.len();
            if end > config.volume_size {
                anyhow::bail!(
                    "File {} ({} bytes) does not fit: needs {} of {} bytes",
                    index,
                    content.len(),
                    end,
                    config.volume_size
                );
            }
            let length = u32::try_from(content.len())
                .with_context(|| format!("File {} is too large for a length prefix", index))?;

            let mut prefix = &mut bytes[data_pos..data_pos + 4];
            prefix.write_u32::<LittleEndian>(length)?;
            bytes[data_pos + 4..end].copy_from_slice(content);

            tracing::debug!("Placed file {} at offset {} ({} bytes)", index, data_pos + 4, length);
            file_offsets.push(data_pos + 4);
            data_pos = end;
        }

        if config.corrupt_metadata {
            let start = config.metadata_offset();
            bytes[start..start + config.metadata_len()].fill(0);
            tracing::debug!("Zeroed metadata region at {}..{}", start, start + config.metadata_len());
        }

        Ok(FixtureVolume {
            bytes,
            file_offsets,
        })
    }
}

/// Build a volume from files on disk and write it to `output`. Missing input
/// files are skipped with a warning.
pub fn write_fixture(
    output: &Path,
    mut builder: FixtureBuilder,
    files: &[PathBuf],
) -> Result<FixtureVolume> {
    for path in files {
        if !path.exists() {
            tracing::warn!("{} not found, skipping", path.display());
            continue;
        }
        let content =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        tracing::info!("Adding {} ({} bytes)", path.display(), content.len());
        builder = builder.add_file(content);
    }

    let volume = builder.build()?;
    std::fs::write(output, &volume.bytes)
        .with_context(|| format!("Failed to write volume {}", output.display()))?;

    tracing::info!(
        "Wrote {} ({} bytes, {} files)",
        output.display(),
        volume.bytes.len(),
        volume.file_offsets.len()
    );
    Ok(volume)
}
