/// In-memory view of a volume image
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use crate::error::{RecoveryError, Result};

enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

/// The whole volume as an immutable byte slice.
///
/// Either memory-mapped read-only or read fully into a heap buffer; callers
/// only ever see `&[u8]`.
pub struct VolumeBuffer {
    backing: Backing,
    path: Option<PathBuf>,
}

impl VolumeBuffer {
    /// Open a volume image. Empty files are never mapped.
    pub fn open<P: AsRef<Path>>(path: P, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let read_err = |source: std::io::Error| RecoveryError::VolumeRead {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(read_err)?;
        let size = file.metadata().map_err(read_err)?.len();

        let backing = if use_mmap && size > 0 {
            // Read-only mapping; the image is never written through it
            let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(read_err)?;
            Backing::Mapped(mmap)
        } else {
            drop(file);
            Backing::Owned(std::fs::read(path).map_err(read_err)?)
        };

        tracing::debug!("Loaded volume {} ({} bytes)", path.display(), size);

        Ok(Self {
            backing,
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap bytes already in memory
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            backing: Backing::Owned(bytes),
            path: None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.backing {
            Backing::Mapped(mmap) => &mmap[..],
            Backing::Owned(bytes) => bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.as_bytes().len() as u64
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self.backing, Backing::Mapped(_))
    }
}

impl Deref for VolumeBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}
