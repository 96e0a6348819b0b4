//! Best-effort recovery of original file names
//!
//! The directory is gone, but deleted entries may survive in the bytes just
//! before a carved file. The resolver walks a bounded window preceding the
//! file one byte at a time and takes the first deleted entry whose extension
//! matches the carved format.
//!
//! This is a heuristic: an unrelated deleted entry that happens to satisfy the
//! rule inside the window will lend its name to the carved file. The source
//! data holds nothing that could confirm the association.

pub mod remnant;

pub use remnant::{DirectoryEntryRemnant, DELETED_MARKER, ENTRY_SIZE};

/// Default size of the backward search window, in bytes
pub const DEFAULT_SEARCH_WINDOW: usize = 10_000;

/// Looks up original names in the bytes preceding a carved file
#[derive(Debug, Clone, Copy)]
pub struct ProvenanceResolver {
    window: usize,
}

impl Default for ProvenanceResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_WINDOW)
    }
}

impl ProvenanceResolver {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Find the first matching deleted entry in `[start_pos - window, start_pos)`
    pub fn find_remnant(
        &self,
        buffer: &[u8],
        start_pos: usize,
        tag: &str,
    ) -> Option<(usize, DirectoryEntryRemnant)> {
        let search_start = start_pos.saturating_sub(self.window);
        let search_end = start_pos.min(buffer.len());

        for pos in search_start..search_end {
            if pos + ENTRY_SIZE > buffer.len() {
                break;
            }
            if buffer[pos] != DELETED_MARKER {
                continue;
            }

            match DirectoryEntryRemnant::parse(&buffer[pos..pos + ENTRY_SIZE]) {
                Some(remnant) if remnant.matches_extension(tag) => {
                    tracing::debug!(
                        "Deleted entry at offset {} names file at {}: {}.{}",
                        pos,
                        start_pos,
                        remnant.name,
                        remnant.extension
                    );
                    return Some((pos, remnant));
                }
                _ => continue,
            }
        }

        None
    }

    /// Name for the file carved at `start_pos`: the recovered `<name>.<tag>`,
    /// or `recovered_<start_pos>.<tag>` when no remnant matches.
    pub fn find_original_filename(&self, buffer: &[u8], start_pos: usize, tag: &str) -> String {
        match self.find_remnant(buffer, start_pos, tag) {
            Some((_, remnant)) => format!("{}.{}", remnant.name, tag),
            None => synthesized_name(start_pos, tag),
        }
    }
}

/// Fallback name for a file with no recoverable provenance
pub fn synthesized_name(start_pos: usize, tag: &str) -> String {
    format!("recovered_{}.{}", start_pos, tag)
}

/// Resolve a name with the default search window
pub fn find_original_filename(buffer: &[u8], start_pos: usize, tag: &str) -> String {
    ProvenanceResolver::default().find_original_filename(buffer, start_pos, tag)
}
