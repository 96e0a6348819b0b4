//! Signature-based carving
//!
//! Locates embedded files by their header/footer byte patterns alone, with no
//! help from directory or allocation metadata. Every header occurrence is
//! paired with the first matching footer that follows it; a header with no
//! footer before the end of the buffer is dropped.

pub mod signatures;

pub use signatures::{catalog, lookup, FileSignature, JPEG, PNG, SIGNATURES};

/// A byte range in the volume believed to hold one complete file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarvedRange {
    /// Offset of the first header byte
    pub start: usize,
    /// One past the last footer byte
    pub end: usize,
    pub signature: &'static FileSignature,
}

impl CarvedRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn tag(&self) -> &'static str {
        self.signature.tag
    }

    /// The carved bytes
    pub fn slice<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        &buffer[self.start..self.end]
    }
}

/// Find the first occurrence of `needle` in `haystack` at or after `from`
pub fn find_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() || haystack.len() - from < needle.len() {
        return None;
    }

    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| from + pos)
}

/// Carve every range for a single signature, in header order
pub fn carve_signature(buffer: &[u8], signature: &'static FileSignature) -> Vec<CarvedRange> {
    let mut ranges = Vec::new();
    let mut search_pos = 0;

    while let Some(start) = find_from(buffer, signature.header, search_pos) {
        match find_from(buffer, signature.footer, start) {
            Some(footer_pos) => ranges.push(CarvedRange {
                start,
                end: footer_pos + signature.footer.len(),
                signature,
            }),
            None => {
                tracing::debug!(
                    "No {} footer after header at offset {}, discarding",
                    signature.tag,
                    start
                );
            }
        }

        // Advance one byte so headers nested inside a previous body are found too
        search_pos = start + 1;
    }

    ranges
}

/// Carve all ranges for every signature in `catalog`, sorted by start offset
pub fn find_images_with(buffer: &[u8], catalog: &'static [FileSignature]) -> Vec<CarvedRange> {
    let mut ranges: Vec<CarvedRange> = catalog
        .iter()
        .flat_map(|signature| carve_signature(buffer, signature))
        .collect();

    // Stable: equal starts keep catalog order, then scan order
    ranges.sort_by_key(|range| range.start);
    ranges
}

/// Carve all ranges for the built-in catalog, sorted by start offset
pub fn find_all_images(buffer: &[u8]) -> Vec<CarvedRange> {
    find_images_with(buffer, SIGNATURES)
}
