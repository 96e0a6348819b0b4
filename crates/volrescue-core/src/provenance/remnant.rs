//! Deleted directory entry remnants
//!
//! FAT-style short directory entries are 32 bytes: an 8.3 name followed by
//! attributes, timestamps and the first cluster. Deleting a file overwrites
//! only the first name byte with `0xE5`, so the remaining seven name bytes and
//! the three extension bytes usually survive.

/// Size of one directory entry
pub const ENTRY_SIZE: usize = 32;

/// First byte of a deleted entry
pub const DELETED_MARKER: u8 = 0xE5;

const NAME_RANGE: std::ops::Range<usize> = 1..8;
const EXT_RANGE: std::ops::Range<usize> = 8..11;

/// Name and extension decoded from a candidate deleted entry.
///
/// Nothing confirms the bytes really were a directory entry; a candidate is
/// accepted on the marker byte and decodable printable text alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntryRemnant {
    pub name: String,
    pub extension: String,
}

impl DirectoryEntryRemnant {
    /// Decode a 32-byte slice. Returns `None` unless it starts with the
    /// deletion marker and carries a non-empty name.
    pub fn parse(entry: &[u8]) -> Option<Self> {
        if entry.len() < ENTRY_SIZE || entry[0] != DELETED_MARKER {
            return None;
        }

        let name = decode_field(&entry[NAME_RANGE]);
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name,
            extension: decode_field(&entry[EXT_RANGE]),
        })
    }

    /// True when the stored extension names the given format tag
    pub fn matches_extension(&self, tag: &str) -> bool {
        self.extension.eq_ignore_ascii_case(tag)
    }
}

/// Decode an 8.3 name field: bytes outside ASCII are dropped, control
/// characters are dropped, trailing padding is trimmed.
pub fn decode_field(bytes: &[u8]) -> String {
    let decoded: String = bytes
        .iter()
        .filter(|b| b.is_ascii() && !b.is_ascii_control())
        .map(|&b| b as char)
        .collect();

    decoded.trim_end().to_string()
}

/// Encode a 32-byte deleted entry holding `name` and `extension`, padded with
/// spaces. Used by the fixture generator and tests.
pub fn encode_deleted_entry(name: &str, extension: &str) -> [u8; ENTRY_SIZE] {
    let mut entry = [0u8; ENTRY_SIZE];
    entry[0] = DELETED_MARKER;

    let name_field = &mut entry[NAME_RANGE];
    name_field.fill(b' ');
    for (slot, byte) in name_field.iter_mut().zip(name.bytes()) {
        *slot = byte;
    }

    let ext_field = &mut entry[EXT_RANGE];
    ext_field.fill(b' ');
    for (slot, byte) in ext_field.iter_mut().zip(extension.bytes()) {
        *slot = byte;
    }

    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deleted_entry() {
        let entry = encode_deleted_entry("PHOTO", "png");
        assert_eq!(&entry[1..8], b"PHOTO  ");
        assert_eq!(&entry[8..11], b"png");

        let remnant = DirectoryEntryRemnant::parse(&entry).unwrap();
        assert_eq!(remnant.name, "PHOTO");
        assert_eq!(remnant.extension, "png");
        assert!(remnant.matches_extension("PNG"));
        assert!(!remnant.matches_extension("jpg"));
    }

    #[test]
    fn test_live_entry_rejected() {
        let mut entry = encode_deleted_entry("PHOTO", "png");
        entry[0] = b'X';
        assert_eq!(DirectoryEntryRemnant::parse(&entry), None);
    }

    #[test]
    fn test_short_slice_rejected() {
        let entry = encode_deleted_entry("PHOTO", "png");
        assert_eq!(DirectoryEntryRemnant::parse(&entry[..31]), None);
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut entry = [0u8; ENTRY_SIZE];
        entry[0] = DELETED_MARKER;
        entry[8..11].copy_from_slice(b"png");
        assert_eq!(DirectoryEntryRemnant::parse(&entry), None);

        entry[1..8].copy_from_slice(&[0x80, 0x81, 0x01, 0x02, 0xFF, b' ', b' ']);
        assert_eq!(DirectoryEntryRemnant::parse(&entry), None);
    }

    #[test]
    fn test_decode_field_drops_undecodable_bytes() {
        assert_eq!(decode_field(&[b'A', 0xC3, b'B', 0x00, b'C']), "ABC");
        assert_eq!(decode_field(b"IMG 01 "), "IMG 01");
        assert_eq!(decode_field(&[b'X', b' ', 0x00, 0x00]), "X");
        assert_eq!(decode_field(&[]), "");
    }
}
