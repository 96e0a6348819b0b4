//! Header/footer signature catalog for carvable image formats

/// A carvable file format described by the bytes that open and close it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSignature {
    /// Format tag, also used as the output file extension (no leading dot)
    pub tag: &'static str,
    pub header: &'static [u8],
    pub footer: &'static [u8],
    /// Human-readable format name
    pub description: &'static str,
}

/// JPEG: SOI marker through EOI marker
pub const JPEG: FileSignature = FileSignature {
    tag: "jpg",
    header: &[0xFF, 0xD8, 0xFF],
    footer: &[0xFF, 0xD9],
    description: "JPEG Image",
};

/// PNG: 8-byte magic through the IEND chunk type and its fixed CRC
pub const PNG: FileSignature = FileSignature {
    tag: "png",
    header: &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
    footer: &[0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82], // IEND + CRC
    description: "PNG Image",
};

/// Every format the carver looks for, in scan order
pub static SIGNATURES: &[FileSignature] = &[JPEG, PNG];

/// The built-in catalog
pub fn catalog() -> &'static [FileSignature] {
    SIGNATURES
}

/// Look up a signature by its format tag (case-insensitive)
pub fn lookup(tag: &str) -> Option<&'static FileSignature> {
    SIGNATURES.iter().find(|sig| sig.tag.eq_ignore_ascii_case(tag))
}
