//! Collision-safe output naming

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Replace characters that would let a recovered name leave the output
/// directory or break file creation.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// Split `name` into stem and extension (extension keeps its dot).
/// A leading dot does not start an extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && !name[..idx].chars().all(|c| c == '.') => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Candidate path for the `attempt`-th try: `name`, then `stem_1.ext`, ...
pub fn candidate_path(dir: &Path, name: &str, attempt: usize) -> PathBuf {
    if attempt == 0 {
        return dir.join(name);
    }
    let (stem, ext) = split_extension(name);
    dir.join(format!("{}_{}{}", stem, attempt, ext))
}

/// Create a new file for `name` under `dir`, never overwriting an existing
/// one. Returns the path actually used and the open handle.
pub fn create_unique(dir: &Path, name: &str) -> io::Result<(PathBuf, File)> {
    let mut attempt = 0;
    loop {
        let path = candidate_path(dir, name, attempt);
        attempt += 1;

        if path.exists() {
            continue;
        }

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            // Lost a race with another writer; try the next suffix
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("PHOTO.png"), ("PHOTO", ".png"));
        assert_eq!(split_extension("a.b.jpg"), ("a.b", ".jpg"));
        assert_eq!(split_extension("noext"), ("noext", ""));
        assert_eq!(split_extension(".png"), (".png", ""));
        assert_eq!(split_extension("...png"), ("...png", ""));
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("../etc.png"), ".._etc.png");
        assert_eq!(sanitize_name("A\\B.jpg"), "A_B.jpg");
        assert_eq!(sanitize_name("PHOTO.png"), "PHOTO.png");
    }

    #[test]
    fn test_candidate_paths() {
        let dir = Path::new("/out");
        assert_eq!(candidate_path(dir, "PHOTO.png", 0), dir.join("PHOTO.png"));
        assert_eq!(candidate_path(dir, "PHOTO.png", 1), dir.join("PHOTO_1.png"));
        assert_eq!(candidate_path(dir, "PHOTO.png", 12), dir.join("PHOTO_12.png"));
    }

    #[test]
    fn test_create_unique_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("PHOTO.png"), b"original").unwrap();

        let (first, _) = create_unique(dir.path(), "PHOTO.png").unwrap();
        let (second, _) = create_unique(dir.path(), "PHOTO.png").unwrap();

        assert_eq!(first, dir.path().join("PHOTO_1.png"));
        assert_eq!(second, dir.path().join("PHOTO_2.png"));
        assert_eq!(std::fs::read(dir.path().join("PHOTO.png")).unwrap(), b"original");
    }
}
