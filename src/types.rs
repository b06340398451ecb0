//! Shared types passed between the scan, cache, and process stages.

use std::path::{Path, PathBuf};

/// A file proposed for thumbnailing.
///
/// Produced by [`scan`](crate::scan) and consumed by the
/// [`ResizeGate`](crate::cache::ResizeGate). The extension is stored
/// lower-cased with its leading dot (`photo.JPG` → `.jpg`) because it becomes
/// part of the output file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Full path to the source file.
    pub path: PathBuf,
    /// File name as found on disk, used in reports. Bytes that are not
    /// valid UTF-8 are shown as U+FFFD; `path` keeps the exact name.
    pub file_name: String,
    /// Lower-cased extension including the leading dot.
    pub extension: String,
}

impl Candidate {
    /// Build a candidate from a path. Returns `None` for paths without a
    /// file name or without an extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        let ext = path.extension()?.to_string_lossy();
        if ext.is_empty() {
            return None;
        }
        Some(Self {
            path: path.to_path_buf(),
            file_name,
            extension: format!(".{}", ext.to_lowercase()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_lowercases_extension() {
        let c = Candidate::from_path(Path::new("/photos/Beach.JPG")).unwrap();
        assert_eq!(c.file_name, "Beach.JPG");
        assert_eq!(c.extension, ".jpg");
        assert_eq!(c.path, PathBuf::from("/photos/Beach.JPG"));
    }

    #[test]
    fn candidate_uses_last_extension() {
        let c = Candidate::from_path(Path::new("archive.tar.png")).unwrap();
        assert_eq!(c.extension, ".png");
    }

    #[test]
    fn candidate_requires_extension() {
        assert!(Candidate::from_path(Path::new("README")).is_none());
        assert!(Candidate::from_path(Path::new(".hidden")).is_none());
        assert!(Candidate::from_path(Path::new("trailing.")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn candidate_accepts_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("/photos").join(OsStr::from_bytes(b"\xff\xfe.JPG"));
        let c = Candidate::from_path(&path).unwrap();
        assert_eq!(c.path, path);
        assert_eq!(c.file_name, "\u{FFFD}\u{FFFD}.JPG");
        assert_eq!(c.extension, ".jpg");
    }
}
