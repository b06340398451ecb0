//! Candidate discovery.
//!
//! Lists the source directory and yields every file whose extension is in
//! [`DiscoveryConfig::extensions`](crate::config::DiscoveryConfig), in file
//! name order. Nothing here reads file contents; hashing and resizing are the
//! [`cache`](crate::cache) module's job.
//!
//! ## Layout
//!
//! ```text
//! images/                 # source_dir
//! ├── a.png               # candidate
//! ├── B.JPG               # candidate (extension match ignores case)
//! ├── notes.txt           # ignored
//! ├── trips/              # only walked when discovery.recursive = true
//! │   └── c.gif
//! └── resized/            # output_dir, never walked even when nested
//!     └── 3a7bd3e2…png
//! ```
//!
//! Symlinks are followed, so a source directory made of links into a larger
//! photo library works as expected.

use crate::config::Config;
use crate::imaging::{PARTIAL_PREFIX, PARTIAL_SUFFIX};
use crate::types::Candidate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Failed to list {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Create the output directory and any missing parents.
///
/// Must succeed before any candidate is processed; failure aborts the run.
pub fn prepare_output_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)?;
    // create_dir_all succeeds on an existing *file* on some platforms
    if !path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "path exists and is not a directory",
        ));
    }
    Ok(())
}

/// Delete temporary thumbnail files left in `dir` by an interrupted run.
///
/// Only files named like the backend's in-flight writes and untouched for at
/// least `older_than` are removed, so a concurrent run's current write is
/// left alone. Returns how many were deleted; failures are logged.
pub fn remove_stale_partials(dir: &Path, older_than: Duration) -> usize {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot list output directory");
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !(name.starts_with(PARTIAL_PREFIX) && name.ends_with(PARTIAL_SUFFIX)) {
            continue;
        }
        let stale = entry
            .metadata()
            .ok()
            .filter(|m| m.is_file())
            .and_then(|m| m.modified().ok())
            .and_then(|t| t.elapsed().ok())
            .is_some_and(|age| age >= older_than);
        if !stale {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => {
                debug!(file = %name, "removed stale partial");
                removed += 1;
            }
            Err(e) => warn!(file = %name, error = %e, "cannot remove stale partial"),
        }
    }
    removed
}

/// Discover candidates in `config.source_dir`.
///
/// Unreadable subdirectories are logged and skipped; an unreadable source
/// directory is an error.
pub fn discover(config: &Config) -> Result<Vec<Candidate>, ScanError> {
    let source = &config.source_dir;
    if !source.is_dir() {
        return Err(ScanError::SourceNotFound(source.clone()));
    }

    let output_canonical = fs::canonicalize(&config.output_dir).ok();
    let max_depth = if config.discovery.recursive {
        usize::MAX
    } else {
        1
    };

    let walker = WalkDir::new(source)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.file_type().is_dir() && is_same_dir(entry.path(), output_canonical.as_deref()))
        });

    let mut candidates = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(ScanError::Walk {
                    path: source.clone(),
                    source: e,
                });
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let recognized = path
            .extension()
            .is_some_and(|ext| config.discovery.recognizes(&ext.to_string_lossy()));
        if !recognized {
            continue;
        }
        candidates.extend(Candidate::from_path(path));
    }

    debug!(count = candidates.len(), source = %source.display(), "discovered candidates");
    Ok(candidates)
}

fn is_same_dir(path: &Path, canonical: Option<&Path>) -> bool {
    match canonical {
        Some(target) => fs::canonicalize(path).is_ok_and(|p| p == target),
        None => false,
    }
}
