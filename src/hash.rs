//! Content hashing for the resize cache.
//!
//! The cache is keyed by what a file *contains*, not what it is called: two
//! copies of the same photo under different names resolve to the same
//! [`ContentDigest`], and renaming a file never invalidates its thumbnail.
//!
//! SHA-256 gives collision odds far below anything a photo library will hit,
//! and the hex digest doubles as a filesystem-safe file name stem.
//!
//! Files are read in fixed 64 KiB chunks so that peak memory stays flat
//! regardless of how large the source image is.

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lowercase hex SHA-256 of a byte sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SHA-256 hash of a file's contents, streamed in fixed-size chunks.
///
/// Any open or read failure aborts the whole computation; no partial digest
/// is ever returned.
pub fn hash_file(path: &Path) -> Result<ContentDigest, HashError> {
    let read_error = |source| HashError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_error)?;
    let mut reader = BufReader::with_capacity(CHUNK_SIZE, file);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_error(e)),
        };
        hasher.update(&buffer[..n]);
    }

    Ok(ContentDigest(format!("{:x}", hasher.finalize())))
}

/// SHA-256 hash of an in-memory buffer.
pub fn hash_bytes(data: &[u8]) -> ContentDigest {
    ContentDigest(format!("{:x}", Sha256::digest(data)))
}
