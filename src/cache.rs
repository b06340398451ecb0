//! Content-addressed resize cache.
//!
//! Resizing is the only expensive step of a run. This module decides, one
//! candidate at a time, whether it is needed at all.
//!
//! # Design
//!
//! ## Cache keys
//!
//! The cache is **content-addressed**: a thumbnail is stored under
//! `<sha256-hex><extension>` in the output directory, where the digest is
//! computed from the source file's bytes (see [`crate::hash`]). Renaming,
//! moving, or duplicating a source file never causes a second resize; only
//! new content does. The extension stays part of the key because the output
//! is re-encoded in the format the extension names, so `x.png` and `x.gif`
//! with identical bytes get one thumbnail each.
//!
//! ## No manifest
//!
//! The output directory *is* the cache. An artifact existing at the target
//! path is authoritative: the gate skips without comparing contents, since
//! the name already encodes them. Deleting a thumbnail is the way to force
//! it to be regenerated.
//!
//! ## Failures
//!
//! [`ResizeGate::process`] never returns an error. Read and resize failures
//! become [`Outcome::Failed`] and leave no artifact behind, so the next run
//! retries them naturally.
//!
//! ## Concurrent writers
//!
//! Thumbnails are written to a temporary file and linked into place without
//! clobbering. If another process wins the race between the existence check
//! and the write, the loser reports [`Outcome::Skipped`].

use crate::config::Config;
use crate::hash::{self, ContentDigest, HashError};
use crate::imaging::{BackendError, ImageBackend, Quality, ThumbnailParams};
use crate::types::Candidate;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Output file name for a piece of content: digest followed by extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub digest: ContentDigest,
    /// Lower-cased extension including the leading dot.
    pub extension: String,
}

impl CacheKey {
    pub fn new(digest: ContentDigest, extension: &str) -> Self {
        Self {
            digest,
            extension: extension.to_lowercase(),
        }
    }

    /// The artifact's file name inside the output directory.
    pub fn file_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.digest, self.extension)
    }
}

impl Serialize for CacheKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Why a candidate was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FailureReason {
    /// The source could not be read while hashing. No resize was attempted.
    ReadError(String),
    /// The source was hashed but its image data could not be decoded.
    DecodeError(String),
    /// Any other resize failure: encoding, unsupported output, disk I/O.
    ResizeError(String),
}

impl From<&HashError> for FailureReason {
    fn from(err: &HashError) -> Self {
        FailureReason::ReadError(err.to_string())
    }
}

impl From<&BackendError> for FailureReason {
    fn from(err: &BackendError) -> Self {
        if err.is_decode() {
            FailureReason::DecodeError(err.to_string())
        } else {
            FailureReason::ResizeError(err.to_string())
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::ReadError(msg) => write!(f, "read error: {msg}"),
            FailureReason::DecodeError(msg) => write!(f, "decode error: {msg}"),
            FailureReason::ResizeError(msg) => write!(f, "resize error: {msg}"),
        }
    }
}

/// Terminal state of one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// An artifact for this key already existed; the backend was not called.
    Skipped { key: CacheKey },
    /// A new artifact was written under `key`.
    Resized { key: CacheKey },
    /// The candidate was abandoned; nothing was written.
    Failed { reason: FailureReason },
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

/// Result of a dry lookup: where the artifact lives and whether it exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub key: CacheKey,
    pub target: PathBuf,
    pub cached: bool,
}

/// Decides per candidate whether a thumbnail must be produced.
///
/// Holds no state between candidates; the output directory is the only
/// thing one call can observe from another.
pub struct ResizeGate<'a, B: ImageBackend> {
    backend: &'a B,
    output_dir: PathBuf,
    width: u32,
    height: u32,
    quality: Quality,
}

impl<'a, B: ImageBackend> ResizeGate<'a, B> {
    pub fn new(backend: &'a B, config: &Config) -> Self {
        Self {
            backend,
            output_dir: config.output_dir.clone(),
            width: config.thumbnails.width,
            height: config.thumbnails.height,
            quality: Quality::new(config.thumbnails.quality),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Hash the candidate and build its key.
    pub fn cache_key(&self, candidate: &Candidate) -> Result<CacheKey, HashError> {
        let digest = hash::hash_file(&candidate.path)?;
        Ok(CacheKey::new(digest, &candidate.extension))
    }

    pub fn target_path(&self, key: &CacheKey) -> PathBuf {
        self.output_dir.join(key.file_name())
    }

    /// Hash and check the cache without resizing anything.
    pub fn lookup(&self, candidate: &Candidate) -> Result<Lookup, HashError> {
        let key = self.cache_key(candidate)?;
        let target = self.target_path(&key);
        let cached = target.exists();
        Ok(Lookup {
            key,
            target,
            cached,
        })
    }

    /// Run one candidate through hash → existence check → resize.
    pub fn process(&self, candidate: &Candidate) -> Outcome {
        let Lookup {
            key,
            target,
            cached,
        } = match self.lookup(candidate) {
            Ok(lookup) => lookup,
            Err(e) => {
                warn!(file = %candidate.file_name, error = %e, "hashing failed");
                return Outcome::Failed {
                    reason: FailureReason::from(&e),
                };
            }
        };
        debug!(file = %candidate.file_name, key = %key, "hashed");

        if cached {
            debug!(file = %candidate.file_name, key = %key, "already cached");
            return Outcome::Skipped { key };
        }

        let params = ThumbnailParams {
            source: candidate.path.clone(),
            output: target,
            crop_width: self.width,
            crop_height: self.height,
            quality: self.quality,
        };

        match self.backend.thumbnail(&params) {
            Ok(()) => {
                debug!(file = %candidate.file_name, key = %key, "resized");
                Outcome::Resized { key }
            }
            Err(BackendError::Io(e)) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!(file = %candidate.file_name, key = %key, "written concurrently");
                Outcome::Skipped { key }
            }
            Err(e) => {
                warn!(file = %candidate.file_name, error = %e, "resize failed");
                Outcome::Failed {
                    reason: FailureReason::from(&e),
                }
            }
        }
    }
}

/// Summary of cache performance for a run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub resized: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl CacheStats {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Resized { .. } => self.resized += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.resized + self.skipped + self.failed
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failed > 0 {
            write!(
                f,
                "{} resized, {} skipped, {} failed ({} total)",
                self.resized,
                self.skipped,
                self.failed,
                self.total()
            )
        } else if self.skipped > 0 {
            write!(
                f,
                "{} resized, {} skipped ({} total)",
                self.resized,
                self.skipped,
                self.total()
            )
        } else {
            write!(f, "{} resized", self.resized)
        }
    }
}
