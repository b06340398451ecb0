//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the cache gate needs
//! from a resize collaborator: identify and thumbnail.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust with zero
//! external dependencies. Everything is statically linked into the binary.

use super::params::ThumbnailParams;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
    #[error("Failed to encode {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

impl BackendError {
    /// Whether the failure came from unreadable or corrupt source data.
    pub fn is_decode(&self) -> bool {
        matches!(self, BackendError::Decode { .. })
    }
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `thumbnail` must either write a complete file at `params.output` or leave
/// nothing there at all.
pub trait ImageBackend {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Execute a thumbnail operation (fill-resize + center crop).
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError>;
}
