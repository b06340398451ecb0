//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the cache gate (which decides whether a thumbnail is
//! needed and where it goes) and the [`backend`](super::backend) (which does
//! the actual pixel work). The split lets tests swap in a mock backend
//! without touching gate logic.
//!
//! ## Types
//!
//! - [`Quality`]: lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`ThumbnailParams`]: everything a thumbnail needs: source, output, crop dimensions, quality.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
///
/// Only JPEG output honours it; PNG and GIF are lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Parameters for a thumbnail operation (fill-resize + center crop).
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Final crop dimensions.
    pub crop_width: u32,
    pub crop_height: u32,
    pub quality: Quality,
}
