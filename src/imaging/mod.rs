//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` (header only) |
//! | **Thumbnail** | Lanczos3 fill resize + center crop |
//! | **Write** | `tempfile` sibling, linked into place without clobbering |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for fill and crop geometry (unit testable)
//! - **Parameters**: Data structures describing a thumbnail operation
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use params::{Quality, ThumbnailParams};
pub use rust_backend::{PARTIAL_PREFIX, PARTIAL_SUFFIX, RustBackend, supported_extensions};
