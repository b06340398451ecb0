//! Shared test utilities for the thumbcache test suite.
//!
//! Provides synthetic image writers and pixel assertions so that backend,
//! gate, and driver tests can work with real encoded files without shipping
//! binary fixtures.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! create_banded_image(&tmp.path().join("bands.png"), 256, 128);
//! ```

use image::{DynamicImage, Rgb, RgbImage};
use std::path::Path;

pub const RED: [u8; 3] = [220, 20, 20];
pub const GREEN: [u8; 3] = [20, 200, 40];
pub const BLUE: [u8; 3] = [30, 40, 210];

// =========================================================================
// Image writers (format follows the path's extension)
// =========================================================================

/// Write a gradient image of the given size.
pub fn create_test_image(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    save(DynamicImage::ImageRgb8(img), path);
}

/// Write an image split into three vertical bands: red for the first
/// quarter, green for the middle half, blue for the last quarter.
pub fn create_banded_image(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, _| {
        if x < width / 4 {
            Rgb(RED)
        } else if x < width * 3 / 4 {
            Rgb(GREEN)
        } else {
            Rgb(BLUE)
        }
    });
    save(DynamicImage::ImageRgb8(img), path);
}

fn save(img: DynamicImage, path: &Path) {
    let is_gif = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"));
    let img = if is_gif {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        img
    };
    img.save(path)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert every channel of `actual` is within `tolerance` of `expected`.
pub fn assert_close(actual: [u8; 3], expected: [u8; 3], tolerance: u8) {
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!(
            a.abs_diff(*e) <= tolerance,
            "pixel {actual:?} not within {tolerance} of {expected:?}"
        );
    }
}

/// Sorted file names in a directory.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
