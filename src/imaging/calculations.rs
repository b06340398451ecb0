//! Pure calculation functions for the fill-then-crop transform.
//!
//! The crop is computed in source pixels, before any scaling: cut the
//! largest centered region with the target's aspect ratio, then scale that
//! region to the target size. The intermediate buffer is never larger than
//! the source or the output, whatever the source's proportions.
//!
//! All functions here are pure and testable without any I/O or images.

/// A rectangle cut out of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Calculate the largest centered region of `source` with `target`'s aspect ratio.
///
/// Scaling this region to `target` gives the same picture as scaling the
/// whole source to cover `target` and cropping the overflow. Excess is split
/// evenly between both sides of the long axis; an odd remainder goes to the
/// right/bottom edge. The region is at least 1×1.
pub fn calculate_center_crop(source: (u32, u32), target: (u32, u32)) -> CropRect {
    let (src_w, src_h) = (source.0 as u64, source.1 as u64);
    let (tgt_w, tgt_h) = (target.0 as u64, target.1 as u64);

    let (width, height) = if src_w * tgt_h > tgt_w * src_h {
        // Source is wider: keep full height, trim the sides
        let w = (src_h * tgt_w + tgt_h / 2) / tgt_h;
        (w.clamp(1, src_w), src_h)
    } else {
        // Source is taller (or equal): keep full width, trim top and bottom
        let h = (src_w * tgt_h + tgt_w / 2) / tgt_w;
        (src_w, h.clamp(1, src_h))
    };

    CropRect {
        x: ((src_w - width) / 2) as u32,
        y: ((src_h - height) / 2) as u32,
        width: width as u32,
        height: height as u32,
    }
}
