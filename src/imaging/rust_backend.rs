//! Pure Rust image processing backend with no system dependencies.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP, TIFF) | `image::ImageReader` with content sniffing |
//! | Center crop | `image::DynamicImage::crop_imm` at [`calculate_center_crop`], in source pixels |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode | `image` encoders, format picked from the output extension |
//! | Atomic write | `tempfile` sibling + `persist_noclobber` |
//!
//! [`calculate_center_crop`]: super::calculations::calculate_center_crop

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_center_crop;
use super::params::{Quality, ThumbnailParams};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;

/// Extensions mapped to the format the thumbnail is written in.
///
/// The output keeps the source extension, so this table is also the set of
/// extensions a candidate may carry.
const FORMAT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("gif", ImageFormat::Gif),
    ("webp", ImageFormat::WebP),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    FORMAT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled() && fmt.writing_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the extensions that can be both decoded and re-encoded.
pub fn supported_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// File name prefix of in-flight thumbnail writes in the output directory.
pub const PARTIAL_PREFIX: &str = ".thumbcache-";
/// File name suffix of in-flight thumbnail writes in the output directory.
pub const PARTIAL_SUFFIX: &str = ".part";

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the encoder format from an output path's extension.
fn output_format(path: &Path) -> Result<ImageFormat, BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    FORMAT_CANDIDATES
        .iter()
        .find(|(candidate, fmt)| *candidate == ext && fmt.writing_enabled())
        .map(|(_, fmt)| *fmt)
        .ok_or(BackendError::UnsupportedFormat(ext))
}

/// Load and decode an image from disk.
///
/// The format is sniffed from the leading bytes; the extension is only a
/// fallback, so a PNG saved as `.jpg` still decodes.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    let decode_error = |message: String| BackendError::Decode {
        path: path.to_path_buf(),
        message,
    };

    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| decode_error(e.to_string()))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(decode_error("image has no pixels".into()));
    }
    Ok(img)
}

/// Cut the centered region with the target's aspect ratio, then scale it
/// to exactly `width`×`height`.
///
/// Cropping first keeps the resize buffer bounded by the output size, so a
/// 30000×1 banner costs a 1×1 crop rather than a 3840000×128 intermediate.
fn fill_and_crop(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let rect = calculate_center_crop((img.width(), img.height()), (width, height));
    img.crop_imm(rect.x, rect.y, rect.width, rect.height)
        .resize_exact(width, height, FilterType::Lanczos3)
}

/// Encode `img` into `writer` using `format`.
///
/// JPEG has no alpha channel and the GIF/WebP encoders only take RGBA, so
/// those are converted first.
fn encode<W: Write + std::io::Seek>(
    img: &DynamicImage,
    writer: &mut W,
    format: ImageFormat,
    quality: Quality,
) -> image::ImageResult<()> {
    match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(writer, quality.value() as u8);
            DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)
        }
        ImageFormat::Gif | ImageFormat::WebP => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(writer, format)
        }
        other => img.write_to(writer, other),
    }
}

/// Save a DynamicImage to `path` without ever exposing a partial file.
///
/// The image is encoded into a hidden temporary file in the destination
/// directory and then linked into place. If `path` already exists the
/// temporary file is discarded and an `AlreadyExists` I/O error is returned.
fn save_image(
    img: &DynamicImage,
    path: &Path,
    format: ImageFormat,
    quality: Quality,
) -> Result<(), BackendError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .suffix(PARTIAL_SUFFIX)
        .tempfile_in(dir)?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        encode(img, &mut writer, format, quality).map_err(|e| BackendError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        writer.flush()?;
    }

    tmp.persist_noclobber(path).map_err(|e| e.error)?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| BackendError::Decode {
            path: path.to_path_buf(),
            message: format!("Failed to read dimensions: {}", e),
        })?;
        Ok(Dimensions { width, height })
    }

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
        let format = output_format(&params.output)?;
        let img = load_image(&params.source)?;
        let thumb = fill_and_crop(&img, params.crop_width, params.crop_height);
        save_image(&thumb, &params.output, format, params.quality)
    }
}
