//! # Image Preparation
//!
//! Loads a source image from disk and turns it into a [`PreparedBitmap`]:
//!
//! ```text
//! load → autorotate → resize → grayscale → autocontrast → contrast → gamma
//!      → binarize (dither | threshold) → preview → pack
//! ```

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, ImageReader, Luma, imageops::FilterType};

use super::{dither, tone};
use crate::diagnostics::Diagnostics;
use crate::error::PrintError;

/// Contrast or gamma values this close to 1.0 are treated as neutral.
const NEUTRAL_EPSILON: f32 = 1e-3;

/// Settings for [`prepare`].
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareOptions {
    /// Output width in pixels (printer dots)
    pub target_width: u32,
    /// Linear contrast factor, 1.0 = neutral
    pub contrast: f32,
    /// Gamma correction, 1.0 = neutral
    pub gamma: f32,
    /// Floyd-Steinberg dithering when true, fixed threshold otherwise
    pub dither: bool,
    /// Threshold used when `dither` is false
    pub threshold: u8,
    /// Rotate landscape images to portrait
    pub autorotate: bool,
    /// Where to save the 1-bit image, if anywhere
    pub preview: Option<PathBuf>,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            target_width: 384,
            contrast: 1.3,
            gamma: 1.0,
            dither: true,
            threshold: 128,
            autorotate: true,
            preview: None,
        }
    }
}

/// A monochrome image packed MSB-first, one row after another.
///
/// A set bit is a white pixel, a clear bit a black one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedBitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PreparedBitmap {
    /// Wrap packed data. `data` must hold exactly `ceil(width/8) × height` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PrintError> {
        let expected = (width as usize).div_ceil(8) * height as usize;
        if data.len() != expected {
            return Err(PrintError::invalid(
                "bitmap",
                data.len(),
                format!("expected {expected} bytes for {width}x{height}"),
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Pack a bilevel image (pixels 0 or 255).
    pub fn from_bilevel(img: &GrayImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            data: dither::pack_bilevel(img),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row, `ceil(width / 8)`.
    pub fn row_bytes(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// True if the pixel at `(x, y)` is white.
    pub fn is_white(&self, x: u32, y: u32) -> bool {
        let byte = self.data[y as usize * self.row_bytes() + x as usize / 8];
        (byte >> (7 - (x % 8))) & 1 == 1
    }

    /// Unpack back into a bilevel grayscale image.
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([if self.is_white(x, y) { 255 } else { 0 }])
        })
    }
}

/// Load `path` and produce a packed 1-bit bitmap.
///
/// ## Errors
///
/// - [`PrintError::ImageNotFound`] if `path` does not exist
/// - [`PrintError::ImageLoad`] if it cannot be decoded
/// - [`PrintError::InvalidParameter`] if `target_width` is 0
///
/// A preview that fails to save is reported through `diag` and otherwise ignored.
pub fn prepare(
    path: &Path,
    options: &PrepareOptions,
    diag: &dyn Diagnostics,
) -> Result<PreparedBitmap, PrintError> {
    diag.info(&format!("Loading image: {}", path.display()));
    let source = load_image(path)?;
    let bilevel = binarize(source, options, diag)?;

    let (black, white) = dither::count_levels(&bilevel);
    let total = if black + white > 0 { black + white } else { 1 };
    let black_ratio = 100.0 * black as f64 / total as f64;
    let method = if options.dither {
        "dither=FS".to_string()
    } else {
        format!("no-dither threshold={}", options.threshold)
    };
    diag.info(&format!(
        "Image ready: {}x{} (1-bit, {}, black={:.1}%)",
        bilevel.width(),
        bilevel.height(),
        method,
        black_ratio
    ));

    if let Some(preview) = &options.preview {
        match save_preview(&bilevel, preview) {
            Ok(()) => diag.info(&format!("Preview written: {}", preview.display())),
            Err(e) => diag.warn(&format!("Preview failed: {}", e)),
        }
    }

    Ok(PreparedBitmap::from_bilevel(&bilevel))
}

/// Run every step between a decoded image and its bilevel version.
pub fn binarize(
    source: DynamicImage,
    options: &PrepareOptions,
    diag: &dyn Diagnostics,
) -> Result<GrayImage, PrintError> {
    if options.target_width == 0 {
        return Err(PrintError::invalid("target_width", 0, "must be > 0"));
    }

    let rgb = DynamicImage::ImageRgb8(source.into_rgb8());

    let rotated = if options.autorotate && rgb.width() > rgb.height() {
        diag.info("Rotating 90 degrees to portrait");
        rgb.rotate270()
    } else {
        if options.autorotate {
            diag.debug("No rotation needed");
        } else {
            diag.debug("Autorotate disabled");
        }
        rgb
    };

    let (width, height) = scaled_size(rotated.width(), rotated.height(), options.target_width);
    let resized = rotated.resize_exact(width, height, FilterType::Lanczos3);

    let mut gray = grayscale(&resized);
    tone::autocontrast(&mut gray);

    if (options.contrast - 1.0).abs() > NEUTRAL_EPSILON {
        tone::contrast(&mut gray, options.contrast);
    }
    if (options.gamma - 1.0).abs() >= NEUTRAL_EPSILON {
        tone::gamma(&mut gray, options.gamma);
    }

    Ok(if options.dither {
        dither::floyd_steinberg(&gray)
    } else {
        dither::threshold(&gray, options.threshold)
    })
}

/// Convert to 8-bit luma with ITU-R 601 weights (0.299, 0.587, 0.114).
pub fn grayscale(img: &DynamicImage) -> GrayImage {
    let rgb = img.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
        Luma([luma as u8])
    })
}

/// Width and height after scaling to `target_width`, keeping aspect ratio.
///
/// The height is rounded down and never drops below one row.
pub fn scaled_size(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    let scaled = height as u64 * target_width as u64 / width.max(1) as u64;
    (target_width, scaled.clamp(1, u32::MAX as u64) as u32)
}

fn load_image(path: &Path) -> Result<DynamicImage, PrintError> {
    if !path.exists() {
        return Err(PrintError::ImageNotFound(path.to_path_buf()));
    }

    let load_err = |source| PrintError::ImageLoad {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .map_err(|e| load_err(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| load_err(image::ImageError::IoError(e)))?
        .decode()
        .map_err(load_err)
}

fn save_preview(img: &GrayImage, path: &Path) -> Result<(), PrintError> {
    img.save(path)
        .map_err(|e| PrintError::Preview(format!("{}: {}", path.display(), e)))
}

// ============================================================================
// TESTS
// ============================================================================
