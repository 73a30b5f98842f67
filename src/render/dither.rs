//! # Binarization and Bit Packing
//!
//! Turns an 8-bit grayscale image into a bilevel one (every pixel 0 or 255)
//! and packs bilevel rows into bytes.
//!
//! ## Methods
//!
//! | Method | Speed | Quality | Artifacts |
//! |--------|-------|---------|-----------|
//! | Floyd-Steinberg | Slow | Good | Noise, worms |
//! | Threshold | Fastest | Poor | Banding |
//!
//! ## Floyd-Steinberg Error Diffusion
//!
//! Each pixel is quantized to black or white and the quantization error is
//! pushed onto the unvisited neighbours:
//!
//! ```text
//!              X    7/16
//!     3/16   5/16   1/16
//! ```
//!
//! ## Packed Layout
//!
//! Rows are packed MSB-first: bit 7 of byte 0 is the leftmost pixel. A set
//! bit means **white**, so a row of white pixels packs to `0xFF` bytes. Pad
//! bits at the end of a row are left clear.

use image::{GrayImage, Luma};

/// Accumulated levels above this quantize to white.
const DIFFUSION_THRESHOLD: i16 = 128;

const WHITE: u8 = 255;
const BLACK: u8 = 0;

/// Apply Floyd-Steinberg dithering to a grayscale image.
///
/// ```
/// use escpos_raster::render::dither::floyd_steinberg;
/// use image::{GrayImage, Luma};
///
/// let gray = GrayImage::from_pixel(8, 8, Luma([128]));
/// let out = floyd_steinberg(&gray);
/// assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
/// ```
pub fn floyd_steinberg(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let (w, h) = (width as usize, height as usize);

    // i16 so diffused error can overshoot 0..=255 without wrapping
    let mut buffer: Vec<i16> = img.pixels().map(|p| i16::from(p[0])).collect();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            // accumulated level is clamped before quantizing
            let old = buffer[idx].clamp(0, 255);
            let new = if old > DIFFUSION_THRESHOLD { 255 } else { 0 };
            buffer[idx] = new;
            let error = old - new;

            if x + 1 < w {
                buffer[idx + 1] += error * 7 / 16;
            }
            if y + 1 < h {
                if x > 0 {
                    buffer[idx + w - 1] += error * 3 / 16;
                }
                buffer[idx + w] += error * 5 / 16;
                if x + 1 < w {
                    buffer[idx + w + 1] += error / 16;
                }
            }
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        Luma([buffer[y as usize * w + x as usize].clamp(0, 255) as u8])
    })
}

/// Fixed-threshold conversion without dithering.
///
/// Pixels darker than `threshold` become black, all others white.
pub fn threshold(img: &GrayImage, threshold: u8) -> GrayImage {
    let mut output = img.clone();
    for pixel in output.pixels_mut() {
        pixel[0] = if pixel[0] < threshold { BLACK } else { WHITE };
    }
    output
}

/// Pack a row of pixel flags into bytes, MSB first.
///
/// `true` sets the bit. The last byte is padded with clear bits.
///
/// ```
/// use escpos_raster::render::dither::pack_row;
///
/// assert_eq!(pack_row(&[true, true, true, true, false, false, false, false]), vec![0xF0]);
/// assert_eq!(pack_row(&[true; 12]), vec![0xFF, 0xF0]);
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let num_bytes = pixels.len().div_ceil(8);
    let mut bytes = vec![0u8; num_bytes];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }

    bytes
}

/// Pack a bilevel image into row-major bytes where a set bit is white.
///
/// Returns `ceil(width / 8) × height` bytes.
pub fn pack_bilevel(img: &GrayImage) -> Vec<u8> {
    let (width, height) = img.dimensions();
    let row_bytes = (width as usize).div_ceil(8);
    let mut data = Vec::with_capacity(row_bytes * height as usize);

    let mut row = Vec::with_capacity(width as usize);
    for y in 0..height {
        row.clear();
        row.extend((0..width).map(|x| img.get_pixel(x, y)[0] != BLACK));
        data.extend(pack_row(&row));
    }

    data
}

/// Count `(black, white)` pixels of a bilevel image.
pub fn count_levels(img: &GrayImage) -> (usize, usize) {
    let black = img.pixels().filter(|p| p[0] == BLACK).count();
    let total = img.width() as usize * img.height() as usize;
    (black, total - black)
}

// ============================================================================
// TESTS
// ============================================================================
