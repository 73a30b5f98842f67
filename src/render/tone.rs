//! Tone mapping for 8-bit grayscale images: auto-contrast, linear contrast
//! and gamma. Every adjustment is a 256-entry lookup table applied per pixel.

use image::GrayImage;

/// Lookup table mapping one gray level to another.
pub type Lut = [u8; 256];

/// Identity lookup table.
pub fn identity_lut() -> Lut {
    std::array::from_fn(|i| i as u8)
}

/// Apply a lookup table to every pixel.
pub fn apply_lut(img: &mut GrayImage, lut: &Lut) {
    for pixel in img.pixels_mut() {
        pixel[0] = lut[pixel[0] as usize];
    }
}

/// Count occurrences of each gray level.
pub fn histogram(img: &GrayImage) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for pixel in img.pixels() {
        hist[pixel[0] as usize] += 1;
    }
    hist
}

/// Stretch the luminance range so the darkest present level maps to 0 and
/// the brightest to 255. Images with a single level are left as is.
pub fn autocontrast(img: &mut GrayImage) {
    let hist = histogram(img);
    let lo = hist.iter().position(|&n| n > 0);
    let hi = hist.iter().rposition(|&n| n > 0);

    let (Some(lo), Some(hi)) = (lo, hi) else {
        return;
    };
    if hi <= lo {
        return;
    }

    let scale = 255.0 / (hi - lo) as f32;
    let offset = -(lo as f32) * scale;
    let lut: Lut = std::array::from_fn(|i| (i as f32 * scale + offset).clamp(0.0, 255.0) as u8);
    apply_lut(img, &lut);
}

/// Mean gray level, rounded to the nearest integer.
pub fn mean_level(img: &GrayImage) -> f32 {
    let count = img.width() as u64 * img.height() as u64;
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = img.pixels().map(|p| p[0] as u64).sum();
    (sum as f64 / count as f64 + 0.5).floor() as f32
}

/// Build a linear contrast table around `center`.
///
/// - `factor > 1`: pushes levels away from the center
/// - `factor < 1`: pulls levels toward the center
/// - `factor = 1`: identity
pub fn contrast_lut(center: f32, factor: f32) -> Lut {
    std::array::from_fn(|i| (center + (i as f32 - center) * factor).clamp(0.0, 255.0) as u8)
}

/// Enhance contrast by `factor` around the image's mean level.
pub fn contrast(img: &mut GrayImage, factor: f32) {
    let lut = contrast_lut(mean_level(img), factor);
    apply_lut(img, &lut);
}

/// Build a gamma table: `out[i] = min(255, floor((i/255)^(1/gamma) × 255 + 0.5))`.
///
/// - gamma > 1: lightens midtones
/// - gamma < 1: darkens midtones
pub fn gamma_lut(gamma: f32) -> Lut {
    let exponent = 1.0 / gamma as f64;
    std::array::from_fn(|i| {
        let value = (i as f64 / 255.0).powf(exponent) * 255.0 + 0.5;
        value.floor().min(255.0) as u8
    })
}

/// Apply gamma correction through a table computed once per call.
pub fn gamma(img: &mut GrayImage, gamma: f32) {
    let lut = gamma_lut(gamma);
    apply_lut(img, &lut);
}
