//! # Rendering Module
//!
//! Image preparation for raster printing.
//!
//! ## Modules
//!
//! - [`prepare`]: Load, rotate, resize and binarize a source image
//! - [`tone`]: Auto-contrast, contrast and gamma lookup tables
//! - [`dither`]: Floyd-Steinberg and threshold binarization, bit packing
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::path::Path;
//! use escpos_raster::diagnostics::LogDiagnostics;
//! use escpos_raster::render::prepare::{prepare, PrepareOptions};
//!
//! let options = PrepareOptions { target_width: 384, ..Default::default() };
//! let bitmap = prepare(Path::new("photo.jpg"), &options, &LogDiagnostics)?;
//! assert_eq!(bitmap.width(), 384);
//! # Ok::<(), escpos_raster::PrintError>(())
//! ```

pub mod dither;
pub mod prepare;
pub mod tone;

pub use prepare::{PrepareOptions, PreparedBitmap};
