//! # escpos-raster - Photo Printing for ESC/POS Thermal Printers
//!
//! escpos-raster turns an image file into a monochrome raster and sends it to
//! an ESC/POS receipt printer over a serial line. It provides:
//!
//! - **Image preparation**: rotation, resizing, tone curves, Floyd-Steinberg dithering
//! - **Raster bands**: `GS v 0` commands of at most 255 rows
//! - **Transport**: raw serial tty with paced, chunked writes, or a dry-run file
//! - **Maintenance**: cancel/reset and a hello test print
//!
//! ## Quick Start
//!
//! ```no_run
//! use escpos_raster::{
//!     diagnostics::LogDiagnostics,
//!     raster,
//!     render::{PrepareOptions, prepare::prepare},
//!     transport::{self, Pacing, SerialPort},
//! };
//! use std::path::Path;
//!
//! let diag = LogDiagnostics;
//!
//! // 1-bit bitmap, 384 dots wide
//! let options = PrepareOptions { target_width: 384, ..Default::default() };
//! let bitmap = prepare(Path::new("photo.jpg"), &options, &diag)?;
//!
//! // Bands, with black and white swapped for printers that expect 1 = black
//! let job = raster::build(bitmap, true, None, &diag)?;
//!
//! let mut port = SerialPort::open("/dev/ttyUSB0", 9600)?;
//! transport::print_job(&mut port, &job, &Pacing::default(), &diag)?;
//!
//! # Ok::<(), escpos_raster::PrintError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`render`] | Image loading, tone adjustment and binarization |
//! | [`raster`] | Band splitting and inversion |
//! | [`protocol`] | ESC/POS command builders |
//! | [`transport`] | Serial and file sinks |
//! | [`job`] | One print, start to finish |
//! | [`maintenance`] | Cancel and hello |
//! | [`config`] / [`options`] | Print parameters and host option resolution |
//! | [`diagnostics`] | Progress reporting |
//! | [`error`] | Error types and exit codes |

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod job;
pub mod maintenance;
pub mod options;
pub mod protocol;
pub mod raster;
pub mod render;
pub mod transport;

// Re-exports for convenience
pub use config::PrintParameters;
pub use diagnostics::{Diagnostics, LogDiagnostics};
pub use error::PrintError;
pub use maintenance::Maintenance;
pub use raster::RasterJob;
pub use render::PreparedBitmap;
pub use transport::{Link, SerialPort};
