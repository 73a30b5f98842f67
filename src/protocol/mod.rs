//! # ESC/POS Protocol
//!
//! Low-level byte builders for the ESC/POS commands used by this crate.
//!
//! ## Module Structure
//!
//! - [`commands`]: Control commands (init, cancel, line spacing, feed, cut)
//! - [`graphics`]: Raster band header (`GS v 0`)
//!
//! ## Usage Example
//!
//! ```
//! use escpos_raster::protocol::{commands, graphics};
//!
//! let mut data = Vec::new();
//! data.extend(commands::job_preamble());
//!
//! // One 8-row band, 48 bytes (384 dots) wide, all white (set bit = white)
//! data.extend(graphics::raster_header(48, 8));
//! data.extend(vec![0xFF; 48 * 8]);
//!
//! data.extend(commands::job_trailer());
//! assert_eq!(data.len(), 4 + 8 + 48 * 8 + 6);
//! ```

pub mod commands;
pub mod graphics;
