//! # Print Configuration
//!
//! [`PrintParameters`] is the fully resolved description of one print: what
//! to print, where to send it and how to render it. Both the CLI and
//! [`crate::options::RawOptions`] produce one.

use std::path::PathBuf;
use std::time::Duration;

use crate::render::PrepareOptions;
use crate::transport::{DEFAULT_CHUNK_SIZE, DEFAULT_LINE_SLEEP, Pacing, serial::DEFAULT_BAUD};

/// Default printable width in dots (58 mm paper at 203 dpi).
pub const DEFAULT_TARGET_WIDTH: u32 = 384;

/// Default linear contrast applied before binarization.
pub const DEFAULT_CONTRAST: f32 = 1.3;

/// Default threshold for non-dithered output.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Everything [`crate::job::run`] needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintParameters {
    /// Source image
    pub image: PathBuf,
    /// Serial device; only optional when `dry_run` is set
    pub device: Option<String>,
    /// Output width in dots
    pub target_width: u32,
    pub baud: u32,
    pub autorotate: bool,
    /// Cancel and reset the printer before the job
    pub pre_cancel: bool,
    /// Swap black and white in the transmitted data
    pub invert: bool,
    pub dither: bool,
    pub threshold: u8,
    pub contrast: f32,
    pub gamma: f32,
    pub chunk_size: usize,
    pub line_sleep: Duration,
    /// Print at most this many rows; `None` or `Some(0)` prints everything
    pub row_limit: Option<u32>,
    pub preview: Option<PathBuf>,
    /// Write the job stream here instead of printing
    pub dry_run: Option<PathBuf>,
}

impl Default for PrintParameters {
    fn default() -> Self {
        Self {
            image: PathBuf::new(),
            device: None,
            target_width: DEFAULT_TARGET_WIDTH,
            baud: DEFAULT_BAUD,
            autorotate: true,
            pre_cancel: false,
            invert: false,
            dither: true,
            threshold: DEFAULT_THRESHOLD,
            contrast: DEFAULT_CONTRAST,
            gamma: 1.0,
            chunk_size: DEFAULT_CHUNK_SIZE,
            line_sleep: DEFAULT_LINE_SLEEP,
            row_limit: None,
            preview: None,
            dry_run: None,
        }
    }
}

impl PrintParameters {
    /// Parameters for printing `image` on `device` with everything else default.
    pub fn new(image: impl Into<PathBuf>, device: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            device: Some(device.into()),
            ..Default::default()
        }
    }

    /// The image-preparation subset.
    pub fn prepare_options(&self) -> PrepareOptions {
        PrepareOptions {
            target_width: self.target_width,
            contrast: self.contrast,
            gamma: self.gamma,
            dither: self.dither,
            threshold: self.threshold,
            autorotate: self.autorotate,
            preview: self.preview.clone(),
        }
    }

    /// The transmission pacing subset.
    pub fn pacing(&self) -> Pacing {
        Pacing {
            chunk_size: self.chunk_size,
            line_sleep: self.line_sleep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PrintParameters::default();
        assert_eq!(params.baud, 9600);
        assert_eq!(params.target_width, 384);
        assert!(params.autorotate);
        assert!(!params.pre_cancel);
        assert!(!params.invert);
        assert!(params.dither);
        assert_eq!(params.threshold, 128);
        assert_eq!(params.chunk_size, 4096);
        assert_eq!(params.line_sleep, Duration::from_millis(20));
        assert_eq!(params.row_limit, None);
    }

    #[test]
    fn test_prepare_options_projection() {
        let params = PrintParameters {
            target_width: 576,
            dither: false,
            threshold: 90,
            preview: Some(PathBuf::from("/tmp/p.png")),
            ..PrintParameters::new("photo.jpg", "/dev/ttyUSB0")
        };
        let opts = params.prepare_options();
        assert_eq!(opts.target_width, 576);
        assert!(!opts.dither);
        assert_eq!(opts.threshold, 90);
        assert_eq!(opts.contrast, 1.3);
        assert_eq!(opts.preview, Some(PathBuf::from("/tmp/p.png")));
    }

    #[test]
    fn test_pacing_projection() {
        let params = PrintParameters {
            chunk_size: 512,
            line_sleep: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(
            params.pacing(),
            Pacing {
                chunk_size: 512,
                line_sleep: Duration::ZERO
            }
        );
    }
}
