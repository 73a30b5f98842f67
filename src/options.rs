//! # Host Options
//!
//! [`RawOptions`] mirrors the `[ESC_POS]` section a photo-booth host keeps in
//! its configuration. Values arrive as strings where an empty string means
//! "not set", and are validated exactly once by [`RawOptions::resolve`].
//!
//! ```json
//! {
//!   "serial_device": "/dev/ttyS0",
//!   "target_width": 384,
//!   "baudrate": "9600",
//!   "pre_cancel": true,
//!   "invert": true,
//!   "contrast": "1.3",
//!   "gamma": "",
//!   "limit_lines": ""
//! }
//! ```
//!
//! A value that fails validation is reported as a warning and left out, so
//! the print uses the default for that setting.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::config::{DEFAULT_TARGET_WIDTH, PrintParameters};
use crate::diagnostics::Diagnostics;
use crate::error::PrintError;

/// Unvalidated host options. Missing keys take the host's defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawOptions {
    pub serial_device: String,
    pub target_width: u32,
    pub baudrate: String,
    pub no_autorotate: bool,
    pub pre_cancel: bool,
    pub invert: bool,
    pub no_dither: bool,
    /// Only read when `no_dither` is set
    pub threshold: String,
    pub contrast: String,
    pub gamma: String,
    pub chunk: String,
    pub line_sleep: String,
    pub limit_lines: String,
    pub preview: String,
    pub dry_run: String,
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            serial_device: "/dev/ttyS0".to_string(),
            target_width: DEFAULT_TARGET_WIDTH,
            baudrate: "9600".to_string(),
            no_autorotate: false,
            pre_cancel: true,
            invert: true,
            no_dither: false,
            threshold: "130".to_string(),
            contrast: "1.3".to_string(),
            gamma: String::new(),
            chunk: "4096".to_string(),
            line_sleep: "0.02".to_string(),
            limit_lines: String::new(),
            preview: String::new(),
            dry_run: String::new(),
        }
    }
}

impl RawOptions {
    /// Parse options from a JSON document.
    pub fn from_json(text: &str) -> Result<Self, PrintError> {
        serde_json::from_str(text)
            .map_err(|e| PrintError::invalid("options", "<json>", e.to_string()))
    }

    /// Load options from a JSON file.
    pub fn load(path: &Path) -> Result<Self, PrintError> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| PrintError::invalid("options", path.display(), e.to_string()))
    }

    /// Validate every option and build the parameters for printing `image`.
    ///
    /// Invalid values are reported through `diag` and replaced by defaults.
    pub fn resolve(&self, image: impl Into<PathBuf>, diag: &dyn Diagnostics) -> PrintParameters {
        let mut params = PrintParameters {
            image: image.into(),
            device: non_empty(&self.serial_device).map(str::to_string),
            autorotate: !self.no_autorotate,
            pre_cancel: self.pre_cancel,
            invert: self.invert,
            dither: !self.no_dither,
            preview: non_empty(&self.preview).map(PathBuf::from),
            dry_run: non_empty(&self.dry_run).map(PathBuf::from),
            ..Default::default()
        };

        if self.target_width > 0 {
            params.target_width = self.target_width;
        } else {
            skip(diag, PrintError::invalid("target_width", 0, "must be > 0"));
        }

        if let Some(baud) = checked(diag, "baudrate", &self.baudrate, positive::<u32>) {
            params.baud = baud;
        }
        if self.no_dither {
            if let Some(threshold) = checked(diag, "threshold", &self.threshold, byte_level) {
                params.threshold = threshold;
            }
        }
        if let Some(contrast) = checked(diag, "contrast", &self.contrast, positive_finite) {
            params.contrast = contrast;
        }
        if let Some(gamma) = checked(diag, "gamma", &self.gamma, positive_finite) {
            params.gamma = gamma;
        }
        if let Some(chunk) = checked(diag, "chunk", &self.chunk, positive::<usize>) {
            params.chunk_size = chunk;
        }
        if let Some(sleep) = checked(diag, "line_sleep", &self.line_sleep, seconds) {
            params.line_sleep = sleep;
        }
        if let Some(limit) = checked(diag, "limit_lines", &self.limit_lines, row_count) {
            params.row_limit = Some(limit);
        }

        params
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn skip(diag: &dyn Diagnostics, err: PrintError) {
    diag.warn(&format!("{} (skipped)", err));
}

/// Run `validate` on a non-empty value; log and drop it on failure.
fn checked<T>(
    diag: &dyn Diagnostics,
    name: &'static str,
    raw: &str,
    validate: fn(&str) -> Result<T, &'static str>,
) -> Option<T> {
    let value = non_empty(raw)?;
    match validate(value) {
        Ok(parsed) => Some(parsed),
        Err(reason) => {
            skip(diag, PrintError::invalid(name, value, reason));
            None
        }
    }
}

fn parse<T: FromStr>(value: &str) -> Result<T, &'static str> {
    value.parse().map_err(|_| "not a number")
}

fn positive<T: FromStr + PartialOrd + Default>(value: &str) -> Result<T, &'static str> {
    let parsed: T = parse(value)?;
    if parsed > T::default() { Ok(parsed) } else { Err("must be > 0") }
}

fn byte_level(value: &str) -> Result<u8, &'static str> {
    let parsed: i64 = parse(value)?;
    u8::try_from(parsed).map_err(|_| "must be within 0..255")
}

fn positive_finite(value: &str) -> Result<f32, &'static str> {
    let parsed: f32 = parse(value)?;
    if parsed.is_finite() && parsed > 0.0 {
        Ok(parsed)
    } else {
        Err("must be a finite number > 0")
    }
}

fn seconds(value: &str) -> Result<Duration, &'static str> {
    let parsed: f64 = parse(value)?;
    Duration::try_from_secs_f64(parsed).map_err(|_| "must be a finite number of seconds >= 0")
}

fn row_count(value: &str) -> Result<u32, &'static str> {
    let parsed: i64 = parse(value)?;
    if parsed < 0 {
        return Err("must be >= 0");
    }
    Ok(u32::try_from(parsed).unwrap_or(u32::MAX))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;
    use log::Level;

    #[test]
    fn test_host_defaults() {
        let diag = MemoryDiagnostics::new();
        let params = RawOptions::default().resolve("photo.jpg", &diag);

        assert_eq!(params.image, PathBuf::from("photo.jpg"));
        assert_eq!(params.device.as_deref(), Some("/dev/ttyS0"));
        assert_eq!(params.target_width, 384);
        assert_eq!(params.baud, 9600);
        assert!(params.pre_cancel);
        assert!(params.invert);
        assert!(params.dither);
        // threshold ignored while dithering
        assert_eq!(params.threshold, 128);
        assert_eq!(params.contrast, 1.3);
        assert_eq!(params.gamma, 1.0);
        assert_eq!(params.line_sleep, Duration::from_millis(20));
        assert_eq!(params.row_limit, None);
        assert_eq!(params.preview, None);
        assert_eq!(params.dry_run, None);
        assert!(diag.messages(Level::Warn).is_empty());
    }

    #[test]
    fn test_threshold_read_with_no_dither() {
        let raw = RawOptions {
            no_dither: true,
            ..Default::default()
        };
        let params = raw.resolve("a.png", &MemoryDiagnostics::new());
        assert!(!params.dither);
        assert_eq!(params.threshold, 130);
    }

    #[test]
    fn test_invalid_values_are_skipped_with_warning() {
        let raw = RawOptions {
            baudrate: "fast".to_string(),
            contrast: "-1".to_string(),
            gamma: "NaN".to_string(),
            chunk: "0".to_string(),
            line_sleep: "-0.5".to_string(),
            limit_lines: "-3".to_string(),
            no_dither: true,
            threshold: "300".to_string(),
            ..Default::default()
        };
        let diag = MemoryDiagnostics::new();
        let params = raw.resolve("a.png", &diag);

        let defaults = PrintParameters::default();
        assert_eq!(params.baud, defaults.baud);
        assert_eq!(params.contrast, defaults.contrast);
        assert_eq!(params.gamma, defaults.gamma);
        assert_eq!(params.chunk_size, defaults.chunk_size);
        assert_eq!(params.line_sleep, defaults.line_sleep);
        assert_eq!(params.row_limit, None);
        assert_eq!(params.threshold, defaults.threshold);

        assert_eq!(diag.messages(Level::Warn).len(), 7);
        assert!(diag.contains("Invalid value for baudrate: 'fast' (not a number) (skipped)"));
        assert!(diag.contains("Invalid value for threshold: '300'"));
    }

    #[test]
    fn test_empty_strings_mean_unset() {
        let raw = RawOptions {
            baudrate: "  ".to_string(),
            contrast: String::new(),
            chunk: String::new(),
            line_sleep: String::new(),
            serial_device: String::new(),
            ..Default::default()
        };
        let diag = MemoryDiagnostics::new();
        let params = raw.resolve("a.png", &diag);
        assert_eq!(params.baud, 9600);
        assert_eq!(params.device, None);
        assert!(diag.entries().is_empty());
    }

    #[test]
    fn test_values_are_trimmed_and_parsed() {
        let raw = RawOptions {
            baudrate: " 19200 ".to_string(),
            gamma: "1.8".to_string(),
            limit_lines: "120".to_string(),
            line_sleep: "0".to_string(),
            preview: "/tmp/preview.png".to_string(),
            dry_run: "/tmp/job.bin".to_string(),
            ..Default::default()
        };
        let params = raw.resolve("a.png", &MemoryDiagnostics::new());
        assert_eq!(params.baud, 19200);
        assert_eq!(params.gamma, 1.8);
        assert_eq!(params.row_limit, Some(120));
        assert_eq!(params.line_sleep, Duration::ZERO);
        assert_eq!(params.preview, Some(PathBuf::from("/tmp/preview.png")));
        assert_eq!(params.dry_run, Some(PathBuf::from("/tmp/job.bin")));
    }

    #[test]
    fn test_huge_line_sleep_is_skipped() {
        for value in ["1e300", "inf", "-1e-9"] {
            let raw = RawOptions {
                line_sleep: value.to_string(),
                ..Default::default()
            };
            let diag = MemoryDiagnostics::new();
            let params = raw.resolve("a.png", &diag);
            assert_eq!(params.line_sleep, Duration::from_millis(20), "value {value}");
            assert!(diag.contains("Invalid value for line_sleep"), "value {value}");
        }
    }

    #[test]
    fn test_zero_target_width_falls_back() {
        let raw = RawOptions {
            target_width: 0,
            ..Default::default()
        };
        let diag = MemoryDiagnostics::new();
        assert_eq!(raw.resolve("a.png", &diag).target_width, 384);
        assert!(diag.contains("target_width"));
    }

    #[test]
    fn test_from_json_partial() {
        let raw = RawOptions::from_json(r#"{"serial_device": "/dev/ttyUSB0", "invert": false}"#).unwrap();
        assert_eq!(raw.serial_device, "/dev/ttyUSB0");
        assert!(!raw.invert);
        assert!(raw.pre_cancel);
        assert_eq!(raw.chunk, "4096");
    }

    #[test]
    fn test_from_json_rejects_wrong_types() {
        let err = RawOptions::from_json(r#"{"target_width": "wide"}"#).unwrap_err();
        assert!(matches!(err, PrintError::InvalidParameter { name: "options", .. }));
    }
}
