//! # Error Types
//!
//! This module defines the error type used throughout the escpos-raster library,
//! along with the process exit codes the CLI reports for each kind of failure.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for a malformed command line.
pub const EXIT_USAGE: i32 = 2;
/// Exit code when the source image does not exist.
pub const EXIT_IMAGE_NOT_FOUND: i32 = 3;
/// Exit code for serial open or link failures.
pub const EXIT_SERIAL: i32 = 10;
/// Exit code when the printer stops accepting data.
pub const EXIT_WRITE_TIMEOUT: i32 = 11;
/// Exit code for everything else.
pub const EXIT_OTHER: i32 = 12;

/// Main error type for escpos-raster operations
#[derive(Debug, Error)]
pub enum PrintError {
    /// The source image path does not exist
    #[error("Image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    /// The source image exists but could not be opened or decoded
    #[error("Failed to load image {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A numeric or path option failed validation
    #[error("Invalid value for {name}: '{value}' ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// The serial device could not be opened or configured
    #[error("Failed to open {device}: {source}")]
    SerialOpen {
        device: String,
        #[source]
        source: std::io::Error,
    },

    /// The serial link failed while in use
    #[error("Serial error: {0}")]
    SerialCommunication(#[source] std::io::Error),

    /// The printer accepted no data within the write timeout
    #[error("Write timeout: {written}/{expected} bytes accepted")]
    WriteTimeout { written: usize, expected: usize },

    /// The 1-bit preview image could not be written
    #[error("Preview error: {0}")]
    Preview(String),

    /// Malformed command line usage
    #[error("{0}")]
    Usage(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PrintError {
    /// Build an [`PrintError::InvalidParameter`] from anything displayable.
    pub fn invalid(name: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => EXIT_USAGE,
            Self::ImageNotFound(_) => EXIT_IMAGE_NOT_FOUND,
            Self::SerialOpen { .. } | Self::SerialCommunication(_) => EXIT_SERIAL,
            Self::WriteTimeout { .. } => EXIT_WRITE_TIMEOUT,
            _ => EXIT_OTHER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(PrintError::Usage("x".into()).exit_code(), 2);
        assert_eq!(PrintError::ImageNotFound("a.png".into()).exit_code(), 3);
        assert_eq!(
            PrintError::SerialCommunication(std::io::Error::other("down")).exit_code(),
            10
        );
        assert_eq!(
            PrintError::SerialOpen {
                device: "/dev/ttyS0".into(),
                source: std::io::Error::other("busy"),
            }
            .exit_code(),
            10
        );
        assert_eq!(
            PrintError::WriteTimeout {
                written: 0,
                expected: 4
            }
            .exit_code(),
            11
        );
        assert_eq!(PrintError::invalid("chunk", "0", "must be > 0").exit_code(), 12);
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = PrintError::invalid("gamma", "abc", "not a number");
        assert_eq!(err.to_string(), "Invalid value for gamma: 'abc' (not a number)");
    }
}
