//! # Printer Maintenance
//!
//! One-shot operations that need a serial connection but no image: clearing
//! a stuck printer and printing a test line. Each call opens the port, sends
//! its bytes and closes the port again.

use crate::diagnostics::Diagnostics;
use crate::error::PrintError;
use crate::transport::{self, SerialPort};

/// Target for maintenance commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maintenance {
    device: String,
    baud: u32,
}

impl Maintenance {
    pub fn new(device: impl Into<String>, baud: u32) -> Self {
        Self {
            device: device.into(),
            baud,
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn baud(&self) -> u32 {
        self.baud
    }

    /// Cancel any buffered job and reset the printer.
    pub fn cancel(&self, diag: &dyn Diagnostics) -> Result<(), PrintError> {
        let mut port = self.open(diag)?;
        transport::cancel_and_reset(&mut port, diag)?;
        diag.info("Cancel/reset sent");
        Ok(())
    }

    /// Print "Hello ESC/POS!" and cut.
    pub fn hello(&self, diag: &dyn Diagnostics) -> Result<(), PrintError> {
        let mut port = self.open(diag)?;
        transport::send_hello(&mut port, diag)
    }

    fn open(&self, diag: &dyn Diagnostics) -> Result<SerialPort, PrintError> {
        diag.info(&format!("Opening {} @ {} 8N1", self.device, self.baud));
        SerialPort::open(&self.device, self.baud)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;

    #[test]
    fn test_cancel_reports_open_failure() {
        let diag = MemoryDiagnostics::new();
        let err = Maintenance::new("/nonexistent/ttyS9", 9600)
            .cancel(&diag)
            .unwrap_err();
        assert!(matches!(err, PrintError::SerialOpen { .. }));
        assert_eq!(err.exit_code(), 10);
        assert!(diag.contains("Opening /nonexistent/ttyS9 @ 9600"));
        assert!(!diag.contains("Cancel/reset sent"));
    }

    #[test]
    fn test_hello_rejects_unsupported_baud() {
        let err = Maintenance::new("/nonexistent/ttyS9", 1234)
            .hello(&MemoryDiagnostics::new())
            .unwrap_err();
        assert!(matches!(err, PrintError::InvalidParameter { name: "baud", .. }));
    }
}
