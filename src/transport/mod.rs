//! # Printer Transport Layer
//!
//! Everything that pushes bytes at a printer goes through the [`Link`] trait,
//! so the serial port and the dry-run file receive exactly the same stream.
//!
//! ## Available Links
//!
//! - [`serial`]: raw tty at a fixed baud rate, 8-N-1, no flow control
//! - [`file`]: any `std::io::Write`, used for `--dry-run` output
//!
//! ## Print Sequence
//!
//! ```text
//! clear buffers
//! ESC @  ESC 2
//! for each band:  header, payload (≤ chunk_size per write), sleep line_sleep
//! LF LF LF  GS V 1
//! flush
//! ```

pub mod file;
pub mod serial;

use std::thread;
use std::time::Duration;

use crate::diagnostics::Diagnostics;
use crate::error::PrintError;
use crate::protocol::commands;
use crate::raster::RasterJob;

pub use file::{WriterLink, write_to_file};
pub use serial::SerialPort;

/// Pause after a cancel/reset so the printer can settle.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Default payload sub-write size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Default pause after each band.
pub const DEFAULT_LINE_SLEEP: Duration = Duration::from_millis(20);

/// A byte pipe to a printer.
pub trait Link {
    /// Write some of `data` and return how many bytes were accepted.
    ///
    /// Returning `Ok(0)` for non-empty `data` means the link made no progress
    /// within its write timeout.
    fn write(&mut self, data: &[u8]) -> Result<usize, PrintError>;

    /// Block until everything written so far has left the host.
    fn flush(&mut self) -> Result<(), PrintError>;

    /// Discard pending input and output.
    fn clear_buffers(&mut self) -> Result<(), PrintError>;
}

/// How band payloads are fed to the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Largest single write of payload bytes
    pub chunk_size: usize,
    /// Blocking pause after each band's payload
    pub line_sleep: Duration,
}

impl Pacing {
    /// Whole payloads in one write, no pauses.
    pub const UNPACED: Self = Self {
        chunk_size: usize::MAX,
        line_sleep: Duration::ZERO,
    };
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            line_sleep: DEFAULT_LINE_SLEEP,
        }
    }
}

/// Write all of `data` in pieces of at most `chunk_size` bytes.
///
/// A write that accepts nothing aborts with [`PrintError::WriteTimeout`];
/// there is no retry.
pub fn write_chunked<L: Link + ?Sized>(
    link: &mut L,
    data: &[u8],
    chunk_size: usize,
) -> Result<(), PrintError> {
    let chunk_size = chunk_size.max(1);
    let mut sent = 0;
    while sent < data.len() {
        let end = data.len().min(sent.saturating_add(chunk_size));
        let n = link.write(&data[sent..end])?;
        if n == 0 {
            return Err(PrintError::WriteTimeout {
                written: sent,
                expected: data.len(),
            });
        }
        sent += n;
    }
    Ok(())
}

/// Write all of `data` with no chunk limit.
pub fn write_all<L: Link + ?Sized>(link: &mut L, data: &[u8]) -> Result<(), PrintError> {
    write_chunked(link, data, usize::MAX)
}

/// Cancel whatever the printer is doing and reset it.
///
/// Sends `CAN×3`, `ESC @`, two line feeds and a partial cut, flushes, then
/// waits [`SETTLE_DELAY`].
pub fn cancel_and_reset<L: Link + ?Sized>(
    link: &mut L,
    diag: &dyn Diagnostics,
) -> Result<(), PrintError> {
    diag.info("Sending cancel (CAN) + reset (ESC @)");
    write_all(link, &commands::cancel_and_reset())?;
    link.flush()?;
    thread::sleep(SETTLE_DELAY);
    Ok(())
}

/// Print a short line of text to check the link end to end.
pub fn send_hello<L: Link + ?Sized>(link: &mut L, diag: &dyn Diagnostics) -> Result<(), PrintError> {
    link.clear_buffers()?;
    write_all(link, &commands::hello())?;
    link.flush()?;
    diag.info("Hello sent");
    Ok(())
}

/// Send a raster job: preamble, every band in order, trailer.
///
/// Each band's header goes out in one write, its payload in writes of at most
/// `pacing.chunk_size` bytes, followed by a blocking `pacing.line_sleep`.
/// A [`PrintError::WriteTimeout`] abandons the remaining bands.
pub fn print_job<L: Link + ?Sized>(
    link: &mut L,
    job: &RasterJob,
    pacing: &Pacing,
    diag: &dyn Diagnostics,
) -> Result<(), PrintError> {
    link.clear_buffers()?;
    write_all(link, &commands::job_preamble())?;

    let total = job.height();
    let mut sent_rows = 0;
    for (index, band) in job.bands().enumerate() {
        write_all(link, &band.header)?;
        write_chunked(link, band.payload, pacing.chunk_size)?;
        sent_rows += band.rows as u32;
        diag.debug(&format!(
            "Band {}: rows {}..{} (sent {}/{})",
            index + 1,
            band.start_row,
            band.start_row + band.rows as u32 - 1,
            sent_rows,
            total
        ));
        if !pacing.line_sleep.is_zero() {
            thread::sleep(pacing.line_sleep);
        }
    }

    write_all(link, &commands::job_trailer())?;
    link.flush()?;
    diag.info("Raster sent");
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
