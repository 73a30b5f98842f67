//! # File Transport
//!
//! Dry-run output: the exact byte stream a serial print would send, written
//! to a file instead. The file can later be copied to a printer with
//! `cat job.bin > /dev/ttyUSB0`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{Link, Pacing, print_job};
use crate::diagnostics::Diagnostics;
use crate::error::PrintError;
use crate::raster::RasterJob;

/// A [`Link`] over any writer. Writes always complete; clearing is a no-op.
#[derive(Debug, Default)]
pub struct WriterLink<W: Write> {
    inner: W,
}

impl<W: Write> WriterLink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Link for WriterLink<W> {
    fn write(&mut self, data: &[u8]) -> Result<usize, PrintError> {
        self.inner.write_all(data)?;
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), PrintError> {
        self.inner.flush()?;
        Ok(())
    }

    fn clear_buffers(&mut self) -> Result<(), PrintError> {
        Ok(())
    }
}

/// Write the complete job stream for `job` to `path`, replacing any existing file.
///
/// The bytes match what [`print_job`] sends over a serial port. No pacing is
/// applied.
pub fn write_to_file(path: &Path, job: &RasterJob, diag: &dyn Diagnostics) -> Result<(), PrintError> {
    let file = File::create(path)?;
    let mut link = WriterLink::new(BufWriter::new(file));
    print_job(&mut link, job, &Pacing::UNPACED, diag)?;
    diag.info(&format!("Dry-run written: {}", path.display()));
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
