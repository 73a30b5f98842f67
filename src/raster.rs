//! # Raster Bands
//!
//! Splits a [`PreparedBitmap`] into `GS v 0` bands of at most
//! [`MAX_BAND_ROWS`] rows.
//!
//! ```text
//! // 600-row image, 48 bytes per row:
//! // Band 1: rows   0..255  header 1D 76 30 00 30 00 FF 00
//! // Band 2: rows 255..510  header 1D 76 30 00 30 00 FF 00
//! // Band 3: rows 510..600  header 1D 76 30 00 30 00 5A 00
//! ```
//!
//! Bands borrow from the job's buffer and are produced one at a time by
//! [`RasterJob::bands`], which can be called any number of times.

use crate::diagnostics::Diagnostics;
use crate::error::PrintError;
use crate::protocol::graphics::{RASTER_HEADER_LEN, raster_header};
use crate::render::PreparedBitmap;

/// Largest row count sent in one raster command.
///
/// The header could encode 65535 rows; smaller bands keep the printer's
/// input buffer from overflowing and set the pacing between pauses.
pub const MAX_BAND_ROWS: u32 = 255;

/// A bitmap ready for transmission: polarity applied, height truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterJob {
    row_bytes: u16,
    height: u32,
    data: Vec<u8>,
}

/// One raster command: header plus a view into the job's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterBand<'a> {
    pub start_row: u32,
    pub rows: u16,
    pub header: [u8; RASTER_HEADER_LEN],
    pub payload: &'a [u8],
}

/// Turn a bitmap into a [`RasterJob`].
///
/// - `invert` complements every byte of the buffer, once.
/// - `row_limit` truncates the printed height when it is `Some(n)` with `n > 0`.
///
/// ## Errors
///
/// [`PrintError::InvalidParameter`] if a row is wider than the header's
/// 16-bit width field allows.
pub fn build(
    bitmap: PreparedBitmap,
    invert: bool,
    row_limit: Option<u32>,
    diag: &dyn Diagnostics,
) -> Result<RasterJob, PrintError> {
    let width = bitmap.width();
    let row_bytes = u16::try_from(bitmap.row_bytes())
        .map_err(|_| PrintError::invalid("width", width, "row does not fit a raster header"))?;
    let height = effective_height(bitmap.height(), row_limit);

    let mut data = bitmap.into_data();
    if invert {
        invert_bits(&mut data);
    }

    diag.info(&format!(
        "Raster: {} px ({} bytes/row) x {} rows",
        width, row_bytes, height
    ));

    Ok(RasterJob {
        row_bytes,
        height,
        data,
    })
}

/// Rows that will actually be printed.
///
/// ```
/// use escpos_raster::raster::effective_height;
///
/// assert_eq!(effective_height(300, Some(10)), 10);
/// assert_eq!(effective_height(300, Some(0)), 300);
/// assert_eq!(effective_height(300, None), 300);
/// ```
pub fn effective_height(height: u32, row_limit: Option<u32>) -> u32 {
    match row_limit {
        Some(limit) if limit > 0 => limit.min(height),
        _ => height,
    }
}

/// Complement every byte, swapping black and white.
pub fn invert_bits(data: &mut [u8]) {
    for byte in data.iter_mut() {
        *byte = !*byte;
    }
}

impl RasterJob {
    /// Bytes per row.
    pub fn row_bytes(&self) -> u16 {
        self.row_bytes
    }

    /// Rows covered by [`RasterJob::bands`].
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The whole (possibly inverted) buffer, including rows past the limit.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Payload bytes that will be sent, excluding headers.
    pub fn payload_len(&self) -> usize {
        self.row_bytes as usize * self.height as usize
    }

    /// Number of bands [`RasterJob::bands`] yields.
    pub fn band_count(&self) -> usize {
        self.height.div_ceil(MAX_BAND_ROWS) as usize
    }

    /// A fresh iterator over the bands, in row order.
    pub fn bands(&self) -> RasterBands<'_> {
        RasterBands { job: self, next_row: 0 }
    }
}

/// Iterator over the bands of a [`RasterJob`].
#[derive(Debug, Clone)]
pub struct RasterBands<'a> {
    job: &'a RasterJob,
    next_row: u32,
}

impl<'a> Iterator for RasterBands<'a> {
    type Item = RasterBand<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let job = self.job;
        if self.next_row >= job.height {
            return None;
        }

        let start_row = self.next_row;
        let rows = MAX_BAND_ROWS.min(job.height - start_row);
        let row_bytes = job.row_bytes as usize;
        let start = start_row as usize * row_bytes;
        let end = start + rows as usize * row_bytes;
        self.next_row += rows;

        Some(RasterBand {
            start_row,
            rows: rows as u16,
            header: raster_header(job.row_bytes, rows as u16),
            payload: &job.data[start..end],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.job.height - self.next_row.min(self.job.height)).div_ceil(MAX_BAND_ROWS);
        (remaining as usize, Some(remaining as usize))
    }
}

impl ExactSizeIterator for RasterBands<'_> {}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;

    fn bitmap(width: u32, height: u32) -> PreparedBitmap {
        let row_bytes = (width as usize).div_ceil(8);
        let data = (0..row_bytes * height as usize).map(|i| (i % 251) as u8).collect();
        PreparedBitmap::new(width, height, data).unwrap()
    }

    fn job(width: u32, height: u32, invert: bool, limit: Option<u32>) -> RasterJob {
        build(bitmap(width, height), invert, limit, &MemoryDiagnostics::new()).unwrap()
    }

    #[test]
    fn test_row_bytes_rounds_up() {
        assert_eq!(job(384, 1, false, None).row_bytes(), 48);
        assert_eq!(job(385, 1, false, None).row_bytes(), 49);
        assert_eq!(job(1, 1, false, None).row_bytes(), 1);
    }

    #[test]
    fn test_band_rows_sum_to_height() {
        for height in [0, 1, 254, 255, 256, 510, 600, 1000] {
            let job = job(16, height, false, None);
            let bands: Vec<_> = job.bands().collect();
            let total: u32 = bands.iter().map(|b| b.rows as u32).sum();
            assert_eq!(total, height, "height {height}");
            assert!(bands.iter().all(|b| b.rows as u32 <= MAX_BAND_ROWS));
            assert_eq!(bands.len(), job.band_count());
        }
    }

    #[test]
    fn test_bands_are_contiguous() {
        let job = job(16, 600, false, None);
        let starts: Vec<u32> = job.bands().map(|b| b.start_row).collect();
        assert_eq!(starts, vec![0, 255, 510]);

        let last = job.bands().last().unwrap();
        assert_eq!(last.rows, 90);
        assert_eq!(last.header, [0x1D, 0x76, 0x30, 0x00, 2, 0, 90, 0]);
    }

    #[test]
    fn test_band_payload_matches_buffer() {
        let job = job(24, 300, false, None);
        let joined: Vec<u8> = job.bands().flat_map(|b| b.payload.iter().copied()).collect();
        assert_eq!(joined.as_slice(), &job.data()[..job.payload_len()]);
        for band in job.bands() {
            assert_eq!(band.payload.len(), band.rows as usize * 3);
        }
    }

    #[test]
    fn test_row_limit_truncates() {
        let job = job(16, 300, false, Some(10));
        let bands: Vec<_> = job.bands().collect();
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].rows, 10);
        assert_eq!(bands[0].payload.len(), 20);
    }

    #[test]
    fn test_row_limit_larger_than_height() {
        assert_eq!(job(16, 40, false, Some(100)).height(), 40);
    }

    #[test]
    fn test_zero_row_limit_means_disabled() {
        assert_eq!(job(16, 40, false, Some(0)).height(), 40);
    }

    #[test]
    fn test_invert_complements_whole_buffer() {
        let plain = job(16, 300, false, Some(5));
        let inverted = job(16, 300, true, Some(5));
        assert_eq!(plain.data().len(), inverted.data().len());
        for (a, b) in plain.data().iter().zip(inverted.data()) {
            assert_eq!(*a, !*b);
        }
    }

    #[test]
    fn test_invert_is_involutive() {
        let original: Vec<u8> = (0..=255).collect();
        let mut data = original.clone();
        invert_bits(&mut data);
        assert_ne!(data, original);
        invert_bits(&mut data);
        assert_eq!(data, original);
    }

    #[test]
    fn test_bands_are_restartable() {
        let job = job(40, 700, true, None);
        let first: Vec<_> = job.bands().collect();
        let second: Vec<_> = job.bands().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_size_hint_tracks_progress() {
        let job = job(8, 600, false, None);
        let mut bands = job.bands();
        assert_eq!(bands.len(), 3);
        bands.next();
        assert_eq!(bands.len(), 2);
    }

    #[test]
    fn test_rejects_too_wide_rows() {
        let width = 8 * (u16::MAX as u32 + 1);
        let bitmap = PreparedBitmap::new(width, 1, vec![0; width as usize / 8]).unwrap();
        let err = build(bitmap, false, None, &MemoryDiagnostics::new()).unwrap_err();
        assert!(matches!(err, PrintError::InvalidParameter { name: "width", .. }));
    }

    #[test]
    fn test_build_logs_geometry() {
        let diag = MemoryDiagnostics::new();
        build(bitmap(384, 20), false, None, &diag).unwrap();
        assert!(diag.contains("384 px (48 bytes/row) x 20 rows"));
    }
}
