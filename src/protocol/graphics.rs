//! # ESC/POS Raster Graphics (GS v 0)
//!
//! ## Command Layout
//!
//! | Format  | Bytes |
//! |---------|-------|
//! | ASCII   | GS v 0 m xL xH yL yH d1...dk |
//! | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
//!
//! - `m`: scaling mode, always 0 (normal density)
//! - `xL, xH`: width in bytes, little-endian
//! - `yL, yH`: height in rows, little-endian
//! - `d1...dk`: `width_bytes × height` bytes of row-major image data
//!
//! ## Bit Packing
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░   (bit 7 = leftmost dot)
//! ```
//!
//! The header height field can hold 65535 rows but callers keep each command
//! at or below [`MAX_BAND_ROWS`](crate::raster::MAX_BAND_ROWS).

use super::commands::{GS, u16_le};

/// Length of a raster band header in bytes.
pub const RASTER_HEADER_LEN: usize = 8;

/// The opcode prefix of every raster band: `GS v 0 m` with `m = 0`.
pub const RASTER_OPCODE: [u8; 4] = [GS, b'v', b'0', 0x00];

/// Build the 8-byte `GS v 0` header for a band of `rows` rows, each
/// `width_bytes` bytes wide.
///
/// ```
/// use escpos_raster::protocol::graphics::raster_header;
///
/// let header = raster_header(48, 255);
/// assert_eq!(header, [0x1D, 0x76, 0x30, 0x00, 48, 0, 255, 0]);
/// ```
pub fn raster_header(width_bytes: u16, rows: u16) -> [u8; RASTER_HEADER_LEN] {
    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(rows);
    [
        RASTER_OPCODE[0],
        RASTER_OPCODE[1],
        RASTER_OPCODE[2],
        RASTER_OPCODE[3],
        xl,
        xh,
        yl,
        yh,
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_header_opcode() {
        let header = raster_header(48, 10);
        assert_eq!(&header[0..4], &[0x1D, 0x76, 0x30, 0x00]);
    }

    #[test]
    fn test_raster_header_small() {
        let header = raster_header(48, 10);
        assert_eq!(header[4], 48); // xL
        assert_eq!(header[5], 0); // xH
        assert_eq!(header[6], 10); // yL
        assert_eq!(header[7], 0); // yH
    }

    #[test]
    fn test_raster_header_little_endian() {
        // 300 = 0x012C, 500 = 0x01F4
        let header = raster_header(300, 500);
        assert_eq!(header[4], 0x2C);
        assert_eq!(header[5], 0x01);
        assert_eq!(header[6], 0xF4);
        assert_eq!(header[7], 0x01);
    }
}
