//! # ESC/POS Control Commands
//!
//! Byte builders for the handful of ESC/POS commands this crate sends around
//! a raster print: cancel, reset, line spacing, paper feed and partial cut.
//!
//! ## Escape Sequence Structure
//!
//! - Single byte: `LF`, `CAN`
//! - Two bytes: `ESC @`, `ESC 2`
//! - Multi-byte with parameters: `GS V m`, `GS v 0 m xL xH yL yH`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for cutter control and raster graphics (`GS V`, `GS v 0`).
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print and advance one line
pub const LF: u8 = 0x0A;

/// CAN (Cancel) - Discard data in the current print buffer
pub const CAN: u8 = 0x18;

/// Text sent by [`hello`].
pub const HELLO_TEXT: &[u8] = b"Hello ESC/POS!\n\n";

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets modes to their power-on defaults.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ```
/// use escpos_raster::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Cancel Buffer (CAN CAN CAN)
///
/// Sent three times so a printer stuck mid-command still sees at least one
/// CAN outside a parameter byte.
#[inline]
pub fn cancel() -> Vec<u8> {
    vec![CAN, CAN, CAN]
}

/// # Default Line Spacing (ESC 2)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC 2 |
/// | Hex     | 1B 32 |
#[inline]
pub fn line_spacing_default() -> Vec<u8> {
    vec![ESC, b'2']
}

// ============================================================================
// PAPER CONTROL
// ============================================================================

/// Feed `n` lines with bare line feeds.
#[inline]
pub fn feed_lines(n: usize) -> Vec<u8> {
    vec![LF; n]
}

/// # Partial Cut (GS V 1)
///
/// Cuts leaving a small hinge. Printers without a cutter ignore it.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS V 1   |
/// | Hex     | 1D 56 01 |
#[inline]
pub fn cut_partial() -> Vec<u8> {
    vec![GS, b'V', 1]
}

// ============================================================================
// JOB SEQUENCES
// ============================================================================

/// Bytes sent before the first raster band: `ESC @`, `ESC 2`.
pub fn job_preamble() -> Vec<u8> {
    let mut data = init();
    data.extend(line_spacing_default());
    data
}

/// Bytes sent after the last raster band: three line feeds and a partial cut.
pub fn job_trailer() -> Vec<u8> {
    let mut data = feed_lines(3);
    data.extend(cut_partial());
    data
}

/// Cancel/reset sequence: `CAN×3`, `ESC @`, two line feeds, partial cut.
pub fn cancel_and_reset() -> Vec<u8> {
    let mut data = cancel();
    data.extend(init());
    data.extend(feed_lines(2));
    data.extend(cut_partial());
    data
}

/// Connectivity test: `ESC @`, a short text line, partial cut.
pub fn hello() -> Vec<u8> {
    let mut data = init();
    data.extend_from_slice(HELLO_TEXT);
    data.extend(cut_partial());
    data
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ```
/// use escpos_raster::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(48), [0x30, 0x00]); // 384 dots = 48 bytes
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================
