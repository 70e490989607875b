//! # P-touch Raster Protocol Commands
//!
//! Fixed control commands understood by Brother P-touch label printers in
//! raster mode (PT-P700, PT-P750W and relatives).
//!
//! ## Protocol Overview
//!
//! Every command is written as a single bulk-OUT transfer. Commands are
//! short escape sequences; raster data follows as one frame per print-head
//! column (see [`super::raster`]).
//!
//! A print job is:
//!
//! ```text
//! ESC @                 initialize
//! [M 02]                enable compression (if supported)
//! ESC i R 01 | ESC i a 01   switch to raster mode
//! G ... (per column)    raster lines
//! SUB | FF              print + cut, or print + advance
//! ```
//!
//! ## USB Endpoints
//!
//! | Direction | Address |
//! |-----------|---------|
//! | OUT (host → printer) | 0x02 |
//! | IN (printer → host)  | 0x81 |

// ============================================================================
// ENDPOINTS AND SIZES
// ============================================================================

/// Bulk-OUT endpoint address every supported printer exposes
pub const OUTPUT_ENDPOINT: u8 = 0x02;

/// Bulk-IN endpoint address status replies arrive on
pub const INPUT_ENDPOINT: u8 = 0x81;

/// Size of a complete status reply
pub const STATUS_REPLY_SIZE: usize = 32;

/// Size of the legacy short reply some firmware emits; never valid
pub const LEGACY_REPLY_SIZE: usize = 16;

/// First two bytes of every valid status reply (print head mark, size)
pub const STATUS_MAGIC: [u8; 2] = [0x80, 0x20];

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// SUB - print and cut
pub const SUB: u8 = 0x1A;

/// FF (Form Feed) - print and advance without cutting
pub const FF: u8 = 0x0C;

/// Raster line marker ('G')
pub const RASTER_LINE: u8 = 0x47;

// ============================================================================
// SESSION COMMANDS
// ============================================================================

/// # Initialize (ESC @)
///
/// Clears the print buffer and resets the printer to its power-on state.
/// This is the only command a session may send before it is initialized.
///
/// | Format | Bytes |
/// |--------|-------|
/// | ASCII  | ESC @ |
/// | Hex    | 1B 40 |
///
/// ```
/// use ptouch::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Status Information Request (ESC i S)
///
/// Asks the printer to send a 32-byte status reply on the IN endpoint.
///
/// | Format | Bytes    |
/// |--------|----------|
/// | ASCII  | ESC i S  |
/// | Hex    | 1B 69 53 |
#[inline]
pub fn status_request() -> Vec<u8> {
    vec![ESC, b'i', b'S']
}

// ============================================================================
// COMPRESSION MODE
// ============================================================================

/// # Enable Compression (M 02)
///
/// Selects TIFF (PackBits) mode for the raster lines that follow. Sent once
/// per print job, never per line.
#[inline]
pub fn enable_compression() -> Vec<u8> {
    vec![b'M', 0x02]
}

/// # Disable Compression (M 00)
#[inline]
pub fn disable_compression() -> Vec<u8> {
    vec![b'M', 0x00]
}

// ============================================================================
// RASTER MODE
// ============================================================================

/// # Switch to Raster Mode (ESC i R 01)
///
/// Standard variant.
///
/// | Format | Bytes       |
/// |--------|-------------|
/// | ASCII  | ESC i R 1   |
/// | Hex    | 1B 69 52 01 |
#[inline]
pub fn raster_start() -> Vec<u8> {
    vec![ESC, b'i', b'R', 0x01]
}

/// # Switch to Raster Mode (ESC i a 01)
///
/// Variant required by the PT-P700 family.
///
/// | Format | Bytes       |
/// |--------|-------------|
/// | ASCII  | ESC i a 1   |
/// | Hex    | 1B 69 61 01 |
#[inline]
pub fn raster_start_alternate() -> Vec<u8> {
    vec![ESC, b'i', b'a', 0x01]
}

// ============================================================================
// JOB TERMINATION
// ============================================================================

/// # Print and Cut (SUB)
///
/// Prints the buffered label and cuts the tape.
#[inline]
pub fn eject() -> Vec<u8> {
    vec![SUB]
}

/// # Print and Advance (FF)
///
/// Prints the buffered label and feeds the tape without cutting, so the
/// next label stays attached.
#[inline]
pub fn advance() -> Vec<u8> {
    vec![FF]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert_eq!(init(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_status_request() {
        assert_eq!(status_request(), vec![0x1B, 0x69, 0x53]);
    }

    #[test]
    fn test_compression_toggle() {
        assert_eq!(enable_compression(), vec![0x4D, 0x02]);
        assert_eq!(disable_compression(), vec![0x4D, 0x00]);
    }

    #[test]
    fn test_raster_start_variants() {
        assert_eq!(raster_start(), vec![0x1B, 0x69, 0x52, 0x01]);
        assert_eq!(raster_start_alternate(), vec![0x1B, 0x69, 0x61, 0x01]);
    }

    #[test]
    fn test_job_termination() {
        assert_eq!(eject(), vec![0x1A]);
        assert_eq!(advance(), vec![0x0C]);
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(OUTPUT_ENDPOINT, 0x02);
        assert_eq!(INPUT_ENDPOINT, 0x81);
    }
}
