//! # Status Reply Decoding
//!
//! The printer answers `ESC i S` with a fixed 32-byte reply on the bulk-IN
//! endpoint. This module turns those bytes into a [`StatusReply`] and
//! resolves the codes inside it against the tape and color tables.
//!
//! ## Layout
//!
//! Multi-byte fields are **little-endian**. Offsets are explicit; nothing
//! depends on in-memory struct layout.
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 1 | print head mark (0x80) |
//! | 1 | 1 | size (0x20) |
//! | 2 | 1 | brand code |
//! | 3 | 1 | series code |
//! | 4 | 1 | model |
//! | 5 | 1 | country |
//! | 6 | 2 | reserved |
//! | 8 | 2 | error bitmask |
//! | 10 | 1 | media width (mm) |
//! | 11 | 1 | media type |
//! | 12 | 1 | column count |
//! | 13 | 1 | fonts |
//! | 14 | 1 | Japanese fonts |
//! | 15 | 1 | mode |
//! | 16 | 1 | density |
//! | 17 | 1 | media length |
//! | 18 | 1 | status type |
//! | 19 | 1 | phase type |
//! | 20 | 2 | phase number |
//! | 22 | 1 | notification number |
//! | 23 | 1 | expansion area |
//! | 24 | 1 | tape color code |
//! | 25 | 1 | text color code |
//! | 26 | 2 | padding |
//! | 28 | 4 | hardware settings |
//!
//! Decoding is pure and deterministic: the same bytes always produce the
//! same value.

use bitflags::bitflags;
use serde::Serialize;

use super::commands::{STATUS_MAGIC, STATUS_REPLY_SIZE};
use crate::error::PtouchError;
use crate::printer::{ColorDescriptor, TapeInfo, color, tape};

// ============================================================================
// FIELD OFFSETS
// ============================================================================

const OFF_PRINTHEAD_MARK: usize = 0;
const OFF_SIZE: usize = 1;
const OFF_BRAND_CODE: usize = 2;
const OFF_SERIES_CODE: usize = 3;
const OFF_MODEL: usize = 4;
const OFF_COUNTRY: usize = 5;
const OFF_RESERVED: usize = 6;
const OFF_ERROR: usize = 8;
const OFF_MEDIA_WIDTH: usize = 10;
const OFF_MEDIA_TYPE: usize = 11;
const OFF_COLUMN_COUNT: usize = 12;
const OFF_FONTS: usize = 13;
const OFF_JP_FONTS: usize = 14;
const OFF_MODE: usize = 15;
const OFF_DENSITY: usize = 16;
const OFF_MEDIA_LENGTH: usize = 17;
const OFF_STATUS_TYPE: usize = 18;
const OFF_PHASE_TYPE: usize = 19;
const OFF_PHASE_NUMBER: usize = 20;
const OFF_NOTIFICATION: usize = 22;
const OFF_EXP: usize = 23;
const OFF_TAPE_COLOR: usize = 24;
const OFF_TEXT_COLOR: usize = 25;
const OFF_HW_SETTING: usize = 28;

#[inline]
fn u16_at(raw: &[u8; STATUS_REPLY_SIZE], offset: usize) -> u16 {
    u16::from_le_bytes([raw[offset], raw[offset + 1]])
}

#[inline]
fn u32_at(raw: &[u8; STATUS_REPLY_SIZE], offset: usize) -> u32 {
    u32::from_le_bytes([
        raw[offset],
        raw[offset + 1],
        raw[offset + 2],
        raw[offset + 3],
    ])
}

// ============================================================================
// ERROR FLAGS
// ============================================================================

bitflags! {
    /// Error bits from offsets 8 (low byte) and 9 (high byte)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct StatusErrors: u16 {
        const NO_MEDIA = 1 << 0;
        const END_OF_MEDIA = 1 << 1;
        const CUTTER_JAM = 1 << 2;
        const WEAK_BATTERIES = 1 << 3;
        const PRINTER_IN_USE = 1 << 4;
        const HIGH_VOLTAGE_ADAPTER = 1 << 6;
        const REPLACE_MEDIA = 1 << 8;
        const EXPANSION_BUFFER_FULL = 1 << 9;
        const COMMUNICATION_ERROR = 1 << 10;
        const BUFFER_FULL = 1 << 11;
        const COVER_OPEN = 1 << 12;
        const OVERHEATING = 1 << 13;
        const BLACK_MARKING_NOT_DETECTED = 1 << 14;
        const SYSTEM_ERROR = 1 << 15;
    }
}

// ============================================================================
// STATUS / PHASE
// ============================================================================

/// Why the printer sent this reply (offset 18)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusType {
    Reply,
    PrintingCompleted,
    ErrorOccurred,
    ExitInterfaceMode,
    TurnedOff,
    Notification,
    PhaseChange,
    Unknown(u8),
}

impl From<u8> for StatusType {
    fn from(code: u8) -> Self {
        match code {
            0x00 => Self::Reply,
            0x01 => Self::PrintingCompleted,
            0x02 => Self::ErrorOccurred,
            0x03 => Self::ExitInterfaceMode,
            0x04 => Self::TurnedOff,
            0x05 => Self::Notification,
            0x06 => Self::PhaseChange,
            other => Self::Unknown(other),
        }
    }
}

/// Mechanical phase (offset 19)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhaseType {
    Editing,
    Printing,
    Unknown(u8),
}

impl From<u8> for PhaseType {
    fn from(code: u8) -> Self {
        match code {
            0x00 => Self::Editing,
            0x01 => Self::Printing,
            other => Self::Unknown(other),
        }
    }
}

// ============================================================================
// STATUS REPLY
// ============================================================================

/// # Status Reply
///
/// Field-for-field decode of the 32-byte status block. Immutable once
/// parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusReply {
    pub printhead_mark: u8,
    pub size: u8,
    pub brand_code: u8,
    pub series_code: u8,
    pub model: u8,
    pub country: u8,
    pub reserved: u16,
    /// Raw error bitmask; see [`StatusReply::errors`]
    pub error: u16,
    /// Loaded tape width in millimeters (also the tape table key)
    pub media_width: u8,
    pub media_type: u8,
    pub column_count: u8,
    pub fonts: u8,
    pub jp_fonts: u8,
    pub mode: u8,
    pub density: u8,
    pub media_length: u8,
    pub status_type: u8,
    pub phase_type: u8,
    pub phase_number: u16,
    pub notification_number: u8,
    pub exp: u8,
    pub tape_color_code: u8,
    pub text_color_code: u8,
    pub hw_setting: u32,
}

impl StatusReply {
    /// Decode a full reply. No marker validation is done here.
    pub fn parse(raw: &[u8; STATUS_REPLY_SIZE]) -> Self {
        Self {
            printhead_mark: raw[OFF_PRINTHEAD_MARK],
            size: raw[OFF_SIZE],
            brand_code: raw[OFF_BRAND_CODE],
            series_code: raw[OFF_SERIES_CODE],
            model: raw[OFF_MODEL],
            country: raw[OFF_COUNTRY],
            reserved: u16_at(raw, OFF_RESERVED),
            error: u16_at(raw, OFF_ERROR),
            media_width: raw[OFF_MEDIA_WIDTH],
            media_type: raw[OFF_MEDIA_TYPE],
            column_count: raw[OFF_COLUMN_COUNT],
            fonts: raw[OFF_FONTS],
            jp_fonts: raw[OFF_JP_FONTS],
            mode: raw[OFF_MODE],
            density: raw[OFF_DENSITY],
            media_length: raw[OFF_MEDIA_LENGTH],
            status_type: raw[OFF_STATUS_TYPE],
            phase_type: raw[OFF_PHASE_TYPE],
            phase_number: u16_at(raw, OFF_PHASE_NUMBER),
            notification_number: raw[OFF_NOTIFICATION],
            exp: raw[OFF_EXP],
            tape_color_code: raw[OFF_TAPE_COLOR],
            text_color_code: raw[OFF_TEXT_COLOR],
            hw_setting: u32_at(raw, OFF_HW_SETTING),
        }
    }

    /// Decode from a slice, checking only its length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PtouchError> {
        let raw: &[u8; STATUS_REPLY_SIZE] =
            bytes
                .try_into()
                .map_err(|_| PtouchError::InvalidStatusReply {
                    reason: "wrong length",
                    raw: bytes.to_vec(),
                })?;
        Ok(Self::parse(raw))
    }

    /// Whether the reply starts with the `80 20` marker
    pub fn has_valid_marker(&self) -> bool {
        [self.printhead_mark, self.size] == STATUS_MAGIC
    }

    /// Decoded error bits. Unknown bits are dropped.
    pub fn errors(&self) -> StatusErrors {
        StatusErrors::from_bits_truncate(self.error)
    }

    pub fn status_type(&self) -> StatusType {
        StatusType::from(self.status_type)
    }

    pub fn phase_type(&self) -> PhaseType {
        PhaseType::from(self.phase_type)
    }

    /// Resolve the tape color code.
    pub fn tape_color(&self) -> Result<&'static ColorDescriptor, PtouchError> {
        color::tape_color(self.tape_color_code)
    }

    /// Resolve the text color code.
    pub fn text_color(&self) -> Result<&'static ColorDescriptor, PtouchError> {
        color::text_color(self.text_color_code)
    }

    /// Resolve the loaded tape's dimensions at the given resolution.
    pub fn tape_info(&self, dpi: u16) -> Result<&'static TapeInfo, PtouchError> {
        tape::resolve(dpi, self.media_width)
    }

    /// Resolve every code into a [`PrinterStatus`].
    ///
    /// Fails on the first code that has no table entry.
    pub fn resolve(&self, dpi: u16) -> Result<PrinterStatus, PtouchError> {
        Ok(PrinterStatus {
            tape: *self.tape_info(dpi)?,
            tape_color: *self.tape_color()?,
            text_color: *self.text_color()?,
            density: self.density,
            errors: self.errors(),
        })
    }
}

// ============================================================================
// PRINTER STATUS
// ============================================================================

/// Human-level view of a status reply: what tape is loaded and in which
/// colors. Recomputed on every query; persisting it is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrinterStatus {
    pub tape: TapeInfo,
    pub tape_color: ColorDescriptor,
    pub text_color: ColorDescriptor,
    pub density: u8,
    pub errors: StatusErrors,
}

impl std::fmt::Display for PrinterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} on {}",
            self.tape.name, self.text_color, self.tape_color
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reply(media_width: u8, tape_color: u8, text_color: u8) -> [u8; 32] {
        let mut raw = [0u8; 32];
        raw[0] = 0x80;
        raw[1] = 0x20;
        raw[2] = b'B';
        raw[3] = 0x30;
        raw[4] = 0x67;
        raw[10] = media_width;
        raw[11] = 0x01;
        raw[24] = tape_color;
        raw[25] = text_color;
        raw
    }

    #[test]
    fn test_parse_offsets() {
        let raw: [u8; 32] = core::array::from_fn(|i| i as u8);
        let status = StatusReply::parse(&raw);

        assert_eq!(status.printhead_mark, 0);
        assert_eq!(status.model, 4);
        assert_eq!(status.reserved, 0x0706);
        assert_eq!(status.error, 0x0908);
        assert_eq!(status.media_width, 10);
        assert_eq!(status.density, 16);
        assert_eq!(status.status_type, 18);
        assert_eq!(status.phase_type, 19);
        assert_eq!(status.phase_number, 0x1514);
        assert_eq!(status.notification_number, 22);
        assert_eq!(status.exp, 23);
        assert_eq!(status.tape_color_code, 24);
        assert_eq!(status.text_color_code, 25);
        assert_eq!(status.hw_setting, 0x1F1E1D1C);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let raw = reply(12, 0x01, 0x08);
        assert_eq!(StatusReply::parse(&raw), StatusReply::parse(&raw));
    }

    #[test]
    fn test_from_slice_checks_length() {
        assert!(StatusReply::from_slice(&[0x80, 0x20]).is_err());
        assert!(StatusReply::from_slice(&reply(12, 1, 8)).is_ok());
    }

    #[test]
    fn test_marker() {
        let mut raw = reply(12, 0x01, 0x08);
        assert!(StatusReply::parse(&raw).has_valid_marker());
        raw[1] = 0x10;
        assert!(!StatusReply::parse(&raw).has_valid_marker());
    }

    #[test]
    fn test_resolve_24mm_black_on_white() {
        let status = StatusReply::parse(&reply(24, 0x01, 0x08))
            .resolve(180)
            .unwrap();

        assert_eq!(status.tape.width_mm, 24.0);
        assert_eq!(status.tape_color.name, "White");
        assert_eq!(status.text_color.name, "Black");
        assert_eq!(status.to_string(), "24mm Black on White");
    }

    #[test]
    fn test_resolve_unknown_tape_color() {
        let err = StatusReply::parse(&reply(12, 0x55, 0x08))
            .resolve(180)
            .unwrap_err();
        assert!(matches!(
            err,
            PtouchError::UnknownColorCode {
                table: "tape",
                code: 0x55
            }
        ));
    }

    #[test]
    fn test_resolve_unsupported_tape() {
        let err = StatusReply::parse(&reply(36, 0x01, 0x08))
            .resolve(180)
            .unwrap_err();
        assert!(matches!(err, PtouchError::UnsupportedTape { .. }));
    }

    #[test]
    fn test_error_flags() {
        let mut raw = reply(12, 0x01, 0x08);
        raw[8] = 0x01; // no media
        raw[9] = 0x10; // cover open
        let errors = StatusReply::parse(&raw).errors();
        assert_eq!(errors, StatusErrors::NO_MEDIA | StatusErrors::COVER_OPEN);
    }

    #[test]
    fn test_status_and_phase_types() {
        let mut raw = reply(12, 0x01, 0x08);
        raw[18] = 0x06;
        raw[19] = 0x01;
        let status = StatusReply::parse(&raw);
        assert_eq!(status.status_type(), StatusType::PhaseChange);
        assert_eq!(status.phase_type(), PhaseType::Printing);

        raw[18] = 0x42;
        assert_eq!(
            StatusReply::parse(&raw).status_type(),
            StatusType::Unknown(0x42)
        );
    }
}
