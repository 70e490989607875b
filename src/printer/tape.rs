//! # Tape Geometry
//!
//! Physical dimensions of the TZe tape cassettes, indexed by print
//! resolution and by the media width code a status reply reports.
//!
//! ## 180 DPI Tapes
//!
//! | Tape | Code | Width (mm) | Printable (px) | Vertical padding (mm) |
//! |------|------|------------|----------------|-----------------------|
//! | 3.5mm | 3 | 3.4 | 24 | 0.0 |
//! | 6mm | 6 | 5.9 | 42 | 0.7 |
//! | 9mm | 9 | 9.0 | 64 | 0.98 |
//! | 12mm | 12 | 11.9 | 84 | 0.98 |
//! | 18mm | 18 | 18.1 | 128 | 1.12 |
//! | 24mm | 24 | 24.0 | 170 | 2.96 |
//!
//! An unlisted width is an error; the nearest size is never guessed.

use serde::Serialize;

use crate::error::PtouchError;

/// Dimensions of one tape size at a given resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TapeInfo {
    /// Display name, e.g. "12mm"
    pub name: &'static str,

    /// Media width code reported in the status reply
    pub designated_size: u8,

    /// Brother tape identifier
    pub tape_id: u16,

    /// Physical tape width
    pub width_mm: f32,

    /// Printable height across the tape in print-head pixels
    pub width_px: u16,

    /// Unprintable margin at the top and bottom edge of the tape
    pub vertical_padding_mm: f32,
}

const fn tape(
    name: &'static str,
    designated_size: u8,
    tape_id: u16,
    width_mm: f32,
    width_px: u16,
    vertical_padding_mm: f32,
) -> TapeInfo {
    TapeInfo {
        name,
        designated_size,
        tape_id,
        width_mm,
        width_px,
        vertical_padding_mm,
    }
}

/// Tape table for 180 DPI print heads
pub static TAPES_180_DPI: &[TapeInfo] = &[
    tape("3.5mm", 3, 263, 3.4, 24, 0.0),
    tape("6mm", 6, 257, 5.9, 42, 0.7),
    tape("9mm", 9, 258, 9.0, 64, 0.98),
    tape("12mm", 12, 259, 11.9, 84, 0.98),
    tape("18mm", 18, 260, 18.1, 128, 1.12),
    tape("24mm", 24, 261, 24.0, 170, 2.96),
];

/// Tape table for a print resolution, if one is known.
pub fn table_for_dpi(dpi: u16) -> Option<&'static [TapeInfo]> {
    match dpi {
        180 => Some(TAPES_180_DPI),
        _ => None,
    }
}

/// Resolve a media width code to tape dimensions.
///
/// ## Errors
///
/// [`PtouchError::UnsupportedTape`] when the resolution has no table or
/// the width code is not in it.
pub fn resolve(dpi: u16, media_width: u8) -> Result<&'static TapeInfo, PtouchError> {
    table_for_dpi(dpi)
        .and_then(|table| table.iter().find(|t| t.designated_size == media_width))
        .ok_or(PtouchError::UnsupportedTape { media_width, dpi })
}

impl TapeInfo {
    /// Printable height in millimeters after removing edge padding
    pub fn printable_mm(&self) -> f32 {
        self.width_mm - 2.0 * self.vertical_padding_mm
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_24mm() {
        let tape = resolve(180, 24).unwrap();
        assert_eq!(tape.name, "24mm");
        assert_eq!(tape.width_mm, 24.0);
        assert_eq!(tape.width_px, 170);
    }

    #[test]
    fn test_resolve_unknown_width() {
        let err = resolve(180, 36).unwrap_err();
        assert!(matches!(
            err,
            PtouchError::UnsupportedTape {
                media_width: 36,
                dpi: 180
            }
        ));
    }

    #[test]
    fn test_resolve_does_not_round() {
        // 11 is between 9mm and 12mm; neither is chosen
        assert!(resolve(180, 11).is_err());
    }

    #[test]
    fn test_resolve_unknown_dpi() {
        assert!(matches!(
            resolve(360, 12),
            Err(PtouchError::UnsupportedTape { dpi: 360, .. })
        ));
    }

    #[test]
    fn test_tapes_fit_print_head() {
        // Every tape narrower than 24mm fits a 128 px head
        for tape in TAPES_180_DPI.iter().filter(|t| t.designated_size < 24) {
            assert!(tape.width_px <= 128, "{}", tape.name);
        }
    }

    #[test]
    fn test_printable_mm() {
        let tape = resolve(180, 12).unwrap();
        assert!((tape.printable_mm() - 9.94).abs() < 0.001);
    }
}
