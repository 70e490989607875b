//! # Tape and Text Colors
//!
//! Lookup tables for the tape color and text (ink) color codes found in
//! bytes 24 and 25 of a status reply.
//!
//! Both tables are required to be code-unique. This is checked at compile
//! time, so a table edit that introduces a duplicate code does not build.
//! A lookup on an unlisted code is an error, never a placeholder color.
//!
//! ```
//! use ptouch::printer::color::{self, ColorTag};
//!
//! let white = color::tape_color(0x01).unwrap();
//! assert_eq!(white.name, "White");
//! assert_eq!(white.tag, ColorTag::White);
//!
//! assert!(color::tape_color(0x42).is_err());
//! ```

use serde::Serialize;

use crate::error::PtouchError;

/// Abstract color, independent of the tape's marketing name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    White,
    Black,
    Red,
    Blue,
    Yellow,
    Green,
    Silver,
    Gold,
    Grey,
    Transparent,
}

/// One entry in a color lookup table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorDescriptor {
    /// Raw code from the status reply
    pub code: u8,

    /// Display name
    pub name: &'static str,

    pub tag: ColorTag,
}

impl std::fmt::Display for ColorDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

const fn color(code: u8, name: &'static str, tag: ColorTag) -> ColorDescriptor {
    ColorDescriptor { code, name, tag }
}

/// Tape (background) colors
pub static TAPE_COLORS: &[ColorDescriptor] = &[
    // 0x01 is also reported for "Transparent (white text)" tape. Codes must
    // stay unique, so that variant stays out until hardware tells them apart.
    color(0x01, "White", ColorTag::White),
    color(0x02, "Other", ColorTag::Grey),
    color(0x03, "Transparent", ColorTag::Transparent),
    color(0x04, "Red", ColorTag::Red),
    color(0x05, "Blue", ColorTag::Blue),
    color(0x06, "Yellow", ColorTag::Yellow),
    color(0x07, "Green", ColorTag::Green),
    color(0x08, "Black", ColorTag::Black),
    color(0x20, "White (matte)", ColorTag::White),
    color(0x21, "Transparent (matte)", ColorTag::Transparent),
    color(0x22, "Silver (matte)", ColorTag::Silver),
    color(0x23, "Golden (satin)", ColorTag::Gold),
    color(0x24, "Silver (satin)", ColorTag::Silver),
    color(0x62, "Blue (F)", ColorTag::Blue),
    color(0x70, "White (tube)", ColorTag::White),
    color(0x90, "White (flex id)", ColorTag::White),
    color(0x91, "Yellow (flex id)", ColorTag::Yellow),
    color(0xF0, "Cleaning", ColorTag::Transparent),
    color(0xF1, "Stencil", ColorTag::Grey),
    color(0xFF, "Incompatible", ColorTag::Grey),
];

/// Text (ink) colors
pub static TEXT_COLORS: &[ColorDescriptor] = &[
    color(0x01, "White", ColorTag::White),
    color(0x02, "Other", ColorTag::Grey),
    color(0x04, "Red", ColorTag::Red),
    color(0x05, "Blue", ColorTag::Blue),
    color(0x08, "Black", ColorTag::Black),
    color(0x0A, "Golden", ColorTag::Gold),
    color(0x62, "Blue (F)", ColorTag::Blue),
    color(0xF0, "Cleaning", ColorTag::Transparent),
    color(0xF1, "Stencil", ColorTag::Grey),
    color(0xFF, "Incompatible", ColorTag::Grey),
];

const fn codes_unique(table: &[ColorDescriptor]) -> bool {
    let mut i = 0;
    while i < table.len() {
        let mut j = i + 1;
        while j < table.len() {
            if table[i].code == table[j].code {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const _: () = assert!(codes_unique(TAPE_COLORS), "duplicate code in TAPE_COLORS");
const _: () = assert!(codes_unique(TEXT_COLORS), "duplicate code in TEXT_COLORS");

fn lookup(
    table: &'static [ColorDescriptor],
    table_name: &'static str,
    code: u8,
) -> Result<&'static ColorDescriptor, PtouchError> {
    table
        .iter()
        .find(|c| c.code == code)
        .ok_or(PtouchError::UnknownColorCode {
            table: table_name,
            code,
        })
}

/// Resolve a tape color code.
pub fn tape_color(code: u8) -> Result<&'static ColorDescriptor, PtouchError> {
    lookup(TAPE_COLORS, "tape", code)
}

/// Resolve a text color code.
pub fn text_color(code: u8) -> Result<&'static ColorDescriptor, PtouchError> {
    lookup(TEXT_COLORS, "text", code)
}

// ============================================================================
// TESTS
// ============================================================================
