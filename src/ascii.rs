// SPDX-License-Identifier: MIT
//! Fixed bijection between the 128 standard character codes and braille cells
//!
//! The 0x20..0x5F range follows the published North American Braille ASCII
//! table verbatim. The remaining ranges are derived from it by fixed rules:
//! the lowercase range reuses the corresponding upper pattern plus dot 7,
//! and control codes add dots 7 and 8 to the corresponding 0x40-range
//! pattern. The table is data; nothing here re-derives dot shapes.

use once_cell::sync::Lazy;

use crate::cell::BrailleCell;

/// Braille ASCII patterns for codes 0x20..=0x5F, indexed by packed cell
/// value: `BRAILLE_ASCII_ORDER[value]` is the character whose cell has that
/// value.
const BRAILLE_ASCII_ORDER: &str = r#" A1B'K2L@CIF/MSP"E3H9O6R^DJG>NTQ,*5<-U8V.%[$+X!&;:4\0Z7(_?W]#Y)="#;

/// Dot 7 marker bit (lowercase)
const DOT7: u8 = 0x40;

/// Dots 7+8 marker bits (control codes)
const DOT78: u8 = 0xC0;

/// Fixed offset between the upper and lower letter ranges
const CASE_OFFSET: u8 = 0x20;

/// Character code -> packed cell value, for codes 0..=127
static ENCODE_TABLE: Lazy<[u8; 128]> = Lazy::new(|| {
    let mut table = [0u8; 128];
    for (value, c) in BRAILLE_ASCII_ORDER.chars().enumerate() {
        table[c as usize] = value as u8;
    }
    // Lowercase range: upper pattern plus dot 7
    for code in 0x60..=0x7F {
        table[code] = table[code - CASE_OFFSET as usize] | DOT7;
    }
    // Control codes: 0x40-range pattern plus dots 7 and 8
    for code in 0x00..=0x1F {
        table[code] = table[code + 0x40] | DOT78;
    }
    table
});

/// Packed cell value -> character code; `None` where no entry exists
static DECODE_TABLE: Lazy<[Option<u8>; 256]> = Lazy::new(|| {
    let mut table = [None; 256];
    for (code, &value) in ENCODE_TABLE.iter().enumerate() {
        table[value as usize] = Some(code as u8);
    }
    table
});

/// Errors from table lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("character code {0} is outside the 7-bit table")]
    OutOfRange(u32),

    #[error("no table entry for cell value {}", .0.value())]
    NoMapping(BrailleCell),
}

/// Character classes, decided purely by code-point range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    Control,
    Space,
    Punctuation,
    Digit,
    UpperLetter,
    Symbol,
    LowerLetter,
}

/// Whether a packed cell value is claimed by the 7-bit table
pub(crate) fn has_entry(value: u8) -> bool {
    DECODE_TABLE[value as usize].is_some()
}

/// Map a character to its braille cell
pub fn encode(c: char) -> Result<BrailleCell, TableError> {
    let code = c as u32;
    if code > 127 {
        return Err(TableError::OutOfRange(code));
    }
    Ok(BrailleCell::from_value(ENCODE_TABLE[code as usize]))
}

/// Map a cell back to its character
pub fn decode(cell: BrailleCell) -> Result<char, TableError> {
    DECODE_TABLE[cell.value() as usize]
        .map(char::from)
        .ok_or(TableError::NoMapping(cell))
}

/// Classify a character code by range
pub fn classify(c: char) -> Result<CharClass, TableError> {
    let code = c as u32;
    match code {
        0..=31 | 127 => Ok(CharClass::Control),
        32 => Ok(CharClass::Space),
        33..=47 | 58..=64 => Ok(CharClass::Punctuation),
        48..=57 => Ok(CharClass::Digit),
        65..=90 => Ok(CharClass::UpperLetter),
        91..=96 | 123..=126 => Ok(CharClass::Symbol),
        97..=122 => Ok(CharClass::LowerLetter),
        other => Err(TableError::OutOfRange(other)),
    }
}

/// Shift between the upper and lower letter ranges; non-letters pass through
pub fn toggle_case(c: char) -> char {
    match classify(c) {
        Ok(CharClass::UpperLetter) => char::from(c as u8 + CASE_OFFSET),
        Ok(CharClass::LowerLetter) => char::from(c as u8 - CASE_OFFSET),
        _ => c,
    }
}
