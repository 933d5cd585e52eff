// SPDX-License-Identifier: MIT
//! Text/binary packing engine: the dictionary + cell pairing
//!
//! `to_binary` dictionary-compresses the text and then maps every remaining
//! scalar to exactly one cell, so the payload is one byte per cell value.
//! ASCII goes through the 7-bit table, Cyrillic letters through the built-in
//! Russian braille letter table (uppercase adds dot 7), and braille block
//! characters (including contraction symbols) pass through as their packed
//! value. `from_binary` reverses the byte mapping and runs the reverse
//! contraction pass.
//!
//! Where a script letter table and the ASCII table claim the same cell
//! value, the letter table wins on decode. Mixed-script text therefore does
//! not survive a round trip under a non-Latin table; that is the
//! dictionary-mismatch hazard the container's embedded content hash exists
//! to catch.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::ascii;
use crate::cell::BrailleCell;
use crate::dictionary::ContractionTable;
use crate::script::Script;

/// Errors from the packing layer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackingError {
    #[error("no cell mapping for character {0:?}")]
    NoMapping(char),
}

/// Lowercase Russian letters and their six-dot braille patterns
/// (packed values); uppercase adds the dot-7 marker.
const RU_LETTERS: &[(char, u8)] = &[
    ('а', 1),
    ('б', 3),
    ('в', 58),
    ('г', 27),
    ('д', 25),
    ('е', 17),
    ('ё', 33),
    ('ж', 26),
    ('з', 53),
    ('и', 10),
    ('й', 47),
    ('к', 5),
    ('л', 7),
    ('м', 13),
    ('н', 29),
    ('о', 21),
    ('п', 15),
    ('р', 23),
    ('с', 14),
    ('т', 30),
    ('у', 37),
    ('ф', 11),
    ('х', 19),
    ('ц', 9),
    ('ч', 31),
    ('ш', 49),
    ('щ', 45),
    ('ъ', 55),
    ('ы', 46),
    ('ь', 62),
    ('э', 42),
    ('ю', 51),
    ('я', 43),
];

/// Dot 7 marker for uppercase letters
const DOT7: u8 = 0x40;

static RU_ENCODE: Lazy<HashMap<char, u8>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for &(lower, value) in RU_LETTERS {
        map.insert(lower, value);
        for upper in lower.to_uppercase() {
            map.insert(upper, value | DOT7);
        }
    }
    map
});

static RU_DECODE: Lazy<HashMap<u8, char>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for &(lower, value) in RU_LETTERS {
        map.insert(value, lower);
        if let Some(upper) = lower.to_uppercase().next() {
            map.insert(value | DOT7, upper);
        }
    }
    map
});

fn letter_to_cell(script: Script, c: char) -> Option<u8> {
    match script {
        Script::Cyrillic => RU_ENCODE.get(&c).copied(),
        _ => None,
    }
}

fn cell_to_letter(script: Script, value: u8) -> Option<char> {
    match script {
        Script::Cyrillic => RU_DECODE.get(&value).copied(),
        _ => None,
    }
}

/// Pack text into one byte per cell under the given contraction table
pub fn to_binary(text: &str, table: &ContractionTable) -> Result<Vec<u8>, PackingError> {
    let compressed = table.compress(text);
    let script = table.script();
    let mut bytes = Vec::with_capacity(compressed.chars().count());
    for c in compressed.chars() {
        let value = if let Ok(cell) = BrailleCell::from_char(c) {
            cell.value()
        } else if let Some(value) = letter_to_cell(script, c) {
            value
        } else if let Ok(cell) = ascii::encode(c) {
            cell.value()
        } else {
            return Err(PackingError::NoMapping(c));
        };
        bytes.push(value);
    }
    Ok(bytes)
}

/// Unpack bytes back into text under the given contraction table.
///
/// Every byte maps to something: a script letter, a 7-bit character, or a
/// literal braille cell, in that precedence. Contraction symbols come back
/// as braille characters and are resolved by the reverse contraction pass.
pub fn from_binary(bytes: &[u8], table: &ContractionTable) -> String {
    let script = table.script();
    let mut text = String::with_capacity(bytes.len());
    for &value in bytes {
        if let Some(letter) = cell_to_letter(script, value) {
            text.push(letter);
        } else if let Ok(c) = ascii::decode(BrailleCell::from_value(value)) {
            text.push(c);
        } else {
            text.push(BrailleCell::from_value(value).as_char());
        }
    }
    table.decompress(&text)
}
