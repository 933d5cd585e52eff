// SPDX-License-Identifier: MIT
//! Braille cell codec: dot patterns, packed values and Unicode code points
//!
//! A cell is a set of raised dots drawn from positions 1-8 (the standard
//! 2x4 grid). The packed value is the sum of `2^(position - 1)` over the
//! active dots, which is also the offset of the cell inside the Unicode
//! braille block starting at U+2800.

/// First code point of the Unicode braille block
pub const BRAILLE_BLOCK_START: u32 = 0x2800;

/// Last code point of the Unicode braille block
pub const BRAILLE_BLOCK_END: u32 = 0x28FF;

/// Errors from cell construction and conversion
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellError {
    #[error("invalid dot position {dot}: must be within 1..={max}")]
    InvalidDot { dot: u8, max: u8 },

    #[error("code point U+{0:04X} is outside the braille block")]
    OutOfRange(u32),

    #[error("binary string must be 6 or 8 characters, got {0}")]
    BadWidth(usize),

    #[error("binary string may only contain '0' and '1', got {0:?}")]
    BadDigit(char),
}

/// Dot domain of a cell: the full 8-dot grid or the reduced 6-dot alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DotDomain {
    SixDot,
    #[default]
    EightDot,
}

impl DotDomain {
    /// Highest valid dot position in this domain
    pub fn max_dot(self) -> u8 {
        match self {
            DotDomain::SixDot => 6,
            DotDomain::EightDot => 8,
        }
    }

    /// Bit mask covering every dot in this domain
    pub fn mask(self) -> u8 {
        match self {
            DotDomain::SixDot => 0x3F,
            DotDomain::EightDot => 0xFF,
        }
    }
}

/// A single braille cell, stored as its packed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BrailleCell(u8);

impl BrailleCell {
    /// Create a cell directly from its packed value
    pub fn from_value(value: u8) -> Self {
        Self(value)
    }

    /// Create a cell from a list of active dot positions
    ///
    /// Duplicated positions are allowed and collapse to one raised dot.
    pub fn from_dots(dots: &[u8], domain: DotDomain) -> Result<Self, CellError> {
        let max = domain.max_dot();
        let mut value = 0u8;
        for &dot in dots {
            if dot < 1 || dot > max {
                return Err(CellError::InvalidDot { dot, max });
            }
            value |= 1 << (dot - 1);
        }
        Ok(Self(value))
    }

    /// Create a cell from a Unicode braille block code point
    pub fn from_code_point(code_point: u32) -> Result<Self, CellError> {
        if !(BRAILLE_BLOCK_START..=BRAILLE_BLOCK_END).contains(&code_point) {
            return Err(CellError::OutOfRange(code_point));
        }
        Ok(Self((code_point - BRAILLE_BLOCK_START) as u8))
    }

    /// Create a cell from a character in the braille block
    pub fn from_char(c: char) -> Result<Self, CellError> {
        Self::from_code_point(c as u32)
    }

    /// Packed value in 0..=255
    pub fn value(self) -> u8 {
        self.0
    }

    /// Code point inside the Unicode braille block
    pub fn code_point(self) -> u32 {
        BRAILLE_BLOCK_START + self.0 as u32
    }

    /// The braille character for this cell
    pub fn as_char(self) -> char {
        // The whole block U+2800..U+28FF is valid Unicode
        char::from_u32(self.code_point()).unwrap_or('\u{2800}')
    }

    /// Active dot positions, ascending
    pub fn dots(self) -> Vec<u8> {
        (1..=8).filter(|&d| self.has_dot(d)).collect()
    }

    /// Whether the given dot position is raised
    pub fn has_dot(self, dot: u8) -> bool {
        (1..=8).contains(&dot) && self.0 & (1 << (dot - 1)) != 0
    }

    /// Number of raised dots
    pub fn dot_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Fixed-width '0'/'1' string, most significant dot first
    ///
    /// Six-dot rendering fails with `InvalidDot` if dots 7 or 8 are raised.
    pub fn to_binary_string(self, domain: DotDomain) -> Result<String, CellError> {
        if self.0 & !domain.mask() != 0 {
            let dot = if self.has_dot(8) { 8 } else { 7 };
            return Err(CellError::InvalidDot {
                dot,
                max: domain.max_dot(),
            });
        }
        Ok(match domain {
            DotDomain::SixDot => format!("{:06b}", self.0),
            DotDomain::EightDot => format!("{:08b}", self.0),
        })
    }

    /// Inverse of [`to_binary_string`](Self::to_binary_string); the width of
    /// the input selects the domain (6 or 8 characters).
    pub fn from_binary_string(bits: &str) -> Result<Self, CellError> {
        let width = bits.chars().count();
        if width != 6 && width != 8 {
            return Err(CellError::BadWidth(width));
        }
        let mut value = 0u8;
        for c in bits.chars() {
            value <<= 1;
            match c {
                '0' => {}
                '1' => value |= 1,
                other => return Err(CellError::BadDigit(other)),
            }
        }
        Ok(Self(value))
    }

    /// Swap the column pairs {1,4}, {2,5}, {3,6} and {7,8}
    pub fn mirror(self) -> Self {
        let v = self.0;
        let left = (v & 0b0000_0111) << 3;
        let right = (v & 0b0011_1000) >> 3;
        let seven = (v & 0b0100_0000) << 1;
        let eight = (v & 0b1000_0000) >> 1;
        Self(left | right | seven | eight)
    }

    /// Complement of the active set within the domain
    pub fn invert(self, domain: DotDomain) -> Self {
        Self(!self.0 & domain.mask())
    }

    /// Compare two cells dot by dot
    pub fn compare(self, other: Self) -> CellComparison {
        let shared = self.0 & other.0;
        let only_a = self.0 & !other.0;
        let only_b = other.0 & !self.0;
        let larger = self.dot_count().max(other.dot_count()).max(1);
        CellComparison {
            shared: Self(shared).dots(),
            only_a: Self(only_a).dots(),
            only_b: Self(only_b).dots(),
            similarity: shared.count_ones() as f64 / larger as f64,
        }
    }
}

impl std::fmt::Display for BrailleCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl std::str::FromStr for BrailleCell {
    type Err = CellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => Err(CellError::BadWidth(s.chars().count())),
        }
    }
}

/// Result of [`BrailleCell::compare`]
#[derive(Debug, Clone, PartialEq)]
pub struct CellComparison {
    /// Dots raised in both cells
    pub shared: Vec<u8>,
    /// Dots raised only in the left cell
    pub only_a: Vec<u8>,
    /// Dots raised only in the right cell
    pub only_b: Vec<u8>,
    /// `|shared| / max(|a|, |b|, 1)`
    pub similarity: f64,
}
