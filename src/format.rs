// SPDX-License-Identifier: MIT
//! BBES container format: magic, version, flags and the fixed header

/// BBES magic bytes
pub const BBES_MAGIC: &[u8; 4] = b"BBES";

/// Highest container version this reader understands
pub const BBES_VERSION: u8 = 1;

/// Header size in bytes
pub const BBES_HEADER_SIZE: usize = 15;

/// Header flag bits
pub mod flags {
    /// A dictionary block follows the header
    pub const EMBEDDED_DICTIONARY: u16 = 0x0001;

    /// Payload was produced with adaptively assigned symbols
    pub const ADAPTIVE_SYMBOLS: u16 = 0x0002;

    /// Bits 2-15 are reserved and must be zero
    pub const RESERVED_MASK: u16 = !(EMBEDDED_DICTIONARY | ADAPTIVE_SYMBOLS);
}

/// Errors from header parsing and validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("invalid magic bytes: expected {expected:?}, got {got:?}")]
    BadMagic { expected: [u8; 4], got: [u8; 4] },

    #[error("buffer truncated: need {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("reserved flag bits set: {0:#06x}")]
    ReservedFlags(u16),

    #[error("dictionary size is {size} but the embedded-dictionary flag is unset")]
    DictionaryWithoutFlag { size: u32 },
}

/// BBES file header (15 bytes, little-endian multi-byte fields)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BbesHeader {
    /// Magic bytes "BBES"
    pub magic: [u8; 4],

    /// Format version (currently 1)
    pub version: u8,

    /// Flag bits, see [`flags`]
    pub flags: u16,

    /// Original text length in characters
    pub original_len: u32,

    /// Size in bytes of the embedded dictionary block (0 when absent)
    pub dictionary_size: u32,
}

impl BbesHeader {
    /// Create a header with default values
    pub fn new() -> Self {
        Self {
            magic: *BBES_MAGIC,
            version: BBES_VERSION,
            flags: 0,
            original_len: 0,
            dictionary_size: 0,
        }
    }

    /// Parse a header from the first [`BBES_HEADER_SIZE`] bytes of a buffer
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < BBES_HEADER_SIZE {
            return Err(FormatError::Truncated {
                needed: BBES_HEADER_SIZE,
                got: bytes.len(),
            });
        }

        // Fixed-size slices; the length was checked above
        let magic = bytes[0..4].try_into().unwrap();
        let version = bytes[4];
        let flags = u16::from_le_bytes(bytes[5..7].try_into().unwrap());
        let original_len = u32::from_le_bytes(bytes[7..11].try_into().unwrap());
        let dictionary_size = u32::from_le_bytes(bytes[11..15].try_into().unwrap());

        Ok(Self {
            magic,
            version,
            flags,
            original_len,
            dictionary_size,
        })
    }

    /// Validate everything except the version.
    ///
    /// A newer version is deliberately not an error here: readers log it and
    /// attempt a best-effort decode.
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.magic != *BBES_MAGIC {
            return Err(FormatError::BadMagic {
                expected: *BBES_MAGIC,
                got: self.magic,
            });
        }

        if self.flags & flags::RESERVED_MASK != 0 {
            return Err(FormatError::ReservedFlags(self.flags));
        }

        if !self.has_flag(flags::EMBEDDED_DICTIONARY) && self.dictionary_size != 0 {
            return Err(FormatError::DictionaryWithoutFlag {
                size: self.dictionary_size,
            });
        }

        Ok(())
    }

    /// Check a single flag bit
    #[inline]
    pub fn has_flag(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }

    /// Offset of the payload from the start of the buffer
    #[inline]
    pub fn payload_offset(&self) -> usize {
        BBES_HEADER_SIZE + self.dictionary_size as usize
    }

    /// Append the header to a buffer
    pub fn write_to_buffer(&self, buffer: &mut Vec<u8>) {
        buffer.reserve(BBES_HEADER_SIZE);
        buffer.extend_from_slice(&self.magic);
        buffer.push(self.version);
        buffer.extend_from_slice(&self.flags.to_le_bytes());
        buffer.extend_from_slice(&self.original_len.to_le_bytes());
        buffer.extend_from_slice(&self.dictionary_size.to_le_bytes());
    }

    /// Header as a fixed byte array
    pub fn to_bytes(&self) -> [u8; BBES_HEADER_SIZE] {
        let mut bytes = [0u8; BBES_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes[5..7].copy_from_slice(&self.flags.to_le_bytes());
        bytes[7..11].copy_from_slice(&self.original_len.to_le_bytes());
        bytes[11..15].copy_from_slice(&self.dictionary_size.to_le_bytes());
        bytes
    }
}

impl Default for BbesHeader {
    fn default() -> Self {
        Self::new()
    }
}
