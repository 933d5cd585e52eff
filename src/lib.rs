// SPDX-License-Identifier: MIT
//! # BBES Codec
//!
//! A layered braille-based compression codec. Text is mapped one byte
//! per braille cell, common sequences are contracted to single dot-8
//! symbols, and the result travels in a small versioned container.
//!
//! ## Format Overview
//!
//! The BBES (Binary Braille Encoding System) format packs each braille
//! cell's eight dots into one byte, so a packed character costs exactly
//! one byte regardless of its UTF-8 width. Contraction dictionaries per
//! language replace frequent words and letter groups with single cells
//! from the dot-8 namespace, which packed characters never occupy.
//!
//! ## Format Specification
//!
//! ```text
//! Binary Braille Encoding System (BBES) Format v1
//! ===============================================
//!
//! Header (15 bytes, little-endian):
//! - Magic: "BBES" (4 bytes)
//! - Version: 1 (1 byte)
//! - Flags: bit 0 embedded dictionary, bit 1 adaptive symbols (2 bytes)
//! - Original Length: character count of the source text (4 bytes)
//! - Dictionary Size: embedded dictionary block size (4 bytes)
//!
//! Data sections (variable size):
//! - Dictionary: JSON contraction table + content hash (optional)
//! - Payload: one byte per braille cell
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use bbes_codec::{decode, encode};
//!
//! let bytes = encode("the people went out").unwrap();
//! assert_eq!(decode(&bytes).unwrap(), "the people went out");
//! ```
//!
//! Beyond the container, [`adaptive`] holds a separate experiment: a
//! codec for structured messages that assigns variable-bit-depth codes
//! to a closed concept vocabulary and refits them to recent traffic.

pub mod adaptive;
pub mod ascii;
pub mod cell;
pub mod container;
pub mod dictionary;
pub mod format;
pub mod packing;
pub mod reader;
pub mod script;
pub mod writer;

// Re-export main types
pub use adaptive::{AdaptiveConceptCodec, AdaptiveConfig, AdaptiveError, CodecPhase, Concept};
pub use ascii::{CharClass, TableError};
pub use cell::{BrailleCell, CellError, DotDomain};
pub use container::CompressedContainer;
pub use dictionary::{ContractionEntry, ContractionTable, DictionaryError};
pub use format::{BbesHeader, FormatError, BBES_HEADER_SIZE, BBES_MAGIC, BBES_VERSION};
pub use packing::PackingError;
pub use reader::{decode, ContainerReader, ContainerStats, DecodeError};
pub use script::Script;
pub use writer::{
    benchmark, compression_ratio, encode, BenchmarkReport, ContainerWriter, DictionaryBlock,
    EncodeError, EncodeOptions,
};
