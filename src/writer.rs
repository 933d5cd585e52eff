// SPDX-License-Identifier: MIT
//! BBES container writer: text in, versioned byte buffer out

use std::io::Write;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::dictionary::{ContractionEntry, ContractionTable};
use crate::format::{flags, BbesHeader};
use crate::packing::{self, PackingError};

/// Errors that can occur during encoding
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("packing failed: {0}")]
    Packing(#[from] PackingError),

    #[error("dictionary serialization failed: {0}")]
    DictionarySerialization(#[from] serde_json::Error),

    #[error("text too long for the container: {chars} characters")]
    TooLarge { chars: usize },

    #[error("dictionary block too large: {bytes} bytes")]
    DictionaryTooLarge { bytes: usize },
}

/// Encoding options, mapped onto the header flag bits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Embed the contraction table (and content hash) into the container
    pub embed_dictionary: bool,

    /// Mark the payload as built from adaptively assigned symbols
    pub adaptive_symbols: bool,
}

/// The embedded dictionary block: the exact table the payload was packed
/// with, its language, and a hash of the original text.
///
/// The hash is the mismatch guard: decoding with the wrong table produces
/// silently garbled text otherwise, since nothing else in the container
/// identifies the language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryBlock {
    pub language: String,
    pub entries: Vec<ContractionEntry>,
    pub content_sha256: String,
}

impl DictionaryBlock {
    /// Build the block for a text/table pairing
    pub fn new(table: &ContractionTable, text: &str) -> Self {
        Self {
            language: table.script().language_code().to_string(),
            entries: table.entries().to_vec(),
            content_sha256: sha256_hex(text),
        }
    }
}

/// Hex SHA-256 of a text's UTF-8 bytes
pub(crate) fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Builder for BBES containers
pub struct ContainerWriter {
    language: String,
    options: EncodeOptions,
}

impl ContainerWriter {
    /// Create a writer for English text with default options
    pub fn new() -> Self {
        Self::for_language("en")
    }

    /// Create a writer whose table matches the detected script of a sample
    pub fn for_text(sample: &str) -> Self {
        Self::for_language(crate::script::Script::detect(sample).language_code())
    }

    /// Create a writer for the given language code
    pub fn for_language(code: impl Into<String>) -> Self {
        Self {
            language: code.into(),
            options: EncodeOptions::default(),
        }
    }

    /// Set encoding options
    pub fn with_options(mut self, options: EncodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Encode text into a BBES byte buffer
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, EncodeError> {
        let table = ContractionTable::for_language(&self.language);
        let payload = packing::to_binary(text, table)?;

        let chars = text.chars().count();
        let original_len = u32::try_from(chars).map_err(|_| EncodeError::TooLarge { chars })?;

        let dictionary = if self.options.embed_dictionary {
            serde_json::to_vec(&DictionaryBlock::new(table, text))?
        } else {
            Vec::new()
        };
        let dictionary_size = u32::try_from(dictionary.len())
            .map_err(|_| EncodeError::DictionaryTooLarge {
                bytes: dictionary.len(),
            })?;

        let mut header_flags = 0u16;
        if self.options.embed_dictionary {
            header_flags |= flags::EMBEDDED_DICTIONARY;
        }
        if self.options.adaptive_symbols {
            header_flags |= flags::ADAPTIVE_SYMBOLS;
        }

        let header = BbesHeader {
            flags: header_flags,
            original_len,
            dictionary_size,
            ..BbesHeader::new()
        };

        // Exact capacity: header + dictionary + payload
        let mut buffer =
            Vec::with_capacity(crate::format::BBES_HEADER_SIZE + dictionary.len() + payload.len());
        header.write_to_buffer(&mut buffer);
        buffer.extend_from_slice(&dictionary);
        buffer.extend_from_slice(&payload);
        Ok(buffer)
    }
}

impl Default for ContainerWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode English text with default options
pub fn encode(text: &str) -> Result<Vec<u8>, EncodeError> {
    ContainerWriter::new().encode(text)
}

/// Size reduction relative to the original: `1 - compressed / original`.
///
/// Positive means smaller, 0 means equal, negative means the "compressed"
/// form grew. The value never exceeds 1.
pub fn compression_ratio(original: usize, compressed: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    1.0 - compressed as f64 / original as f64
}

/// Size comparison of one text across encodings
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    /// Character count of the input
    pub original_chars: usize,
    /// UTF-8 byte count of the input
    pub utf8_bytes: usize,
    /// Full BBES container size (header included)
    pub bbes_bytes: usize,
    /// BBES payload size without the envelope
    pub payload_bytes: usize,
    /// zlib over the UTF-8 bytes, as a general-purpose estimate
    pub zlib_bytes: usize,
    /// Ratio of the payload vs the character count
    pub ratio_vs_plain: f64,
    /// Ratio of the whole container vs the UTF-8 bytes
    pub ratio_vs_utf8: f64,
    /// Ratio of the whole container vs the zlib estimate
    pub ratio_vs_zlib: f64,
}

/// Compare BBES output against plain text, UTF-8 and a zlib estimate
pub fn benchmark(text: &str) -> Result<BenchmarkReport, EncodeError> {
    let original_chars = text.chars().count();
    let utf8_bytes = text.len();
    let container = encode(text)?;
    let payload_bytes = container.len() - crate::format::BBES_HEADER_SIZE;
    let zlib_bytes = zlib_size(text.as_bytes());

    Ok(BenchmarkReport {
        original_chars,
        utf8_bytes,
        bbes_bytes: container.len(),
        payload_bytes,
        zlib_bytes,
        ratio_vs_plain: compression_ratio(original_chars, payload_bytes),
        ratio_vs_utf8: compression_ratio(utf8_bytes, container.len()),
        ratio_vs_zlib: compression_ratio(zlib_bytes, container.len()),
    })
}

/// Compressed size under zlib with the fast level
fn zlib_size(data: &[u8]) -> usize {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::fast());
    // Writing to a Vec cannot fail
    let _ = encoder.write_all(data);
    encoder.finish().map(|v| v.len()).unwrap_or(0)
}
