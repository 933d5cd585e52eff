// SPDX-License-Identifier: MIT
//! BBES container reader: byte buffer in, original text out

use tracing::warn;

use crate::container::CompressedContainer;
use crate::dictionary::{ContractionTable, DictionaryError};
use crate::format::{flags, FormatError, BBES_VERSION};
use crate::packing;
use crate::script::Script;
use crate::writer::{compression_ratio, sha256_hex, DictionaryBlock};

/// Errors that can occur during decoding
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("container format error: {0}")]
    Format(#[from] FormatError),

    #[error("embedded dictionary is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("embedded dictionary is unusable: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("decoded text does not match the embedded hash: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

/// Decoder over a parsed container
#[derive(Debug)]
pub struct ContainerReader {
    container: CompressedContainer,
    language: String,
}

impl ContainerReader {
    /// Parse a container from a byte slice
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(Self {
            container: CompressedContainer::from_slice(bytes)?,
            language: "en".to_string(),
        })
    }

    /// Parse a container, taking ownership of the buffer
    pub fn from_vec(bytes: Vec<u8>) -> Result<Self, DecodeError> {
        Ok(Self {
            container: CompressedContainer::from_vec(bytes)?,
            language: "en".to_string(),
        })
    }

    /// Override the language used when no dictionary is embedded.
    ///
    /// Containers written without `EMBEDDED_DICTIONARY` carry no language
    /// tag, so the right table must be supplied out of band.
    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.language = code.into();
        self
    }

    /// Access the parsed container
    pub fn container(&self) -> &CompressedContainer {
        &self.container
    }

    /// Decode the payload back into text
    pub fn decode(&self) -> Result<String, DecodeError> {
        let header = self.container.header();
        if header.version > BBES_VERSION {
            // Unknown versions are decoded best effort rather than rejected
            warn!(
                version = header.version,
                supported = BBES_VERSION,
                "container version is newer than this reader"
            );
        }

        match self.container.dictionary() {
            Some(block_bytes) => {
                let block: DictionaryBlock = serde_json::from_slice(block_bytes)?;
                let table = ContractionTable::from_entries(
                    Script::from_language(&block.language),
                    block.entries.clone(),
                )?;
                let text = packing::from_binary(self.container.payload(), &table);

                let actual = sha256_hex(&text);
                if actual != block.content_sha256 {
                    return Err(DecodeError::ChecksumMismatch {
                        expected: block.content_sha256,
                        actual,
                    });
                }
                Ok(text)
            }
            None => {
                let table = ContractionTable::for_language(&self.language);
                Ok(packing::from_binary(self.container.payload(), table))
            }
        }
    }

    /// Size statistics for the container
    pub fn stats(&self) -> ContainerStats {
        let header = self.container.header();
        ContainerStats {
            original_chars: header.original_len as usize,
            container_bytes: self.container.size(),
            dictionary_bytes: header.dictionary_size as usize,
            payload_bytes: self.container.payload().len(),
            has_dictionary: header.has_flag(flags::EMBEDDED_DICTIONARY),
            adaptive_symbols: header.has_flag(flags::ADAPTIVE_SYMBOLS),
        }
    }
}

/// Sizes reported by [`ContainerReader::stats`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerStats {
    pub original_chars: usize,
    pub container_bytes: usize,
    pub dictionary_bytes: usize,
    pub payload_bytes: usize,
    pub has_dictionary: bool,
    pub adaptive_symbols: bool,
}

impl ContainerStats {
    /// Payload size reduction relative to the character count
    pub fn compression_ratio(&self) -> f64 {
        compression_ratio(self.original_chars, self.payload_bytes)
    }
}

/// Decode an English container with default options
pub fn decode(bytes: &[u8]) -> Result<String, DecodeError> {
    ContainerReader::from_slice(bytes)?.decode()
}
