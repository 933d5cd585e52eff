// SPDX-License-Identifier: MIT
//! Adaptive concept codec: variable-bit-depth codes that track message
//! frequency over a sliding conversation window.
//!
//! Messages are flattened into sequences over a closed concept
//! vocabulary, and each concept is written as a short token whose bit
//! depth shrinks as the concept becomes common in recent traffic. After
//! a warmup period the code table is refitted on every message from the
//! most recent slice of the window.

mod codebook;
mod concepts;
mod window;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::debug;

pub use codebook::{
    decode_tokens, encode_token, AdaptiveError, CodeAssignment, CodeBook, ConceptFrequencyTable,
    UNKNOWN_SENTINEL,
};
pub use concepts::{extract_concepts, Concept};
pub use window::ConversationWindow;

/// Tuning knobs for the adaptive codec
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveConfig {
    /// Messages retained for frequency estimation
    pub context_window: usize,
    /// Messages before the first reassignment
    pub warmup_messages: usize,
    /// Fraction of the window used when refitting
    pub recent_fraction: f64,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            context_window: 50,
            warmup_messages: 10,
            recent_fraction: 0.2,
        }
    }
}

/// Codec lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecPhase {
    /// No messages seen yet
    Initialized,
    /// Collecting frequencies on the default table
    Warming,
    /// Reassigning codes on every message
    Adapted,
}

/// The outcome of compressing one message
#[derive(Debug, Clone)]
pub struct CompressionResult {
    /// Token stream as a bit string
    pub bits: String,
    /// Size of the message's JSON serialization
    pub original_bytes: usize,
    /// Bit stream length rounded up to bytes
    pub compressed_bytes: usize,
    /// Number of concepts encoded
    pub concept_count: usize,
    /// Size reduction against the JSON serialization
    pub ratio: f64,
    /// Wall time spent compressing
    pub elapsed: Duration,
    /// The code table in force when the stream was written
    pub code_map: HashMap<Concept, CodeAssignment>,
}

/// The outcome of decompressing one bit stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompressedMessage {
    pub concepts: Vec<Concept>,
    /// Tokens that carried the unknown sentinel or an unassigned code
    pub unknown_tokens: usize,
}

impl DecompressedMessage {
    pub fn is_lossless(&self) -> bool {
        self.unknown_tokens == 0
    }
}

/// Statistics over the codec's current state
#[derive(Debug, Clone)]
pub struct CodecStats {
    pub phase: CodecPhase,
    pub messages_seen: usize,
    /// Messages currently held in the sliding window
    pub window_messages: usize,
    /// Concepts per bit depth in the current table
    pub bit_depth_distribution: HashMap<u8, usize>,
    /// Mean token depth weighted by recent frequency
    pub average_bit_depth: f64,
}

/// A codec that adapts its code table to conversation traffic
pub struct AdaptiveConceptCodec {
    config: AdaptiveConfig,
    window: ConversationWindow,
    codebook: CodeBook,
    messages_seen: usize,
}

impl AdaptiveConceptCodec {
    pub fn new() -> Self {
        Self::with_config(AdaptiveConfig::default())
    }

    pub fn with_config(config: AdaptiveConfig) -> Self {
        Self {
            window: ConversationWindow::new(config.context_window),
            codebook: CodeBook::default(),
            config,
            messages_seen: 0,
        }
    }

    pub fn phase(&self) -> CodecPhase {
        if self.messages_seen == 0 {
            CodecPhase::Initialized
        } else if self.messages_seen < self.config.warmup_messages {
            CodecPhase::Warming
        } else {
            CodecPhase::Adapted
        }
    }

    /// Compress a message, updating the window and, past warmup, the
    /// code table before encoding.
    pub fn compress(&mut self, message: &Value) -> CompressionResult {
        let start = Instant::now();

        let concepts = extract_concepts(message);
        self.window.push(concepts.clone());
        self.messages_seen += 1;

        if self.messages_seen >= self.config.warmup_messages {
            self.reassign_bit_depths();
        }

        let mut bits = String::new();
        for &concept in &concepts {
            encode_token(self.codebook.assignment(concept), &mut bits);
        }

        let original_bytes = message.to_string().len();
        let compressed_bytes = bits.len().div_ceil(8);

        CompressionResult {
            ratio: crate::writer::compression_ratio(original_bytes, compressed_bytes),
            concept_count: concepts.len(),
            code_map: self.codebook.assignments().clone(),
            original_bytes,
            compressed_bytes,
            bits,
            elapsed: start.elapsed(),
        }
    }

    /// Decode a bit stream against the current table.
    ///
    /// Unknown tokens are counted, not fatal: the stream may have been
    /// written against a table revision this codec has since replaced.
    pub fn decompress(&self, bits: &str) -> Result<DecompressedMessage, AdaptiveError> {
        let mut concepts = Vec::new();
        let mut unknown_tokens = 0;

        for (depth, code) in decode_tokens(bits)? {
            if (CodeAssignment { depth, code }) == UNKNOWN_SENTINEL {
                unknown_tokens += 1;
                continue;
            }
            match self.codebook.concept(depth, code) {
                Some(concept) => concepts.push(concept),
                None => unknown_tokens += 1,
            }
        }

        Ok(DecompressedMessage {
            concepts,
            unknown_tokens,
        })
    }

    /// Refit the code table on the recent slice of the window
    pub fn reassign_bit_depths(&mut self) {
        let mut frequencies = ConceptFrequencyTable::new();
        for message in self.window.recent(self.config.recent_fraction) {
            frequencies.record_all(message);
        }
        self.codebook = CodeBook::from_frequencies(&frequencies);
        debug!(
            messages_seen = self.messages_seen,
            window = self.window.len(),
            "reassigned concept bit depths"
        );
    }

    pub fn get_stats(&self) -> CodecStats {
        let mut bit_depth_distribution: HashMap<u8, usize> = HashMap::new();
        for assignment in self.codebook.assignments().values() {
            *bit_depth_distribution.entry(assignment.depth).or_insert(0) += 1;
        }

        let mut frequencies = ConceptFrequencyTable::new();
        for message in self.window.recent(self.config.recent_fraction) {
            frequencies.record_all(message);
        }
        let mut weighted = 0u64;
        let mut total = 0u64;
        for &concept in &Concept::ALL {
            let count = frequencies.count(concept);
            weighted += count * self.codebook.assignment(concept).depth as u64;
            total += count;
        }
        let average_bit_depth = if total == 0 {
            0.0
        } else {
            weighted as f64 / total as f64
        };

        CodecStats {
            phase: self.phase(),
            messages_seen: self.messages_seen,
            window_messages: self.window.len(),
            bit_depth_distribution,
            average_bit_depth,
        }
    }
}

impl Default for AdaptiveConceptCodec {
    fn default() -> Self {
        Self::new()
    }
}
