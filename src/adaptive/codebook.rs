// SPDX-License-Identifier: MIT
//! Frequency-ranked variable-depth code assignment and the token bitstream

use std::collections::HashMap;

use super::concepts::Concept;

/// Errors in the adaptive token stream
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AdaptiveError {
    #[error("bit stream ends mid token")]
    TruncatedStream,

    #[error("bit stream contains a non-binary character {0:?}")]
    InvalidBit(char),

    #[error("no concept assigned to code {code} at depth {depth}")]
    UnknownCode { depth: u8, code: u8 },
}

/// A concept's position in the code space: `depth` bits, value `code`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeAssignment {
    pub depth: u8,
    pub code: u8,
}

/// The reserved "concept not in the table" token
pub const UNKNOWN_SENTINEL: CodeAssignment = CodeAssignment {
    depth: 8,
    code: 0xFF,
};

/// Bucket capacities by depth. Frequent concepts land in shallow
/// buckets; anything past the fourth bucket gets a full byte.
const BUCKETS: [(u8, usize); 4] = [(1, 2), (2, 4), (3, 8), (4, 16)];

const OVERFLOW_DEPTH: u8 = 8;

/// Occurrence counts over a span of messages.
///
/// Always seeded with the whole vocabulary, so ranking is total and
/// ties resolve by canonical concept order.
#[derive(Debug)]
pub struct ConceptFrequencyTable {
    counts: HashMap<Concept, u64>,
}

impl ConceptFrequencyTable {
    pub fn new() -> Self {
        let counts = Concept::ALL.iter().map(|&c| (c, 0)).collect();
        Self { counts }
    }

    pub fn record(&mut self, concept: Concept) {
        *self.counts.entry(concept).or_insert(0) += 1;
    }

    pub fn record_all<'a>(&mut self, concepts: impl IntoIterator<Item = &'a Concept>) {
        for &concept in concepts {
            self.record(concept);
        }
    }

    pub fn count(&self, concept: Concept) -> u64 {
        self.counts.get(&concept).copied().unwrap_or(0)
    }

    /// Concepts ordered by descending count, canonical order on ties
    pub fn ranked(&self) -> Vec<Concept> {
        let mut order: Vec<Concept> = Concept::ALL.to_vec();
        order.sort_by(|a, b| self.count(*b).cmp(&self.count(*a)).then(a.cmp(b)));
        order
    }
}

impl Default for ConceptFrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete, invertible concept-to-code mapping
#[derive(Debug, Clone)]
pub struct CodeBook {
    assignments: HashMap<Concept, CodeAssignment>,
    reverse: HashMap<(u8, u8), Concept>,
}

impl CodeBook {
    /// Assign codes by rank: the first two concepts get 1 bit, the next
    /// four 2 bits, then 8 and 16 wide buckets, overflow at 8 bits.
    /// Code 255 at depth 8 stays reserved for [`UNKNOWN_SENTINEL`].
    pub fn from_frequencies(frequencies: &ConceptFrequencyTable) -> Self {
        let mut assignments = HashMap::new();
        let mut reverse = HashMap::new();
        let mut ranked = frequencies.ranked().into_iter();

        for (depth, capacity) in BUCKETS {
            for code in 0..capacity {
                let Some(concept) = ranked.next() else {
                    return Self {
                        assignments,
                        reverse,
                    };
                };
                let assignment = CodeAssignment {
                    depth,
                    code: code as u8,
                };
                assignments.insert(concept, assignment);
                reverse.insert((depth, assignment.code), concept);
            }
        }
        for (code, concept) in (0u8..=254).zip(ranked) {
            assignments.insert(
                concept,
                CodeAssignment {
                    depth: OVERFLOW_DEPTH,
                    code,
                },
            );
            reverse.insert((OVERFLOW_DEPTH, code), concept);
        }

        Self {
            assignments,
            reverse,
        }
    }

    pub fn assignment(&self, concept: Concept) -> CodeAssignment {
        self.assignments
            .get(&concept)
            .copied()
            .unwrap_or(UNKNOWN_SENTINEL)
    }

    pub fn concept(&self, depth: u8, code: u8) -> Option<Concept> {
        self.reverse.get(&(depth, code)).copied()
    }

    /// Snapshot of the current mapping
    pub fn assignments(&self) -> &HashMap<Concept, CodeAssignment> {
        &self.assignments
    }
}

impl Default for CodeBook {
    fn default() -> Self {
        Self::from_frequencies(&ConceptFrequencyTable::new())
    }
}

/// Append one token to a bit string: a 3-bit depth tag (`depth - 1`)
/// followed by `depth` code bits, most significant first.
pub fn encode_token(assignment: CodeAssignment, bits: &mut String) {
    push_bits(bits, (assignment.depth - 1) as u32, 3);
    push_bits(bits, assignment.code as u32, assignment.depth as u32);
}

fn push_bits(bits: &mut String, value: u32, width: u32) {
    for shift in (0..width).rev() {
        bits.push(if (value >> shift) & 1 == 1 { '1' } else { '0' });
    }
}

/// Split a bit string back into `(depth, code)` tokens
pub fn decode_tokens(bits: &str) -> Result<Vec<(u8, u8)>, AdaptiveError> {
    let mut stream = bits.chars();
    let mut tokens = Vec::new();

    loop {
        let Some(first) = stream.next() else {
            return Ok(tokens);
        };
        let mut tag = bit_value(first)?;
        for _ in 0..2 {
            let bit = stream.next().ok_or(AdaptiveError::TruncatedStream)?;
            tag = (tag << 1) | bit_value(bit)?;
        }
        let depth = tag + 1;

        let mut code = 0u8;
        for _ in 0..depth {
            let bit = stream.next().ok_or(AdaptiveError::TruncatedStream)?;
            code = (code << 1) | bit_value(bit)?;
        }
        tokens.push((depth, code));
    }
}

fn bit_value(c: char) -> Result<u8, AdaptiveError> {
    match c {
        '0' => Ok(0),
        '1' => Ok(1),
        _ => Err(AdaptiveError::InvalidBit(c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(counts: &[(Concept, u64)]) -> ConceptFrequencyTable {
        let mut table = ConceptFrequencyTable::new();
        for &(concept, n) in counts {
            for _ in 0..n {
                table.record(concept);
            }
        }
        table
    }

    #[test]
    fn test_bucket_sizes() {
        let book = CodeBook::default();
        let mut by_depth: HashMap<u8, usize> = HashMap::new();
        for assignment in book.assignments().values() {
            *by_depth.entry(assignment.depth).or_insert(0) += 1;
        }
        // With ten concepts the first three buckets fill 2 + 4 + 4
        assert_eq!(by_depth.get(&1), Some(&2));
        assert_eq!(by_depth.get(&2), Some(&4));
        assert_eq!(by_depth.get(&3), Some(&4));
        assert_eq!(by_depth.get(&4), None);
    }

    #[test]
    fn test_most_frequent_gets_one_bit() {
        let table = table_with(&[(Concept::Get, 50), (Concept::Property, 30)]);
        let book = CodeBook::from_frequencies(&table);

        assert_eq!(book.assignment(Concept::Get).depth, 1);
        assert_eq!(book.assignment(Concept::Get).code, 0);
        assert_eq!(book.assignment(Concept::Property).depth, 1);
        assert_eq!(book.assignment(Concept::Property).code, 1);
    }

    #[test]
    fn test_ties_break_by_canonical_order() {
        let table = ConceptFrequencyTable::new();
        let ranked = table.ranked();
        assert_eq!(ranked[0], Concept::Null);
        assert_eq!(ranked[9], Concept::Set);
    }

    #[test]
    fn test_reverse_lookup_is_consistent() {
        let table = table_with(&[(Concept::Object, 9), (Concept::String, 5)]);
        let book = CodeBook::from_frequencies(&table);
        for &concept in &Concept::ALL {
            let a = book.assignment(concept);
            assert_eq!(book.concept(a.depth, a.code), Some(concept));
        }
    }

    #[test]
    fn test_token_round_trip() {
        let mut bits = String::new();
        encode_token(CodeAssignment { depth: 1, code: 1 }, &mut bits);
        encode_token(CodeAssignment { depth: 3, code: 5 }, &mut bits);
        encode_token(UNKNOWN_SENTINEL, &mut bits);
        assert_eq!(bits, "000101010111111111111");

        let tokens = decode_tokens(&bits).unwrap();
        assert_eq!(tokens, vec![(1, 1), (3, 5), (8, 0xFF)]);
    }

    #[test]
    fn test_truncated_stream_rejected() {
        assert_eq!(
            decode_tokens("00"),
            Err(AdaptiveError::TruncatedStream)
        );
        assert_eq!(
            decode_tokens("0100"),
            Err(AdaptiveError::TruncatedStream)
        );
    }

    #[test]
    fn test_invalid_bit_rejected() {
        assert_eq!(decode_tokens("0x01"), Err(AdaptiveError::InvalidBit('x')));
    }
}
