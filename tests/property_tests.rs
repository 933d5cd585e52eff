// SPDX-License-Identifier: MIT
//! Property-based tests using proptest
//!
//! These tests generate many random inputs to test invariants, edge cases,
//! and properties that should hold for all possible inputs.

use std::collections::HashMap;

use proptest::prelude::*;

use bbes_codec::adaptive::{
    decode_tokens, encode_token, CodeAssignment, CodeBook, Concept, ConceptFrequencyTable,
};
use bbes_codec::{ascii, compression_ratio, decode, encode, BrailleCell, DotDomain};

/// Strategy for generating text the default container handles: printable
/// ASCII, controls included via tab and newline
fn ascii_text_strategy() -> impl Strategy<Value = String> {
    "[ -~\t\n]{0,200}"
}

/// Strategy for generating dot sets within a domain
fn dot_set_strategy(max_dot: u8) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1..=max_dot, 0..8)
}

/// Strategy for generating valid code assignments
fn assignment_strategy() -> impl Strategy<Value = CodeAssignment> {
    (1u8..=8).prop_flat_map(|depth| {
        let max_code = if depth == 8 { 255u16 } else { (1u16 << depth) - 1 };
        (0..=max_code).prop_map(move |code| CodeAssignment {
            depth,
            code: code as u8,
        })
    })
}

proptest! {
    #[test]
    fn cell_value_round_trips_through_code_point(value in any::<u8>()) {
        let cell = BrailleCell::from_value(value);
        let back = BrailleCell::from_char(cell.as_char()).unwrap();
        prop_assert_eq!(back, cell);
        prop_assert_eq!(back.value(), value);
    }

    #[test]
    fn cell_from_dots_contains_exactly_those_dots(dots in dot_set_strategy(8)) {
        let cell = BrailleCell::from_dots(&dots, DotDomain::EightDot).unwrap();
        for dot in 1..=8u8 {
            prop_assert_eq!(cell.has_dot(dot), dots.contains(&dot));
        }
    }

    #[test]
    fn six_dot_cells_stay_under_0x40(dots in dot_set_strategy(6)) {
        let cell = BrailleCell::from_dots(&dots, DotDomain::SixDot).unwrap();
        prop_assert!(cell.value() < 0x40);
    }

    #[test]
    fn mirror_is_an_involution(value in any::<u8>()) {
        let cell = BrailleCell::from_value(value);
        prop_assert_eq!(cell.mirror().mirror(), cell);
    }

    #[test]
    fn ascii_table_round_trips(code in 0u32..128) {
        let c = char::from_u32(code).unwrap();
        let cell = ascii::encode(c).unwrap();
        prop_assert_eq!(ascii::decode(cell).unwrap(), c);
    }

    #[test]
    fn container_round_trips_ascii_text(text in ascii_text_strategy()) {
        let bytes = encode(&text).unwrap();
        prop_assert_eq!(decode(&bytes).unwrap(), text);
    }

    #[test]
    fn payload_never_exceeds_character_count(text in ascii_text_strategy()) {
        let bytes = encode(&text).unwrap();
        prop_assert!(bytes.len() - bbes_codec::BBES_HEADER_SIZE <= text.chars().count());
    }

    #[test]
    fn compression_ratio_never_exceeds_one(original in 0usize..1_000_000, compressed in 0usize..1_000_000) {
        prop_assert!(compression_ratio(original, compressed) <= 1.0);
    }

    #[test]
    fn code_buckets_respect_their_capacities(counts in prop::collection::vec(0u64..1000, 10)) {
        let mut table = ConceptFrequencyTable::new();
        for (concept, &n) in Concept::ALL.iter().zip(&counts) {
            for _ in 0..n {
                table.record(*concept);
            }
        }
        let book = CodeBook::from_frequencies(&table);

        let mut by_depth: HashMap<u8, usize> = HashMap::new();
        for assignment in book.assignments().values() {
            *by_depth.entry(assignment.depth).or_insert(0) += 1;
        }
        prop_assert!(by_depth.get(&1).copied().unwrap_or(0) <= 2);
        prop_assert!(by_depth.get(&2).copied().unwrap_or(0) <= 4);
        prop_assert!(by_depth.get(&3).copied().unwrap_or(0) <= 8);
        prop_assert!(by_depth.get(&4).copied().unwrap_or(0) <= 16);

        // Every concept resolves back to itself
        for &concept in &Concept::ALL {
            let a = book.assignment(concept);
            prop_assert_eq!(book.concept(a.depth, a.code), Some(concept));
        }
    }

    #[test]
    fn token_streams_round_trip(assignments in prop::collection::vec(assignment_strategy(), 0..50)) {
        let mut bits = String::new();
        for &assignment in &assignments {
            encode_token(assignment, &mut bits);
        }

        let tokens = decode_tokens(&bits).unwrap();
        prop_assert_eq!(tokens.len(), assignments.len());
        for (&(depth, code), assignment) in tokens.iter().zip(&assignments) {
            prop_assert_eq!(depth, assignment.depth);
            prop_assert_eq!(code, assignment.code);
        }
    }
}
