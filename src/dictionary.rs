// SPDX-License-Identifier: MIT
//! Script-aware contraction tables and greedy longest-match substitution
//!
//! Each script gets the language-independent base table merged with its own
//! override table. Entries are consumed sorted by descending pattern length
//! so the greedy pass always takes the maximal match first. Replacement
//! symbols are single cells in the dot-8 namespace (packed value >= 0x80),
//! which keeps them disjoint from every letter cell the packing layer emits.
//!
//! Greedy substitution carries a known hazard: when a replacement symbol can
//! occur as a literal substring of another pattern, or two entries share a
//! replacement, round-trips silently corrupt. [`ContractionTable::check_conflicts`]
//! is the shipping-time gate against ill-formed tables; every built-in table
//! passes it.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ascii;
use crate::script::Script;

/// One contraction: a multi-character source pattern and its single-cell
/// replacement symbol. Whole-word entries anchor at word boundaries on
/// scripts that have them; group entries substitute raw substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractionEntry {
    pub pattern: String,
    pub replacement: char,
    pub whole_word: bool,
}

/// Errors from table construction and verification
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("empty contraction pattern")]
    EmptyPattern,

    #[error("replacement symbol {replacement:?} is shared by {first:?} and {second:?}")]
    DuplicateReplacement {
        replacement: char,
        first: String,
        second: String,
    },

    #[error("duplicate pattern {0:?}")]
    DuplicatePattern(String),

    #[error("replacement {replacement:?} of {pattern:?} occurs inside entry {other:?}")]
    ReplacementCollision {
        replacement: char,
        pattern: String,
        other: String,
    },

    #[error("replacement {replacement:?} of {pattern:?} is outside the dot-8 namespace")]
    ReplacementOutsideNamespace { replacement: char, pattern: String },

    #[error("contraction symbol space exhausted")]
    SymbolSpaceExhausted,

    #[error("bad word-boundary pattern {pattern:?}: {source}")]
    BadPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Immutable per-script contraction table, sorted longest pattern first
#[derive(Debug)]
pub struct ContractionTable {
    script: Script,
    entries: Vec<ContractionEntry>,
    // Compiled word-boundary matchers, parallel to `entries`; None for
    // group entries and for scripts without word boundaries.
    matchers: Vec<Option<Regex>>,
}

impl ContractionTable {
    /// Build a table from explicit entries, verifying it first
    pub fn from_entries(
        script: Script,
        mut entries: Vec<ContractionEntry>,
    ) -> Result<Self, DictionaryError> {
        sort_longest_first(&mut entries);
        check_entries(&entries)?;
        let matchers = compile_matchers(script, &entries)?;
        Ok(Self {
            script,
            entries,
            matchers,
        })
    }

    /// The built-in table for a script (base entries merged with the
    /// script's overrides)
    pub fn for_script(script: Script) -> &'static ContractionTable {
        static TABLES: Lazy<HashMap<Script, ContractionTable>> = Lazy::new(|| {
            [
                Script::Latin,
                Script::Cyrillic,
                Script::Arabic,
                Script::Chinese,
                Script::Japanese,
                Script::Korean,
            ]
            .into_iter()
            .map(|s| (s, builtin_table(s)))
            .collect()
        });
        // Every script variant is inserted above
        TABLES.get(&script).unwrap_or_else(|| &TABLES[&Script::Latin])
    }

    /// The built-in table for a language code
    pub fn for_language(code: &str) -> &'static ContractionTable {
        Self::for_script(Script::from_language(code))
    }

    pub fn script(&self) -> Script {
        self.script
    }

    pub fn entries(&self) -> &[ContractionEntry] {
        &self.entries
    }

    /// Substitute patterns with their replacement symbols, longest first.
    ///
    /// RTL scripts are reversed before substitution; the output stays in
    /// reversed order until [`decompress`](Self::decompress) undoes it.
    pub fn compress(&self, text: &str) -> String {
        let mut out: String = if self.script.is_rtl() {
            text.chars().rev().collect()
        } else {
            text.to_string()
        };

        for (entry, matcher) in self.entries.iter().zip(&self.matchers) {
            let replacement = entry.replacement.to_string();
            match matcher {
                Some(re) => {
                    out = re.replace_all(&out, replacement.as_str()).into_owned();
                }
                None => {
                    let pattern = self.oriented_pattern(entry);
                    out = out.replace(pattern.as_ref(), &replacement);
                }
            }
        }
        out
    }

    /// Reverse pass: replacement symbols back to their source patterns,
    /// applied sorted by replacement length descending
    pub fn decompress(&self, compressed: &str) -> String {
        let mut reverse: Vec<&ContractionEntry> = self.entries.iter().collect();
        reverse.sort_by(|a, b| {
            b.replacement
                .len_utf8()
                .cmp(&a.replacement.len_utf8())
                .then_with(|| b.pattern.chars().count().cmp(&a.pattern.chars().count()))
        });

        let mut out = compressed.to_string();
        for entry in reverse {
            let pattern = self.oriented_pattern(entry);
            out = out.replace(entry.replacement, pattern.as_ref());
        }

        if self.script.is_rtl() {
            out.chars().rev().collect()
        } else {
            out
        }
    }

    /// Verify the table against substitution hazards: duplicate patterns or
    /// replacements, replacements occurring inside other entries, and
    /// replacements outside the dot-8 namespace.
    pub fn check_conflicts(&self) -> Result<(), DictionaryError> {
        check_entries(&self.entries)
    }

    fn oriented_pattern<'a>(&self, entry: &'a ContractionEntry) -> std::borrow::Cow<'a, str> {
        if self.script.is_rtl() {
            std::borrow::Cow::Owned(entry.pattern.chars().rev().collect())
        } else {
            std::borrow::Cow::Borrowed(entry.pattern.as_str())
        }
    }
}

fn sort_longest_first(entries: &mut [ContractionEntry]) {
    entries.sort_by(|a, b| b.pattern.chars().count().cmp(&a.pattern.chars().count()));
}

fn compile_matchers(
    script: Script,
    entries: &[ContractionEntry],
) -> Result<Vec<Option<Regex>>, DictionaryError> {
    entries
        .iter()
        .map(|entry| {
            if !(entry.whole_word && script.uses_word_boundaries()) {
                return Ok(None);
            }
            Regex::new(&format!(r"\b{}\b", regex::escape(&entry.pattern)))
                .map(Some)
                .map_err(|source| DictionaryError::BadPattern {
                    pattern: entry.pattern.clone(),
                    source,
                })
        })
        .collect()
}

fn check_entries(entries: &[ContractionEntry]) -> Result<(), DictionaryError> {
    for (i, entry) in entries.iter().enumerate() {
        if entry.pattern.is_empty() {
            return Err(DictionaryError::EmptyPattern);
        }
        if (entry.replacement as u32) < 0x2880 || (entry.replacement as u32) > 0x28FF {
            return Err(DictionaryError::ReplacementOutsideNamespace {
                replacement: entry.replacement,
                pattern: entry.pattern.clone(),
            });
        }
        for (j, other) in entries.iter().enumerate() {
            if i == j {
                continue;
            }
            if entry.pattern == other.pattern {
                return Err(DictionaryError::DuplicatePattern(entry.pattern.clone()));
            }
            if entry.replacement == other.replacement && i < j {
                return Err(DictionaryError::DuplicateReplacement {
                    replacement: entry.replacement,
                    first: entry.pattern.clone(),
                    second: other.pattern.clone(),
                });
            }
            if other.pattern.contains(entry.replacement) {
                return Err(DictionaryError::ReplacementCollision {
                    replacement: entry.replacement,
                    pattern: entry.pattern.clone(),
                    other: other.pattern.clone(),
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Built-in tables
//
// Dot values follow the standard braille signs where one exists (e.g. "the"
// is dots 2-3-4-6); the nominal sign only seeds symbol allocation, so two
// specs may share a sign and still receive distinct symbols.
// ---------------------------------------------------------------------------

/// Builder spec: (pattern, nominal six-dot sign value, whole-word)
type Spec = (&'static str, u8, bool);

/// Language-independent contractions, merged into every script table
const BASE_SPECS: &[Spec] = &[
    ("...", 50, false),
    ("--", 36, false),
    ("://", 12, false),
    ("www.", 58, false),
    (".com", 9, false),
    ("!!", 22, false),
    ("??", 38, false),
];

/// English grade-2 set: alphabetic wordsigns, strong contractions, strong
/// groupsigns and lower wordsigns
const LATIN_SPECS: &[Spec] = &[
    // Alphabetic wordsigns
    ("but", 3, true),
    ("can", 9, true),
    ("do", 25, true),
    ("every", 17, true),
    ("from", 11, true),
    ("go", 27, true),
    ("have", 19, true),
    ("just", 26, true),
    ("knowledge", 5, true),
    ("like", 7, true),
    ("more", 13, true),
    ("not", 29, true),
    ("people", 15, true),
    ("quite", 31, true),
    ("rather", 23, true),
    ("so", 14, true),
    ("that", 30, true),
    ("us", 37, true),
    ("very", 39, true),
    ("will", 58, true),
    ("it", 45, true),
    ("you", 61, true),
    ("as", 53, true),
    // Strong contractions
    ("the", 46, true),
    ("and", 47, true),
    ("for", 63, true),
    ("of", 55, true),
    ("with", 62, true),
    ("child", 33, true),
    ("shall", 41, true),
    ("this", 57, true),
    ("which", 49, true),
    ("out", 51, true),
    ("still", 12, true),
    // Strong groupsigns (substitute inside words)
    ("ch", 33, false),
    ("gh", 35, false),
    ("sh", 41, false),
    ("th", 57, false),
    ("wh", 49, false),
    ("ed", 43, false),
    ("er", 59, false),
    ("ou", 51, false),
    ("ow", 42, false),
    ("st", 12, false),
    ("ar", 28, false),
    ("ing", 44, false),
    ("ble", 60, false),
    // Lower wordsigns
    ("be", 6, true),
    ("enough", 34, true),
    ("were", 54, true),
    ("his", 38, true),
    ("in", 20, true),
    ("was", 52, true),
    ("to", 22, true),
];

const CYRILLIC_SPECS: &[Spec] = &[
    ("что", 31, true),
    ("как", 5, true),
    ("это", 42, true),
    ("или", 10, true),
    ("для", 25, true),
    ("так", 30, true),
    ("при", 15, true),
    ("его", 17, true),
    ("она", 21, true),
    ("они", 29, true),
    ("быть", 3, true),
    ("если", 11, true),
    ("когда", 12, true),
    // Groupsigns
    ("ст", 14, false),
    ("ов", 2, false),
    ("ен", 18, false),
    ("ть", 23, false),
    ("ние", 24, false),
];

const ARABIC_SPECS: &[Spec] = &[
    ("ال", 1, false),
    ("في", 2, false),
    ("من", 3, false),
    ("على", 4, false),
    ("إلى", 5, false),
    ("هذا", 6, false),
    ("التي", 7, false),
    ("الذي", 8, false),
    ("كان", 9, false),
    ("أن", 10, false),
];

const CHINESE_SPECS: &[Spec] = &[
    ("我们", 1, false),
    ("他们", 2, false),
    ("你们", 3, false),
    ("什么", 4, false),
    ("没有", 5, false),
    ("可以", 6, false),
    ("这个", 7, false),
    ("知道", 8, false),
    ("现在", 9, false),
    ("因为", 10, false),
    ("所以", 11, false),
    ("已经", 12, false),
];

const JAPANESE_SPECS: &[Spec] = &[
    ("です", 1, false),
    ("ます", 2, false),
    ("した", 3, false),
    ("という", 4, false),
    ("ている", 5, false),
    ("こんにちは", 6, false),
    ("ありがとう", 7, false),
    ("それから", 8, false),
];

const KOREAN_SPECS: &[Spec] = &[
    ("입니다", 1, false),
    ("습니다", 2, false),
    ("하는", 3, false),
    ("있는", 4, false),
    ("없는", 5, false),
    ("그리고", 6, false),
    ("하지만", 7, false),
    ("안녕하세요", 8, false),
];

fn script_specs(script: Script) -> &'static [Spec] {
    match script {
        Script::Latin => LATIN_SPECS,
        Script::Cyrillic => CYRILLIC_SPECS,
        Script::Arabic => ARABIC_SPECS,
        Script::Chinese => CHINESE_SPECS,
        Script::Japanese => JAPANESE_SPECS,
        Script::Korean => KOREAN_SPECS,
    }
}

/// Deterministic symbol allocator over the dot-8 namespace.
///
/// Preference order: dot 8 over the nominal sign, then dots 7+8 over the
/// sign, then the first free non-ASCII cell value. ASCII cells (including
/// the dots-7-8 control cells) are never handed out, so contraction symbols
/// can never shadow a packed character.
struct SymbolAllocator {
    used: [bool; 256],
}

impl SymbolAllocator {
    fn new() -> Self {
        Self { used: [false; 256] }
    }

    fn allocate(&mut self, sign: u8) -> Result<char, DictionaryError> {
        let first = 0x80 | (sign & 0x3F);
        let second = 0xC0 | (sign & 0x3F);
        for candidate in [first, second] {
            if self.claim(candidate) {
                return Ok(symbol_char(candidate));
            }
        }
        for candidate in 0x80..=0xFFu16 {
            if self.claim(candidate as u8) {
                return Ok(symbol_char(candidate as u8));
            }
        }
        Err(DictionaryError::SymbolSpaceExhausted)
    }

    fn claim(&mut self, value: u8) -> bool {
        if self.used[value as usize] || ascii::has_entry(value) {
            return false;
        }
        self.used[value as usize] = true;
        true
    }
}

fn symbol_char(value: u8) -> char {
    // Dot-8 namespace stays inside the braille block
    char::from_u32(0x2800 + value as u32).unwrap_or('\u{2880}')
}

fn builtin_table(script: Script) -> ContractionTable {
    let mut allocator = SymbolAllocator::new();
    let mut entries: Vec<ContractionEntry> = Vec::new();

    for &(pattern, sign, whole_word) in BASE_SPECS.iter().chain(script_specs(script)) {
        // Language overrides win over the base table
        if let Some(existing) = entries.iter().position(|e| e.pattern == pattern) {
            entries.remove(existing);
        }
        // The allocator cannot run dry: the specs stay far below the 128
        // free values of the dot-8 namespace.
        let replacement = allocator
            .allocate(sign)
            .unwrap_or('\u{28FF}');
        entries.push(ContractionEntry {
            pattern: pattern.to_string(),
            replacement,
            whole_word,
        });
    }

    debug!(
        script = %script,
        entries = entries.len(),
        "built contraction table"
    );

    sort_longest_first(&mut entries);
    let matchers = compile_matchers(script, &entries)
        .unwrap_or_else(|_| entries.iter().map(|_| None).collect());
    ContractionTable {
        script,
        entries,
        matchers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_pass_conflict_check() {
        for script in [
            Script::Latin,
            Script::Cyrillic,
            Script::Arabic,
            Script::Chinese,
            Script::Japanese,
            Script::Korean,
        ] {
            let table = ContractionTable::for_script(script);
            table
                .check_conflicts()
                .unwrap_or_else(|e| panic!("{script}: {e}"));
        }
    }

    #[test]
    fn test_entries_sorted_longest_first() {
        let table = ContractionTable::for_script(Script::Latin);
        let lengths: Vec<usize> = table
            .entries()
            .iter()
            .map(|e| e.pattern.chars().count())
            .collect();
        assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_latin_round_trip() {
        let table = ContractionTable::for_script(Script::Latin);
        let text = "the people will go out with knowledge and have enough";
        let compressed = table.compress(text);
        assert!(compressed.chars().count() < text.chars().count());
        assert_eq!(table.decompress(&compressed), text);
    }

    #[test]
    fn test_whole_word_entries_respect_boundaries() {
        let table = ContractionTable::for_script(Script::Latin);
        // "do" must not fire inside "door"
        let compressed = table.compress("door");
        assert!(compressed.contains("or") || compressed.contains("do"));
        assert_eq!(table.decompress(&compressed), "door");
    }

    #[test]
    fn test_groupsigns_fire_inside_words() {
        let table = ContractionTable::for_script(Script::Latin);
        let compressed = table.compress("running");
        assert!(compressed.chars().count() < "running".chars().count());
        assert_eq!(table.decompress(&compressed), "running");
    }

    #[test]
    fn test_longest_match_wins() {
        let table = ContractionTable::for_script(Script::Latin);
        // "this" (whole word) must be taken before the "th" groupsign
        let compressed = table.compress("this");
        assert_eq!(compressed.chars().count(), 1);
        assert_eq!(table.decompress(&compressed), "this");
    }

    #[test]
    fn test_cyrillic_round_trip() {
        let table = ContractionTable::for_script(Script::Cyrillic);
        let text = "что это как не быть если когда";
        let compressed = table.compress(text);
        assert!(compressed.chars().count() < text.chars().count());
        assert_eq!(table.decompress(&compressed), text);
    }

    #[test]
    fn test_chinese_substring_substitution() {
        let table = ContractionTable::for_script(Script::Chinese);
        let text = "我们知道你们现在可以";
        let compressed = table.compress(text);
        assert_eq!(compressed.chars().count(), 5);
        assert_eq!(table.decompress(&compressed), text);
    }

    #[test]
    fn test_arabic_reversal_round_trip() {
        let table = ContractionTable::for_script(Script::Arabic);
        let text = "هذا من الكتاب";
        let compressed = table.compress(text);
        assert_eq!(table.decompress(&compressed), text);
    }

    #[test]
    fn test_base_table_present_in_every_script() {
        for script in [Script::Latin, Script::Korean] {
            let table = ContractionTable::for_script(script);
            assert!(table.entries().iter().any(|e| e.pattern == "..."));
        }
    }

    #[test]
    fn test_from_entries_rejects_duplicate_replacement() {
        let entries = vec![
            ContractionEntry {
                pattern: "aa".into(),
                replacement: '\u{2881}',
                whole_word: false,
            },
            ContractionEntry {
                pattern: "bb".into(),
                replacement: '\u{2881}',
                whole_word: false,
            },
        ];
        let err = ContractionTable::from_entries(Script::Latin, entries).unwrap_err();
        assert!(matches!(err, DictionaryError::DuplicateReplacement { .. }));
    }

    #[test]
    fn test_from_entries_rejects_symbol_outside_namespace() {
        let entries = vec![ContractionEntry {
            pattern: "aa".into(),
            // Plain six-dot cell, would shadow a letter
            replacement: '\u{2801}',
            whole_word: false,
        }];
        let err = ContractionTable::from_entries(Script::Latin, entries).unwrap_err();
        assert!(matches!(
            err,
            DictionaryError::ReplacementOutsideNamespace { .. }
        ));
    }

    #[test]
    fn test_from_entries_rejects_replacement_inside_pattern() {
        let entries = vec![
            ContractionEntry {
                pattern: "aa".into(),
                replacement: '\u{2881}',
                whole_word: false,
            },
            ContractionEntry {
                pattern: "x\u{2881}y".into(),
                replacement: '\u{2882}',
                whole_word: false,
            },
        ];
        let err = ContractionTable::from_entries(Script::Latin, entries).unwrap_err();
        assert!(matches!(err, DictionaryError::ReplacementCollision { .. }));
    }

    #[test]
    fn test_symbols_stay_in_dot8_namespace() {
        for script in [Script::Latin, Script::Cyrillic, Script::Arabic] {
            for entry in ContractionTable::for_script(script).entries() {
                let value = (entry.replacement as u32 - 0x2800) as u8;
                assert!(value & 0x80 != 0, "{:?}", entry);
                assert!(!ascii::has_entry(value), "{:?}", entry);
            }
        }
    }
}
