// SPDX-License-Identifier: MIT
//! The closed concept vocabulary and JSON concept extraction

use std::fmt;

use serde_json::Value;

/// A semantic concept occurring in a structured message.
///
/// The vocabulary is closed: codes are only ever assigned to these
/// variants, so two codecs that agree on frequencies agree on codes
/// without exchanging a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Concept {
    Null,
    Undefined,
    Boolean,
    Number,
    String,
    Array,
    Object,
    Property,
    Get,
    Set,
}

impl Concept {
    /// Every variant, in canonical order. Used to seed frequency
    /// tables so that rank ties break the same way everywhere.
    pub const ALL: [Concept; 10] = [
        Concept::Null,
        Concept::Undefined,
        Concept::Boolean,
        Concept::Number,
        Concept::String,
        Concept::Array,
        Concept::Object,
        Concept::Property,
        Concept::Get,
        Concept::Set,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Concept::Null => "null",
            Concept::Undefined => "undefined",
            Concept::Boolean => "boolean",
            Concept::Number => "number",
            Concept::String => "string",
            Concept::Array => "array",
            Concept::Object => "object",
            Concept::Property => "property",
            Concept::Get => "get",
            Concept::Set => "set",
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flatten a JSON message into its concept sequence.
///
/// Depth-first: containers emit their own tag before their contents,
/// object keys emit `Property` plus an access concept when the key
/// names a retrieval or mutation.
pub fn extract_concepts(value: &Value) -> Vec<Concept> {
    let mut out = Vec::new();
    walk(value, &mut out);
    out
}

fn walk(value: &Value, out: &mut Vec<Concept>) {
    match value {
        Value::Null => out.push(Concept::Null),
        Value::Bool(_) => out.push(Concept::Boolean),
        Value::Number(_) => out.push(Concept::Number),
        Value::String(_) => out.push(Concept::String),
        Value::Array(items) => {
            out.push(Concept::Array);
            for item in items {
                walk(item, out);
            }
        }
        Value::Object(map) => {
            out.push(Concept::Object);
            for (key, item) in map {
                out.push(Concept::Property);
                if let Some(access) = access_concept(key) {
                    out.push(access);
                }
                walk(item, out);
            }
        }
    }
}

/// Recognize accessor-style keys
fn access_concept(key: &str) -> Option<Concept> {
    let lower = key.to_lowercase();
    if lower.contains("get") || lower.contains("fetch") {
        Some(Concept::Get)
    } else if lower.contains("set") || lower.contains("update") {
        Some(Concept::Set)
    } else {
        None
    }
}
