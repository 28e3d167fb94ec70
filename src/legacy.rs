//! Compatibility shim for list fields that the upstream dataset stores as
//! Python-style list literals (`"['a', 'b']"`) instead of JSON arrays.
//!
//! The quote substitution is lossy: an apostrophe inside an item breaks the
//! parse. Anything that fails to parse is kept as one opaque display string.
//! Nothing outside this module should know the format exists.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parses a list literal, first as JSON and then with single quotes
/// rewritten to double quotes. Returns `None` when neither yields an array.
pub fn parse_legacy_list(raw: &str) -> Option<Vec<String>> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('[') {
        return None;
    }
    let parsed = serde_json::from_str::<Value>(trimmed)
        .or_else(|_| serde_json::from_str::<Value>(&trimmed.replace('\'', "\"")))
        .ok()?;
    match parsed {
        Value::Array(items) => Some(items.into_iter().map(value_to_text).collect()),
        _ => None,
    }
}

/// Upper-cases the first character of an ingredient line for display.
pub fn display_ingredient_line(line: &str) -> String {
    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

pub(crate) fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let list = match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(value_to_text).collect(),
        Value::String(text) => match parse_legacy_list(&text) {
            Some(items) => items,
            None if text.trim().is_empty() => Vec::new(),
            None => {
                tracing::debug!(field = %text, "list field is not an array, keeping it as a single entry");
                vec![text]
            }
        },
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    };
    Ok(list)
}
