//! Convert dotted-key overrides (`--set database.url=pg://`) into a nested
//! config tree.
//!
//! Each `("database.url", Value)` pair is expanded into the nested mapping
//! needed for deep-merge with the other config layers.

use std::collections::BTreeMap;

use crate::env::{insert_nested, parse_scalar};
use crate::error::ReplacerError;
use crate::value::Value;

/// Parse a `key=value` argument. The value is typed with the same heuristic
/// as environment variables.
pub fn parse_override(raw: &str) -> Result<(String, Value), ReplacerError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ReplacerError::InvalidOverride(raw.to_string()))?;
    let key = key.trim();
    if key.is_empty() || key.split('.').any(str::is_empty) {
        return Err(ReplacerError::InvalidOverride(raw.to_string()));
    }
    Ok((key.to_string(), parse_scalar(value)))
}

/// Convert dotted-key overrides into a nested mapping.
///
/// `("database.url", Value::String("pg://"))` becomes `{database: {url: "pg://"}}`
///
/// If multiple entries target the same key, the last one wins.
pub fn overrides_to_value(entries: &[(String, Value)]) -> Value {
    let mut root = BTreeMap::new();
    for (dotted_key, value) in entries {
        let segments: Vec<&str> = dotted_key.split('.').collect();
        insert_nested(&mut root, &segments, value.clone());
    }
    Value::Mapping(root)
}
