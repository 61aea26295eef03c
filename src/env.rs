use std::collections::BTreeMap;
use std::ffi::OsString;

use crate::value::Value;

/// Build a config tree from environment variables matching `{PREFIX}__*`.
///
/// Double underscore `__` separates nesting levels.
/// Single `_` within a segment is literal (part of the key).
/// Segments are lowercased.
///
/// Values are parsed heuristically: bool > integer > float > string.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_to_value(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Value {
    let needle = format!("{prefix}__");
    let mut root = BTreeMap::new();

    for (key, value) in vars {
        let Some(rest) = key.strip_prefix(&needle) else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }

        let segments: Vec<String> = rest.split("__").map(str::to_lowercase).collect();
        insert_nested(&mut root, &segments, parse_scalar(&value));
    }

    Value::Mapping(root)
}

/// Keep the variables whose name and value are both valid UTF-8.
///
/// Pass `std::env::vars_os()`; unlike `std::env::vars()` it does not panic on
/// a non-Unicode entry elsewhere in the environment.
pub fn utf8_vars(
    vars: impl IntoIterator<Item = (OsString, OsString)>,
) -> Vec<(String, String)> {
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                tracing::debug!(key = ?key, "skipping non-UTF-8 environment variable");
                None
            }
        })
        .collect()
}

/// Insert `value` at the path given by `segments`, creating intermediate
/// mappings. A scalar sitting where a mapping is needed gets replaced.
pub(crate) fn insert_nested<S: AsRef<str>>(
    map: &mut BTreeMap<String, Value>,
    segments: &[S],
    value: Value,
) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    let key = first.as_ref().to_string();

    if rest.is_empty() {
        map.insert(key, value);
        return;
    }

    let entry = map.entry(key).or_insert_with(Value::default);
    if !matches!(entry, Value::Mapping(_)) {
        *entry = Value::default();
    }
    if let Value::Mapping(sub) = entry {
        insert_nested(sub, rest, value);
    }
}

/// Parse a raw string into a typed value.
/// Tries: bool → integer → float → string.
pub(crate) fn parse_scalar(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        // Only use float if the string actually contains a dot,
        // to avoid "NaN" / "inf" being parsed as float.
        if s.contains('.') {
            return Value::Float(f);
        }
    }
    Value::String(s.to_string())
}
