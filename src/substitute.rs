//! The substitution engine: replace `{{dotted.key}}` tokens with values from
//! a [`FlatMap`].
//!
//! The token pattern is compiled once. Replacement is literal and single-pass,
//! so a substituted value is never scanned again and identifiers never end up
//! inside a regex.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ReplacerError;
use crate::flatten::FlatMap;

/// Two open braces, one or more characters other than `{`, `}`, `;`, two
/// close braces.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{};]+)\}\}").expect("placeholder pattern is valid"));

/// Replace every placeholder in `text`.
///
/// Fails on the first identifier that has no entry in `vars`; nothing is
/// returned for partially substituted text.
pub fn substitute(vars: &FlatMap, text: &str) -> Result<String, ReplacerError> {
    let mut out = String::with_capacity(text.len());
    let mut resolved: HashMap<&str, String> = HashMap::new();
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(text) {
        let (Some(token), Some(ident)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if is_nested(text, token.start(), token.end()) {
            continue;
        }

        let name = ident.as_str();
        if !resolved.contains_key(name) {
            let value = vars
                .get(name)
                .ok_or_else(|| ReplacerError::UnresolvedVariable {
                    name: name.to_string(),
                })?;
            resolved.insert(name, value.render());
        }

        out.push_str(&text[last..token.start()]);
        out.push_str(&resolved[name]);
        last = token.end();
    }

    out.push_str(&text[last..]);
    Ok(out)
}

/// Identifiers referenced by `text`, in order of first appearance, without
/// resolving them.
pub fn placeholders(text: &str) -> Vec<&str> {
    let mut seen = Vec::new();
    for caps in PLACEHOLDER.captures_iter(text) {
        let (Some(token), Some(ident)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = ident.as_str();
        if is_nested(text, token.start(), token.end()) || seen.contains(&name) {
            continue;
        }
        seen.push(name);
    }
    seen
}

/// A token wrapped in extra braces on both sides (`{{{{a}}}}`) is part of a
/// malformed brace run and stays as-is.
fn is_nested(text: &str, start: usize, end: usize) -> bool {
    text[..start].ends_with('{') && text[end..].starts_with('}')
}
