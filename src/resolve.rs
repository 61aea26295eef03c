//! Core resolution pipeline: merge all config layers and flatten them.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! pipeline testable with synthetic inputs. Steps:
//!
//! 1. Deep-merge config documents (later overrides earlier)
//! 2. Deep-merge env vars on top
//! 3. Deep-merge `key=value` overrides on top (highest priority)
//! 4. Flatten the merged tree into dotted keys

use std::path::PathBuf;

use crate::env;
use crate::error::ReplacerError;
use crate::flatten::{FlatMap, flatten_with};
use crate::merge::deep_merge;
use crate::overrides;
use crate::types::ArrayPolicy;
use crate::value::Value;

/// All pre-loaded data needed to resolve variables. No I/O happens here.
pub struct ResolveInput {
    /// Parsed documents in precedence order: first = lowest priority, last = highest.
    pub documents: Vec<(PathBuf, Value)>,
    /// Raw environment variable pairs (pass `std::env::vars().collect()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Env var prefix (e.g. `"REPLACER"`). `None` means env disabled.
    pub env_prefix: Option<String>,
    /// Overrides as `(dotted_key, value)` pairs.
    pub overrides: Vec<(String, Value)>,
    /// What to do with array values.
    pub array_policy: ArrayPolicy,
}

/// Merge every layer and flatten the result.
///
/// Each document's root must be a mapping; a document that is not is
/// rejected before merging so it cannot silently replace earlier layers.
pub fn resolve(input: ResolveInput) -> Result<FlatMap, ReplacerError> {
    if input.documents.is_empty() {
        return Err(ReplacerError::NoConfigFile);
    }

    // 1: Documents
    let mut merged = Value::default();
    for (path, doc) in input.documents {
        if doc.as_mapping().is_none() {
            return Err(ReplacerError::RootNotMapping { found: doc.kind() }.in_file(path));
        }
        merged = deep_merge(merged, doc);
    }

    // 2: Env vars on top
    if let Some(prefix) = &input.env_prefix {
        merged = deep_merge(merged, env::env_to_value(prefix, input.env_vars));
    }

    // 3: Overrides on top (highest priority)
    if !input.overrides.is_empty() {
        merged = deep_merge(merged, overrides::overrides_to_value(&input.overrides));
    }

    // 4: Flatten
    flatten_with(&merged, input.array_policy)
}
