//! Flatten a nested config tree into dotted key-scalar pairs.
//!
//! `{database: {url: "pg://"}}` becomes `{"database.url": "pg://"}`. Only
//! scalars survive: nulls are dropped, and sequences are handled according to
//! the [`ArrayPolicy`].

use std::collections::BTreeMap;

use crate::error::ReplacerError;
use crate::types::ArrayPolicy;
use crate::value::{Scalar, Value};

/// Dotted key path → scalar. Read-only once built.
pub type FlatMap = BTreeMap<String, Scalar>;

/// Flatten with the default policy (arrays dropped with a warning).
pub fn flatten(root: &Value) -> Result<FlatMap, ReplacerError> {
    flatten_with(root, ArrayPolicy::default())
}

/// Flatten a config tree whose root must be a mapping.
pub fn flatten_with(root: &Value, policy: ArrayPolicy) -> Result<FlatMap, ReplacerError> {
    let mapping = root.as_mapping().ok_or(ReplacerError::RootNotMapping {
        found: root.kind(),
    })?;

    let mut flattener = Flattener {
        policy,
        out: FlatMap::new(),
    };
    flattener.walk("", mapping)?;
    Ok(flattener.out)
}

struct Flattener {
    policy: ArrayPolicy,
    out: FlatMap,
}

fn dotted(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

impl Flattener {
    fn walk(
        &mut self,
        prefix: &str,
        mapping: &BTreeMap<String, Value>,
    ) -> Result<(), ReplacerError> {
        for (key, value) in mapping {
            let path = dotted(prefix, key);
            match value {
                Value::Mapping(nested) => self.walk(&path, nested)?,
                Value::Sequence(_) => self.sequence(path)?,
                Value::Null => {
                    tracing::debug!(key = %path, "skipping null value");
                }
                scalar => {
                    if let Some(s) = scalar.to_scalar() {
                        self.emit(path, s)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn emit(&mut self, path: String, value: Scalar) -> Result<(), ReplacerError> {
        if self.out.contains_key(&path) {
            return Err(ReplacerError::DuplicateKey(path));
        }
        self.out.insert(path, value);
        Ok(())
    }

    fn sequence(&mut self, path: String) -> Result<(), ReplacerError> {
        match self.policy {
            ArrayPolicy::Warn => {
                tracing::warn!(key = %path, "arrays are not supported, skipping key");
                Ok(())
            }
            ArrayPolicy::Skip => {
                tracing::debug!(key = %path, "skipping array value");
                Ok(())
            }
            ArrayPolicy::Error => Err(ReplacerError::UnsupportedValueKind {
                key: path,
                kind: "sequence",
            }),
        }
    }
}
