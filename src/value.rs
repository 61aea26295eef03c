//! The generic value model shared by every config format, and the scalar
//! type that survives flattening.
//!
//! Parsers for TOML, YAML, and JSON each produce their own value tree. They
//! are converted into [`Value`] right after parsing so that merging and
//! flattening only deal with one shape.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::ReplacerError;

/// A parsed configuration tree, independent of the source format.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Mapping(BTreeMap<String, Value>),
    Sequence(Vec<Value>),
}

impl Value {
    /// Human-readable name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Mapping(_) => "mapping",
            Value::Sequence(_) => "sequence",
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// The scalar form of this value, if it has one.
    pub fn to_scalar(&self) -> Option<Scalar> {
        match self {
            Value::Boolean(b) => Some(Scalar::Boolean(*b)),
            Value::Integer(i) => Some(Scalar::Integer(*i)),
            Value::Float(f) => Some(Scalar::Float(*f)),
            Value::String(s) => Some(Scalar::String(s.clone())),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Mapping(BTreeMap::new())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// A leaf value that can be written into a template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// The text a placeholder is replaced with.
    pub fn render(&self) -> String {
        match self {
            Scalar::Boolean(b) => b.to_string(),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => format_float(*f),
            Scalar::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            other => f.write_str(&other.render()),
        }
    }
}

/// Scientific notation with the shortest mantissa that round-trips, and an
/// exponent carrying an explicit sign and at least two digits
/// (`3.14` → `3.14E+00`, `0.001` → `1E-03`).
fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let raw = format!("{f:E}");
    let Some((mantissa, exponent)) = raw.split_once('E') else {
        return raw;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}E{sign}{:02}", exponent.unsigned_abs())
}

// --- Format conversions ---

impl TryFrom<toml::Value> for Value {
    type Error = ReplacerError;

    fn try_from(value: toml::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Integer(i),
            toml::Value::Float(f) => Value::Float(f),
            toml::Value::Boolean(b) => Value::Boolean(b),
            toml::Value::Datetime(d) => Value::String(d.to_string()),
            toml::Value::Array(items) => Value::Sequence(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            toml::Value::Table(table) => Value::Mapping(
                table
                    .into_iter()
                    .map(|(k, v)| Ok((k, Value::try_from(v)?)))
                    .collect::<Result<_, ReplacerError>>()?,
            ),
        })
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = ReplacerError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => number_value(n.as_i64(), n.as_u64(), n.as_f64())?,
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Sequence(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(object) => Value::Mapping(
                object
                    .into_iter()
                    .map(|(k, v)| Ok((k, Value::try_from(v)?)))
                    .collect::<Result<_, ReplacerError>>()?,
            ),
        })
    }
}

impl TryFrom<serde_yaml::Value> for Value {
    type Error = ReplacerError;

    fn try_from(value: serde_yaml::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Boolean(b),
            serde_yaml::Value::Number(n) => number_value(n.as_i64(), n.as_u64(), n.as_f64())?,
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(items) => Value::Sequence(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            serde_yaml::Value::Mapping(mapping) => {
                let mut out = BTreeMap::new();
                for (k, v) in mapping {
                    out.insert(yaml_key(k)?, Value::try_from(v)?);
                }
                Value::Mapping(out)
            }
            serde_yaml::Value::Tagged(tagged) => Value::try_from(tagged.value)?,
        })
    }
}

/// Integers that fit `i64` stay integers; `u64` values beyond that range are
/// rejected rather than silently losing precision.
fn number_value(
    as_i64: Option<i64>,
    as_u64: Option<u64>,
    as_f64: Option<f64>,
) -> Result<Value, ReplacerError> {
    if let Some(i) = as_i64 {
        return Ok(Value::Integer(i));
    }
    if let Some(u) = as_u64 {
        return Err(ReplacerError::InvalidConfig {
            reason: format!("integer {u} does not fit in a signed 64-bit value"),
        });
    }
    Ok(Value::Float(as_f64.unwrap_or(f64::NAN)))
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, ReplacerError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
        other => Err(ReplacerError::InvalidConfig {
            reason: format!("mapping keys must be strings, numbers or booleans, got {other:?}"),
        }),
    }
}
