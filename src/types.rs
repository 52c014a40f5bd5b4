//! Scalar values and type tags shared across the crate.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag carried by every schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Bool,
    Int,
    Float,
    Str,
    /// Interior node: named children, no scalar value of its own.
    Array,
}

impl Kind {
    pub fn is_scalar(self) -> bool {
        !matches!(self, Kind::Array)
    }

    /// Coerce a stored raw string to this kind.
    ///
    /// The single dispatch point for type conversion. Parse failures
    /// surface as [`ConfigError::TypeCoercion`]; they are never replaced
    /// by a default.
    ///
    /// `Bool` accepts exactly `"true"`/`"1"` and `"false"`/`"0"`/`""`
    /// (checkbox-style submissions store `"1"`/`"0"` or nothing at all);
    /// anything else is a coercion failure. Numeric kinds trim whitespace
    /// before parsing; `Str` keeps the raw string untouched.
    pub fn coerce(self, key: &str, raw: &str) -> Result<Value> {
        let fail = || ConfigError::TypeCoercion {
            key: key.to_string(),
            value: raw.to_string(),
            kind: self,
        };
        match self {
            Kind::Bool => match raw.trim() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" | "" => Ok(Value::Bool(false)),
                _ => Err(fail()),
            },
            Kind::Int => raw.trim().parse::<i64>().map(Value::Int).map_err(|_| fail()),
            Kind::Float => raw.trim().parse::<f64>().map(Value::Float).map_err(|_| fail()),
            Kind::Str => Ok(Value::Str(raw.to_string())),
            Kind::Array => Err(ConfigError::Schema(format!(
                "array node {key} carries no scalar value"
            ))),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Str => "str",
            Kind::Array => "array",
        };
        write!(f, "{name}")
    }
}

/// A resolved configuration value.
///
/// Untagged so YAML/JSON defaults deserialize into the natural variant
/// (`5432` becomes `Int`, `"localhost"` becomes `Str`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
        }
    }

    /// The raw string form, as stored in the override table.
    pub fn to_raw(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}
