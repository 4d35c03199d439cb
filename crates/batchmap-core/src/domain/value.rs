//! Dynamic - loosely typed values exchanged with transformations.
//!
//! A transformation that is not written against a codec hands back whatever it
//! likes in `processed_message` / `processed_headers`. `Dynamic` captures that
//! looseness so the invoker can pattern-match on it and report what it saw.

use serde_json::Value;

/// A value as observed at runtime.
///
/// JSON `null` should be represented as [`Dynamic::Null`]. [`Dynamic::from`]
/// does this for a `serde_json::Value`; a hand-built `Dynamic::Json(Value::Null)`
/// is folded back by [`Dynamic::normalize`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Dynamic {
    /// The field was never set.
    #[default]
    Missing,
    Null,
    Bytes(Vec<u8>),
    Json(Value),
}

impl Dynamic {
    /// Runtime type name used in shape diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Dynamic::Missing => "missing",
            Dynamic::Null => "null",
            Dynamic::Bytes(_) => "bytes",
            Dynamic::Json(value) => json_type_name(value),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Dynamic::Null)
    }

    pub fn normalize(self) -> Self {
        match self {
            Dynamic::Json(Value::Null) => Dynamic::Null,
            other => other,
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<Value> for Dynamic {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Dynamic::Null,
            other => Dynamic::Json(other),
        }
    }
}

impl From<Vec<u8>> for Dynamic {
    fn from(bytes: Vec<u8>) -> Self {
        Dynamic::Bytes(bytes)
    }
}

impl From<&[u8]> for Dynamic {
    fn from(bytes: &[u8]) -> Self {
        Dynamic::Bytes(bytes.to_vec())
    }
}

impl From<serde_json::Map<String, Value>> for Dynamic {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Dynamic::Json(Value::Object(map))
    }
}

impl<T: Into<Dynamic>> From<Option<T>> for Dynamic {
    fn from(value: Option<T>) -> Self {
        value.map_or(Dynamic::Null, Into::into)
    }
}
