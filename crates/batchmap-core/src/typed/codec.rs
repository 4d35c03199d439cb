//! PayloadCodec - how payload bytes become the value a transform works with.
//!
//! Two layers:
//! - **PayloadMode**: runtime switch (`as_json`) used by the invoker to turn
//!   decoded bytes into a [`Dynamic`] and back.
//! - **PayloadCodec**: compile-time description of a mode. A transform written
//!   against `Raw` sees `Vec<u8>`; one written against `Json<T>` sees `T`.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::{Dynamic, ProcessError};

/// How message payloads are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadMode {
    /// Payloads are opaque bytes; transforms must produce bytes.
    #[default]
    Raw,
    /// Payloads are UTF-8 JSON documents; transforms produce JSON values.
    Json,
}

impl PayloadMode {
    pub fn from_as_json(as_json: bool) -> Self {
        if as_json { Self::Json } else { Self::Raw }
    }

    pub fn is_json(self) -> bool {
        self == Self::Json
    }

    /// What `processed_message` must look like in this mode.
    pub fn expected_message(self) -> &'static str {
        match self {
            Self::Raw => "bytes",
            Self::Json => "non-null JSON value",
        }
    }

    /// Decode base64-decoded payload bytes into the value handed to a transform.
    pub fn decode(self, bytes: Vec<u8>) -> Result<Dynamic, ProcessError> {
        match self {
            Self::Raw => Ok(Dynamic::Bytes(bytes)),
            Self::Json => {
                let text = String::from_utf8(bytes)?;
                let value: serde_json::Value =
                    serde_json::from_str(&text).map_err(ProcessError::Json)?;
                Ok(Dynamic::from(value))
            }
        }
    }
}

impl fmt::Display for PayloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => f.write_str("raw"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Typed view over a [`PayloadMode`].
pub trait PayloadCodec: Send + Sync + 'static {
    type Value: Send + 'static;

    const MODE: PayloadMode;
    const NAME: &'static str;

    fn from_dynamic(value: Dynamic) -> Result<Self::Value, ProcessError>;
    fn into_dynamic(value: Self::Value) -> Result<Dynamic, ProcessError>;
}

/// Opaque bytes in, bytes out.
pub struct Raw;

impl PayloadCodec for Raw {
    type Value = Vec<u8>;

    const MODE: PayloadMode = PayloadMode::Raw;
    const NAME: &'static str = "raw";

    fn from_dynamic(value: Dynamic) -> Result<Vec<u8>, ProcessError> {
        match value {
            Dynamic::Bytes(bytes) => Ok(bytes),
            other => Err(ProcessError::CodecMismatch {
                codec: Self::NAME,
                found: other.type_name(),
            }),
        }
    }

    fn into_dynamic(value: Vec<u8>) -> Result<Dynamic, ProcessError> {
        Ok(Dynamic::Bytes(value))
    }
}

/// JSON documents deserialized into `T`.
///
/// `Json` alone works on untyped `serde_json::Value`s.
pub struct Json<T = serde_json::Value>(PhantomData<fn() -> T>);

impl<T> PayloadCodec for Json<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    type Value = T;

    const MODE: PayloadMode = PayloadMode::Json;
    const NAME: &'static str = "json";

    fn from_dynamic(value: Dynamic) -> Result<T, ProcessError> {
        let json = match value {
            Dynamic::Null => serde_json::Value::Null,
            Dynamic::Json(json) => json,
            other => {
                return Err(ProcessError::CodecMismatch {
                    codec: Self::NAME,
                    found: other.type_name(),
                });
            }
        };
        serde_json::from_value(json).map_err(ProcessError::Json)
    }

    fn into_dynamic(value: T) -> Result<Dynamic, ProcessError> {
        let json = serde_json::to_value(value).map_err(ProcessError::Encode)?;
        Ok(Dynamic::from(json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Reading {
        a: i64,
    }

    #[test]
    fn raw_mode_keeps_bytes() {
        let decoded = PayloadMode::Raw.decode(vec![0xff, 0x00]).unwrap();
        assert_eq!(decoded, Dynamic::Bytes(vec![0xff, 0x00]));
    }

    #[test]
    fn json_mode_parses_documents() {
        let decoded = PayloadMode::Json.decode(br#"{"a":1}"#.to_vec()).unwrap();
        assert_eq!(decoded, Dynamic::Json(json!({"a": 1})));
    }

    #[test]
    fn json_mode_rejects_invalid_utf8() {
        let err = PayloadMode::Json.decode(vec![0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ProcessError::Utf8(_)));
    }

    #[test]
    fn json_mode_rejects_invalid_json() {
        let err = PayloadMode::Json.decode(b"{not json".to_vec()).unwrap_err();
        assert!(matches!(err, ProcessError::Json(_)));
    }

    #[test]
    fn mode_from_flag() {
        assert_eq!(PayloadMode::from_as_json(true), PayloadMode::Json);
        assert_eq!(PayloadMode::from_as_json(false), PayloadMode::Raw);
        assert_eq!(PayloadMode::default(), PayloadMode::Raw);
    }

    #[test]
    fn typed_json_codec_deserializes_into_struct() {
        let value = Json::<Reading>::from_dynamic(Dynamic::Json(json!({"a": 1}))).unwrap();
        assert_eq!(value, Reading { a: 1 });

        let back = Json::<Reading>::into_dynamic(Reading { a: 2 }).unwrap();
        assert_eq!(back, Dynamic::Json(json!({"a": 2})));
    }

    #[test]
    fn raw_codec_rejects_json_values() {
        let err = Raw::from_dynamic(Dynamic::Json(json!({"a": 1}))).unwrap_err();
        assert_eq!(err.to_string(), "raw codec cannot accept a payload of type object");
    }
}
