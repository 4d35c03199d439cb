//! Inbound data: a `Batch` of base64-encoded `Message`s plus shared `inputs`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque key/value mapping attached to a message.
pub type Headers = Map<String, Value>;

/// Values handed unchanged to every transformation call within a batch.
pub type Inputs = Map<String, Value>;

/// One unit of work as delivered by the event runtime.
///
/// `payload` stays base64 text; it is decoded per invocation and never
/// rewritten, so a failed message can always be reported as it arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub headers: Headers,
    pub payload: String,
}

impl Message {
    pub fn new(headers: Headers, payload: impl Into<String>) -> Self {
        Self {
            headers,
            payload: payload.into(),
        }
    }

    /// Build a message from raw bytes, base64-encoding them.
    pub fn from_bytes(headers: Headers, bytes: impl AsRef<[u8]>) -> Self {
        Self::new(headers, crate::domain::encode_payload(bytes))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub inputs: Inputs,
}

impl Batch {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            inputs: Inputs::new(),
        }
    }

    pub fn with_inputs(mut self, inputs: Inputs) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
