use serde::{Deserialize, Serialize};

use crate::typed::PayloadMode;

/// Adapter settings supplied by the hosting runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Treat payloads as UTF-8 JSON documents instead of opaque bytes.
    #[serde(default)]
    pub as_json: bool,
}

impl AdapterConfig {
    pub fn mode(&self) -> PayloadMode {
        PayloadMode::from_as_json(self.as_json)
    }
}
