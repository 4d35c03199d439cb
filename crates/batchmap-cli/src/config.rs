use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::transforms::TransformKind;

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Parse payloads as JSON. Unset lets a typed transform pick its own mode.
    #[serde(default)]
    pub as_json: Option<bool>,

    /// Built-in transform applied to every message
    #[serde(default)]
    pub transform: TransformKind,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CliConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("BATCHMAP"))
            .build()?
            .try_deserialize()
    }
}
