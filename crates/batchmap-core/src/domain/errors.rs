//! Errors - per-message failures and batch-level errors.
//!
//! `ProcessError` never leaves the batch driver: every variant is turned into a
//! `FailedMessage`. `BatchError` is the only error the caller of a batch sees.

use thiserror::Error;

use crate::typed::PayloadMode;

/// Why a single message could not be processed.
///
/// The `Display` form is what ends up in `FailedMessage::error`.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("payload is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// The transformation itself failed, synchronously or on completion.
    #[error(transparent)]
    Transform(#[from] anyhow::Error),

    #[error(
        "invalid transform result in {mode} mode: expected processed_message ({expected}) and \
         processed_headers (object), or both null; got processed_message: {message_type}, \
         processed_headers: {headers_type}"
    )]
    Shape {
        mode: PayloadMode,
        expected: &'static str,
        message_type: &'static str,
        headers_type: &'static str,
    },

    /// A typed transform received a value its codec cannot represent.
    #[error("{codec} codec cannot accept a payload of type {found}")]
    CodecMismatch {
        codec: &'static str,
        found: &'static str,
    },

    #[error("failed to serialize processed message: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Errors surfaced to the immediate caller of a batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to serialize batch result: {0}")]
    Serialization(#[from] serde_json::Error),
}
