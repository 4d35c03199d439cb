//! Outbound data: the partitioned `BatchResult`.

use serde::{Deserialize, Serialize};

use super::errors::{BatchError, ProcessError};
use super::message::{Headers, Message};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedMessage {
    pub headers: Headers,
    /// Base64 of the bytes produced by the transformation.
    pub payload: String,
}

/// A message that could not be processed, reported exactly as it arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedMessage {
    pub headers: Headers,
    pub payload: String,
    pub error: String,
}

impl FailedMessage {
    pub fn new(original: &Message, error: &ProcessError) -> Self {
        Self {
            headers: original.headers.clone(),
            payload: original.payload.clone(),
            error: error.to_string(),
        }
    }
}

/// What happened to one message once the invoker is done with it.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageOutcome {
    Produced(ProcessedMessage),
    Dropped,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub messages: Vec<ProcessedMessage>,
    pub failed_messages: Vec<FailedMessage>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one message's outcome into the result. A drop leaves no entry.
    pub fn record(&mut self, original: &Message, outcome: Result<MessageOutcome, ProcessError>) {
        match outcome {
            Ok(MessageOutcome::Produced(processed)) => self.messages.push(processed),
            Ok(MessageOutcome::Dropped) => {}
            Err(err) => self
                .failed_messages
                .push(FailedMessage::new(original, &err)),
        }
    }

    /// Number of entries across both lists.
    pub fn len(&self) -> usize {
        self.messages.len() + self.failed_messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize into the wire shape handed back to the event runtime.
    pub fn to_json(&self) -> Result<String, BatchError> {
        Ok(serde_json::to_string(self)?)
    }
}
