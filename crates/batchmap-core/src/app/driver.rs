//! Batch driver - iterates a batch and isolates per-message failures.
//!
//! Messages are processed one at a time, in order. The next message is not
//! started until the current one has produced, dropped or failed.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::builder::{AdapterBuilder, BuildError};
use super::invoker::Invoker;
use crate::config::AdapterConfig;
use crate::domain::{Batch, BatchResult, MessageOutcome};
use crate::typed::{DynTransform, PayloadMode};

/// A transform bound to a payload mode, ready to process batches.
#[derive(Clone)]
pub struct BatchAdapter {
    transform: Arc<dyn DynTransform>,
    mode: PayloadMode,
}

impl BatchAdapter {
    pub fn new(transform: Arc<dyn DynTransform>, mode: PayloadMode) -> Self {
        Self { transform, mode }
    }

    /// Build from configuration, with the same checks as [`AdapterBuilder::build`].
    pub fn from_config(
        config: &AdapterConfig,
        transform: Arc<dyn DynTransform>,
    ) -> Result<Self, BuildError> {
        AdapterBuilder::from_config(config).shared(transform).build()
    }

    pub fn mode(&self) -> PayloadMode {
        self.mode
    }

    pub async fn process(&self, batch: &Batch) -> BatchResult {
        run(self.transform.as_ref(), self.mode, batch).await
    }
}

impl std::fmt::Debug for BatchAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchAdapter")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Apply `transform` to every message of `batch`.
///
/// With `as_json`, payloads are parsed as JSON before the call and the produced
/// value is serialized back to JSON bytes.
pub async fn process_batch(
    batch: &Batch,
    transform: &dyn DynTransform,
    as_json: bool,
) -> BatchResult {
    let mode = PayloadMode::from_as_json(as_json);
    if let Some(bound) = transform.mode().filter(|bound| *bound != mode) {
        warn!(%mode, transform_mode = %bound, "transform is bound to a different payload mode");
    }
    run(transform, mode, batch).await
}

#[instrument(name = "process_batch", skip_all, fields(messages = batch.len(), mode = %mode))]
async fn run(transform: &dyn DynTransform, mode: PayloadMode, batch: &Batch) -> BatchResult {
    let invoker = Invoker::new(transform, mode);
    let mut result = BatchResult::new();
    let mut dropped = 0usize;

    for (index, message) in batch.messages.iter().enumerate() {
        let outcome = invoker.invoke(message, &batch.inputs).await;
        match &outcome {
            Ok(MessageOutcome::Produced(_)) => debug!(index, "message produced"),
            Ok(MessageOutcome::Dropped) => {
                dropped += 1;
                debug!(index, "message dropped");
            }
            Err(err) => warn!(index, error = %err, "message failed"),
        }
        result.record(message, outcome);
    }

    info!(
        produced = result.messages.len(),
        dropped,
        failed = result.failed_messages.len(),
        "batch processed"
    );
    result
}
