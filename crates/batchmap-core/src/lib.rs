//! batchmap-core
//!
//! Applies a caller-supplied transformation to every message of a batch and
//! returns the produced messages and the failed ones side by side.
//!
//! # Modules
//! - **domain**: batches, messages, results, errors, dynamic values
//! - **typed**: payload codecs, `Completion`, `Transform` / `DynTransform`
//! - **app**: invoker, batch driver, builder
//! - **config**: adapter settings
//!
//! # Example
//! ```ignore
//! let transform = from_fn(|payload, headers, _inputs| {
//!     TransformResult::produced(payload, headers.clone())
//! });
//! let result = process_batch(&batch, &transform, false).await;
//! println!("{}", result.to_json()?);
//! ```

pub mod app;
pub mod config;
pub mod domain;
pub mod typed;

pub use app::{AdapterBuilder, BatchAdapter, BuildError, process_batch};
pub use config::AdapterConfig;
pub use domain::{
    Batch, BatchError, BatchResult, Dynamic, FailedMessage, Headers, Inputs, Message,
    ProcessError, ProcessedMessage,
};
pub use typed::{
    Completion, DynTransform, Json, PayloadCodec, PayloadMode, Raw, Transform, TransformOutput,
    TransformResult, TypedTransform, from_fn, typed_fn,
};
