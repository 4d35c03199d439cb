//! AdapterBuilder - wiring a transform and a payload mode into a `BatchAdapter`.
//!
//! Construction is fail-fast: a missing transform, a second registration, or a
//! configured mode that contradicts a typed transform's codec are reported by
//! `build()` instead of surfacing as per-message failures later.

use std::sync::Arc;

use super::driver::BatchAdapter;
use crate::config::AdapterConfig;
use crate::typed::{DynTransform, PayloadCodec, PayloadMode, Transform, TypedTransform};

/// # Example
/// ```ignore
/// let adapter = AdapterBuilder::new()
///     .typed::<Json, _>(MyTransform)
///     .build()?;
/// let result = adapter.process(&batch).await;
/// ```
#[derive(Default)]
pub struct AdapterBuilder {
    transform: Option<Arc<dyn DynTransform>>,
    mode: Option<PayloadMode>,
    duplicate: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("No transform registered. Call transform() or typed() before build().")]
    MissingTransform,

    #[error("A transform is already registered; only one transform per adapter is supported.")]
    DuplicateTransform,

    #[error("Payload mode conflict: configured {configured} but the transform expects {transform}.")]
    ModeConflict {
        configured: PayloadMode,
        transform: PayloadMode,
    },
}

impl AdapterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AdapterConfig) -> Self {
        Self::new().mode(config.mode())
    }

    pub fn mode(mut self, mode: PayloadMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn as_json(self, as_json: bool) -> Self {
        self.mode(PayloadMode::from_as_json(as_json))
    }

    /// Register a dynamic transform.
    pub fn transform<T: DynTransform + 'static>(self, transform: T) -> Self {
        self.shared(Arc::new(transform))
    }

    /// Register a transform written against codec `C`; the adapter's mode
    /// follows `C` unless one was configured explicitly.
    pub fn typed<C: PayloadCodec, T: Transform<C> + 'static>(self, transform: T) -> Self {
        self.transform(TypedTransform::<C, T>::new(transform))
    }

    pub fn shared(mut self, transform: Arc<dyn DynTransform>) -> Self {
        if self.transform.is_some() {
            self.duplicate = true;
        }
        self.transform = Some(transform);
        self
    }

    pub fn build(self) -> Result<BatchAdapter, BuildError> {
        if self.duplicate {
            return Err(BuildError::DuplicateTransform);
        }
        let transform = self.transform.ok_or(BuildError::MissingTransform)?;

        let mode = match (self.mode, transform.mode()) {
            (Some(configured), Some(bound)) if configured != bound => {
                return Err(BuildError::ModeConflict {
                    configured,
                    transform: bound,
                });
            }
            (Some(configured), _) => configured,
            (None, Some(bound)) => bound,
            (None, None) => PayloadMode::default(),
        };

        Ok(BatchAdapter::new(transform, mode))
    }
}
