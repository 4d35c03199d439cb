//! Transform traits - the caller-supplied per-message function.
//!
//! - `Transform<C>`: typed, written against a codec (`Raw` or `Json<T>`)
//! - `DynTransform`: object-safe, works on [`Dynamic`] values; what the invoker calls
//! - `TypedTransform<C, T>`: type erasure from the former to the latter
//!
//! Closures can be used directly through [`from_fn`] and [`typed_fn`].

use std::marker::PhantomData;

use async_trait::async_trait;

use super::codec::{PayloadCodec, PayloadMode};
use super::completion::Completion;
use crate::domain::{Dynamic, Headers, Inputs, ProcessError};

/// Loosely typed result of a transformation.
///
/// Only two shapes are valid: a produced message (`processed_message` matching
/// the payload mode, `processed_headers` an object) or the drop sentinel (both
/// `Null`). Anything else is rejected by the invoker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformResult {
    pub processed_message: Dynamic,
    pub processed_headers: Dynamic,
}

impl TransformResult {
    pub fn new(message: impl Into<Dynamic>, headers: impl Into<Dynamic>) -> Self {
        Self {
            processed_message: message.into(),
            processed_headers: headers.into(),
        }
    }

    pub fn produced(message: impl Into<Dynamic>, headers: Headers) -> Self {
        Self::new(message, headers)
    }

    /// The drop sentinel.
    pub fn dropped() -> Self {
        Self::new(Dynamic::Null, Dynamic::Null)
    }
}

impl From<TransformResult> for Completion<TransformResult> {
    fn from(result: TransformResult) -> Self {
        Completion::ready(result)
    }
}

/// Typed result: the mode contract is carried by `V`.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformOutput<V> {
    Produced { message: V, headers: Headers },
    Dropped,
}

impl<V> TransformOutput<V> {
    pub fn produced(message: V, headers: Headers) -> Self {
        Self::Produced { message, headers }
    }

    pub fn dropped() -> Self {
        Self::Dropped
    }
}

impl<V> From<TransformOutput<V>> for Completion<TransformOutput<V>> {
    fn from(output: TransformOutput<V>) -> Self {
        Completion::ready(output)
    }
}

/// Transform is a per-message function written against a codec.
///
/// # Example
/// ```ignore
/// struct Bump;
///
/// #[async_trait]
/// impl Transform<Json> for Bump {
///     async fn transform(&self, payload: Value, headers: &Headers, _inputs: &Inputs)
///         -> anyhow::Result<TransformOutput<Value>>
///     {
///         Ok(TransformOutput::produced(json!({"a": payload["a"].as_i64().unwrap_or(0) + 1}), headers.clone()))
///     }
/// }
/// ```
#[async_trait]
pub trait Transform<C: PayloadCodec>: Send + Sync {
    async fn transform(
        &self,
        payload: C::Value,
        headers: &Headers,
        inputs: &Inputs,
    ) -> anyhow::Result<TransformOutput<C::Value>>;
}

/// DynTransform is the object-safe form the invoker drives.
#[async_trait]
pub trait DynTransform: Send + Sync {
    async fn transform_dyn(
        &self,
        payload: Dynamic,
        headers: &Headers,
        inputs: &Inputs,
    ) -> Result<TransformResult, ProcessError>;

    /// The payload mode this transform is bound to, if any.
    fn mode(&self) -> Option<PayloadMode> {
        None
    }
}

pub struct TypedTransform<C: PayloadCodec, T: Transform<C>> {
    inner: T,
    _codec: PhantomData<fn() -> C>,
}

impl<C: PayloadCodec, T: Transform<C>> TypedTransform<C, T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            _codec: PhantomData,
        }
    }
}

#[async_trait]
impl<C: PayloadCodec, T: Transform<C>> DynTransform for TypedTransform<C, T> {
    async fn transform_dyn(
        &self,
        payload: Dynamic,
        headers: &Headers,
        inputs: &Inputs,
    ) -> Result<TransformResult, ProcessError> {
        let value = C::from_dynamic(payload)?;
        match self.inner.transform(value, headers, inputs).await? {
            TransformOutput::Produced { message, headers } => Ok(TransformResult::new(
                C::into_dynamic(message)?,
                headers,
            )),
            TransformOutput::Dropped => Ok(TransformResult::dropped()),
        }
    }

    fn mode(&self) -> Option<PayloadMode> {
        Some(C::MODE)
    }
}

/// A closure working on [`Dynamic`] payloads.
pub struct FnTransform<F> {
    f: F,
}

/// Wrap a closure as a [`DynTransform`].
///
/// The closure may return a `TransformResult`, an `anyhow::Result` of one, or a
/// [`Completion`] (use `Completion::deferred` for asynchronous work).
pub fn from_fn<F, R>(f: F) -> FnTransform<F>
where
    F: Fn(Dynamic, &Headers, &Inputs) -> R + Send + Sync,
    R: Into<Completion<TransformResult>> + Send + 'static,
{
    FnTransform { f }
}

#[async_trait]
impl<F, R> DynTransform for FnTransform<F>
where
    F: Fn(Dynamic, &Headers, &Inputs) -> R + Send + Sync,
    R: Into<Completion<TransformResult>> + Send + 'static,
{
    async fn transform_dyn(
        &self,
        payload: Dynamic,
        headers: &Headers,
        inputs: &Inputs,
    ) -> Result<TransformResult, ProcessError> {
        let completion: Completion<TransformResult> = (self.f)(payload, headers, inputs).into();
        Ok(completion.resolve().await?)
    }
}

/// A closure written against codec `C`.
pub struct TypedFn<C, F> {
    f: F,
    _codec: PhantomData<fn() -> C>,
}

/// Wrap a closure as a [`Transform<C>`].
pub fn typed_fn<C, F, R>(f: F) -> TypedFn<C, F>
where
    C: PayloadCodec,
    F: Fn(C::Value, &Headers, &Inputs) -> R + Send + Sync,
    R: Into<Completion<TransformOutput<C::Value>>> + Send + 'static,
{
    TypedFn {
        f,
        _codec: PhantomData,
    }
}

#[async_trait]
impl<C, F, R> Transform<C> for TypedFn<C, F>
where
    C: PayloadCodec,
    F: Fn(C::Value, &Headers, &Inputs) -> R + Send + Sync,
    R: Into<Completion<TransformOutput<C::Value>>> + Send + 'static,
{
    async fn transform(
        &self,
        payload: C::Value,
        headers: &Headers,
        inputs: &Inputs,
    ) -> anyhow::Result<TransformOutput<C::Value>> {
        let completion: Completion<_> = (self.f)(payload, headers, inputs).into();
        completion.resolve().await
    }
}
