//! Completion - a transform result that is either ready now or later.
//!
//! Closures registered with [`from_fn`](super::from_fn) or
//! [`typed_fn`](super::typed_fn) return anything that converts into a
//! `Completion`, so a plain value and a future are registered the same way.
//! The invoker always awaits; an immediate result resolves without yielding.

use std::future::Future;

use futures::future::BoxFuture;

pub enum Completion<T> {
    Immediate(anyhow::Result<T>),
    Pending(BoxFuture<'static, anyhow::Result<T>>),
}

impl<T> Completion<T> {
    pub fn ready(value: T) -> Self {
        Self::Immediate(Ok(value))
    }

    /// Wrap a future that completes with the result.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        Self::Pending(Box::pin(future))
    }

    /// Wait for the result, however it was produced.
    pub async fn resolve(self) -> anyhow::Result<T> {
        match self {
            Self::Immediate(result) => result,
            Self::Pending(future) => future.await,
        }
    }
}

impl<T> From<anyhow::Result<T>> for Completion<T> {
    fn from(result: anyhow::Result<T>) -> Self {
        Self::Immediate(result)
    }
}

impl<T> std::fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Immediate(_) => f.write_str("Completion::Immediate"),
            Self::Pending(_) => f.write_str("Completion::Pending"),
        }
    }
}
