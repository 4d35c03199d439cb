//! Built-in transforms selectable with `BATCHMAP_TRANSFORM`.

use std::sync::Arc;

use async_trait::async_trait;
use batchmap_core::{
    AdapterBuilder, AdapterConfig, BatchAdapter, BuildError, DynTransform, Headers, Inputs, Json,
    Transform, TransformOutput, TransformResult, TypedTransform, from_fn,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    /// Payload and headers unchanged.
    #[default]
    Identity,
    /// Shallow-merge the batch inputs into each JSON object payload.
    MergeInputs,
    /// Drop every message.
    DropAll,
}

pub struct MergeInputs;

#[async_trait]
impl Transform<Json> for MergeInputs {
    async fn transform(
        &self,
        payload: Value,
        headers: &Headers,
        inputs: &Inputs,
    ) -> anyhow::Result<TransformOutput<Value>> {
        let Value::Object(mut document) = payload else {
            anyhow::bail!("merge_inputs expects a JSON object payload");
        };
        for (key, value) in inputs {
            document.insert(key.clone(), value.clone());
        }
        Ok(TransformOutput::produced(
            Value::Object(document),
            headers.clone(),
        ))
    }
}

pub fn build_adapter(
    kind: TransformKind,
    as_json: Option<bool>,
) -> Result<BatchAdapter, BuildError> {
    let transform: Arc<dyn DynTransform> = match kind {
        TransformKind::Identity => Arc::new(from_fn(|payload, headers, _inputs| {
            TransformResult::produced(payload, headers.clone())
        })),
        TransformKind::MergeInputs => Arc::new(TypedTransform::<Json, _>::new(MergeInputs)),
        TransformKind::DropAll => {
            Arc::new(from_fn(|_payload, _headers, _inputs| TransformResult::dropped()))
        }
    };

    match as_json {
        Some(as_json) => BatchAdapter::from_config(&AdapterConfig { as_json }, transform),
        None => AdapterBuilder::new().shared(transform).build(),
    }
}
