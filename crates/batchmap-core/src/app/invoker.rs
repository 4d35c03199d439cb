//! Invoker - runs one message through a transform.
//!
//! decode → invoke → await → validate → encode. Errors are returned, never
//! handled here; the driver decides what a failure means for the batch.
//! A panic inside the transform is caught and returned as a transform error.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde_json::Value;

use crate::domain::{
    Dynamic, Inputs, Message, MessageOutcome, ProcessError, ProcessedMessage, decode_payload,
    encode_payload,
};
use crate::typed::{DynTransform, PayloadMode, TransformOutput, TransformResult};

pub struct Invoker<'a> {
    transform: &'a dyn DynTransform,
    mode: PayloadMode,
}

impl<'a> Invoker<'a> {
    pub fn new(transform: &'a dyn DynTransform, mode: PayloadMode) -> Self {
        Self { transform, mode }
    }

    pub async fn invoke(
        &self,
        message: &Message,
        inputs: &Inputs,
    ) -> Result<MessageOutcome, ProcessError> {
        let bytes = decode_payload(&message.payload)?;
        let payload = self.mode.decode(bytes)?;

        let result = AssertUnwindSafe(self.transform.transform_dyn(
            payload,
            &message.headers,
            inputs,
        ))
        .catch_unwind()
        .await
        .map_err(panic_error)??;

        match validate(self.mode, result)? {
            TransformOutput::Produced { message, headers } => {
                Ok(MessageOutcome::Produced(ProcessedMessage {
                    headers,
                    payload: encode_payload(message),
                }))
            }
            TransformOutput::Dropped => Ok(MessageOutcome::Dropped),
        }
    }
}

fn panic_error(panic: Box<dyn Any + Send>) -> ProcessError {
    let reason = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    ProcessError::Transform(anyhow::anyhow!("transform panicked: {reason}"))
}

/// Match a loosely typed result against the accepted shapes.
///
/// On success the message is already in its wire bytes: raw bytes as given, or
/// the UTF-8 JSON serialization of the value in JSON mode.
pub fn validate(
    mode: PayloadMode,
    result: TransformResult,
) -> Result<TransformOutput<Vec<u8>>, ProcessError> {
    let message = result.processed_message.normalize();
    let headers = result.processed_headers.normalize();
    match (mode, message, headers) {
        (_, Dynamic::Null, Dynamic::Null) => Ok(TransformOutput::Dropped),
        (PayloadMode::Raw, Dynamic::Bytes(bytes), Dynamic::Json(Value::Object(headers))) => {
            Ok(TransformOutput::produced(bytes, headers))
        }
        (PayloadMode::Json, Dynamic::Json(value), Dynamic::Json(Value::Object(headers))) => {
            let bytes = serde_json::to_vec(&value).map_err(ProcessError::Encode)?;
            Ok(TransformOutput::produced(bytes, headers))
        }
        (mode, message, headers) => Err(ProcessError::Shape {
            mode,
            expected: mode.expected_message(),
            message_type: message.type_name(),
            headers_type: headers.type_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Headers;
    use crate::typed::{Completion, from_fn};
    use rstest::rstest;
    use serde_json::json;

    fn headers(v: Value) -> Headers {
        match v {
            Value::Object(map) => map,
            _ => panic!("headers must be an object"),
        }
    }

    #[rstest]
    #[case::raw_bytes(PayloadMode::Raw, Dynamic::Bytes(vec![1]), Dynamic::Json(json!({})))]
    #[case::json_object(PayloadMode::Json, Dynamic::Json(json!({"a": 2})), Dynamic::Json(json!({})))]
    #[case::json_string(PayloadMode::Json, Dynamic::Json(json!("text")), Dynamic::Json(json!({"h": 1})))]
    fn accepts_produced_shapes(
        #[case] mode: PayloadMode,
        #[case] message: Dynamic,
        #[case] headers: Dynamic,
    ) {
        let out = validate(mode, TransformResult::new(message, headers)).unwrap();
        assert!(matches!(out, TransformOutput::Produced { .. }));
    }

    #[rstest]
    #[case::raw(PayloadMode::Raw)]
    #[case::json(PayloadMode::Json)]
    fn both_null_is_drop(#[case] mode: PayloadMode) {
        let out = validate(mode, TransformResult::dropped()).unwrap();
        assert_eq!(out, TransformOutput::Dropped);
    }

    #[rstest]
    #[case::raw(PayloadMode::Raw)]
    #[case::json(PayloadMode::Json)]
    fn both_json_null_is_drop(#[case] mode: PayloadMode) {
        let result = TransformResult {
            processed_message: Dynamic::Json(Value::Null),
            processed_headers: Dynamic::Json(Value::Null),
        };
        assert_eq!(validate(mode, result).unwrap(), TransformOutput::Dropped);
    }

    #[rstest]
    #[case::string_in_raw(PayloadMode::Raw, Dynamic::Json(json!("not bytes")), Dynamic::Json(json!({})), "string", "object")]
    #[case::message_null_only(PayloadMode::Raw, Dynamic::Null, Dynamic::Json(json!({})), "null", "object")]
    #[case::headers_null_only(PayloadMode::Raw, Dynamic::Bytes(vec![1]), Dynamic::Null, "bytes", "null")]
    #[case::headers_not_object(PayloadMode::Raw, Dynamic::Bytes(vec![1]), Dynamic::Json(json!([1])), "bytes", "array")]
    #[case::missing_fields(PayloadMode::Raw, Dynamic::Missing, Dynamic::Missing, "missing", "missing")]
    #[case::bytes_in_json(PayloadMode::Json, Dynamic::Bytes(vec![1]), Dynamic::Json(json!({})), "bytes", "object")]
    #[case::json_null_message(PayloadMode::Json, Dynamic::Null, Dynamic::Json(json!({})), "null", "object")]
    #[case::wrapped_null_message(PayloadMode::Json, Dynamic::Json(Value::Null), Dynamic::Json(json!({})), "null", "object")]
    #[case::wrapped_null_headers(PayloadMode::Raw, Dynamic::Bytes(vec![1]), Dynamic::Json(Value::Null), "bytes", "null")]
    fn rejects_other_shapes(
        #[case] mode: PayloadMode,
        #[case] message: Dynamic,
        #[case] headers: Dynamic,
        #[case] message_type: &str,
        #[case] headers_type: &str,
    ) {
        let err = validate(mode, TransformResult::new(message, headers)).unwrap_err();
        match err {
            ProcessError::Shape {
                message_type: m,
                headers_type: h,
                ..
            } => {
                assert_eq!(m, message_type);
                assert_eq!(h, headers_type);
            }
            other => panic!("expected shape error, got {other:?}"),
        }
    }

    #[test]
    fn json_mode_serializes_value() {
        let out = validate(
            PayloadMode::Json,
            TransformResult::new(json!({"a": 2}), json!({})),
        )
        .unwrap();
        assert_eq!(
            out,
            TransformOutput::produced(br#"{"a":2}"#.to_vec(), Headers::new())
        );
    }

    #[tokio::test]
    async fn invoke_passes_headers_and_inputs() {
        let transform = from_fn(|payload, headers, inputs| {
            let mut out = headers.clone();
            out.insert("seen".to_string(), inputs["tag"].clone());
            TransformResult::produced(payload, out)
        });
        let invoker = Invoker::new(&transform, PayloadMode::Raw);

        let message = Message::new(headers(json!({"id": 1})), "AQID");
        let inputs = headers(json!({"tag": "t1"}));

        let outcome = invoker.invoke(&message, &inputs).await.unwrap();
        match outcome {
            MessageOutcome::Produced(processed) => {
                assert_eq!(processed.payload, "AQID");
                assert_eq!(processed.headers["id"], 1);
                assert_eq!(processed.headers["seen"], "t1");
            }
            MessageOutcome::Dropped => panic!("message should not be dropped"),
        }
    }

    #[tokio::test]
    async fn invoke_fails_on_bad_base64_without_calling_transform() {
        let transform = from_fn(|_payload, _headers, _inputs| -> Completion<TransformResult> {
            panic!("transform must not run")
        });
        let invoker = Invoker::new(&transform, PayloadMode::Raw);

        let message = Message::new(Headers::new(), "%%%");
        let err = invoker.invoke(&message, &Inputs::new()).await.unwrap_err();
        assert!(matches!(err, ProcessError::Base64(_)));
    }

    #[tokio::test]
    async fn invoke_turns_panic_into_transform_error() {
        let transform = from_fn(|_payload, _headers, _inputs| -> Completion<TransformResult> {
            panic!("handler bug")
        });
        let invoker = Invoker::new(&transform, PayloadMode::Raw);

        let message = Message::from_bytes(Headers::new(), b"a");
        let err = invoker.invoke(&message, &Inputs::new()).await.unwrap_err();
        assert!(matches!(err, ProcessError::Transform(_)));
        assert_eq!(err.to_string(), "transform panicked: handler bug");
    }

    #[tokio::test]
    async fn invoke_catches_panic_in_deferred_work() {
        let transform = from_fn(|_payload, _headers, _inputs| {
            let code = 42;
            Completion::<TransformResult>::deferred(async move {
                tokio::task::yield_now().await;
                if code > 0 {
                    panic!("late failure {code}");
                }
                Ok(TransformResult::dropped())
            })
        });
        let invoker = Invoker::new(&transform, PayloadMode::Raw);

        let message = Message::from_bytes(Headers::new(), b"a");
        let err = invoker.invoke(&message, &Inputs::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "transform panicked: late failure 42");
    }

    #[tokio::test]
    async fn invoke_awaits_deferred_results() {
        let transform = from_fn(|payload, headers, _inputs| {
            let headers = headers.clone();
            Completion::deferred(async move {
                tokio::task::yield_now().await;
                Ok(TransformResult::produced(payload, headers))
            })
        });
        let invoker = Invoker::new(&transform, PayloadMode::Json);

        let message = Message::from_bytes(Headers::new(), br#"{"a":1}"#);
        let outcome = invoker.invoke(&message, &Inputs::new()).await.unwrap();
        assert_eq!(
            outcome,
            MessageOutcome::Produced(ProcessedMessage {
                headers: Headers::new(),
                payload: encode_payload(br#"{"a":1}"#),
            })
        );
    }
}
