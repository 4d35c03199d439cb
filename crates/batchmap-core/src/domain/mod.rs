//! Domain model: batches, messages, results, errors and dynamic values.

pub mod errors;
pub mod message;
pub mod payload;
pub mod result;
pub mod value;

pub use self::errors::{BatchError, ProcessError};
pub use self::message::{Batch, Headers, Inputs, Message};
pub use self::payload::{decode_payload, encode_payload};
pub use self::result::{BatchResult, FailedMessage, MessageOutcome, ProcessedMessage};
pub use self::value::Dynamic;
