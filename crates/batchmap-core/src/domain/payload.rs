//! Base64 at the boundary: payloads travel as standard, padded base64 text.

use base64::{Engine as _, engine::general_purpose};

use super::errors::ProcessError;

pub fn decode_payload(payload: &str) -> Result<Vec<u8>, ProcessError> {
    Ok(general_purpose::STANDARD.decode(payload)?)
}

pub fn encode_payload(bytes: impl AsRef<[u8]>) -> String {
    general_purpose::STANDARD.encode(bytes)
}
