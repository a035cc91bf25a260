//! JSON codec helpers for persisted metadata and vault payloads.
//!
//! Two flavors are provided. The strict [`to_json`]/[`from_json`] pair is
//! used for the secret payload, where a decode failure makes the whole
//! record unusable. The lenient [`encode_field`]/[`decode_field`] pair is
//! used for the embedded metadata blobs, where a bad field is logged and
//! dropped without failing the record that carries it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::CodecError;

/// Encode a value as a JSON string.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(value)?)
}

/// Decode a value from a JSON string.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, CodecError> {
    Ok(serde_json::from_str(json)?)
}

/// Encode an optional metadata value, absorbing failures.
///
/// Returns `None` both for an absent input and for a value that fails to
/// serialize; the failure is logged so it can be diagnosed later.
pub fn encode_field<T: Serialize>(value: Option<&T>) -> Option<String> {
    let value = value?;
    match serde_json::to_string(value) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!("failed to encode metadata field: {e}");
            None
        }
    }
}

/// Decode an optional metadata value, absorbing failures.
///
/// A malformed blob yields `None` with a warning; the caller keeps the rest
/// of the record.
pub fn decode_field<T: DeserializeOwned>(json: Option<&str>) -> Option<T> {
    let json = json?;
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("failed to decode metadata field: {e}");
            None
        }
    }
}
