//! Error types for TeamLink core.

use thiserror::Error;

/// Core result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Invalid server URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("Unrecognized context type: {0}")]
    UnknownContextType(String),
}

/// JSON encode/decode failure for a single value.
#[derive(Debug, Error)]
#[error("JSON error: {0}")]
pub struct CodecError(#[from] serde_json::Error);
