//! Error types for settings persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for document store operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Failures while loading or saving the settings document.
///
/// These surface to the host only; per-record problems inside the document
/// are recovered locally by the restore engine and never reach here.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Settings path unavailable: {0}")]
    PathUnavailable(String),

    #[error("Malformed settings document {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
