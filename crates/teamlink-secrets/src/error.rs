//! Error types for vault operations.

use thiserror::Error;

/// Errors a vault backend can report.
///
/// Callers in the persistence core absorb these (log and continue); they
/// exist so a backend can still say *what* went wrong.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Keychain error: {0}")]
    Keychain(String),

    #[error("Corrupt vault entry: {0}")]
    CorruptEntry(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
