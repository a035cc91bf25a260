//! Secret vault boundary for TeamLink.
//!
//! Defines the [`SecretVault`] interface the persistence core talks to and
//! two implementations: an in-memory vault for tests and detached
//! harnesses, and an encrypted file-backed vault with OS keychain
//! integration for master key management.

pub mod crypto;
pub mod error;
pub mod file;
pub mod keychain;
pub mod vault;

pub use error::{Result, VaultError};
pub use file::FileVault;
pub use vault::{MemoryVault, SecretVault, SERVICE_ID};
