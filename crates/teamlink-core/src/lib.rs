//! # teamlink-core
//!
//! Core types and utilities for TeamLink server context management.
//!
//! This crate provides the shared building blocks used across the TeamLink
//! crates:
//!
//! - **Types**: live server contexts, credential bundles, and the small tree
//!   of project/repository metadata attached to a connection
//! - **Codec**: JSON encode/decode helpers for the persisted document and
//!   the vault payload
//! - **Keys**: deterministic secret-key derivation from a server identity

pub mod codec;
pub mod error;
pub mod key;
pub mod secret;
pub mod types;

// Re-exports for convenience
pub use error::{Error, Result};
pub use key::SecretKey;
pub use secret::SecretString;
pub use types::*;
