//! Server context persistence for TeamLink.
//!
//! Persists the set of known server connections across process restarts.
//! Non-secret context metadata goes into a structured document on disk;
//! credentials go into the platform secret vault, addressed by a key
//! derived from the server identity. The two stores fail independently, so
//! the restore path owns a cleanup protocol that guarantees no vault entry
//! is left dangling for a record that could not be brought back to life.
//!
//! Lifecycle:
//! 1. At startup the host loads the document and delivers it to the
//!    [`SettingsCoordinator`] (bootstrap state).
//! 2. The context manager claims the bootstrap records exactly once via
//!    [`SettingsCoordinator::restore_contexts`], taking ownership of the
//!    materialized contexts.
//! 3. During normal operation the manager saves changed credentials
//!    incrementally through [`PersistEngine::save_secret`].
//! 4. At shutdown the host asks for the document to persist; it is the
//!    untouched bootstrap set if nothing ever claimed it, or a fresh
//!    snapshot of the live context set otherwise.

pub mod coordinator;
pub mod document;
pub mod error;
pub mod persist;
pub mod record;
pub mod restore;

pub use coordinator::{ContextSource, SettingsCoordinator};
pub use document::{DocumentStore, FileDocumentStore};
pub use error::{DocumentError, Result};
pub use persist::PersistEngine;
pub use record::ContextRecord;
pub use restore::RestoreEngine;
