//! Ownership and lifecycle coordination for the bootstrap record set.
//!
//! The host delivers the loaded document at startup; until something claims
//! it, the coordinator holds it verbatim. The context manager claims it
//! exactly once to materialize live contexts, after which the bootstrap set
//! is gone for good and shutdown persistence recomputes the document from
//! the live context set instead.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use teamlink_core::{SecretKey, ServerContext};
use teamlink_secrets::{MemoryVault, SecretVault};

use crate::persist::PersistEngine;
use crate::record::ContextRecord;
use crate::restore::RestoreEngine;

/// Narrow view of the external context manager: the live context set on
/// demand, used when a shutdown snapshot is needed.
pub trait ContextSource: Send + Sync {
    fn active_contexts(&self) -> Vec<ServerContext>;
}

impl ContextSource for Vec<ServerContext> {
    fn active_contexts(&self) -> Vec<ServerContext> {
        self.clone()
    }
}

/// Bootstrap ownership state. Either the host-delivered records are still
/// waiting to be claimed, or ownership has moved to the context manager.
/// There is no partial state.
enum BootstrapState {
    Unclaimed(Vec<ContextRecord>),
    Claimed,
}

/// Coordinates the hand-off between host persistence callbacks and the
/// long-lived context manager.
///
/// One instance is constructed at process start and passed to consumers;
/// harnesses that never wire up a host use [`SettingsCoordinator::detached`].
pub struct SettingsCoordinator {
    state: Mutex<BootstrapState>,
    restore: RestoreEngine,
    persist: PersistEngine,
}

impl SettingsCoordinator {
    /// Create a coordinator backed by the given vault, with an empty
    /// unclaimed bootstrap set.
    pub fn new(vault: Arc<dyn SecretVault>) -> Self {
        Self {
            state: Mutex::new(BootstrapState::Unclaimed(Vec::new())),
            restore: RestoreEngine::new(Arc::clone(&vault)),
            persist: PersistEngine::new(vault),
        }
    }

    /// Coordinator with an in-memory vault, for test harnesses that never
    /// receive host callbacks.
    pub fn detached() -> Self {
        Self::new(Arc::new(MemoryVault::new()))
    }

    /// Host startup callback: store the loaded document as bootstrap state.
    ///
    /// Delivering after the bootstrap set was claimed is a host sequencing
    /// bug; the late document is ignored so claimed ownership stays intact.
    pub fn deliver_document(&self, records: Vec<ContextRecord>) {
        let mut state = self.state.lock();
        match &mut *state {
            BootstrapState::Unclaimed(stored) => *stored = records,
            BootstrapState::Claimed => {
                warn!("settings document delivered after bootstrap was claimed; ignoring");
            }
        }
    }

    /// Take ownership of the bootstrap records.
    ///
    /// The first call returns whatever the host delivered (or empty) and
    /// permanently clears the bootstrap state; later calls return an empty
    /// set. Idempotent drain, not an error.
    pub fn claim(&self) -> Vec<ContextRecord> {
        let mut state = self.state.lock();
        match std::mem::replace(&mut *state, BootstrapState::Claimed) {
            BootstrapState::Unclaimed(records) => records,
            BootstrapState::Claimed => Vec::new(),
        }
    }

    /// Claim the bootstrap set and materialize live contexts from it.
    pub fn restore_contexts(&self) -> Vec<ServerContext> {
        self.restore.restore(self.claim())
    }

    /// Host shutdown callback: the document to write back out.
    ///
    /// If nothing ever claimed the bootstrap set, it is returned unchanged
    /// -- nothing was materialized, so nothing can have been mutated.
    /// Otherwise the document is computed fresh from the live context set.
    pub fn document_to_persist(&self, live: &dyn ContextSource) -> Vec<ContextRecord> {
        {
            let state = self.state.lock();
            if let BootstrapState::Unclaimed(records) = &*state {
                return records.clone();
            }
        }
        // Lock released before calling back into the manager.
        PersistEngine::snapshot(&live.active_contexts())
    }

    /// Write a context's credentials to the vault; absorbed failure.
    pub fn save_secret(&self, context: &ServerContext) -> bool {
        self.persist.save_secret(context)
    }

    /// Remove a vault entry; absorbed failure, idempotent.
    pub fn forget_secret(&self, key: &SecretKey) -> bool {
        self.persist.forget_secret(key)
    }
}
