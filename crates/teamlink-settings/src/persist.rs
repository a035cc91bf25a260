//! Persist engine: live contexts back into records and vault writes.

use std::sync::Arc;

use tracing::{debug, warn};

use teamlink_core::{codec, SecretKey, ServerContext};
use teamlink_secrets::SecretVault;

use crate::record::ContextRecord;

/// Projects live contexts to persisted records and writes secrets.
///
/// The secret operations absorb vault failures: they are invoked from
/// interactive flows where a hard error would be more disruptive than a
/// lost cached credential. Callers get a success flag they are free to
/// ignore.
pub struct PersistEngine {
    vault: Arc<dyn SecretVault>,
}

impl PersistEngine {
    pub fn new(vault: Arc<dyn SecretVault>) -> Self {
        Self { vault }
    }

    /// Pure projection of live contexts into persisted records.
    ///
    /// Identity fields are copied verbatim; each metadata object is encoded
    /// independently, and an encode failure nulls that field only. No vault
    /// interaction happens here.
    pub fn snapshot(contexts: &[ServerContext]) -> Vec<ContextRecord> {
        contexts
            .iter()
            .map(|context| ContextRecord {
                kind: Some(context.kind().as_str().to_string()),
                uri: Some(context.uri().to_string()),
                account_uuid: context.account_id().map(|id| id.to_string()),
                collection_ref_json: codec::encode_field(context.collection()),
                project_ref_json: codec::encode_field(context.project()),
                repo_ref_json: codec::encode_field(context.repository()),
            })
            .collect()
    }

    /// Write a context's credentials to the vault.
    ///
    /// Returns whether the write succeeded; failure is logged, never
    /// propagated.
    pub fn save_secret(&self, context: &ServerContext) -> bool {
        let key = context.secret_key();
        let payload = match codec::to_json(context.auth()) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key = %key, "failed to encode credentials: {e}");
                return false;
            }
        };
        match self.vault.set(&key, &payload) {
            Ok(()) => {
                debug!(key = %key, "saved server credentials");
                true
            }
            Err(e) => {
                warn!(key = %key, "failed to save server credentials: {e}");
                false
            }
        }
    }

    /// Remove a vault entry; used by revocation flows and restore cleanup.
    ///
    /// Idempotent -- removing an absent key succeeds. Returns whether the
    /// vault accepted the removal.
    pub fn forget_secret(&self, key: &SecretKey) -> bool {
        match self.vault.remove(key) {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %key, "failed to remove server credentials: {e}");
                false
            }
        }
    }
}
