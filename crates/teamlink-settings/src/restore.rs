//! Restore engine: persisted records back to live contexts.
//!
//! Restoration is per record and order preserving. Each record is parsed,
//! its secret is fetched from the vault, and a live context is built; any
//! failure is contained at the record boundary so one bad record never
//! aborts the rest. Dropped records get their vault entry cleaned up in a
//! second pass, which refuses to touch a key some successfully restored
//! context is still using -- the derived key is per server, not per record,
//! so two records can legitimately share one.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use teamlink_core::codec;
use teamlink_core::key::parse_server_uri;
use teamlink_core::{AuthenticationInfo, ContextType, SecretKey, ServerContext};
use teamlink_secrets::SecretVault;

use crate::record::ContextRecord;

/// Materializes persisted records into live contexts.
pub struct RestoreEngine {
    vault: Arc<dyn SecretVault>,
}

/// Why a single record was dropped. Carries the derived key when one could
/// be computed, so the cleanup pass can remove the matching vault entry.
struct RecordFailure {
    key: Option<SecretKey>,
    reason: String,
}

impl RecordFailure {
    fn before_key(reason: impl Into<String>) -> Self {
        Self {
            key: None,
            reason: reason.into(),
        }
    }

    fn at_key(key: SecretKey, reason: impl Into<String>) -> Self {
        Self {
            key: Some(key),
            reason: reason.into(),
        }
    }
}

impl RestoreEngine {
    pub fn new(vault: Arc<dyn SecretVault>) -> Self {
        Self { vault }
    }

    /// Convert persisted records into live contexts, in record order.
    ///
    /// Records that cannot be restored (unparseable URI, unknown type,
    /// missing or undecodable secret, bad account id) are logged and
    /// skipped. Every dropped record's vault entry is removed on a
    /// best-effort basis, unless a restored context shares the same key.
    pub fn restore(&self, records: Vec<ContextRecord>) -> Vec<ServerContext> {
        let mut contexts = Vec::with_capacity(records.len());
        let mut live_keys: HashSet<SecretKey> = HashSet::new();
        let mut stale_keys: Vec<SecretKey> = Vec::new();

        for record in &records {
            match self.restore_record(record) {
                Ok((key, context)) => {
                    live_keys.insert(key);
                    contexts.push(context);
                }
                Err(failure) => {
                    warn!("dropping persisted server context: {}", failure.reason);
                    if let Some(key) = failure.key {
                        stale_keys.push(key);
                    }
                }
            }
        }

        for key in stale_keys {
            if live_keys.contains(&key) {
                debug!(key = %key, "skipping vault cleanup; a restored context still uses this key");
                continue;
            }
            if let Err(e) = self.vault.remove(&key) {
                warn!(key = %key, "failed to clean up vault entry: {e}");
            }
        }

        contexts
    }

    fn restore_record(
        &self,
        record: &ContextRecord,
    ) -> Result<(SecretKey, ServerContext), RecordFailure> {
        let raw_uri = record
            .uri
            .as_deref()
            .ok_or_else(|| RecordFailure::before_key("record has no uri"))?;
        let uri =
            parse_server_uri(raw_uri).map_err(|e| RecordFailure::before_key(e.to_string()))?;
        let key = SecretKey::for_server(&uri);

        // Credentials are mandatory; a record without a retrievable,
        // decodable secret is unusable.
        let payload = match self.vault.get(&key) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                return Err(RecordFailure::at_key(
                    key,
                    format!("no stored secret for {raw_uri}"),
                ))
            }
            Err(e) => {
                return Err(RecordFailure::at_key(
                    key,
                    format!("vault read failed for {raw_uri}: {e}"),
                ))
            }
        };
        let auth: AuthenticationInfo = codec::from_json(&payload).map_err(|e| {
            RecordFailure::at_key(key.clone(), format!("undecodable secret for {raw_uri}: {e}"))
        })?;

        let kind = match record.kind.as_deref().map(str::parse::<ContextType>) {
            Some(Ok(kind)) => kind,
            Some(Err(e)) => return Err(RecordFailure::at_key(key, e.to_string())),
            None => {
                return Err(RecordFailure::at_key(
                    key,
                    format!("record for {raw_uri} has no type"),
                ))
            }
        };

        let mut context = match kind {
            ContextType::RemoteHosted => {
                let raw_account = record.account_uuid.as_deref().ok_or_else(|| {
                    RecordFailure::at_key(
                        key.clone(),
                        format!("hosted record for {raw_uri} has no account id"),
                    )
                })?;
                let account = Uuid::parse_str(raw_account).map_err(|_| {
                    RecordFailure::at_key(
                        key.clone(),
                        format!("invalid account id '{raw_account}' for {raw_uri}"),
                    )
                })?;
                ServerContext::remote_hosted(uri, account, auth)
            }
            ContextType::OnPremises => ServerContext::on_premises(uri, auth),
        };

        // Metadata is best-effort: a bad blob loses that field only.
        context.set_collection(codec::decode_field(record.collection_ref_json.as_deref()));
        context.set_project(codec::decode_field(record.project_ref_json.as_deref()));
        context.set_repository(codec::decode_field(record.repo_ref_json.as_deref()));

        Ok((key, context))
    }
}
