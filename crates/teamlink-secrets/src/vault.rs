//! The vault interface and the in-memory backend.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use teamlink_core::SecretKey;

use crate::error::Result;

/// Constant identifying this subsystem's entries inside a shared vault.
pub const SERVICE_ID: &str = "teamlink";

/// A platform secret vault, addressed by derived [`SecretKey`]s.
///
/// Implementations must be safe for concurrent writes to distinct keys;
/// writes to the same key are last-write-wins. `remove` is idempotent:
/// removing an absent key succeeds.
pub trait SecretVault: Send + Sync {
    /// Store a payload under the given key, replacing any previous value.
    fn set(&self, key: &SecretKey, value: &str) -> Result<()>;

    /// Retrieve the payload for a key, or `None` if nothing is stored.
    fn get(&self, key: &SecretKey) -> Result<Option<String>>;

    /// Remove the entry for a key. Absent keys are not an error.
    fn remove(&self, key: &SecretKey) -> Result<()>;
}

/// In-memory vault for tests and harnesses that never wire up a host.
///
/// Payloads are held as plaintext and vanish with the process; nothing
/// here is durable.
#[derive(Default)]
pub struct MemoryVault {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries; handy in tests.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SecretVault for MemoryVault {
    fn set(&self, key: &SecretKey, value: &str) -> Result<()> {
        debug!(key = %key, "storing in-memory secret");
        self.entries
            .write()
            .insert(key.as_str().to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &SecretKey) -> Result<Option<String>> {
        Ok(self.entries.read().get(key.as_str()).cloned())
    }

    fn remove(&self, key: &SecretKey) -> Result<()> {
        debug!(key = %key, "removing in-memory secret");
        self.entries.write().remove(key.as_str());
        Ok(())
    }
}
