//! Encrypted file-backed vault.
//!
//! Each entry lives in its own JSON file under `~/.teamlink/secrets/`,
//! named by the SHA-256 of the service id and key so arbitrary key strings
//! (server URIs) never reach the filesystem. Payloads are sealed with the
//! vault master key; files are created with mode 0600 on Unix.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use teamlink_core::SecretKey;

use crate::crypto;
use crate::error::{Result, VaultError};
use crate::vault::{SecretVault, SERVICE_ID};

/// On-disk representation of one vault entry.
#[derive(Debug, Serialize, Deserialize)]
struct VaultEntry {
    /// The key this entry belongs to, for diagnostics. The key is a server
    /// address, not a secret.
    key: String,
    /// Sealed payload, base64-encoded.
    sealed: String,
    /// When the entry was last written.
    updated_at: DateTime<Utc>,
}

/// A file-system-backed secret vault.
pub struct FileVault {
    base_dir: PathBuf,
    master_key: Vec<u8>,
}

impl FileVault {
    /// Create a vault rooted at `base_dir` using the provided master key.
    pub fn new(base_dir: PathBuf, master_key: Vec<u8>) -> Self {
        Self {
            base_dir,
            master_key,
        }
    }

    /// Open the default vault (`~/.teamlink/secrets/`) with the master key
    /// resolved via [`crate::keychain::master_key`].
    pub fn open_default() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| VaultError::Storage("could not determine home directory".to_string()))?;
        let base_dir = home.join(".teamlink").join("secrets");
        let master_key = crate::keychain::master_key()?;
        Ok(Self::new(base_dir, master_key))
    }

    /// Resolve the file path for a key.
    fn entry_path(&self, key: &SecretKey) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(SERVICE_ID.as_bytes());
        hasher.update(b"|");
        hasher.update(key.as_str().as_bytes());
        let digest = hex::encode(hasher.finalize());
        self.base_dir.join(format!("{digest}.json"))
    }

    /// Ensure the vault directory exists with restrictive permissions.
    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.base_dir, fs::Permissions::from_mode(0o700))?;
        }

        Ok(())
    }
}

/// Write `data` to `path` with mode 0600 on Unix.
fn write_entry_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

impl SecretVault for FileVault {
    fn set(&self, key: &SecretKey, value: &str) -> Result<()> {
        self.ensure_dir()?;

        let sealed = crypto::seal(&self.master_key, value.as_bytes())?;
        let entry = VaultEntry {
            key: key.as_str().to_string(),
            sealed: base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &sealed),
            updated_at: Utc::now(),
        };

        let path = self.entry_path(key);
        debug!(key = %key, path = %path.display(), "writing vault entry");
        write_entry_file(&path, serde_json::to_string_pretty(&entry)?.as_bytes())
    }

    fn get(&self, key: &SecretKey) -> Result<Option<String>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(&path)?;
        let entry: VaultEntry = serde_json::from_str(&data)
            .map_err(|e| VaultError::CorruptEntry(format!("{}: {e}", path.display())))?;
        let sealed =
            base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &entry.sealed)
                .map_err(|e| VaultError::CorruptEntry(format!("bad base64: {e}")))?;
        let plaintext = crypto::open(&self.master_key, &sealed)?;
        let value = String::from_utf8(plaintext)
            .map_err(|e| VaultError::DecryptionFailed(format!("invalid UTF-8: {e}")))?;
        Ok(Some(value))
    }

    fn remove(&self, key: &SecretKey) -> Result<()> {
        let path = self.entry_path(key);
        if !path.exists() {
            // Idempotent: nothing stored, nothing to do.
            return Ok(());
        }
        debug!(key = %key, path = %path.display(), "removing vault entry");
        fs::remove_file(&path)?;
        Ok(())
    }
}
