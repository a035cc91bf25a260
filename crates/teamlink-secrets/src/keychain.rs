//! Master key resolution for the file-backed vault.
//!
//! Resolution order:
//! 1. `TEAMLINK_MASTER_KEY` environment variable (hex-encoded 32 bytes)
//! 2. OS keychain (macOS Keychain via Security.framework)
//! 3. Generate a new key and store it in the keychain
//!
//! On platforms without a keychain backend only the environment variable is
//! durable; a generated key is returned with a warning that it cannot be
//! persisted.

use tracing::debug;
#[cfg(not(target_os = "macos"))]
use tracing::warn;

use crate::crypto;
use crate::error::{Result, VaultError};

const SERVICE_NAME: &str = "teamlink";
const ACCOUNT_NAME: &str = "vault_master_key";

/// Environment variable holding a hex-encoded master key.
const ENV_VAR: &str = "TEAMLINK_MASTER_KEY";

/// Resolve the vault master key, creating one if none exists yet.
pub fn master_key() -> Result<Vec<u8>> {
    if let Ok(hex_key) = std::env::var(ENV_VAR) {
        debug!("using vault master key from environment variable");
        return decode_key(hex_key.trim())
            .map_err(|e| VaultError::Keychain(format!("invalid {ENV_VAR}: {e}")));
    }

    if let Some(key) = keychain_get()? {
        debug!("using vault master key from OS keychain");
        return Ok(key);
    }

    debug!("generating new vault master key");
    let key = crypto::generate_master_key();
    keychain_set(&key)?;
    Ok(key)
}

/// Remove the master key from the OS keychain (reset workflows).
pub fn forget_master_key() -> Result<()> {
    keychain_delete()
}

fn decode_key(hex_str: &str) -> std::result::Result<Vec<u8>, String> {
    let key = hex::decode(hex_str).map_err(|e| e.to_string())?;
    if key.len() != 32 {
        return Err(format!("expected 32 bytes, got {}", key.len()));
    }
    Ok(key)
}

// ---------------------------------------------------------------------------
// macOS keychain implementation
// ---------------------------------------------------------------------------

#[cfg(target_os = "macos")]
fn keychain_get() -> Result<Option<Vec<u8>>> {
    use security_framework::passwords::get_generic_password;

    match get_generic_password(SERVICE_NAME, ACCOUNT_NAME) {
        Ok(data) => {
            let hex_str = String::from_utf8(data.to_vec())
                .map_err(|e| VaultError::Keychain(format!("keychain data not UTF-8: {e}")))?;
            decode_key(hex_str.trim())
                .map(Some)
                .map_err(|e| VaultError::Keychain(format!("bad keychain entry: {e}")))
        }
        Err(e) => {
            // errSecItemNotFound is the expected "not stored yet" case.
            let msg = e.to_string();
            if msg.contains("not found") || msg.contains("-25300") {
                Ok(None)
            } else {
                Err(VaultError::Keychain(format!("keychain read failed: {e}")))
            }
        }
    }
}

#[cfg(target_os = "macos")]
fn keychain_set(key: &[u8]) -> Result<()> {
    use security_framework::passwords::set_generic_password;

    set_generic_password(SERVICE_NAME, ACCOUNT_NAME, hex::encode(key).as_bytes())
        .map_err(|e| VaultError::Keychain(format!("keychain write failed: {e}")))
}

#[cfg(target_os = "macos")]
fn keychain_delete() -> Result<()> {
    use security_framework::passwords::delete_generic_password;

    match delete_generic_password(SERVICE_NAME, ACCOUNT_NAME) {
        Ok(()) => Ok(()),
        Err(e) => {
            let msg = e.to_string();
            if msg.contains("not found") || msg.contains("-25300") {
                Ok(())
            } else {
                Err(VaultError::Keychain(format!("keychain delete failed: {e}")))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Other platforms -- env-var-only
// ---------------------------------------------------------------------------

#[cfg(not(target_os = "macos"))]
fn keychain_get() -> Result<Option<Vec<u8>>> {
    warn!("OS keychain not available on this platform; use {ENV_VAR} env var");
    Ok(None)
}

#[cfg(not(target_os = "macos"))]
fn keychain_set(_key: &[u8]) -> Result<()> {
    warn!(
        "OS keychain not available on this platform; vault master key cannot be \
         persisted. Set {ENV_VAR} to reuse this key across restarts."
    );
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn keychain_delete() -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_key_valid() {
        let key = crypto::generate_master_key();
        assert_eq!(decode_key(&hex::encode(&key)).unwrap(), key);
    }

    #[test]
    fn test_decode_key_invalid_hex() {
        assert!(decode_key("zz-not-hex").is_err());
    }

    #[test]
    fn test_decode_key_wrong_length() {
        assert!(decode_key(&hex::encode([0u8; 16])).is_err());
    }
}
