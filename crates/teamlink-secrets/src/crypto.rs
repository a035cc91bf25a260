//! AES-256-GCM sealing with HKDF-SHA256 key derivation.
//!
//! Each entry is sealed under a key derived from the master key and a
//! per-entry random salt; the master key is never used directly as a cipher
//! key. The salt and nonce are carried inside the sealed blob so callers
//! only handle a single opaque byte string.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;

use crate::error::{Result, VaultError};

const SALT_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// HKDF info string; domain-separates vault keys from any other use of the
/// master key.
const HKDF_INFO: &[u8] = b"teamlink-vault-v1";

/// Derive the per-entry cipher key.
fn entry_key(master_key: &[u8], salt: &[u8]) -> [u8; KEY_LEN] {
    let hk = Hkdf::<Sha256>::new(Some(salt), master_key);
    let mut okm = [0u8; KEY_LEN];
    // expand cannot fail when output length <= 255 * hash-length
    hk.expand(HKDF_INFO, &mut okm)
        .expect("HKDF expand should not fail for 32-byte output");
    okm
}

/// Seal `plaintext`, producing a `salt || nonce || ciphertext+tag` blob.
///
/// A fresh salt and nonce are drawn per call, so sealing the same plaintext
/// twice yields different blobs.
pub fn seal(master_key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);

    let key = entry_key(master_key, &salt);
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;

    let mut blob = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Open a blob previously produced by [`seal`].
pub fn open(master_key: &[u8], blob: &[u8]) -> Result<Vec<u8>> {
    if blob.len() < SALT_LEN + NONCE_LEN {
        return Err(VaultError::DecryptionFailed("blob too short".to_string()));
    }
    let (salt, rest) = blob.split_at(SALT_LEN);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

    let key = entry_key(master_key, salt);
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| VaultError::DecryptionFailed(e.to_string()))?;
    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|e| VaultError::DecryptionFailed(e.to_string()))
}

/// Generate a fresh random 256-bit master key.
pub fn generate_master_key() -> Vec<u8> {
    let mut key = vec![0u8; KEY_LEN];
    rand::thread_rng().fill_bytes(&mut key);
    key
}
