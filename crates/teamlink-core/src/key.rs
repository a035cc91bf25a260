//! Secret-key derivation from a server identity.
//!
//! The secret key is the join key between the persisted document and the
//! platform secret vault, so its string form must be stable across process
//! restarts and reproducible from a persisted record alone -- before any
//! live context exists.

use std::fmt;

use url::Url;

use crate::error::Error;
use crate::types::ServerContext;

/// Parse and validate a server URI from its persisted string form.
///
/// The URI must be absolute and carry a host; anything else fails the
/// record it came from.
pub fn parse_server_uri(raw: &str) -> Result<Url, Error> {
    let url = Url::parse(raw).map_err(|e| Error::InvalidUri {
        uri: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.host_str().is_none() {
        return Err(Error::InvalidUri {
            uri: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(url)
}

/// Deterministic vault address for one server's credentials.
///
/// Derived from the normalized base of the server URI: scheme and lowercase
/// host, plus the port only when it differs from the scheme default. Path,
/// query, and fragment are ignored so every collection URI under the same
/// server maps to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretKey(String);

impl SecretKey {
    /// Derive the key for a server URI.
    pub fn for_server(uri: &Url) -> Self {
        // Url normalizes scheme and registered-name hosts to lowercase.
        let mut key = format!("{}://{}", uri.scheme(), uri.host_str().unwrap_or_default());
        if let Some(port) = uri.port() {
            key.push(':');
            key.push_str(&port.to_string());
        }
        Self(key)
    }

    /// Derive the key for a live context.
    pub fn for_context(context: &ServerContext) -> Self {
        Self::for_server(context.uri())
    }

    /// The stable string form used to address the vault.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
