//! Credential bundle attached to a server context.

use serde::{Deserialize, Serialize};

use crate::secret::SecretString;

/// The credentials for one server connection.
///
/// This is an opaque encode/decode unit: the persistence layer serializes
/// the whole bundle into the secret vault and restores it verbatim, without
/// ever inspecting individual fields. The `password` field holds whatever
/// the authentication flow produced -- a password, a personal access token,
/// or an OAuth token -- and is redacted from all log output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationInfo {
    /// Account the credential belongs to.
    pub user_name: String,

    /// The credential itself; zeroed on drop.
    pub password: SecretString,

    /// Server the credential was issued for.
    pub server_uri: String,

    /// Friendly name shown in connection UIs.
    pub display_name: String,
}

impl AuthenticationInfo {
    /// Build a credential bundle.
    pub fn new(
        user_name: impl Into<String>,
        password: impl Into<SecretString>,
        server_uri: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
            server_uri: server_uri.into(),
            display_name: display_name.into(),
        }
    }
}
