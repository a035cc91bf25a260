//! Live server context.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::key::SecretKey;
use crate::types::{
    AuthenticationInfo, CollectionReference, ProjectReference, RepositoryReference,
};

/// Which flavor of server a context points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContextType {
    /// Hosted service; identified by a server URI plus an account id.
    RemoteHosted,

    /// Self-hosted server; identified by the server URI alone.
    OnPremises,
}

impl ContextType {
    /// Stable string form used in the persisted document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RemoteHosted => "RemoteHosted",
            Self::OnPremises => "OnPremises",
        }
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextType {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RemoteHosted" => Ok(Self::RemoteHosted),
            "OnPremises" => Ok(Self::OnPremises),
            other => Err(crate::error::Error::UnknownContextType(other.to_string())),
        }
    }
}

/// An active connection to a remote server.
///
/// Identified by `(kind, uri)`. The account id is present only for
/// [`ContextType::RemoteHosted`] contexts. The three metadata references
/// describe where on the server the connection points; any of them may be
/// absent. Credentials live in [`AuthenticationInfo`] and are persisted
/// separately from the rest of the context, via the secret vault.
#[derive(Debug, Clone)]
pub struct ServerContext {
    kind: ContextType,
    uri: Url,
    account_id: Option<Uuid>,
    auth: AuthenticationInfo,
    collection: Option<CollectionReference>,
    project: Option<ProjectReference>,
    repository: Option<RepositoryReference>,
}

impl ServerContext {
    /// Create a context for a hosted service account.
    pub fn remote_hosted(uri: Url, account_id: Uuid, auth: AuthenticationInfo) -> Self {
        Self {
            kind: ContextType::RemoteHosted,
            uri,
            account_id: Some(account_id),
            auth,
            collection: None,
            project: None,
            repository: None,
        }
    }

    /// Create a context for a self-hosted server.
    pub fn on_premises(uri: Url, auth: AuthenticationInfo) -> Self {
        Self {
            kind: ContextType::OnPremises,
            uri,
            account_id: None,
            auth,
            collection: None,
            project: None,
            repository: None,
        }
    }

    pub fn kind(&self) -> ContextType {
        self.kind
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn account_id(&self) -> Option<Uuid> {
        self.account_id
    }

    pub fn auth(&self) -> &AuthenticationInfo {
        &self.auth
    }

    /// Replace the credentials, e.g. after a re-authentication flow.
    pub fn set_auth(&mut self, auth: AuthenticationInfo) {
        self.auth = auth;
    }

    pub fn collection(&self) -> Option<&CollectionReference> {
        self.collection.as_ref()
    }

    pub fn set_collection(&mut self, collection: Option<CollectionReference>) {
        self.collection = collection;
    }

    pub fn project(&self) -> Option<&ProjectReference> {
        self.project.as_ref()
    }

    pub fn set_project(&mut self, project: Option<ProjectReference>) {
        self.project = project;
    }

    pub fn repository(&self) -> Option<&RepositoryReference> {
        self.repository.as_ref()
    }

    pub fn set_repository(&mut self, repository: Option<RepositoryReference>) {
        self.repository = repository;
    }

    /// The vault address for this context's credentials.
    pub fn secret_key(&self) -> SecretKey {
        SecretKey::for_context(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthenticationInfo {
        AuthenticationInfo::new("jdoe", "token", "https://dev.example.com", "John Doe")
    }

    #[test]
    fn test_context_type_round_trip() {
        for kind in [ContextType::RemoteHosted, ContextType::OnPremises] {
            assert_eq!(kind.as_str().parse::<ContextType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_context_type_unknown() {
        assert!("Hosted".parse::<ContextType>().is_err());
        assert!("".parse::<ContextType>().is_err());
    }

    #[test]
    fn test_remote_hosted_carries_account() {
        let uri = Url::parse("https://dev.example.com").unwrap();
        let account = Uuid::new_v4();
        let ctx = ServerContext::remote_hosted(uri, account, auth());
        assert_eq!(ctx.kind(), ContextType::RemoteHosted);
        assert_eq!(ctx.account_id(), Some(account));
    }

    #[test]
    fn test_on_premises_has_no_account() {
        let uri = Url::parse("https://tfs.example.com/tfs").unwrap();
        let ctx = ServerContext::on_premises(uri, auth());
        assert_eq!(ctx.kind(), ContextType::OnPremises);
        assert!(ctx.account_id().is_none());
    }

    #[test]
    fn test_metadata_setters() {
        let uri = Url::parse("https://tfs.example.com/tfs").unwrap();
        let mut ctx = ServerContext::on_premises(uri, auth());
        assert!(ctx.project().is_none());

        ctx.set_project(Some(ProjectReference {
            name: Some("Platform".to_string()),
            ..Default::default()
        }));
        assert_eq!(
            ctx.project().and_then(|p| p.name.as_deref()),
            Some("Platform")
        );

        ctx.set_project(None);
        assert!(ctx.project().is_none());
    }

    #[test]
    fn test_secret_key_matches_server_derivation() {
        let uri = Url::parse("https://tfs.example.com/DefaultCollection").unwrap();
        let ctx = ServerContext::on_premises(uri.clone(), auth());
        assert_eq!(ctx.secret_key(), SecretKey::for_server(&uri));
    }
}
