//! Common type definitions.

mod auth;
mod context;
mod refs;

pub use auth::AuthenticationInfo;
pub use context::{ContextType, ServerContext};
pub use refs::{CollectionReference, ProjectReference, RepositoryReference};
