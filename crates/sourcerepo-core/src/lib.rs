//! Sourcerepo Core - Domain types
//!
//! This crate provides the foundational types for the source repository
//! bootstrapper: the request, the derived endpoint, private key resolution
//! and the terminal status reported back to the caller.

pub mod credentials;
pub mod error;
pub mod request;
pub mod result;
pub mod types;

pub use credentials::{KeySource, PrivateKey, ServiceAccountKey, resolve_private_key};
pub use error::{BootstrapError, Result};
pub use request::{BootstrapRequest, BootstrapRequestBuilder};
pub use result::{BootstrapResult, BootstrapStatus};
pub use types::{Project, RepoName, RepositoryEndpoint, Username};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
