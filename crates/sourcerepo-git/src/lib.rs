//! # Sourcerepo Git
//!
//! Bootstraps hosted Git repositories over SSH.
//!
//! Given a [`BootstrapRequest`](sourcerepo_core::BootstrapRequest), the
//! [`Bootstrapper`] authenticates, checks whether the remote repository has
//! any history, pushes a placeholder commit into it when it is empty, and
//! re-clones it when it is not. The outcome is always a status string and a
//! stable identifier; only credential problems abort the call.
//!
//! ## Features
//!
//! - SSH public-key authentication with in-memory keys
//! - Call-scoped scratch working copies, removed when the call ends
//! - Typed empty-remote detection
//! - A capability trait ([`VcsEngine`]) so the state machine can run against
//!   any Git implementation
//!
//! ## Example
//!
//! ```ignore
//! use sourcerepo_core::BootstrapRequest;
//! use sourcerepo_git::{Bootstrapper, EngineConfig, Libgit2Engine};
//!
//! let request = BootstrapRequest::builder()
//!     .project("acme-infra")
//!     .repo_name("platform-config")
//!     .username("deployer@acme-infra.iam.gserviceaccount.com")
//!     .private_key_b64(std::env::var("SA_KEY_B64")?)
//!     .build()?;
//!
//! let bootstrapper = Bootstrapper::new(Libgit2Engine::new(EngineConfig::default()));
//! let result = bootstrapper.run(&request)?;
//! println!("{} -> {}", result.id(), result.status());
//! ```

pub mod auth;
pub mod bootstrap;
pub mod engine;
pub mod error;

// Re-exports
pub use auth::SshCredential;
pub use bootstrap::{
    Bootstrapper, PLACEHOLDER_FILE, PLACEHOLDER_MESSAGE, placeholder_contents,
};
pub use engine::{
    CommitIdentity, CommitOptions, EngineConfig, EngineConfigBuilder, EphemeralWorkingCopy,
    FetchOutcome, Libgit2Engine, Libgit2Worktree, VcsEngine, WorkingCopy, Worktree,
};
pub use error::VcsError;

// Re-export sourcerepo_core for consumers
pub use sourcerepo_core;
