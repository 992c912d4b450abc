//! Version-control capability interface.
//!
//! The bootstrapper only talks to the remote through these traits, which
//! keeps the state machine independent of the Git implementation behind it.

mod config;
mod libgit2;

pub use config::{CommitIdentity, EngineConfig, EngineConfigBuilder};
pub use libgit2::{EphemeralWorkingCopy, Libgit2Engine, Libgit2Worktree};

use crate::auth::SshCredential;
use crate::error::VcsError;

/// Result of fetching from a remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The remote has branches and they were fetched.
    Fetched,
    /// The remote exists but has no branches yet.
    EmptyRemote,
}

/// Author/committer options for a commit.
///
/// With no identity the engine falls back to its own default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOptions {
    /// Identity recorded as both author and committer.
    pub identity: Option<CommitIdentity>,
}

/// Factory for call-scoped working copies.
///
/// # Example
///
/// ```ignore
/// use sourcerepo_git::{Libgit2Engine, EngineConfig, VcsEngine, WorkingCopy};
///
/// let engine = Libgit2Engine::new(EngineConfig::default());
/// let mut copy = engine.init()?;
/// copy.add_remote("infra", "ssh://source.developers.google.com:2022/p/acme/r/infra")?;
/// ```
pub trait VcsEngine {
    /// Working copy produced by [`VcsEngine::init`].
    type WorkingCopy: WorkingCopy;

    /// Creates an empty local repository backed by fresh scratch storage.
    fn init(&self) -> Result<Self::WorkingCopy, VcsError>;

    /// Clones `url` into throwaway storage to prove it is reachable.
    fn clone_verify(&self, url: &str, credential: &SshCredential) -> Result<(), VcsError>;
}

/// An ephemeral local repository with a working tree.
pub trait WorkingCopy {
    /// Handle used to stage and commit.
    type Worktree: Worktree;

    /// Registers `url` under the remote name `name`.
    fn add_remote(&mut self, name: &str, url: &str) -> Result<(), VcsError>;

    /// Fetches from the named remote.
    ///
    /// An empty remote is reported as [`FetchOutcome::EmptyRemote`], not as
    /// an error.
    fn fetch(&mut self, remote: &str, credential: &SshCredential)
    -> Result<FetchOutcome, VcsError>;

    /// Writes a file at `path`, relative to the working tree root.
    fn create_file(&mut self, path: &str, contents: &[u8]) -> Result<(), VcsError>;

    /// Returns the working tree handle.
    fn worktree(&self) -> Result<Self::Worktree, VcsError>;

    /// Pushes the current branch to the named remote.
    fn push(&mut self, remote: &str, credential: &SshCredential) -> Result<(), VcsError>;
}

/// Staging area and commit operations.
pub trait Worktree {
    /// Stages the file at `path`.
    fn add(&mut self, path: &str) -> Result<(), VcsError>;

    /// Commits the staged changes and returns the new commit id.
    fn commit(&mut self, message: &str, options: &CommitOptions) -> Result<String, VcsError>;
}
