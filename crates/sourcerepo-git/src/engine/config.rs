//! Engine configuration.

use std::path::PathBuf;

/// Name and email recorded on commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    /// Author/committer name.
    pub name: String,
    /// Author/committer email.
    pub email: String,
}

impl CommitIdentity {
    /// Creates a new identity.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Default for CommitIdentity {
    fn default() -> Self {
        Self::new("sourcerepo", "sourcerepo@localhost")
    }
}

/// Configuration for [`Libgit2Engine`](super::Libgit2Engine).
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Directory under which scratch repositories are created.
    ///
    /// Defaults to the system temporary directory.
    scratch_dir: Option<PathBuf>,

    /// Identity used when neither the commit options nor Git configuration
    /// provide one.
    default_identity: CommitIdentity,
}

impl EngineConfig {
    /// Creates a new builder for EngineConfig.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Returns the scratch directory, if configured.
    pub fn scratch_dir(&self) -> Option<&PathBuf> {
        self.scratch_dir.as_ref()
    }

    /// Returns the fallback commit identity.
    pub fn default_identity(&self) -> &CommitIdentity {
        &self.default_identity
    }
}

/// Builder for EngineConfig.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    scratch_dir: Option<PathBuf>,
    committer_name: Option<String>,
    committer_email: Option<String>,
}

impl EngineConfigBuilder {
    /// Sets the scratch directory.
    pub fn scratch_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(path.into());
        self
    }

    /// Sets the fallback committer name.
    pub fn committer_name(mut self, name: impl Into<String>) -> Self {
        self.committer_name = Some(name.into());
        self
    }

    /// Sets the fallback committer email.
    pub fn committer_email(mut self, email: impl Into<String>) -> Self {
        self.committer_email = Some(email.into());
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> EngineConfig {
        let fallback = CommitIdentity::default();

        EngineConfig {
            scratch_dir: self.scratch_dir,
            default_identity: CommitIdentity {
                name: self.committer_name.unwrap_or(fallback.name),
                email: self.committer_email.unwrap_or(fallback.email),
            },
        }
    }
}
