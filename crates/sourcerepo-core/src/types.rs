//! Common type definitions and newtypes for the bootstrapper.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host serving Cloud Source Repositories over SSH.
pub const SOURCE_REPO_HOST: &str = "source.developers.google.com";

/// SSH port used by [`SOURCE_REPO_HOST`].
pub const SOURCE_REPO_PORT: u16 = 2022;

/// Hosting project identifier.
///
/// # Example
///
/// ```
/// use sourcerepo_core::Project;
///
/// let project = Project::new("acme-infra");
/// assert_eq!(project.as_str(), "acme-infra");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Project(String);

impl Project {
    /// Creates a new Project identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the project identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Project {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Project {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Name of the remote repository.
///
/// Doubles as the name of the remote registered on the scratch working copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoName(String);

impl RepoName {
    /// Creates a new RepoName.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the repository name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RepoName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RepoName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// SSH identity used to authenticate against the remote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Creates a new Username.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Username {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Username {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// SSH URL of a hosted repository.
///
/// Built deterministically from the project and repository name, and used
/// both as the remote URL and as the stable identifier of a bootstrap result.
///
/// # Example
///
/// ```
/// use sourcerepo_core::{Project, RepoName, RepositoryEndpoint};
///
/// let endpoint = RepositoryEndpoint::new(&Project::new("acme"), &RepoName::new("infra"));
/// assert_eq!(
///     endpoint.as_str(),
///     "ssh://source.developers.google.com:2022/p/acme/r/infra"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryEndpoint(String);

impl RepositoryEndpoint {
    /// Builds the endpoint for a repository within a project.
    pub fn new(project: &Project, repo_name: &RepoName) -> Self {
        Self(format!(
            "ssh://{}:{}/p/{}/r/{}",
            SOURCE_REPO_HOST, SOURCE_REPO_PORT, project, repo_name
        ))
    }

    /// Returns the endpoint URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RepositoryEndpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
