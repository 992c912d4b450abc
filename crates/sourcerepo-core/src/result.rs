//! Bootstrap outcome types.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::types::RepositoryEndpoint;

/// Terminal state reached by a bootstrap call.
///
/// Failure variants hold the endpoint and the rendered cause so the status
/// phrase can be produced without access to the underlying error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapStatus {
    /// The remote is non-empty and was fetched and cloned.
    Fetched,
    /// The remote was empty and now holds the placeholder commit.
    Pushed,
    /// The scratch repository could not be created.
    InitFailed { endpoint: String, error: String },
    /// The remote could not be registered.
    RemoteFailed { endpoint: String, error: String },
    /// The fetch failed for a reason other than an empty remote.
    FetchFailed {
        endpoint: String,
        kind: String,
        error: String,
    },
    /// The placeholder file could not be written.
    ReadmeCreateFailed { endpoint: String, error: String },
    /// The working tree could not be obtained.
    WorktreeFailed { endpoint: String, error: String },
    /// Staging or committing the placeholder failed.
    CommitFailed { endpoint: String, error: String },
    /// The placeholder commit could not be pushed.
    PushFailed { endpoint: String, error: String },
    /// The post-fetch clone check failed.
    CloneFailed { endpoint: String, error: String },
}

impl BootstrapStatus {
    /// Short token naming the terminal state.
    pub fn step(&self) -> &'static str {
        match self {
            Self::Fetched => "fetched",
            Self::Pushed => "pushed",
            Self::InitFailed { .. } => "init-failed",
            Self::RemoteFailed { .. } => "remote-failed",
            Self::FetchFailed { .. } => "fetch-failed",
            Self::ReadmeCreateFailed { .. } => "readme-create-failed",
            Self::WorktreeFailed { .. } => "worktree-failed",
            Self::CommitFailed { .. } => "commit-failed",
            Self::PushFailed { .. } => "push-failed",
            Self::CloneFailed { .. } => "clone-failed",
        }
    }

    /// Returns true for the two converged states.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Fetched | Self::Pushed)
    }
}

impl fmt::Display for BootstrapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetched => f.write_str("fetched"),
            Self::Pushed => f.write_str("pushed"),
            Self::InitFailed { endpoint, error } => {
                write!(f, "Failed to init local repo [{}]: {}", endpoint, error)
            },
            Self::RemoteFailed { endpoint, error } => {
                write!(f, "Failed to Create Remote, repo [{}]: {}", endpoint, error)
            },
            Self::FetchFailed {
                endpoint,
                kind,
                error,
            } => write!(
                f,
                "Failed to Fetch from remote repo [{}]: {}, {}",
                endpoint, kind, error
            ),
            Self::ReadmeCreateFailed { endpoint, error } => write!(
                f,
                "Failed to Create placeholder Readme for [{}]: {}",
                endpoint, error
            ),
            Self::WorktreeFailed { endpoint, error } => {
                write!(f, "Failed to retrieve Worktree for [{}]: {}", endpoint, error)
            },
            Self::CommitFailed { endpoint, error } => write!(
                f,
                "Failed to commit placeholder Readme for [{}]: {}",
                endpoint, error
            ),
            Self::PushFailed { endpoint, error } => {
                write!(f, "Failed to Push to bare repo [{}]: {}", endpoint, error)
            },
            Self::CloneFailed { endpoint, error } => {
                write!(f, "Failed to clone repo [{}]: {}", endpoint, error)
            },
        }
    }
}

/// Output of a bootstrap call.
///
/// The identifier is the endpoint regardless of which terminal state was
/// reached. Serializes as `{"id": ..., "status": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapResult {
    id: RepositoryEndpoint,
    status: BootstrapStatus,
}

impl BootstrapResult {
    /// Creates a result for the given endpoint.
    pub fn new(id: RepositoryEndpoint, status: BootstrapStatus) -> Self {
        Self { id, status }
    }

    /// Returns the stable identifier (the endpoint URL).
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the endpoint.
    pub fn endpoint(&self) -> &RepositoryEndpoint {
        &self.id
    }

    /// Returns the typed terminal state.
    pub fn outcome(&self) -> &BootstrapStatus {
        &self.status
    }

    /// Returns the human-readable status phrase.
    pub fn status(&self) -> String {
        self.status.to_string()
    }
}

impl Serialize for BootstrapResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("BootstrapResult", 2)?;
        state.serialize_field("id", self.id.as_str())?;
        state.serialize_field("status", &self.status.to_string())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "ssh://source.developers.google.com:2022/p/acme/r/infra";

    fn endpoint() -> RepositoryEndpoint {
        RepositoryEndpoint::new(&"acme".into(), &"infra".into())
    }

    #[test]
    fn test_success_phrases() {
        assert_eq!(BootstrapStatus::Fetched.to_string(), "fetched");
        assert_eq!(BootstrapStatus::Pushed.to_string(), "pushed");
        assert!(BootstrapStatus::Pushed.is_success());
    }

    #[test]
    fn test_failure_phrases_carry_endpoint() {
        let failures = vec![
            BootstrapStatus::InitFailed {
                endpoint: URL.into(),
                error: "boom".into(),
            },
            BootstrapStatus::RemoteFailed {
                endpoint: URL.into(),
                error: "boom".into(),
            },
            BootstrapStatus::FetchFailed {
                endpoint: URL.into(),
                kind: "transport".into(),
                error: "boom".into(),
            },
            BootstrapStatus::ReadmeCreateFailed {
                endpoint: URL.into(),
                error: "boom".into(),
            },
            BootstrapStatus::WorktreeFailed {
                endpoint: URL.into(),
                error: "boom".into(),
            },
            BootstrapStatus::CommitFailed {
                endpoint: URL.into(),
                error: "boom".into(),
            },
            BootstrapStatus::PushFailed {
                endpoint: URL.into(),
                error: "boom".into(),
            },
            BootstrapStatus::CloneFailed {
                endpoint: URL.into(),
                error: "boom".into(),
            },
        ];

        for status in failures {
            let phrase = status.to_string();
            assert!(!status.is_success());
            assert!(phrase.contains(URL), "{} lacks endpoint", status.step());
            assert!(phrase.ends_with("boom"));
        }
    }

    #[test]
    fn test_fetch_failed_names_error_kind() {
        let status = BootstrapStatus::FetchFailed {
            endpoint: URL.into(),
            kind: "auth".into(),
            error: "permission denied".into(),
        };
        assert_eq!(
            status.to_string(),
            format!("Failed to Fetch from remote repo [{}]: auth, permission denied", URL)
        );
    }

    #[test]
    fn test_result_serialization() {
        let result = BootstrapResult::new(endpoint(), BootstrapStatus::Pushed);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["id"], URL);
        assert_eq!(json["status"], "pushed");
        assert_eq!(result.id(), URL);
    }
}
