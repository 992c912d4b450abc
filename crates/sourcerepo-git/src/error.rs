//! Error types for version-control operations.

/// Errors raised by a [`VcsEngine`](crate::VcsEngine) implementation.
///
/// None of these abort a bootstrap call; the bootstrapper folds them into
/// the reported status.
#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    /// A generic Git operation failed.
    #[error("git error: {0}")]
    Git(String),

    /// An I/O error occurred in the scratch working copy.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The remote could not be reached or the connection broke.
    #[error("transport error: {reason}")]
    Transport { reason: String },

    /// The remote refused the supplied credential.
    #[error("authentication failed: {reason}")]
    Auth { reason: String },

    /// The remote rejected a pushed reference.
    #[error("push of {refname} rejected: {reason}")]
    Rejected { refname: String, reason: String },

    /// A required object, reference or remote does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The working copy has no working tree.
    #[error("repository has no working tree")]
    NoWorktree,
}

impl VcsError {
    /// Creates a new Git error.
    pub fn git(msg: impl Into<String>) -> Self {
        Self::Git(msg.into())
    }

    /// Creates a new transport error.
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Creates a new push rejection error.
    pub fn rejected(refname: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            refname: refname.into(),
            reason: reason.into(),
        }
    }

    /// Short name of the error class, used in status phrases.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Git(_) => "git",
            Self::Io(_) => "io",
            Self::Transport { .. } => "transport",
            Self::Auth { .. } => "auth",
            Self::Rejected { .. } => "rejected",
            Self::NotFound(_) => "not-found",
            Self::NoWorktree => "no-worktree",
        }
    }
}

impl From<git2::Error> for VcsError {
    fn from(err: git2::Error) -> Self {
        let message = err.message().to_string();

        if err.code() == git2::ErrorCode::Auth {
            return Self::Auth { reason: message };
        }
        if err.code() == git2::ErrorCode::NotFound {
            return Self::NotFound(message);
        }
        if err.code() == git2::ErrorCode::BareRepo {
            return Self::NoWorktree;
        }

        match err.class() {
            git2::ErrorClass::Net | git2::ErrorClass::Ssh | git2::ErrorClass::Http => {
                Self::Transport { reason: message }
            },
            git2::ErrorClass::Os => Self::Io(std::io::Error::other(message)),
            _ => Self::Git(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VcsError::git("failed to write tree");
        assert_eq!(err.to_string(), "git error: failed to write tree");

        let err = VcsError::rejected("refs/heads/master", "non-fast-forward");
        assert_eq!(
            err.to_string(),
            "push of refs/heads/master rejected: non-fast-forward"
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(VcsError::transport("timed out").kind(), "transport");
        assert_eq!(VcsError::NoWorktree.kind(), "no-worktree");
        assert_eq!(VcsError::NotFound("origin".into()).kind(), "not-found");
    }

    #[test]
    fn test_from_git2_classifies() {
        let err = git2::Error::new(
            git2::ErrorCode::Auth,
            git2::ErrorClass::Ssh,
            "authentication required",
        );
        assert!(matches!(VcsError::from(err), VcsError::Auth { .. }));

        let err = git2::Error::new(
            git2::ErrorCode::GenericError,
            git2::ErrorClass::Net,
            "failed to resolve address",
        );
        assert!(matches!(VcsError::from(err), VcsError::Transport { .. }));

        let err = git2::Error::new(
            git2::ErrorCode::GenericError,
            git2::ErrorClass::Index,
            "invalid path",
        );
        assert!(matches!(VcsError::from(err), VcsError::Git(_)));
    }
}
