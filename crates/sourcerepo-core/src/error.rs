//! Error types for the bootstrapper.
//!
//! Only a handful of conditions are allowed to abort a bootstrap call:
//! credential decoding, SSH credential construction and request validation.
//! Everything that goes wrong while talking to the remote repository is
//! recorded in the [`BootstrapStatus`](crate::BootstrapStatus) instead.
//!
//! # Example
//!
//! ```
//! use sourcerepo_core::{BootstrapError, Result};
//!
//! fn check_project(project: &str) -> Result<()> {
//!     if project.is_empty() {
//!         return Err(BootstrapError::invalid_request("project", "cannot be empty"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_project("").is_err());
//! ```

use thiserror::Error;

/// Fatal errors that abort a bootstrap call.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The base64 key blob could not be decoded.
    #[error("Failed to B64 decode PrivateKey: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The SSH credential could not be constructed from the resolved key.
    #[error("Failed to create SSH Key for {username}: {reason}")]
    Auth {
        /// Identity the credential was being built for
        username: String,
        /// Why the key was rejected
        reason: String,
    },

    /// A required request field is missing or invalid.
    #[error("Invalid request field '{field}': {reason}")]
    InvalidRequest {
        /// Field that failed validation
        field: String,
        /// Description of the validation failure
        reason: String,
    },
}

impl BootstrapError {
    /// Creates an Auth error.
    pub fn auth(username: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Auth {
            username: username.into(),
            reason: reason.into(),
        }
    }

    /// Creates an InvalidRequest error.
    pub fn invalid_request(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the key blob failed to decode.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Returns true if the SSH credential was rejected.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

/// Type alias for Results with BootstrapError.
pub type Result<T> = std::result::Result<T, BootstrapError>;
