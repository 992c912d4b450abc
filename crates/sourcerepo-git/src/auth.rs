//! SSH public-key credentials.

use std::fmt;

use git2::{Cred, CredentialType, RemoteCallbacks};
use sourcerepo_core::{BootstrapError, PrivateKey, Username};
use tracing::debug;

/// An SSH identity with a private key that has been checked to parse.
///
/// The key stays in memory; libgit2 receives it through
/// [`Cred::ssh_key_from_memory`] each time the transport asks for it.
#[derive(Clone)]
pub struct SshCredential {
    username: Username,
    private_key: PrivateKey,
}

impl SshCredential {
    /// Builds a credential for `username`.
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::Auth` if the key is empty or cannot be parsed
    /// as an SSH private key.
    pub fn new(username: &Username, private_key: PrivateKey) -> Result<Self, BootstrapError> {
        if private_key.is_empty() {
            return Err(BootstrapError::auth(
                username.as_str(),
                "private key is empty",
            ));
        }

        russh_keys::decode_secret_key(private_key.expose(), None)
            .map_err(|e| BootstrapError::auth(username.as_str(), e.to_string()))?;

        debug!(
            "SSH credential ready for {} (key from {:?})",
            username,
            private_key.source()
        );

        Ok(Self {
            username: username.clone(),
            private_key,
        })
    }

    /// Returns the SSH username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Produces a libgit2 credential for an authentication challenge.
    ///
    /// A username embedded in the URL takes precedence over the configured
    /// one, matching what an SSH client would send.
    pub fn to_git2(
        &self,
        username_from_url: Option<&str>,
        allowed: CredentialType,
    ) -> Result<Cred, git2::Error> {
        let user = username_from_url.unwrap_or(self.username.as_str());

        if allowed.contains(CredentialType::USERNAME) {
            return Cred::username(user);
        }
        if allowed.contains(CredentialType::SSH_KEY) {
            return Cred::ssh_key_from_memory(user, None, self.private_key.expose(), None);
        }

        Err(git2::Error::new(
            git2::ErrorCode::Auth,
            git2::ErrorClass::Callback,
            format!("remote requested unsupported credential types {:?}", allowed),
        ))
    }

    /// Builds remote callbacks that answer credential challenges with this
    /// key.
    ///
    /// libgit2 re-invokes the callback after a rejected attempt, so a bounded
    /// number of attempts stops it from looping forever on a bad key.
    pub fn remote_callbacks(&self) -> RemoteCallbacks<'_> {
        let mut attempts = 0u8;
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(move |_url, username_from_url, allowed| {
            attempts += 1;
            if attempts > MAX_CREDENTIAL_ATTEMPTS {
                return Err(git2::Error::new(
                    git2::ErrorCode::Auth,
                    git2::ErrorClass::Ssh,
                    "remote rejected the SSH key",
                ));
            }
            self.to_git2(username_from_url, allowed)
        });
        callbacks
    }
}

const MAX_CREDENTIAL_ATTEMPTS: u8 = 3;

impl fmt::Debug for SshCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshCredential")
            .field("username", &self.username)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
