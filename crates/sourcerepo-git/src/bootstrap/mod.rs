//! Repository bootstrap state machine.
//!
//! A call moves through `Init -> AddRemote -> Fetch` and then either
//! initialises an empty remote with a placeholder commit or re-clones a
//! non-empty one to prove it is reachable. Each step that fails ends the
//! call with a recorded [`BootstrapStatus`]; only credential problems are
//! returned as errors.

use sourcerepo_core::{
    BootstrapRequest, BootstrapResult, BootstrapStatus, RepoName, RepositoryEndpoint,
    resolve_private_key,
};
use tracing::{debug, info, info_span, warn};

use crate::auth::SshCredential;
use crate::engine::{CommitOptions, FetchOutcome, VcsEngine, WorkingCopy, Worktree};

/// File written into an empty remote.
pub const PLACEHOLDER_FILE: &str = "Readme.md";

/// Message of the placeholder commit.
pub const PLACEHOLDER_MESSAGE: &str = "Initialised with blank Readme";

/// Contents of the placeholder file for a repository.
pub fn placeholder_contents(repo_name: &RepoName) -> String {
    format!("# Repo: {}", repo_name)
}

/// Drives one repository towards "exists and is reachable".
#[derive(Debug, Clone)]
pub struct Bootstrapper<E> {
    engine: E,
    commit_options: CommitOptions,
}

impl<E: VcsEngine> Bootstrapper<E> {
    /// Creates a bootstrapper over the given engine.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            commit_options: CommitOptions::default(),
        }
    }

    /// Uses explicit author/committer options for the placeholder commit.
    pub fn with_commit_options(mut self, options: CommitOptions) -> Self {
        self.commit_options = options;
        self
    }

    /// Resolves credentials and reconciles the requested repository.
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::Decode` if the key blob is not valid base64
    /// and `BootstrapError::Auth` if no usable SSH key results. Every other
    /// failure is reported through the result's status.
    pub fn run(&self, request: &BootstrapRequest) -> sourcerepo_core::Result<BootstrapResult> {
        let endpoint = request.endpoint();
        let _span = info_span!("bootstrap", endpoint = %endpoint).entered();

        if let Some(trigger) = request.trigger() {
            debug!("Run triggered by {}", trigger);
        }

        let private_key = resolve_private_key(request)?;
        let credential = SshCredential::new(request.username(), private_key)?;

        Ok(self.converge(request, &endpoint, &credential))
    }

    /// Runs the state machine with an already-built credential.
    pub fn converge(
        &self,
        request: &BootstrapRequest,
        endpoint: &RepositoryEndpoint,
        credential: &SshCredential,
    ) -> BootstrapResult {
        let status = self.converge_at(request, endpoint.as_str(), credential);
        BootstrapResult::new(endpoint.clone(), status)
    }

    /// Reconciles the remote at `url` and logs the terminal status.
    pub(crate) fn converge_at(
        &self,
        request: &BootstrapRequest,
        url: &str,
        credential: &SshCredential,
    ) -> BootstrapStatus {
        let status = match self.try_converge(request, url, credential) {
            Ok(status) | Err(status) => status,
        };

        if status.is_success() {
            info!("Bootstrap finished: {}", status);
        } else {
            warn!("Bootstrap finished with {}: {}", status.step(), status);
        }

        status
    }

    fn try_converge(
        &self,
        request: &BootstrapRequest,
        url: &str,
        credential: &SshCredential,
    ) -> Result<BootstrapStatus, BootstrapStatus> {
        let remote = request.repo_name().as_str();

        let mut local = self
            .engine
            .init()
            .map_err(|e| BootstrapStatus::InitFailed {
                endpoint: url.to_string(),
                error: e.to_string(),
            })?;

        local
            .add_remote(remote, url)
            .map_err(|e| BootstrapStatus::RemoteFailed {
                endpoint: url.to_string(),
                error: e.to_string(),
            })?;

        debug!("Fetching {}", url);
        let outcome = local
            .fetch(remote, credential)
            .map_err(|e| BootstrapStatus::FetchFailed {
                endpoint: url.to_string(),
                kind: e.kind().to_string(),
                error: e.to_string(),
            })?;

        match outcome {
            FetchOutcome::EmptyRemote => {
                if !request.init_if_empty() {
                    debug!("init_if_empty is false; the empty remote is initialised regardless");
                }
                self.initialize_empty(&mut local, request.repo_name(), url, credential)
            },
            FetchOutcome::Fetched => self.verify_clone(url, credential),
        }
    }

    /// Writes, commits and pushes the placeholder into an empty remote.
    fn initialize_empty(
        &self,
        local: &mut E::WorkingCopy,
        repo_name: &RepoName,
        url: &str,
        credential: &SshCredential,
    ) -> Result<BootstrapStatus, BootstrapStatus> {
        info!("Remote is empty, initialising with {}", PLACEHOLDER_FILE);

        local
            .create_file(PLACEHOLDER_FILE, placeholder_contents(repo_name).as_bytes())
            .map_err(|e| BootstrapStatus::ReadmeCreateFailed {
                endpoint: url.to_string(),
                error: e.to_string(),
            })?;

        let mut worktree = local
            .worktree()
            .map_err(|e| BootstrapStatus::WorktreeFailed {
                endpoint: url.to_string(),
                error: e.to_string(),
            })?;

        let commit_failed = |e: crate::VcsError| BootstrapStatus::CommitFailed {
            endpoint: url.to_string(),
            error: e.to_string(),
        };
        worktree.add(PLACEHOLDER_FILE).map_err(commit_failed)?;
        let commit = worktree
            .commit(PLACEHOLDER_MESSAGE, &self.commit_options)
            .map_err(commit_failed)?;
        debug!("Placeholder commit {}", commit);

        local
            .push(repo_name.as_str(), credential)
            .map_err(|e| BootstrapStatus::PushFailed {
                endpoint: url.to_string(),
                error: e.to_string(),
            })?;

        Ok(BootstrapStatus::Pushed)
    }

    /// Confirms a fetched remote can also be cloned from scratch.
    fn verify_clone(
        &self,
        url: &str,
        credential: &SshCredential,
    ) -> Result<BootstrapStatus, BootstrapStatus> {
        self.engine
            .clone_verify(url, credential)
            .map_err(|e| BootstrapStatus::CloneFailed {
                endpoint: url.to_string(),
                error: e.to_string(),
            })?;

        Ok(BootstrapStatus::Fetched)
    }
}
