//! libgit2-backed engine.
//!
//! Every working copy lives in its own temporary directory that is removed
//! when the working copy is dropped, so nothing outlives a bootstrap call.

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use git2::build::RepoBuilder;
use git2::{Commit, ErrorCode, FetchOptions, PushOptions, Repository, Signature};
use tempfile::TempDir;
use tracing::{debug, info};

use super::{
    CommitIdentity, CommitOptions, EngineConfig, FetchOutcome, VcsEngine, WorkingCopy, Worktree,
};
use crate::auth::SshCredential;
use crate::error::VcsError;

/// A [`VcsEngine`] built on libgit2.
#[derive(Debug, Clone, Default)]
pub struct Libgit2Engine {
    config: EngineConfig,
}

impl Libgit2Engine {
    /// Creates a new engine.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Creates an empty scratch directory.
    fn scratch(&self, prefix: &str) -> Result<TempDir, VcsError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);

        let dir = match self.config.scratch_dir() {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            },
            None => builder.tempdir()?,
        };

        Ok(dir)
    }
}

impl VcsEngine for Libgit2Engine {
    type WorkingCopy = EphemeralWorkingCopy;

    fn init(&self) -> Result<EphemeralWorkingCopy, VcsError> {
        let dir = self.scratch("sourcerepo-")?;
        let repo = Repository::init(dir.path())?;

        debug!("Initialized scratch repository at {:?}", dir.path());

        Ok(EphemeralWorkingCopy {
            repo,
            default_identity: self.config.default_identity().clone(),
            dir,
        })
    }

    fn clone_verify(&self, url: &str, credential: &SshCredential) -> Result<(), VcsError> {
        let dir = self.scratch("sourcerepo-clone-")?;

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(credential.remote_callbacks());

        info!("Verifying clone of {}", url);

        RepoBuilder::new()
            .bare(true)
            .fetch_options(fetch_options)
            .clone(url, dir.path())?;

        debug!("Clone of {} succeeded", url);
        Ok(())
    }
}

/// A scratch repository with a working tree, removed on drop.
pub struct EphemeralWorkingCopy {
    // Declared before `dir` so the repository closes before the directory
    // is deleted.
    repo: Repository,
    default_identity: CommitIdentity,
    dir: TempDir,
}

impl EphemeralWorkingCopy {
    /// Returns the root of the working tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &Repository {
        &self.repo
    }
}

impl WorkingCopy for EphemeralWorkingCopy {
    type Worktree = Libgit2Worktree;

    fn add_remote(&mut self, name: &str, url: &str) -> Result<(), VcsError> {
        self.repo.remote(name, url)?;
        debug!("Added remote {} -> {}", name, url);
        Ok(())
    }

    fn fetch(
        &mut self,
        remote_name: &str,
        credential: &SshCredential,
    ) -> Result<FetchOutcome, VcsError> {
        let mut remote = self.repo.find_remote(remote_name)?;

        let mut options = FetchOptions::new();
        options.remote_callbacks(credential.remote_callbacks());

        let default_refspecs: [&str; 0] = [];
        remote.fetch(&default_refspecs, Some(&mut options), None)?;

        // An empty remote fetches cleanly but leaves no tracking branches
        let tracking = format!("refs/remotes/{}/*", remote_name);
        if self.repo.references_glob(&tracking)?.next().is_none() {
            info!("Remote {} has no references", remote_name);
            return Ok(FetchOutcome::EmptyRemote);
        }

        info!("Fetched from remote {}", remote_name);
        Ok(FetchOutcome::Fetched)
    }

    fn create_file(&mut self, path: &str, contents: &[u8]) -> Result<(), VcsError> {
        let target = self.dir.path().join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, contents)?;

        debug!("Wrote {} ({} bytes)", path, contents.len());
        Ok(())
    }

    fn worktree(&self) -> Result<Libgit2Worktree, VcsError> {
        let workdir = self.repo.workdir().ok_or(VcsError::NoWorktree)?;
        let repo = Repository::open(workdir)?;

        Ok(Libgit2Worktree {
            repo,
            default_identity: self.default_identity.clone(),
        })
    }

    fn push(&mut self, remote_name: &str, credential: &SshCredential) -> Result<(), VcsError> {
        let head = self.repo.head()?;
        let refname = head
            .name()
            .ok_or_else(|| VcsError::git("HEAD does not name a valid reference"))?
            .to_string();
        let refspec = format!("{}:{}", refname, refname);

        let mut remote = self.repo.find_remote(remote_name)?;
        let rejection: RefCell<Option<(String, String)>> = RefCell::new(None);

        {
            let mut callbacks = credential.remote_callbacks();
            callbacks.push_update_reference(|name, status| {
                if let Some(reason) = status {
                    *rejection.borrow_mut() = Some((name.to_string(), reason.to_string()));
                }
                Ok(())
            });

            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);

            info!("Pushing {} to remote {}", refname, remote_name);
            match remote.push(&[refspec.as_str()], Some(&mut options)) {
                Ok(()) => {},
                // libgit2 refuses non-fast-forward updates before sending
                Err(e) if e.code() == ErrorCode::NotFastForward => {
                    return Err(VcsError::rejected(refname, e.message()));
                },
                Err(e) => return Err(e.into()),
            }
        }

        if let Some((name, reason)) = rejection.into_inner() {
            return Err(VcsError::rejected(name, reason));
        }

        Ok(())
    }
}

impl std::fmt::Debug for EphemeralWorkingCopy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralWorkingCopy")
            .field("path", &self.dir.path())
            .finish()
    }
}

/// Index and commit handle for an [`EphemeralWorkingCopy`].
pub struct Libgit2Worktree {
    repo: Repository,
    default_identity: CommitIdentity,
}

impl Libgit2Worktree {
    /// Resolves the signature for a commit.
    ///
    /// Explicit options win, then the repository's `user.name`/`user.email`,
    /// then the engine default.
    fn signature(&self, options: &CommitOptions) -> Result<Signature<'static>, VcsError> {
        if let Some(identity) = &options.identity {
            return Ok(Signature::now(&identity.name, &identity.email)?);
        }

        match self.repo.signature() {
            Ok(signature) => Ok(signature),
            Err(_) => {
                debug!(
                    "No Git identity configured, committing as {}",
                    self.default_identity.name
                );
                Ok(Signature::now(
                    &self.default_identity.name,
                    &self.default_identity.email,
                )?)
            },
        }
    }
}

impl Worktree for Libgit2Worktree {
    fn add(&mut self, path: &str) -> Result<(), VcsError> {
        let mut index = self.repo.index()?;
        index.add_path(Path::new(path))?;
        index.write()?;
        Ok(())
    }

    fn commit(&mut self, message: &str, options: &CommitOptions) -> Result<String, VcsError> {
        let signature = self.signature(options)?;

        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        debug!("Created commit {}", oid);
        Ok(oid.to_string())
    }
}

impl std::fmt::Debug for Libgit2Worktree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Libgit2Worktree")
            .field("workdir", &self.repo.workdir())
            .finish()
    }
}
