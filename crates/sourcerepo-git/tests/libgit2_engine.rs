//! Exercises the libgit2 engine against local bare repositories.
//!
//! The local transport never asks for credentials, so the SSH key only has
//! to parse.

use std::path::{Path, PathBuf};

use git2::Repository;
use sourcerepo_core::{KeySource, PrivateKey, RepoName};
use sourcerepo_git::{
    CommitOptions, EngineConfig, FetchOutcome, Libgit2Engine, PLACEHOLDER_FILE,
    PLACEHOLDER_MESSAGE, SshCredential, VcsEngine, VcsError, WorkingCopy, Worktree,
    placeholder_contents,
};
use tempfile::TempDir;

const TEST_KEY: &str = include_str!("fixtures/id_ed25519");

struct Fixture {
    _root: TempDir,
    remote_path: PathBuf,
    engine: Libgit2Engine,
    credential: SshCredential,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let remote_path = root.path().join("remote.git");
        Repository::init_bare(&remote_path).unwrap();

        let engine = Libgit2Engine::new(
            EngineConfig::builder()
                .scratch_dir(root.path().join("scratch"))
                .committer_name("Test Bot")
                .committer_email("test-bot@example.com")
                .build(),
        );
        let credential = SshCredential::new(
            &"deployer".into(),
            PrivateKey::new(TEST_KEY, KeySource::Raw),
        )
        .unwrap();

        Self {
            _root: root,
            remote_path,
            engine,
            credential,
        }
    }

    fn url(&self) -> String {
        self.remote_path.to_string_lossy().into_owned()
    }

    /// Runs the empty-remote branch by hand.
    fn push_placeholder(&self, repo_name: &str) {
        let mut copy = self.engine.init().unwrap();
        copy.add_remote(repo_name, &self.url()).unwrap();
        assert_eq!(
            copy.fetch(repo_name, &self.credential).unwrap(),
            FetchOutcome::EmptyRemote
        );

        let contents = placeholder_contents(&RepoName::new(repo_name));
        copy.create_file(PLACEHOLDER_FILE, contents.as_bytes())
            .unwrap();

        let mut worktree = copy.worktree().unwrap();
        worktree.add(PLACEHOLDER_FILE).unwrap();
        worktree
            .commit(PLACEHOLDER_MESSAGE, &CommitOptions::default())
            .unwrap();

        copy.push(repo_name, &self.credential).unwrap();
    }
}

fn head_commit_of(bare: &Path) -> (String, String, Vec<u8>) {
    let repo = Repository::open_bare(bare).unwrap();
    let branch = repo
        .references_glob("refs/heads/*")
        .unwrap()
        .flatten()
        .next()
        .expect("pushed branch");
    let commit = branch.peel_to_commit().unwrap();
    let tree = commit.tree().unwrap();
    let entry = tree.get_name(PLACEHOLDER_FILE).expect("placeholder in tree");
    let blob = repo.find_blob(entry.id()).unwrap();

    (
        commit.message().unwrap_or_default().to_string(),
        commit.author().name().unwrap_or_default().to_string(),
        blob.content().to_vec(),
    )
}

#[test]
fn test_empty_remote_receives_placeholder() {
    let fixture = Fixture::new();

    fixture.push_placeholder("platform-config");

    let (message, author, contents) = head_commit_of(&fixture.remote_path);
    assert_eq!(message, PLACEHOLDER_MESSAGE);
    assert!(!author.is_empty());
    assert_eq!(contents, b"# Repo: platform-config");
}

#[test]
fn test_initialised_remote_fetches_and_clones() {
    let fixture = Fixture::new();
    fixture.push_placeholder("platform-config");

    let mut copy = fixture.engine.init().unwrap();
    copy.add_remote("platform-config", &fixture.url()).unwrap();

    let outcome = copy.fetch("platform-config", &fixture.credential).unwrap();
    assert_eq!(outcome, FetchOutcome::Fetched);

    let fetched = copy
        .repository()
        .references_glob("refs/remotes/platform-config/*")
        .unwrap()
        .count();
    assert!(fetched > 0);

    fixture
        .engine
        .clone_verify(&fixture.url(), &fixture.credential)
        .unwrap();
}

#[test]
fn test_divergent_push_is_rejected() {
    let fixture = Fixture::new();
    fixture.push_placeholder("platform-config");

    // A second copy that never fetched commits on an unrelated root
    let mut copy = fixture.engine.init().unwrap();
    copy.add_remote("platform-config", &fixture.url()).unwrap();
    copy.create_file(PLACEHOLDER_FILE, b"# Repo: somewhere-else")
        .unwrap();

    let mut worktree = copy.worktree().unwrap();
    worktree.add(PLACEHOLDER_FILE).unwrap();
    worktree
        .commit(PLACEHOLDER_MESSAGE, &CommitOptions::default())
        .unwrap();

    let err = copy
        .push("platform-config", &fixture.credential)
        .unwrap_err();
    assert!(matches!(err, VcsError::Rejected { .. }), "got {:?}", err);
    assert_eq!(err.kind(), "rejected");

    let (_, _, contents) = head_commit_of(&fixture.remote_path);
    assert_eq!(contents, b"# Repo: platform-config");
}

#[test]
fn test_empty_remote_reports_empty() {
    let fixture = Fixture::new();

    let mut copy = fixture.engine.init().unwrap();
    copy.add_remote("platform-config", &fixture.url()).unwrap();

    assert_eq!(
        copy.fetch("platform-config", &fixture.credential).unwrap(),
        FetchOutcome::EmptyRemote
    );
    assert_eq!(
        copy.fetch("platform-config", &fixture.credential).unwrap(),
        FetchOutcome::EmptyRemote
    );
}

#[test]
fn test_fetch_from_missing_remote_is_an_error() {
    let fixture = Fixture::new();
    let missing = fixture.remote_path.with_file_name("does-not-exist.git");

    let mut copy = fixture.engine.init().unwrap();
    copy.add_remote("ghost", &missing.to_string_lossy()).unwrap();

    let result = copy.fetch("ghost", &fixture.credential);
    assert!(result.is_err());
}

#[test]
fn test_clone_verify_of_missing_remote_fails() {
    let fixture = Fixture::new();
    let missing = fixture.remote_path.with_file_name("does-not-exist.git");

    let err = fixture
        .engine
        .clone_verify(&missing.to_string_lossy(), &fixture.credential)
        .unwrap_err();
    assert!(!matches!(err, VcsError::Rejected { .. }));
}

#[test]
fn test_duplicate_remote_is_rejected() {
    let fixture = Fixture::new();
    let mut copy = fixture.engine.init().unwrap();

    copy.add_remote("platform-config", &fixture.url()).unwrap();
    assert!(copy.add_remote("platform-config", &fixture.url()).is_err());
}

#[test]
fn test_scratch_copies_do_not_outlive_the_call() {
    let fixture = Fixture::new();
    fixture.push_placeholder("platform-config");

    let scratch = fixture
        .engine
        .config()
        .scratch_dir()
        .cloned()
        .expect("scratch dir configured");
    let leftovers = std::fs::read_dir(&scratch).unwrap().count();
    assert_eq!(leftovers, 0);
}
