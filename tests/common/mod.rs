//! Shared fixture for integration tests.

#![allow(dead_code)]

use git2::{Oid, Repository, Signature, Time};
use tempfile::TempDir;

/// A repository with three commits, a branch, two tags (one symbolic) and
/// two remotes.
pub struct Fixture {
    pub dir: TempDir,
    pub commits: Vec<Oid>,
}

/// Commit an empty tree on HEAD at a fixed time (seconds since the epoch, UTC).
pub fn commit_at(repo: &Repository, message: &str, seconds: i64) -> Oid {
    let time = Time::new(seconds, 0);
    let sig = Signature::new("Test User", "test@example.com", &time).expect("signature");
    let tree_id = repo.treebuilder(None).expect("treebuilder").write().expect("write tree");
    let tree = repo.find_tree(tree_id).expect("find tree");
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("commit")
}

pub fn create_test_repo() -> Fixture {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let repo = Repository::init(dir.path()).expect("Failed to init git repo");

    let commits = vec![
        commit_at(&repo, "Initial commit", 1_600_000_000),
        commit_at(&repo, "Add parser\n\nLonger description.", 1_600_086_400),
        commit_at(&repo, "Fix typo", 1_600_172_800),
    ];

    let first = repo.find_commit(commits[0]).expect("find commit");
    repo.branch("feature", &first, false).expect("branch");
    repo.reference("refs/tags/v0.1", commits[0], false, "tag")
        .expect("tag");
    repo.reference("refs/tags/v0.2", commits[2], false, "tag")
        .expect("tag");
    repo.reference_symbolic("refs/tags/latest", "refs/tags/v0.2", false, "symbolic tag")
        .expect("symbolic tag");

    repo.remote("origin", "https://example.com/project.git").expect("remote");
    repo.remote("upstream", "https://example.com/upstream.git").expect("remote");
    repo.remote_set_pushurl("upstream", Some("ssh://git@example.com/upstream.git"))
        .expect("pushurl");

    Fixture { dir, commits }
}
