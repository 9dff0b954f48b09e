//! Throwaway repositories for unit tests.

use git2::{Oid, Repository, Signature, Time};
use tempfile::TempDir;

/// A repository in a temporary directory, removed on drop.
pub(crate) struct TestRepo {
    pub repo: Repository,
    pub dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        Self { repo, dir }
    }
}

/// Commit an empty tree on top of HEAD with fixed author and committer times.
pub(crate) fn commit_at(repo: &Repository, message: &str, seconds: i64) -> Oid {
    let time = Time::new(seconds, 0);
    let author = Signature::new("Author", "author@example.com", &time).unwrap();
    let committer = Signature::new("Committer", "committer@example.com", &time).unwrap();

    let tree_id = repo.treebuilder(None).unwrap().write().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    repo.commit(Some("HEAD"), &author, &committer, message, &tree, &parents)
        .unwrap()
}

/// Create a lightweight tag pointing at `target`.
pub(crate) fn tag(repo: &Repository, name: &str, target: Oid) {
    repo.reference(&format!("refs/tags/{}", name), target, false, "tag")
        .unwrap();
}

/// Create a local branch pointing at `target`.
pub(crate) fn branch(repo: &Repository, name: &str, target: Oid) {
    let commit = repo.find_commit(target).unwrap();
    repo.branch(name, &commit, false).unwrap();
}
