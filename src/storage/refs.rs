//! Reference metadata and enumeration.
//!
//! Every reference under `refs/` is visited in the order libgit2 reports it:
//! - local branches (`refs/heads/*`)
//! - remote-tracking branches (`refs/remotes/*`)
//! - tags (`refs/tags/*`)
//! - anything else (notes, stash), which stays unclassified
//!
//! Symbolic references have no direct target and report no id.

use git2::{References, Repository};

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::{ObjectId, ReferenceKind};

/// information about a reference
#[derive(Debug, Clone)]
pub struct ReferenceInfo {
    /// short display form (e.g. `main`, `origin/main`, `v1.0`)
    pub shorthand: String,
    /// fully qualified name (e.g. `refs/heads/main`)
    pub full_name: String,
    /// direct target; `None` for symbolic references
    pub target: Option<ObjectId>,
    /// `None` when the reference is neither a branch, remote nor tag
    pub kind: Option<ReferenceKind>,
}

impl ReferenceInfo {
    /// create ReferenceInfo from a git2::Reference
    pub(crate) fn from_git2(reference: &git2::Reference<'_>) -> Self {
        Self {
            shorthand: String::from_utf8_lossy(reference.shorthand_bytes()).into_owned(),
            full_name: String::from_utf8_lossy(reference.name_bytes()).into_owned(),
            target: reference.target().map(ObjectId::new),
            kind: ReferenceKind::classify(reference),
        }
    }
}

/// iterate over all references in the repository
pub struct ReferenceWalk<'repo> {
    references: References<'repo>,
}

impl<'repo> ReferenceWalk<'repo> {
    pub fn new(repo: &'repo Repository) -> StorageResult<Self> {
        Ok(Self {
            references: repo.references()?,
        })
    }
}

impl<'repo> Iterator for ReferenceWalk<'repo> {
    type Item = StorageResult<ReferenceInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.references.next()? {
            Ok(reference) => Some(Ok(ReferenceInfo::from_git2(&reference))),
            Err(e) => Some(Err(StorageError::Git(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::fixture::{branch, commit_at, tag, TestRepo};

    fn all_refs(repo: &Repository) -> Vec<ReferenceInfo> {
        ReferenceWalk::new(repo)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_classifies_branches_and_tags() {
        let test = TestRepo::new();
        let head = commit_at(&test.repo, "init", 100);
        branch(&test.repo, "feature", head);
        tag(&test.repo, "v1.0", head);

        let refs = all_refs(&test.repo);
        let feature = refs.iter().find(|r| r.full_name == "refs/heads/feature").unwrap();
        assert_eq!(feature.shorthand, "feature");
        assert_eq!(feature.kind, Some(ReferenceKind::Branch));
        assert_eq!(feature.target.map(|t| t.raw()), Some(head));

        let v1 = refs.iter().find(|r| r.full_name == "refs/tags/v1.0").unwrap();
        assert_eq!(v1.shorthand, "v1.0");
        assert_eq!(v1.kind, Some(ReferenceKind::Tag));
    }

    #[test]
    fn test_remote_tracking_ref() {
        let test = TestRepo::new();
        let head = commit_at(&test.repo, "init", 100);
        test.repo
            .reference("refs/remotes/origin/main", head, false, "fetch")
            .unwrap();

        let refs = all_refs(&test.repo);
        let remote = refs.iter().find(|r| r.full_name == "refs/remotes/origin/main").unwrap();
        assert_eq!(remote.shorthand, "origin/main");
        assert_eq!(remote.kind, Some(ReferenceKind::Remote));
    }

    #[test]
    fn test_symbolic_ref_has_no_target() {
        let test = TestRepo::new();
        let head = commit_at(&test.repo, "init", 100);
        tag(&test.repo, "real", head);
        test.repo
            .reference_symbolic("refs/tags/alias", "refs/tags/real", false, "alias")
            .unwrap();

        let refs = all_refs(&test.repo);
        let alias = refs.iter().find(|r| r.full_name == "refs/tags/alias").unwrap();
        assert!(alias.target.is_none());
        assert_eq!(alias.kind, Some(ReferenceKind::Tag));
    }

    #[test]
    fn test_notes_ref_is_unclassified() {
        let test = TestRepo::new();
        let head = commit_at(&test.repo, "init", 100);
        test.repo.reference("refs/notes/commits", head, false, "notes").unwrap();

        let refs = all_refs(&test.repo);
        let notes = refs.iter().find(|r| r.full_name == "refs/notes/commits").unwrap();
        assert_eq!(notes.kind, None);
    }
}
