//!   Core Git repository wrapper.
//!
//!  This wraps `git2::Repository` behind a mutex and hands out walkers over
//!  commits, references and remotes. Walkers borrow the repository, so they
//!  are only reachable inside [`GitRepository::with_repo`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use git2::Repository;
use parking_lot::Mutex;

use crate::storage::commit::CommitWalk;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::refs::ReferenceWalk;
use crate::storage::remote::RemoteWalk;

/// The main Git repository wrapper.
///
/// Clone this to share the handle - it uses Arc internally. Access to the
/// underlying repository is serialized.
#[derive(Clone)]
pub struct GitRepository {
    inner: Arc<GitRepositoryInner>,
}

struct GitRepositoryInner {
    repo: Mutex<Repository>,
    path: PathBuf,
}

impl GitRepository {
    /// Open the repository containing `path`.
    ///
    /// Parent directories are searched, so any path inside a work tree works.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| repo.path().to_path_buf());
        tracing::debug!(path = %root.display(), "opened repository");

        Ok(Self {
            inner: Arc::new(GitRepositoryInner {
                repo: Mutex::new(repo),
                path: root,
            }),
        })
    }

    /// Get the work tree path (the git directory for bare repositories).
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Execute a function with exclusive access to the repository.
    pub fn with_repo<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Repository) -> Result<T, E>,
    {
        let repo = self.inner.repo.lock();
        f(&repo)
    }
}

/// Walk constructors, available inside [`GitRepository::with_repo`].
pub trait RepositoryExt {
    /// Commits reachable from HEAD, newest first.
    fn commit_walk(&self) -> StorageResult<CommitWalk<'_>>;

    /// Every reference in enumeration order.
    fn reference_walk(&self) -> StorageResult<ReferenceWalk<'_>>;

    /// Configured remotes, loaded lazily.
    fn remote_walk(&self) -> StorageResult<RemoteWalk<'_>>;
}

impl RepositoryExt for Repository {
    fn commit_walk(&self) -> StorageResult<CommitWalk<'_>> {
        CommitWalk::from_head(self)
    }

    fn reference_walk(&self) -> StorageResult<ReferenceWalk<'_>> {
        ReferenceWalk::new(self)
    }

    fn remote_walk(&self) -> StorageResult<RemoteWalk<'_>> {
        RemoteWalk::new(self)
    }
}
