//! Remote metadata and enumeration.
//!
//! The walk snapshots the configured remote names up front, then loads each
//! remote only when it is pulled. A remote that fails to load ends the walk
//! with [`StorageError::RemoteLoad`].

use std::path::PathBuf;
use std::vec;

use git2::Repository;

use crate::storage::error::{StorageError, StorageResult};

/// information about a configured remote
#[derive(Debug, Clone)]
pub struct RemoteInfo {
    pub name: String,
    pub url: String,
    /// empty when no separate push url is configured
    pub push_url: String,
    /// git directory of the repository that owns the remote
    pub owner: PathBuf,
}

impl RemoteInfo {
    /// create RemoteInfo from a git2::Remote
    pub(crate) fn from_git2(remote: &git2::Remote<'_>, owner: &Repository) -> Self {
        Self {
            name: remote.name_bytes().map(lossy).unwrap_or_default(),
            url: lossy(remote.url_bytes()),
            push_url: remote.pushurl_bytes().map(lossy).unwrap_or_default(),
            owner: owner.path().to_path_buf(),
        }
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// iterate over the configured remotes
pub struct RemoteWalk<'repo> {
    repo: &'repo Repository,
    names: vec::IntoIter<String>,
}

impl<'repo> RemoteWalk<'repo> {
    /// list the remote names; nothing is loaded yet
    pub fn new(repo: &'repo Repository) -> StorageResult<Self> {
        let listed = repo.remotes()?;
        let names = listed
            .iter()
            .map(|name| name.map(str::to_string).ok_or(StorageError::InvalidUtf8("remote name")))
            .collect::<StorageResult<Vec<_>>>()?;

        tracing::debug!(count = names.len(), "listed remotes");
        Ok(Self {
            repo,
            names: names.into_iter(),
        })
    }
}

impl<'repo> Iterator for RemoteWalk<'repo> {
    type Item = StorageResult<RemoteInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.names.next()?;
        Some(
            self.repo
                .find_remote(&name)
                .map(|remote| RemoteInfo::from_git2(&remote, self.repo))
                .map_err(|source| StorageError::RemoteLoad { name, source }),
        )
    }
}
