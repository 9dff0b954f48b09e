//! Commit metadata and history traversal
//!
//! commits are walked from HEAD, newest first by commit time. each commit is
//! copied out into a [`CommitInfo`] so rows never borrow from libgit2 objects.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use git2::{ErrorCode, Repository, Revwalk, Sort};

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::{Identity, ObjectId};

/// layout used for the `date` field
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// information about a commit
#[derive(Debug, Clone)]
pub struct CommitInfo {
    pub id: ObjectId,
    pub author: Identity,
    pub committer: Identity,
    /// committer time in the committer's own offset
    pub time: DateTime<FixedOffset>,
    pub message: String,
}

impl CommitInfo {
    /// create CommitInfo from a git2::Commit
    pub(crate) fn from_git2(commit: &git2::Commit<'_>) -> Self {
        let committer = commit.committer();
        Self {
            id: ObjectId::new(commit.id()),
            author: Identity::from_git2(&commit.author()),
            committer: Identity::from_git2(&committer),
            time: git_time_to_datetime(committer.when()),
            message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
        }
    }

    /// the message up to the first line break
    pub fn summary(&self) -> &str {
        self.message.split('\n').next().unwrap_or(&self.message)
    }

    /// the committer timestamp rendered as `YYYY-MM-DD HH:MM:SS`
    pub fn date_string(&self) -> String {
        self.time.format(DATE_FORMAT).to_string()
    }
}

fn git_time_to_datetime(time: git2::Time) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    offset
        .timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH.fixed_offset())
}

/// iterate over commit history reachable from HEAD
///
/// an unborn HEAD (fresh repository) produces an empty walk.
pub struct CommitWalk<'repo> {
    repo: &'repo Repository,
    revwalk: Option<Revwalk<'repo>>,
}

impl<'repo> CommitWalk<'repo> {
    /// create a walk starting at HEAD
    pub fn from_head(repo: &'repo Repository) -> StorageResult<Self> {
        // push_head on an unborn branch reports a generic error, so ask HEAD first
        match repo.head() {
            Ok(_) => {}
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                tracing::debug!("HEAD is unborn, commit walk is empty");
                return Ok(Self { repo, revwalk: None });
            }
            Err(e) => return Err(StorageError::Git(e)),
        }

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push_head()?;

        Ok(Self {
            repo,
            revwalk: Some(revwalk),
        })
    }
}

impl<'repo> Iterator for CommitWalk<'repo> {
    type Item = StorageResult<CommitInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.revwalk.as_mut()?.next()? {
            Ok(oid) => match self.repo.find_commit(oid) {
                Ok(commit) => Some(Ok(CommitInfo::from_git2(&commit))),
                Err(e) => Some(Err(StorageError::Git(e))),
            },
            Err(e) => Some(Err(StorageError::Git(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::fixture::{branch, commit_at, TestRepo};

    #[test]
    fn test_walk_newest_first() {
        let test = TestRepo::new();
        let c1 = commit_at(&test.repo, "first", 1_000);
        let c2 = commit_at(&test.repo, "second", 2_000);
        let c3 = commit_at(&test.repo, "third\n\nbody", 3_000);

        let commits: Vec<_> = CommitWalk::from_head(&test.repo)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        let ids: Vec<_> = commits.iter().map(|c| c.id.raw()).collect();
        assert_eq!(ids, vec![c3, c2, c1]);
        assert!(commits.windows(2).all(|w| w[0].time >= w[1].time));
    }

    #[test]
    fn test_unborn_head_is_empty() {
        let test = TestRepo::new();
        let mut walk = CommitWalk::from_head(&test.repo).unwrap();
        assert!(walk.next().is_none());
    }

    #[test]
    fn test_unborn_head_with_branches_elsewhere() {
        let test = TestRepo::new();
        let c1 = commit_at(&test.repo, "first", 1_000);
        branch(&test.repo, "kept", c1);
        test.repo.set_head("refs/heads/orphan").unwrap();

        let mut walk = CommitWalk::from_head(&test.repo).unwrap();
        assert!(walk.next().is_none());
    }

    #[test]
    fn test_commit_info_fields() {
        let test = TestRepo::new();
        commit_at(&test.repo, "subject line\nsecond line", 86_400);

        let info = CommitWalk::from_head(&test.repo).unwrap().next().unwrap().unwrap();
        assert_eq!(info.summary(), "subject line");
        assert_eq!(info.message, "subject line\nsecond line");
        assert_eq!(info.date_string(), "1970-01-02 00:00:00");
        assert_eq!(info.author.name, "Author");
        assert_eq!(info.committer.email, "committer@example.com");
    }

    #[test]
    fn test_summary_without_newline() {
        let test = TestRepo::new();
        commit_at(&test.repo, "only line", 10);
        let info = CommitWalk::from_head(&test.repo).unwrap().next().unwrap().unwrap();
        assert_eq!(info.summary(), "only line");
    }

    #[test]
    fn test_date_uses_committer_offset() {
        let time = git2::Time::new(0, 120);
        let dt = git_time_to_datetime(time);
        assert_eq!(dt.format(DATE_FORMAT).to_string(), "1970-01-01 02:00:00");
    }
}
