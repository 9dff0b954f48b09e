//! storage layer for gitql
//!
//! this module is the repository-access layer. The query engine uses this API
//! for opening repositories and walking their entities, and never touches
//! git2 object types directly.
//!
//!  # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     GitRepository                           │
//! │        (open by path, serialized access, walkers)           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!        ┌─────────────────────┼─────────────────────┐
//!        │                     │                     │
//!        ▼                     ▼                     ▼
//!  ┌─────────────┐       ┌─────────────┐       ┌─────────────┐
//!  │   commit    │       │    refs     │       │   remote    │
//!  │ (history)   │       │ (all refs)  │       │ (by name)   │
//!  └─────────────┘       └─────────────┘       └─────────────┘
//!  ```
//!
//! # Usage
//!
//! ```no_run
//! use gitql::storage::{GitRepository, RepositoryExt, StorageError};
//!
//! let repo = GitRepository::open(".")?;
//! let subjects = repo.with_repo(|r| {
//!     r.commit_walk()?
//!         .take(3)
//!         .map(|c| c.map(|c| c.summary().to_string()))
//!         .collect::<Result<Vec<_>, StorageError>>()
//! })?;
//! println!("{:?}", subjects);
//! # Ok::<(), StorageError>(())
//! ```

mod commit;
mod error;
mod refs;
mod remote;
mod repository;
mod types;

#[cfg(test)]
pub(crate) mod fixture;

// Re-export public API
pub use commit::{CommitInfo, CommitWalk, DATE_FORMAT};
pub use error::{StorageError, StorageResult};
pub use refs::{ReferenceInfo, ReferenceWalk};
pub use remote::{RemoteInfo, RemoteWalk};
pub use repository::{GitRepository, RepositoryExt};
pub use types::{Identity, ObjectId, ReferenceKind};
