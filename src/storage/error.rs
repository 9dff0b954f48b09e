//! Storage layer error types
//!
//! All errors that can occur while reading repository metadata are defined here.
//! We use `thiserror` for ergonomic error definition and better error messages

use std::path::PathBuf;

use thiserror::Error;

/// the main error type for repository access
#[derive(Debug, Error)]
pub enum StorageError {
    /// error from the underlying Git library
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// the repository could not be opened at the given path
    #[error("cannot open repository at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    /// a configured remote could not be loaded
    #[error("cannot load remote '{name}': {source}")]
    RemoteLoad {
        name: String,
        #[source]
        source: git2::Error,
    },

    /// a name reported by git is not valid UTF-8
    #[error("invalid utf-8 in {0}")]
    InvalidUtf8(&'static str),
}

impl StorageError {
    /// check if this error happened while opening the repository
    pub fn is_open_failure(&self) -> bool {
        matches!(self, StorageError::OpenFailed { .. })
    }

    /// check if this error happened while loading a remote
    pub fn is_remote_failure(&self) -> bool {
        matches!(self, StorageError::RemoteLoad { .. })
    }
}

/// result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let open = StorageError::OpenFailed {
            path: PathBuf::from("/nowhere"),
            source: git2::Error::from_str("not found"),
        };
        assert!(open.is_open_failure());
        assert!(!open.is_remote_failure());

        let remote = StorageError::RemoteLoad {
            name: "origin".into(),
            source: git2::Error::from_str("bad refspec"),
        };
        assert!(remote.is_remote_failure());
        assert!(remote.to_string().contains("origin"));
    }
}
