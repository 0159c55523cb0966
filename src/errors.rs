//! Error types for repository operations
//!
//! Every fallible operation in the library returns [`Result`], whose error
//! kinds mirror how callers are expected to react:
//!
//! - `NotFound`: a missing object, commit, branch or file. Fatal to the
//!   current operation.
//! - `Io`: a storage read or write failed. Fatal, and always raised before
//!   any reference is advanced.
//! - `Corrupt`: a stored record exists but cannot be parsed.
//!
//! Merge conflicts are not errors; see
//! [`MergeResult`](crate::artifacts::merge::MergeResult).

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("i/o failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt {name}: {reason}")]
    Corrupt { name: String, reason: String },

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid path {0:?}: paths cannot contain a newline")]
    InvalidPath(String),

    #[error("branch {0} already exists")]
    BranchExists(String),

    #[error("cannot delete the current branch {0}")]
    CurrentBranch(String),

    #[error("no commits exist yet")]
    NoCommits,

    #[error("nothing to commit")]
    NothingToCommit,
}

impl RepositoryError {
    pub fn not_found(kind: &'static str, name: impl ToString) -> Self {
        RepositoryError::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RepositoryError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(name: impl ToString, reason: impl ToString) -> Self {
        RepositoryError::Corrupt {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}
