//! Repository-level exclusive lock
//!
//! Reference, index and object writes are separate file operations with no
//! atomicity across them, so two commands running against the same
//! repository could interleave. Holding this lock for the duration of a
//! command serializes them. The lock is released when dropped.

use crate::errors::{RepositoryError, Result};
use file_guard::{FileGuard, Lock};
use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing::debug;

const LOCK_FILE_NAME: &str = "lock";

pub struct RepositoryLock {
    _guard: FileGuard<Box<File>>,
}

impl RepositoryLock {
    /// Block until the exclusive lock on `<metadata_dir>/lock` is held
    pub fn acquire(metadata_dir: &Path) -> Result<Self> {
        let lock_path = metadata_dir.join(LOCK_FILE_NAME);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| RepositoryError::io(&lock_path, e))?;

        let guard = file_guard::lock(Box::new(file), Lock::Exclusive, 0, 1)
            .map_err(|e| RepositoryError::io(&lock_path, e))?;
        debug!(path = %lock_path.display(), "acquired repository lock");

        Ok(RepositoryLock { _guard: guard })
    }
}

impl std::fmt::Debug for RepositoryLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryLock").finish_non_exhaustive()
    }
}
