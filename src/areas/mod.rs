//! Core repository components
//!
//! Every area holds a shared handle to the same [`Storage`](storage::Storage):
//!
//! - `storage`: file access capability (real file system or in memory)
//! - `database`: content-addressed object store for blobs and commits
//! - `index`: staging area for the next commit
//! - `refs`: HEAD and branch references
//! - `workspace`: working tree files, everything outside `.minigit/`
//! - `lock`: repository-wide exclusive lock held by a running command
//! - `repository`: the context object tying the areas together

pub mod database;
pub mod index;
pub mod lock;
pub mod refs;
pub mod repository;
pub mod storage;
pub mod workspace;
