//! Three-way merge
//!
//! - `ancestor_finder`: bidirectional BFS for the merge base
//! - `resolution`: per-file classification of ancestor / current / target
//!
//! A merge either produces a commit with two parents (current tip first),
//! or stops with the conflicting paths and no commit.

use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::path::PathBuf;

pub mod ancestor_finder;
pub mod resolution;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Both sides changed the file differently
    Content,
    /// One side deleted the file, the other modified it
    DeleteModify,
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Conflict {
    pub path: PathBuf,
    pub kind: ConflictKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeResult {
    /// Both tips are the same commit; nothing was written
    AlreadyUpToDate,
    /// No commit was created; the working tree holds conflict markers
    Conflicted(Vec<Conflict>),
    /// The new merge commit
    Merged(ObjectId),
}
