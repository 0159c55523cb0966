//! A minimal content-addressed version control system
//!
//! - [`areas`]: storage, object database, refs, staging area and working tree
//! - [`artifacts`]: objects, history traversal, diff and merge algorithms
//! - [`commands`]: user-facing commands as methods on
//!   [`Repository`](areas::repository::Repository)
//! - [`errors`]: the library error type

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

/// Environment variable holding the log filter, e.g. `MINIGIT_LOG=debug`
pub const LOG_ENV: &str = "MINIGIT_LOG";
