//! Repository commands
//!
//! Each command is an `impl Repository` block under [`porcelain`], writing
//! its human-readable output to the repository writer.

pub mod porcelain;
