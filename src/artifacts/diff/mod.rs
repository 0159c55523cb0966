//! Diff algorithms and snapshot comparison
//!
//! - `line_diff`: greedy line-by-line comparison of two texts
//! - `snapshot_diff`: which files differ between two path → blob maps, with
//!   a line diff for each
//!
//! The line diff is deliberately not a longest-common-subsequence diff; see
//! [`GreedyDiff`](line_diff::GreedyDiff).

pub mod line_diff;
pub mod snapshot_diff;
