//! Data structures and algorithms
//!
//! - `branch`: branch names and symbolic reference names
//! - `diff`: greedy line diff and snapshot comparison
//! - `log`: first-parent history traversal
//! - `merge`: common ancestor search and three-way classification
//! - `objects`: object IDs, blobs and commits

pub mod branch;
pub mod diff;
pub mod log;
pub mod merge;
pub mod objects;
