//! Commit history traversal for `log`
//!
//! - `rev_list`: first-parent chain from a starting commit back to the root
//!
//! Only first parents are followed, so the side branch of a merge commit is
//! not listed.

pub mod rev_list;
