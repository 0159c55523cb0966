//! Porcelain commands (user-facing version control operations)
//!
//! Porcelain commands compose the repository areas into workflows and
//! print what they did. Library errors surface through `anyhow` so the
//! binary can report them uniformly.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage files for commit
//! - `commit`: Create a new commit from the staging area
//! - `status`: Show staged, unstaged and untracked files
//! - `diff`: Show line changes between commits or against the working tree
//! - `log`: Show first-parent history
//! - `branch`: Create, list, or delete branches
//! - `checkout`: Switch branches or detach HEAD at a commit
//! - `merge`: Three-way merge of a branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod diff;
pub mod init;
pub mod log;
pub mod merge;
pub mod status;
