//! Stored object types
//!
//! Two kinds of objects live in the object store, both keyed by the digest
//! of their bytes:
//!
//! - **Blob**: raw file content
//! - **Commit**: snapshot record (parents, timestamp, path → blob map, message)

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
