//! Commit object
//!
//! Commits are immutable snapshots of the tracked files. Each commit holds:
//! - Parent commit ID(s): none for a root commit, one for an ordinary
//!   commit, two for a merge (the first parent is the side merged into)
//! - The creation timestamp
//! - The complete path → blob mapping of tracked files (not a delta)
//! - The commit message
//!
//! ## Format
//!
//! ```text
//! parent <parent-sha>
//! timestamp <unix-seconds> <timezone>
//! file <blob-sha> <path>
//!
//! <commit message>
//! ```
//!
//! The commit ID is the digest of this text, so it is a pure function of
//! the parents, timestamp, files and message.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, TimeZone, Timelike};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Environment variable that pins the commit timestamp
pub const DATE_ENV: &str = "MINIGIT_DATE";

/// Path → blob ID mapping of a snapshot
pub type FileMap = BTreeMap<PathBuf, ObjectId>;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    parents: Vec<ObjectId>,
    timestamp: DateTime<FixedOffset>,
    files: FileMap,
    message: String,
}

impl Commit {
    /// The timestamp is truncated to whole seconds, the precision of the
    /// stored record
    pub fn new(
        parents: Vec<ObjectId>,
        timestamp: DateTime<FixedOffset>,
        files: FileMap,
        message: String,
    ) -> Self {
        Commit {
            parents,
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            files,
            message,
        }
    }

    /// Read the commit timestamp from the environment, falling back to now
    ///
    /// Accepts RFC 2822 or `%Y-%m-%d %H:%M:%S %z`.
    pub fn timestamp_from_env() -> DateTime<FixedOffset> {
        let timestamp = std::env::var(DATE_ENV)
            .ok()
            .and_then(|date_str| {
                DateTime::parse_from_rfc2822(&date_str)
                    .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                    .ok()
            })
            .unwrap_or_else(|| chrono::Local::now().fixed_offset());

        timestamp.with_nanosecond(0).unwrap_or(timestamp)
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    /// The first parent, followed by linear history listings
    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn files(&self) -> &FileMap {
        &self.files
    }

    pub fn into_files(self) -> FileMap {
        self.files
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Timestamp like "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    fn parse_timestamp(name: &str, value: &str) -> Result<DateTime<FixedOffset>> {
        let (seconds, timezone) = value
            .split_once(' ')
            .ok_or_else(|| RepositoryError::corrupt(name, "invalid timestamp line"))?;
        let seconds = seconds
            .parse::<i64>()
            .map_err(|_| RepositoryError::corrupt(name, "invalid timestamp"))?;

        let (sign, digits) = match timezone.split_at_checked(1) {
            Some(("+", digits)) => (1, digits),
            Some(("-", digits)) => (-1, digits),
            _ => return Err(RepositoryError::corrupt(name, "invalid timezone")),
        };
        let (hours, minutes) = digits
            .split_at_checked(2)
            .and_then(|(h, m)| Some((h.parse::<i32>().ok()?, m.parse::<i32>().ok()?)))
            .ok_or_else(|| RepositoryError::corrupt(name, "invalid timezone"))?;

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .and_then(|offset| offset.timestamp_opt(seconds, 0).single())
            .ok_or_else(|| RepositoryError::corrupt(name, "timestamp out of range"))
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        let mut header = vec![];

        for parent in &self.parents {
            header.push(format!("parent {}", parent));
        }
        header.push(format!(
            "timestamp {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for (path, oid) in &self.files {
            let path = path.to_string_lossy();
            if path.contains('\n') {
                return Err(RepositoryError::InvalidPath(path.into_owned()));
            }
            header.push(format!("file {} {}", oid, path));
        }

        Ok(Bytes::from(format!(
            "{}\n\n{}",
            header.join("\n"),
            self.message
        )))
    }
}

impl Unpackable for Commit {
    fn deserialize(oid: &ObjectId, content: Bytes) -> Result<Self> {
        let name = format!("commit {}", oid);
        let content = std::str::from_utf8(&content)
            .map_err(|_| RepositoryError::corrupt(&name, "commit is not valid UTF-8"))?;

        let (header, message) = content
            .split_once("\n\n")
            .ok_or_else(|| RepositoryError::corrupt(&name, "missing message separator"))?;

        let mut parents = Vec::new();
        let mut timestamp = None;
        let mut files = FileMap::new();

        for line in header.lines() {
            if let Some(parent) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(parent)?);
            } else if let Some(value) = line.strip_prefix("timestamp ") {
                timestamp = Some(Self::parse_timestamp(&name, value)?);
            } else if let Some(entry) = line.strip_prefix("file ") {
                let (blob_oid, path) = entry
                    .split_once(' ')
                    .ok_or_else(|| RepositoryError::corrupt(&name, "invalid file line"))?;
                files.insert(PathBuf::from(path), ObjectId::try_parse(blob_oid)?);
            } else {
                return Err(RepositoryError::corrupt(
                    &name,
                    format!("unexpected header line {:?}", line),
                ));
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| RepositoryError::corrupt(&name, "missing timestamp"))?;

        Ok(Self::new(parents, timestamp, files, message.to_string()))
    }
}

impl Object for Commit {
    fn display(&self) -> String {
        String::from_utf8_lossy(&self.serialize().unwrap_or_default()).into_owned()
    }
}
