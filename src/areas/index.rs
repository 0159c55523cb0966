//! Staging area
//!
//! The index holds the changes that go into the next commit, as a flat
//! path → blob ID map. It is cleared after a successful commit and on
//! checkout.
//!
//! ## Index File Format
//!
//! Plain text, one entry per line, sorted by path:
//!
//! ```text
//! <blob-sha> <path>
//! ```
//!
//! A missing or empty file is an empty index.

use crate::areas::storage::Storage;
use crate::artifacts::objects::commit::FileMap;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug)]
pub struct Index {
    storage: Rc<dyn Storage>,
    /// Path to the index file (typically `.minigit/index`)
    path: Box<Path>,
    entries: FileMap,
    /// Set when the in-memory entries differ from what was loaded
    changed: bool,
}

impl Index {
    pub fn new(storage: Rc<dyn Storage>, path: Box<Path>) -> Self {
        Index {
            storage,
            path,
            entries: FileMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload the entries from storage, dropping unsaved changes
    pub fn rehydrate(&mut self) -> Result<()> {
        self.entries.clear();
        self.changed = false;

        if !self.storage.exists(&self.path) {
            return Ok(());
        }

        let content = self.storage.read(&self.path)?;
        let content = std::str::from_utf8(&content)
            .map_err(|_| RepositoryError::corrupt("index", "index is not valid UTF-8"))?;

        for line in content.lines().filter(|line| !line.is_empty()) {
            let (oid, path) = line
                .split_once(' ')
                .ok_or_else(|| RepositoryError::corrupt("index", format!("bad entry {:?}", line)))?;
            self.entries
                .insert(PathBuf::from(path), ObjectId::try_parse(oid)?);
        }

        Ok(())
    }

    /// Stage a path, replacing any entry that would clash with it: a staged
    /// parent directory that was a file, or staged children of a path that
    /// is now a file
    pub fn add(&mut self, path: PathBuf, oid: ObjectId) {
        self.entries.retain(|staged, _| {
            staged == &path || !(path.starts_with(staged) || staged.starts_with(&path))
        });
        self.entries.insert(path, oid);
        self.changed = true;
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.changed = true;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> &FileMap {
        &self.entries
    }

    pub fn write_updates(&mut self) -> Result<()> {
        let content = self
            .entries
            .iter()
            .map(|(path, oid)| format!("{} {}\n", oid, path.to_string_lossy()))
            .collect::<String>();

        self.storage.write(&self.path, content.as_bytes())?;
        self.changed = false;

        Ok(())
    }
}
