//! Storage capability consumed by every repository area
//!
//! All paths handed to a [`Storage`] are relative to its root (the working
//! tree root). Two implementations exist:
//!
//! - [`FileStorage`]: the real file system
//! - [`MemoryStorage`]: a path → bytes map, used for tests and embedding

use crate::errors::{RepositoryError, Result};
use bytes::Bytes;
use fake::rand;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub trait Storage: std::fmt::Debug {
    fn exists(&self, path: &Path) -> bool;

    /// Read a file, failing with `NotFound` if it does not exist
    fn read(&self, path: &Path) -> Result<Bytes>;

    /// Write a file, creating parent directories as needed
    fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Remove a file; removing a missing file is not an error
    fn remove(&self, path: &Path) -> Result<()>;

    /// Ensure a directory exists
    fn create_dir(&self, path: &Path) -> Result<()>;

    /// All files under `root`, relative to the storage root, sorted
    fn list_files_under(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

#[derive(Debug)]
pub struct FileStorage {
    root: Box<Path>,
}

impl FileStorage {
    pub fn new(root: Box<Path>) -> Self {
        FileStorage { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn generate_temp_name() -> String {
        format!("tmp-{}", rand::random::<u32>())
    }
}

impl Storage for FileStorage {
    fn exists(&self, path: &Path) -> bool {
        self.root.join(path).exists()
    }

    fn read(&self, path: &Path) -> Result<Bytes> {
        let full_path = self.root.join(path);

        std::fs::read(&full_path)
            .map(Bytes::from)
            .map_err(|error| match error.kind() {
                std::io::ErrorKind::NotFound => {
                    RepositoryError::not_found("file", path.display())
                }
                _ => RepositoryError::io(full_path, error),
            })
    }

    // The data goes to a temp file in the target directory first, then gets
    // renamed over the destination so readers never see a partial file.
    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let full_path = self.root.join(path);
        let dir = full_path.parent().unwrap_or(self.root.as_ref());

        std::fs::create_dir_all(dir).map_err(|e| RepositoryError::io(dir, e))?;

        let temp_path = dir.join(Self::generate_temp_name());
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| RepositoryError::io(&temp_path, e))?;
        let result = file
            .write_all(data)
            .map_err(|e| RepositoryError::io(&temp_path, e))
            .and_then(|_| {
                std::fs::rename(&temp_path, &full_path)
                    .map_err(|e| RepositoryError::io(&full_path, e))
            });

        if result.is_err() {
            let _ = std::fs::remove_file(&temp_path);
        }
        result
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let full_path = self.root.join(path);

        match std::fs::remove_file(&full_path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(RepositoryError::io(full_path, error)),
        }
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        let full_path = self.root.join(path);
        std::fs::create_dir_all(&full_path).map_err(|e| RepositoryError::io(full_path, e))
    }

    fn list_files_under(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let full_root = self.root.join(root);
        if !full_root.exists() {
            return Err(RepositoryError::not_found("file", root.display()));
        }

        let mut files = WalkDir::new(&full_root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(&self.root)
                    .ok()
                    .map(Path::to_path_buf)
            })
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RefCell<BTreeMap<PathBuf, Bytes>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(path: &Path) -> PathBuf {
        path.components()
            .filter(|component| !matches!(component, std::path::Component::CurDir))
            .collect()
    }
}

impl Storage for MemoryStorage {
    fn exists(&self, path: &Path) -> bool {
        let path = Self::normalize(path);
        self.files
            .borrow()
            .keys()
            .any(|file| file.starts_with(&path))
    }

    fn read(&self, path: &Path) -> Result<Bytes> {
        self.files
            .borrow()
            .get(&Self::normalize(path))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("file", path.display()))
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        self.files
            .borrow_mut()
            .insert(Self::normalize(path), Bytes::copy_from_slice(data));
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.files.borrow_mut().remove(&Self::normalize(path));
        Ok(())
    }

    // Directories are implicit in the key space.
    fn create_dir(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn list_files_under(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let root = Self::normalize(root);
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|file| file.starts_with(&root))
            .cloned()
            .collect())
    }
}
