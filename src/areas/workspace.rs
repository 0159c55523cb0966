use crate::areas::storage::Storage;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::FileMap;
use crate::artifacts::objects::object::Object;
use crate::errors::{RepositoryError, Result};
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

/// Name of the metadata directory, never part of the working tree
pub const METADATA_DIR: &str = ".minigit";

const IGNORED_PATHS: [&str; 1] = [METADATA_DIR];

#[derive(Debug)]
pub struct Workspace {
    storage: Rc<dyn Storage>,
}

impl Workspace {
    pub fn new(storage: Rc<dyn Storage>) -> Self {
        Workspace { storage }
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| match component {
            Component::Normal(name) => IGNORED_PATHS.contains(&name.to_string_lossy().as_ref()),
            _ => false,
        })
    }

    /// Every working-tree file, relative to the root, sorted
    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .storage
            .list_files_under(Path::new(""))?
            .into_iter()
            .filter(|path| !Self::is_ignored(path))
            .collect())
    }

    /// Expand a user-supplied path into the files it names
    ///
    /// A file expands to itself; a directory to every file beneath it.
    /// Paths holding a newline are rejected, since tracked paths are stored
    /// one per line.
    pub fn expand_path(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let path = Self::normalize(path);

        if Self::is_ignored(&path) {
            return Ok(vec![]);
        }
        Self::check_path(&path)?;
        if !self.storage.exists(&path) {
            return Err(RepositoryError::not_found("file", path.display()));
        }

        self.storage
            .list_files_under(&path)?
            .into_iter()
            .filter(|file| !Self::is_ignored(file))
            .map(|file| Self::check_path(&file).map(|_| file))
            .collect()
    }

    fn check_path(path: &Path) -> Result<()> {
        let text = path.to_string_lossy();
        if text.contains('\n') {
            return Err(RepositoryError::InvalidPath(text.into_owned()));
        }
        Ok(())
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.storage.exists(path)
    }

    pub fn read_file(&self, path: &Path) -> Result<Blob> {
        Ok(Blob::new(self.storage.read(path)?))
    }

    pub fn write_file(&self, path: &Path, content: &[u8]) -> Result<()> {
        self.storage.write(path, content)
    }

    pub fn remove_file(&self, path: &Path) -> Result<()> {
        self.storage.remove(path)
    }

    /// Digest every working-tree file without storing anything
    pub fn snapshot(&self) -> Result<FileMap> {
        self.list_files()?
            .into_iter()
            .map(|path| {
                let oid = self.read_file(&path)?.object_id()?;
                Ok((path, oid))
            })
            .collect()
    }

    fn normalize(path: &Path) -> PathBuf {
        path.components()
            .filter(|component| !matches!(component, Component::CurDir))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::storage::MemoryStorage;
    use crate::artifacts::objects::object_id::ObjectId;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn workspace() -> Workspace {
        let storage = Rc::new(MemoryStorage::new());
        storage.write(Path::new("a.txt"), b"a\n").unwrap();
        storage.write(Path::new("dir/b.txt"), b"b\n").unwrap();
        storage.write(Path::new("dir/sub/c.txt"), b"c\n").unwrap();
        storage
            .write(Path::new(".minigit/objects/ab/cdef"), b"object")
            .unwrap();
        Workspace::new(storage)
    }

    #[rstest]
    fn metadata_directory_is_not_listed(workspace: Workspace) {
        assert_eq!(
            workspace.list_files().unwrap(),
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("dir/b.txt"),
                PathBuf::from("dir/sub/c.txt"),
            ]
        );
    }

    #[rstest]
    #[case("a.txt", vec!["a.txt"])]
    #[case("./a.txt", vec!["a.txt"])]
    #[case("dir", vec!["dir/b.txt", "dir/sub/c.txt"])]
    #[case(".", vec!["a.txt", "dir/b.txt", "dir/sub/c.txt"])]
    #[case(".minigit", vec![])]
    fn paths_expand_to_files(
        workspace: Workspace,
        #[case] path: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(
            workspace.expand_path(Path::new(path)).unwrap(),
            expected.into_iter().map(PathBuf::from).collect::<Vec<_>>()
        );
    }

    #[rstest]
    fn missing_path_is_not_found(workspace: Workspace) {
        assert!(workspace
            .expand_path(Path::new("missing.txt"))
            .unwrap_err()
            .is_not_found());
    }

    #[rstest]
    #[case("bad\nname.txt")]
    #[case(".")]
    #[case("dir")]
    fn paths_with_newlines_are_rejected(workspace: Workspace, #[case] path: &str) {
        workspace
            .write_file(Path::new("dir/bad\nname.txt"), b"x\n")
            .unwrap();
        workspace.write_file(Path::new("bad\nname.txt"), b"x\n").unwrap();

        assert!(matches!(
            workspace.expand_path(Path::new(path)),
            Err(RepositoryError::InvalidPath(_))
        ));
    }

    #[rstest]
    fn snapshot_hashes_without_storing(workspace: Workspace) {
        let snapshot = workspace.snapshot().unwrap();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(
            snapshot.get(Path::new("a.txt")),
            Some(&ObjectId::hash(b"a\n"))
        );
        let object_path = Path::new(".minigit/objects").join(ObjectId::hash(b"a\n").to_path());
        assert!(!workspace.exists(&object_path));
    }
}
