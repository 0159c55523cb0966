//! References (HEAD and branches)
//!
//! References are human-readable names pointing to commits. They can be:
//! - Direct: containing a commit digest
//! - Symbolic: pointing to another reference (e.g., HEAD -> refs/heads/master)
//!
//! ## File Format
//!
//! References are stored as text files containing either:
//! - A 40-character digest (direct reference)
//! - `ref: <path>` for symbolic references
//! - Nothing, for a branch with no commits yet

use crate::areas::storage::Storage;
use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use std::path::Path;
use std::rc::Rc;
use tracing::debug;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Symbolic references are followed at most this many times
const MAX_SYMREF_DEPTH: usize = 5;

#[derive(Debug)]
pub struct Refs {
    storage: Rc<dyn Storage>,
    /// Path to the metadata directory (typically `.minigit`)
    path: Box<Path>,
}

#[derive(Debug, Clone)]
enum SymRefOrOid {
    SymRef { sym_ref_name: SymRefName },
    Oid(ObjectId),
}

impl Refs {
    pub fn new(storage: Rc<dyn Storage>, path: Box<Path>) -> Self {
        Refs { storage, path }
    }

    fn read_symref_or_oid(&self, sym_ref_name: &SymRefName) -> Result<Option<SymRefOrOid>> {
        let path = self.path.join(sym_ref_name.as_ref_path());
        if !self.storage.exists(&path) {
            return Ok(None);
        }

        let content = self.storage.read(&path)?;
        let content = String::from_utf8_lossy(&content);
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)
            .map_err(|e| RepositoryError::corrupt("symref pattern", e))?
            .captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                sym_ref_name: SymRefName::new(symref_match[1].to_string()),
            }))
        } else {
            ObjectId::try_parse(content)
                .map(|oid| Some(SymRefOrOid::Oid(oid)))
                .map_err(|_| {
                    RepositoryError::corrupt(
                        format!("ref {}", sym_ref_name.as_ref_path()),
                        format!("invalid content {:?}", content),
                    )
                })
        }
    }

    /// Follow symbolic references starting at `source` and return the last
    /// name in the chain, e.g. HEAD -> `refs/heads/master`
    pub fn current_ref(&self) -> Result<SymRefName> {
        let mut current = SymRefName::new(HEAD_REF_NAME.to_string());

        for _ in 0..MAX_SYMREF_DEPTH {
            match self.read_symref_or_oid(&current)? {
                Some(SymRefOrOid::SymRef { sym_ref_name }) => current = sym_ref_name,
                Some(SymRefOrOid::Oid(_)) | None => return Ok(current),
            }
        }

        Err(RepositoryError::corrupt(
            HEAD_REF_NAME,
            "symbolic reference chain is too deep",
        ))
    }

    /// Name of the checked-out branch, `None` when HEAD is detached
    pub fn current_branch(&self) -> Result<Option<BranchName>> {
        BranchName::try_parse_sym_ref_name(&self.current_ref()?)
    }

    fn read_oid(&self, sym_ref_name: &SymRefName) -> Result<Option<ObjectId>> {
        match self.read_symref_or_oid(sym_ref_name)? {
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            Some(SymRefOrOid::SymRef { .. }) | None => Ok(None),
        }
    }

    /// The commit HEAD resolves to, `None` before the first commit
    pub fn read_head(&self) -> Result<Option<ObjectId>> {
        self.read_oid(&self.current_ref()?)
    }

    /// Advance whatever HEAD points to: the current branch, or HEAD itself
    /// when detached
    pub fn update_head(&self, oid: &ObjectId) -> Result<()> {
        let target = self.current_ref()?;
        debug!(reference = target.as_ref_path(), oid = %oid, "updating ref");

        self.write_ref(&target, oid.as_ref())
    }

    pub fn set_head_to_branch(&self, branch_name: &BranchName) -> Result<()> {
        let sym_ref = SymRefName::from_branch(branch_name);
        self.write_ref(
            &SymRefName::new(HEAD_REF_NAME.to_string()),
            &format!("ref: {}", sym_ref.as_ref_path()),
        )
    }

    pub fn set_head_detached(&self, oid: &ObjectId) -> Result<()> {
        self.write_ref(&SymRefName::new(HEAD_REF_NAME.to_string()), oid.as_ref())
    }

    fn write_ref(&self, sym_ref_name: &SymRefName, raw_ref: &str) -> Result<()> {
        self.storage
            .write(&self.path.join(sym_ref_name.as_ref_path()), raw_ref.as_bytes())
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.storage.exists(&self.branch_path(branch_name))
    }

    /// Tip of a branch; `None` for a branch with no commits yet
    pub fn read_branch(&self, branch_name: &BranchName) -> Result<Option<ObjectId>> {
        if !self.branch_exists(branch_name) {
            return Err(RepositoryError::not_found("branch", branch_name));
        }

        self.read_oid(&SymRefName::from_branch(branch_name))
    }

    pub fn create_branch(&self, branch_name: &BranchName, source_oid: &ObjectId) -> Result<()> {
        if self.branch_exists(branch_name) {
            return Err(RepositoryError::BranchExists(branch_name.to_string()));
        }

        self.write_ref(&SymRefName::from_branch(branch_name), source_oid.as_ref())
    }

    /// Create an empty branch file, used for the default branch at init
    pub fn create_unborn_branch(&self, branch_name: &BranchName) -> Result<()> {
        if !self.branch_exists(branch_name) {
            self.write_ref(&SymRefName::from_branch(branch_name), "")?;
        }

        Ok(())
    }

    pub fn delete_branch(&self, branch_name: &BranchName) -> Result<Option<ObjectId>> {
        let oid = self.read_branch(branch_name)?;
        self.storage.remove(&self.branch_path(branch_name))?;

        Ok(oid)
    }

    pub fn list_branches(&self) -> Result<Vec<BranchName>> {
        let heads_path = self.heads_path();
        if !self.storage.exists(&heads_path) {
            return Ok(vec![]);
        }

        self.storage
            .list_files_under(&heads_path)?
            .into_iter()
            .filter_map(|path| {
                path.strip_prefix(&heads_path)
                    .ok()
                    .map(|name| name.to_string_lossy().replace('\\', "/"))
            })
            .map(BranchName::try_parse)
            .collect()
    }

    fn branch_path(&self, branch_name: &BranchName) -> Box<Path> {
        self.path
            .join(SymRefName::from_branch(branch_name).as_ref_path())
            .into_boxed_path()
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
