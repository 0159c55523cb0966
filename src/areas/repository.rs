use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::storage::{FileStorage, Storage};
use crate::areas::workspace::{METADATA_DIR, Workspace};
use crate::artifacts::diff::snapshot_diff::DiffReport;
use crate::artifacts::log::rev_list::FirstParentChain;
use crate::artifacts::merge::MergeResult;
use crate::artifacts::merge::ancestor_finder::AncestorFinder;
use crate::artifacts::merge::resolution::{MergeAction, MergePlan, conflict_markers};
use crate::artifacts::objects::commit::{Commit, FileMap};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info};

/// Explicit context handed to every operation
///
/// Owns one shared [`Storage`] handle and the areas built on top of it.
/// Nothing about the repository lives in global state.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    storage: Rc<dyn Storage>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Open (or prepare for `init`) the repository rooted at `path`
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path).map_err(|e| RepositoryError::io(path, e))?;
        }
        let path = path
            .canonicalize()
            .map_err(|e| RepositoryError::io(path, e))?;

        let storage = Rc::new(FileStorage::new(path.clone().into_boxed_path()));
        Ok(Self::with_storage(storage, path.into_boxed_path(), writer))
    }

    /// Build a repository over any storage; `path` is only used for display
    pub fn with_storage(
        storage: Rc<dyn Storage>,
        path: Box<Path>,
        writer: Box<dyn std::io::Write>,
    ) -> Self {
        let metadata_path = Path::new(METADATA_DIR);

        Repository {
            path,
            writer: RefCell::new(writer),
            index: RefCell::new(Index::new(
                storage.clone(),
                metadata_path.join("index").into_boxed_path(),
            )),
            database: Database::new(
                storage.clone(),
                metadata_path.join("objects").into_boxed_path(),
            ),
            workspace: Workspace::new(storage.clone()),
            refs: Refs::new(storage.clone(), metadata_path.into()),
            storage,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute location of the metadata directory
    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_DIR)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn storage(&self) -> &Rc<dyn Storage> {
        &self.storage
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn is_initialized(&self) -> bool {
        self.storage.exists(&self.refs.head_path())
    }

    /// Files of a commit, or an empty snapshot for `None`
    pub fn snapshot(&self, commit_oid: Option<&ObjectId>) -> Result<FileMap> {
        match commit_oid {
            Some(oid) => Ok(self.database.load_commit(oid)?.into_files()),
            None => Ok(FileMap::new()),
        }
    }

    pub fn blob_text(&self, oid: &ObjectId) -> Result<String> {
        Ok(self.database.load_blob(oid)?.text())
    }

    /// Store a commit whose snapshot is the parent's files overlaid with the
    /// staged entries
    ///
    /// References are left untouched; the caller decides what to advance.
    pub fn commit_snapshot(
        &self,
        staged: &FileMap,
        message: &str,
        parent: Option<&ObjectId>,
    ) -> Result<ObjectId> {
        let mut files = self.snapshot(parent)?;
        files.extend(staged.iter().map(|(path, oid)| (path.clone(), oid.clone())));

        self.write_commit(parent.into_iter().cloned().collect(), files, message)
    }

    /// Store a commit after checking that everything it references exists
    pub fn write_commit(
        &self,
        parents: Vec<ObjectId>,
        files: FileMap,
        message: &str,
    ) -> Result<ObjectId> {
        if let Some(missing) = parents
            .iter()
            .chain(files.values())
            .find(|oid| !self.database.contains(oid))
        {
            return Err(RepositoryError::not_found("object", missing));
        }

        let commit = Commit::new(
            parents,
            Commit::timestamp_from_env(),
            files,
            message.to_string(),
        );
        let commit_oid = self.database.store(&commit)?;
        info!(oid = %commit_oid, parents = commit.parents().len(), "created commit");

        Ok(commit_oid)
    }

    /// Linear history starting at `start`, following first parents
    pub fn history(&self, start: ObjectId) -> FirstParentChain<'_> {
        FirstParentChain::new(&self.database, start)
    }

    pub fn common_ancestor(&self, source: &ObjectId, target: &ObjectId) -> Option<ObjectId> {
        AncestorFinder::new(|oid| {
            self.database
                .load_commit(oid)
                .map(|commit| commit.parents().to_vec())
        })
        .find_common_ancestor(source, target)
    }

    /// Classify every file of a three-way merge; `None` when there is
    /// nothing to merge
    pub fn plan_merge(
        &self,
        current_tip: &ObjectId,
        target_tip: &ObjectId,
    ) -> Result<Option<MergePlan>> {
        if current_tip == target_tip {
            return Ok(None);
        }

        let ancestor = self.common_ancestor(current_tip, target_tip);
        debug!(
            current = %current_tip,
            target = %target_tip,
            ancestor = ?ancestor.as_ref().map(ObjectId::to_short_oid),
            "merge base"
        );

        if ancestor.as_ref() == Some(target_tip) {
            // target is already part of the current history
            return Ok(None);
        }

        let current_files = self.snapshot(Some(current_tip))?;
        let target_files = self.snapshot(Some(target_tip))?;
        let ancestor_files = self.snapshot(ancestor.as_ref())?;

        Ok(Some(MergePlan::build(
            &ancestor_files,
            &current_files,
            &target_files,
        )))
    }

    /// Write the planned changes into the working tree, then commit them
    /// unless a conflict was found
    pub fn apply_merge(
        &self,
        plan: &MergePlan,
        current_tip: &ObjectId,
        target_tip: &ObjectId,
        target_label: &str,
    ) -> Result<MergeResult> {
        for (path, action) in plan.actions() {
            match action {
                MergeAction::TakeNew(oid) | MergeAction::TakeChanges(oid) => {
                    let blob = self.database.load_blob(oid)?;
                    self.workspace.write_file(path, blob.content())?;
                }
                MergeAction::ContentConflict { current, target } => {
                    let content = conflict_markers(
                        &self.blob_text(current)?,
                        &self.blob_text(target)?,
                        target_label,
                    );
                    self.workspace.write_file(path, content.as_bytes())?;
                }
                MergeAction::Remove => self.workspace.remove_file(path)?,
                MergeAction::DeleteModifyConflict
                | MergeAction::ModifyDeleteConflict
                | MergeAction::Keep => {}
            }
        }

        if plan.has_conflicts() {
            let conflicts = plan.conflicts();
            info!(conflicts = conflicts.len(), "merge stopped on conflicts");
            return Ok(MergeResult::Conflicted(conflicts));
        }

        let merge_oid = self.write_commit(
            vec![current_tip.clone(), target_tip.clone()],
            plan.merged().clone(),
            &format!("Merge branch '{}'", target_label),
        )?;
        self.refs.update_head(&merge_oid)?;

        Ok(MergeResult::Merged(merge_oid))
    }

    /// Three-way merge of `target_tip` into `current_tip`
    pub fn merge_commits(
        &self,
        current_tip: &ObjectId,
        target_tip: &ObjectId,
        target_label: &str,
    ) -> Result<MergeResult> {
        match self.plan_merge(current_tip, target_tip)? {
            None => Ok(MergeResult::AlreadyUpToDate),
            Some(plan) => self.apply_merge(&plan, current_tip, target_tip, target_label),
        }
    }

    /// Line diff of two snapshots whose blobs are all stored
    pub fn diff_commits(&self, old: &FileMap, new: &FileMap) -> Result<DiffReport> {
        DiffReport::between(
            old,
            new,
            |_, oid| self.blob_text(oid),
            |_, oid| self.blob_text(oid),
        )
    }

    /// Line diff of a snapshot against the working tree
    pub fn diff_workspace(&self, old: &FileMap) -> Result<DiffReport> {
        let working = self.workspace.snapshot()?;

        DiffReport::between(
            old,
            &working,
            |_, oid| self.blob_text(oid),
            |path, _| Ok(self.workspace.read_file(path)?.text()),
        )
    }
}
