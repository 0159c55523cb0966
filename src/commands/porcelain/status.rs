use crate::areas::repository::Repository;
use crate::artifacts::diff::snapshot_diff::FileChange;
use crate::artifacts::objects::commit::FileMap;
use colored::Colorize;
use std::collections::BTreeSet;
use std::path::PathBuf;

// Terminology:
// - staged changes: index entries that differ from the HEAD commit
// - unstaged changes: working tree files that differ from HEAD overlaid with the index
// - untracked files: working tree files known to neither HEAD nor the index
impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        let head_oid = self.refs().read_head()?;
        match self.refs().current_branch()? {
            Some(branch_name) => writeln!(self.writer(), "On branch {}", branch_name)?,
            None => writeln!(
                self.writer(),
                "HEAD detached at {}",
                head_oid
                    .as_ref()
                    .map(|oid| oid.to_short_oid())
                    .unwrap_or_default()
            )?,
        }

        let head_files = self.snapshot(head_oid.as_ref())?;
        let staged_files = index.entries();
        let mut tracked_files = head_files.clone();
        tracked_files.extend(staged_files.iter().map(|(path, oid)| (path.clone(), oid.clone())));
        let working_files = self.workspace().snapshot()?;

        let staged = Self::changes_between(&head_files, staged_files, staged_files.keys());
        let unstaged = Self::changes_between(&tracked_files, &working_files, tracked_files.keys());
        let untracked = working_files
            .keys()
            .filter(|path| !tracked_files.contains_key(*path))
            .collect::<Vec<_>>();

        if staged.is_empty() && unstaged.is_empty() && untracked.is_empty() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
            return Ok(());
        }

        if !staged.is_empty() {
            writeln!(self.writer(), "Changes to be committed:")?;
            for (path, change) in &staged {
                let label = match change {
                    FileChange::Added => "new file",
                    FileChange::Modified => "modified",
                    FileChange::Removed => "deleted",
                };
                let line = format!("\t{}:   {}", label, path.display());
                writeln!(self.writer(), "{}", line.green())?;
            }
            writeln!(self.writer())?;
        }

        if !unstaged.is_empty() {
            writeln!(self.writer(), "Changes not staged for commit:")?;
            for (path, change) in &unstaged {
                let label = match change {
                    FileChange::Removed => "deleted",
                    FileChange::Modified | FileChange::Added => "modified",
                };
                let line = format!("\t{}:   {}", label, path.display());
                writeln!(self.writer(), "{}", line.red())?;
            }
            writeln!(self.writer())?;
        }

        if !untracked.is_empty() {
            writeln!(self.writer(), "Untracked files:")?;
            for path in untracked {
                let line = format!("\t{}", path.display());
                writeln!(self.writer(), "{}", line.red())?;
            }
            writeln!(self.writer())?;
        }

        Ok(())
    }

    /// Changes from `old` to `new`, restricted to `paths`
    fn changes_between<'p>(
        old: &FileMap,
        new: &FileMap,
        paths: impl Iterator<Item = &'p PathBuf>,
    ) -> Vec<(PathBuf, FileChange)> {
        paths
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|path| {
                FileChange::from_entries(old.get(path), new.get(path))
                    .map(|change| (path.clone(), change))
            })
            .collect()
    }
}
