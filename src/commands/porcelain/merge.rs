use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::merge::MergeResult;
use crate::artifacts::merge::resolution::MergeAction;
use crate::errors::RepositoryError;
use colored::Colorize;

impl Repository {
    /// Merge `branch_name` into the current branch (or detached HEAD)
    pub fn merge(&self, branch_name: &str) -> anyhow::Result<()> {
        let current_oid = self
            .refs()
            .read_head()?
            .ok_or(RepositoryError::NoCommits)?;
        let branch_name = BranchName::try_parse(branch_name)?;
        let target_oid = self
            .refs()
            .read_branch(&branch_name)?
            .ok_or(RepositoryError::NoCommits)?;

        let Some(plan) = self.plan_merge(&current_oid, &target_oid)? else {
            writeln!(self.writer(), "Already up to date")?;
            return Ok(());
        };

        writeln!(
            self.writer(),
            "Merging branch '{}' ({}) into current branch ({})",
            branch_name,
            target_oid.to_short_oid(),
            current_oid.to_short_oid()
        )?;

        for (path, action) in plan.actions() {
            let path = path.display();
            match action {
                MergeAction::TakeNew(_) => writeln!(
                    self.writer(),
                    "Taking new file from branch '{}': {}",
                    branch_name,
                    path
                )?,
                MergeAction::TakeChanges(_) => writeln!(
                    self.writer(),
                    "Taking changes from branch '{}' for: {}",
                    branch_name,
                    path
                )?,
                MergeAction::ContentConflict { .. } => writeln!(
                    self.writer(),
                    "{}",
                    format!("CONFLICT (content): {} modified in both branches", path).red()
                )?,
                MergeAction::Remove => writeln!(
                    self.writer(),
                    "Removing file deleted in branch '{}': {}",
                    branch_name,
                    path
                )?,
                MergeAction::DeleteModifyConflict => writeln!(
                    self.writer(),
                    "{}",
                    format!(
                        "CONFLICT (delete/modify): {} was deleted in branch '{}' \
                         but modified in current branch",
                        path, branch_name
                    )
                    .red()
                )?,
                MergeAction::ModifyDeleteConflict => writeln!(
                    self.writer(),
                    "{}",
                    format!(
                        "CONFLICT (modify/delete): {} was modified in branch '{}' \
                         but deleted in current branch",
                        path, branch_name
                    )
                    .red()
                )?,
                MergeAction::Keep => {}
            }
        }

        match self.apply_merge(&plan, &current_oid, &target_oid, branch_name.as_ref())? {
            MergeResult::Conflicted(_) => writeln!(
                self.writer(),
                "Merge conflicts detected. Resolve them and commit the result."
            )?,
            MergeResult::Merged(merge_oid) => writeln!(
                self.writer(),
                "Merge successful. New commit: {}",
                merge_oid.to_short_oid()
            )?,
            MergeResult::AlreadyUpToDate => writeln!(self.writer(), "Already up to date")?,
        }

        Ok(())
    }
}
