use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::RepositoryError;
use colored::Colorize;
use tracing::info;

impl Repository {
    /// Create a branch at the current HEAD commit
    pub fn branch(&self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name)?;
        let source_oid = self
            .refs()
            .read_head()?
            .ok_or(RepositoryError::NoCommits)?;

        self.refs().create_branch(&branch_name, &source_oid)?;
        info!(branch = %branch_name, oid = %source_oid, "created branch");

        writeln!(self.writer(), "Created branch {}", branch_name)?;

        Ok(())
    }

    pub fn list_branches(&self) -> anyhow::Result<()> {
        let current_branch = self.refs().current_branch()?;

        for branch_name in self.refs().list_branches()? {
            if current_branch.as_ref() == Some(&branch_name) {
                writeln!(self.writer(), "* {}", branch_name.as_ref().green())?;
            } else {
                writeln!(self.writer(), "  {}", branch_name)?;
            }
        }

        Ok(())
    }

    pub fn delete_branch(&self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name)?;

        if self.refs().current_branch()?.as_ref() == Some(&branch_name) {
            return Err(RepositoryError::CurrentBranch(branch_name.to_string()).into());
        }

        match self.refs().delete_branch(&branch_name)? {
            Some(oid) => writeln!(
                self.writer(),
                "Deleted branch {} (was {}).",
                branch_name,
                oid.to_short_oid()
            )?,
            None => writeln!(self.writer(), "Deleted branch {}.", branch_name)?,
        }
        info!(branch = %branch_name, "deleted branch");

        Ok(())
    }
}
