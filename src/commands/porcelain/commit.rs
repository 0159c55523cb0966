use crate::areas::repository::Repository;
use crate::errors::RepositoryError;

impl Repository {
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let mut index = self.index();

        // Load the index file from the disk
        index.rehydrate()?;
        if index.is_empty() {
            return Err(RepositoryError::NothingToCommit.into());
        }

        let parent = self.refs().read_head()?;
        let is_root = match parent {
            Some(_) => "",
            None => " (root-commit)",
        };

        let message = message.trim();
        let commit_oid = self.commit_snapshot(index.entries(), message, parent.as_ref())?;
        self.refs().update_head(&commit_oid)?;

        index.clear();
        index.write_updates()?;

        let location = match self.refs().current_branch()? {
            Some(branch_name) => branch_name.to_string(),
            None => "detached HEAD".to_string(),
        };

        writeln!(
            self.writer(),
            "[{}{} {}] {}",
            location,
            is_root,
            commit_oid.to_short_oid(),
            message.lines().next().unwrap_or_default()
        )?;

        Ok(())
    }
}
