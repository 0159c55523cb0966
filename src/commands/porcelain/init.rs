use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use anyhow::Context;
use tracing::info;

const DEFAULT_BRANCH: &str = "master";

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            writeln!(
                self.writer(),
                "minigit repository already initialized in {}",
                self.metadata_path().display()
            )?;
            return Ok(());
        }

        self.storage()
            .create_dir(self.database().objects_path())
            .context("Failed to create .minigit/objects directory")?;

        self.storage()
            .create_dir(&self.refs().heads_path())
            .context("Failed to create .minigit/refs/heads directory")?;

        let default_branch = BranchName::try_parse(DEFAULT_BRANCH)?;
        self.refs()
            .create_unborn_branch(&default_branch)
            .context("Failed to create default branch file")?;
        self.refs()
            .set_head_to_branch(&default_branch)
            .context("Failed to create initial HEAD reference")?;

        info!(path = %self.path().display(), "initialized repository");
        writeln!(
            self.writer(),
            "Initialized empty minigit repository in {}",
            self.metadata_path().display()
        )?;

        Ok(())
    }
}
