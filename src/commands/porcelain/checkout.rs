use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use tracing::{debug, info};

const DETACHMENT_NOTICE: &str = r#"
You are in 'detached HEAD' state. You can look around, make experimental
changes and commit them, and you can discard any commits you make in this
state without impacting any branches by performing another checkout.

If you want to create a new branch to retain commits you create, you may
do so (now or later) by using the branch command. Example:

    minigit branch <new-branch-name>
"#;

impl Repository {
    pub fn checkout(&self, target: &str) -> anyhow::Result<()> {
        let target_revision = Revision::resolve(target, self)?;
        let target_oid = target_revision.commit_oid(self)?;

        let was_attached = self.refs().current_branch()?.is_some();
        let current_oid = self.refs().read_head()?;
        let current_files = self.snapshot(current_oid.as_ref())?;
        let target_files = self.snapshot(Some(&target_oid))?;

        // Files tracked by the old commit but absent from the target go away
        for path in current_files
            .keys()
            .filter(|path| !target_files.contains_key(*path))
        {
            debug!(path = %path.display(), "removing file");
            self.workspace().remove_file(path)?;
        }

        for (path, blob_oid) in &target_files {
            let blob = self.database().load_blob(blob_oid)?;
            self.workspace().write_file(path, blob.content())?;
        }

        {
            let mut index = self.index();
            index.clear();
            index.write_updates()?;
        }

        match target_revision.branch_name() {
            Some(branch_name) => {
                self.refs().set_head_to_branch(branch_name)?;
                info!(branch = %branch_name, oid = %target_oid, "switched branch");

                writeln!(self.writer(), "Switched to branch {}", branch_name)?;
            }
            None => {
                self.refs().set_head_detached(&target_oid)?;
                info!(oid = %target_oid, "detached HEAD");

                if was_attached {
                    write!(self.writer(), "{}", DETACHMENT_NOTICE)?;
                }
                writeln!(
                    self.writer(),
                    "Switched to commit {}",
                    target_oid.to_short_oid()
                )?;
            }
        }

        Ok(())
    }
}
