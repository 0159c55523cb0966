use crate::areas::repository::Repository;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::debug;

impl Repository {
    pub fn add(&self, paths: &[PathBuf]) -> anyhow::Result<()> {
        let mut index = self.index();

        // Load the index file from the disk
        index.rehydrate()?;

        // Expand every argument first so a bad one leaves the index untouched
        let files = paths
            .iter()
            .map(|path| {
                let path = path.strip_prefix(self.path()).unwrap_or(path.as_path());
                self.workspace().expand_path(path)
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect::<BTreeSet<_>>();

        for file in files {
            let blob = self.workspace().read_file(&file)?;
            let blob_oid = self.database().store(&blob)?;
            debug!(path = %file.display(), oid = %blob_oid, "staged file");

            writeln!(self.writer(), "Added {} to staging area", file.display())?;
            index.add(file, blob_oid);
        }

        index.write_updates()?;

        Ok(())
    }
}
