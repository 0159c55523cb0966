use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub oneline: bool,
}

impl Repository {
    pub fn log(&self, opts: &LogOptions) -> anyhow::Result<()> {
        let Some(head_oid) = self.refs().read_head()? else {
            writeln!(self.writer(), "No commits yet")?;
            return Ok(());
        };

        let decorations = self.branch_decorations()?;

        for entry in self.history(head_oid) {
            let (commit_oid, commit) = entry?;
            let decoration = decorations
                .get(&commit_oid)
                .map(|names| format!(" ({})", names.join(", ")).yellow().to_string())
                .unwrap_or_default();

            if opts.oneline {
                self.show_commit_oneline(&commit_oid, &commit, &decoration)?;
            } else {
                // Display the commit in medium format
                self.show_commit_medium(&commit_oid, &commit, &decoration)?;
                writeln!(self.writer())?;
            }
        }

        Ok(())
    }

    fn show_commit_medium(
        &self,
        commit_oid: &ObjectId,
        commit: &Commit,
        decoration: &str,
    ) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{}{}",
            format!("commit {}", commit_oid).yellow(),
            decoration
        )?;
        if let [first, second] = commit.parents() {
            writeln!(
                self.writer(),
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }
        writeln!(self.writer(), "Date:   {}", commit.readable_timestamp())?;
        writeln!(self.writer())?;
        for message_line in commit.message().lines() {
            writeln!(self.writer(), "    {}", message_line)?;
        }

        Ok(())
    }

    fn show_commit_oneline(
        &self,
        commit_oid: &ObjectId,
        commit: &Commit,
        decoration: &str,
    ) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{}{} {}",
            commit_oid.to_short_oid().yellow(),
            decoration,
            commit.short_message()
        )?;

        Ok(())
    }

    /// Branch names per commit, `HEAD -> name` first for the current branch
    fn branch_decorations(&self) -> anyhow::Result<HashMap<ObjectId, Vec<String>>> {
        let current_branch = self.refs().current_branch()?;
        let mut decorations = HashMap::<ObjectId, Vec<String>>::new();

        if current_branch.is_none()
            && let Some(head_oid) = self.refs().read_head()?
        {
            decorations.entry(head_oid).or_default().push("HEAD".to_string());
        }

        for branch_name in self.refs().list_branches()? {
            let Some(tip) = self.refs().read_branch(&branch_name)? else {
                continue;
            };
            let names = decorations.entry(tip).or_default();

            if current_branch.as_ref() == Some(&branch_name) {
                names.insert(0, format!("HEAD -> {}", branch_name));
            } else {
                names.push(branch_name.to_string());
            }
        }

        Ok(decorations)
    }
}
