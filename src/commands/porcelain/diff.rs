use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::diff::line_diff::Edit;
use crate::artifacts::diff::snapshot_diff::DiffReport;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;

impl Repository {
    /// Compare two commits, or one commit (HEAD by default) against the
    /// working tree
    pub fn diff(&self, old: Option<&str>, new: Option<&str>) -> anyhow::Result<()> {
        let old_oid = match old {
            Some(name) => self.resolve_commit(name)?,
            None => match self.refs().read_head()? {
                Some(head_oid) => head_oid,
                None => {
                    writeln!(self.writer(), "No commits to compare")?;
                    return Ok(());
                }
            },
        };
        let old_files = self.snapshot(Some(&old_oid))?;

        let report = match new {
            Some(name) => {
                let new_oid = self.resolve_commit(name)?;
                writeln!(
                    self.writer(),
                    "Comparing commit {} with {}:",
                    old_oid.to_short_oid(),
                    new_oid.to_short_oid()
                )?;
                self.diff_commits(&old_files, &self.snapshot(Some(&new_oid))?)?
            }
            None => {
                writeln!(
                    self.writer(),
                    "Comparing working directory against commit {}:",
                    old_oid.to_short_oid()
                )?;
                self.diff_workspace(&old_files)?
            }
        };

        self.print_report(&report)
    }

    fn resolve_commit(&self, name: &str) -> anyhow::Result<ObjectId> {
        Ok(Revision::resolve(name, self)?.commit_oid(self)?)
    }

    fn print_report(&self, report: &DiffReport) -> anyhow::Result<()> {
        for file in report.files() {
            writeln!(self.writer(), "{}", file.title().bold())?;
            writeln!(self.writer(), "{}", file.old_label().bold())?;
            writeln!(self.writer(), "{}", file.new_label().bold())?;

            for edit in &file.edits {
                let line = edit.to_string();
                match edit {
                    Edit::Delete { .. } => writeln!(self.writer(), "{}", line.red())?,
                    Edit::Insert { .. } => writeln!(self.writer(), "{}", line.green())?,
                    Edit::Equal { .. } => writeln!(self.writer(), "{}", line)?,
                }
            }
            writeln!(self.writer())?;
        }

        Ok(())
    }
}
