use crate::artifacts::diff::line_diff::{Edit, diff_lines};
use crate::artifacts::objects::commit::FileMap;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    Added,
    Removed,
    Modified,
}

impl FileChange {
    pub fn from_entries(old: Option<&ObjectId>, new: Option<&ObjectId>) -> Option<Self> {
        match (old, new) {
            (None, Some(_)) => Some(FileChange::Added),
            (Some(_), None) => Some(FileChange::Removed),
            (Some(old), Some(new)) if old != new => Some(FileChange::Modified),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub change: FileChange,
    pub edits: Vec<Edit<String>>,
}

impl FileDiff {
    /// e.g. `*** Modified: src/main.rs`
    pub fn title(&self) -> String {
        let label = match self.change {
            FileChange::Added => "+++ Added",
            FileChange::Removed => "--- Removed",
            FileChange::Modified => "*** Modified",
        };
        format!("{}: {}", label, self.path.display())
    }

    pub fn old_label(&self) -> String {
        format!("--- a/{}", self.path.display())
    }

    pub fn new_label(&self) -> String {
        format!("+++ b/{}", self.path.display())
    }
}

impl Display for FileDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title())?;
        writeln!(f, "{}", self.old_label())?;
        writeln!(f, "{}", self.new_label())?;
        for edit in &self.edits {
            writeln!(f, "{}", edit)?;
        }
        writeln!(f)
    }
}

/// Per-file line diffs between two snapshots, in path order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    files: Vec<FileDiff>,
}

impl DiffReport {
    /// Compare two snapshots; the resolvers turn an entry of the old or new
    /// side into its text
    pub fn between<OldContentFn, NewContentFn>(
        old: &FileMap,
        new: &FileMap,
        old_content: OldContentFn,
        new_content: NewContentFn,
    ) -> Result<Self>
    where
        OldContentFn: Fn(&Path, &ObjectId) -> Result<String>,
        NewContentFn: Fn(&Path, &ObjectId) -> Result<String>,
    {
        let all_paths = old.keys().chain(new.keys()).collect::<BTreeSet<_>>();
        let mut files = Vec::new();

        for path in all_paths {
            let (old_oid, new_oid) = (old.get(path), new.get(path));
            let Some(change) = FileChange::from_entries(old_oid, new_oid) else {
                continue;
            };

            let old_text = match old_oid {
                Some(oid) => old_content(path, oid)?,
                None => String::new(),
            };
            let new_text = match new_oid {
                Some(oid) => new_content(path, oid)?,
                None => String::new(),
            };

            files.push(FileDiff {
                path: path.clone(),
                change,
                edits: diff_lines(&old_text, &new_text),
            });
        }

        Ok(DiffReport { files })
    }

    pub fn files(&self) -> &[FileDiff] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Display for DiffReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.files.iter().try_for_each(|file| write!(f, "{}", file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RepositoryError;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct Contents(HashMap<ObjectId, String>);

    impl Contents {
        fn new(texts: &[&str]) -> Self {
            Contents(
                texts
                    .iter()
                    .map(|text| (ObjectId::hash(text.as_bytes()), text.to_string()))
                    .collect(),
            )
        }

        fn resolve(&self, _path: &Path, oid: &ObjectId) -> Result<String> {
            self.0
                .get(oid)
                .cloned()
                .ok_or_else(|| RepositoryError::not_found("object", oid))
        }
    }

    fn snapshot(files: &[(&str, &str)]) -> FileMap {
        files
            .iter()
            .map(|(path, text)| (PathBuf::from(path), ObjectId::hash(text.as_bytes())))
            .collect()
    }

    #[test]
    fn report_lists_added_removed_and_modified_files() {
        let contents = Contents::new(&["keep\n", "old\n", "new\n", "gone\n", "fresh\n"]);
        let old = snapshot(&[("a.txt", "old\n"), ("b.txt", "gone\n"), ("same.txt", "keep\n")]);
        let new = snapshot(&[("a.txt", "new\n"), ("c.txt", "fresh\n"), ("same.txt", "keep\n")]);

        let report = DiffReport::between(
            &old,
            &new,
            |path, oid| contents.resolve(path, oid),
            |path, oid| contents.resolve(path, oid),
        )
        .unwrap();

        assert_eq!(
            report.to_string(),
            "*** Modified: a.txt\n\
             --- a/a.txt\n\
             +++ b/a.txt\n\
             - old\n\
             + new\n\
             \n\
             --- Removed: b.txt\n\
             --- a/b.txt\n\
             +++ b/b.txt\n\
             - gone\n\
             \n\
             +++ Added: c.txt\n\
             --- a/c.txt\n\
             +++ b/c.txt\n\
             + fresh\n\
             \n"
        );
    }

    #[test]
    fn identical_snapshots_give_empty_report() {
        let files = snapshot(&[("a.txt", "same\n")]);
        let report =
            DiffReport::between(&files, &files, |_, _| unreachable!(), |_, _| unreachable!())
                .unwrap();

        assert!(report.is_empty());
        assert_eq!(report.to_string(), "");
    }

    #[test]
    fn unresolvable_content_propagates() {
        let old = FileMap::new();
        let new = snapshot(&[("a.txt", "missing\n")]);
        let contents = Contents::new(&[]);

        let result = DiffReport::between(
            &old,
            &new,
            |path, oid| contents.resolve(path, oid),
            |path, oid| contents.resolve(path, oid),
        );

        assert!(result.unwrap_err().is_not_found());
    }
}
