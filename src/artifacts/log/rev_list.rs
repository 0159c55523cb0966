use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use derive_new::new;

/// Lazy walk along first parents, starting at (and including) `start`
#[derive(Clone, new)]
pub struct FirstParentChain<'d> {
    database: &'d Database,
    start: ObjectId,
}

impl<'d> IntoIterator for FirstParentChain<'d> {
    type Item = Result<(ObjectId, Commit)>;
    type IntoIter = FirstParentChainIter<'d>;

    fn into_iter(self) -> Self::IntoIter {
        FirstParentChainIter {
            database: self.database,
            current_commit_oid: Some(self.start),
        }
    }
}

#[derive(Clone)]
pub struct FirstParentChainIter<'d> {
    database: &'d Database,
    current_commit_oid: Option<ObjectId>,
}

impl Iterator for FirstParentChainIter<'_> {
    type Item = Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.current_commit_oid.take()?;

        match self.database.load_commit(&commit_oid) {
            Ok(commit) => {
                // Move to the first parent for the next iteration
                self.current_commit_oid = commit.parent().cloned();
                Some(Ok((commit_oid, commit)))
            }
            // The error is reported once, then the walk ends
            Err(error) => Some(Err(error)),
        }
    }
}
