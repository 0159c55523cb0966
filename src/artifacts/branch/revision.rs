use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};

/// A commit named on the command line
///
/// Supported formats:
/// - Branch names: `master`, `feature/login`
/// - Full object IDs: 40 lowercase hexadecimal characters
///
/// A name that is both an existing branch and a valid object ID resolves
/// to the branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Branch(BranchName),
    Commit(ObjectId),
}

impl Revision {
    pub fn resolve(name: &str, repository: &Repository) -> Result<Self> {
        if let Ok(branch_name) = BranchName::try_parse(name)
            && repository.refs().branch_exists(&branch_name)
        {
            return Ok(Revision::Branch(branch_name));
        }

        match ObjectId::try_parse(name) {
            Ok(oid) if repository.database().contains(&oid) => {
                // anything stored that is not a commit fails to parse here
                repository.database().load_commit(&oid)?;
                Ok(Revision::Commit(oid))
            }
            _ => Err(RepositoryError::not_found("revision", name)),
        }
    }

    pub fn branch_name(&self) -> Option<&BranchName> {
        match self {
            Revision::Branch(branch_name) => Some(branch_name),
            Revision::Commit(_) => None,
        }
    }

    /// Commit the revision points at; an unborn branch has none
    pub fn commit_oid(&self, repository: &Repository) -> Result<ObjectId> {
        match self {
            Revision::Branch(branch_name) => repository
                .refs()
                .read_branch(branch_name)?
                .ok_or(RepositoryError::NoCommits),
            Revision::Commit(oid) => Ok(oid.clone()),
        }
    }
}
