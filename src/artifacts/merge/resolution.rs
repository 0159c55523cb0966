//! Per-file three-way classification
//!
//! Every path present in any of the ancestor, current or target snapshots is
//! classified by comparing its three blob IDs (absent counts as its own
//! value):
//!
//! | ancestor | current      | target                    | action                   |
//! |----------|--------------|---------------------------|--------------------------|
//! | absent   | absent       | present                   | take target's blob       |
//! | present  | == ancestor  | present, != ancestor      | take target's blob       |
//! | present  | != ancestor  | != ancestor, != current   | content conflict         |
//! | present  | == ancestor  | absent                    | remove                   |
//! | present  | != ancestor  | absent                    | delete/modify conflict   |
//! | present  | absent       | present, != ancestor      | modify/delete conflict   |
//! | otherwise |            |                           | keep the current side    |
//!
//! Classification is pure; writing files and reporting is left to the
//! caller.

use crate::artifacts::merge::{Conflict, ConflictKind};
use crate::artifacts::objects::commit::FileMap;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    /// The file only exists on the target side
    TakeNew(ObjectId),
    /// Only the target side changed the file
    TakeChanges(ObjectId),
    /// Both sides changed the file, differently
    ContentConflict {
        current: ObjectId,
        target: ObjectId,
    },
    /// The target side deleted a file the current side left alone
    Remove,
    /// The target side deleted a file the current side modified
    DeleteModifyConflict,
    /// The current side deleted a file the target side modified
    ModifyDeleteConflict,
    Keep,
}

impl MergeAction {
    pub fn classify(
        ancestor: Option<&ObjectId>,
        current: Option<&ObjectId>,
        target: Option<&ObjectId>,
    ) -> Self {
        match (ancestor, current, target) {
            (None, None, Some(target)) => MergeAction::TakeNew(target.clone()),
            (Some(ancestor), Some(current), Some(target))
                if current == ancestor && target != ancestor =>
            {
                MergeAction::TakeChanges(target.clone())
            }
            (Some(ancestor), Some(current), Some(target))
                if current != ancestor && target != ancestor && current != target =>
            {
                MergeAction::ContentConflict {
                    current: current.clone(),
                    target: target.clone(),
                }
            }
            (Some(ancestor), Some(current), None) if ancestor == current => MergeAction::Remove,
            (Some(_), Some(_), None) => MergeAction::DeleteModifyConflict,
            (Some(ancestor), None, Some(target)) if target != ancestor => {
                MergeAction::ModifyDeleteConflict
            }
            _ => MergeAction::Keep,
        }
    }

    pub fn conflict_kind(&self) -> Option<ConflictKind> {
        match self {
            MergeAction::ContentConflict { .. } => Some(ConflictKind::Content),
            MergeAction::DeleteModifyConflict | MergeAction::ModifyDeleteConflict => {
                Some(ConflictKind::DeleteModify)
            }
            _ => None,
        }
    }
}

/// Outcome of classifying every path of a three-way merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Snapshot of the merge commit, starting from the current side
    merged: FileMap,
    /// Every path whose action is not [`MergeAction::Keep`], sorted by path
    actions: Vec<(PathBuf, MergeAction)>,
}

impl MergePlan {
    pub fn build(ancestor: &FileMap, current: &FileMap, target: &FileMap) -> Self {
        let all_paths = ancestor
            .keys()
            .chain(current.keys())
            .chain(target.keys())
            .collect::<BTreeSet<_>>();

        let mut merged = current.clone();
        let mut actions = Vec::new();

        for path in all_paths {
            let action =
                MergeAction::classify(ancestor.get(path), current.get(path), target.get(path));
            debug!(path = %path.display(), ?action, "classified path");

            match &action {
                MergeAction::TakeNew(oid) | MergeAction::TakeChanges(oid) => {
                    merged.insert(path.clone(), oid.clone());
                }
                MergeAction::Remove => {
                    merged.remove(path);
                }
                MergeAction::Keep => continue,
                MergeAction::ContentConflict { .. }
                | MergeAction::DeleteModifyConflict
                | MergeAction::ModifyDeleteConflict => {}
            }

            actions.push((path.clone(), action));
        }

        MergePlan { merged, actions }
    }

    pub fn merged(&self) -> &FileMap {
        &self.merged
    }

    pub fn into_merged(self) -> FileMap {
        self.merged
    }

    pub fn actions(&self) -> &[(PathBuf, MergeAction)] {
        &self.actions
    }

    pub fn conflicts(&self) -> Vec<Conflict> {
        self.actions
            .iter()
            .filter_map(|(path, action)| {
                action
                    .conflict_kind()
                    .map(|kind| Conflict::new(path.clone(), kind))
            })
            .collect()
    }

    pub fn has_conflicts(&self) -> bool {
        self.actions
            .iter()
            .any(|(_, action)| action.conflict_kind().is_some())
    }
}

/// Working-file content for a content conflict
///
/// Each side is terminated with a newline so the markers stay on their own
/// lines.
pub fn conflict_markers(current: &str, target: &str, target_label: &str) -> String {
    fn terminated(content: &str) -> String {
        if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{content}\n")
        }
    }

    format!(
        "<<<<<<< HEAD\n{}=======\n{}>>>>>>> {}\n",
        terminated(current),
        terminated(target),
        target_label
    )
}
