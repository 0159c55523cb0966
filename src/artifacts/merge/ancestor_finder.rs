//! Common ancestor search for merges
//!
//! ## Algorithm
//!
//! A bidirectional breadth-first search over parent links. Each side keeps
//! its own frontier (a FIFO queue) and a visited map of commit → depth,
//! seeded with its tip at depth 0. Every round pops one commit from the
//! source side, then one from the target side:
//!
//! - if the popped commit was already visited by the *other* side, it is
//!   returned straight away
//! - otherwise its parents not yet visited by this side are queued at
//!   depth + 1
//!
//! The search stops at the first intersection. In a history that
//! reconverges through several paths this is not always the lowest common
//! ancestor: a shallow link to an old commit can be met before the better
//! candidate further down the other path.
//!
//! A commit whose parents cannot be loaded (e.g. a dangling parent link)
//! is logged and treated as having no parents, so partially missing history
//! only prunes the search.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let finder = AncestorFinder::new(|oid| {
//!     database.load_commit(oid).map(|commit| commit.parents().to_vec())
//! });
//!
//! let merge_base = finder.find_common_ancestor(&current, &target);
//! ```

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, trace, warn};

#[derive(Debug, Default)]
struct Frontier {
    visited: HashMap<ObjectId, usize>,
    queue: VecDeque<(ObjectId, usize)>,
}

impl Frontier {
    fn seeded(tip: &ObjectId) -> Self {
        let mut frontier = Frontier::default();
        frontier.visited.insert(tip.clone(), 0);
        frontier.queue.push_back((tip.clone(), 0));
        frontier
    }

    fn has_visited(&self, oid: &ObjectId) -> bool {
        self.visited.contains_key(oid)
    }

    fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    fn enqueue_parents(&mut self, parents: Vec<ObjectId>, depth: usize) {
        for parent in parents {
            if !self.visited.contains_key(&parent) {
                self.visited.insert(parent.clone(), depth);
                self.queue.push_back((parent, depth));
            }
        }
    }
}

/// Finds a common ancestor of two commits
///
/// The parents loader abstracts over where commits live, so the same search
/// runs against the object store or an in-memory graph.
#[derive(Debug, Clone)]
pub struct AncestorFinder<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> Result<Vec<ObjectId>>,
{
    parents_loader: ParentsLoaderFn,
}

impl<ParentsLoaderFn> AncestorFinder<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> Result<Vec<ObjectId>>,
{
    pub fn new(parents_loader: ParentsLoaderFn) -> Self {
        Self { parents_loader }
    }

    /// The first commit reached from both `source` and `target`, or `None`
    /// when their histories never meet
    pub fn find_common_ancestor(&self, source: &ObjectId, target: &ObjectId) -> Option<ObjectId> {
        let mut source_side = Frontier::seeded(source);
        let mut target_side = Frontier::seeded(target);

        while !source_side.is_exhausted() || !target_side.is_exhausted() {
            if let Some(ancestor) = self.step(&mut source_side, &target_side) {
                return Some(ancestor);
            }
            if let Some(ancestor) = self.step(&mut target_side, &source_side) {
                return Some(ancestor);
            }
        }

        debug!(source = %source, target = %target, "no common ancestor");
        None
    }

    /// Pop one commit from `side`; return it if `other` has seen it,
    /// otherwise queue its parents
    fn step(&self, side: &mut Frontier, other: &Frontier) -> Option<ObjectId> {
        let (oid, depth) = side.queue.pop_front()?;

        if other.has_visited(&oid) {
            debug!(ancestor = %oid, depth, "found common ancestor");
            return Some(oid);
        }

        match (self.parents_loader)(&oid) {
            Ok(parents) => {
                trace!(oid = %oid, depth, parents = parents.len(), "expanding commit");
                side.enqueue_parents(parents, depth + 1);
            }
            Err(error) => {
                warn!(oid = %oid, %error, "cannot load commit during ancestor search");
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RepositoryError;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    /// In-memory commit graph: commit → parents
    #[derive(Debug, Clone, Default)]
    struct InMemoryCommitStore {
        commits: HashMap<ObjectId, Vec<ObjectId>>,
    }

    impl InMemoryCommitStore {
        fn add_commit(&mut self, name: &str, parents: &[&str]) {
            self.commits.insert(
                create_oid(name),
                parents.iter().map(|parent| create_oid(parent)).collect(),
            );
        }

        fn get_parents(&self, oid: &ObjectId) -> Result<Vec<ObjectId>> {
            self.commits
                .get(oid)
                .cloned()
                .ok_or_else(|| RepositoryError::not_found("commit", oid))
        }

        fn find(&self, source: &str, target: &str) -> Option<ObjectId> {
            AncestorFinder::new(|oid| self.get_parents(oid))
                .find_common_ancestor(&create_oid(source), &create_oid(target))
        }
    }

    fn create_oid(name: &str) -> ObjectId {
        ObjectId::hash(name.as_bytes())
    }

    #[fixture]
    fn linear_history() -> InMemoryCommitStore {
        // A <- B <- C
        let mut store = InMemoryCommitStore::default();
        store.add_commit("A", &[]);
        store.add_commit("B", &["A"]);
        store.add_commit("C", &["B"]);
        store
    }

    #[fixture]
    fn simple_merge() -> InMemoryCommitStore {
        //     A
        //    / \
        //   B   C
        //    \ /
        //     D
        let mut store = InMemoryCommitStore::default();
        store.add_commit("A", &[]);
        store.add_commit("B", &["A"]);
        store.add_commit("C", &["A"]);
        store.add_commit("D", &["B", "C"]);
        store
    }

    #[fixture]
    fn criss_cross_merge() -> InMemoryCommitStore {
        //     A
        //    / \
        //   B   C
        //   |\ /|
        //   | X |
        //   |/ \|
        //   D   E
        //   |   |
        //   F   G
        let mut store = InMemoryCommitStore::default();
        store.add_commit("A", &[]);
        store.add_commit("B", &["A"]);
        store.add_commit("C", &["A"]);
        store.add_commit("D", &["B", "C"]);
        store.add_commit("E", &["C", "B"]);
        store.add_commit("F", &["D"]);
        store.add_commit("G", &["E"]);
        store
    }

    #[rstest]
    #[case("C", "A", "A")]
    #[case("A", "C", "A")]
    #[case("B", "B", "B")]
    #[case("C", "B", "B")]
    fn linear_history_meets_at_the_older_commit(
        linear_history: InMemoryCommitStore,
        #[case] source: &str,
        #[case] target: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(
            linear_history.find(source, target),
            Some(create_oid(expected))
        );
    }

    #[rstest]
    fn diverged_branches_meet_at_fork_point(simple_merge: InMemoryCommitStore) {
        assert_eq!(simple_merge.find("B", "C"), Some(create_oid("A")));
        assert_eq!(simple_merge.find("D", "C"), Some(create_oid("C")));
    }

    #[rstest]
    fn criss_cross_returns_first_candidate_met(criss_cross_merge: InMemoryCommitStore) {
        // B and C are both best candidates; B is popped first from the source side
        assert_eq!(criss_cross_merge.find("F", "G"), Some(create_oid("B")));
    }

    #[test]
    fn first_intersection_can_miss_the_lowest_ancestor() {
        // A <- L <- Y
        //       \    \
        //        T    Cur (parents: A, Y)
        let mut store = InMemoryCommitStore::default();
        store.add_commit("A", &[]);
        store.add_commit("L", &["A"]);
        store.add_commit("Y", &["L"]);
        store.add_commit("Cur", &["A", "Y"]);
        store.add_commit("T", &["L"]);

        // L is the lowest common ancestor, but A is reached from both sides first
        assert_eq!(store.find("Cur", "T"), Some(create_oid("A")));
    }

    #[test]
    fn unrelated_histories_have_no_common_ancestor() {
        let mut store = InMemoryCommitStore::default();
        store.add_commit("A", &[]);
        store.add_commit("B", &["A"]);
        store.add_commit("X", &[]);
        store.add_commit("Y", &["X"]);

        assert_eq!(store.find("B", "Y"), None);
    }

    #[test]
    fn dangling_parent_only_prunes_the_search() {
        let mut store = InMemoryCommitStore::default();
        store.add_commit("A", &[]);
        store.add_commit("P", &["missing", "A"]);
        store.add_commit("T", &["A"]);

        assert_eq!(store.find("P", "T"), Some(create_oid("A")));
    }

    #[test]
    fn missing_tips_yield_no_ancestor() {
        let store = InMemoryCommitStore::default();

        assert_eq!(store.find("nowhere", "else"), None);
    }
}
