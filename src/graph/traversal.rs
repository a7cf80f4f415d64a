//! Priority-ordered traversal iterators over ancestor and descendant closures.
//!
//! These provide frontier+seen traversal without dynamic dispatch. A node
//! discovered through a shorter edge chain from the seeds dequeues before one
//! discovered through a longer chain; the owning [`Dag`]'s comparator breaks
//! ties within a level. Use via `Dag::iter_up`, `iter_up_from`, `iter_down`,
//! or `iter_down_from`.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::graph::bounds::IdLike;
use crate::graph::dag::Dag;
use crate::graph::node::Node;
use crate::graph_error::GraphError;

/// Which adjacency list a traversal expands.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Dir {
    Up,
    Down,
}

/// Single-visit traversal with a `(discovery level, comparator)` priority
/// frontier.
///
/// The level attached to a node is its level at first discovery, not a
/// guaranteed global shortest path; each node is expanded exactly once
/// regardless, so the closure itself is exact.
#[derive(Debug)]
pub(crate) struct PriorityTraversal<'a, I: IdLike> {
    dag: &'a Dag<I>,
    /// Scheduled entries, kept sorted descending so `pop()` yields the
    /// minimum. Among equal entries the earlier-scheduled one sits nearer
    /// the tail and dequeues first.
    frontier: Vec<(u32, I)>,
    /// Identities ever scheduled; guarantees each node is expanded at most
    /// once however many paths reach it.
    seen: HashSet<I>,
    dir: Dir,
    /// Comparator failure held back until the node whose expansion tripped
    /// it has been yielded. Once surfaced the iterator is fused.
    pending_err: Option<GraphError>,
    failed: bool,
}

impl<'a, I: IdLike> PriorityTraversal<'a, I> {
    /// Seeds the frontier at level 0. Seed identities must already be
    /// resolved against the node arena; duplicates are dropped.
    pub(crate) fn seeded(dag: &'a Dag<I>, seeds: Vec<I>, dir: Dir) -> Result<Self, GraphError> {
        let mut traversal = Self {
            dag,
            frontier: Vec::with_capacity(seeds.len()),
            seen: HashSet::with_capacity(seeds.len()),
            dir,
            pending_err: None,
            failed: false,
        };
        for id in seeds {
            if traversal.seen.insert(id.clone()) {
                traversal.enqueue(0, id)?;
            }
        }
        Ok(traversal)
    }

    /// Orders a frontier entry against a candidate: level first, then the
    /// dag's node comparator.
    fn entry_cmp(&self, entry: &(u32, I), level: u32, id: &I) -> Result<Ordering, GraphError> {
        match entry.0.cmp(&level) {
            Ordering::Equal => {}
            unequal => return Ok(unequal),
        }
        let a = self.dag.node_unchecked(&entry.1);
        let b = self.dag.node_unchecked(id);
        (self.dag.ordering())(a, b).ok_or_else(|| GraphError::improper_ordering(a.id(), b.id()))
    }

    fn enqueue(&mut self, level: u32, id: I) -> Result<(), GraphError> {
        // Binary search over the descending frontier. Insertion lands before
        // any equal entries, so those keep dequeue priority.
        let (mut lo, mut hi) = (0usize, self.frontier.len());
        while lo < hi {
            let mid = (lo + hi) / 2;
            match self.entry_cmp(&self.frontier[mid], level, &id)? {
                Ordering::Greater => lo = mid + 1,
                _ => hi = mid,
            }
        }
        self.frontier.insert(lo, (level, id));
        Ok(())
    }
}

impl<'a, I: IdLike> Iterator for PriorityTraversal<'a, I> {
    type Item = Result<&'a Node<I>, GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Some(err) = self.pending_err.take() {
            self.failed = true;
            return Some(Err(err));
        }
        let (level, id) = self.frontier.pop()?;
        let node = self.dag.node_unchecked(&id);
        let neighbors = match self.dir {
            Dir::Up => node.parent_ids(),
            Dir::Down => node.child_ids(),
        };
        for next_id in neighbors {
            if self.seen.insert(next_id.clone()) {
                if let Err(err) = self.enqueue(level + 1, next_id.clone()) {
                    self.pending_err = Some(err);
                    break;
                }
            }
        }
        Some(Ok(node))
    }
}

/// Upward traversal over the ancestor closure of its seeds.
#[derive(Debug)]
pub struct AncestorIter<'a, I: IdLike>(PriorityTraversal<'a, I>);

/// Downward traversal over the descendant closure of its seeds.
#[derive(Debug)]
pub struct DescendantIter<'a, I: IdLike>(PriorityTraversal<'a, I>);

impl<'a, I: IdLike> AncestorIter<'a, I> {
    pub(crate) fn new(dag: &'a Dag<I>, seeds: Vec<I>) -> Result<Self, GraphError> {
        Ok(AncestorIter(PriorityTraversal::seeded(dag, seeds, Dir::Up)?))
    }
}

impl<'a, I: IdLike> DescendantIter<'a, I> {
    pub(crate) fn new(dag: &'a Dag<I>, seeds: Vec<I>) -> Result<Self, GraphError> {
        Ok(DescendantIter(PriorityTraversal::seeded(dag, seeds, Dir::Down)?))
    }
}

impl<'a, I: IdLike> Iterator for AncestorIter<'a, I> {
    type Item = Result<&'a Node<I>, GraphError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

impl<'a, I: IdLike> Iterator for DescendantIter<'a, I> {
    type Item = Result<&'a Node<I>, GraphError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

#[cfg(test)]
mod frontier_tests {
    use crate::graph::dag::{CyclePolicy, Dag};
    use crate::graph::node::Node;

    fn collect_ids(iter: impl Iterator<Item = Result<&'static str, crate::GraphError>>) -> Vec<&'static str> {
        iter.map(|r| r.expect("total ordering")).collect()
    }

    #[test]
    fn shorter_chains_dequeue_first() {
        let mut dag = Dag::new();
        dag.add_node(Node::new("a"), CyclePolicy::Strict).unwrap();
        dag.add_node(Node::new("b").with_parents(["a"]), CyclePolicy::Strict)
            .unwrap();
        dag.add_node(Node::new("c").with_parents(["b"]), CyclePolicy::Strict)
            .unwrap();
        // "z" is a direct child of "a": level 1, after "a" but before the
        // level-2 node "c".
        dag.add_node(Node::new("z").with_parents(["a"]), CyclePolicy::Strict)
            .unwrap();

        let order = collect_ids(
            dag.iter_down(&"a")
                .unwrap()
                .map(|r| r.map(|n| *n.id())),
        );
        assert_eq!(order, ["a", "b", "z", "c"]);
    }

    #[test]
    fn identity_order_breaks_level_ties() {
        let mut dag = Dag::new();
        dag.add_node(Node::new("r"), CyclePolicy::Strict).unwrap();
        for id in ["m", "d", "x"] {
            dag.add_node(Node::new(id).with_parents(["r"]), CyclePolicy::Strict)
                .unwrap();
        }
        let order = collect_ids(
            dag.iter_down(&"r")
                .unwrap()
                .map(|r| r.map(|n| *n.id())),
        );
        assert_eq!(order, ["r", "d", "m", "x"]);
    }
}
