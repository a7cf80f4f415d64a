//! Owning DAG container: node arena, root tracking, cycle-guarded mutation.
//!
//! Nodes reference each other only by identity; the container resolves every
//! identity through its single owning map (arena + index pattern), so no two
//! live nodes ever hold references to one another. Cycle prevention is
//! incremental: each mutation walks the affected closure instead of
//! re-sorting the whole graph.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::graph::bounds::IdLike;
use crate::graph::node::Node;
use crate::graph::traversal::{AncestorIter, DescendantIter, Dir, PriorityTraversal};
use crate::graph_error::GraphError;

/// Comparator breaking ties between nodes discovered at the same traversal
/// level. Supplied to the container explicitly; never a method on the node
/// type. `None` means the two nodes cannot be ordered, which fails the
/// traversal with [`GraphError::ImproperOrdering`].
pub type NodeOrdering<I> = fn(&Node<I>, &Node<I>) -> Option<Ordering>;

/// How [`Dag::add_node`] and [`Dag::add_edge`] treat a relation that would
/// close a cycle. Duplicate, missing and self-referencing identities are
/// always fatal regardless of the policy; only cycle handling is selectable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum CyclePolicy {
    /// Fail with [`GraphError::CycleAttempt`], leaving the graph unchanged.
    #[default]
    Strict,
    /// Drop the offending relations and proceed with the rest. For
    /// [`Dag::add_edge`] this means returning `Ok(None)` with no effect.
    Lenient,
}

fn id_order<I: IdLike>(a: &Node<I>, b: &Node<I>) -> Option<Ordering> {
    Some(a.id().cmp(b.id()))
}

/// A directed acyclic graph over nodes keyed by identity.
///
/// The container exclusively owns every node. Mutations take `&mut self` and
/// traversals borrow `&self`, so mutating the graph while a traversal is
/// still being consumed is a compile error rather than a documented hazard.
///
/// # Example
/// ```rust
/// use dagnet::prelude::*;
/// let mut dag = Dag::new();
/// dag.add_node(Node::new("trunk"), CyclePolicy::Strict)?;
/// dag.add_node(Node::new("branch").with_parents(["trunk"]), CyclePolicy::Strict)?;
/// assert_eq!(dag.roots(), ["trunk"]);
/// # Ok::<(), dagnet::GraphError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Dag<I: IdLike> {
    nodes: HashMap<I, Node<I>>,
    root_ids: Vec<I>,
    ordering: NodeOrdering<I>,
}

impl<I: IdLike> Default for Dag<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: IdLike> Dag<I> {
    /// Creates an empty graph whose traversal tie-break is the identity
    /// order.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            root_ids: Vec::new(),
            ordering: id_order,
        }
    }

    /// Creates an empty graph with an explicit traversal comparator.
    pub fn with_ordering(ordering: NodeOrdering<I>) -> Self {
        Self {
            ordering,
            ..Self::new()
        }
    }

    /// Builds a graph from unattached nodes under [`CyclePolicy::Strict`].
    ///
    /// Nodes are inserted in iteration order, so relations may only name
    /// identities that appear earlier.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node<I>>) -> Result<Self, GraphError> {
        let mut dag = Self::new();
        for node in nodes {
            dag.add_node(node, CyclePolicy::Strict)?;
        }
        Ok(dag)
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &I) -> bool {
        self.nodes.contains_key(id)
    }

    /// Identities whose node currently has no parents, in the order they
    /// gained root status.
    pub fn roots(&self) -> &[I] {
        &self.root_ids
    }

    /// All registered identities, in arbitrary order.
    pub fn ids(&self) -> impl Iterator<Item = &I> {
        self.nodes.keys()
    }

    /// All registered nodes, in arbitrary order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<I>> {
        self.nodes.values()
    }

    /// Whether the parent→child edge `from → to` is registered.
    pub fn has_edge(&self, from: &I, to: &I) -> bool {
        self.nodes.get(from).is_some_and(|n| n.has_child_id(to))
    }

    pub fn get(&self, id: &I) -> Option<&Node<I>> {
        self.nodes.get(id)
    }

    /// Like [`get`](Self::get), but an absent identity is an error.
    pub fn try_get(&self, id: &I) -> Result<&Node<I>, GraphError> {
        self.nodes
            .get(id)
            .ok_or_else(|| GraphError::missing_identities([id]))
    }

    /// Lookup for identities the graph's own invariants guarantee to be
    /// present (every identity in any adjacency list is registered).
    pub(crate) fn node_unchecked(&self, id: &I) -> &Node<I> {
        self.nodes
            .get(id)
            .expect("adjacency references a registered node")
    }

    pub(crate) fn ordering(&self) -> NodeOrdering<I> {
        self.ordering
    }

    /// Inserts an unattached node, linking every declared relation in both
    /// directions.
    ///
    /// Validation happens entirely against the declared relation sets before
    /// anything is mutated: either the node and all surviving relations are
    /// committed, or the graph is left exactly as it was.
    ///
    /// Relations that would close a cycle are rejected (`Strict`) or pruned
    /// (`Lenient`). Identities still referenced after pruning must be
    /// registered; a declared child that was a root loses root status, and
    /// the node itself becomes a root when it declares no parents.
    pub fn add_node(&mut self, mut node: Node<I>, policy: CyclePolicy) -> Result<&Node<I>, GraphError> {
        if self.nodes.contains_key(node.id()) {
            return Err(GraphError::duplicate_identity(node.id()));
        }
        if node.has_parent_id(node.id()) || node.has_child_id(node.id()) {
            return Err(GraphError::self_reference(node.id()));
        }

        // Upward: a declared child already sitting in the ancestor closure
        // of the declared parents would become reachable from itself. The
        // walk is seeded from the parents directly; the new node is not yet
        // linked. Unresolved identities cannot conflict and flow on to the
        // resolution step.
        let seeds = self.registered_subset(node.parent_ids());
        let ancestors = self.reachable_ids(seeds, Dir::Up)?;
        let conflicts: Vec<I> = node
            .child_ids()
            .iter()
            .filter(|id| ancestors.contains(*id))
            .cloned()
            .collect();
        if !conflicts.is_empty() {
            if policy == CyclePolicy::Strict {
                return Err(GraphError::cycle_attempt(&conflicts));
            }
            log::debug!("dropping child relations of {:?} that would close a cycle: {conflicts:?}", node.id());
            for id in &conflicts {
                node.remove_child_id(id);
            }
        }

        // Downward, symmetric: declared parents found in the descendant
        // closure of the (surviving) declared children.
        let seeds = self.registered_subset(node.child_ids());
        let descendants = self.reachable_ids(seeds, Dir::Down)?;
        let conflicts: Vec<I> = node
            .parent_ids()
            .iter()
            .filter(|id| descendants.contains(*id))
            .cloned()
            .collect();
        if !conflicts.is_empty() {
            if policy == CyclePolicy::Strict {
                return Err(GraphError::cycle_attempt(&conflicts));
            }
            log::debug!("dropping parent relations of {:?} that would close a cycle: {conflicts:?}", node.id());
            for id in &conflicts {
                node.remove_parent_id(id);
            }
        }

        // Resolve the post-prune relation sets. Last failure point: from
        // here on the insertion is committed whole.
        let missing: Vec<&I> = node
            .parent_ids()
            .iter()
            .chain(node.child_ids())
            .filter(|id| !self.nodes.contains_key(*id))
            .collect();
        if !missing.is_empty() {
            return Err(GraphError::missing_identities(missing));
        }

        let id = node.id().clone();
        for pid in node.parent_ids().to_vec() {
            // resolved above
            let parent = self.nodes.get_mut(&pid).expect("resolved parent");
            parent.link_child(&mut node);
        }
        for cid in node.child_ids().to_vec() {
            let child = self.nodes.get_mut(&cid).expect("resolved child");
            let was_root = child.parent_ids().is_empty();
            node.link_child(child);
            if was_root {
                self.root_ids.retain(|r| r != &cid);
            }
        }
        if node.parent_ids().is_empty() {
            self.root_ids.push(id.clone());
        }
        self.nodes.insert(id.clone(), node);
        log::trace!("registered node {id:?}");
        self.debug_assert_consistent();
        Ok(&self.nodes[&id])
    }

    /// Adds the parent→child edge `from → to` between two registered nodes,
    /// after a pure cycle check.
    ///
    /// Returns the updated `from` node, or `Ok(None)` when the edge would
    /// close a cycle under [`CyclePolicy::Lenient`]. Linking is idempotent:
    /// re-adding an existing edge changes nothing.
    pub fn add_edge(
        &mut self,
        from: &I,
        to: &I,
        policy: CyclePolicy,
    ) -> Result<Option<&Node<I>>, GraphError> {
        if from == to {
            return Err(GraphError::self_reference(from));
        }
        let missing: Vec<&I> = [from, to]
            .into_iter()
            .filter(|id| !self.nodes.contains_key(*id))
            .collect();
        if !missing.is_empty() {
            return Err(GraphError::missing_identities(missing));
        }

        // `to` above `from` means the new edge would point back down into
        // its own ancestry. The downward walk re-checks the same condition
        // from the opposite end.
        let closes_cycle = self.reachable_ids(vec![from.clone()], Dir::Up)?.contains(to)
            || self.reachable_ids(vec![to.clone()], Dir::Down)?.contains(from);
        if closes_cycle {
            if policy == CyclePolicy::Strict {
                return Err(GraphError::cycle_attempt([from, to]));
            }
            log::debug!("edge {from:?} -> {to:?} would close a cycle; left unlinked");
            return Ok(None);
        }

        let [from_node, to_node] = self
            .nodes
            .get_disjoint_mut([from, to])
            .map(|n| n.expect("resolved above"));
        let was_root = to_node.parent_ids().is_empty();
        from_node.link_child(to_node);
        if was_root {
            self.root_ids.retain(|r| r != to);
        }
        log::trace!("linked {from:?} -> {to:?}");
        self.debug_assert_consistent();
        Ok(self.nodes.get(from))
    }

    /// Upward traversal seeded from one registered identity: the node
    /// itself, then its ancestor closure in `(level, comparator)` order.
    pub fn iter_up(&self, id: &I) -> Result<AncestorIter<'_, I>, GraphError> {
        let seed = self.try_get(id)?.id().clone();
        AncestorIter::new(self, vec![seed])
    }

    /// Upward traversal seeded from an explicit identity set; every absent
    /// seed is reported at once.
    pub fn iter_up_from(
        &self,
        seeds: impl IntoIterator<Item = I>,
    ) -> Result<AncestorIter<'_, I>, GraphError> {
        AncestorIter::new(self, self.resolve_seeds(seeds)?)
    }

    /// Downward counterpart of [`iter_up`](Self::iter_up).
    pub fn iter_down(&self, id: &I) -> Result<DescendantIter<'_, I>, GraphError> {
        let seed = self.try_get(id)?.id().clone();
        DescendantIter::new(self, vec![seed])
    }

    /// Downward counterpart of [`iter_up_from`](Self::iter_up_from).
    pub fn iter_down_from(
        &self,
        seeds: impl IntoIterator<Item = I>,
    ) -> Result<DescendantIter<'_, I>, GraphError> {
        DescendantIter::new(self, self.resolve_seeds(seeds)?)
    }

    fn resolve_seeds(&self, seeds: impl IntoIterator<Item = I>) -> Result<Vec<I>, GraphError> {
        let seeds: Vec<I> = seeds.into_iter().collect();
        let missing: Vec<&I> = seeds
            .iter()
            .filter(|id| !self.nodes.contains_key(*id))
            .collect();
        if missing.is_empty() {
            Ok(seeds)
        } else {
            Err(GraphError::missing_identities(missing))
        }
    }

    fn registered_subset(&self, ids: &[I]) -> Vec<I> {
        ids.iter()
            .filter(|id| self.nodes.contains_key(*id))
            .cloned()
            .collect()
    }

    /// Identity closure reachable from `seeds` (seeds included), used by the
    /// mutation-time cycle checks.
    fn reachable_ids(&self, seeds: Vec<I>, dir: Dir) -> Result<HashSet<I>, GraphError> {
        let mut out = HashSet::new();
        for node in PriorityTraversal::seeded(self, seeds, dir)? {
            out.insert(node?.id().clone());
        }
        Ok(out)
    }

    /// Mirror, root and acyclicity checks, run after every successful
    /// mutation in debug builds and under the `strict-invariants` feature.
    #[cfg(any(debug_assertions, feature = "strict-invariants"))]
    fn debug_assert_consistent(&self) {
        for (id, node) in &self.nodes {
            assert!(
                !node.has_parent_id(id) && !node.has_child_id(id),
                "self reference on {id:?}"
            );
            for pid in node.parent_ids() {
                let mirrored = self.nodes.get(pid).is_some_and(|p| p.has_child_id(id));
                assert!(mirrored, "missing child mirror on {pid:?} for edge {pid:?} -> {id:?}");
            }
            for cid in node.child_ids() {
                let mirrored = self.nodes.get(cid).is_some_and(|c| c.has_parent_id(id));
                assert!(mirrored, "missing parent mirror on {cid:?} for edge {id:?} -> {cid:?}");
            }
        }

        let roots: HashSet<&I> = self.root_ids.iter().collect();
        assert_eq!(roots.len(), self.root_ids.len(), "duplicate root entries");
        for (id, node) in &self.nodes {
            assert_eq!(
                node.parent_ids().is_empty(),
                roots.contains(id),
                "root list out of step for {id:?}"
            );
        }

        // Kahn pass: an acyclic graph drains completely.
        let mut in_deg: HashMap<&I, usize> = self
            .nodes
            .iter()
            .map(|(id, node)| (id, node.parent_ids().len()))
            .collect();
        let mut stack: Vec<&I> = in_deg
            .iter()
            .filter_map(|(&id, &deg)| (deg == 0).then_some(id))
            .collect();
        let mut drained = 0usize;
        while let Some(id) = stack.pop() {
            drained += 1;
            for cid in self.node_unchecked(id).child_ids() {
                let deg = in_deg.get_mut(cid).expect("mirror checked above");
                *deg -= 1;
                if *deg == 0 {
                    stack.push(cid);
                }
            }
        }
        assert_eq!(drained, self.nodes.len(), "cycle present in committed graph");
    }

    #[cfg(not(any(debug_assertions, feature = "strict-invariants")))]
    #[inline]
    fn debug_assert_consistent(&self) {}
}
