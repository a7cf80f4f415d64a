//! # dagnet
//!
//! dagnet is a generic directed-acyclic-graph container. It stores nodes
//! keyed by a caller-supplied identity (strings, integers, anything
//! [`IdLike`](graph::bounds::IdLike)), keeps two mirrored adjacency views
//! consistent through every mutation, prevents cycles with an incremental
//! mutation-time check rather than a batch re-sort, tracks the set of root
//! nodes, and iterates ancestor/descendant closures in
//! `(discovery level, comparator)` priority order.
//!
//! ## Features
//! - Node arena keyed by identity; nodes reference each other only by id,
//!   so there are no reference cycles to manage
//! - Cycle-guarded `add_node`/`add_edge` with selectable strict or lenient
//!   handling of conflicting relations
//! - Root tracking kept exact after every operation
//! - Lazy priority-ordered upward/downward traversal with single-visit
//!   semantics and a pluggable tie-break comparator
//!
//! ## Usage
//! ```rust
//! use dagnet::prelude::*;
//!
//! let mut dag = Dag::new();
//! dag.add_node(Node::new("trunk"), CyclePolicy::Strict)?;
//! dag.add_node(Node::new("branch").with_parents(["trunk"]), CyclePolicy::Strict)?;
//! dag.add_node(Node::new("leaf").with_parents(["branch"]), CyclePolicy::Strict)?;
//!
//! assert_eq!(dag.roots(), ["trunk"]);
//! let downward: Vec<_> = dag
//!     .iter_down(&"trunk")?
//!     .map(|node| node.map(|n| *n.id()))
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(downward, ["trunk", "branch", "leaf"]);
//!
//! // A back edge is refused: "trunk" is already an ancestor of "leaf".
//! assert!(dag.add_edge(&"leaf", &"trunk", CyclePolicy::Strict).is_err());
//! # Ok::<(), dagnet::GraphError>(())
//! ```
//!
//! Mutations take `&mut self` and traversals borrow the graph, so mutating
//! while a traversal is still being consumed is rejected at compile time.

pub mod graph;
pub mod graph_error;

pub use graph_error::GraphError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::graph::bounds::IdLike;
    pub use crate::graph::dag::{CyclePolicy, Dag, NodeOrdering};
    pub use crate::graph::node::Node;
    pub use crate::graph::traversal::{AncestorIter, DescendantIter};
    pub use crate::graph_error::GraphError;
}
