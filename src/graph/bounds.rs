//! Common bound aliases used across the graph code.
//!
//! These traits have blanket impls, so any type satisfying the underlying
//! bounds will automatically implement them. They are zero-cost and only
//! reduce duplication in `where` clauses.

/// Canonical bound set for node identities.
///
/// Rationale:
/// - `Clone` so string identities are first-class alongside integers
/// - `Eq + Hash` for the `HashMap`-backed node arena
/// - `Ord` for the default deterministic traversal tie-break
/// - `Debug` for diagnostics and error payloads
pub trait IdLike: Clone + Eq + std::hash::Hash + Ord + std::fmt::Debug {}
impl<T> IdLike for T where T: Clone + Eq + std::hash::Hash + Ord + std::fmt::Debug {}
