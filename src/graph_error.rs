//! GraphError: unified error type for the dagnet public APIs.
//!
//! Every failure is synchronous and raised at the point of violation; no
//! operation retries internally, and a failed mutation leaves the graph in
//! its pre-call state.

use std::fmt::Debug;

use itertools::Itertools;
use thiserror::Error;

/// Unified error type for graph operations.
///
/// Identities are rendered into the variants with their `Debug` form when the
/// error is built, which keeps the type non-generic and cheap to match on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node with this identity is already registered.
    #[error("node identity {0} already present")]
    DuplicateIdentity(String),
    /// A node declared itself as its own parent or child, or an edge was
    /// requested from an identity to itself.
    #[error("node {0} declares itself as its own relation")]
    SelfReference(String),
    /// Referenced identities are not registered in the graph. Sorted.
    #[error("missing node identities: {}", .0.join(", "))]
    MissingIdentities(Vec<String>),
    /// The requested relation would make an identity reachable from itself.
    /// Carries the identities that would close the cycle, sorted.
    #[error("relation would close a cycle through: {}", .0.join(", "))]
    CycleAttempt(Vec<String>),
    /// The traversal comparator refused to order two nodes, breaking the
    /// total-order contract it must uphold.
    #[error("node ordering is not total: cannot order {0} against {1}")]
    ImproperOrdering(String, String),
}

impl GraphError {
    pub(crate) fn duplicate_identity(id: &impl Debug) -> Self {
        Self::DuplicateIdentity(format!("{id:?}"))
    }

    pub(crate) fn self_reference(id: &impl Debug) -> Self {
        Self::SelfReference(format!("{id:?}"))
    }

    pub(crate) fn missing_identities<T: Debug>(ids: impl IntoIterator<Item = T>) -> Self {
        Self::MissingIdentities(ids.into_iter().map(|id| format!("{id:?}")).sorted().collect())
    }

    pub(crate) fn cycle_attempt<T: Debug>(ids: impl IntoIterator<Item = T>) -> Self {
        Self::CycleAttempt(ids.into_iter().map(|id| format!("{id:?}")).sorted().collect())
    }

    pub(crate) fn improper_ordering(a: &impl Debug, b: &impl Debug) -> Self {
        Self::ImproperOrdering(format!("{a:?}"), format!("{b:?}"))
    }
}
