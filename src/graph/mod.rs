pub mod bounds;
pub mod dag;
pub mod node;
pub mod traversal;

// Re-export the container and node at top level
pub use dag::{CyclePolicy, Dag};
pub use node::Node;
