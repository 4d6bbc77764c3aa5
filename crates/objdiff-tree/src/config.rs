use serde::{Deserialize, Serialize};

/// Allocation hints for a [`DiffTree`](crate::DiffTree).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Number of nodes the arena reserves up front.
    pub node_capacity: usize,
    /// Number of children each node's children map reserves up front.
    pub child_capacity: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            node_capacity: 64,
            child_capacity: 10,
        }
    }
}

impl TreeConfig {
    /// A configuration for small trees that reserves nothing.
    pub fn minimal() -> Self {
        Self {
            node_capacity: 0,
            child_capacity: 0,
        }
    }
}
