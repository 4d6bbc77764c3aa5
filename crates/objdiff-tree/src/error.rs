//! Error types for the diff tree.

use objdiff_access::AccessError;

use crate::node::NodeId;

/// Errors that can occur while building or using a diff tree.
///
/// `InvalidArgument` and `InvalidState` signal a caller breaking the tree's
/// invariants. They are raised before anything is mutated.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TreeError {
    /// A required input is missing or an attachment is structurally forbidden.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An already fixed relationship was about to change, or the tree is sealed.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The handle does not belong to this tree.
    #[error("node not found: {0:?}")]
    UnknownNode(NodeId),

    /// The node's accessor failed on the target value.
    #[error("access error: {0}")]
    Access(#[from] AccessError),
}

/// Convenience alias for tree results.
pub type TreeResult<T> = Result<T, TreeError>;
