//! Diff tree for objdiff.
//!
//! A [`DiffTree`] records how two versions of an object graph differ. Each
//! [`DiffNode`] stands for one element of the graph (the root object, a
//! property, a map entry, a collection item) and knows its [`State`], its
//! position ([`ElementSelector`] / [`NodePath`]) and the [`Accessor`] that
//! reads and writes the element on a live value.
//!
//! Nodes live in an arena owned by the tree and are addressed by
//! [`NodeId`]. Children are owned by their parent's children map; the
//! back-reference to the parent is a plain handle. A differencing engine
//! builds the tree through the mutating methods of [`DiffTree`], then
//! consumers read it through [`NodeRef`] cursors and [`Visitor`]s.
//!
//! # Invariants
//!
//! - A node's parent is written at most once.
//! - A node is never its own ancestor; the root is never a child.
//! - Attaching a child with changes to an untouched parent marks the parent
//!   as changed.
//!
//! [`State`]: objdiff_types::State
//! [`ElementSelector`]: objdiff_types::ElementSelector
//! [`NodePath`]: objdiff_types::NodePath
//! [`Accessor`]: objdiff_access::Accessor

pub mod config;
pub mod error;
pub mod node;
pub mod node_ref;
pub mod tree;
pub mod visitor;
pub mod visitors;

pub use config::TreeConfig;
pub use error::{TreeError, TreeResult};
pub use node::{DiffNode, NodeId};
pub use node_ref::NodeRef;
pub use tree::DiffTree;
pub use visitor::{Visit, Visitor};
pub use visitors::{CategoryFilteringVisitor, FilteringVisitor, PathVisitor};
