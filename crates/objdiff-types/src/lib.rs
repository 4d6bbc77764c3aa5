//! Foundation types for objdiff.
//!
//! This crate provides the addressing and status types shared by the
//! accessor layer and the diff tree. Every other objdiff crate depends on
//! `objdiff-types`.
//!
//! # Key Types
//!
//! - [`ElementSelector`] -- Position of a node relative to its parent
//! - [`NodePath`] / [`NodePathBuilder`] -- Root-relative sequence of selectors
//! - [`State`] -- Lifecycle status of a diff node
//! - [`ValueType`] -- Named descriptor of the value a node represents

pub mod error;
pub mod path;
pub mod selector;
pub mod state;
pub mod value_type;

pub use error::TypeError;
pub use path::{NodePath, NodePathBuilder};
pub use selector::ElementSelector;
pub use state::State;
pub use value_type::ValueType;
