//! Accessors for objdiff.
//!
//! An [`Accessor`] knows how to read, write and remove one element of a
//! parent value: a property of an object, an entry of a map, an item of a
//! collection or a slot of an array. Accessors may also expose optional
//! capabilities (declared type, property metadata, categories, exclusion,
//! comparison strategy). A capability that is not offered resolves to a
//! documented default in the diff tree and is never an error.
//!
//! Target object graphs are [`serde_json::Value`] documents.
//!
//! # Key Types
//!
//! - [`Accessor`] -- The accessor contract
//! - [`RootAccessor`], [`PropertyAccessor`], [`MapEntryAccessor`],
//!   [`CollectionItemAccessor`], [`ArrayIndexAccessor`] -- Built-in accessors
//! - [`PropertyInfo`] / [`Annotation`] -- Property metadata
//! - [`ComparisonStrategy`] -- Pluggable equality for a property

pub mod accessor;
pub mod capability;
pub mod collection;
pub mod error;
pub mod map;
pub mod property;
pub mod root;

pub use accessor::Accessor;
pub use capability::{Annotation, ComparisonStrategy, EqualsOnly, EqualsOnlyValueAt, PropertyInfo};
pub use collection::{ArrayIndexAccessor, CollectionItemAccessor};
pub use error::{AccessError, AccessResult};
pub use map::MapEntryAccessor;
pub use property::PropertyAccessor;
pub use root::RootAccessor;
