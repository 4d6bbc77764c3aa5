//! The [`Accessor`] trait defining how a node reaches its value.
//!
//! Any element kind (property, map entry, collection item, ...) implements
//! this trait. The diff tree only ever talks to its nodes' values through it.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use objdiff_types::{ElementSelector, ValueType};
use serde_json::Value;

use crate::capability::{ComparisonStrategy, PropertyInfo};
use crate::error::AccessResult;

/// Reads, writes and removes one element of a parent value.
///
/// Implementations must be thread-safe (`Send + Sync`) so that a finished
/// tree can be shared between readers. The accessor's identity is its
/// [`element_selector`](Accessor::element_selector): two accessors that
/// resolve the same selector are considered equal.
///
/// The capability methods all have defaults meaning "not offered":
///
/// | capability              | default |
/// |-------------------------|---------|
/// | `value_type`            | `None`  |
/// | `property`              | `None`  |
/// | `categories`            | `None`  |
/// | `exclusion`             | `None`  |
/// | `comparison_strategy`   | `None`  |
pub trait Accessor: fmt::Debug + Send + Sync {
    /// The selector identifying this element among its siblings.
    fn element_selector(&self) -> ElementSelector;

    /// Read the element from `target`.
    ///
    /// Returns `None` if `target` has no such element.
    fn get<'a>(&self, target: &'a Value) -> Option<&'a Value>;

    /// Mutable variant of [`get`](Accessor::get).
    fn get_mut<'a>(&self, target: &'a mut Value) -> Option<&'a mut Value>;

    /// Write `value` as the element of `target`.
    fn set(&self, target: &mut Value, value: Value) -> AccessResult<()>;

    /// Remove the element from `target`.
    fn unset(&self, target: &mut Value) -> AccessResult<()>;

    /// One-line description used in node summaries.
    fn description(&self) -> String {
        format!("{:?}", self.element_selector())
    }

    /// Declared type of the element, if known.
    fn value_type(&self) -> Option<ValueType> {
        None
    }

    /// Property metadata, if this accessor represents a bean property.
    fn property(&self) -> Option<&PropertyInfo> {
        None
    }

    /// Categories assigned to the element.
    fn categories(&self) -> Option<&BTreeSet<String>> {
        None
    }

    /// Whether the element has been excluded from comparison.
    fn exclusion(&self) -> Option<bool> {
        None
    }

    /// The strategy used to compare the element.
    fn comparison_strategy(&self) -> Option<Arc<dyn ComparisonStrategy>> {
        None
    }

    /// Returns `true` for the accessor of the tree root.
    fn is_root(&self) -> bool {
        self.element_selector().is_root()
    }
}
