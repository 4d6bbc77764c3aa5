//! Element selectors: the position of a node relative to its parent.
//!
//! A selector is what a parent uses as the key of its children map, so two
//! siblings can never share one. Selectors compare by value and are cheap to
//! clone and hash.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifies a child among its siblings.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ElementSelector {
    /// The distinguished selector of the tree root.
    Root,
    /// A named property of a bean-like object.
    Property(String),
    /// The entry of a map under the given key.
    MapKey(String),
    /// An item of an unordered collection, identified by its value.
    ///
    /// The item is kept in its canonical JSON rendering so that selectors
    /// stay hashable.
    CollectionItem(String),
    /// A positional element of an array.
    ArrayIndex(usize),
}

impl ElementSelector {
    /// Create a property selector.
    pub fn property(name: impl Into<String>) -> Self {
        Self::Property(name.into())
    }

    /// Create a map key selector.
    pub fn map_key(key: impl Into<String>) -> Self {
        Self::MapKey(key.into())
    }

    /// Create a collection item selector from the item's value.
    ///
    /// Object keys are sorted before rendering, so items that compare equal
    /// as values always produce the same selector, whatever order their
    /// maps iterate in.
    pub fn collection_item(item: &Value) -> Self {
        Self::CollectionItem(sorted_keys(item).to_string())
    }

    /// Create an array index selector.
    pub fn array_index(index: usize) -> Self {
        Self::ArrayIndex(index)
    }

    /// Returns `true` for the root selector.
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }

    /// The property name, if this is a property selector.
    pub fn as_property(&self) -> Option<&str> {
        match self {
            Self::Property(name) => Some(name),
            _ => None,
        }
    }

    /// Parse the collection item back into a JSON value.
    ///
    /// Returns `None` for every other kind of selector.
    pub fn collection_item_value(&self) -> Option<Value> {
        match self {
            Self::CollectionItem(raw) => serde_json::from_str(raw).ok(),
            _ => None,
        }
    }
}

/// A copy of `value` whose objects list their keys in ascending order.
fn sorted_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), sorted_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted_keys).collect()),
        other => other.clone(),
    }
}

impl fmt::Debug for ElementSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "Root"),
            Self::Property(name) => write!(f, "Property({name})"),
            Self::MapKey(key) => write!(f, "MapKey({key})"),
            Self::CollectionItem(item) => write!(f, "CollectionItem({item})"),
            Self::ArrayIndex(index) => write!(f, "ArrayIndex({index})"),
        }
    }
}

impl fmt::Display for ElementSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => Ok(()),
            Self::Property(name) => write!(f, "{name}"),
            Self::MapKey(key) => write!(f, "{{{key}}}"),
            Self::CollectionItem(item) => write!(f, "[{item}]"),
            Self::ArrayIndex(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for ElementSelector {
    fn from(name: &str) -> Self {
        Self::property(name)
    }
}

impl From<String> for ElementSelector {
    fn from(name: String) -> Self {
        Self::Property(name)
    }
}

impl From<usize> for ElementSelector {
    fn from(index: usize) -> Self {
        Self::ArrayIndex(index)
    }
}
