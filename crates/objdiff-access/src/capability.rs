//! Optional accessor capabilities: property metadata and comparison strategies.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A marker attached to a property, with optional attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// The annotation name, used for lookup.
    pub name: String,
    /// Free-form attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
}

impl Annotation {
    /// Create an annotation without attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Look up an attribute.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// Metadata of a bean property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    /// The property name.
    pub name: String,
    /// Annotations of the property's read method.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl PropertyInfo {
    /// Metadata for a property without annotations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    /// The first annotation with the given name.
    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }
}

/// Decides whether the base and working versions of a value are equal.
///
/// Strategies are consulted by the differencing engine; the tree only stores
/// and hands them out.
pub trait ComparisonStrategy: fmt::Debug + Send + Sync {
    /// Returns `true` if `working` and `base` count as equal.
    fn equal(&self, working: Option<&Value>, base: Option<&Value>) -> bool;
}

/// Compare the values as a whole.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EqualsOnly;

impl ComparisonStrategy for EqualsOnly {
    fn equal(&self, working: Option<&Value>, base: Option<&Value>) -> bool {
        working == base
    }
}

/// Compare only the sub-value found at a JSON pointer (e.g. `/id`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EqualsOnlyValueAt {
    pointer: String,
}

impl EqualsOnlyValueAt {
    /// Compare the values found at `pointer`.
    pub fn new(pointer: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
        }
    }

    /// The JSON pointer being compared.
    pub fn pointer(&self) -> &str {
        &self.pointer
    }
}

impl ComparisonStrategy for EqualsOnlyValueAt {
    fn equal(&self, working: Option<&Value>, base: Option<&Value>) -> bool {
        let pick = |v: Option<&Value>| v.and_then(|v| v.pointer(&self.pointer)).cloned();
        pick(working) == pick(base)
    }
}
