//! Accessor for the named properties of a JSON object.
//!
//! This is the only built-in accessor that carries the optional
//! capabilities: declared type, annotations, categories, an exclusion flag
//! and a comparison strategy. They are attached builder-style:
//!
//! ```
//! use objdiff_access::{Accessor, Annotation, PropertyAccessor};
//! use objdiff_types::ValueType;
//!
//! let accessor = PropertyAccessor::new("email")
//!     .with_type(ValueType::STRING)
//!     .with_annotation(Annotation::new("Sensitive"))
//!     .with_categories(["contact"]);
//! assert_eq!(accessor.property().map(|p| p.name.as_str()), Some("email"));
//! assert_eq!(accessor.value_type(), Some(ValueType::STRING));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use objdiff_types::{ElementSelector, ValueType};
use serde_json::Value;

use crate::accessor::Accessor;
use crate::capability::{Annotation, ComparisonStrategy, PropertyInfo};
use crate::error::{AccessError, AccessResult};

/// Accessor for one property of an object.
#[derive(Clone)]
pub struct PropertyAccessor {
    info: PropertyInfo,
    value_type: Option<ValueType>,
    categories: Option<BTreeSet<String>>,
    excluded: Option<bool>,
    comparison_strategy: Option<Arc<dyn ComparisonStrategy>>,
}

impl PropertyAccessor {
    /// Accessor for the property `name`, without any capabilities.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            info: PropertyInfo::new(name),
            value_type: None,
            categories: None,
            excluded: None,
            comparison_strategy: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Declare the type of the property.
    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    /// Attach an annotation.
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.info.annotations.push(annotation);
        self
    }

    /// Assign categories. Repeated calls accumulate.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .get_or_insert_with(BTreeSet::new)
            .extend(categories.into_iter().map(Into::into));
        self
    }

    /// Mark the property as excluded (or explicitly not excluded).
    pub fn excluded(mut self, excluded: bool) -> Self {
        self.excluded = Some(excluded);
        self
    }

    /// Attach a comparison strategy.
    pub fn with_comparison_strategy(mut self, strategy: Arc<dyn ComparisonStrategy>) -> Self {
        self.comparison_strategy = Some(strategy);
        self
    }
}

impl fmt::Debug for PropertyAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyAccessor")
            .field("name", &self.info.name)
            .field("value_type", &self.value_type)
            .field("categories", &self.categories)
            .field("excluded", &self.excluded)
            .finish_non_exhaustive()
    }
}

impl Accessor for PropertyAccessor {
    fn element_selector(&self) -> ElementSelector {
        ElementSelector::property(self.info.name.clone())
    }

    fn get<'a>(&self, target: &'a Value) -> Option<&'a Value> {
        target.as_object()?.get(&self.info.name)
    }

    fn get_mut<'a>(&self, target: &'a mut Value) -> Option<&'a mut Value> {
        target.as_object_mut()?.get_mut(&self.info.name)
    }

    fn set(&self, target: &mut Value, value: Value) -> AccessResult<()> {
        match target {
            Value::Object(object) => {
                object.insert(self.info.name.clone(), value);
                Ok(())
            }
            other => Err(AccessError::unexpected_target(
                self.element_selector(),
                ValueType::OBJECT,
                other,
            )),
        }
    }

    fn unset(&self, target: &mut Value) -> AccessResult<()> {
        match target {
            Value::Object(object) => {
                object.remove(&self.info.name);
                Ok(())
            }
            other => Err(AccessError::unexpected_target(
                self.element_selector(),
                ValueType::OBJECT,
                other,
            )),
        }
    }

    fn description(&self) -> String {
        match &self.value_type {
            Some(value_type) => format!("property '{}' ({value_type})", self.info.name),
            None => format!("property '{}'", self.info.name),
        }
    }

    fn value_type(&self) -> Option<ValueType> {
        self.value_type.clone()
    }

    fn property(&self) -> Option<&PropertyInfo> {
        Some(&self.info)
    }

    fn categories(&self) -> Option<&BTreeSet<String>> {
        self.categories.as_ref()
    }

    fn exclusion(&self) -> Option<bool> {
        self.excluded
    }

    fn comparison_strategy(&self) -> Option<Arc<dyn ComparisonStrategy>> {
        self.comparison_strategy.clone()
    }
}
