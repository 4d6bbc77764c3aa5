//! The accessor of the tree root.

use objdiff_types::ElementSelector;
use serde_json::Value;

use crate::accessor::Accessor;
use crate::error::AccessResult;

/// Accessor of the root node: the element of a target is the target itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RootAccessor;

impl Accessor for RootAccessor {
    fn element_selector(&self) -> ElementSelector {
        ElementSelector::Root
    }

    fn get<'a>(&self, target: &'a Value) -> Option<&'a Value> {
        Some(target)
    }

    fn get_mut<'a>(&self, target: &'a mut Value) -> Option<&'a mut Value> {
        Some(target)
    }

    /// Replaces the whole target.
    fn set(&self, target: &mut Value, value: Value) -> AccessResult<()> {
        *target = value;
        Ok(())
    }

    /// Resets the whole target to `null`.
    fn unset(&self, target: &mut Value) -> AccessResult<()> {
        *target = Value::Null;
        Ok(())
    }

    fn description(&self) -> String {
        "root element".to_string()
    }
}
