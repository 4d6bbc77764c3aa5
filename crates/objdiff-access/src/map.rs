//! Accessor for the entries of a JSON object used as a map.

use objdiff_types::{ElementSelector, ValueType};
use serde_json::Value;

use crate::accessor::Accessor;
use crate::error::{AccessError, AccessResult};

/// Accessor for the map entry stored under `key`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MapEntryAccessor {
    key: String,
}

impl MapEntryAccessor {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Accessor for MapEntryAccessor {
    fn element_selector(&self) -> ElementSelector {
        ElementSelector::map_key(self.key.clone())
    }

    fn get<'a>(&self, target: &'a Value) -> Option<&'a Value> {
        target.as_object()?.get(&self.key)
    }

    fn get_mut<'a>(&self, target: &'a mut Value) -> Option<&'a mut Value> {
        target.as_object_mut()?.get_mut(&self.key)
    }

    fn set(&self, target: &mut Value, value: Value) -> AccessResult<()> {
        match target {
            Value::Object(map) => {
                map.insert(self.key.clone(), value);
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
            Value::Object(map) => {
                map.remove(&self.key);
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
        format!("map key {{{}}}", self.key)
    }
}
