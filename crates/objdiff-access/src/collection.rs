//! Accessors for the elements of JSON arrays.
//!
//! Arrays are addressed two ways. A [`CollectionItemAccessor`] treats the
//! array as an unordered collection and finds its element by value; an
//! [`ArrayIndexAccessor`] addresses a fixed position.

use objdiff_types::{ElementSelector, ValueType};
use serde_json::Value;
use tracing::trace;

use crate::accessor::Accessor;
use crate::error::{AccessError, AccessResult};

/// Accessor for the first collection element equal to a reference item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionItemAccessor {
    reference: Value,
}

impl CollectionItemAccessor {
    pub fn new(reference: Value) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> &Value {
        &self.reference
    }

    fn position(&self, items: &[Value]) -> Option<usize> {
        items.iter().position(|item| *item == self.reference)
    }

    fn unexpected(&self, target: &Value) -> AccessError {
        AccessError::unexpected_target(self.element_selector(), ValueType::ARRAY, target)
    }
}

impl Accessor for CollectionItemAccessor {
    fn element_selector(&self) -> ElementSelector {
        ElementSelector::collection_item(&self.reference)
    }

    fn get<'a>(&self, target: &'a Value) -> Option<&'a Value> {
        let items = target.as_array()?;
        items.get(self.position(items)?)
    }

    fn get_mut<'a>(&self, target: &'a mut Value) -> Option<&'a mut Value> {
        let items = target.as_array_mut()?;
        let index = self.position(items)?;
        items.get_mut(index)
    }

    /// Replaces the matching item, or appends `value` if there is none.
    fn set(&self, target: &mut Value, value: Value) -> AccessResult<()> {
        let Value::Array(items) = target else {
            return Err(self.unexpected(target));
        };
        match self.position(items) {
            Some(index) => items[index] = value,
            None => items.push(value),
        }
        Ok(())
    }

    /// Removes the matching item, if present.
    fn unset(&self, target: &mut Value) -> AccessResult<()> {
        let Value::Array(items) = target else {
            return Err(self.unexpected(target));
        };
        if let Some(index) = self.position(items) {
            items.remove(index);
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("collection item {}", self.reference)
    }
}

/// Accessor for the array slot at a fixed index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArrayIndexAccessor {
    index: usize,
}

impl ArrayIndexAccessor {
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn unexpected(&self, target: &Value) -> AccessError {
        AccessError::unexpected_target(self.element_selector(), ValueType::ARRAY, target)
    }
}

impl Accessor for ArrayIndexAccessor {
    fn element_selector(&self) -> ElementSelector {
        ElementSelector::array_index(self.index)
    }

    fn get<'a>(&self, target: &'a Value) -> Option<&'a Value> {
        target.as_array()?.get(self.index)
    }

    fn get_mut<'a>(&self, target: &'a mut Value) -> Option<&'a mut Value> {
        target.as_array_mut()?.get_mut(self.index)
    }

    /// Overwrites the slot. Writing one past the end appends.
    fn set(&self, target: &mut Value, value: Value) -> AccessResult<()> {
        let Value::Array(items) = target else {
            return Err(self.unexpected(target));
        };
        let len = items.len();
        if self.index < len {
            items[self.index] = value;
        } else if self.index == len {
            items.push(value);
        } else {
            return Err(AccessError::IndexOutOfBounds {
                index: self.index,
                len,
            });
        }
        Ok(())
    }

    /// Nulls the slot so that the positions of later elements stay stable.
    fn unset(&self, target: &mut Value) -> AccessResult<()> {
        let Value::Array(items) = target else {
            return Err(self.unexpected(target));
        };
        match items.get_mut(self.index) {
            Some(slot) => *slot = Value::Null,
            None => trace!(index = self.index, len = items.len(), "unset past end of array"),
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("array index [{}]", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collection_item_found_by_value() {
        let accessor = CollectionItemAccessor::new(json!({"id": 2}));
        let target = json!([{"id": 1}, {"id": 2}]);
        assert_eq!(accessor.get(&target), Some(&json!({"id": 2})));
        assert_eq!(accessor.get(&json!([])), None);
        assert_eq!(accessor.get(&json!({"id": 2})), None);
    }

    #[test]
    fn collection_item_set_replaces_or_appends() {
        let accessor = CollectionItemAccessor::new(json!("b"));
        let mut target = json!(["a", "b"]);
        accessor.set(&mut target, json!("B")).unwrap();
        assert_eq!(target, json!(["a", "B"]));

        accessor.set(&mut target, json!("c")).unwrap();
        assert_eq!(target, json!(["a", "B", "c"]));
    }

    #[test]
    fn collection_item_unset_removes_first_match() {
        let accessor = CollectionItemAccessor::new(json!(1));
        let mut target = json!([1, 2, 1]);
        accessor.unset(&mut target).unwrap();
        assert_eq!(target, json!([2, 1]));

        let mut not_array = json!({"a": 1});
        assert!(accessor.unset(&mut not_array).is_err());
    }

    #[test]
    fn array_index_positional_access() {
        let accessor = ArrayIndexAccessor::new(1);
        let mut target = json!([10, 20, 30]);
        assert_eq!(accessor.get(&target), Some(&json!(20)));

        accessor.set(&mut target, json!(21)).unwrap();
        assert_eq!(target, json!([10, 21, 30]));

        accessor.unset(&mut target).unwrap();
        assert_eq!(target, json!([10, null, 30]));
    }

    #[test]
    fn array_index_set_bounds() {
        let mut target = json!([0]);
        ArrayIndexAccessor::new(1).set(&mut target, json!(1)).unwrap();
        assert_eq!(target, json!([0, 1]));

        let err = ArrayIndexAccessor::new(5).set(&mut target, json!(5)).unwrap_err();
        assert_eq!(err, AccessError::IndexOutOfBounds { index: 5, len: 2 });

        ArrayIndexAccessor::new(9).unset(&mut target).unwrap();
        assert_eq!(target, json!([0, 1]));
    }

    #[test]
    fn selectors() {
        assert_eq!(
            ArrayIndexAccessor::new(4).element_selector(),
            ElementSelector::ArrayIndex(4)
        );
        assert_eq!(
            CollectionItemAccessor::new(json!("x")).element_selector(),
            ElementSelector::collection_item(&json!("x"))
        );
    }
}
