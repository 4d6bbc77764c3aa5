//! Named descriptors for the type of value a node represents.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The type of the value represented by a node.
///
/// Types are compared by name. Use [`ValueType::of`] for Rust types and
/// [`ValueType::of_json`] for the kind of a JSON value.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueType(Cow<'static, str>);

impl ValueType {
    pub const NULL: ValueType = ValueType(Cow::Borrowed("null"));
    pub const BOOLEAN: ValueType = ValueType(Cow::Borrowed("boolean"));
    pub const NUMBER: ValueType = ValueType(Cow::Borrowed("number"));
    pub const STRING: ValueType = ValueType(Cow::Borrowed("string"));
    pub const ARRAY: ValueType = ValueType(Cow::Borrowed("array"));
    pub const OBJECT: ValueType = ValueType(Cow::Borrowed("object"));

    /// A type with an arbitrary name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The type named after a Rust type.
    pub fn of<T: ?Sized>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<T>()))
    }

    /// The JSON kind of `value`.
    pub fn of_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::NULL,
            Value::Bool(_) => Self::BOOLEAN,
            Value::Number(_) => Self::NUMBER,
            Value::String(_) => Self::STRING,
            Value::Array(_) => Self::ARRAY,
            Value::Object(_) => Self::OBJECT,
        }
    }

    /// The type name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueType({})", self.0)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
