//! Error types for the accessor crate.

use objdiff_types::{ElementSelector, ValueType};

/// Errors that can occur while an accessor touches a target value.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AccessError {
    /// The target is not the kind of container the accessor works on.
    #[error("{selector:?} expects {expected} target, found {actual}")]
    UnexpectedTarget {
        selector: ElementSelector,
        expected: ValueType,
        actual: ValueType,
    },

    /// An array slot beyond the end of the array (plus one) was written.
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

impl AccessError {
    pub(crate) fn unexpected_target(
        selector: ElementSelector,
        expected: ValueType,
        actual: &serde_json::Value,
    ) -> Self {
        Self::UnexpectedTarget {
            selector,
            expected,
            actual: ValueType::of_json(actual),
        }
    }
}

/// Convenience alias for accessor results.
pub type AccessResult<T> = Result<T, AccessError>;
