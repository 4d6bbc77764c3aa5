//! Lifecycle status of a diff node.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the value represented by a node differs between base and working.
///
/// A freshly created node is [`State::Untouched`]. The tree itself only ever
/// moves a node from `Untouched` to `Changed` (when a child with changes is
/// attached); every other transition belongs to the differencing engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    /// The value has been added to the working object.
    Added,
    /// The value has been changed compared to the base object.
    Changed,
    /// The value has been removed from the working object.
    Removed,
    /// The value is identical between working and base.
    #[default]
    Untouched,
    /// The value was already visited higher up: a cycle in the data.
    Circular,
    /// The value has not been looked at.
    Ignored,
}

impl State {
    /// All states, in declaration order.
    pub const ALL: [State; 6] = [
        State::Added,
        State::Changed,
        State::Removed,
        State::Untouched,
        State::Circular,
        State::Ignored,
    ];

    /// Returns `true` for `Added`, `Changed` and `Removed`.
    pub fn is_change(self) -> bool {
        matches!(self, State::Added | State::Changed | State::Removed)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "ADDED"),
            Self::Changed => write!(f, "CHANGED"),
            Self::Removed => write!(f, "REMOVED"),
            Self::Untouched => write!(f, "UNTOUCHED"),
            Self::Circular => write!(f, "CIRCULAR"),
            Self::Ignored => write!(f, "IGNORED"),
        }
    }
}
