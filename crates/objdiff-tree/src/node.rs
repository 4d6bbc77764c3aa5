//! Diff nodes and their handles.
//!
//! A [`DiffNode`] holds everything that is local to one node: its accessor,
//! state, type override, parent handle, children map and circular markers.
//! Queries that need the rest of the tree (paths, categories, inherited
//! property names, canonical access) live on [`NodeRef`](crate::NodeRef).

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;
use objdiff_access::{Accessor, Annotation, ComparisonStrategy};
use objdiff_types::{ElementSelector, NodePath, State, ValueType};
use serde_json::Value;

use crate::error::TreeResult;

/// Handle of a node inside its [`DiffTree`](crate::DiffTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The handle of every tree's root node.
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One element of the compared object graph.
///
/// Two nodes are equal when their accessors resolve the same
/// [`ElementSelector`]; state, children and position do not take part.
#[derive(Clone, Debug)]
pub struct DiffNode {
    accessor: Arc<dyn Accessor>,
    state: State,
    value_type: Option<ValueType>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: IndexMap<ElementSelector, NodeId>,
    circle_start_path: Option<NodePath>,
    circle_start_node: Option<NodeId>,
}

impl DiffNode {
    pub(crate) fn new(
        accessor: Arc<dyn Accessor>,
        value_type: Option<ValueType>,
        child_capacity: usize,
    ) -> Self {
        Self {
            accessor,
            state: State::default(),
            value_type,
            parent: None,
            children: IndexMap::with_capacity(child_capacity),
            circle_start_path: None,
            circle_start_node: None,
        }
    }

    pub fn accessor(&self) -> &Arc<dyn Accessor> {
        &self.accessor
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: State) {
        self.state = state;
    }

    pub fn is_added(&self) -> bool {
        self.state == State::Added
    }

    pub fn is_changed(&self) -> bool {
        self.state == State::Changed
    }

    pub fn is_removed(&self) -> bool {
        self.state == State::Removed
    }

    pub fn is_untouched(&self) -> bool {
        self.state == State::Untouched
    }

    pub fn is_circular(&self) -> bool {
        self.state == State::Circular
    }

    pub fn is_ignored(&self) -> bool {
        self.state == State::Ignored
    }

    /// The key of this node in its parent's children map.
    pub fn element_selector(&self) -> ElementSelector {
        self.accessor.element_selector()
    }

    /// The explicit type override, else the accessor's declared type.
    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
            .clone()
            .or_else(|| self.accessor.value_type())
    }

    pub(crate) fn set_value_type(&mut self, value_type: Option<ValueType>) {
        self.value_type = value_type;
    }

    /// The parent handle. Kept even after the parent's slot for this node has
    /// been handed to another child; see [`NodeRef::parent`](crate::NodeRef::parent).
    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Handle of the child stored under `selector`.
    pub fn child_id(&self, selector: &ElementSelector) -> Option<NodeId> {
        self.children.get(selector).copied()
    }

    /// Handles of all children, in insertion order.
    pub fn child_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    /// Returns `true` if the accessor represents a bean property.
    pub fn is_property_aware(&self) -> bool {
        self.accessor.property().is_some()
    }

    /// Returns `true` if the accessor is the root accessor.
    pub fn is_root_node(&self) -> bool {
        self.accessor.is_root()
    }

    /// Annotations of the represented property; empty for non-properties.
    pub fn property_annotations(&self) -> &[Annotation] {
        self.accessor
            .property()
            .map(|info| info.annotations.as_slice())
            .unwrap_or_default()
    }

    /// The property annotation named `name`, if any.
    pub fn property_annotation(&self, name: &str) -> Option<&Annotation> {
        self.accessor.property()?.annotation(name)
    }

    /// Categories assigned by this node's own accessor.
    pub fn own_categories(&self) -> Option<&BTreeSet<String>> {
        self.accessor.categories()
    }

    pub fn comparison_strategy(&self) -> Option<Arc<dyn ComparisonStrategy>> {
        self.accessor.comparison_strategy()
    }

    /// `false` unless the accessor explicitly excludes the element.
    pub fn is_excluded(&self) -> bool {
        self.accessor.exclusion().unwrap_or(false)
    }

    /// Path of the first node that represents the same object, for
    /// circular nodes.
    pub fn circle_start_path(&self) -> Option<&NodePath> {
        self.circle_start_path.as_ref()
    }

    pub(crate) fn set_circle_start_path(&mut self, path: Option<NodePath>) {
        self.circle_start_path = path;
    }

    pub fn circle_start_node_id(&self) -> Option<NodeId> {
        self.circle_start_node
    }

    pub(crate) fn set_circle_start_node(&mut self, node: Option<NodeId>) {
        self.circle_start_node = node;
    }

    /// Read this node's element from `target` (one level, no path resolution).
    pub fn get<'v>(&self, target: &'v Value) -> Option<&'v Value> {
        self.accessor.get(target)
    }

    /// Write this node's element on `target` (one level).
    pub fn set(&self, target: &mut Value, value: Value) -> TreeResult<()> {
        Ok(self.accessor.set(target, value)?)
    }

    /// Remove this node's element from `target` (one level).
    pub fn unset(&self, target: &mut Value) -> TreeResult<()> {
        Ok(self.accessor.unset(target)?)
    }
}

impl PartialEq for DiffNode {
    fn eq(&self, other: &Self) -> bool {
        self.element_selector() == other.element_selector()
    }
}

impl Eq for DiffNode {}

impl Hash for DiffNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.element_selector().hash(state);
    }
}
