//! Read cursors over the nodes of a diff tree.
//!
//! A [`NodeRef`] pairs a node with the tree that owns it, which is what the
//! tree-aware queries need: paths, inherited property names, categories,
//! lookups below the node, visitation and canonical access. It dereferences
//! to [`DiffNode`] for everything local to the node.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use objdiff_types::{ElementSelector, NodePath};
use serde_json::Value;
use tracing::warn;

use crate::error::TreeResult;
use crate::node::{DiffNode, NodeId};
use crate::tree::DiffTree;
use crate::visitor::{self, Visit, Visitor};
use crate::visitors::PathVisitor;

/// A borrowed node together with its tree.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a DiffTree,
    id: NodeId,
    node: &'a DiffNode,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a DiffTree, id: NodeId, node: &'a DiffNode) -> Self {
        Self { tree, id, node }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a DiffTree {
        self.tree
    }

    /// The underlying node, with the tree's lifetime.
    pub fn node(&self) -> &'a DiffNode {
        self.node
    }

    /// The node this one was attached to.
    ///
    /// The link is written once and survives slot replacement: a node whose
    /// slot was taken over by a sibling with an equal selector still reports
    /// its old parent, and [`path`](Self::path) and the canonical accessors
    /// still resolve through it, even though the parent no longer lists it.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.tree.node(self.node.parent_id()?)
    }

    /// Children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let (tree, node) = (self.tree, self.node);
        node.child_ids().filter_map(move |id| tree.node(id))
    }

    /// The direct child stored under `selector`.
    pub fn child(&self, selector: &ElementSelector) -> Option<NodeRef<'a>> {
        self.tree.node(self.node.child_id(selector)?)
    }

    /// The direct child representing the property `name`.
    pub fn child_by_property(&self, name: &str) -> Option<NodeRef<'a>> {
        self.child(&ElementSelector::property(name))
    }

    /// The descendant whose absolute path matches `path`.
    pub fn child_at_path(&self, path: &NodePath) -> Option<NodeRef<'a>> {
        let mut visitor = PathVisitor::new(path.clone());
        self.visit_children(&mut visitor);
        self.tree.node(visitor.node_id()?)
    }

    /// The node where the data cycle started, for circular nodes.
    pub fn circle_start_node(&self) -> Option<NodeRef<'a>> {
        self.tree.node(self.node.circle_start_node_id()?)
    }

    /// This node and its ancestors, starting with this node.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> {
        std::iter::successors(Some(*self), NodeRef::parent)
    }

    /// Nodes from the topmost ancestor down to this node.
    fn lineage(&self) -> Vec<&'a DiffNode> {
        let mut lineage: Vec<&'a DiffNode> = self.ancestors().map(|n| n.node).collect();
        lineage.reverse();
        lineage
    }

    /// The absolute path of this node.
    ///
    /// The root yields the root path. A node whose topmost ancestor is not
    /// the root (a detached subtree) yields the path relative to that
    /// ancestor, including the ancestor's own selector.
    pub fn path(&self) -> NodePath {
        if self.node.is_root_node() {
            return NodePath::root();
        }
        self.lineage()
            .into_iter()
            .map(DiffNode::element_selector)
            .collect()
    }

    /// Returns `true` if this node's path matches `path`.
    pub fn matches(&self, path: &NodePath) -> bool {
        path.matches(&self.path())
    }

    /// Returns `true` if this node or any descendant was added, changed or
    /// removed.
    pub fn has_changes(&self) -> bool {
        if self.node.state().is_change() {
            return true;
        }
        let mut found = false;
        self.visit_children(&mut |node: NodeRef<'_>, visit: &mut Visit| {
            if node.state().is_change() {
                found = true;
                visit.stop();
            }
        });
        found
    }

    /// The property name of this node or, for collection, map and array
    /// items, of the closest property ancestor.
    pub fn property_name(&self) -> Option<&'a str> {
        self.ancestors()
            .find_map(|n| n.node.accessor().property())
            .map(|info| info.name.as_str())
    }

    /// Categories of this node and all its ancestors.
    pub fn categories(&self) -> BTreeSet<String> {
        self.ancestors()
            .filter_map(|n| n.node.own_categories())
            .flatten()
            .cloned()
            .collect()
    }

    /// Visit this node and its subtree.
    pub fn visit<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        let _ = visitor::walk(*self, visitor);
    }

    /// Visit the subtrees of this node's children, but not this node.
    pub fn visit_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        let _ = visitor::walk_children(*self, visitor);
    }

    /// Read the value this node represents, starting from the root object.
    pub fn canonical_get<'v>(&self, target: &'v Value) -> Option<&'v Value> {
        self.lineage()
            .into_iter()
            .try_fold(target, |value, node| node.get(value))
    }

    /// Mutable variant of [`canonical_get`](Self::canonical_get).
    pub fn canonical_get_mut<'v>(&self, target: &'v mut Value) -> Option<&'v mut Value> {
        self.lineage()
            .into_iter()
            .try_fold(target, |value, node| node.accessor().get_mut(value))
    }

    /// Write the value this node represents, starting from the root object.
    ///
    /// If the parent's value does not exist in `target` nothing is written.
    pub fn canonical_set(&self, target: &mut Value, value: Value) -> TreeResult<()> {
        match self.resolve_parent_mut(target) {
            Some(parent_value) => self.node.set(parent_value, value),
            None => {
                warn!(path = %self.path(), "parent value not found, canonical set skipped");
                Ok(())
            }
        }
    }

    /// Remove the value this node represents, starting from the root object.
    ///
    /// If the parent's value does not exist in `target` nothing is removed.
    pub fn canonical_unset(&self, target: &mut Value) -> TreeResult<()> {
        match self.resolve_parent_mut(target) {
            Some(parent_value) => self.node.unset(parent_value),
            None => {
                warn!(path = %self.path(), "parent value not found, canonical unset skipped");
                Ok(())
            }
        }
    }

    fn resolve_parent_mut<'v>(&self, target: &'v mut Value) -> Option<&'v mut Value> {
        let mut lineage = self.lineage();
        lineage.pop();
        lineage
            .into_iter()
            .try_fold(target, |value, node| node.accessor().get_mut(value))
    }
}

impl Deref for NodeRef<'_> {
    type Target = DiffNode;

    fn deref(&self) -> &DiffNode {
        self.node
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for NodeRef<'_> {}

impl Hash for NodeRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("path", &self.path())
            .field("state", &self.node.state())
            .finish()
    }
}

/// Single-line summary of the node, e.g.
/// `DiffNode(state=CHANGED, type=object, 2 children, accessed via root element)`.
impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DiffNode(state={}", self.node.state())?;
        if let Some(value_type) = self.node.value_type() {
            write!(f, ", type={value_type}")?;
        }
        match self.node.child_count() {
            0 => write!(f, ", no children")?,
            1 => write!(f, ", 1 child")?,
            n => write!(f, ", {n} children")?,
        }
        let categories = self.categories();
        if !categories.is_empty() {
            let joined: Vec<&str> = categories.iter().map(String::as_str).collect();
            write!(f, ", categorized as [{}]", joined.join(", "))?;
        }
        write!(f, ", accessed via {})", self.node.accessor().description())
    }
}
