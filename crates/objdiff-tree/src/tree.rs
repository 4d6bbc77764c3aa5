//! The diff tree arena and its mutation rules.
//!
//! [`DiffTree`] owns every node in a `Vec` and hands out [`NodeId`]s. The
//! root is created together with the tree and always has [`NodeId::ROOT`].
//!
//! # Invariants
//!
//! - A node's parent is written at most once and never changes afterwards.
//! - The root is never a child; no node is its own ancestor.
//! - A node's parent lists it among its children under the node's selector,
//!   unless a later sibling with an equal selector took over that slot.
//! - Once [`sealed`](DiffTree::seal), the tree rejects every mutation.

use std::sync::Arc;

use objdiff_access::{Accessor, RootAccessor};
use objdiff_types::{NodePath, State, ValueType};
use tracing::debug;

use crate::config::TreeConfig;
use crate::error::{TreeError, TreeResult};
use crate::node::{DiffNode, NodeId};
use crate::node_ref::NodeRef;
use crate::visitor::Visitor;

/// A tree of [`DiffNode`]s describing the difference between two objects.
#[derive(Clone, Debug)]
pub struct DiffTree {
    config: TreeConfig,
    nodes: Vec<DiffNode>,
    sealed: bool,
}

impl Default for DiffTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffTree {
    /// A tree consisting of an untyped root.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default(), None)
    }

    /// A tree whose root represents a value of `value_type`.
    pub fn with_root_type(value_type: ValueType) -> Self {
        Self::with_config(TreeConfig::default(), Some(value_type))
    }

    pub fn with_config(config: TreeConfig, root_type: Option<ValueType>) -> Self {
        let mut nodes = Vec::with_capacity(config.node_capacity.max(1));
        nodes.push(DiffNode::new(
            Arc::new(RootAccessor),
            root_type,
            config.child_capacity,
        ));
        Self {
            config,
            nodes,
            sealed: false,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root_id(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, NodeId::ROOT, &self.nodes[NodeId::ROOT.index()])
    }

    /// A read cursor for `id`, or `None` if the handle is not from this tree.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.nodes
            .get(id.index())
            .map(|node| NodeRef::new(self, id, node))
    }

    /// Visit the whole tree, starting at the root.
    pub fn visit<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.root().visit(visitor);
    }

    // ---------------------------------------------------------------
    // Build phase
    // ---------------------------------------------------------------

    /// Create a node.
    ///
    /// With a `parent` the node is attached right away through
    /// [`add_child`](Self::add_child). Without one it stays detached until a
    /// later `add_child`. The root accessor is reserved for the tree root.
    pub fn create_node(
        &mut self,
        parent: Option<NodeId>,
        accessor: Arc<dyn Accessor>,
        value_type: Option<ValueType>,
    ) -> TreeResult<NodeId> {
        self.ensure_mutable()?;
        if let Some(parent) = parent {
            self.get(parent)?;
        }
        if accessor.is_root() {
            return Err(TreeError::InvalidArgument(
                "the root accessor is reserved for the root node of the tree".into(),
            ));
        }

        let id = NodeId::new(self.nodes.len());
        self.nodes.push(DiffNode::new(
            accessor,
            value_type,
            self.config.child_capacity,
        ));
        if let Some(parent) = parent {
            self.add_child(parent, id)?;
        }
        Ok(id)
    }

    /// Create an untyped node below `parent`.
    pub fn create_child(
        &mut self,
        parent: NodeId,
        accessor: impl Accessor + 'static,
    ) -> TreeResult<NodeId> {
        self.create_node(Some(parent), Arc::new(accessor), None)
    }

    /// Attach `child` to `parent`, keyed by the child's selector.
    ///
    /// Re-adding a child to its own parent just refreshes the children map.
    /// If `parent` is untouched and `child` (or anything below it) has
    /// changes, `parent` becomes [`State::Changed`]. Always returns `true`
    /// when no error is raised.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidArgument`] if `child` is the root, is `parent`
    /// itself, already belongs to another parent, or is an ancestor of
    /// `parent`. Nothing is modified in that case.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<bool> {
        self.ensure_mutable()?;
        self.get(parent)?;
        let child_node = self.get(child)?;

        if child_node.is_root_node() {
            return Err(TreeError::InvalidArgument(
                "the root node cannot be added as a child".into(),
            ));
        }
        if child == parent {
            return Err(TreeError::InvalidArgument(format!(
                "node {child} cannot be added to itself"
            )));
        }
        match child_node.parent_id() {
            Some(existing) if existing != parent => {
                return Err(TreeError::InvalidArgument(format!(
                    "node {child} already belongs to {existing} and cannot be added to {parent}"
                )));
            }
            None if self.is_ancestor(child, parent) => {
                return Err(TreeError::InvalidArgument(format!(
                    "node {child} is an ancestor of {parent}; adding it would create a cycle"
                )));
            }
            _ => {}
        }

        let selector = child_node.element_selector();
        if child_node.parent_id().is_none() {
            self.set_parent_node(child, parent)?;
        }
        let displaced = self.nodes[parent.index()]
            .children
            .insert(selector.clone(), child);
        match displaced {
            Some(previous) if previous != child => {
                debug!(parent = %parent, child = %child, %previous, selector = ?selector, "replaced child");
            }
            Some(_) => {}
            None => debug!(parent = %parent, child = %child, selector = ?selector, "attached child"),
        }

        let promote = self.nodes[parent.index()].is_untouched() && self.has_changes(child);
        if promote {
            self.nodes[parent.index()].set_state(State::Changed);
            debug!(node = %parent, "promoted to CHANGED by child {child}");
        }
        Ok(true)
    }

    /// Set the state of a node.
    pub fn set_state(&mut self, id: NodeId, state: State) -> TreeResult<()> {
        self.get_mut(id)?.set_state(state);
        Ok(())
    }

    /// Override (or with `None`, clear the override of) the value type.
    pub fn set_type(&mut self, id: NodeId, value_type: Option<ValueType>) -> TreeResult<()> {
        self.get_mut(id)?.set_value_type(value_type);
        Ok(())
    }

    pub fn set_circle_start_path(&mut self, id: NodeId, path: Option<NodePath>) -> TreeResult<()> {
        self.get_mut(id)?.set_circle_start_path(path);
        Ok(())
    }

    pub fn set_circle_start_node(&mut self, id: NodeId, start: Option<NodeId>) -> TreeResult<()> {
        if let Some(start) = start {
            self.get(start)?;
        }
        self.get_mut(id)?.set_circle_start_node(start);
        Ok(())
    }

    /// Mark `id` as circular, pointing at the node where the cycle began.
    pub fn mark_circular(&mut self, id: NodeId, start: NodeId) -> TreeResult<()> {
        self.ensure_mutable()?;
        self.get(id)?;
        let start_path = self
            .node(start)
            .map(|node| node.path())
            .ok_or(TreeError::UnknownNode(start))?;
        let node = &mut self.nodes[id.index()];
        node.set_state(State::Circular);
        node.set_circle_start_path(Some(start_path));
        node.set_circle_start_node(Some(start));
        Ok(())
    }

    /// End the build phase. Every later mutation fails with
    /// [`TreeError::InvalidState`].
    pub fn seal(&mut self) {
        if !self.sealed {
            debug!(nodes = self.nodes.len(), "diff tree sealed");
        }
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    fn ensure_mutable(&self) -> TreeResult<()> {
        if self.sealed {
            return Err(TreeError::InvalidState(
                "the diff tree is sealed and can no longer be modified".into(),
            ));
        }
        Ok(())
    }

    fn get(&self, id: NodeId) -> TreeResult<&DiffNode> {
        self.nodes.get(id.index()).ok_or(TreeError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> TreeResult<&mut DiffNode> {
        self.ensure_mutable()?;
        self.nodes
            .get_mut(id.index())
            .ok_or(TreeError::UnknownNode(id))
    }

    /// Write the parent handle of `child`. Setting the same parent again is
    /// a no-op; replacing a different one is refused.
    fn set_parent_node(&mut self, child: NodeId, parent: NodeId) -> TreeResult<()> {
        let node = self.get_mut(child)?;
        match node.parent {
            Some(existing) if existing != parent => Err(TreeError::InvalidState(format!(
                "the parent of node {child} is already {existing} and cannot be changed"
            ))),
            _ => {
                node.parent = Some(parent);
                Ok(())
            }
        }
    }

    /// Returns `true` if `candidate` is `node` or one of its ancestors.
    fn is_ancestor(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.nodes.get(id.index()).and_then(DiffNode::parent_id);
        }
        false
    }

    fn has_changes(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|node| node.has_changes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objdiff_access::{MapEntryAccessor, PropertyAccessor};
    use objdiff_types::ElementSelector;

    fn property(name: &str) -> Arc<dyn Accessor> {
        Arc::new(PropertyAccessor::new(name))
    }

    fn detached(tree: &mut DiffTree, name: &str) -> NodeId {
        tree.create_node(None, property(name), None).unwrap()
    }

    fn assert_consistent(tree: &DiffTree) {
        tree.visit(&mut |node: NodeRef<'_>, _: &mut crate::Visit| {
            if let Some(parent) = node.parent() {
                assert_eq!(
                    parent.child_id(&node.element_selector()),
                    Some(node.id()),
                    "{node:?} missing from its parent"
                );
            }
        });
    }

    #[test]
    fn new_tree_has_only_a_root() {
        let tree = DiffTree::with_root_type(ValueType::OBJECT);
        assert_eq!(tree.node_count(), 1);
        let root = tree.root();
        assert!(root.is_root_node());
        assert!(root.is_untouched());
        assert_eq!(root.parent_id(), None);
        assert_eq!(root.value_type(), Some(ValueType::OBJECT));
        assert_eq!(root.element_selector(), ElementSelector::Root);
        assert!(!tree.is_sealed());
    }

    #[test]
    fn create_node_with_parent_attaches_it() {
        let mut tree = DiffTree::new();
        let root = tree.root_id();
        let a = tree.create_node(Some(root), property("a"), None).unwrap();
        let b = tree.create_child(a, MapEntryAccessor::new("k")).unwrap();

        assert_eq!(tree.node(a).unwrap().parent_id(), Some(root));
        assert_eq!(tree.root().child_count(), 1);
        assert_eq!(tree.node(a).unwrap().child_id(&ElementSelector::map_key("k")), Some(b));
        assert_eq!(tree.node_count(), 3);
        assert_consistent(&tree);
    }

    #[test]
    fn create_node_rejects_root_accessor_and_unknown_parent() {
        let mut tree = DiffTree::new();
        let err = tree
            .create_node(None, Arc::new(RootAccessor), None)
            .unwrap_err();
        assert!(matches!(err, TreeError::InvalidArgument(_)));

        let bogus = NodeId::new(42);
        assert_eq!(
            tree.create_node(Some(bogus), property("a"), None),
            Err(TreeError::UnknownNode(bogus))
        );
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn detached_node_attaches_later() {
        let mut tree = DiffTree::new();
        let root = tree.root_id();
        let a = detached(&mut tree, "a");
        assert_eq!(tree.node(a).unwrap().parent_id(), None);
        assert!(!tree.root().has_children());

        assert_eq!(tree.add_child(root, a), Ok(true));
        assert_eq!(tree.node(a).unwrap().parent_id(), Some(root));
        assert_eq!(tree.root().child_by_property("a").map(|n| n.id()), Some(a));
        assert_consistent(&tree);
    }

    #[test]
    fn root_cannot_become_a_child() {
        let mut tree = DiffTree::new();
        let root = tree.root_id();
        let a = tree.create_child(root, PropertyAccessor::new("a")).unwrap();
        assert!(matches!(tree.add_child(a, root), Err(TreeError::InvalidArgument(_))));
        assert_eq!(tree.root().parent_id(), None);
    }

    #[test]
    fn node_cannot_be_added_to_itself() {
        let mut tree = DiffTree::new();
        let a = detached(&mut tree, "a");
        assert!(matches!(tree.add_child(a, a), Err(TreeError::InvalidArgument(_))));
        assert_eq!(tree.node(a).unwrap().parent_id(), None);
        assert!(!tree.node(a).unwrap().has_children());
    }

    #[test]
    fn reparenting_is_refused_without_side_effects() {
        let mut tree = DiffTree::new();
        let root = tree.root_id();
        let first = tree.create_child(root, PropertyAccessor::new("first")).unwrap();
        let second = tree.create_child(root, PropertyAccessor::new("second")).unwrap();
        let child = tree.create_child(first, PropertyAccessor::new("child")).unwrap();
        tree.set_state(child, State::Added).unwrap();

        let err = tree.add_child(second, child).unwrap_err();
        assert!(matches!(err, TreeError::InvalidArgument(_)));
        assert_eq!(tree.node(child).unwrap().parent_id(), Some(first));
        assert!(!tree.node(second).unwrap().has_children());
        assert!(tree.node(second).unwrap().is_untouched());
        assert_consistent(&tree);
    }

    #[test]
    fn ancestor_cannot_become_a_descendant() {
        let mut tree = DiffTree::new();
        let a = detached(&mut tree, "a");
        let b = tree.create_child(a, PropertyAccessor::new("b")).unwrap();
        let c = tree.create_child(b, PropertyAccessor::new("c")).unwrap();

        assert!(matches!(tree.add_child(c, a), Err(TreeError::InvalidArgument(_))));
        assert_eq!(tree.node(a).unwrap().parent_id(), None);
        assert!(!tree.node(c).unwrap().has_children());
    }

    #[test]
    fn re_adding_to_same_parent_is_accepted() {
        let mut tree = DiffTree::new();
        let root = tree.root_id();
        let a = tree.create_child(root, PropertyAccessor::new("a")).unwrap();
        assert_eq!(tree.add_child(root, a), Ok(true));
        assert_eq!(tree.root().child_count(), 1);
        assert_consistent(&tree);
    }

    #[test]
    fn equal_selector_replaces_the_slot() {
        let mut tree = DiffTree::new();
        let root = tree.root_id();
        let a = tree.create_child(root, PropertyAccessor::new("a")).unwrap();
        let b = tree.create_child(root, PropertyAccessor::new("b")).unwrap();
        let replacement = tree.create_child(root, PropertyAccessor::new("a")).unwrap();

        let order: Vec<NodeId> = tree.root().child_ids().collect();
        assert_eq!(order, vec![replacement, b]);
        assert_ne!(a, replacement);

        // The displaced node keeps its parent link and its path.
        let displaced = tree.node(a).unwrap();
        assert_eq!(displaced.parent_id(), Some(root));
        assert!(!tree.root().child_ids().any(|id| id == a));
        assert_eq!(displaced.path().to_string(), "/a");
    }

    #[test]
    fn untouched_parent_is_promoted_by_changed_child() {
        let mut tree = DiffTree::new();
        let root = tree.root_id();
        let quiet = detached(&mut tree, "quiet");
        tree.add_child(root, quiet).unwrap();
        assert!(tree.root().is_untouched());

        let loud = detached(&mut tree, "loud");
        tree.set_state(loud, State::Removed).unwrap();
        tree.add_child(root, loud).unwrap();
        assert!(tree.root().is_changed());
    }

    #[test]
    fn promotion_sees_deep_changes() {
        let mut tree = DiffTree::new();
        let root = tree.root_id();
        let a = detached(&mut tree, "a");
        let b = tree.create_child(a, PropertyAccessor::new("b")).unwrap();
        let c = detached(&mut tree, "c");
        tree.set_state(c, State::Added).unwrap();
        tree.add_child(b, c).unwrap();
        assert!(tree.node(b).unwrap().is_changed());

        tree.set_state(b, State::Ignored).unwrap();
        tree.add_child(root, a).unwrap();
        assert!(tree.root().is_changed());
        assert!(tree.node(b).unwrap().is_ignored());
    }

    #[test]
    fn only_untouched_parents_are_promoted() {
        for state in [State::Added, State::Removed, State::Circular, State::Ignored] {
            let mut tree = DiffTree::new();
            let parent = detached(&mut tree, "parent");
            tree.set_state(parent, state).unwrap();
            let child = detached(&mut tree, "child");
            tree.set_state(child, State::Changed).unwrap();
            tree.add_child(parent, child).unwrap();
            assert_eq!(tree.node(parent).unwrap().state(), state);
        }
    }

    #[test]
    fn set_type_overrides_and_clears() {
        let mut tree = DiffTree::new();
        let root = tree.root_id();
        let a = tree
            .create_node(
                Some(root),
                Arc::new(PropertyAccessor::new("a").with_type(ValueType::STRING)),
                Some(ValueType::NUMBER),
            )
            .unwrap();
        assert_eq!(tree.node(a).unwrap().value_type(), Some(ValueType::NUMBER));

        tree.set_type(a, Some(ValueType::ARRAY)).unwrap();
        assert_eq!(tree.node(a).unwrap().value_type(), Some(ValueType::ARRAY));

        tree.set_type(a, None).unwrap();
        assert_eq!(tree.node(a).unwrap().value_type(), Some(ValueType::STRING));
    }

    #[test]
    fn circular_markers() {
        let mut tree = DiffTree::new();
        let root = tree.root_id();
        let parent = tree.create_child(root, PropertyAccessor::new("parent")).unwrap();
        let back = tree.create_child(parent, PropertyAccessor::new("back")).unwrap();

        tree.mark_circular(back, parent).unwrap();
        let node = tree.node(back).unwrap();
        assert!(node.is_circular());
        assert_eq!(
            node.circle_start_path(),
            Some(&NodePath::start_building().property_name("parent").build())
        );
        assert_eq!(node.circle_start_node().map(|n| n.id()), Some(parent));

        tree.set_circle_start_path(back, None).unwrap();
        tree.set_circle_start_node(back, None).unwrap();
        assert_eq!(tree.node(back).unwrap().circle_start_path(), None);
        assert_eq!(tree.node(back).unwrap().circle_start_node_id(), None);

        let bogus = NodeId::new(99);
        assert_eq!(
            tree.set_circle_start_node(back, Some(bogus)),
            Err(TreeError::UnknownNode(bogus))
        );
    }

    #[test]
    fn sealed_tree_rejects_mutation() {
        let mut tree = DiffTree::new();
        let root = tree.root_id();
        let a = tree.create_child(root, PropertyAccessor::new("a")).unwrap();
        let loose = detached(&mut tree, "loose");
        tree.seal();
        tree.seal();
        assert!(tree.is_sealed());

        let invalid_state = |r: TreeResult<()>| matches!(r, Err(TreeError::InvalidState(_)));
        assert!(invalid_state(tree.set_state(a, State::Added)));
        assert!(invalid_state(tree.set_type(a, None)));
        assert!(invalid_state(tree.set_circle_start_path(a, None)));
        assert!(invalid_state(tree.set_circle_start_node(a, None)));
        assert!(invalid_state(tree.mark_circular(a, root)));
        assert!(invalid_state(tree.add_child(root, loose).map(|_| ())));
        assert!(invalid_state(tree.create_child(root, PropertyAccessor::new("b")).map(|_| ())));

        // Reads keep working.
        assert!(tree.root().child_by_property("a").is_some());
        assert!(tree.node(a).unwrap().is_untouched());
    }

    #[test]
    fn unknown_handles_are_reported() {
        let mut tree = DiffTree::new();
        let bogus = NodeId::new(7);
        assert!(tree.node(bogus).is_none());
        assert_eq!(tree.set_state(bogus, State::Added), Err(TreeError::UnknownNode(bogus)));
        assert_eq!(
            tree.add_child(tree.root_id(), bogus),
            Err(TreeError::UnknownNode(bogus))
        );
    }

    #[test]
    fn config_is_kept() {
        let config = TreeConfig {
            node_capacity: 2,
            child_capacity: 1,
        };
        let mut tree = DiffTree::with_config(config.clone(), None);
        let root = tree.root_id();
        for name in ["a", "b", "c"] {
            tree.create_child(root, PropertyAccessor::new(name)).unwrap();
        }
        assert_eq!(tree.config(), &config);
        assert_eq!(tree.root().child_count(), 3);
    }

    #[test]
    fn finished_tree_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DiffTree>();

        let mut tree = DiffTree::new();
        let root = tree.root_id();
        tree.create_child(root, PropertyAccessor::new("a")).unwrap();
        tree.seal();

        let tree = Arc::new(tree);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let tree = Arc::clone(&tree);
                std::thread::spawn(move || tree.root().child_count())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }
}
