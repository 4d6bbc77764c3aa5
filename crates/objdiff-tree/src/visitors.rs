//! Ready-made visitors.

use std::collections::BTreeSet;

use objdiff_types::NodePath;

use crate::node::NodeId;
use crate::node_ref::NodeRef;
use crate::visitor::{Visit, Visitor};

/// Finds the node with a given absolute path.
///
/// Stops at the first match and does not descend into subtrees that cannot
/// contain the target.
#[derive(Clone, Debug)]
pub struct PathVisitor {
    target: NodePath,
    found: Option<NodeId>,
}

impl PathVisitor {
    pub fn new(target: NodePath) -> Self {
        Self {
            target,
            found: None,
        }
    }

    /// The matching node, once the traversal has found it.
    pub fn node_id(&self) -> Option<NodeId> {
        self.found
    }
}

impl Visitor for PathVisitor {
    fn accept(&mut self, node: NodeRef<'_>, visit: &mut Visit) {
        let path = node.path();
        if path.matches(&self.target) {
            self.found = Some(node.id());
            visit.stop();
        } else if !path.is_parent_of(&self.target) {
            visit.dont_go_deeper();
        }
    }
}

/// Collects the nodes accepted by a predicate, in visitation order.
pub struct FilteringVisitor<F> {
    predicate: F,
    matches: Vec<NodeId>,
}

fn has_change_state(node: NodeRef<'_>) -> bool {
    node.state().is_change()
}

impl FilteringVisitor<fn(NodeRef<'_>) -> bool> {
    /// Collects every node that is added, changed or removed.
    pub fn changes_only() -> Self {
        Self::new(has_change_state)
    }
}

impl<F> FilteringVisitor<F>
where
    F: FnMut(NodeRef<'_>) -> bool,
{
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            matches: Vec::new(),
        }
    }

    pub fn matches(&self) -> &[NodeId] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<NodeId> {
        self.matches
    }
}

impl<F> Visitor for FilteringVisitor<F>
where
    F: FnMut(NodeRef<'_>) -> bool,
{
    fn accept(&mut self, node: NodeRef<'_>, _visit: &mut Visit) {
        if (self.predicate)(node) {
            self.matches.push(node.id());
        }
    }
}

/// Collects the nodes carrying at least one of the requested categories.
///
/// Categories are inherited, so every descendant of a match matches too.
/// By default those descendants are collected as well; with
/// [`skip_matched_subtrees`](Self::skip_matched_subtrees) only the topmost
/// match of each subtree is reported.
#[derive(Clone, Debug)]
pub struct CategoryFilteringVisitor {
    categories: BTreeSet<String>,
    skip_matched_subtrees: bool,
    matches: Vec<NodeId>,
}

impl CategoryFilteringVisitor {
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            skip_matched_subtrees: false,
            matches: Vec::new(),
        }
    }

    pub fn skip_matched_subtrees(mut self) -> Self {
        self.skip_matched_subtrees = true;
        self
    }

    pub fn matches(&self) -> &[NodeId] {
        &self.matches
    }
}

impl Visitor for CategoryFilteringVisitor {
    fn accept(&mut self, node: NodeRef<'_>, visit: &mut Visit) {
        let categories = node.categories();
        if categories.is_disjoint(&self.categories) {
            return;
        }
        self.matches.push(node.id());
        if self.skip_matched_subtrees {
            visit.dont_go_deeper();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::DiffTree;
    use objdiff_access::{MapEntryAccessor, PropertyAccessor};
    use objdiff_types::State;

    /// root -> contact[personal] -> email[sensitive]
    ///                           -> phones -> {home}
    ///      -> notes
    struct Sample {
        tree: DiffTree,
        contact: NodeId,
        email: NodeId,
        phones: NodeId,
        home: NodeId,
        notes: NodeId,
    }

    fn sample() -> Sample {
        let mut tree = DiffTree::new();
        let root = tree.root_id();
        let contact = tree
            .create_child(root, PropertyAccessor::new("contact").with_categories(["personal"]))
            .unwrap();
        let email = tree
            .create_child(contact, PropertyAccessor::new("email").with_categories(["sensitive"]))
            .unwrap();
        let phones = tree.create_child(contact, PropertyAccessor::new("phones")).unwrap();
        let home = tree.create_child(phones, MapEntryAccessor::new("home")).unwrap();
        let notes = tree.create_child(root, PropertyAccessor::new("notes")).unwrap();
        Sample {
            tree,
            contact,
            email,
            phones,
            home,
            notes,
        }
    }

    #[test]
    fn path_visitor_finds_deep_node() {
        let s = sample();
        let path = NodePath::start_building()
            .property_names(["contact", "phones"])
            .map_key("home")
            .build();
        let mut visitor = PathVisitor::new(path);
        s.tree.visit(&mut visitor);
        assert_eq!(visitor.node_id(), Some(s.home));
    }

    #[test]
    fn path_visitor_prunes_unrelated_subtrees() {
        let s = sample();
        let target = NodePath::start_building().property_name("notes").build();
        let mut visitor = PathVisitor::new(target);
        let mut offered = Vec::new();
        s.tree.visit(&mut |node: NodeRef<'_>, visit: &mut Visit| {
            offered.push(node.id());
            visitor.accept(node, visit);
        });
        assert_eq!(visitor.node_id(), Some(s.notes));
        assert_eq!(offered, vec![s.tree.root_id(), s.contact, s.notes]);
    }

    #[test]
    fn path_visitor_reports_nothing_for_missing_path() {
        let s = sample();
        let mut visitor = PathVisitor::new("/contact/fax".parse().unwrap());
        s.tree.visit(&mut visitor);
        assert_eq!(visitor.node_id(), None);
    }

    #[test]
    fn changes_only_collects_changed_nodes_in_order() {
        let mut s = sample();
        s.tree.set_state(s.notes, State::Removed).unwrap();
        s.tree.set_state(s.email, State::Changed).unwrap();
        s.tree.set_state(s.home, State::Ignored).unwrap();

        let mut visitor = FilteringVisitor::changes_only();
        s.tree.visit(&mut visitor);
        assert_eq!(visitor.matches(), &[s.email, s.notes]);
    }

    #[test]
    fn custom_predicate() {
        let s = sample();
        let mut visitor = FilteringVisitor::new(|node: NodeRef<'_>| node.has_children());
        s.tree.visit(&mut visitor);
        assert_eq!(
            visitor.into_matches(),
            vec![s.tree.root_id(), s.contact, s.phones]
        );
    }

    #[test]
    fn category_filter_includes_inherited_matches() {
        let s = sample();
        let mut visitor = CategoryFilteringVisitor::new(["personal"]);
        s.tree.visit(&mut visitor);
        assert_eq!(visitor.matches(), &[s.contact, s.email, s.phones, s.home]);

        let mut sensitive = CategoryFilteringVisitor::new(["sensitive", "unused"]);
        s.tree.visit(&mut sensitive);
        assert_eq!(sensitive.matches(), &[s.email]);
    }

    #[test]
    fn category_filter_can_skip_matched_subtrees() {
        let s = sample();
        let mut visitor = CategoryFilteringVisitor::new(["personal"]).skip_matched_subtrees();
        s.tree.visit(&mut visitor);
        assert_eq!(visitor.matches(), &[s.contact]);
    }
}
