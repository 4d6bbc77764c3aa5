//! The visitor protocol for walking a diff tree.
//!
//! Traversal is depth-first and pre-order: a node is offered to the visitor
//! before any of its children, children in insertion order. For each node
//! the visitor gets a fresh [`Visit`] through which it can
//!
//! - [`stop`](Visit::stop) the whole traversal: nothing else is visited and
//!   the entry point returns normally, or
//! - [`dont_go_deeper`](Visit::dont_go_deeper): the children of the current
//!   node are skipped, traversal continues with its next sibling.
//!
//! Any `FnMut(NodeRef<'_>, &mut Visit)` closure is a visitor.

use std::ops::ControlFlow;

use tracing::trace;

use crate::node_ref::NodeRef;

/// Per-node traversal control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visit {
    stopped: bool,
    allowed_to_go_deeper: bool,
}

impl Default for Visit {
    fn default() -> Self {
        Self::new()
    }
}

impl Visit {
    pub fn new() -> Self {
        Self {
            stopped: false,
            allowed_to_go_deeper: true,
        }
    }

    /// Abort the entire traversal.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Skip the children of the current node.
    pub fn dont_go_deeper(&mut self) {
        self.allowed_to_go_deeper = false;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_allowed_to_go_deeper(&self) -> bool {
        self.allowed_to_go_deeper
    }
}

/// Callback invoked for every visited node.
pub trait Visitor {
    fn accept(&mut self, node: NodeRef<'_>, visit: &mut Visit);
}

impl<F> Visitor for F
where
    F: FnMut(NodeRef<'_>, &mut Visit),
{
    fn accept(&mut self, node: NodeRef<'_>, visit: &mut Visit) {
        self(node, visit)
    }
}

/// Offer `node` and then its subtree to `visitor`.
///
/// `Break` means a visitor asked to stop; callers pass it straight up.
pub(crate) fn walk<V: Visitor + ?Sized>(node: NodeRef<'_>, visitor: &mut V) -> ControlFlow<()> {
    let mut visit = Visit::new();
    visitor.accept(node, &mut visit);
    if visit.is_stopped() {
        trace!(node = %node.id(), "visitation stopped");
        return ControlFlow::Break(());
    }
    if visit.is_allowed_to_go_deeper() {
        walk_children(node, visitor)?;
    }
    ControlFlow::Continue(())
}

/// Offer the subtrees of all children of `node`, but not `node` itself.
pub(crate) fn walk_children<V: Visitor + ?Sized>(
    node: NodeRef<'_>,
    visitor: &mut V,
) -> ControlFlow<()> {
    for child in node.children() {
        walk(child, visitor)?;
    }
    ControlFlow::Continue(())
}
