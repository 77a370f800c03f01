//! Frame: one tree generation with its layout, callbacks and requests.
//!
//! A frame is built from scratch on every rebuild and dropped wholesale
//! when the next one replaces it. Handlers receive `&mut Frame` and use it
//! to patch nodes, attach callbacks and ask for follow-up work.

mod patch;

use crate::callback::{CallbackKind, CallbackRecord, CallbackSlots, WeakSlots};
use crate::input::FrameEvent;
use crate::layout::{LayoutOutput, LayoutRect};
use crate::tree::{Node, NodeId, Tree};
use bitflags::bitflags;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::trace;

bitflags! {
    /// Follow-up work requested from inside a frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Invalidation: u8 {
        /// Visual fields changed; the next frame must be presented.
        const PAINT = 0b001;
        /// Geometry inputs changed; layout must run again.
        const LAYOUT = 0b010;
        /// Application state changed structurally; rebuild the tree.
        const REBUILD = 0b100;
    }
}

/// One generation of the UI.
#[derive(Debug, Default)]
pub struct Frame {
    tree: Tree,
    layout: LayoutOutput,
    callbacks: CallbackSlots,
    dispatching: HashSet<(NodeId, CallbackKind)>,
    invalidation: Invalidation,
    focus_request: Option<NodeId>,
}

impl Frame {
    /// Create an empty frame.
    pub fn new() -> Self {
        Self {
            tree: Tree::new(),
            layout: LayoutOutput::default(),
            callbacks: CallbackSlots::new(),
            dispatching: HashSet::new(),
            invalidation: Invalidation::empty(),
            focus_request: None,
        }
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Create a detached node.
    pub fn create_node(&mut self, node: Node) -> NodeId {
        let id = self.tree.create_node(node);
        self.callbacks.open(id);
        id
    }

    /// Create a node and register it as a root.
    pub fn create_root(&mut self, node: Node) -> NodeId {
        let id = self.create_node(node);
        self.tree.add_root(id);
        id
    }

    /// Create a node as the last child of `parent`.
    ///
    /// If `parent` is dead the node is created detached.
    pub fn create_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.create_node(node);
        self.tree.append_child(parent, id);
        id
    }

    /// Register a detached node as a root.
    pub fn add_root(&mut self, id: NodeId) -> bool {
        self.tree.add_root(id)
    }

    /// Attach a detached node under `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.tree.append_child(parent, child)
    }

    /// Destroy a node and its subtree, closing their callback slots.
    pub fn destroy_node(&mut self, id: NodeId) -> usize {
        let destroyed = self.tree.destroy_node(id);
        for dead in &destroyed {
            self.callbacks.close(*dead);
        }
        destroyed.len()
    }

    /// Check if `id` is a live node of this frame.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.tree.contains(id)
    }

    /// Get a node.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.get_node(id)
    }

    /// The tree.
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mutable access to the tree for structural edits during a build.
    ///
    /// Field edits after the build should go through the patch methods,
    /// which record what needs to run next.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Output of the last layout pass.
    pub const fn layout(&self) -> &LayoutOutput {
        &self.layout
    }

    /// Replace the layout output.
    pub fn set_layout(&mut self, layout: LayoutOutput) {
        self.layout = layout;
    }

    /// Absolute rectangle of a node, if it is alive and was laid out.
    #[inline]
    pub fn layout_of(&self, id: NodeId) -> Option<LayoutRect> {
        if self.contains(id) {
            self.layout.get(id)
        } else {
            None
        }
    }

    // =========================================================================
    // Callbacks
    // =========================================================================

    /// The record currently installed on a node.
    pub fn node_callbacks(&self, id: NodeId) -> Option<Rc<CallbackRecord>> {
        self.callbacks.get(id)
    }

    /// Replace a node's record. Returns `false` if the node is dead.
    pub fn set_node_callbacks(&mut self, id: NodeId, record: Option<Rc<CallbackRecord>>) -> bool {
        self.callbacks.set(id, record)
    }

    /// Remove a node's record.
    pub fn clear_node_callbacks(&mut self, id: NodeId) -> bool {
        self.callbacks.set(id, None)
    }

    /// Run a node's event chain. Returns `false` if nothing handled it.
    pub fn invoke_on_event(&mut self, id: NodeId, event: &FrameEvent) -> bool {
        self.node_callbacks(id)
            .is_some_and(|record| record.on_event(self, id, event))
    }

    /// Run a node's focus chain.
    pub fn invoke_on_focus(&mut self, id: NodeId) {
        if let Some(record) = self.node_callbacks(id) {
            record.on_focus(self, id);
        }
    }

    /// Run a node's blur chain.
    pub fn invoke_on_blur(&mut self, id: NodeId) {
        if let Some(record) = self.node_callbacks(id) {
            record.on_blur(self, id);
        }
    }

    /// Mark a callback as running. Returns `false` if it already is.
    pub(crate) fn enter_callback(&mut self, id: NodeId, kind: CallbackKind) -> bool {
        let entered = self.dispatching.insert((id, kind));
        if !entered {
            trace!(node = ?id, ?kind, "suppressed reentrant callback");
        }
        entered
    }

    pub(crate) fn leave_callback(&mut self, id: NodeId, kind: CallbackKind) {
        self.dispatching.remove(&(id, kind));
    }

    pub(crate) fn weak_slots(&self) -> WeakSlots {
        self.callbacks.downgrade()
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Ask for a full rebuild after the current event.
    pub fn request_rebuild(&mut self) {
        self.invalidation |= Invalidation::REBUILD;
    }

    /// Ask for a layout pass after the current event.
    pub fn request_layout(&mut self) {
        self.invalidation |= Invalidation::LAYOUT;
    }

    /// Ask for the next frame to be presented.
    pub fn request_paint(&mut self) {
        self.invalidation |= Invalidation::PAINT;
    }

    /// Ask for keyboard focus to move to `id` after the current event.
    pub fn request_focus(&mut self, id: NodeId) {
        self.focus_request = Some(id);
    }

    /// Take the pending focus request.
    pub fn take_focus_request(&mut self) -> Option<NodeId> {
        self.focus_request.take()
    }

    /// Requests recorded so far, without clearing them.
    pub const fn invalidation(&self) -> Invalidation {
        self.invalidation
    }

    /// Take and clear the recorded requests.
    pub fn take_invalidation(&mut self) -> Invalidation {
        std::mem::take(&mut self.invalidation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::append_node_on_event;
    use crate::input::KeyCode;

    #[test]
    fn test_destroy_closes_slots() {
        let mut frame = Frame::new();
        let root = frame.create_root(Node::new("root"));
        let child = frame.create_child(root, Node::new("child"));
        append_node_on_event(&mut frame, child, |_, _, _| true);

        assert_eq!(frame.destroy_node(root), 2);
        assert!(frame.node_callbacks(child).is_none());
        assert!(!frame.set_node_callbacks(child, Some(Rc::new(CallbackRecord::new()))));
        assert!(!frame.invoke_on_event(child, &FrameEvent::key(KeyCode::Enter)));
    }

    #[test]
    fn test_requests_accumulate() {
        let mut frame = Frame::new();
        let node = frame.create_root(Node::new("n"));
        frame.request_layout();
        frame.request_rebuild();
        frame.request_focus(node);

        assert_eq!(frame.take_invalidation(), Invalidation::LAYOUT | Invalidation::REBUILD);
        assert!(frame.take_invalidation().is_empty());
        assert_eq!(frame.take_focus_request(), Some(node));
        assert_eq!(frame.take_focus_request(), None);
    }

    #[test]
    fn test_layout_of_dead_node() {
        let mut frame = Frame::new();
        let node = frame.create_root(Node::new("n"));
        frame.set_layout(LayoutOutput::default().with(node, LayoutRect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(frame.layout_of(node).is_some());
        frame.destroy_node(node);
        assert!(frame.layout_of(node).is_none());
    }
}
