//! Build context handed to the application's rebuild function.

use crate::frame::Frame;
use crate::identity::{IdentityKey, IdentityReconciler};
use crate::tree::{Node, NodeId};
use crate::widget::WidgetSpec;

/// Everything a rebuild needs: the fresh frame and the identity map of
/// the generation being built.
pub struct BuildContext<'a> {
    frame: &'a mut Frame,
    identity: &'a mut IdentityReconciler,
}

impl<'a> BuildContext<'a> {
    /// Create a context over a frame and reconciler.
    pub fn new(frame: &'a mut Frame, identity: &'a mut IdentityReconciler) -> Self {
        Self { frame, identity }
    }

    /// The frame being built.
    pub fn frame(&self) -> &Frame {
        self.frame
    }

    /// Mutable access to the frame being built.
    pub fn frame_mut(&mut self) -> &mut Frame {
        self.frame
    }

    /// Create a node under `parent`, or as a root if `parent` is `None`.
    pub fn insert(&mut self, parent: Option<NodeId>, node: Node) -> NodeId {
        match parent {
            Some(parent) => self.frame.create_child(parent, node),
            None => self.frame.create_root(node),
        }
    }

    /// Register `id` under a stable identity key.
    pub fn register(&mut self, key: impl Into<IdentityKey>, id: NodeId) {
        self.identity.register_node(key, id);
    }

    /// Node registered under `key` so far in this build.
    pub fn find(&self, key: &str) -> Option<NodeId> {
        self.identity.find_node(key)
    }

    /// Build a widget under `parent` and return its root node.
    pub fn add<W: WidgetSpec>(&mut self, parent: Option<NodeId>, widget: W) -> NodeId {
        widget.build(self, parent)
    }
}
