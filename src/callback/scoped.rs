//! Scoped callback override.

use super::record::CallbackRecord;
use super::slots::WeakSlots;
use crate::frame::Frame;
use crate::tree::NodeId;
use std::rc::Rc;
use tracing::trace;

/// Temporarily replaces a node's callback record.
///
/// The original record (the same `Rc`, so the same [`RecordId`]) is put
/// back when the override is dropped or [`reset`](Self::reset). If the
/// node or its whole frame is gone by then, restoring does nothing.
///
/// [`RecordId`]: super::RecordId
#[derive(Debug)]
#[must_use = "the original callbacks are restored as soon as the override is dropped"]
pub struct CallbackOverride {
    slots: WeakSlots,
    node: NodeId,
    original: Option<Rc<CallbackRecord>>,
    active: bool,
}

impl CallbackOverride {
    /// Install `record` on `node`, remembering what was there.
    ///
    /// On a dead node the override is inert.
    pub fn install(frame: &mut Frame, node: NodeId, record: CallbackRecord) -> Self {
        let original = frame.node_callbacks(node);
        let active = frame.set_node_callbacks(node, Some(Rc::new(record)));
        Self {
            slots: frame.weak_slots(),
            node,
            original,
            active,
        }
    }

    /// The node whose callbacks were replaced.
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Restore the original record now. Later resets and the drop are no-ops.
    pub fn reset(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        let restored = self.slots.set(self.node, self.original.take());
        trace!(node = ?self.node, restored, "callback override reset");
    }
}

impl Drop for CallbackOverride {
    fn drop(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::append_node_on_event;
    use crate::input::{FrameEvent, KeyCode};
    use crate::tree::Node;

    #[test]
    fn test_restores_same_record() {
        let mut frame = Frame::new();
        let node = frame.create_root(Node::new("n"));
        append_node_on_event(&mut frame, node, |_, _, _| false);
        let before = frame.node_callbacks(node).unwrap();

        {
            let _guard = CallbackOverride::install(&mut frame, node, CallbackRecord::new().with_on_event(|_, _, _| true));
            assert!(frame.invoke_on_event(node, &FrameEvent::key(KeyCode::Enter)));
        }

        let after = frame.node_callbacks(node).unwrap();
        assert!(Rc::ptr_eq(&before, &after));
        assert_eq!(before.id(), after.id());
        assert!(!frame.invoke_on_event(node, &FrameEvent::key(KeyCode::Enter)));
    }

    #[test]
    fn test_restores_empty_slot() {
        let mut frame = Frame::new();
        let node = frame.create_root(Node::new("n"));
        let mut guard = CallbackOverride::install(&mut frame, node, CallbackRecord::new());
        assert!(frame.node_callbacks(node).is_some());
        guard.reset();
        assert!(frame.node_callbacks(node).is_none());
    }

    #[test]
    fn test_restore_on_dead_node_is_noop() {
        let mut frame = Frame::new();
        let node = frame.create_root(Node::new("n"));
        let guard = CallbackOverride::install(&mut frame, node, CallbackRecord::new());
        frame.destroy_node(node);
        drop(guard);
        assert!(frame.node_callbacks(node).is_none());
        assert!(!frame.contains(node));
    }

    #[test]
    fn test_restore_after_frame_dropped() {
        let mut frame = Frame::new();
        let node = frame.create_root(Node::new("n"));
        let mut guard = CallbackOverride::install(&mut frame, node, CallbackRecord::new());
        drop(frame);
        guard.reset();
    }
}
