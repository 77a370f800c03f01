//! Callback records: the immutable handler set a node slot holds.

use crate::frame::Frame;
use crate::input::FrameEvent;
use crate::tree::NodeId;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Event handler. Returns `true` if the event was handled.
pub type EventHandler = Rc<dyn Fn(&mut Frame, NodeId, &FrameEvent) -> bool>;

/// Focus or blur handler.
pub type FocusHandler = Rc<dyn Fn(&mut Frame, NodeId)>;

/// Kind of callback, used to key the reentrancy guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    /// `on_event`.
    Event,
    /// `on_focus`.
    Focus,
    /// `on_blur`.
    Blur,
}

static NEXT_RECORD: AtomicU64 = AtomicU64::new(1);

/// Identity of a callback record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(u64);

impl RecordId {
    fn next() -> Self {
        Self(NEXT_RECORD.fetch_add(1, Ordering::Relaxed))
    }
}

/// The `{on_event, on_focus, on_blur}` handlers attached to one node.
///
/// A record is immutable once built. Composition produces a new record
/// (with a new [`RecordId`]) whose chains extend the old one's.
///
/// Event handlers run newest first and stop at the first one returning
/// `true`. Focus and blur handlers all run, oldest first.
pub struct CallbackRecord {
    id: RecordId,
    on_event: Vec<EventHandler>,
    on_focus: Vec<FocusHandler>,
    on_blur: Vec<FocusHandler>,
}

impl Default for CallbackRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRecord")
            .field("id", &self.id)
            .field("on_event", &self.on_event.len())
            .field("on_focus", &self.on_focus.len())
            .field("on_blur", &self.on_blur.len())
            .finish()
    }
}

impl CallbackRecord {
    /// An empty record.
    pub fn new() -> Self {
        Self {
            id: RecordId::next(),
            on_event: Vec::new(),
            on_focus: Vec::new(),
            on_blur: Vec::new(),
        }
    }

    /// Builder: set the event handler.
    #[must_use]
    pub fn with_on_event(mut self, handler: impl Fn(&mut Frame, NodeId, &FrameEvent) -> bool + 'static) -> Self {
        self.on_event = vec![Rc::new(handler)];
        self
    }

    /// Builder: set the focus handler.
    #[must_use]
    pub fn with_on_focus(mut self, handler: impl Fn(&mut Frame, NodeId) + 'static) -> Self {
        self.on_focus = vec![Rc::new(handler)];
        self
    }

    /// Builder: set the blur handler.
    #[must_use]
    pub fn with_on_blur(mut self, handler: impl Fn(&mut Frame, NodeId) + 'static) -> Self {
        self.on_blur = vec![Rc::new(handler)];
        self
    }

    /// Identity of this record.
    pub const fn id(&self) -> RecordId {
        self.id
    }

    /// Check if the record has an event handler.
    pub fn has_on_event(&self) -> bool {
        !self.on_event.is_empty()
    }

    /// Check if the record has a focus handler.
    pub fn has_on_focus(&self) -> bool {
        !self.on_focus.is_empty()
    }

    /// Check if the record has a blur handler.
    pub fn has_on_blur(&self) -> bool {
        !self.on_blur.is_empty()
    }

    /// Run the event chain for `node`.
    ///
    /// Returns `false` without running anything if the event callback of
    /// `node` is already executing further up the stack.
    pub fn on_event(&self, frame: &mut Frame, node: NodeId, event: &FrameEvent) -> bool {
        if self.on_event.is_empty() || !frame.enter_callback(node, CallbackKind::Event) {
            return false;
        }
        let handled = self.on_event.iter().rev().any(|h| h(frame, node, event));
        frame.leave_callback(node, CallbackKind::Event);
        handled
    }

    /// Run the focus chain for `node`. Nested runs are suppressed.
    pub fn on_focus(&self, frame: &mut Frame, node: NodeId) {
        Self::run_all(&self.on_focus, frame, node, CallbackKind::Focus);
    }

    /// Run the blur chain for `node`. Nested runs are suppressed.
    pub fn on_blur(&self, frame: &mut Frame, node: NodeId) {
        Self::run_all(&self.on_blur, frame, node, CallbackKind::Blur);
    }

    fn run_all(chain: &[FocusHandler], frame: &mut Frame, node: NodeId, kind: CallbackKind) {
        if chain.is_empty() || !frame.enter_callback(node, kind) {
            return;
        }
        for handler in chain {
            handler(frame, node);
        }
        frame.leave_callback(node, kind);
    }

    /// A new record whose event chain has `handler` in front.
    pub(crate) fn append_event(&self, handler: EventHandler) -> Self {
        let mut next = self.fork();
        next.on_event.push(handler);
        next
    }

    /// A new record whose focus chain has `handler` at the end.
    pub(crate) fn append_focus(&self, handler: FocusHandler) -> Self {
        let mut next = self.fork();
        next.on_focus.push(handler);
        next
    }

    /// A new record whose blur chain has `handler` at the end.
    pub(crate) fn append_blur(&self, handler: FocusHandler) -> Self {
        let mut next = self.fork();
        next.on_blur.push(handler);
        next
    }

    fn fork(&self) -> Self {
        Self {
            id: RecordId::next(),
            on_event: self.on_event.clone(),
            on_focus: self.on_focus.clone(),
            on_blur: self.on_blur.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use crate::tree::Node;

    #[test]
    fn test_fresh_ids() {
        let a = CallbackRecord::new();
        let b = a.append_focus(Rc::new(|_, _| {}));
        assert_ne!(a.id(), b.id());
        assert!(!a.has_on_focus());
        assert!(b.has_on_focus());
    }

    #[test]
    fn test_empty_chain_is_unhandled() {
        let mut frame = Frame::new();
        let node = frame.create_root(Node::new("n"));
        let record = CallbackRecord::new();
        assert!(!record.on_event(&mut frame, node, &FrameEvent::key(KeyCode::Enter)));
    }
}
