//! Appending handlers without clobbering existing ones.

use super::record::CallbackRecord;
use crate::frame::Frame;
use crate::input::FrameEvent;
use crate::tree::NodeId;
use std::rc::Rc;

/// Append an event handler to `node`.
///
/// The new handler runs before any existing one. If it returns `true` the
/// older handlers are skipped; otherwise they run and their result is the
/// composed result. Returns `false` if the node is dead.
pub fn append_node_on_event(
    frame: &mut Frame,
    node: NodeId,
    handler: impl Fn(&mut Frame, NodeId, &FrameEvent) -> bool + 'static,
) -> bool {
    compose(frame, node, |record| record.append_event(Rc::new(handler)))
}

/// Append a focus handler to `node`. Existing focus handlers run first.
pub fn append_node_on_focus(frame: &mut Frame, node: NodeId, handler: impl Fn(&mut Frame, NodeId) + 'static) -> bool {
    compose(frame, node, |record| record.append_focus(Rc::new(handler)))
}

/// Append a blur handler to `node`. Existing blur handlers run first.
pub fn append_node_on_blur(frame: &mut Frame, node: NodeId, handler: impl Fn(&mut Frame, NodeId) + 'static) -> bool {
    compose(frame, node, |record| record.append_blur(Rc::new(handler)))
}

fn compose(frame: &mut Frame, node: NodeId, extend: impl FnOnce(&CallbackRecord) -> CallbackRecord) -> bool {
    if !frame.contains(node) {
        return false;
    }
    let next = match frame.node_callbacks(node) {
        Some(current) => extend(&current),
        None => extend(&CallbackRecord::new()),
    };
    frame.set_node_callbacks(node, Some(Rc::new(next)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use crate::tree::Node;
    use std::cell::{Cell, RefCell};

    fn setup() -> (Frame, NodeId) {
        let mut frame = Frame::new();
        let node = frame.create_root(Node::new("target"));
        (frame, node)
    }

    fn enter() -> FrameEvent {
        FrameEvent::key(KeyCode::Enter)
    }

    #[test]
    fn test_newest_event_handler_short_circuits() {
        let (mut frame, node) = setup();
        let first_calls = Rc::new(Cell::new(0));

        let calls = first_calls.clone();
        append_node_on_event(&mut frame, node, move |_, _, _| {
            calls.set(calls.get() + 1);
            false
        });
        append_node_on_event(&mut frame, node, |_, _, _| true);

        assert!(frame.invoke_on_event(node, &enter()));
        assert_eq!(first_calls.get(), 0);
    }

    #[test]
    fn test_unhandled_event_falls_through() {
        let (mut frame, node) = setup();
        let order = Rc::new(RefCell::new(Vec::new()));

        let log = order.clone();
        append_node_on_event(&mut frame, node, move |_, _, _| {
            log.borrow_mut().push("h1");
            true
        });
        let log = order.clone();
        append_node_on_event(&mut frame, node, move |_, _, _| {
            log.borrow_mut().push("h2");
            false
        });

        assert!(frame.invoke_on_event(node, &enter()));
        assert_eq!(*order.borrow(), vec!["h2", "h1"]);
    }

    #[test]
    fn test_fallthrough_returns_previous_result() {
        let (mut frame, node) = setup();
        append_node_on_event(&mut frame, node, |_, _, _| false);
        append_node_on_event(&mut frame, node, |_, _, _| false);
        assert!(!frame.invoke_on_event(node, &enter()));
    }

    #[test]
    fn test_focus_runs_in_attachment_order() {
        let (mut frame, node) = setup();
        let order = Rc::new(RefCell::new(Vec::new()));
        for name in ["h1", "h2"] {
            let log = order.clone();
            append_node_on_focus(&mut frame, node, move |_, _| log.borrow_mut().push(name));
        }
        frame.invoke_on_focus(node);
        assert_eq!(*order.borrow(), vec!["h1", "h2"]);
    }

    #[test]
    fn test_focus_reentry_runs_each_handler_once() {
        let (mut frame, node) = setup();
        let order = Rc::new(RefCell::new(Vec::new()));

        let log = order.clone();
        append_node_on_focus(&mut frame, node, move |frame, node| {
            log.borrow_mut().push("h1");
            // Forward to whatever is installed on this node.
            if let Some(current) = frame.node_callbacks(node) {
                current.on_focus(frame, node);
            }
        });
        let log = order.clone();
        append_node_on_focus(&mut frame, node, move |_, _| log.borrow_mut().push("h2"));

        frame.invoke_on_focus(node);
        assert_eq!(*order.borrow(), vec!["h1", "h2"]);
    }

    #[test]
    fn test_event_reentry_is_suppressed() {
        let (mut frame, node) = setup();
        let calls = Rc::new(Cell::new(0));
        let nested = Rc::new(Cell::new(None));

        let count = calls.clone();
        let inner = nested.clone();
        append_node_on_event(&mut frame, node, move |frame, node, event| {
            count.set(count.get() + 1);
            inner.set(Some(frame.invoke_on_event(node, event)));
            true
        });

        assert!(frame.invoke_on_event(node, &enter()));
        assert_eq!(calls.get(), 1);
        assert_eq!(nested.get(), Some(false));
    }

    #[test]
    fn test_guard_is_per_node() {
        let mut frame = Frame::new();
        let a = frame.create_root(Node::new("a"));
        let b = frame.create_root(Node::new("b"));
        let b_ran = Rc::new(Cell::new(false));

        append_node_on_event(&mut frame, a, move |frame, _, event| frame.invoke_on_event(b, event));
        let ran = b_ran.clone();
        append_node_on_event(&mut frame, b, move |_, _, _| {
            ran.set(true);
            true
        });

        assert!(frame.invoke_on_event(a, &enter()));
        assert!(b_ran.get());
    }

    #[test]
    fn test_append_keeps_other_kinds() {
        let (mut frame, node) = setup();
        let blurred = Rc::new(Cell::new(false));
        let flag = blurred.clone();
        append_node_on_blur(&mut frame, node, move |_, _| flag.set(true));
        append_node_on_event(&mut frame, node, |_, _, _| true);

        frame.invoke_on_blur(node);
        assert!(blurred.get());
    }

    #[test]
    fn test_append_to_dead_node() {
        let (mut frame, node) = setup();
        frame.destroy_node(node);
        assert!(!append_node_on_event(&mut frame, node, |_, _, _| true));
        assert!(!frame.invoke_on_event(node, &enter()));
    }
}
