//! Event dispatch: hit-testing, bubbling and pointer capture.

use crate::focus::FocusManager;
use crate::frame::Frame;
use crate::input::{FrameEvent, PointerEvent, PointerPhase};
use crate::tree::NodeId;
use tracing::trace;

/// Routes canonical events to node callbacks.
///
/// Pointer and scroll events go to the topmost hit node; key and text
/// events go to the focused node. Either way the event then bubbles to
/// ancestors until one handles it.
///
/// A node that handles a pointer-down captures the pointer: until the
/// matching up or cancel, all pointer events go to it regardless of
/// position. When the pointer leaves a node without capture, that node
/// gets one last move event so it can drop hover state.
#[derive(Debug, Default)]
pub struct Dispatcher {
    capture: Option<NodeId>,
    hovered: Option<NodeId>,
}

impl Dispatcher {
    /// Create a dispatcher.
    pub const fn new() -> Self {
        Self {
            capture: None,
            hovered: None,
        }
    }

    /// Forget capture and hover, e.g. after the tree was rebuilt.
    pub fn reset(&mut self) {
        self.capture = None;
        self.hovered = None;
    }

    /// The node holding pointer capture.
    pub const fn captured(&self) -> Option<NodeId> {
        self.capture
    }

    /// The node last hit by a pointer move.
    pub const fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Topmost hit-testable, visible node containing `(x, y)`.
    ///
    /// Later nodes in paint order are on top. Nodes without layout are
    /// skipped.
    pub fn hit_test(frame: &Frame, x: f32, y: f32) -> Option<NodeId> {
        let tree = frame.tree();
        tree.preorder().into_iter().rev().find(|id| {
            tree.get_node(*id).is_some_and(|node| node.hit_test_visible)
                && frame.layout_of(*id).is_some_and(|rect| rect.contains(x, y))
                && tree.is_effectively_visible(*id)
        })
    }

    /// Dispatch one event. Returns `true` if some node handled it.
    pub fn dispatch(&mut self, event: &FrameEvent, frame: &mut Frame, focus: &FocusManager) -> bool {
        let handled = match event {
            FrameEvent::Pointer(pointer) => {
                let target = match self.capture.filter(|id| frame.contains(*id)) {
                    Some(captured) => Some(captured),
                    None => {
                        let hit = Self::hit_test(frame, pointer.x, pointer.y);
                        if pointer.phase == PointerPhase::Move {
                            self.update_hover(hit, event, frame);
                        }
                        hit
                    }
                };
                let handled_by = target.and_then(|t| bubble(frame, t, event));
                match pointer.phase {
                    PointerPhase::Down => {
                        if let Some(node) = handled_by {
                            self.capture = Some(node);
                        }
                    }
                    PointerPhase::Up | PointerPhase::Cancel => {
                        if let Some(released) = self.capture.take() {
                            self.rehover_after_release(released, pointer, frame);
                        }
                    }
                    PointerPhase::Move => {}
                }
                handled_by.is_some()
            }
            FrameEvent::Scroll(scroll) => {
                Self::hit_test(frame, scroll.x, scroll.y).is_some_and(|t| bubble(frame, t, event).is_some())
            }
            FrameEvent::KeyDown(_) | FrameEvent::KeyUp(_) | FrameEvent::Text(_) => focus
                .focused_node()
                .filter(|id| frame.contains(*id))
                .is_some_and(|t| bubble(frame, t, event).is_some()),
        };
        trace!(?event, handled, capture = ?self.capture, "dispatch");
        handled
    }

    /// Moves under capture skip hover tracking, and some hosts report no
    /// motion at all, so the release position decides the new hover. The
    /// released node gets a leave move if the pointer ended elsewhere.
    fn rehover_after_release(&mut self, released: NodeId, pointer: &PointerEvent, frame: &mut Frame) {
        let hit = Self::hit_test(frame, pointer.x, pointer.y);
        self.hovered = self.hovered.or(Some(released));
        let leave = FrameEvent::Pointer(PointerEvent {
            phase: PointerPhase::Move,
            ..*pointer
        });
        self.update_hover(hit, &leave, frame);
    }

    fn update_hover(&mut self, hit: Option<NodeId>, event: &FrameEvent, frame: &mut Frame) {
        let previous = std::mem::replace(&mut self.hovered, hit);
        let Some(previous) = previous.filter(|p| Some(*p) != hit) else {
            return;
        };
        let entered = hit.map(|h| frame.tree().ancestors_inclusive(h)).unwrap_or_default();
        for left in frame.tree().ancestors_inclusive(previous) {
            if !entered.contains(&left) {
                frame.invoke_on_event(left, event);
            }
        }
    }
}

/// Deliver to `target` and then its ancestors. Returns the node that
/// handled the event.
fn bubble(frame: &mut Frame, target: NodeId, event: &FrameEvent) -> Option<NodeId> {
    frame
        .tree()
        .ancestors_inclusive(target)
        .into_iter()
        .find(|id| frame.invoke_on_event(*id, event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::append_node_on_event;
    use crate::input::KeyCode;
    use crate::layout::{LayoutOutput, LayoutRect};
    use crate::tree::Node;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(&'static str, PointerPhase)>>>;

    fn record(frame: &mut Frame, id: NodeId, name: &'static str, log: &Log, handles: bool) {
        let log = log.clone();
        append_node_on_event(frame, id, move |_, _, event| {
            if let Some(p) = event.as_pointer() {
                log.borrow_mut().push((name, p.phase));
            }
            handles
        });
    }

    fn setup() -> (Frame, NodeId, NodeId, NodeId, Log) {
        let mut frame = Frame::new();
        let root = frame.create_root(Node::new("root"));
        let left = frame.create_child(root, Node::new("left").with_focusable(true));
        let right = frame.create_child(root, Node::new("right"));
        frame.set_layout(
            LayoutOutput::default()
                .with(root, LayoutRect::new(0.0, 0.0, 100.0, 50.0))
                .with(left, LayoutRect::new(0.0, 0.0, 50.0, 50.0))
                .with(right, LayoutRect::new(50.0, 0.0, 50.0, 50.0)),
        );
        let log = Log::default();
        (frame, root, left, right, log)
    }

    #[test]
    fn test_hit_test_topmost() {
        let (mut frame, root, left, _, _) = setup();
        assert_eq!(Dispatcher::hit_test(&frame, 10.0, 10.0), Some(left));
        frame.patch_visible(left, false);
        assert_eq!(Dispatcher::hit_test(&frame, 10.0, 10.0), Some(root));
        assert_eq!(Dispatcher::hit_test(&frame, 500.0, 10.0), None);
    }

    #[test]
    fn test_bubbles_to_ancestor() {
        let (mut frame, root, left, _, log) = setup();
        record(&mut frame, left, "left", &log, false);
        record(&mut frame, root, "root", &log, true);

        let mut dispatcher = Dispatcher::new();
        let focus = FocusManager::new();
        assert!(dispatcher.dispatch(&FrameEvent::pointer(PointerPhase::Down, 10.0, 10.0), &mut frame, &focus));
        assert_eq!(*log.borrow(), vec![("left", PointerPhase::Down), ("root", PointerPhase::Down)]);
        assert_eq!(dispatcher.captured(), Some(root));
    }

    #[test]
    fn test_capture_routes_moves_outside() {
        let (mut frame, _, left, right, log) = setup();
        record(&mut frame, left, "left", &log, true);
        record(&mut frame, right, "right", &log, true);

        let mut dispatcher = Dispatcher::new();
        let focus = FocusManager::new();
        dispatcher.dispatch(&FrameEvent::pointer(PointerPhase::Down, 10.0, 10.0), &mut frame, &focus);
        dispatcher.dispatch(&FrameEvent::pointer(PointerPhase::Move, 80.0, 10.0), &mut frame, &focus);
        dispatcher.dispatch(&FrameEvent::pointer(PointerPhase::Up, 80.0, 10.0), &mut frame, &focus);
        assert_eq!(dispatcher.captured(), None);
        dispatcher.dispatch(&FrameEvent::pointer(PointerPhase::Move, 80.0, 10.0), &mut frame, &focus);

        assert_eq!(
            *log.borrow(),
            vec![
                ("left", PointerPhase::Down),
                ("left", PointerPhase::Move),
                ("left", PointerPhase::Up),
                ("left", PointerPhase::Move),
                ("right", PointerPhase::Move),
            ]
        );
    }

    #[test]
    fn test_release_elsewhere_moves_hover() {
        let (mut frame, _, left, right, log) = setup();
        record(&mut frame, left, "left", &log, true);
        record(&mut frame, right, "right", &log, true);

        let mut dispatcher = Dispatcher::new();
        let focus = FocusManager::new();
        // No motion between press and release.
        dispatcher.dispatch(&FrameEvent::pointer(PointerPhase::Down, 10.0, 10.0), &mut frame, &focus);
        dispatcher.dispatch(&FrameEvent::pointer(PointerPhase::Up, 80.0, 10.0), &mut frame, &focus);

        assert_eq!(
            *log.borrow(),
            vec![
                ("left", PointerPhase::Down),
                ("left", PointerPhase::Up),
                ("left", PointerPhase::Move),
            ]
        );
        assert_eq!(dispatcher.hovered(), Some(right));
        assert_eq!(dispatcher.captured(), None);

        // Releasing over the pressed node keeps it hovered without a leave.
        log.borrow_mut().clear();
        dispatcher.dispatch(&FrameEvent::pointer(PointerPhase::Down, 60.0, 10.0), &mut frame, &focus);
        dispatcher.dispatch(&FrameEvent::pointer(PointerPhase::Up, 70.0, 10.0), &mut frame, &focus);
        assert_eq!(*log.borrow(), vec![("right", PointerPhase::Down), ("right", PointerPhase::Up)]);
        assert_eq!(dispatcher.hovered(), Some(right));
    }

    #[test]
    fn test_leave_notifies_old_hover() {
        let (mut frame, _, left, right, log) = setup();
        record(&mut frame, left, "left", &log, true);
        record(&mut frame, right, "right", &log, true);

        let mut dispatcher = Dispatcher::new();
        let focus = FocusManager::new();
        dispatcher.dispatch(&FrameEvent::pointer(PointerPhase::Move, 10.0, 10.0), &mut frame, &focus);
        dispatcher.dispatch(&FrameEvent::pointer(PointerPhase::Move, 60.0, 10.0), &mut frame, &focus);
        assert_eq!(
            *log.borrow(),
            vec![
                ("left", PointerPhase::Move),
                ("left", PointerPhase::Move),
                ("right", PointerPhase::Move),
            ]
        );
        assert_eq!(dispatcher.hovered(), Some(right));
    }

    #[test]
    fn test_keys_go_to_focus() {
        let (mut frame, _, left, _, _) = setup();
        let got = Rc::new(RefCell::new(None));
        let sink = got.clone();
        append_node_on_event(&mut frame, left, move |_, _, event| {
            *sink.borrow_mut() = event.as_key_down().map(|k| k.code);
            true
        });

        let mut dispatcher = Dispatcher::new();
        let mut focus = FocusManager::new();
        assert!(!dispatcher.dispatch(&FrameEvent::key(KeyCode::Enter), &mut frame, &focus));

        focus.set_focus(&mut frame, left);
        assert!(dispatcher.dispatch(&FrameEvent::key(KeyCode::Enter), &mut frame, &focus));
        assert_eq!(*got.borrow(), Some(KeyCode::Enter));
    }

    #[test]
    fn test_unhandled_down_does_not_capture() {
        let (mut frame, _, left, _, log) = setup();
        record(&mut frame, left, "left", &log, false);
        let mut dispatcher = Dispatcher::new();
        let focus = FocusManager::new();
        let down = FrameEvent::Pointer(PointerEvent::primary(PointerPhase::Down, 10.0, 10.0));
        assert!(!dispatcher.dispatch(&down, &mut frame, &focus));
        assert_eq!(dispatcher.captured(), None);
    }
}
