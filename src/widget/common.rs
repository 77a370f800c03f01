//! Pieces shared by the widget state machines.

use crate::build::BuildContext;
use crate::frame::Frame;
use crate::input::{FrameEvent, PointerEvent, PointerPhase};
use crate::tree::{Node, NodeId, Rgb};
use std::rc::Rc;

/// Application callback receiving the frame and a value.
pub type Callback<A> = Rc<dyn Fn(&mut Frame, A)>;

/// Wrap a closure as a [`Callback`].
pub fn callback<A>(f: impl Fn(&mut Frame, A) + 'static) -> Callback<A> {
    Rc::new(f)
}

/// Fire an optional callback.
pub fn fire<A>(cb: Option<&Callback<A>>, frame: &mut Frame, arg: A) {
    if let Some(cb) = cb {
        cb(frame, arg);
    }
}

/// Opacity of the scrim drawn over disabled widgets.
pub const DISABLED_SCRIM_OPACITY: f32 = 0.5;

/// Apply enabled state to an interactive root node.
///
/// Disabled nodes take no focus, no hits and leave tab order.
pub fn interactive(node: Node, enabled: bool) -> Node {
    let mut node = node.with_focusable(enabled).with_hit_test(enabled);
    if !enabled {
        node.tab_index = -1;
    }
    node
}

/// Emit the reduced-opacity scrim over a disabled widget.
pub fn add_disabled_scrim(cx: &mut BuildContext<'_>, root: NodeId) -> NodeId {
    let mut scrim = Node::new("scrim").with_hit_test(false);
    scrim.background = Some(Rgb::BLACK);
    scrim.opacity = DISABLED_SCRIM_OPACITY;
    cx.insert(Some(root), scrim)
}

/// Whether a pointer event falls inside `node`'s laid-out rectangle.
///
/// `None` if the node has no layout yet.
pub fn pointer_inside(frame: &Frame, node: NodeId, pointer: &PointerEvent) -> Option<bool> {
    frame.layout_of(node).map(|rect| rect.contains(pointer.x, pointer.y))
}

/// Primary-button pointer payload of an event.
pub fn primary_pointer(event: &FrameEvent) -> Option<&PointerEvent> {
    event.as_pointer().filter(|p| p.is_primary())
}

/// Press-then-release-inside detection for click-activated widgets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickTracker {
    pressed: bool,
}

impl ClickTracker {
    /// Feed a pointer phase. Returns `(handled, clicked)`.
    pub fn on_pointer(&mut self, phase: PointerPhase, inside: bool) -> (bool, bool) {
        match phase {
            PointerPhase::Down => {
                self.pressed = inside;
                (inside, false)
            }
            PointerPhase::Move => (self.pressed, false),
            PointerPhase::Up => {
                let was_pressed = std::mem::take(&mut self.pressed);
                (was_pressed, was_pressed && inside)
            }
            PointerPhase::Cancel => (std::mem::take(&mut self.pressed), false),
        }
    }

    /// Whether a press is in progress.
    pub const fn is_pressed(self) -> bool {
        self.pressed
    }
}

/// Step `index` by `delta` within `count` items, wrapping both ways.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn cycle(index: usize, delta: isize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    (index as isize + delta).rem_euclid(count as isize) as usize
}

/// Index of the item under `pointer` among `items`, by layout.
pub fn item_at(frame: &Frame, items: &[NodeId], pointer: &PointerEvent) -> Option<usize> {
    items
        .iter()
        .position(|id| pointer_inside(frame, *id, pointer) == Some(true))
}
