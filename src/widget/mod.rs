//! Interactive widgets.
//!
//! A widget is a spec struct (plain configuration plus callbacks) that
//! builds a few nodes into the frame and attaches its state machine to
//! them through the callback composition layer. Visual feedback is
//! patched into the built nodes directly; application state changes go
//! through [controlled values](value) and callbacks, which may request a
//! rebuild.
//!
//! # Example
//!
//! ```rust,ignore
//! use flywheel_ui::widget::{ButtonSpec, SliderSpec, ValueSource};
//!
//! app.run_rebuild_if_needed(|cx| {
//!     let root = cx.insert(None, Node::new("root"));
//!     cx.add(Some(root), ButtonSpec::new("Save").key("save").on_click(|frame, ()| {
//!         frame.request_rebuild();
//!     }));
//!     cx.add(Some(root), SliderSpec::new(ValueSource::from_state(volume.clone())));
//! });
//! ```

mod button;
mod checkbox;
pub mod common;
mod dropdown;
mod list;
mod progress;
mod rows;
mod slider;
mod table;
mod tabs;
mod text_edit;
mod text_field;
mod toggle;
mod tree_view;
pub mod value;

use crate::build::BuildContext;
use crate::tree::NodeId;

pub use button::{ButtonSpec, ButtonState, ButtonStyles};
pub use checkbox::{CheckboxSpec, CheckboxStyles};
pub use common::Callback;
pub use dropdown::{DropdownSpec, DropdownStyles};
pub use list::ListSpec;
pub use progress::{ProgressSpec, ProgressStyles};
pub use rows::{navigate, RowStyles, ScrollInfo};
pub use slider::{fraction_at, Orientation, SliderSpec, SliderStyles};
pub use table::TableSpec;
pub use tabs::{TabsSpec, TabsStyles};
pub use text_edit::{EditOutcome, TextEditState};
pub use text_field::{TextFieldSpec, TextFieldStyles};
pub use toggle::{ToggleSpec, ToggleStyles};
pub use tree_view::{ActivationWindow, TreeItem, TreeSpec};
pub use value::{Binding, Controlled, StateRef, ValueSource};

/// A widget description that can build itself into a frame.
pub trait WidgetSpec {
    /// Build the widget's nodes under `parent` (or as a root) and attach
    /// its handlers. Returns the widget's root node.
    fn build(self, cx: &mut BuildContext<'_>, parent: Option<NodeId>) -> NodeId;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Drives widgets through the real dispatcher without an [`App`](crate::App).

    use super::WidgetSpec;
    use crate::build::BuildContext;
    use crate::dispatch::Dispatcher;
    use crate::focus::FocusManager;
    use crate::frame::Frame;
    use crate::identity::IdentityReconciler;
    use crate::input::{FrameEvent, KeyCode, KeyEvent, KeyModifiers, PointerEvent, PointerPhase, ScrollEvent};
    use crate::layout::LayoutRect;
    use crate::tree::{Node, NodeId};
    use std::time::Duration;

    pub(crate) struct Harness {
        pub frame: Frame,
        pub identity: IdentityReconciler,
        pub focus: FocusManager,
        pub dispatcher: Dispatcher,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                frame: Frame::new(),
                identity: IdentityReconciler::new(),
                focus: FocusManager::new(),
                dispatcher: Dispatcher::new(),
            }
        }

        pub fn build<W: WidgetSpec>(&mut self, widget: W) -> NodeId {
            let mut cx = BuildContext::new(&mut self.frame, &mut self.identity);
            cx.add(None, widget)
        }

        pub fn place(&mut self, id: NodeId, x: f32, y: f32, width: f32, height: f32) {
            let layout = self
                .frame
                .layout()
                .clone()
                .with(id, LayoutRect::new(x, y, width, height));
            self.frame.set_layout(layout);
        }

        /// First descendant of `root` (pre-order) with the given name.
        pub fn child(&self, root: NodeId, name: &str) -> NodeId {
            self.children(root, name)[0]
        }

        /// All descendants of `root` (pre-order) with the given name.
        pub fn children(&self, root: NodeId, name: &str) -> Vec<NodeId> {
            self.frame
                .tree()
                .preorder()
                .into_iter()
                .filter(|id| {
                    *id != root && self.frame.tree().ancestors_inclusive(*id).contains(&root)
                })
                .filter(|id| self.frame.node(*id).is_some_and(|n| n.name == name))
                .collect()
        }

        pub fn node(&self, id: NodeId) -> &Node {
            self.frame.node(id).unwrap()
        }

        pub fn send(&mut self, event: &FrameEvent) -> bool {
            let handled = self.dispatcher.dispatch(event, &mut self.frame, &self.focus);
            if let Some(target) = self.frame.take_focus_request() {
                self.focus.set_focus(&mut self.frame, target);
            }
            handled
        }

        pub fn pointer(&mut self, phase: PointerPhase, x: f32, y: f32) -> bool {
            self.send(&FrameEvent::pointer(phase, x, y))
        }

        pub fn pointer_at(&mut self, phase: PointerPhase, x: f32, y: f32, ms: u64) -> bool {
            let event = PointerEvent::primary(phase, x, y).at(Duration::from_millis(ms));
            self.send(&FrameEvent::Pointer(event))
        }

        pub fn click(&mut self, x: f32, y: f32) -> bool {
            let down = self.pointer(PointerPhase::Down, x, y);
            self.pointer(PointerPhase::Up, x, y);
            down
        }

        pub fn key(&mut self, code: KeyCode) -> bool {
            self.send(&FrameEvent::key(code))
        }

        pub fn key_with(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
            self.send(&FrameEvent::KeyDown(KeyEvent::with(code, modifiers)))
        }

        pub fn text(&mut self, text: &str) -> bool {
            self.send(&FrameEvent::Text(text.to_string()))
        }

        pub fn scroll(&mut self, x: f32, y: f32, scroll_y: f32) -> bool {
            self.send(&FrameEvent::Scroll(ScrollEvent {
                x,
                y,
                scroll_x: 0.0,
                scroll_y,
            }))
        }

        pub fn focus(&mut self, id: NodeId) {
            assert!(self.focus.set_focus(&mut self.frame, id));
        }
    }
}
