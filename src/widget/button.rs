//! Button: hover/press state machine with keyboard activation.

use super::common::{add_disabled_scrim, fire, interactive, pointer_inside, Callback};
use super::WidgetSpec;
use crate::build::BuildContext;
use crate::callback::append_node_on_event;
use crate::frame::Frame;
use crate::identity::IdentityKey;
use crate::input::{FrameEvent, PointerPhase};
use crate::tree::{Node, NodeId, Rgb, VisualStyle};
use std::cell::Cell;
use std::rc::Rc;

/// Pointer state of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    /// Pointer elsewhere.
    #[default]
    Idle,
    /// Pointer over the button.
    Hovered,
    /// Pressed and not yet released.
    Pressed,
}

impl ButtonState {
    /// Next state after a pointer event. The second value is `true` when
    /// the button activates.
    pub const fn on_pointer(self, phase: PointerPhase, inside: bool) -> (Self, bool) {
        match (self, phase, inside) {
            (_, PointerPhase::Down, true) => (Self::Pressed, false),
            (Self::Pressed, PointerPhase::Move, true) => (Self::Pressed, false),
            (Self::Pressed, PointerPhase::Up, true) => (Self::Hovered, true),
            (_, PointerPhase::Cancel, _) | (_, _, false) => (Self::Idle, false),
            (_, _, true) => (Self::Hovered, false),
        }
    }
}

/// Style per button state.
#[derive(Debug, Clone, Copy)]
pub struct ButtonStyles {
    /// Idle style.
    pub idle: VisualStyle,
    /// Hovered style.
    pub hovered: VisualStyle,
    /// Pressed style.
    pub pressed: VisualStyle,
}

impl Default for ButtonStyles {
    fn default() -> Self {
        Self {
            idle: VisualStyle::solid(Rgb::new(50, 50, 60)),
            hovered: VisualStyle::solid(Rgb::new(70, 70, 85)),
            pressed: VisualStyle::new(Rgb::new(35, 35, 45), 0.9),
        }
    }
}

impl ButtonStyles {
    /// Style for a state.
    pub const fn for_state(&self, state: ButtonState) -> VisualStyle {
        match state {
            ButtonState::Idle => self.idle,
            ButtonState::Hovered => self.hovered,
            ButtonState::Pressed => self.pressed,
        }
    }
}

/// A push button.
#[derive(Clone)]
pub struct ButtonSpec {
    /// Label text.
    pub label: String,
    /// Identity key.
    pub key: Option<IdentityKey>,
    /// Whether the button reacts to input.
    pub enabled: bool,
    /// Fixed size, if any.
    pub size: Option<(f32, f32)>,
    /// Per-state styles.
    pub styles: ButtonStyles,
    /// Fired on activation.
    pub on_click: Option<Callback<()>>,
}

impl ButtonSpec {
    /// Create an enabled button with default styles.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: None,
            enabled: true,
            size: None,
            styles: ButtonStyles::default(),
            on_click: None,
        }
    }

    /// Set the identity key.
    #[must_use]
    pub fn key(mut self, key: impl Into<IdentityKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Enable or disable the button.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set a fixed size.
    #[must_use]
    pub const fn size(mut self, width: f32, height: f32) -> Self {
        self.size = Some((width, height));
        self
    }

    /// Set the styles.
    #[must_use]
    pub const fn styles(mut self, styles: ButtonStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Set the activation callback.
    #[must_use]
    pub fn on_click(mut self, f: impl Fn(&mut Frame, ()) + 'static) -> Self {
        self.on_click = Some(Rc::new(f));
        self
    }
}

impl WidgetSpec for ButtonSpec {
    fn build(self, cx: &mut BuildContext<'_>, parent: Option<NodeId>) -> NodeId {
        let mut node = interactive(Node::new("button").with_style(self.styles.idle), self.enabled);
        if let Some((width, height)) = self.size {
            node = node.with_size(width, height);
        }
        let root = cx.insert(parent, node);
        cx.insert(Some(root), Node::label("button.label", self.label));
        if let Some(key) = self.key {
            cx.register(key, root);
        }
        if !self.enabled {
            add_disabled_scrim(cx, root);
            return root;
        }

        let styles = self.styles;
        let on_click = self.on_click;
        let state = Rc::new(Cell::new(ButtonState::Idle));
        append_node_on_event(cx.frame_mut(), root, move |frame, node, event| match event {
            FrameEvent::Pointer(pointer) if pointer.is_primary() => {
                let Some(inside) = pointer_inside(frame, node, pointer) else {
                    return false;
                };
                let before = state.get();
                let (after, activate) = before.on_pointer(pointer.phase, inside);
                state.set(after);
                if after != before {
                    frame.patch_style(node, styles.for_state(after));
                }
                if pointer.phase == PointerPhase::Down && after == ButtonState::Pressed {
                    frame.request_focus(node);
                }
                if activate {
                    fire(on_click.as_ref(), frame, ());
                }
                inside || before == ButtonState::Pressed
            }
            FrameEvent::KeyDown(key) if key.code.is_activation() && key.modifiers.is_empty() => {
                fire(on_click.as_ref(), frame, ());
                true
            }
            _ => false,
        });
        root
    }
}
