//! Checkbox: click or Enter/Space flips a check mark in place.

use super::common::{add_disabled_scrim, fire, interactive, pointer_inside, Callback, ClickTracker};
use super::value::{Controlled, ValueSource};
use super::WidgetSpec;
use crate::build::BuildContext;
use crate::callback::append_node_on_event;
use crate::frame::Frame;
use crate::identity::IdentityKey;
use crate::input::{FrameEvent, PointerPhase};
use crate::tree::{Node, NodeId, Rgb, VisualStyle};
use std::cell::Cell;
use std::rc::Rc;

/// Checkbox colors.
#[derive(Debug, Clone, Copy)]
pub struct CheckboxStyles {
    /// The box.
    pub box_style: VisualStyle,
    /// The box while pressed.
    pub pressed: VisualStyle,
    /// The check mark.
    pub check: VisualStyle,
}

impl Default for CheckboxStyles {
    fn default() -> Self {
        Self {
            box_style: VisualStyle::solid(Rgb::new(40, 40, 40)),
            pressed: VisualStyle::new(Rgb::new(40, 40, 40), 0.7),
            check: VisualStyle::solid(Rgb::new(0, 255, 255)),
        }
    }
}

/// A checkbox with an optional label.
#[derive(Clone)]
pub struct CheckboxSpec {
    /// Value source.
    pub value: ValueSource<bool>,
    /// Label text.
    pub label: Option<String>,
    /// Identity key.
    pub key: Option<IdentityKey>,
    /// Whether the checkbox reacts to input.
    pub enabled: bool,
    /// Colors.
    pub styles: CheckboxStyles,
    /// Fired with the new value.
    pub on_change: Option<Callback<bool>>,
}

impl CheckboxSpec {
    /// Create a checkbox over a value source.
    pub fn new(value: impl Into<ValueSource<bool>>) -> Self {
        Self {
            value: value.into(),
            label: None,
            key: None,
            enabled: true,
            styles: CheckboxStyles::default(),
            on_change: None,
        }
    }

    /// Set the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the identity key.
    #[must_use]
    pub fn key(mut self, key: impl Into<IdentityKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Enable or disable the checkbox.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the change callback.
    #[must_use]
    pub fn on_change(mut self, f: impl Fn(&mut Frame, bool) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }
}

impl WidgetSpec for CheckboxSpec {
    fn build(self, cx: &mut BuildContext<'_>, parent: Option<NodeId>) -> NodeId {
        let Self {
            value,
            label,
            key,
            enabled,
            styles,
            on_change,
        } = self;
        let value = Controlled::resolve_raw(value);

        let root = cx.insert(parent, interactive(Node::new("checkbox"), enabled));
        let box_node = cx.insert(
            Some(root),
            Node::new("checkbox.box")
                .with_size(3.0, 1.0)
                .with_style(styles.box_style)
                .with_hit_test(false),
        );
        let check = cx.insert(
            Some(box_node),
            Node::label("checkbox.check", "x")
                .with_style(styles.check)
                .with_visible(value.get()),
        );
        if let Some(label) = label {
            cx.insert(Some(root), Node::label("checkbox.label", label));
        }
        if let Some(key) = key {
            cx.register(key, root);
        }
        if !enabled {
            add_disabled_scrim(cx, root);
            return root;
        }

        let click = Cell::new(ClickTracker::default());
        append_node_on_event(cx.frame_mut(), root, move |frame, node, event| {
            let toggle = |frame: &mut Frame| {
                let checked = value.update(|v| !v);
                frame.patch_visible(check, checked);
                fire(on_change.as_ref(), frame, checked);
            };
            match event {
                FrameEvent::Pointer(pointer) if pointer.is_primary() => {
                    let Some(inside) = pointer_inside(frame, node, pointer) else {
                        return false;
                    };
                    let mut tracker = click.get();
                    let (handled, clicked) = tracker.on_pointer(pointer.phase, inside);
                    click.set(tracker);
                    let pressed_style = if tracker.is_pressed() { styles.pressed } else { styles.box_style };
                    frame.patch_style(box_node, pressed_style);
                    if pointer.phase == PointerPhase::Down && inside {
                        frame.request_focus(node);
                    }
                    if clicked {
                        toggle(frame);
                    }
                    handled
                }
                FrameEvent::KeyDown(key) if key.code.is_activation() && key.modifiers.is_empty() => {
                    toggle(frame);
                    true
                }
                _ => false,
            }
        });
        root
    }
}
