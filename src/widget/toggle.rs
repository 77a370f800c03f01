//! Toggle switch: a knob that slides across a track on click.

use super::common::{add_disabled_scrim, fire, interactive, pointer_inside, primary_pointer, Callback, ClickTracker};
use super::value::{Controlled, ValueSource};
use super::WidgetSpec;
use crate::build::BuildContext;
use crate::callback::append_node_on_event;
use crate::frame::Frame;
use crate::identity::IdentityKey;
use crate::tree::{Node, NodeId, Rgb, VisualStyle};
use std::cell::Cell;
use std::rc::Rc;

/// Toggle colors.
#[derive(Debug, Clone, Copy)]
pub struct ToggleStyles {
    /// Track when off.
    pub track_off: VisualStyle,
    /// Track when on.
    pub track_on: VisualStyle,
    /// Knob.
    pub knob: VisualStyle,
}

impl Default for ToggleStyles {
    fn default() -> Self {
        Self {
            track_off: VisualStyle::solid(Rgb::new(60, 60, 60)),
            track_on: VisualStyle::solid(Rgb::new(0, 200, 100)),
            knob: VisualStyle::solid(Rgb::WHITE),
        }
    }
}

/// An on/off switch.
#[derive(Clone)]
pub struct ToggleSpec {
    /// Value source.
    pub value: ValueSource<bool>,
    /// Identity key.
    pub key: Option<IdentityKey>,
    /// Whether the toggle reacts to input.
    pub enabled: bool,
    /// Track width.
    pub width: f32,
    /// Track height; the knob is square with this side.
    pub height: f32,
    /// Colors.
    pub styles: ToggleStyles,
    /// Fired with the new value.
    pub on_change: Option<Callback<bool>>,
}

impl ToggleSpec {
    /// Create a toggle over a value source.
    pub fn new(value: impl Into<ValueSource<bool>>) -> Self {
        Self {
            value: value.into(),
            key: None,
            enabled: true,
            width: 4.0,
            height: 1.0,
            styles: ToggleStyles::default(),
            on_change: None,
        }
    }

    /// Set the identity key.
    #[must_use]
    pub fn key(mut self, key: impl Into<IdentityKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Enable or disable the toggle.
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

    fn knob_offset(&self, on: bool) -> f32 {
        if on {
            (self.width - self.height).max(0.0)
        } else {
            0.0
        }
    }
}

impl WidgetSpec for ToggleSpec {
    fn build(self, cx: &mut BuildContext<'_>, parent: Option<NodeId>) -> NodeId {
        let value = Controlled::resolve_raw(self.value.clone());
        let on = value.get();
        let track_style = if on { self.styles.track_on } else { self.styles.track_off };

        let root = cx.insert(
            parent,
            interactive(
                Node::new("toggle").with_size(self.width, self.height).with_style(track_style),
                self.enabled,
            ),
        );
        let knob = cx.insert(
            Some(root),
            Node::new("toggle.knob")
                .with_size(self.height, self.height)
                .with_offset(self.knob_offset(on), 0.0)
                .with_style(self.styles.knob)
                .with_hit_test(false),
        );
        if let Some(key) = self.key.clone() {
            cx.register(key, root);
        }
        if !self.enabled {
            add_disabled_scrim(cx, root);
            return root;
        }

        let click = Cell::new(ClickTracker::default());
        append_node_on_event(cx.frame_mut(), root, move |frame, node, event| {
            let Some(pointer) = primary_pointer(event) else {
                return false;
            };
            let Some(inside) = pointer_inside(frame, node, pointer) else {
                return false;
            };
            let mut tracker = click.get();
            let (handled, clicked) = tracker.on_pointer(pointer.phase, inside);
            click.set(tracker);
            if clicked {
                let on = value.update(|v| !v);
                frame.patch_offset(knob, self.knob_offset(on), 0.0);
                frame.patch_style(node, if on { self.styles.track_on } else { self.styles.track_off });
                fire(self.on_change.as_ref(), frame, on);
            }
            handled
        });
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, PointerPhase};
    use crate::widget::testing::Harness;
    use crate::widget::value::state;

    #[test]
    fn test_click_toggles_and_moves_knob() {
        let mut h = Harness::new();
        let shared = state(false);
        let seen = Rc::new(Cell::new(None));
        let sink = seen.clone();
        let root = h.build(
            ToggleSpec::new(ValueSource::from_state(shared.clone())).on_change(move |_, v| sink.set(Some(v))),
        );
        h.place(root, 0.0, 0.0, 4.0, 1.0);
        let knob = h.child(root, "toggle.knob");

        assert!(h.click(1.0, 0.5));
        assert!(*shared.borrow());
        assert_eq!(seen.get(), Some(true));
        assert_eq!(h.node(knob).offset_x, 3.0);
        assert!(!h.frame.invalidation().contains(crate::frame::Invalidation::REBUILD));

        h.click(1.0, 0.5);
        assert!(!*shared.borrow());
        assert_eq!(h.node(knob).offset_x, 0.0);
    }

    #[test]
    fn test_release_outside_does_not_toggle() {
        let mut h = Harness::new();
        let root = h.build(ToggleSpec::new(true));
        h.place(root, 0.0, 0.0, 4.0, 1.0);
        let knob = h.child(root, "toggle.knob");

        h.pointer(PointerPhase::Down, 1.0, 0.5);
        h.pointer(PointerPhase::Up, 9.0, 0.5);
        assert_eq!(h.node(knob).offset_x, 3.0);
    }

    #[test]
    fn test_ignores_keys() {
        let mut h = Harness::new();
        let root = h.build(ToggleSpec::new(false));
        h.focus(root);
        assert!(!h.key(KeyCode::Enter));
    }
}
