//! Progress bar: a fill proportional to a value, optionally draggable.

use super::common::{add_disabled_scrim, fire, interactive, Callback};
use super::slider::{range_key, Orientation, RangeAction, RangeGesture, SliderStyles};
use super::value::{clamp_unit, Controlled, ValueSource};
use super::WidgetSpec;
use crate::build::BuildContext;
use crate::callback::append_node_on_event;
use crate::frame::Frame;
use crate::identity::IdentityKey;
use crate::input::FrameEvent;
use crate::tree::{Node, NodeId, Rgb, SizeHint, VisualStyle};
use std::cell::Cell;
use std::rc::Rc;

/// Progress bar colors.
#[derive(Debug, Clone, Copy)]
pub struct ProgressStyles {
    /// Empty portion.
    pub track: VisualStyle,
    /// Filled portion.
    pub fill: VisualStyle,
    /// Opacity while hovered (interactive bars only).
    pub hover_opacity: f32,
    /// Opacity while dragging (interactive bars only).
    pub press_opacity: f32,
}

impl Default for ProgressStyles {
    fn default() -> Self {
        Self {
            track: VisualStyle::solid(Rgb::new(60, 60, 60)),
            fill: VisualStyle::solid(Rgb::new(0, 200, 100)),
            hover_opacity: 0.85,
            press_opacity: 0.7,
        }
    }
}

impl ProgressStyles {
    fn as_slider(&self) -> SliderStyles {
        SliderStyles {
            track: self.track,
            fill: self.fill,
            knob: self.fill,
            hover_opacity: self.hover_opacity,
            press_opacity: self.press_opacity,
        }
    }
}

/// A horizontal progress bar.
///
/// Display-only unless `interactive` is set, in which case it behaves like
/// a knobless slider: drag to scrub, Home/End/Left/Right to step.
#[derive(Clone)]
pub struct ProgressSpec {
    /// Value source; values are clamped to `[0, 1]`.
    pub value: ValueSource<f32>,
    /// Identity key.
    pub key: Option<IdentityKey>,
    /// Whether the bar reacts to input at all.
    pub enabled: bool,
    /// Whether the bar can be scrubbed.
    pub interactive: bool,
    /// Bar width.
    pub width: f32,
    /// Bar height.
    pub height: f32,
    /// Keyboard step.
    pub step: f32,
    /// Colors.
    pub styles: ProgressStyles,
    /// Fired with each new value.
    pub on_change: Option<Callback<f32>>,
    /// Fired with the value before a scrub starts.
    pub on_drag_start: Option<Callback<f32>>,
    /// Fired with the value when a scrub ends.
    pub on_drag_end: Option<Callback<f32>>,
}

impl ProgressSpec {
    /// Create a display-only progress bar.
    pub fn new(value: impl Into<ValueSource<f32>>) -> Self {
        Self {
            value: value.into(),
            key: None,
            enabled: true,
            interactive: false,
            width: 20.0,
            height: 1.0,
            step: 0.05,
            styles: ProgressStyles::default(),
            on_change: None,
            on_drag_start: None,
            on_drag_end: None,
        }
    }

    /// Set the identity key.
    #[must_use]
    pub fn key(mut self, key: impl Into<IdentityKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Make the bar scrubbable.
    #[must_use]
    pub const fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Enable or disable the bar.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the change callback.
    #[must_use]
    pub fn on_change(mut self, f: impl Fn(&mut Frame, f32) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    /// Set the scrub-start callback.
    #[must_use]
    pub fn on_drag_start(mut self, f: impl Fn(&mut Frame, f32) + 'static) -> Self {
        self.on_drag_start = Some(Rc::new(f));
        self
    }

    /// Set the scrub-end callback.
    #[must_use]
    pub fn on_drag_end(mut self, f: impl Fn(&mut Frame, f32) + 'static) -> Self {
        self.on_drag_end = Some(Rc::new(f));
        self
    }
}

impl WidgetSpec for ProgressSpec {
    fn build(self, cx: &mut BuildContext<'_>, parent: Option<NodeId>) -> NodeId {
        let value = Controlled::resolve(self.value.clone(), clamp_unit);
        let scrubbable = self.enabled && self.interactive;
        let mut node = Node::new("progress")
            .with_size(self.width, self.height)
            .with_style(self.styles.track);
        node = if self.interactive {
            interactive(node, self.enabled)
        } else {
            node.with_hit_test(false)
        };
        let root = cx.insert(parent, node);
        let mut fill_node = Node::new("progress.fill")
            .with_style(self.styles.fill)
            .with_hit_test(false);
        fill_node.size_hint = SizeHint::fixed(self.width * value.get(), self.height);
        let fill = cx.insert(Some(root), fill_node);
        if let Some(key) = self.key.clone() {
            cx.register(key, root);
        }
        if self.interactive && !self.enabled {
            add_disabled_scrim(cx, root);
        }
        if !scrubbable {
            return root;
        }

        let styles = self.styles.as_slider();
        let gesture = Cell::new(RangeGesture::default());
        append_node_on_event(cx.frame_mut(), root, move |frame, node, event| {
            let set = |frame: &mut Frame, target: f32| {
                let before = value.get();
                let after = value.set(target);
                if after != before {
                    frame.patch_size_hint(fill, SizeHint::fixed(self.width * after, self.height));
                    fire(self.on_change.as_ref(), frame, after);
                }
            };
            match event {
                FrameEvent::Pointer(pointer) => {
                    let Some(rect) = frame.layout_of(node) else {
                        return false;
                    };
                    let mut g = gesture.get();
                    let action = g.on_pointer(pointer, rect, Orientation::Horizontal);
                    gesture.set(g);
                    let opacity = g.opacity(&styles);
                    frame.patch_opacity(node, opacity);
                    frame.patch_opacity(fill, opacity);
                    match action {
                        RangeAction::Ignore => false,
                        RangeAction::Hover => g.hovered,
                        RangeAction::Start(fraction) => {
                            frame.request_focus(node);
                            fire(self.on_drag_start.as_ref(), frame, value.get());
                            set(frame, fraction);
                            true
                        }
                        RangeAction::Drag(fraction) => {
                            set(frame, fraction);
                            true
                        }
                        RangeAction::End => {
                            fire(self.on_drag_end.as_ref(), frame, value.get());
                            true
                        }
                    }
                }
                FrameEvent::KeyDown(key) => match range_key(key.code, value.get(), self.step, Orientation::Horizontal) {
                    Some(target) => {
                        set(frame, target);
                        true
                    }
                    None => false,
                },
                _ => false,
            }
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
    use std::cell::RefCell;

    fn scrubbable(h: &mut Harness, spec: ProgressSpec) -> (NodeId, NodeId) {
        let root = h.build(spec.interactive(true));
        h.place(root, 0.0, 0.0, 20.0, 1.0);
        let fill = h.child(root, "progress.fill");
        (root, fill)
    }

    #[test]
    fn test_display_only_ignores_input() {
        let mut h = Harness::new();
        let root = h.build(ProgressSpec::new(0.25_f32));
        h.place(root, 0.0, 0.0, 20.0, 1.0);
        let fill = h.child(root, "progress.fill");
        assert_eq!(h.node(fill).size_hint.width, Some(5.0));
        assert!(!h.node(root).focusable);
        assert!(!h.pointer(PointerPhase::Down, 10.0, 0.5));
    }

    #[test]
    fn test_interactive_scrub() {
        let mut h = Harness::new();
        let shared = state(0.0_f32);
        let root = h.build(ProgressSpec::new(ValueSource::from_state(shared.clone())).interactive(true));
        h.place(root, 0.0, 0.0, 20.0, 1.0);
        let fill = h.child(root, "progress.fill");

        h.pointer(PointerPhase::Down, 10.0, 0.5);
        assert_eq!(*shared.borrow(), 0.5);
        assert_eq!(h.node(fill).size_hint.width, Some(10.0));
        h.pointer(PointerPhase::Move, 40.0, 0.5);
        assert_eq!(*shared.borrow(), 1.0);
        h.pointer(PointerPhase::Up, 40.0, 0.5);

        h.key(KeyCode::Home);
        assert_eq!(*shared.borrow(), 0.0);
    }

    #[test]
    fn test_scrub_brackets_with_drag_callbacks() {
        let mut h = Harness::new();
        let shared = state(0.25_f32);
        let log = Rc::new(RefCell::new(Vec::new()));
        let (start, end) = (log.clone(), log.clone());
        scrubbable(
            &mut h,
            ProgressSpec::new(ValueSource::from_state(shared.clone()))
                .on_drag_start(move |_, v| start.borrow_mut().push(("start", v)))
                .on_drag_end(move |_, v| end.borrow_mut().push(("end", v))),
        );

        h.pointer(PointerPhase::Down, 15.0, 0.5);
        assert_eq!(*log.borrow(), vec![("start", 0.25)]);
        h.pointer(PointerPhase::Move, 5.0, 0.5);
        h.pointer(PointerPhase::Up, 5.0, 0.5);
        assert_eq!(*log.borrow(), vec![("start", 0.25), ("end", 0.25)]);

        // Keyboard steps are not gestures.
        h.key(KeyCode::End);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_hover_and_press_opacity() {
        let mut h = Harness::new();
        let (root, fill) = scrubbable(&mut h, ProgressSpec::new(0.5_f32));
        let styles = ProgressStyles::default();

        h.pointer(PointerPhase::Move, 5.0, 0.5);
        assert_eq!(h.node(fill).opacity, styles.hover_opacity);
        assert_eq!(h.node(root).opacity, styles.hover_opacity);

        h.pointer(PointerPhase::Down, 5.0, 0.5);
        assert_eq!(h.node(fill).opacity, styles.press_opacity);
        assert_eq!(h.node(root).opacity, styles.press_opacity);

        h.pointer(PointerPhase::Up, 5.0, 0.5);
        assert_eq!(h.node(fill).opacity, styles.hover_opacity);
        h.pointer(PointerPhase::Move, 50.0, 5.0);
        assert_eq!(h.node(fill).opacity, 1.0);
        assert_eq!(h.node(root).opacity, 1.0);
    }

    #[test]
    fn test_drag_outside_track_clamps() {
        let mut h = Harness::new();
        let shared = state(0.5_f32);
        let (_, fill) = scrubbable(&mut h, ProgressSpec::new(ValueSource::from_state(shared.clone())));

        h.pointer(PointerPhase::Down, 10.0, 0.5);
        h.pointer(PointerPhase::Move, 300.0, 9.0);
        assert_eq!(*shared.borrow(), 1.0);
        assert_eq!(h.node(fill).size_hint.width, Some(20.0));
        h.pointer(PointerPhase::Move, -300.0, 0.5);
        assert_eq!(*shared.borrow(), 0.0);
        assert_eq!(h.node(fill).size_hint.width, Some(0.0));
        h.pointer(PointerPhase::Up, -300.0, 0.5);
    }

    #[test]
    fn test_keys_step_and_jump() {
        let mut h = Harness::new();
        let shared = state(0.5_f32);
        let (root, fill) = scrubbable(&mut h, ProgressSpec::new(ValueSource::from_state(shared.clone())));
        h.focus(root);

        h.key(KeyCode::End);
        assert_eq!(*shared.borrow(), 1.0);
        assert_eq!(h.node(fill).size_hint.width, Some(20.0));
        h.key(KeyCode::Right);
        assert_eq!(*shared.borrow(), 1.0);
        h.key(KeyCode::Home);
        assert_eq!(*shared.borrow(), 0.0);
        h.key(KeyCode::Left);
        assert_eq!(*shared.borrow(), 0.0);
        h.key(KeyCode::Right);
        assert!((*shared.borrow() - 0.05).abs() < 1e-6);
        assert!(!h.key(KeyCode::Up));
    }
}
