//! Slider: drag or step a value in `[0, 1]`.

use super::common::{add_disabled_scrim, fire, interactive, pointer_inside, Callback};
use super::value::{clamp_unit, Controlled, ValueSource};
use super::WidgetSpec;
use crate::build::BuildContext;
use crate::callback::append_node_on_event;
use crate::frame::Frame;
use crate::identity::IdentityKey;
use crate::input::{FrameEvent, KeyCode, PointerEvent, PointerPhase};
use crate::layout::LayoutRect;
use crate::tree::{Node, NodeId, Rgb, SizeHint, VisualStyle};
use std::cell::Cell;
use std::rc::Rc;

/// Slider axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Left is 0, right is 1.
    #[default]
    Horizontal,
    /// Bottom is 0, top is 1.
    Vertical,
}

/// Map a pointer position on a track to a fraction in `[0, 1]`.
///
/// Positions past either end clamp.
pub fn fraction_at(track: LayoutRect, orientation: Orientation, x: f32, y: f32) -> f32 {
    match orientation {
        Orientation::Horizontal => clamp_unit((x - track.x) / track.width),
        Orientation::Vertical => clamp_unit(1.0 - (y - track.y) / track.height),
    }
}

/// Slider colors and opacity overrides.
#[derive(Debug, Clone, Copy)]
pub struct SliderStyles {
    /// Track.
    pub track: VisualStyle,
    /// Filled part of the track.
    pub fill: VisualStyle,
    /// Knob.
    pub knob: VisualStyle,
    /// Track and fill opacity while hovered.
    pub hover_opacity: f32,
    /// Track and fill opacity while dragging.
    pub press_opacity: f32,
}

impl Default for SliderStyles {
    fn default() -> Self {
        Self {
            track: VisualStyle::solid(Rgb::new(60, 60, 60)),
            fill: VisualStyle::solid(Rgb::new(0, 200, 100)),
            knob: VisualStyle::solid(Rgb::WHITE),
            hover_opacity: 0.85,
            press_opacity: 0.7,
        }
    }
}

/// Hover and drag state shared by sliders and interactive progress bars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RangeGesture {
    pub hovered: bool,
    pub dragging: bool,
}

/// What a range widget should do after a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RangeAction {
    Ignore,
    Hover,
    Start(f32),
    Drag(f32),
    End,
}

impl RangeGesture {
    /// Advance the gesture. `rect` is the track's layout.
    pub fn on_pointer(&mut self, pointer: &PointerEvent, rect: LayoutRect, orientation: Orientation) -> RangeAction {
        let inside = rect.contains(pointer.x, pointer.y);
        let fraction = || fraction_at(rect, orientation, pointer.x, pointer.y);
        match pointer.phase {
            PointerPhase::Down if inside && pointer.is_primary() => {
                self.dragging = true;
                RangeAction::Start(fraction())
            }
            PointerPhase::Move if self.dragging => RangeAction::Drag(fraction()),
            PointerPhase::Up | PointerPhase::Cancel if self.dragging => {
                self.dragging = false;
                self.hovered = inside && pointer.phase == PointerPhase::Up;
                RangeAction::End
            }
            PointerPhase::Move if self.hovered != inside => {
                self.hovered = inside;
                RangeAction::Hover
            }
            _ => RangeAction::Ignore,
        }
    }

    /// Opacity override for track and fill.
    pub fn opacity(self, styles: &SliderStyles) -> f32 {
        if self.dragging {
            styles.press_opacity
        } else if self.hovered {
            styles.hover_opacity
        } else {
            1.0
        }
    }
}

/// Keyboard target for range widgets. `None` for keys they ignore.
pub(crate) fn range_key(code: KeyCode, current: f32, step: f32, orientation: Orientation) -> Option<f32> {
    let (decrease, increase) = match orientation {
        Orientation::Horizontal => (KeyCode::Left, KeyCode::Right),
        Orientation::Vertical => (KeyCode::Down, KeyCode::Up),
    };
    match code {
        KeyCode::Home => Some(0.0),
        KeyCode::End => Some(1.0),
        c if c == decrease => Some(current - step),
        c if c == increase => Some(current + step),
        _ => None,
    }
}

/// A draggable slider.
#[derive(Clone)]
pub struct SliderSpec {
    /// Value source; values are clamped to `[0, 1]`.
    pub value: ValueSource<f32>,
    /// Identity key.
    pub key: Option<IdentityKey>,
    /// Whether the slider reacts to input.
    pub enabled: bool,
    /// Axis.
    pub orientation: Orientation,
    /// Track length along the axis.
    pub length: f32,
    /// Track thickness across the axis.
    pub thickness: f32,
    /// Keyboard step.
    pub step: f32,
    /// Colors.
    pub styles: SliderStyles,
    /// Fired with each new value.
    pub on_change: Option<Callback<f32>>,
    /// Fired with the value when a drag starts.
    pub on_drag_start: Option<Callback<f32>>,
    /// Fired with the value when a drag ends.
    pub on_drag_end: Option<Callback<f32>>,
}

impl SliderSpec {
    /// Create a horizontal slider over a value source.
    pub fn new(value: impl Into<ValueSource<f32>>) -> Self {
        Self {
            value: value.into(),
            key: None,
            enabled: true,
            orientation: Orientation::Horizontal,
            length: 20.0,
            thickness: 1.0,
            step: 0.05,
            styles: SliderStyles::default(),
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

    /// Enable or disable the slider.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the axis.
    #[must_use]
    pub const fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the keyboard step.
    #[must_use]
    pub const fn step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Set the change callback.
    #[must_use]
    pub fn on_change(mut self, f: impl Fn(&mut Frame, f32) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    /// Set the drag-start callback.
    #[must_use]
    pub fn on_drag_start(mut self, f: impl Fn(&mut Frame, f32) + 'static) -> Self {
        self.on_drag_start = Some(Rc::new(f));
        self
    }

    /// Set the drag-end callback.
    #[must_use]
    pub fn on_drag_end(mut self, f: impl Fn(&mut Frame, f32) + 'static) -> Self {
        self.on_drag_end = Some(Rc::new(f));
        self
    }
}

/// Nodes of a built slider and how to place them for a value.
#[derive(Debug, Clone, Copy)]
struct SliderParts {
    fill: NodeId,
    knob: NodeId,
    orientation: Orientation,
    length: f32,
    thickness: f32,
}

impl SliderParts {
    fn fill_hint(&self, value: f32) -> SizeHint {
        match self.orientation {
            Orientation::Horizontal => SizeHint::fixed(self.length * value, self.thickness),
            Orientation::Vertical => SizeHint::fixed(self.thickness, self.length * value),
        }
    }

    fn fill_offset(&self, value: f32) -> (f32, f32) {
        match self.orientation {
            Orientation::Horizontal => (0.0, 0.0),
            Orientation::Vertical => (0.0, self.length * (1.0 - value)),
        }
    }

    fn knob_offset(&self, value: f32) -> (f32, f32) {
        let travel = (self.length - self.thickness).max(0.0);
        match self.orientation {
            Orientation::Horizontal => (travel * value, 0.0),
            Orientation::Vertical => (0.0, travel * (1.0 - value)),
        }
    }

    fn apply(&self, frame: &mut Frame, value: f32) {
        frame.patch_size_hint(self.fill, self.fill_hint(value));
        let (fx, fy) = self.fill_offset(value);
        frame.patch_offset(self.fill, fx, fy);
        let (kx, ky) = self.knob_offset(value);
        frame.patch_offset(self.knob, kx, ky);
    }
}

impl WidgetSpec for SliderSpec {
    fn build(self, cx: &mut BuildContext<'_>, parent: Option<NodeId>) -> NodeId {
        let value = Controlled::resolve(self.value.clone(), clamp_unit);
        let (width, height) = match self.orientation {
            Orientation::Horizontal => (self.length, self.thickness),
            Orientation::Vertical => (self.thickness, self.length),
        };

        let root = cx.insert(
            parent,
            interactive(
                Node::new("slider").with_size(width, height).with_style(self.styles.track),
                self.enabled,
            ),
        );
        let fill = cx.insert(
            Some(root),
            Node::new("slider.fill").with_style(self.styles.fill).with_hit_test(false),
        );
        let knob = cx.insert(
            Some(root),
            Node::new("slider.knob")
                .with_size(self.thickness, self.thickness)
                .with_style(self.styles.knob)
                .with_hit_test(false),
        );
        let parts = SliderParts {
            fill,
            knob,
            orientation: self.orientation,
            length: self.length,
            thickness: self.thickness,
        };
        {
            let initial = value.get();
            let (fx, fy) = parts.fill_offset(initial);
            let (kx, ky) = parts.knob_offset(initial);
            let tree = cx.frame_mut().tree_mut();
            if let Some(node) = tree.get_node_mut(fill) {
                node.size_hint = parts.fill_hint(initial);
                node.offset_x = fx;
                node.offset_y = fy;
            }
            if let Some(node) = tree.get_node_mut(knob) {
                node.offset_x = kx;
                node.offset_y = ky;
            }
        }
        if let Some(key) = self.key.clone() {
            cx.register(key, root);
        }
        if !self.enabled {
            add_disabled_scrim(cx, root);
            return root;
        }

        let gesture = Cell::new(RangeGesture::default());
        append_node_on_event(cx.frame_mut(), root, move |frame, node, event| {
            let set = |frame: &mut Frame, target: f32| {
                let before = value.get();
                let after = value.set(target);
                if after != before {
                    parts.apply(frame, after);
                    fire(self.on_change.as_ref(), frame, after);
                }
            };
            let restyle = |frame: &mut Frame, gesture: RangeGesture| {
                let opacity = gesture.opacity(&self.styles);
                frame.patch_opacity(node, opacity);
                frame.patch_opacity(parts.fill, opacity);
            };

            match event {
                FrameEvent::Pointer(pointer) => {
                    let Some(rect) = frame.layout_of(node) else {
                        return false;
                    };
                    let mut g = gesture.get();
                    let action = g.on_pointer(pointer, rect, self.orientation);
                    gesture.set(g);
                    match action {
                        RangeAction::Ignore => pointer_inside(frame, node, pointer).unwrap_or(false),
                        RangeAction::Hover => {
                            restyle(frame, g);
                            g.hovered
                        }
                        RangeAction::Start(fraction) => {
                            frame.request_focus(node);
                            restyle(frame, g);
                            fire(self.on_drag_start.as_ref(), frame, value.get());
                            set(frame, fraction);
                            true
                        }
                        RangeAction::Drag(fraction) => {
                            set(frame, fraction);
                            true
                        }
                        RangeAction::End => {
                            restyle(frame, g);
                            fire(self.on_drag_end.as_ref(), frame, value.get());
                            true
                        }
                    }
                }
                FrameEvent::KeyDown(key) => {
                    match range_key(key.code, value.get(), self.step, self.orientation) {
                        Some(target) => {
                            set(frame, target);
                            true
                        }
                        None => false,
                    }
                }
                _ => false,
            }
        });
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::testing::Harness;
    use crate::widget::value::state;
    use std::cell::RefCell;

    fn slider(h: &mut Harness, spec: SliderSpec) -> NodeId {
        let root = h.build(spec);
        h.place(root, 0.0, 0.0, 100.0, 10.0);
        root
    }

    #[test]
    fn test_fraction_mapping() {
        let track = LayoutRect::new(10.0, 0.0, 100.0, 50.0);
        assert_eq!(fraction_at(track, Orientation::Horizontal, 60.0, 0.0), 0.5);
        assert_eq!(fraction_at(track, Orientation::Horizontal, -5.0, 0.0), 0.0);
        assert_eq!(fraction_at(track, Orientation::Horizontal, 500.0, 0.0), 1.0);
        assert_eq!(fraction_at(track, Orientation::Vertical, 0.0, 0.0), 1.0);
        assert_eq!(fraction_at(track, Orientation::Vertical, 0.0, 50.0), 0.0);
        assert_eq!(fraction_at(LayoutRect::ZERO, Orientation::Horizontal, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_drag_sets_bound_value() {
        let mut h = Harness::new();
        let shared = state(0.0_f32);
        let log = Rc::new(RefCell::new(Vec::new()));
        let (start, end) = (log.clone(), log.clone());
        let mut spec = SliderSpec::new(ValueSource::from_state(shared.clone()))
            .on_drag_start(move |_, v| start.borrow_mut().push(("start", v)))
            .on_drag_end(move |_, v| end.borrow_mut().push(("end", v)));
        spec.length = 100.0;
        slider(&mut h, spec);

        h.pointer(PointerPhase::Down, 20.0, 5.0);
        assert!((*shared.borrow() - 0.2).abs() < 1e-5);
        h.pointer(PointerPhase::Move, 82.0, 5.0);
        assert!((*shared.borrow() - 0.82).abs() < 1e-5);
        h.pointer(PointerPhase::Up, 82.0, 5.0);

        let log = log.borrow();
        assert_eq!(log[0], ("start", 0.0));
        assert_eq!(log[1].0, "end");
        assert!((log[1].1 - 0.82).abs() < 1e-5);
    }

    #[test]
    fn test_drag_past_ends_clamps() {
        let mut h = Harness::new();
        let shared = state(0.5_f32);
        slider(&mut h, SliderSpec::new(ValueSource::from_state(shared.clone())));

        h.pointer(PointerPhase::Down, 50.0, 5.0);
        h.pointer(PointerPhase::Move, 400.0, 30.0);
        assert_eq!(*shared.borrow(), 1.0);
        h.pointer(PointerPhase::Move, -400.0, 5.0);
        assert_eq!(*shared.borrow(), 0.0);
    }

    #[test]
    fn test_patches_fill_and_knob() {
        let mut h = Harness::new();
        let mut spec = SliderSpec::new(0.0_f32);
        spec.length = 100.0;
        let root = slider(&mut h, spec);
        let fill = h.child(root, "slider.fill");
        let knob = h.child(root, "slider.knob");

        h.pointer(PointerPhase::Down, 50.0, 5.0);
        assert_eq!(h.node(fill).size_hint.width, Some(50.0));
        assert_eq!(h.node(knob).offset_x, 49.5);
        assert_eq!(h.node(root).opacity, SliderStyles::default().press_opacity);

        h.pointer(PointerPhase::Up, 50.0, 5.0);
        assert_eq!(h.node(root).opacity, SliderStyles::default().hover_opacity);
        h.pointer(PointerPhase::Move, 50.0, 5.0);
        h.pointer(PointerPhase::Move, 500.0, 50.0);
        assert_eq!(h.node(root).opacity, 1.0);
    }

    #[test]
    fn test_vertical_maps_top_to_one() {
        let mut h = Harness::new();
        let shared = state(0.0_f32);
        let root = h.build(SliderSpec::new(ValueSource::from_state(shared.clone())).orientation(Orientation::Vertical));
        h.place(root, 0.0, 0.0, 1.0, 20.0);
        h.pointer(PointerPhase::Down, 0.5, 0.0);
        assert_eq!(*shared.borrow(), 1.0);
        h.pointer(PointerPhase::Move, 0.5, 15.0);
        assert!((*shared.borrow() - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_keyboard() {
        let mut h = Harness::new();
        let shared = state(0.5_f32);
        let root = slider(&mut h, SliderSpec::new(ValueSource::from_state(shared.clone())).step(0.1));
        h.focus(root);

        h.key(KeyCode::End);
        assert_eq!(*shared.borrow(), 1.0);
        h.key(KeyCode::Right);
        assert_eq!(*shared.borrow(), 1.0);
        h.key(KeyCode::Home);
        assert_eq!(*shared.borrow(), 0.0);
        h.key(KeyCode::Right);
        assert!((*shared.borrow() - 0.1).abs() < 1e-6);
        assert!(!h.key(KeyCode::Enter));
    }

    #[test]
    fn test_initial_value_clamped() {
        let mut h = Harness::new();
        let shared = state(7.0_f32);
        let root = slider(&mut h, SliderSpec::new(ValueSource::from_state(shared)));
        let fill = h.child(root, "slider.fill");
        assert_eq!(h.node(fill).size_hint.width, Some(20.0));
    }
}
