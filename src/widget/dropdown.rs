//! Dropdown: a header showing the selected option over a pop-up list.

use super::common::{add_disabled_scrim, cycle, fire, interactive, item_at, pointer_inside, Callback};
use super::value::{clamp_index, Controlled, ValueSource};
use super::WidgetSpec;
use crate::build::BuildContext;
use crate::callback::append_node_on_event;
use crate::frame::Frame;
use crate::identity::IdentityKey;
use crate::input::{FrameEvent, KeyCode, PointerPhase};
use crate::tree::{Node, NodeId, Rgb, VisualStyle};
use std::cell::Cell;
use std::rc::Rc;

/// Dropdown colors.
#[derive(Debug, Clone, Copy)]
pub struct DropdownStyles {
    /// Header.
    pub header: VisualStyle,
    /// Pop-up list background.
    pub list: VisualStyle,
    /// Option row.
    pub option: VisualStyle,
    /// Highlighted option row.
    pub highlighted: VisualStyle,
}

impl Default for DropdownStyles {
    fn default() -> Self {
        Self {
            header: VisualStyle::solid(Rgb::new(45, 45, 45)),
            list: VisualStyle::solid(Rgb::new(30, 30, 30)),
            option: VisualStyle::solid(Rgb::new(30, 30, 30)),
            highlighted: VisualStyle::solid(Rgb::new(0, 120, 200)),
        }
    }
}

/// A single-choice dropdown.
///
/// Closed, Up/Down cycle the selection directly and Enter or Space opens
/// the list. Open, Up/Down move a highlight, Enter commits it and Escape
/// closes without change.
#[derive(Clone)]
pub struct DropdownSpec {
    /// Option labels.
    pub options: Vec<String>,
    /// Selected option; clamped to the option range.
    pub selected: ValueSource<usize>,
    /// Identity key.
    pub key: Option<IdentityKey>,
    /// Whether the dropdown reacts to input.
    pub enabled: bool,
    /// Colors.
    pub styles: DropdownStyles,
    /// Fired when the selection changes.
    pub on_change: Option<Callback<usize>>,
}

impl DropdownSpec {
    /// Create a dropdown with the first option selected.
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            selected: ValueSource::literal(0),
            key: None,
            enabled: true,
            styles: DropdownStyles::default(),
            on_change: None,
        }
    }

    /// Set the selection source.
    #[must_use]
    pub fn selected(mut self, selected: impl Into<ValueSource<usize>>) -> Self {
        self.selected = selected.into();
        self
    }

    /// Set the identity key.
    #[must_use]
    pub fn key(mut self, key: impl Into<IdentityKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Enable or disable the dropdown.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the change callback.
    #[must_use]
    pub fn on_change(mut self, f: impl Fn(&mut Frame, usize) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }
}

struct DropdownController {
    value_label: NodeId,
    list: NodeId,
    options: Vec<NodeId>,
    labels: Vec<String>,
    selected: Rc<Controlled<usize>>,
    open: Cell<bool>,
    highlight: Cell<usize>,
    styles: DropdownStyles,
    on_change: Option<Callback<usize>>,
}

impl DropdownController {
    fn set_highlight(&self, frame: &mut Frame, index: usize) {
        let before = self.highlight.replace(index);
        frame.patch_style(self.options[before], self.styles.option);
        frame.patch_style(self.options[index], self.styles.highlighted);
    }

    fn set_open(&self, frame: &mut Frame, open: bool) {
        if self.open.replace(open) == open {
            return;
        }
        if open {
            self.set_highlight(frame, self.selected.get());
        }
        frame.patch_visible(self.list, open);
    }

    fn commit(&self, frame: &mut Frame, index: usize) {
        let before = self.selected.get();
        let after = self.selected.set(index);
        if after != before {
            frame.patch_text(self.value_label, &self.labels[after]);
            fire(self.on_change.as_ref(), frame, after);
        }
    }

    fn handle(&self, frame: &mut Frame, node: NodeId, event: &FrameEvent) -> bool {
        let count = self.options.len();
        match event {
            FrameEvent::Pointer(pointer) if pointer.is_primary() && pointer.phase == PointerPhase::Down => {
                if self.open.get() {
                    if let Some(index) = item_at(frame, &self.options, pointer) {
                        self.commit(frame, index);
                        self.set_open(frame, false);
                        return true;
                    }
                }
                if pointer_inside(frame, node, pointer) != Some(true) {
                    return false;
                }
                frame.request_focus(node);
                self.set_open(frame, !self.open.get());
                true
            }
            FrameEvent::KeyDown(key) => match (self.open.get(), key.code) {
                (false, KeyCode::Up) => {
                    self.commit(frame, cycle(self.selected.get(), -1, count));
                    true
                }
                (false, KeyCode::Down) => {
                    self.commit(frame, cycle(self.selected.get(), 1, count));
                    true
                }
                (false, code) if code.is_activation() => {
                    self.set_open(frame, true);
                    true
                }
                (true, KeyCode::Up) => {
                    self.set_highlight(frame, cycle(self.highlight.get(), -1, count));
                    true
                }
                (true, KeyCode::Down) => {
                    self.set_highlight(frame, cycle(self.highlight.get(), 1, count));
                    true
                }
                (true, KeyCode::Enter) => {
                    self.commit(frame, self.highlight.get());
                    self.set_open(frame, false);
                    true
                }
                (true, KeyCode::Esc) => {
                    self.set_open(frame, false);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}

impl WidgetSpec for DropdownSpec {
    fn build(self, cx: &mut BuildContext<'_>, parent: Option<NodeId>) -> NodeId {
        let count = self.options.len();
        let selected = Controlled::resolve(self.selected, move |i| clamp_index(i, count));
        let current = self.options.get(selected.get()).cloned().unwrap_or_default();

        let root = cx.insert(
            parent,
            interactive(Node::new("dropdown").with_style(self.styles.header), self.enabled),
        );
        let value_label = cx.insert(Some(root), Node::label("dropdown.value", current));
        let list = cx.insert(
            Some(root),
            Node::new("dropdown.list").with_style(self.styles.list).with_visible(false),
        );
        let options = self
            .options
            .iter()
            .map(|label| cx.insert(Some(list), Node::label("dropdown.option", label.clone()).with_style(self.styles.option)))
            .collect();
        if let Some(key) = self.key {
            cx.register(key, root);
        }
        if !self.enabled || count == 0 {
            if !self.enabled {
                add_disabled_scrim(cx, root);
            }
            return root;
        }

        let controller = DropdownController {
            value_label,
            list,
            options,
            labels: self.options,
            selected,
            open: Cell::new(false),
            highlight: Cell::new(0),
            styles: self.styles,
            on_change: self.on_change,
        };
        append_node_on_event(cx.frame_mut(), root, move |frame, node, event| controller.handle(frame, node, event));
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutRect;
    use crate::widget::testing::Harness;
    use crate::widget::value::state;

    fn colors(h: &mut Harness, selected: &crate::widget::StateRef<usize>) -> NodeId {
        let root = h.build(DropdownSpec::new(["red", "green", "blue"]).selected(ValueSource::from_state(selected.clone())));
        let list = h.child(root, "dropdown.list");
        let mut layout = h
            .frame
            .layout()
            .clone()
            .with(root, LayoutRect::new(0.0, 0.0, 10.0, 1.0))
            .with(list, LayoutRect::new(0.0, 1.0, 10.0, 3.0));
        for (i, option) in h.children(root, "dropdown.option").into_iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            layout.insert(option, LayoutRect::new(0.0, 1.0 + i as f32, 10.0, 1.0));
        }
        h.frame.set_layout(layout);
        root
    }

    fn value_text(h: &Harness, root: NodeId) -> String {
        h.node(h.child(root, "dropdown.value")).text.clone().unwrap_or_default()
    }

    #[test]
    fn test_closed_arrows_cycle_selection() {
        let mut h = Harness::new();
        let shared = state(0_usize);
        let root = colors(&mut h, &shared);
        h.focus(root);

        h.key(KeyCode::Up);
        assert_eq!(*shared.borrow(), 2);
        assert_eq!(value_text(&h, root), "blue");
        h.key(KeyCode::Down);
        assert_eq!(*shared.borrow(), 0);
        assert!(!h.node(h.child(root, "dropdown.list")).visible);
    }

    #[test]
    fn test_open_highlight_and_commit() {
        let mut h = Harness::new();
        let shared = state(1_usize);
        let root = colors(&mut h, &shared);
        let list = h.child(root, "dropdown.list");
        h.focus(root);

        h.key(KeyCode::Enter);
        assert!(h.node(list).visible);
        h.key(KeyCode::Down);
        assert_eq!(*shared.borrow(), 1);
        h.key(KeyCode::Esc);
        assert!(!h.node(list).visible);
        assert_eq!(*shared.borrow(), 1);

        h.key(KeyCode::Char(' '));
        h.key(KeyCode::Down);
        h.key(KeyCode::Enter);
        assert_eq!(*shared.borrow(), 2);
        assert!(!h.node(list).visible);
    }

    #[test]
    fn test_pointer_opens_and_picks() {
        let mut h = Harness::new();
        let shared = state(0_usize);
        let root = colors(&mut h, &shared);
        let list = h.child(root, "dropdown.list");

        h.click(2.0, 0.5);
        assert!(h.node(list).visible);
        assert_eq!(h.focus.focused_node(), Some(root));
        h.click(2.0, 2.5);
        assert_eq!(*shared.borrow(), 1);
        assert!(!h.node(list).visible);
        assert_eq!(value_text(&h, root), "green");

        // The closed list no longer takes hits.
        assert!(!h.click(2.0, 2.5));
    }
}
