//! Tab strip: one selected tab out of many.

use super::common::{add_disabled_scrim, cycle, fire, interactive, item_at, primary_pointer, Callback};
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

/// Tab colors.
#[derive(Debug, Clone, Copy)]
pub struct TabsStyles {
    /// Inactive tab.
    pub tab: VisualStyle,
    /// Selected tab.
    pub active: VisualStyle,
}

impl Default for TabsStyles {
    fn default() -> Self {
        Self {
            tab: VisualStyle::solid(Rgb::new(40, 40, 40)),
            active: VisualStyle::solid(Rgb::new(0, 120, 200)),
        }
    }
}

/// A row of tabs.
///
/// Click selects a tab, Left/Right cycle with wraparound and Enter
/// confirms the current tab.
#[derive(Clone)]
pub struct TabsSpec {
    /// Tab titles.
    pub labels: Vec<String>,
    /// Selected tab; clamped to the tab range.
    pub selected: ValueSource<usize>,
    /// Identity key.
    pub key: Option<IdentityKey>,
    /// Whether the tabs react to input.
    pub enabled: bool,
    /// Colors.
    pub styles: TabsStyles,
    /// Fired when the selected tab changes.
    pub on_change: Option<Callback<usize>>,
    /// Fired with the selected tab on Enter.
    pub on_confirm: Option<Callback<usize>>,
}

impl TabsSpec {
    /// Create tabs with the first one selected.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            selected: ValueSource::literal(0),
            key: None,
            enabled: true,
            styles: TabsStyles::default(),
            on_change: None,
            on_confirm: None,
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

    /// Enable or disable the tabs.
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

    /// Set the confirm callback.
    #[must_use]
    pub fn on_confirm(mut self, f: impl Fn(&mut Frame, usize) + 'static) -> Self {
        self.on_confirm = Some(Rc::new(f));
        self
    }
}

impl WidgetSpec for TabsSpec {
    fn build(self, cx: &mut BuildContext<'_>, parent: Option<NodeId>) -> NodeId {
        let count = self.labels.len();
        let selected = Controlled::resolve(self.selected, move |i| clamp_index(i, count));
        let styles = self.styles;

        let root = cx.insert(parent, interactive(Node::new("tabs"), self.enabled));
        let items: Vec<NodeId> = self
            .labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                let style = if i == selected.get() { styles.active } else { styles.tab };
                cx.insert(Some(root), Node::label("tabs.item", label).with_style(style))
            })
            .collect();
        if let Some(key) = self.key {
            cx.register(key, root);
        }
        if !self.enabled || items.is_empty() {
            if !self.enabled {
                add_disabled_scrim(cx, root);
            }
            return root;
        }

        let on_change = self.on_change;
        let on_confirm = self.on_confirm;
        let pressed = Cell::new(None::<usize>);
        append_node_on_event(cx.frame_mut(), root, move |frame, node, event| {
            let select = |frame: &mut Frame, index: usize| {
                let before = selected.get();
                let after = selected.set(index);
                if after != before {
                    frame.patch_style(items[before], styles.tab);
                    frame.patch_style(items[after], styles.active);
                    fire(on_change.as_ref(), frame, after);
                }
            };
            if let Some(pointer) = primary_pointer(event) {
                let hit = item_at(frame, &items, pointer);
                return match pointer.phase {
                    PointerPhase::Down => {
                        if hit.is_none() {
                            return false;
                        }
                        frame.request_focus(node);
                        pressed.set(hit);
                        true
                    }
                    PointerPhase::Move => pressed.get().is_some(),
                    PointerPhase::Up => match pressed.take() {
                        Some(index) => {
                            if hit == Some(index) {
                                select(frame, index);
                            }
                            true
                        }
                        None => false,
                    },
                    PointerPhase::Cancel => pressed.take().is_some(),
                };
            }
            let Some(key) = event.as_key_down() else {
                return false;
            };
            match key.code {
                KeyCode::Left => select(frame, cycle(selected.get(), -1, items.len())),
                KeyCode::Right => select(frame, cycle(selected.get(), 1, items.len())),
                KeyCode::Enter => fire(on_confirm.as_ref(), frame, selected.get()),
                _ => return false,
            }
            true
        });
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutRect;
    use crate::widget::testing::Harness;
    use crate::widget::value::state;
    use std::cell::RefCell;

    fn laid_out(h: &mut Harness, spec: TabsSpec) -> (NodeId, Vec<NodeId>) {
        let root = h.build(spec);
        h.place(root, 0.0, 0.0, 30.0, 1.0);
        let items = h.children(root, "tabs.item");
        let mut layout = h.frame.layout().clone();
        for (i, item) in items.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            layout.insert(*item, LayoutRect::new(i as f32 * 10.0, 0.0, 10.0, 1.0));
        }
        h.frame.set_layout(layout);
        (root, items)
    }

    #[test]
    fn test_click_selects_tab() {
        let mut h = Harness::new();
        let shared = state(0_usize);
        let (_, items) = laid_out(&mut h, TabsSpec::new(["one", "two", "three"]).selected(ValueSource::from_state(shared.clone())));

        assert!(h.click(15.0, 0.5));
        assert_eq!(*shared.borrow(), 1);
        assert_eq!(h.node(items[1]).background, Some(TabsStyles::default().active.background));
        assert_eq!(h.node(items[0]).background, Some(TabsStyles::default().tab.background));

        h.pointer(PointerPhase::Down, 25.0, 0.5);
        h.pointer(PointerPhase::Up, 5.0, 0.5);
        assert_eq!(*shared.borrow(), 1);
    }

    #[test]
    fn test_arrows_wrap_and_enter_confirms() {
        let mut h = Harness::new();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let confirmed = Rc::new(Cell::new(None));
        let (c, f) = (changes.clone(), confirmed.clone());
        let (root, _) = laid_out(
            &mut h,
            TabsSpec::new(["one", "two", "three"])
                .on_change(move |_, i| c.borrow_mut().push(i))
                .on_confirm(move |_, i| f.set(Some(i))),
        );
        h.focus(root);

        h.key(KeyCode::Left);
        h.key(KeyCode::Right);
        h.key(KeyCode::Right);
        assert_eq!(*changes.borrow(), vec![2, 0, 1]);
        h.key(KeyCode::Enter);
        assert_eq!(confirmed.get(), Some(1));
        assert!(!h.key(KeyCode::Up));
    }
}
