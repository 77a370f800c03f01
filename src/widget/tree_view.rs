//! Tree view: a row list with expandable parents.
//!
//! Every item is built up front as a flat, pre-order run of row nodes
//! under one content node. Expanding or collapsing only patches row
//! visibility, so the tree structure never forces a rebuild. Selection is
//! reported as a *visible row* index.

use super::common::{add_disabled_scrim, fire, interactive, Callback};
use super::rows::{navigate, RowScroller, RowStyles, ScrollInfo, SCROLLBAR_WIDTH};
use super::value::{Controlled, ValueSource};
use super::WidgetSpec;
use crate::build::BuildContext;
use crate::callback::append_node_on_event;
use crate::frame::Frame;
use crate::identity::IdentityKey;
use crate::input::{FrameEvent, KeyCode, PointerEvent, PointerPhase};
use crate::tree::{Node, NodeId, SizeHint};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// How close together two activations of the selected row must be to
/// toggle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationWindow {
    /// Second activation within this long of the first.
    Time(Duration),
    /// This many consecutive activations of the same row, at any pace.
    Clicks(u32),
}

impl Default for ActivationWindow {
    fn default() -> Self {
        Self::Time(Duration::from_millis(400))
    }
}

/// One item of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    /// Row text.
    pub label: String,
    /// Child items.
    pub children: Vec<TreeItem>,
    /// Whether children start out shown.
    pub expanded: bool,
}

impl TreeItem {
    /// A collapsed item with no children.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
            expanded: false,
        }
    }

    /// Add a child.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Set the initial expansion.
    #[must_use]
    pub const fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }
}

/// A tree of selectable rows.
#[derive(Clone)]
pub struct TreeSpec {
    /// Top-level items.
    pub items: Vec<TreeItem>,
    /// Selected visible row.
    pub selected: ValueSource<usize>,
    /// Identity key.
    pub key: Option<IdentityKey>,
    /// Whether the tree reacts to input.
    pub enabled: bool,
    /// Height of one row.
    pub row_height: f32,
    /// Rows shown at once.
    pub visible_rows: usize,
    /// Horizontal indent per depth level.
    pub indent: f32,
    /// Double-activation window for expand/collapse.
    pub activation: ActivationWindow,
    /// Colors.
    pub styles: RowStyles,
    /// Fired with the visible row when the selection changes, and on Enter.
    pub on_select: Option<Callback<usize>>,
    /// Fired with the pre-order item index and its new expansion.
    pub on_toggle: Option<Callback<(usize, bool)>>,
    /// Fired when the rows scroll.
    pub on_scroll: Option<Callback<ScrollInfo>>,
}

impl TreeSpec {
    /// Create a tree with the first row selected.
    pub fn new(items: impl Into<Vec<TreeItem>>) -> Self {
        Self {
            items: items.into(),
            selected: ValueSource::literal(0),
            key: None,
            enabled: true,
            row_height: 1.0,
            visible_rows: 8,
            indent: 2.0,
            activation: ActivationWindow::default(),
            styles: RowStyles::default(),
            on_select: None,
            on_toggle: None,
            on_scroll: None,
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

    /// Enable or disable the tree.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the number of rows shown at once.
    #[must_use]
    pub const fn visible_rows(mut self, rows: usize) -> Self {
        self.visible_rows = rows;
        self
    }

    /// Set the double-activation window.
    #[must_use]
    pub const fn activation(mut self, activation: ActivationWindow) -> Self {
        self.activation = activation;
        self
    }

    /// Set the selection callback.
    #[must_use]
    pub fn on_select(mut self, f: impl Fn(&mut Frame, usize) + 'static) -> Self {
        self.on_select = Some(Rc::new(f));
        self
    }

    /// Set the expansion callback.
    #[must_use]
    pub fn on_toggle(mut self, f: impl Fn(&mut Frame, (usize, bool)) + 'static) -> Self {
        self.on_toggle = Some(Rc::new(f));
        self
    }

    /// Set the scroll callback.
    #[must_use]
    pub fn on_scroll(mut self, f: impl Fn(&mut Frame, ScrollInfo) + 'static) -> Self {
        self.on_scroll = Some(Rc::new(f));
        self
    }
}

const EXPANDED_MARK: &str = "▾";
const COLLAPSED_MARK: &str = "▸";

const fn disclosure(has_children: bool, expanded: bool) -> &'static str {
    match (has_children, expanded) {
        (false, _) => " ",
        (true, true) => EXPANDED_MARK,
        (true, false) => COLLAPSED_MARK,
    }
}

/// A flattened item.
#[derive(Debug)]
struct Entry {
    row: NodeId,
    mark: NodeId,
    parent: Option<usize>,
    /// One past the last pre-order index of this item's subtree.
    end: usize,
}

impl Entry {
    const fn has_children(&self, index: usize) -> bool {
        self.end > index + 1
    }
}

/// An item in pre-order, before its row is built.
struct FlatItem {
    label: String,
    expanded: bool,
    parent: Option<usize>,
    depth: usize,
    end: usize,
}

fn flatten(items: Vec<TreeItem>, parent: Option<usize>, depth: usize, out: &mut Vec<FlatItem>) {
    for item in items {
        let index = out.len();
        out.push(FlatItem {
            label: item.label,
            expanded: item.expanded,
            parent,
            depth,
            end: index + 1,
        });
        flatten(item.children, Some(index), depth + 1, out);
        out[index].end = out.len();
    }
}

/// Toggle detection for repeated activations of one row.
#[derive(Debug, Clone, Copy, Default)]
struct ActivationTracker {
    entry: Option<usize>,
    at: Duration,
    count: u32,
}

impl ActivationTracker {
    /// Record an activation of `entry`. Returns `true` when it completes a
    /// toggle gesture on a row that was already selected.
    fn activate(&mut self, window: ActivationWindow, entry: usize, already_selected: bool, at: Duration) -> bool {
        let repeat = already_selected && self.entry == Some(entry);
        let toggles = match window {
            ActivationWindow::Time(limit) => repeat && at.saturating_sub(self.at) <= limit,
            ActivationWindow::Clicks(needed) => {
                self.count = if repeat { self.count + 1 } else { 1 };
                self.count >= needed.max(2)
            }
        };
        *self = if toggles {
            Self::default()
        } else {
            Self {
                entry: Some(entry),
                at,
                count: self.count.max(1),
            }
        };
        toggles
    }
}

struct TreeController {
    entries: Vec<Entry>,
    expanded: RefCell<Vec<bool>>,
    visible: RefCell<Vec<usize>>,
    current: Cell<usize>,
    selected: Rc<Controlled<usize>>,
    scroller: RowScroller,
    tracker: Cell<ActivationTracker>,
    activation: ActivationWindow,
    styles: RowStyles,
    on_select: Option<Callback<usize>>,
    on_toggle: Option<Callback<(usize, bool)>>,
    on_scroll: Option<Callback<ScrollInfo>>,
}

impl TreeController {
    fn is_shown(&self, index: usize) -> bool {
        let expanded = self.expanded.borrow();
        let mut parent = self.entries[index].parent;
        while let Some(p) = parent {
            if !expanded[p] {
                return false;
            }
            parent = self.entries[p].parent;
        }
        true
    }

    fn refresh_visible(&self) {
        let visible: Vec<usize> = (0..self.entries.len()).filter(|i| self.is_shown(*i)).collect();
        *self.visible.borrow_mut() = visible;
    }

    fn row_of(&self, entry: usize) -> Option<usize> {
        self.visible.borrow().iter().position(|e| *e == entry)
    }

    fn entry_at(&self, row: usize) -> Option<usize> {
        self.visible.borrow().get(row).copied()
    }

    fn report(&self, frame: &mut Frame, scrolled: Option<ScrollInfo>) {
        if let Some(info) = scrolled {
            fire(self.on_scroll.as_ref(), frame, info);
        }
    }

    fn select_entry(&self, frame: &mut Frame, entry: usize) {
        let Some(row) = self.row_of(entry) else {
            return;
        };
        let before = self.current.replace(entry);
        if before != entry {
            frame.patch_style(self.entries[before].row, self.styles.row);
            frame.patch_style(self.entries[entry].row, self.styles.selected);
        }
        let previous_row = self.selected.get();
        self.selected.set(row);
        let scrolled = self.scroller.ensure_visible(frame, row);
        self.report(frame, scrolled);
        if before != entry || previous_row != row {
            fire(self.on_select.as_ref(), frame, row);
        }
    }

    fn set_expanded(&self, frame: &mut Frame, entry: usize, expanded: bool) -> bool {
        if !self.entries[entry].has_children(entry) || self.expanded.borrow()[entry] == expanded {
            return false;
        }
        self.expanded.borrow_mut()[entry] = expanded;
        frame.patch_text(self.entries[entry].mark, disclosure(true, expanded));
        self.refresh_visible();
        for index in entry + 1..self.entries[entry].end {
            frame.patch_visible(self.entries[index].row, self.is_shown(index));
        }
        frame.request_layout();
        let count = self.visible.borrow().len();
        let scrolled = self.scroller.set_row_count(frame, count);
        self.report(frame, scrolled);

        // A collapse can hide the selected row; fall back to its nearest
        // shown ancestor.
        let mut current = self.current.get();
        while !self.is_shown(current) {
            match self.entries[current].parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        self.select_entry(frame, current);
        fire(self.on_toggle.as_ref(), frame, (entry, expanded));
        true
    }

    fn last_visible_descendant(&self, entry: usize) -> Option<usize> {
        let end = self.entries[entry].end;
        self.visible
            .borrow()
            .iter()
            .copied()
            .rev()
            .find(|e| *e > entry && *e < end)
    }

    fn on_pointer(&self, frame: &mut Frame, node: NodeId, pointer: &PointerEvent) -> bool {
        let Some(rect) = frame.layout_of(node) else {
            return false;
        };
        match pointer.phase {
            PointerPhase::Down => {
                if !rect.contains(pointer.x, pointer.y) {
                    return false;
                }
                frame.request_focus(node);
                if self.scroller.in_scrollbar(rect, pointer.x, pointer.y) {
                    let scrolled = self.scroller.begin_drag(frame, rect, pointer.y);
                    self.report(frame, scrolled);
                } else if let Some(entry) = self.scroller.row_at(rect, pointer.y).and_then(|r| self.entry_at(r)) {
                    let already_selected = self.current.get() == entry;
                    let mut tracker = self.tracker.get();
                    let toggles = tracker.activate(self.activation, entry, already_selected, pointer.timestamp);
                    self.tracker.set(tracker);
                    if toggles {
                        let expanded = self.expanded.borrow()[entry];
                        self.set_expanded(frame, entry, !expanded);
                    } else {
                        self.select_entry(frame, entry);
                    }
                }
                true
            }
            PointerPhase::Move => {
                let scrolled = self.scroller.drag_to(frame, rect, pointer.y);
                self.report(frame, scrolled);
                self.scroller.is_dragging()
            }
            PointerPhase::Up | PointerPhase::Cancel => self.scroller.end_drag(),
        }
    }

    fn on_key(&self, frame: &mut Frame, code: KeyCode) -> bool {
        let entry = self.current.get();
        match code {
            KeyCode::Enter => {
                fire(self.on_select.as_ref(), frame, self.selected.get());
                true
            }
            KeyCode::Right => {
                if !self.entries[entry].has_children(entry) {
                    return false;
                }
                self.set_expanded(frame, entry, true);
                if let Some(last) = self.last_visible_descendant(entry) {
                    self.select_entry(frame, last);
                }
                true
            }
            KeyCode::Left => {
                if self.set_expanded(frame, entry, false) {
                    return true;
                }
                match self.entries[entry].parent {
                    Some(parent) => {
                        self.select_entry(frame, parent);
                        true
                    }
                    None => false,
                }
            }
            code => {
                let count = self.visible.borrow().len();
                let row = self.row_of(entry).unwrap_or(0);
                match navigate(row, code, count, self.scroller.viewport_rows()).and_then(|r| self.entry_at(r)) {
                    Some(target) => {
                        self.select_entry(frame, target);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    fn handle(&self, frame: &mut Frame, node: NodeId, event: &FrameEvent) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        match event {
            FrameEvent::Pointer(pointer) if pointer.is_primary() => self.on_pointer(frame, node, pointer),
            FrameEvent::Scroll(scroll) => {
                let scrolled = self.scroller.scroll_by(frame, scroll.scroll_y);
                self.report(frame, scrolled);
                scrolled.is_some()
            }
            FrameEvent::KeyDown(key) => self.on_key(frame, key.code),
            _ => false,
        }
    }
}

impl WidgetSpec for TreeSpec {
    #[allow(clippy::cast_precision_loss)]
    fn build(self, cx: &mut BuildContext<'_>, parent: Option<NodeId>) -> NodeId {
        let mut flat = Vec::new();
        flatten(self.items, None, 0, &mut flat);
        let expanded: Vec<bool> = flat.iter().map(|f| f.expanded).collect();
        let visible_rows = self.visible_rows.max(1);

        let mut root_node = interactive(Node::new("tree"), self.enabled);
        root_node.size_hint.height = Some(visible_rows as f32 * self.row_height);
        let root = cx.insert(parent, root_node);
        let content = cx.insert(Some(root), Node::new("tree.content").with_hit_test(false));

        let mut entries = Vec::with_capacity(flat.len());
        for FlatItem {
            label,
            expanded,
            parent,
            depth,
            end,
        } in flat
        {
            let mut row = Node::new("tree.row").with_style(self.styles.row).with_hit_test(false);
            row.size_hint = SizeHint {
                width: None,
                height: Some(self.row_height),
            };
            let row = cx.insert(Some(content), row);
            let has_children = end > entries.len() + 1;
            let mark = cx.insert(
                Some(row),
                Node::label("tree.disclosure", disclosure(has_children, expanded))
                    .with_offset(depth as f32 * self.indent, 0.0),
            );
            cx.insert(
                Some(row),
                Node::label("tree.label", label).with_offset(depth as f32 * self.indent, 0.0),
            );
            entries.push(Entry { row, mark, parent, end });
        }
        let thumb = cx.insert(
            Some(root),
            Node::new("tree.thumb")
                .with_size(SCROLLBAR_WIDTH, self.row_height)
                .with_style(self.styles.thumb)
                .with_visible(false)
                .with_hit_test(false),
        );
        if let Some(key) = self.key {
            cx.register(key, root);
        }

        let controller = TreeController {
            entries,
            expanded: RefCell::new(expanded),
            visible: RefCell::new(Vec::new()),
            current: Cell::new(0),
            selected: Controlled::resolve_raw(self.selected),
            scroller: RowScroller::new(content, thumb, self.row_height, visible_rows, 0.0),
            tracker: Cell::new(ActivationTracker::default()),
            activation: self.activation,
            styles: self.styles,
            on_select: self.on_select,
            on_toggle: self.on_toggle,
            on_scroll: self.on_scroll,
        };
        controller.refresh_visible();
        let frame = cx.frame_mut();
        for (index, entry) in controller.entries.iter().enumerate() {
            if let Some(node) = frame.tree_mut().get_node_mut(entry.row) {
                node.visible = controller.is_shown(index);
            }
        }
        let count = controller.visible.borrow().len();
        controller.scroller.set_row_count(frame, count);
        let row = controller.selected.get().min(count.saturating_sub(1));
        if let Some(entry) = controller.entry_at(row) {
            controller.current.set(entry);
            controller.selected.set(row);
            frame.patch_style(controller.entries[entry].row, controller.styles.selected);
            controller.scroller.ensure_visible(frame, row);
        }

        if !self.enabled {
            add_disabled_scrim(cx, root);
            return root;
        }
        append_node_on_event(cx.frame_mut(), root, move |frame, node, event| controller.handle(frame, node, event));
        root
    }
}
