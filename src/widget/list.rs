//! Scrollable single-selection list.

use super::common::{add_disabled_scrim, interactive, Callback};
use super::rows::{RowScroller, RowStyles, RowsController, ScrollInfo, SCROLLBAR_WIDTH};
use super::value::{clamp_index, Controlled, ValueSource};
use super::WidgetSpec;
use crate::build::BuildContext;
use crate::frame::Frame;
use crate::identity::IdentityKey;
use crate::tree::{Node, NodeId, SizeHint};
use std::rc::Rc;

/// A list of text rows with one selected row.
#[derive(Clone)]
pub struct ListSpec {
    /// Row labels.
    pub items: Vec<String>,
    /// Selected row index; clamped to the item range.
    pub selected: ValueSource<usize>,
    /// Identity key.
    pub key: Option<IdentityKey>,
    /// Whether the list reacts to input.
    pub enabled: bool,
    /// Fixed width, if any.
    pub width: Option<f32>,
    /// Height of one row.
    pub row_height: f32,
    /// Rows shown at once; PageUp/PageDown move by this many.
    pub visible_rows: usize,
    /// Colors.
    pub styles: RowStyles,
    /// Fired when the selection changes, and on Enter.
    pub on_select: Option<Callback<usize>>,
    /// Fired when the list scrolls.
    pub on_scroll: Option<Callback<ScrollInfo>>,
}

impl ListSpec {
    /// Create a list over `items` with the first row selected.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            selected: ValueSource::literal(0),
            key: None,
            enabled: true,
            width: None,
            row_height: 1.0,
            visible_rows: 8,
            styles: RowStyles::default(),
            on_select: None,
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

    /// Enable or disable the list.
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

    /// Set the selection callback.
    #[must_use]
    pub fn on_select(mut self, f: impl Fn(&mut Frame, usize) + 'static) -> Self {
        self.on_select = Some(Rc::new(f));
        self
    }

    /// Set the scroll callback.
    #[must_use]
    pub fn on_scroll(mut self, f: impl Fn(&mut Frame, ScrollInfo) + 'static) -> Self {
        self.on_scroll = Some(Rc::new(f));
        self
    }
}

impl WidgetSpec for ListSpec {
    #[allow(clippy::cast_precision_loss)]
    fn build(self, cx: &mut BuildContext<'_>, parent: Option<NodeId>) -> NodeId {
        let count = self.items.len();
        let selected = Controlled::resolve(self.selected, move |i| clamp_index(i, count));
        let visible_rows = self.visible_rows.max(1);

        let mut root_node = interactive(Node::new("list"), self.enabled);
        root_node.size_hint = SizeHint {
            width: self.width,
            height: Some(visible_rows as f32 * self.row_height),
        };
        let root = cx.insert(parent, root_node);
        let content = cx.insert(Some(root), Node::new("list.content").with_hit_test(false));
        let rows = self
            .items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let mut row = Node::label("list.row", item).with_style(self.styles.for_row(i == selected.get()));
                row.size_hint.height = Some(self.row_height);
                cx.insert(Some(content), row)
            })
            .collect();
        let thumb = cx.insert(
            Some(root),
            Node::new("list.thumb")
                .with_size(SCROLLBAR_WIDTH, self.row_height)
                .with_style(self.styles.thumb)
                .with_visible(false)
                .with_hit_test(false),
        );
        if let Some(key) = self.key {
            cx.register(key, root);
        }
        if !self.enabled {
            add_disabled_scrim(cx, root);
            return root;
        }

        RowsController {
            rows,
            styles: self.styles,
            scroller: RowScroller::new(content, thumb, self.row_height, visible_rows, 0.0),
            selected,
            on_select: self.on_select,
            on_scroll: self.on_scroll,
        }
        .attach(cx.frame_mut(), root);
        root
    }
}
