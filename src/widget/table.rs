//! Table: a list whose rows are split into columns under a header.

use super::common::{add_disabled_scrim, interactive, Callback};
use super::rows::{RowScroller, RowStyles, RowsController, ScrollInfo, SCROLLBAR_WIDTH};
use super::value::{clamp_index, Controlled, ValueSource};
use super::WidgetSpec;
use crate::build::BuildContext;
use crate::frame::Frame;
use crate::identity::IdentityKey;
use crate::tree::{Node, NodeId, Rgb, SizeHint, VisualStyle};
use std::rc::Rc;

/// A table with a one-row header and selectable body rows.
#[derive(Clone)]
pub struct TableSpec {
    /// Column titles.
    pub columns: Vec<String>,
    /// Column widths; columns without one size to fit.
    pub column_widths: Vec<f32>,
    /// Body rows, one string per column.
    pub rows: Vec<Vec<String>>,
    /// Selected body row; clamped to the row range.
    pub selected: ValueSource<usize>,
    /// Identity key.
    pub key: Option<IdentityKey>,
    /// Whether the table reacts to input.
    pub enabled: bool,
    /// Height of the header and of each row.
    pub row_height: f32,
    /// Body rows shown at once.
    pub visible_rows: usize,
    /// Header background.
    pub header: VisualStyle,
    /// Row colors.
    pub styles: RowStyles,
    /// Fired when the selection changes, and on Enter.
    pub on_select: Option<Callback<usize>>,
    /// Fired when the body scrolls.
    pub on_scroll: Option<Callback<ScrollInfo>>,
}

impl TableSpec {
    /// Create a table with the given column titles and no rows.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            column_widths: Vec::new(),
            rows: Vec::new(),
            selected: ValueSource::literal(0),
            key: None,
            enabled: true,
            row_height: 1.0,
            visible_rows: 8,
            header: VisualStyle::solid(Rgb::new(45, 45, 45)),
            styles: RowStyles::default(),
            on_select: None,
            on_scroll: None,
        }
    }

    /// Append a body row.
    #[must_use]
    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Set column widths.
    #[must_use]
    pub fn column_widths(mut self, widths: impl Into<Vec<f32>>) -> Self {
        self.column_widths = widths.into();
        self
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

    /// Enable or disable the table.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the number of body rows shown at once.
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

    fn cell(&self, name: &'static str, column: usize, text: String) -> Node {
        let mut cell = Node::label(name, text);
        cell.size_hint = SizeHint {
            width: self.column_widths.get(column).copied(),
            height: Some(self.row_height),
        };
        cell
    }
}

impl WidgetSpec for TableSpec {
    #[allow(clippy::cast_precision_loss)]
    fn build(mut self, cx: &mut BuildContext<'_>, parent: Option<NodeId>) -> NodeId {
        let count = self.rows.len();
        let selected = Controlled::resolve(self.selected.clone(), move |i| clamp_index(i, count));
        let visible_rows = self.visible_rows.max(1);

        let mut root_node = interactive(Node::new("table"), self.enabled);
        root_node.size_hint.height = Some((visible_rows + 1) as f32 * self.row_height);
        let root = cx.insert(parent, root_node);

        let header = cx.insert(Some(root), Node::new("table.header").with_style(self.header).with_hit_test(false));
        for (column, title) in std::mem::take(&mut self.columns).into_iter().enumerate() {
            cx.insert(Some(header), self.cell("table.header_cell", column, title));
        }

        let content = cx.insert(Some(root), Node::new("table.content").with_hit_test(false));
        let mut rows = Vec::with_capacity(count);
        for (index, cells) in std::mem::take(&mut self.rows).into_iter().enumerate() {
            let mut row = Node::new("table.row")
                .with_style(self.styles.for_row(index == selected.get()))
                .with_hit_test(false);
            row.size_hint.height = Some(self.row_height);
            let row = cx.insert(Some(content), row);
            for (column, text) in cells.into_iter().enumerate() {
                cx.insert(Some(row), self.cell("table.cell", column, text));
            }
            rows.push(row);
        }
        let thumb = cx.insert(
            Some(root),
            Node::new("table.thumb")
                .with_size(SCROLLBAR_WIDTH, self.row_height)
                .with_style(self.styles.thumb)
                .with_visible(false)
                .with_hit_test(false),
        );
        if let Some(key) = self.key.take() {
            cx.register(key, root);
        }
        if !self.enabled {
            add_disabled_scrim(cx, root);
            return root;
        }

        RowsController {
            rows,
            styles: self.styles,
            scroller: RowScroller::new(content, thumb, self.row_height, visible_rows, self.row_height),
            selected,
            on_select: self.on_select,
            on_scroll: self.on_scroll,
        }
        .attach(cx.frame_mut(), root);
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, PointerPhase};
    use crate::widget::testing::Harness;
    use crate::widget::value::state;
    use std::cell::Cell;

    fn people() -> TableSpec {
        TableSpec::new(["name", "age"])
            .column_widths(vec![12.0, 4.0])
            .row(["ada", "36"])
            .row(["grace", "85"])
            .row(["linus", "54"])
            .visible_rows(2)
    }

    #[test]
    fn test_builds_header_and_cells() {
        let mut h = Harness::new();
        let root = h.build(people());
        let titles: Vec<_> = h
            .children(root, "table.header_cell")
            .into_iter()
            .map(|id| h.node(id).text.clone().unwrap_or_default())
            .collect();
        assert_eq!(titles, vec!["name", "age"]);
        let cells = h.children(root, "table.cell");
        assert_eq!(cells.len(), 6);
        assert_eq!(h.node(cells[1]).size_hint.width, Some(4.0));
        assert!(h.node(h.child(root, "table.thumb")).visible);
    }

    #[test]
    fn test_header_click_does_not_select() {
        let mut h = Harness::new();
        let shared = state(0_usize);
        let root = h.build(people().selected(ValueSource::from_state(shared.clone())));
        h.place(root, 0.0, 0.0, 16.0, 3.0);

        assert!(h.pointer(PointerPhase::Down, 2.0, 0.5));
        assert_eq!(*shared.borrow(), 0);
        h.pointer(PointerPhase::Up, 2.0, 0.5);

        h.pointer(PointerPhase::Down, 2.0, 2.5);
        assert_eq!(*shared.borrow(), 1);
    }

    #[test]
    fn test_enter_refires_without_moving() {
        let mut h = Harness::new();
        let fired = Rc::new(Cell::new(0));
        let sink = fired.clone();
        let root = h.build(people().selected(2_usize).on_select(move |_, i| {
            assert_eq!(i, 2);
            sink.set(sink.get() + 1);
        }));
        h.focus(root);
        h.key(KeyCode::Enter);
        h.key(KeyCode::Enter);
        h.key(KeyCode::Down);
        assert_eq!(fired.get(), 2);
    }
}
