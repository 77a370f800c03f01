//! Row selection and scrolling shared by list, table and tree.
//!
//! Rows have a fixed height and live under a content node that is shifted
//! by the scroll offset. Hit-testing is done arithmetically from the
//! widget's own rectangle, so the row nodes themselves are not
//! hit-testable. A one-column scrollbar thumb appears when the rows
//! overflow the viewport.

use super::common::{fire, Callback};
use super::value::Controlled;
use crate::callback::append_node_on_event;
use crate::frame::Frame;
use crate::input::{FrameEvent, KeyCode, PointerPhase};
use crate::layout::LayoutRect;
use crate::tree::{NodeId, Rgb, SizeHint, VisualStyle};
use std::cell::Cell;
use std::rc::Rc;

/// Width of the scrollbar column.
pub const SCROLLBAR_WIDTH: f32 = 1.0;

/// Scroll position reported to `on_scroll` callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollInfo {
    /// Content offset from the top, in layout units.
    pub offset: f32,
    /// Offset as a fraction of the scrollable range; 0 when nothing
    /// overflows.
    pub progress: f32,
}

/// Row colors.
#[derive(Debug, Clone, Copy)]
pub struct RowStyles {
    /// Unselected row.
    pub row: VisualStyle,
    /// Selected row.
    pub selected: VisualStyle,
    /// Scrollbar thumb.
    pub thumb: VisualStyle,
}

impl Default for RowStyles {
    fn default() -> Self {
        Self {
            row: VisualStyle::solid(Rgb::new(25, 25, 25)),
            selected: VisualStyle::solid(Rgb::new(30, 80, 160)),
            thumb: VisualStyle::solid(Rgb::new(120, 120, 120)),
        }
    }
}

impl RowStyles {
    pub(crate) const fn for_row(&self, selected: bool) -> VisualStyle {
        if selected {
            self.selected
        } else {
            self.row
        }
    }
}

/// Target row for a navigation key, clamped to `[0, count - 1]`.
///
/// `page` is the number of rows PageUp/PageDown move by. Returns `None`
/// for keys that do not navigate, or when there are no rows.
pub fn navigate(current: usize, code: KeyCode, count: usize, page: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let last = count - 1;
    let current = current.min(last);
    let page = page.max(1);
    let target = match code {
        KeyCode::Up => current.saturating_sub(1),
        KeyCode::Down => current + 1,
        KeyCode::PageUp => current.saturating_sub(page),
        KeyCode::PageDown => current + page,
        KeyCode::Home => 0,
        KeyCode::End => last,
        _ => return None,
    };
    Some(target.min(last))
}

/// Scroll state of a row viewport.
#[derive(Debug)]
pub(crate) struct RowScroller {
    content: NodeId,
    thumb: NodeId,
    row_height: f32,
    viewport_rows: usize,
    top: f32,
    offset: Cell<f32>,
    row_count: Cell<usize>,
    dragging: Cell<bool>,
}

impl RowScroller {
    /// `top` is the height of any header above the first row.
    pub fn new(content: NodeId, thumb: NodeId, row_height: f32, viewport_rows: usize, top: f32) -> Self {
        Self {
            content,
            thumb,
            row_height: row_height.max(f32::EPSILON),
            viewport_rows: viewport_rows.max(1),
            top,
            offset: Cell::new(0.0),
            row_count: Cell::new(0),
            dragging: Cell::new(false),
        }
    }

    pub const fn viewport_rows(&self) -> usize {
        self.viewport_rows
    }

    #[allow(clippy::cast_precision_loss)]
    fn track_height(&self) -> f32 {
        self.viewport_rows as f32 * self.row_height
    }

    #[allow(clippy::cast_precision_loss)]
    fn max_offset(&self) -> f32 {
        self.row_count.get().saturating_sub(self.viewport_rows) as f32 * self.row_height
    }

    fn overflows(&self) -> bool {
        self.row_count.get() > self.viewport_rows
    }

    pub fn info(&self) -> ScrollInfo {
        let max = self.max_offset();
        let offset = self.offset.get();
        ScrollInfo {
            offset,
            progress: if max > 0.0 { offset / max } else { 0.0 },
        }
    }

    /// Set the number of rows, re-clamping the offset and resizing the
    /// thumb. Returns the new scroll position if it moved.
    #[allow(clippy::cast_precision_loss)]
    pub fn set_row_count(&self, frame: &mut Frame, count: usize) -> Option<ScrollInfo> {
        self.row_count.set(count);
        let track = self.track_height();
        let thumb_height = if count == 0 {
            track
        } else {
            (track * self.viewport_rows as f32 / count as f32).clamp(self.row_height.min(track), track)
        };
        frame.patch_size_hint(self.thumb, SizeHint::fixed(SCROLLBAR_WIDTH, thumb_height));
        frame.patch_visible(self.thumb, self.overflows());
        let moved = self.scroll_to(frame, self.offset.get());
        self.sync_thumb(frame);
        moved
    }

    /// Scroll to `offset`, clamped. Returns the new position if it moved.
    pub fn scroll_to(&self, frame: &mut Frame, offset: f32) -> Option<ScrollInfo> {
        let offset = if offset.is_nan() { 0.0 } else { offset.clamp(0.0, self.max_offset()) };
        if offset == self.offset.get() {
            return None;
        }
        self.offset.set(offset);
        frame.patch_offset(self.content, 0.0, -offset);
        self.sync_thumb(frame);
        Some(self.info())
    }

    pub fn scroll_by(&self, frame: &mut Frame, delta: f32) -> Option<ScrollInfo> {
        self.scroll_to(frame, self.offset.get() + delta)
    }

    /// Scroll the minimum amount that brings `row` fully into view.
    #[allow(clippy::cast_precision_loss)]
    pub fn ensure_visible(&self, frame: &mut Frame, row: usize) -> Option<ScrollInfo> {
        let row_top = row as f32 * self.row_height;
        let row_bottom = row_top + self.row_height;
        let offset = self.offset.get();
        if row_top < offset {
            self.scroll_to(frame, row_top)
        } else if row_bottom > offset + self.track_height() {
            self.scroll_to(frame, row_bottom - self.track_height())
        } else {
            None
        }
    }

    fn sync_thumb(&self, frame: &mut Frame) {
        let thumb_height = frame
            .node(self.thumb)
            .and_then(|n| n.size_hint.height)
            .unwrap_or(0.0);
        let travel = (self.track_height() - thumb_height).max(0.0);
        frame.patch_offset(self.thumb, 0.0, self.info().progress * travel);
    }

    /// Row under `y` within the widget rectangle `rect`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn row_at(&self, rect: LayoutRect, y: f32) -> Option<usize> {
        let local = y - rect.y - self.top;
        if local < 0.0 || local >= self.track_height() {
            return None;
        }
        let row = ((local + self.offset.get()) / self.row_height).floor() as usize;
        (row < self.row_count.get()).then_some(row)
    }

    /// Whether `(x, y)` falls on the scrollbar column.
    pub fn in_scrollbar(&self, rect: LayoutRect, x: f32, y: f32) -> bool {
        let local = y - rect.y - self.top;
        self.overflows() && x >= rect.right() - SCROLLBAR_WIDTH && (0.0..self.track_height()).contains(&local)
    }

    /// Start a scrollbar drag at `y`.
    pub fn begin_drag(&self, frame: &mut Frame, rect: LayoutRect, y: f32) -> Option<ScrollInfo> {
        self.dragging.set(true);
        self.drag_to(frame, rect, y)
    }

    /// Continue a scrollbar drag; `None` if no drag is active or nothing moved.
    pub fn drag_to(&self, frame: &mut Frame, rect: LayoutRect, y: f32) -> Option<ScrollInfo> {
        if !self.dragging.get() {
            return None;
        }
        let fraction = ((y - rect.y - self.top) / self.track_height()).clamp(0.0, 1.0);
        self.scroll_to(frame, fraction * self.max_offset())
    }

    /// End a scrollbar drag. Returns whether one was active.
    pub fn end_drag(&self) -> bool {
        self.dragging.replace(false)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.get()
    }
}

/// Selection and scrolling over a fixed set of row nodes.
pub(crate) struct RowsController {
    pub rows: Vec<NodeId>,
    pub styles: RowStyles,
    pub scroller: RowScroller,
    pub selected: Rc<Controlled<usize>>,
    pub on_select: Option<Callback<usize>>,
    pub on_scroll: Option<Callback<ScrollInfo>>,
}

impl RowsController {
    /// Scroll the initial selection into view and attach the handler to
    /// `root`. Rows are expected to be built with their selection style.
    pub fn attach(self, frame: &mut Frame, root: NodeId) {
        self.scroller.set_row_count(frame, self.rows.len());
        if !self.rows.is_empty() {
            self.scroller.ensure_visible(frame, self.selected.get());
        }
        append_node_on_event(frame, root, move |frame, node, event| self.handle(frame, node, event));
    }

    fn report(&self, frame: &mut Frame, scrolled: Option<ScrollInfo>) -> bool {
        match scrolled {
            Some(info) => {
                fire(self.on_scroll.as_ref(), frame, info);
                true
            }
            None => false,
        }
    }

    fn select(&self, frame: &mut Frame, index: usize) {
        let before = self.selected.get();
        let after = self.selected.set(index);
        if after != before {
            if let Some(row) = self.rows.get(before) {
                frame.patch_style(*row, self.styles.row);
            }
            if let Some(row) = self.rows.get(after) {
                frame.patch_style(*row, self.styles.selected);
            }
        }
        let scrolled = self.scroller.ensure_visible(frame, after);
        self.report(frame, scrolled);
        if after != before {
            fire(self.on_select.as_ref(), frame, after);
        }
    }

    fn handle(&self, frame: &mut Frame, node: NodeId, event: &FrameEvent) -> bool {
        match event {
            FrameEvent::Pointer(pointer) if pointer.is_primary() => {
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
                        } else if let Some(row) = self.scroller.row_at(rect, pointer.y) {
                            self.select(frame, row);
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
            FrameEvent::Scroll(scroll) => {
                let scrolled = self.scroller.scroll_by(frame, scroll.scroll_y);
                self.report(frame, scrolled)
            }
            FrameEvent::KeyDown(key) if key.code == KeyCode::Enter => {
                if self.rows.is_empty() {
                    return false;
                }
                fire(self.on_select.as_ref(), frame, self.selected.get());
                true
            }
            FrameEvent::KeyDown(key) => {
                let page = self.scroller.viewport_rows();
                match navigate(self.selected.get(), key.code, self.rows.len(), page) {
                    Some(target) => {
                        self.select(frame, target);
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }
}
