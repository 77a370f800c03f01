//! Text editing model: text, caret and selection.
//!
//! Positions are code-point indices. The caret and the selection are
//! clamped to `[0, len]` after every operation, and each edit updates the
//! text, caret and selection together.

use crate::input::{KeyCode, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Result of feeding a key to [`TextEditState::handle_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The key is not an editing key.
    Ignored,
    /// Caret or selection moved; text unchanged.
    Moved,
    /// The text changed.
    Changed,
}

/// Editable text with a caret and an optional selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEditState {
    text: String,
    cursor: usize,
    selection: Option<(usize, usize)>,
}

impl TextEditState {
    /// Create a state with the caret at the end of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            selection: None,
        }
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret position.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Selected range `(start, end)` with `start < end`, if any.
    pub const fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// Length in code points.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The selected text, or `""`.
    pub fn selected_text(&self) -> &str {
        match self.selection {
            Some((start, end)) => &self.text[self.byte_index(start)..self.byte_index(end)],
            None => "",
        }
    }

    /// Replace the whole text. Caret and selection are re-clamped.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.clamp();
    }

    /// Move the caret and drop the selection.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
        self.selection = None;
        self.clamp();
    }

    /// Select `[anchor, cursor]` (in either order) with the caret at `cursor`.
    pub fn select(&mut self, anchor: usize, cursor: usize) {
        self.cursor = cursor;
        self.selection = Some((anchor.min(cursor), anchor.max(cursor)));
        self.clamp();
    }

    /// Select everything.
    pub fn select_all(&mut self) {
        self.select(0, self.len());
    }

    fn clamp(&mut self) {
        let len = self.len();
        self.cursor = self.cursor.min(len);
        self.selection = self
            .selection
            .map(|(start, end)| (start.min(len), end.min(len)))
            .filter(|(start, end)| start < end);
    }

    fn byte_index(&self, index: usize) -> usize {
        self.text
            .char_indices()
            .nth(index)
            .map_or(self.text.len(), |(byte, _)| byte)
    }

    /// The end of the selection the caret is not on.
    fn anchor(&self) -> usize {
        match self.selection {
            Some((start, end)) if self.cursor == start => end,
            Some((start, _)) => start,
            None => self.cursor,
        }
    }

    fn move_to(&mut self, target: usize, extend: bool) {
        if extend {
            let anchor = self.anchor();
            self.select(anchor, target);
        } else {
            self.set_cursor(target);
        }
    }

    /// One code point left. Without `extend`, an active selection
    /// collapses to its left edge instead.
    pub fn move_left(&mut self, extend: bool) {
        match self.selection {
            Some((start, _)) if !extend => self.set_cursor(start),
            _ => self.move_to(self.cursor.saturating_sub(1), extend),
        }
    }

    /// One code point right. Without `extend`, an active selection
    /// collapses to its right edge instead.
    pub fn move_right(&mut self, extend: bool) {
        match self.selection {
            Some((_, end)) if !extend => self.set_cursor(end),
            _ => self.move_to(self.cursor + 1, extend),
        }
    }

    /// Start of the text.
    pub fn move_home(&mut self, extend: bool) {
        self.move_to(0, extend);
    }

    /// End of the text.
    pub fn move_end(&mut self, extend: bool) {
        self.move_to(self.len(), extend);
    }

    /// `(start, end)` code-point ranges of the words in the text.
    fn words(&self) -> Vec<(usize, usize)> {
        let mut words = Vec::new();
        let mut index = 0;
        for segment in self.text.split_word_bounds() {
            let count = segment.chars().count();
            if segment.chars().any(char::is_alphanumeric) {
                words.push((index, index + count));
            }
            index += count;
        }
        words
    }

    /// Start of the word before the caret.
    pub fn move_word_left(&mut self, extend: bool) {
        let target = self
            .words()
            .into_iter()
            .rev()
            .map(|(start, _)| start)
            .find(|start| *start < self.cursor)
            .unwrap_or(0);
        self.move_to(target, extend);
    }

    /// End of the word after the caret.
    pub fn move_word_right(&mut self, extend: bool) {
        let target = self
            .words()
            .into_iter()
            .map(|(_, end)| end)
            .find(|end| *end > self.cursor)
            .unwrap_or_else(|| self.len());
        self.move_to(target, extend);
    }

    fn delete_range(&mut self, start: usize, end: usize) {
        let (from, to) = (self.byte_index(start), self.byte_index(end));
        self.text.replace_range(from..to, "");
        self.cursor = start;
        self.selection = None;
        self.clamp();
    }

    /// Insert `text` at the caret, replacing the selection.
    pub fn insert(&mut self, text: &str) {
        if let Some((start, end)) = self.selection {
            self.delete_range(start, end);
        }
        let at = self.byte_index(self.cursor);
        self.text.insert_str(at, text);
        self.cursor += text.chars().count();
        self.clamp();
    }

    /// Delete the selection, or the code point before the caret.
    /// Returns whether anything was removed.
    pub fn backspace(&mut self) -> bool {
        match self.selection {
            Some((start, end)) => self.delete_range(start, end),
            None if self.cursor > 0 => self.delete_range(self.cursor - 1, self.cursor),
            None => return false,
        }
        true
    }

    /// Delete the selection, or the code point after the caret.
    /// Returns whether anything was removed.
    pub fn delete(&mut self) -> bool {
        match self.selection {
            Some((start, end)) => self.delete_range(start, end),
            None if self.cursor < self.len() => self.delete_range(self.cursor, self.cursor + 1),
            None => return false,
        }
        true
    }

    /// Apply a navigation or deletion key.
    ///
    /// Shift extends the selection, Control moves by word, Control+A
    /// selects everything. When `editable` is false, deletion keys are
    /// ignored but movement still works.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, editable: bool) -> EditOutcome {
        let extend = modifiers.contains(KeyModifiers::SHIFT);
        let word = modifiers.contains(KeyModifiers::CONTROL);
        match code {
            KeyCode::Left if word => self.move_word_left(extend),
            KeyCode::Left => self.move_left(extend),
            KeyCode::Right if word => self.move_word_right(extend),
            KeyCode::Right => self.move_right(extend),
            KeyCode::Home => self.move_home(extend),
            KeyCode::End => self.move_end(extend),
            KeyCode::Char('a' | 'A') if word => self.select_all(),
            KeyCode::Backspace if editable => {
                return if self.backspace() { EditOutcome::Changed } else { EditOutcome::Moved };
            }
            KeyCode::Delete if editable => {
                return if self.delete() { EditOutcome::Changed } else { EditOutcome::Moved };
            }
            _ => return EditOutcome::Ignored,
        }
        EditOutcome::Moved
    }

    /// Display column of code-point `index`.
    pub fn column_of(&self, index: usize) -> usize {
        self.text
            .chars()
            .take(index)
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    /// Code-point index whose left edge is nearest display column `column`.
    pub fn index_at_column(&self, column: f32) -> usize {
        let mut left = 0.0_f32;
        for (index, c) in self.text.chars().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let width = c.width().unwrap_or(0) as f32;
            if column < left + width / 2.0 {
                return index;
            }
            left += width;
        }
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(state: &mut TextEditState, code: KeyCode) -> EditOutcome {
        state.handle_key(code, KeyModifiers::empty(), true)
    }

    #[test]
    fn test_left_right_one_code_point() {
        let mut state = TextEditState::new("Hello");
        assert_eq!(state.cursor(), 5);
        key(&mut state, KeyCode::Left);
        assert_eq!(state.cursor(), 4);
        key(&mut state, KeyCode::Right);
        assert_eq!(state.cursor(), 5);
        key(&mut state, KeyCode::Right);
        assert_eq!(state.cursor(), 5);
    }

    #[test]
    fn test_plain_arrow_collapses_selection() {
        let mut state = TextEditState::new("Hello");
        state.select(0, 5);
        state.cursor = 2;
        key(&mut state, KeyCode::Left);
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.selection(), None);

        state.select(1, 3);
        key(&mut state, KeyCode::Right);
        assert_eq!(state.cursor(), 3);
        assert_eq!(state.selection(), None);
    }

    #[test]
    fn test_shift_extends_from_anchor() {
        let mut state = TextEditState::new("Hello");
        state.set_cursor(2);
        state.handle_key(KeyCode::Right, KeyModifiers::SHIFT, true);
        state.handle_key(KeyCode::Right, KeyModifiers::SHIFT, true);
        assert_eq!(state.selection(), Some((2, 4)));
        assert_eq!(state.selected_text(), "ll");

        state.handle_key(KeyCode::Home, KeyModifiers::SHIFT, true);
        assert_eq!(state.selection(), Some((0, 2)));
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_word_moves() {
        let mut state = TextEditState::new("one two, three");
        state.handle_key(KeyCode::Left, KeyModifiers::CONTROL, true);
        assert_eq!(state.cursor(), 9);
        state.handle_key(KeyCode::Left, KeyModifiers::CONTROL, true);
        assert_eq!(state.cursor(), 4);
        state.handle_key(KeyCode::Right, KeyModifiers::CONTROL, true);
        assert_eq!(state.cursor(), 7);
        state.handle_key(KeyCode::Left, KeyModifiers::CONTROL | KeyModifiers::SHIFT, true);
        assert_eq!(state.selection(), Some((4, 7)));
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut state = TextEditState::new("Hello world");
        state.select(6, 11);
        state.insert("there");
        assert_eq!(state.text(), "Hello there");
        assert_eq!(state.cursor(), 11);
        assert_eq!(state.selection(), None);

        state.set_cursor(0);
        state.insert("¡");
        assert_eq!(state.text(), "¡Hello there");
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut state = TextEditState::new("añb");
        assert_eq!(key(&mut state, KeyCode::Backspace), EditOutcome::Changed);
        assert_eq!(state.text(), "añ");
        state.set_cursor(0);
        assert_eq!(key(&mut state, KeyCode::Backspace), EditOutcome::Moved);
        assert_eq!(key(&mut state, KeyCode::Delete), EditOutcome::Changed);
        assert_eq!(state.text(), "ñ");

        state.select_all();
        assert!(state.backspace());
        assert!(state.is_empty());
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_read_only_moves_but_does_not_edit() {
        let mut state = TextEditState::new("abc");
        assert_eq!(state.handle_key(KeyCode::Backspace, KeyModifiers::empty(), false), EditOutcome::Ignored);
        assert_eq!(state.handle_key(KeyCode::Left, KeyModifiers::empty(), false), EditOutcome::Moved);
        assert_eq!(state.handle_key(KeyCode::Char('a'), KeyModifiers::CONTROL, false), EditOutcome::Moved);
        assert_eq!(state.selection(), Some((0, 3)));
        assert_eq!(state.text(), "abc");
    }

    #[test]
    fn test_set_text_clamps() {
        let mut state = TextEditState::new("Hello");
        state.select(1, 5);
        state.set_text("Hi");
        assert_eq!(state.cursor(), 2);
        assert_eq!(state.selection(), Some((1, 2)));
        state.set_text("");
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.selection(), None);
    }

    #[test]
    fn test_columns_use_display_width() {
        let state = TextEditState::new("a漢b");
        assert_eq!(state.column_of(2), 3);
        assert_eq!(state.index_at_column(0.4), 0);
        assert_eq!(state.index_at_column(1.6), 1);
        assert_eq!(state.index_at_column(2.2), 2);
        assert_eq!(state.index_at_column(9.0), 3);
    }
}
