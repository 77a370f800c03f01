//! Single-line text field.

use super::common::{add_disabled_scrim, fire, interactive, Callback};
use super::text_edit::{EditOutcome, TextEditState};
use super::value::{Controlled, ValueSource};
use super::WidgetSpec;
use crate::build::BuildContext;
use crate::callback::{append_node_on_blur, append_node_on_event, append_node_on_focus};
use crate::frame::Frame;
use crate::identity::IdentityKey;
use crate::input::{FrameEvent, KeyCode, KeyModifiers, PointerPhase};
use crate::tree::{Node, NodeId, Rgb, SizeHint, VisualStyle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Text field colors.
#[derive(Debug, Clone, Copy)]
pub struct TextFieldStyles {
    /// Field background.
    pub field: VisualStyle,
    /// Selection highlight.
    pub selection: VisualStyle,
    /// Caret.
    pub caret: VisualStyle,
    /// Opacity of the placeholder text.
    pub placeholder_opacity: f32,
}

impl Default for TextFieldStyles {
    fn default() -> Self {
        Self {
            field: VisualStyle::solid(Rgb::new(30, 30, 30)),
            selection: VisualStyle::solid(Rgb::new(40, 90, 170)),
            caret: VisualStyle::solid(Rgb::WHITE),
            placeholder_opacity: 0.5,
        }
    }
}

/// A single-line text input.
///
/// Text arrives through [`FrameEvent::Text`]; key-downs handle caret
/// movement, selection and deletion. Printable key-downs are swallowed so
/// they do not activate anything further up the tree.
#[derive(Clone)]
pub struct TextFieldSpec {
    /// Text source.
    pub text: ValueSource<String>,
    /// Identity key.
    pub key: Option<IdentityKey>,
    /// Whether the field reacts to input.
    pub enabled: bool,
    /// Accept focus, movement and selection but no edits.
    pub read_only: bool,
    /// Shown while the text is empty.
    pub placeholder: Option<String>,
    /// Field width in columns.
    pub width: f32,
    /// Colors.
    pub styles: TextFieldStyles,
    /// Fired with the new text after each edit.
    pub on_change: Option<Callback<String>>,
    /// Fired with the text on Enter.
    pub on_submit: Option<Callback<String>>,
}

impl TextFieldSpec {
    /// Create a field over a text source.
    pub fn new(text: impl Into<ValueSource<String>>) -> Self {
        Self {
            text: text.into(),
            key: None,
            enabled: true,
            read_only: false,
            placeholder: None,
            width: 20.0,
            styles: TextFieldStyles::default(),
            on_change: None,
            on_submit: None,
        }
    }

    /// Set the identity key.
    #[must_use]
    pub fn key(mut self, key: impl Into<IdentityKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Enable or disable the field.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Make the field read-only.
    #[must_use]
    pub const fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Set the placeholder.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the change callback.
    #[must_use]
    pub fn on_change(mut self, f: impl Fn(&mut Frame, String) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    /// Set the submit callback.
    #[must_use]
    pub fn on_submit(mut self, f: impl Fn(&mut Frame, String) + 'static) -> Self {
        self.on_submit = Some(Rc::new(f));
        self
    }
}

/// Nodes the field patches.
#[derive(Debug, Clone, Copy)]
struct FieldParts {
    text: NodeId,
    selection: NodeId,
    caret: NodeId,
}

impl FieldParts {
    #[allow(clippy::cast_precision_loss)]
    fn sync(self, frame: &mut Frame, state: &TextEditState, placeholder: Option<&str>, styles: &TextFieldStyles) {
        match placeholder.filter(|_| state.is_empty()) {
            Some(placeholder) => {
                frame.patch_text(self.text, placeholder);
                frame.patch_opacity(self.text, styles.placeholder_opacity);
            }
            None => {
                frame.patch_text(self.text, state.text());
                frame.patch_opacity(self.text, 1.0);
            }
        }
        frame.patch_offset(self.caret, state.column_of(state.cursor()) as f32, 0.0);
        match state.selection() {
            Some((start, end)) => {
                let left = state.column_of(start) as f32;
                let right = state.column_of(end) as f32;
                frame.patch_offset(self.selection, left, 0.0);
                frame.patch_size_hint(self.selection, SizeHint::fixed(right - left, 1.0));
                frame.patch_visible(self.selection, true);
            }
            None => {
                frame.patch_visible(self.selection, false);
            }
        }
    }
}

impl WidgetSpec for TextFieldSpec {
    fn build(self, cx: &mut BuildContext<'_>, parent: Option<NodeId>) -> NodeId {
        let value = Controlled::resolve_raw(self.text.clone());
        let state = Rc::new(RefCell::new(TextEditState::new(value.get())));

        let root = cx.insert(
            parent,
            interactive(
                Node::new("text_field")
                    .with_size(self.width, 1.0)
                    .with_style(self.styles.field),
                self.enabled,
            ),
        );
        let parts = FieldParts {
            selection: cx.insert(
                Some(root),
                Node::new("text_field.selection")
                    .with_style(self.styles.selection)
                    .with_visible(false)
                    .with_hit_test(false),
            ),
            text: cx.insert(Some(root), Node::label("text_field.text", "")),
            caret: cx.insert(
                Some(root),
                Node::new("text_field.caret")
                    .with_size(1.0, 1.0)
                    .with_style(self.styles.caret)
                    .with_visible(false)
                    .with_hit_test(false),
            ),
        };
        parts.sync(cx.frame_mut(), &state.borrow(), self.placeholder.as_deref(), &self.styles);
        if let Some(key) = self.key.clone() {
            cx.register(key, root);
        }
        if !self.enabled {
            add_disabled_scrim(cx, root);
            return root;
        }

        let frame = cx.frame_mut();
        append_node_on_focus(frame, root, move |frame, _| {
            frame.patch_visible(parts.caret, true);
        });
        append_node_on_blur(frame, root, move |frame, _| {
            frame.patch_visible(parts.caret, false);
        });

        let drag_anchor = Cell::new(None::<usize>);
        append_node_on_event(frame, root, move |frame, node, event| {
            let editable = !self.read_only;
            let sync = |frame: &mut Frame, state: &TextEditState| {
                parts.sync(frame, state, self.placeholder.as_deref(), &self.styles);
            };
            let commit = |frame: &mut Frame, state: &TextEditState| {
                let text = value.set(state.text().to_string());
                fire(self.on_change.as_ref(), frame, text);
            };
            match event {
                FrameEvent::Pointer(pointer) if pointer.is_primary() => {
                    let Some(rect) = frame.layout_of(node) else {
                        return false;
                    };
                    let index = state.borrow().index_at_column(pointer.x - rect.x);
                    match pointer.phase {
                        PointerPhase::Down => {
                            if !rect.contains(pointer.x, pointer.y) {
                                return false;
                            }
                            frame.request_focus(node);
                            drag_anchor.set(Some(index));
                            state.borrow_mut().set_cursor(index);
                        }
                        PointerPhase::Move => {
                            let Some(anchor) = drag_anchor.get() else {
                                return false;
                            };
                            state.borrow_mut().select(anchor, index);
                        }
                        PointerPhase::Up | PointerPhase::Cancel => {
                            return drag_anchor.take().is_some();
                        }
                    }
                    sync(frame, &state.borrow());
                    true
                }
                FrameEvent::KeyDown(key) => {
                    if key.code == KeyCode::Enter {
                        let text = state.borrow().text().to_string();
                        fire(self.on_submit.as_ref(), frame, text);
                        return true;
                    }
                    let outcome = state.borrow_mut().handle_key(key.code, key.modifiers, editable);
                    match outcome {
                        EditOutcome::Ignored => {
                            matches!(key.code, KeyCode::Char(_))
                                && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                        }
                        EditOutcome::Moved => {
                            sync(frame, &state.borrow());
                            true
                        }
                        EditOutcome::Changed => {
                            let state = state.borrow();
                            sync(frame, &state);
                            commit(frame, &state);
                            true
                        }
                    }
                }
                FrameEvent::Text(text) if editable => {
                    let inserted: String = text.chars().filter(|c| !c.is_control()).collect();
                    if inserted.is_empty() {
                        return false;
                    }
                    state.borrow_mut().insert(&inserted);
                    let state = state.borrow();
                    sync(frame, &state);
                    commit(frame, &state);
                    true
                }
                _ => false,
            }
        });
        root
    }
}
