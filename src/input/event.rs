//! Canonical frame events.
//!
//! Everything dispatched into the tree is one of these. Host-specific
//! input is normalized into them by the [bridge](super::BridgeState).

use bitflags::bitflags;
use std::time::Duration;

/// Key codes for keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character. Space is `Char(' ')`.
    Char(char),
    /// Function key (F1-F12).
    F(u8),
    /// Backspace key.
    Backspace,
    /// Enter/Return key.
    Enter,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Tab key. Shift+Tab arrives as `Tab` with [`KeyModifiers::SHIFT`].
    Tab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Escape key.
    Esc,
}

impl KeyCode {
    /// Enter or Space: the keys that activate buttons and checkboxes.
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Enter | Self::Char(' '))
    }
}

bitflags! {
    /// Modifier key mask carried on key and pointer events.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        /// Shift key held.
        const SHIFT = 0b0000_0001;
        /// Control key held.
        const CONTROL = 0b0000_0010;
        /// Alt/Option key held.
        const ALT = 0b0000_0100;
        /// Super/Command/Windows key held.
        const SUPER = 0b0000_1000;
    }
}

impl std::fmt::Debug for KeyModifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left mouse button, pen tip or touch contact.
    Primary,
    /// Right mouse button.
    Secondary,
    /// Middle mouse button.
    Middle,
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved, with or without a button held.
    Move,
    /// Button released.
    Up,
    /// The host aborted the gesture.
    Cancel,
}

/// A pointer event in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Phase.
    pub phase: PointerPhase,
    /// X position.
    pub x: f32,
    /// Y position.
    pub y: f32,
    /// Button involved (if any).
    pub button: Option<PointerButton>,
    /// Modifiers held.
    pub modifiers: KeyModifiers,
    /// Host timestamp, monotonic from an arbitrary origin.
    pub timestamp: Duration,
}

impl PointerEvent {
    /// Build a pointer event with the primary button, no modifiers and a
    /// zero timestamp.
    pub const fn primary(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            x,
            y,
            button: Some(PointerButton::Primary),
            modifiers: KeyModifiers::empty(),
            timestamp: Duration::ZERO,
        }
    }

    /// Same event with a different timestamp.
    #[must_use]
    pub const fn at(mut self, timestamp: Duration) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether the primary button (or no specific button) is involved.
    pub fn is_primary(&self) -> bool {
        self.button.is_none_or(|b| b == PointerButton::Primary)
    }
}

/// A key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key code.
    pub code: KeyCode,
    /// Modifier mask.
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// A key event with no modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    /// A key event with modifiers.
    pub const fn with(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }
}

/// A scroll event. Positive deltas scroll content towards its end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    /// X position (last known pointer position).
    pub x: f32,
    /// Y position (last known pointer position).
    pub y: f32,
    /// Horizontal delta in pixels.
    pub scroll_x: f32,
    /// Vertical delta in pixels.
    pub scroll_y: f32,
}

/// A canonical event dispatched into the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    /// Pointer down/move/up/cancel.
    Pointer(PointerEvent),
    /// A key was pressed (or auto-repeated).
    KeyDown(KeyEvent),
    /// A key was released.
    KeyUp(KeyEvent),
    /// Committed text input.
    Text(String),
    /// Wheel or trackpad scroll.
    Scroll(ScrollEvent),
}

impl FrameEvent {
    /// Shorthand for a key-down without modifiers.
    pub const fn key(code: KeyCode) -> Self {
        Self::KeyDown(KeyEvent::plain(code))
    }

    /// Shorthand for a primary-button pointer event.
    pub const fn pointer(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self::Pointer(PointerEvent::primary(phase, x, y))
    }

    /// The pointer payload, if this is a pointer event.
    pub const fn as_pointer(&self) -> Option<&PointerEvent> {
        match self {
            Self::Pointer(p) => Some(p),
            _ => None,
        }
    }

    /// The key payload, if this is a key-down event.
    pub const fn as_key_down(&self) -> Option<&KeyEvent> {
        match self {
            Self::KeyDown(k) => Some(k),
            _ => None,
        }
    }

    /// Whether hit-testing needs current layout to route this event.
    pub const fn is_positional(&self) -> bool {
        matches!(self, Self::Pointer(_) | Self::Scroll(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_keys() {
        assert!(KeyCode::Enter.is_activation());
        assert!(KeyCode::Char(' ').is_activation());
        assert!(!KeyCode::Char('a').is_activation());
    }

    #[test]
    fn test_positional() {
        assert!(FrameEvent::pointer(PointerPhase::Move, 1.0, 2.0).is_positional());
        assert!(!FrameEvent::key(KeyCode::Tab).is_positional());
        assert!(!FrameEvent::Text("a".into()).is_positional());
    }

    #[test]
    fn test_modifier_mask() {
        let mods = KeyModifiers::SHIFT | KeyModifiers::CONTROL;
        assert!(mods.contains(KeyModifiers::SHIFT));
        assert!(!mods.contains(KeyModifiers::ALT));
        assert_eq!(mods.bits(), 0b11);
    }
}
