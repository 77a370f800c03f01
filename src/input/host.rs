//! Host input: raw events as a windowing/terminal host reports them.
//!
//! A host collects one polling cycle's events into a [`HostInputBatch`].
//! Text payloads live in the batch's side buffer and events refer to them
//! by byte span, so the batch can be filled without per-event allocation.

use super::event::{KeyCode, KeyModifiers, PointerButton};
use std::time::Duration;

/// Unit of a host scroll delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollUnit {
    /// Lines (mouse wheel notches, terminal scroll events).
    #[default]
    Line,
    /// Pixels (precise trackpads).
    Pixel,
}

/// Pointer payload of a host event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostPointer {
    /// X position.
    pub x: f32,
    /// Y position.
    pub y: f32,
    /// Button involved (if any).
    pub button: Option<PointerButton>,
    /// Modifiers held.
    pub modifiers: KeyModifiers,
    /// Host timestamp.
    pub timestamp: Duration,
}

impl HostPointer {
    /// A primary-button pointer payload at a position.
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            button: Some(PointerButton::Primary),
            modifiers: KeyModifiers::empty(),
            timestamp: Duration::ZERO,
        }
    }
}

/// One raw host event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostInput {
    /// Button pressed.
    PointerDown(HostPointer),
    /// Pointer moved.
    PointerMove(HostPointer),
    /// Button released.
    PointerUp(HostPointer),
    /// Gesture aborted by the host.
    PointerCancel(HostPointer),
    /// Key pressed or released.
    Key {
        /// Key code.
        code: KeyCode,
        /// Modifier mask.
        modifiers: KeyModifiers,
        /// `true` for press/repeat, `false` for release.
        pressed: bool,
    },
    /// Committed text, as a byte span into the batch's text buffer.
    Text {
        /// Start offset in bytes.
        start: usize,
        /// Length in bytes.
        len: usize,
    },
    /// Scroll without a position of its own.
    Scroll {
        /// Horizontal delta.
        delta_x: f32,
        /// Vertical delta.
        delta_y: f32,
        /// Unit of the deltas.
        unit: ScrollUnit,
    },
    /// The host surface was resized.
    Resize {
        /// New width.
        width: f32,
        /// New height.
        height: f32,
    },
    /// The host window/terminal gained focus.
    FocusGained,
    /// The host window/terminal lost focus.
    FocusLost,
}

/// Events from one host polling cycle plus their text side buffer.
#[derive(Debug, Clone, Default)]
pub struct HostInputBatch {
    events: Vec<HostInput>,
    text: Vec<u8>,
}

impl HostInputBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&mut self, event: HostInput) {
        self.events.push(event);
    }

    /// Append text to the side buffer and a `Text` event referring to it.
    pub fn push_text(&mut self, text: &str) {
        let start = self.text.len();
        self.text.extend_from_slice(text.as_bytes());
        self.events.push(HostInput::Text {
            start,
            len: text.len(),
        });
    }

    /// Events in arrival order.
    pub fn events(&self) -> &[HostInput] {
        &self.events
    }

    /// The text side buffer.
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the batch has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop all events and text, keeping allocations.
    pub fn clear(&mut self) {
        self.events.clear();
        self.text.clear();
    }
}
