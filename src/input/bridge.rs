//! Input bridge: host input to canonical frame events.
//!
//! The mapping is pure apart from [`BridgeState`], which remembers the
//! last pointer position (scroll events carry none) and the scroll unit
//! configuration.

use super::event::{FrameEvent, KeyCode, KeyEvent, KeyModifiers, PointerEvent, PointerPhase, ScrollEvent};
use super::host::{HostInput, HostPointer, ScrollUnit};
use crate::layout::Viewport;
use tracing::warn;

/// The key combination that asks the application to exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitKey {
    /// Key code.
    pub code: KeyCode,
    /// Exact modifier mask; extra modifiers make it an ordinary key.
    pub modifiers: KeyModifiers,
}

impl ExitKey {
    fn matches(self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        code == self.code && modifiers == self.modifiers
    }
}

/// Configuration for the input bridge.
#[derive(Debug, Clone, Copy)]
pub struct BridgeConfig {
    /// Pixels per scroll line for line-unit scroll events.
    pub scroll_line_pixels: f32,
    /// Scroll direction: negative inverts, anything else (including 0)
    /// keeps the host direction.
    pub scroll_direction_sign: i32,
    /// Key that requests exit instead of being dispatched.
    pub exit_key: Option<ExitKey>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            scroll_line_pixels: 16.0,
            scroll_direction_sign: 0,
            exit_key: Some(ExitKey {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
            }),
        }
    }
}

/// What the caller should do after bridging one host event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BridgeResult {
    /// A frame should be scheduled.
    pub request_frame: bool,
    /// The next frame must not wait for the frame-rate cap.
    pub bypass_frame_cap: bool,
    /// The application should exit.
    pub request_exit: bool,
}

impl BridgeResult {
    /// Combine with the result of another event in the same batch.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            request_frame: self.request_frame || other.request_frame,
            bypass_frame_cap: self.bypass_frame_cap || other.bypass_frame_cap,
            request_exit: self.request_exit || other.request_exit,
        }
    }
}

/// Output of bridging one host event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BridgeOutput {
    /// Event to dispatch, if any.
    pub event: Option<FrameEvent>,
    /// New viewport, for resize events.
    pub resize: Option<Viewport>,
    /// Scheduling flags.
    pub result: BridgeResult,
}

/// The only memory the bridge carries between events.
#[derive(Debug, Clone, Copy)]
pub struct BridgeState {
    /// Last pointer X position.
    pub last_pointer_x: f32,
    /// Last pointer Y position.
    pub last_pointer_y: f32,
    /// Pixels per scroll line.
    pub scroll_line_pixels: f32,
    /// Scroll direction sign (`-1` or `+1`).
    pub scroll_direction_sign: f32,
    exit_key: Option<ExitKey>,
}

impl Default for BridgeState {
    fn default() -> Self {
        Self::new(&BridgeConfig::default())
    }
}

impl BridgeState {
    /// Create bridge state from configuration.
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            last_pointer_x: 0.0,
            last_pointer_y: 0.0,
            scroll_line_pixels: config.scroll_line_pixels,
            scroll_direction_sign: if config.scroll_direction_sign < 0 { -1.0 } else { 1.0 },
            exit_key: config.exit_key,
        }
    }

    /// Map one host event to at most one canonical event.
    ///
    /// `text` is the side buffer of the batch the event came from.
    pub fn bridge(&mut self, input: &HostInput, text: &[u8]) -> BridgeOutput {
        match *input {
            HostInput::PointerDown(p) => self.pointer(PointerPhase::Down, p),
            HostInput::PointerMove(p) => self.pointer(PointerPhase::Move, p),
            HostInput::PointerUp(p) => self.pointer(PointerPhase::Up, p),
            HostInput::PointerCancel(p) => self.pointer(PointerPhase::Cancel, p),

            HostInput::Key {
                code,
                modifiers,
                pressed,
            } => {
                if pressed && self.exit_key.is_some_and(|k| k.matches(code, modifiers)) {
                    return BridgeOutput {
                        result: BridgeResult {
                            request_exit: true,
                            ..BridgeResult::default()
                        },
                        ..BridgeOutput::default()
                    };
                }
                let key = KeyEvent::with(code, modifiers);
                dispatched(
                    if pressed {
                        FrameEvent::KeyDown(key)
                    } else {
                        FrameEvent::KeyUp(key)
                    },
                    false,
                )
            }

            HostInput::Text { start, len } => {
                let span = start.checked_add(len).and_then(|end| text.get(start..end));
                match span.map(std::str::from_utf8) {
                    Some(Ok(s)) if !s.is_empty() => dispatched(FrameEvent::Text(s.to_owned()), false),
                    Some(Ok(_)) => BridgeOutput::default(),
                    Some(Err(_)) => {
                        warn!(start, len, "dropping text event with invalid UTF-8");
                        BridgeOutput::default()
                    }
                    None => {
                        warn!(start, len, buffer = text.len(), "dropping out-of-range text span");
                        BridgeOutput::default()
                    }
                }
            }

            HostInput::Scroll {
                delta_x,
                delta_y,
                unit,
            } => {
                let scale = match unit {
                    ScrollUnit::Line => self.scroll_line_pixels,
                    ScrollUnit::Pixel => 1.0,
                } * self.scroll_direction_sign;
                dispatched(
                    FrameEvent::Scroll(ScrollEvent {
                        x: self.last_pointer_x,
                        y: self.last_pointer_y,
                        scroll_x: delta_x * scale,
                        scroll_y: delta_y * scale,
                    }),
                    true,
                )
            }

            HostInput::Resize { width, height } => BridgeOutput {
                event: None,
                resize: Some(Viewport::new(width, height)),
                result: BridgeResult {
                    request_frame: true,
                    bypass_frame_cap: true,
                    request_exit: false,
                },
            },

            HostInput::FocusGained | HostInput::FocusLost => BridgeOutput {
                result: BridgeResult {
                    request_frame: true,
                    ..BridgeResult::default()
                },
                ..BridgeOutput::default()
            },
        }
    }

    fn pointer(&mut self, phase: PointerPhase, p: HostPointer) -> BridgeOutput {
        self.last_pointer_x = p.x;
        self.last_pointer_y = p.y;
        dispatched(
            FrameEvent::Pointer(PointerEvent {
                phase,
                x: p.x,
                y: p.y,
                button: p.button,
                modifiers: p.modifiers,
                timestamp: p.timestamp,
            }),
            true,
        )
    }
}

const fn dispatched(event: FrameEvent, bypass_frame_cap: bool) -> BridgeOutput {
    BridgeOutput {
        event: Some(event),
        resize: None,
        result: BridgeResult {
            request_frame: true,
            bypass_frame_cap,
            request_exit: false,
        },
    }
}
