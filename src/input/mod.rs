//! Input: canonical events, host input and the bridge between them.

mod bridge;
mod event;
mod host;
mod terminal;

pub use bridge::{BridgeConfig, BridgeOutput, BridgeResult, BridgeState, ExitKey};
pub use event::{
    FrameEvent, KeyCode, KeyEvent, KeyModifiers, PointerButton, PointerEvent, PointerPhase, ScrollEvent,
};
pub use host::{HostInput, HostInputBatch, HostPointer, ScrollUnit};
pub use terminal::{push_crossterm_event, HostConfig, TerminalHost};
