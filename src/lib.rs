//! # Flywheel UI
//!
//! The interaction runtime of a rebuild-driven declarative UI.
//!
//! The application describes its whole UI from its state in a rebuild
//! function. Flywheel UI decides when that function runs, keeps focus and
//! node identity stable across rebuilds, turns host input into canonical
//! events, and drives the widgets' interaction state machines without
//! forcing a rebuild for every hover or drag.
//!
//! ## Core Concepts
//!
//! - **Frame lifecycle**: rebuild, layout and frame requests are dirty
//!   flags; a rebuild always implies layout, and frames are paced
//! - **Callback composition**: each node holds one callback record whose
//!   handler chains grow by composition, guarded against reentry
//! - **Identity reconciler**: stable string keys map nodes across
//!   rebuilds so focus survives
//! - **Input bridge**: host input becomes [`FrameEvent`]s with the last
//!   pointer position and scroll units applied
//! - **Visual patches**: handlers patch offset, size, visibility and style
//!   in place, requesting only a frame or a layout pass
//!
//! ## Example
//!
//! ```rust,ignore
//! use flywheel_ui::{App, AppConfig, Node};
//! use flywheel_ui::widget::{ButtonSpec, CheckboxSpec, ValueSource};
//!
//! let mut app = App::new(AppConfig::default(), my_layout);
//! app.run_rebuild_if_needed(|cx| {
//!     let root = cx.insert(None, Node::new("root"));
//!     cx.add(Some(root), CheckboxSpec::new(ValueSource::from_state(dark_mode.clone())).key("dark"));
//!     cx.add(Some(root), ButtonSpec::new("Quit").key("quit"));
//! });
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod app;
pub mod build;
pub mod callback;
pub mod dispatch;
pub mod error;
pub mod focus;
pub mod frame;
pub mod identity;
pub mod input;
pub mod layout;
pub mod lifecycle;
pub mod tree;
pub mod widget;

// Re-exports for convenience
pub use app::{App, AppConfig};
pub use build::BuildContext;
pub use callback::{append_node_on_blur, append_node_on_event, append_node_on_focus, CallbackOverride, CallbackRecord};
pub use dispatch::Dispatcher;
pub use error::HostError;
pub use focus::{tab_order, FocusManager};
pub use frame::{Frame, Invalidation};
pub use identity::{IdentityKey, IdentityReconciler};
pub use input::{
    BridgeConfig, BridgeResult, BridgeState, FrameEvent, HostConfig, HostInput, HostInputBatch, KeyCode, KeyModifiers,
    PointerEvent, PointerPhase, TerminalHost,
};
pub use layout::{LayoutEngine, LayoutOutput, LayoutRect, Viewport};
pub use lifecycle::{FramePacer, Lifecycle, PendingFlags};
pub use tree::{Node, NodeId, Rgb, SizeHint, Tree, VisualStyle};
pub use widget::WidgetSpec;
