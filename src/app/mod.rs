//! App: ties the lifecycle, the current frame, focus, dispatch, identity
//! reconciliation and the input bridge together for one UI root.
//!
//! # Loop
//!
//! ```ignore
//! let mut app = App::new(AppConfig::default(), my_layout);
//! let mut host = TerminalHost::new(HostConfig::default())?;
//! let mut batch = HostInputBatch::new();
//! while !app.exit_requested() {
//!     app.run_rebuild_if_needed(|cx| build_ui(cx, &state));
//!     app.present_if_needed(Instant::now(), |frame| draw(frame));
//!     batch.clear();
//!     host.wait_events(&mut batch, app.time_until_frame(Instant::now()))?;
//!     app.bridge_host_batch(&batch);
//! }
//! ```

mod config;

pub use config::AppConfig;

use crate::build::BuildContext;
use crate::dispatch::Dispatcher;
use crate::focus::FocusManager;
use crate::frame::{Frame, Invalidation};
use crate::identity::IdentityReconciler;
use crate::input::{BridgeResult, BridgeState, FrameEvent, HostInput, HostInputBatch, KeyCode, KeyModifiers};
use crate::layout::{LayoutEngine, Viewport};
use crate::lifecycle::{FramePacer, Lifecycle};
use crate::tree::NodeId;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// One UI root.
pub struct App {
    lifecycle: Lifecycle,
    pacer: FramePacer,
    frame: Frame,
    focus: FocusManager,
    dispatcher: Dispatcher,
    identity: IdentityReconciler,
    bridge: BridgeState,
    layout_engine: Box<dyn LayoutEngine>,
    viewport: Viewport,
    exit_requested: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("lifecycle", &self.lifecycle)
            .field("focus", &self.focus)
            .field("viewport", &self.viewport)
            .field("generation", &self.identity.generation())
            .finish_non_exhaustive()
    }
}

impl App {
    /// Create an app. The first rebuild is already pending.
    pub fn new(config: AppConfig, layout_engine: impl LayoutEngine + 'static) -> Self {
        let mut lifecycle = Lifecycle::new();
        lifecycle.request_rebuild();
        Self {
            lifecycle,
            pacer: FramePacer::new(config.target_fps),
            frame: Frame::new(),
            focus: FocusManager::new(),
            dispatcher: Dispatcher::new(),
            identity: IdentityReconciler::new(),
            bridge: BridgeState::new(&config.bridge),
            layout_engine: Box::new(layout_engine),
            viewport: config.viewport,
            exit_requested: false,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Ask for a rebuild, e.g. after application state changed outside an
    /// input handler.
    pub fn request_rebuild(&mut self) {
        self.lifecycle.request_rebuild();
    }

    /// Rebuild the tree with `build` if a rebuild is pending.
    ///
    /// The old frame is dropped, focus is carried over by identity key, and
    /// any requests made while building are applied.
    pub fn run_rebuild_if_needed(&mut self, build: impl FnOnce(&mut BuildContext<'_>)) -> bool {
        let previous_focus = self.focus.focused_node();
        let Self {
            lifecycle,
            frame,
            focus,
            dispatcher,
            identity,
            ..
        } = self;

        let ran = lifecycle.run_rebuild_if_needed(|| {
            identity.begin_rebuild(previous_focus);
            let mut next = Frame::new();
            build(&mut BuildContext::new(&mut next, identity));
            *frame = next;
            dispatcher.reset();
            focus.update_after_rebuild(frame);
            identity.restore_focus(focus, frame);
            debug!(
                generation = identity.generation(),
                nodes = frame.tree().len(),
                focus = ?focus.focused_node(),
                "frame rebuilt"
            );
        });
        if ran {
            self.apply_frame_requests();
        }
        ran
    }

    /// Run layout if it is pending.
    pub fn run_layout_if_needed(&mut self) -> bool {
        let Self {
            lifecycle,
            frame,
            layout_engine,
            viewport,
            ..
        } = self;
        lifecycle.run_layout_if_needed(|| {
            let output = layout_engine.layout(frame.tree(), *viewport);
            frame.set_layout(output);
        })
    }

    /// Present a frame with `render` if one is pending and the frame cap
    /// allows it. Layout runs first if needed.
    pub fn present_if_needed(&mut self, now: Instant, render: impl FnOnce(&Frame)) -> bool {
        if !self.lifecycle.is_frame_pending() || !self.pacer.ready(now) {
            return false;
        }
        self.run_layout_if_needed();
        render(&self.frame);
        self.lifecycle.mark_frame_presented();
        self.pacer.presented(now);
        true
    }

    /// How long the host may block waiting for input before the next
    /// pending frame is due. Unbounded waits are capped at one second.
    pub fn time_until_frame(&self, now: Instant) -> Duration {
        if self.lifecycle.is_frame_pending() {
            self.pacer.time_until_ready(now)
        } else {
            Duration::from_secs(1)
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Dispatch a canonical event into the current frame.
    ///
    /// Positional events run a pending layout first so hit-testing sees
    /// current geometry. An unhandled Tab moves focus.
    pub fn dispatch_frame_event(&mut self, event: &FrameEvent) -> bool {
        if event.is_positional() {
            self.run_layout_if_needed();
        }
        let mut handled = self.dispatcher.dispatch(event, &mut self.frame, &self.focus);
        if !handled {
            if let Some(key) = event.as_key_down().filter(|k| k.code == KeyCode::Tab) {
                handled = self
                    .focus
                    .handle_tab(&mut self.frame, key.modifiers.contains(KeyModifiers::SHIFT));
                if handled {
                    self.lifecycle.request_frame();
                }
            }
        }
        self.apply_frame_requests();
        handled
    }

    /// Bridge one host event and dispatch the result.
    pub fn bridge_host_input_event(&mut self, input: &HostInput, batch: &HostInputBatch) -> BridgeResult {
        let output = self.bridge.bridge(input, batch.text());
        if let Some(viewport) = output.resize {
            trace!(width = viewport.width, height = viewport.height, "resize");
            self.viewport = viewport;
            self.lifecycle.request_layout();
        }
        if let Some(event) = &output.event {
            self.dispatch_frame_event(event);
        }

        let result = output.result;
        if result.request_frame {
            self.lifecycle.request_frame();
        }
        if result.bypass_frame_cap {
            self.pacer.bypass_next();
        }
        if result.request_exit {
            debug!("exit requested");
            self.exit_requested = true;
        }
        result
    }

    /// Bridge every event of a host batch in order.
    pub fn bridge_host_batch(&mut self, batch: &HostInputBatch) -> BridgeResult {
        batch.events().iter().fold(BridgeResult::default(), |acc, input| {
            acc.merge(self.bridge_host_input_event(input, batch))
        })
    }

    /// Move focus to `id` in the current frame.
    pub fn set_focus(&mut self, id: NodeId) -> bool {
        let moved = self.focus.set_focus(&mut self.frame, id);
        self.apply_frame_requests();
        moved
    }

    fn apply_frame_requests(&mut self) {
        if let Some(target) = self.frame.take_focus_request() {
            if self.focus.set_focus(&mut self.frame, target) {
                self.lifecycle.request_frame();
            }
        }
        let requested = self.frame.take_invalidation();
        if requested.contains(Invalidation::REBUILD) {
            self.lifecycle.request_rebuild();
        }
        if requested.contains(Invalidation::LAYOUT) {
            self.lifecycle.request_layout();
        }
        if requested.contains(Invalidation::PAINT) {
            self.lifecycle.request_frame();
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The lifecycle flags.
    pub const fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// The current frame.
    pub const fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Mutable access to the current frame.
    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    /// The focus manager.
    pub const fn focus(&self) -> &FocusManager {
        &self.focus
    }

    /// The identity reconciler.
    pub const fn identity(&self) -> &IdentityReconciler {
        &self.identity
    }

    /// The input bridge state.
    pub const fn bridge(&self) -> &BridgeState {
        &self.bridge
    }

    /// The current viewport.
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether the exit key was pressed.
    pub const fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}
