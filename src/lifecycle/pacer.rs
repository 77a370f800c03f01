//! Frame pacing.

use std::time::{Duration, Instant};

/// Caps how often frames are presented.
///
/// Pointer input asks for the cap to be skipped once so that dragging
/// never waits for the next frame slot.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    frame_duration: Duration,
    last_present: Option<Instant>,
    bypass: bool,
}

impl FramePacer {
    /// Create a pacer for `target_fps`. Zero disables the cap.
    pub fn new(target_fps: u32) -> Self {
        let frame_duration = if target_fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(1) / target_fps
        };
        Self {
            frame_duration,
            last_present: None,
            bypass: false,
        }
    }

    /// Minimum time between presented frames.
    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Let the next frame through regardless of the cap.
    pub fn bypass_next(&mut self) {
        self.bypass = true;
    }

    /// Time left until a frame may be presented at `now`.
    pub fn time_until_ready(&self, now: Instant) -> Duration {
        if self.bypass {
            return Duration::ZERO;
        }
        self.last_present.map_or(Duration::ZERO, |last| {
            self.frame_duration.saturating_sub(now.saturating_duration_since(last))
        })
    }

    /// Check if a frame may be presented at `now`.
    pub fn ready(&self, now: Instant) -> bool {
        self.time_until_ready(now).is_zero()
    }

    /// Record that a frame was presented at `now`.
    pub fn presented(&mut self, now: Instant) {
        self.last_present = Some(now);
        self.bypass = false;
    }
}
