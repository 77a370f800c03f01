//! Application configuration.

use crate::input::BridgeConfig;
use crate::layout::Viewport;

/// Configuration for an [`App`](super::App).
#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    /// Presentation cap in frames per second. Zero disables the cap.
    pub target_fps: u32,
    /// Input bridge settings.
    pub bridge: BridgeConfig,
    /// Initial viewport.
    pub viewport: Viewport,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            bridge: BridgeConfig::default(),
            viewport: Viewport::new(80.0, 24.0),
        }
    }
}
