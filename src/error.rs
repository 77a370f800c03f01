//! Error types.
//!
//! The interaction core itself never fails; results there are `bool` or
//! `Option`. Only the terminal host touches the OS.

use thiserror::Error;

/// Errors raised by the terminal host.
#[derive(Debug, Error)]
pub enum HostError {
    /// Terminal setup, teardown or polling failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The input thread could not be started.
    #[error("failed to spawn input thread: {0}")]
    Spawn(std::io::Error),

    /// The input thread exited and its channel closed.
    #[error("input thread disconnected")]
    Disconnected,
}
