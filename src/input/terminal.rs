//! Terminal host: crossterm input polled on a dedicated thread.
//!
//! The input thread only reads crossterm events and forwards them over a
//! channel; conversion into [`HostInput`] happens on the UI thread when
//! the application drains a polling cycle into a [`HostInputBatch`].

use super::event::{KeyCode, KeyModifiers, PointerButton};
use super::host::{HostInput, HostInputBatch, HostPointer, ScrollUnit};
use crate::error::HostError;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::{
    cursor, execute,
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Configuration for the terminal host.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// How long the input thread waits for events before checking shutdown.
    pub poll_timeout: Duration,
    /// Whether to enable mouse capture.
    pub enable_mouse: bool,
    /// Whether to use the alternate screen buffer.
    pub alternate_screen: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(10),
            enable_mouse: true,
            alternate_screen: true,
        }
    }
}

/// Thread that polls crossterm and forwards raw events.
struct InputActor {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    fn spawn(sender: Sender<io::Result<Event>>, poll_timeout: Duration) -> Result<Self, HostError> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("flywheel-ui-input".to_string())
            .spawn(move || Self::run_loop(&sender, &shutdown_clone, poll_timeout))
            .map_err(HostError::Spawn)?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    fn run_loop(sender: &Sender<io::Result<Event>>, shutdown: &AtomicBool, poll_timeout: Duration) {
        while !shutdown.load(Ordering::Relaxed) {
            let next = match event::poll(poll_timeout) {
                Ok(true) => event::read(),
                Ok(false) => continue,
                Err(e) => Err(e),
            };
            if sender.send(next).is_err() {
                // Receiver dropped, exit
                break;
            }
        }
    }

    fn join(mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

/// A terminal acting as the UI host.
///
/// Creating the host enters raw mode (and optionally the alternate screen
/// and mouse capture); dropping it restores the terminal.
pub struct TerminalHost {
    config: HostConfig,
    rx: Receiver<io::Result<Event>>,
    actor: Option<InputActor>,
    started: Instant,
    size: (u16, u16),
}

impl TerminalHost {
    /// Set up the terminal and start the input thread.
    pub fn new(config: HostConfig) -> Result<Self, HostError> {
        let size = terminal::size()?;
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        if config.enable_mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        execute!(stdout, cursor::Hide)?;

        let (tx, rx) = bounded(256);
        let actor = InputActor::spawn(tx, config.poll_timeout)?;
        debug!(width = size.0, height = size.1, "terminal host started");

        Ok(Self {
            config,
            rx,
            actor: Some(actor),
            started: Instant::now(),
            size,
        })
    }

    /// Terminal size in cells at the last resize.
    pub const fn size(&self) -> (u16, u16) {
        self.size
    }

    /// Drain every pending event into `batch` without blocking.
    ///
    /// Returns the number of host events appended.
    pub fn poll_events(&mut self, batch: &mut HostInputBatch) -> Result<usize, HostError> {
        let before = batch.len();
        loop {
            match self.rx.try_recv() {
                Ok(next) => self.accept(next?, batch),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Err(HostError::Disconnected),
            }
        }
        Ok(batch.len() - before)
    }

    /// Block until at least one event arrives or `timeout` elapses, then
    /// drain everything pending.
    pub fn wait_events(&mut self, batch: &mut HostInputBatch, timeout: Duration) -> Result<usize, HostError> {
        match self.rx.recv_timeout(timeout) {
            Ok(next) => self.accept(next?, batch),
            Err(RecvTimeoutError::Timeout) => return Ok(0),
            Err(RecvTimeoutError::Disconnected) => return Err(HostError::Disconnected),
        }
        self.poll_events(batch).map(|n| n + 1)
    }

    fn accept(&mut self, event: Event, batch: &mut HostInputBatch) {
        if let Event::Resize(width, height) = event {
            self.size = (width, height);
        }
        push_crossterm_event(batch, event, self.started.elapsed());
    }
}

impl Drop for TerminalHost {
    fn drop(&mut self) {
        if let Some(actor) = self.actor.take() {
            actor.join();
        }

        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show);
        if self.config.enable_mouse {
            let _ = execute!(stdout, DisableMouseCapture);
        }
        if self.config.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!(error = %e, "failed to leave raw mode");
        }
    }
}

/// Convert one crossterm event into host input, appending to `batch`.
///
/// Printable key presses produce both a `Key` and a `Text` event, the way
/// windowing hosts report key-down and committed text separately.
pub fn push_crossterm_event(batch: &mut HostInputBatch, event: Event, timestamp: Duration) {
    match event {
        Event::Key(key) => {
            let Some(code) = convert_key_code(key.code) else {
                return;
            };
            let mut modifiers = convert_modifiers(key.modifiers);
            if key.code == event::KeyCode::BackTab {
                modifiers |= KeyModifiers::SHIFT;
            }
            let pressed = key.kind != KeyEventKind::Release;
            batch.push(HostInput::Key {
                code,
                modifiers,
                pressed,
            });
            if let KeyCode::Char(c) = code {
                if pressed && !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                    batch.push_text(c.encode_utf8(&mut [0; 4]));
                }
            }
        }

        Event::Mouse(mouse) => push_mouse_event(batch, mouse, timestamp),

        Event::Resize(width, height) => batch.push(HostInput::Resize {
            width: f32::from(width),
            height: f32::from(height),
        }),

        Event::FocusGained => batch.push(HostInput::FocusGained),

        Event::FocusLost => batch.push(HostInput::FocusLost),

        Event::Paste(text) => batch.push_text(&text),
    }
}

fn push_mouse_event(batch: &mut HostInputBatch, mouse: event::MouseEvent, timestamp: Duration) {
    let pointer = |button: Option<PointerButton>| HostPointer {
        x: f32::from(mouse.column),
        y: f32::from(mouse.row),
        button,
        modifiers: convert_modifiers(mouse.modifiers),
        timestamp,
    };
    let scroll = |delta_x: f32, delta_y: f32| HostInput::Scroll {
        delta_x,
        delta_y,
        unit: ScrollUnit::Line,
    };

    match mouse.kind {
        event::MouseEventKind::Down(button) => {
            batch.push(HostInput::PointerDown(pointer(Some(convert_mouse_button(button)))));
        }
        event::MouseEventKind::Up(button) => {
            batch.push(HostInput::PointerUp(pointer(Some(convert_mouse_button(button)))));
        }
        event::MouseEventKind::Drag(button) => {
            batch.push(HostInput::PointerMove(pointer(Some(convert_mouse_button(button)))));
        }
        event::MouseEventKind::Moved => batch.push(HostInput::PointerMove(pointer(None))),
        // Terminal scroll events do carry a cell; report it as a move first
        // so the bridge's last pointer position is current.
        event::MouseEventKind::ScrollUp => {
            batch.push(HostInput::PointerMove(pointer(None)));
            batch.push(scroll(0.0, -1.0));
        }
        event::MouseEventKind::ScrollDown => {
            batch.push(HostInput::PointerMove(pointer(None)));
            batch.push(scroll(0.0, 1.0));
        }
        event::MouseEventKind::ScrollLeft => {
            batch.push(HostInput::PointerMove(pointer(None)));
            batch.push(scroll(-1.0, 0.0));
        }
        event::MouseEventKind::ScrollRight => {
            batch.push(HostInput::PointerMove(pointer(None)));
            batch.push(scroll(1.0, 0.0));
        }
    }
}

/// Convert crossterm `KeyCode` to ours.
fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
    Some(match code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::F(n) => KeyCode::F(n),
        event::KeyCode::Backspace => KeyCode::Backspace,
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Left => KeyCode::Left,
        event::KeyCode::Right => KeyCode::Right,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::Home => KeyCode::Home,
        event::KeyCode::End => KeyCode::End,
        event::KeyCode::PageUp => KeyCode::PageUp,
        event::KeyCode::PageDown => KeyCode::PageDown,
        event::KeyCode::Tab | event::KeyCode::BackTab => KeyCode::Tab,
        event::KeyCode::Delete => KeyCode::Delete,
        event::KeyCode::Insert => KeyCode::Insert,
        event::KeyCode::Esc => KeyCode::Esc,
        _ => return None,
    })
}

/// Convert crossterm `KeyModifiers` to our mask.
fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    out.set(KeyModifiers::SHIFT, mods.contains(event::KeyModifiers::SHIFT));
    out.set(KeyModifiers::CONTROL, mods.contains(event::KeyModifiers::CONTROL));
    out.set(KeyModifiers::ALT, mods.contains(event::KeyModifiers::ALT));
    out.set(KeyModifiers::SUPER, mods.contains(event::KeyModifiers::SUPER));
    out
}

const fn convert_mouse_button(button: event::MouseButton) -> PointerButton {
    match button {
        event::MouseButton::Left => PointerButton::Primary,
        event::MouseButton::Right => PointerButton::Secondary,
        event::MouseButton::Middle => PointerButton::Middle,
    }
}
