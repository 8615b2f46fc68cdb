//! Line editing session
//!
//! A session binds one display surface and one transport. Key presses and
//! transport events arrive as `SessionEvent`s on a single queue and are
//! handled one at a time, each to completion, so the display, the input
//! line and the remote side never observe a half-applied event.
//!
//! Between events the text after the prompt on screen is exactly the
//! content of the input line.

use std::fmt;
use std::io;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

use super::buffer::InputLine;
use super::dispatcher::{classify, Action};
use super::key::KeyPress;
use super::protocol::Outbound;
use crate::net::Transport;
use crate::ui::{Banner, Prompt, Surface, INTERRUPT_ECHO, NEWLINE};

/// Everything a session reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Key pressed on the display
    Key(KeyPress),
    /// Transport reached the open state
    Opened,
    /// Text received from the remote shell
    Message(String),
    /// Transport closed
    Closed,
    /// Transport failure; a `Closed` event follows
    Error(String),
    /// Hosting terminal changed size
    Resize(u16, u16),
    /// Local teardown requested by the host
    Detach,
}

/// Connection lifecycle. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// Why a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The remote side closed an open connection
    RemoteClosed,
    /// The connection never opened
    ConnectFailed(String),
    /// The connection failed after opening
    TransportFailed(String),
    /// Torn down locally
    Detached,
    /// Writing to the display failed
    DisplayFailed(String),
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::RemoteClosed => write!(f, "Connection closed by remote shell"),
            CloseReason::ConnectFailed(e) => write!(f, "Could not connect: {}", e),
            CloseReason::TransportFailed(e) => write!(f, "Connection lost: {}", e),
            CloseReason::Detached => write!(f, "Detached"),
            CloseReason::DisplayFailed(e) => write!(f, "{}", e),
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Display write failed: {0}")]
    Display(#[from] io::Error),
}

/// The line editor bound to one surface and one transport
pub struct Session<'a, S: Surface, T: Transport> {
    surface: &'a mut S,
    transport: &'a mut T,
    line: InputLine,
    state: ConnectionState,
    prompt: Prompt,
    banner: Banner,
    /// Error reported by the transport before it closed
    pending_error: Option<String>,
    close_reason: Option<CloseReason>,
}

impl<'a, S: Surface, T: Transport> Session<'a, S, T> {
    pub fn new(surface: &'a mut S, transport: &'a mut T, prompt: Prompt, banner: Banner) -> Self {
        Self {
            surface,
            transport,
            line: InputLine::new(),
            state: ConnectionState::Connecting,
            prompt,
            banner,
            pending_error: None,
            close_reason: None,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == ConnectionState::Closed
    }

    /// Text typed since the last submit, interrupt or output batch
    #[allow(dead_code)]
    pub fn line(&self) -> &str {
        self.line.as_str()
    }

    #[allow(dead_code)]
    pub fn close_reason(&self) -> Option<&CloseReason> {
        self.close_reason.as_ref()
    }

    /// Consume events until the session closes or the queue runs dry
    pub async fn run(
        &mut self,
        events: &mut mpsc::UnboundedReceiver<SessionEvent>,
    ) -> CloseReason {
        while let Some(event) = events.recv().await {
            if let Err(e) = self.handle(event) {
                error!("Session aborted: {}", e);
                self.close(CloseReason::DisplayFailed(e.to_string()));
            }
            if self.is_closed() {
                break;
            }
        }

        // Queue ended without a close event
        self.close(CloseReason::Detached);
        self.close_reason.clone().unwrap_or(CloseReason::Detached)
    }

    /// Apply one event
    pub fn handle(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        trace!("Event: {:?}", event);
        match event {
            SessionEvent::Key(key) => self.on_key(&key),
            SessionEvent::Opened => self.on_opened(),
            SessionEvent::Message(text) => self.on_message(&text),
            SessionEvent::Closed => {
                let reason = match (self.pending_error.take(), self.state) {
                    (Some(e), ConnectionState::Connecting) => CloseReason::ConnectFailed(e),
                    (None, ConnectionState::Connecting) => {
                        CloseReason::ConnectFailed("connection refused".to_string())
                    }
                    (Some(e), _) => CloseReason::TransportFailed(e),
                    (None, _) => CloseReason::RemoteClosed,
                };
                self.close(reason);
                Ok(())
            }
            SessionEvent::Error(e) => {
                warn!("Transport error: {}", e);
                self.pending_error = Some(e);
                Ok(())
            }
            SessionEvent::Resize(cols, rows) => {
                if !self.is_closed() {
                    self.surface.fit(cols, rows);
                }
                Ok(())
            }
            SessionEvent::Detach => {
                self.close(CloseReason::Detached);
                Ok(())
            }
        }
    }

    /// Tear the session down. Only the first call has any effect.
    pub fn close(&mut self, reason: CloseReason) {
        if self.is_closed() {
            return;
        }
        info!("Session closed: {}", reason);
        self.state = ConnectionState::Closed;
        self.close_reason = Some(reason);
        self.line.take();
        self.transport.close();
        self.surface.dispose();
    }

    fn on_opened(&mut self) -> Result<(), SessionError> {
        if self.state != ConnectionState::Connecting {
            debug!("Ignoring open event in state {:?}", self.state);
            return Ok(());
        }
        info!("Connection open");
        self.state = ConnectionState::Open;
        self.surface.write_line(&self.banner.render())?;
        self.redraw_prompt()
    }

    fn on_key(&mut self, key: &KeyPress) -> Result<(), SessionError> {
        if self.state != ConnectionState::Open {
            debug!("Dropping key in state {:?}: {:?}", self.state, key.key);
            return Ok(());
        }

        match classify(key) {
            Action::Interrupt => {
                if !self.send(Outbound::Interrupt) {
                    return Ok(());
                }
                self.erase_line()?;
                self.surface.write(INTERRUPT_ECHO)?;
                self.redraw_prompt()?;
            }
            Action::Submit => {
                let line = self.line.take();
                if !self.send(Outbound::Submit(line)) {
                    return Ok(());
                }
                // The prompt comes back with the remote's response
                self.surface.write(NEWLINE)?;
            }
            Action::Erase => {
                if let Some(width) = self.line.pop_cell() {
                    self.surface.erase(width)?;
                }
            }
            Action::HistoryPrev => {
                self.send(Outbound::HistoryPrev);
            }
            Action::HistoryNext => {
                self.send(Outbound::HistoryNext);
            }
            Action::Complete => {
                let partial = self.line.as_str().to_string();
                self.send(Outbound::Complete(partial));
            }
            Action::Insert(text) => {
                if text.is_empty() {
                    return Ok(());
                }
                for ch in text.chars() {
                    self.line.push(ch);
                }
                self.surface.write(&text)?;
            }
        }
        Ok(())
    }

    /// Replace the unsent input line with remote output, then redraw the prompt
    fn on_message(&mut self, text: &str) -> Result<(), SessionError> {
        if self.state != ConnectionState::Open {
            debug!("Dropping message in state {:?}", self.state);
            return Ok(());
        }
        if text.is_empty() {
            return Ok(());
        }

        self.erase_line()?;
        for segment in output_lines(text) {
            self.surface.write_line(segment)?;
        }
        self.redraw_prompt()
    }

    /// Erase every buffered character from the display and empty the buffer
    fn erase_line(&mut self) -> Result<(), SessionError> {
        for width in self.line.drain_widths() {
            self.surface.erase(width)?;
        }
        Ok(())
    }

    fn redraw_prompt(&mut self) -> Result<(), SessionError> {
        self.surface.write(&self.prompt.render())?;
        Ok(())
    }

    /// Send a message. A failed send closes the session and returns false.
    fn send(&mut self, message: Outbound) -> bool {
        let wire = message.to_wire();
        match self.transport.send(&wire) {
            Ok(()) => {
                debug!("Sent {:?}", message);
                true
            }
            Err(e) => {
                warn!("Send failed: {}", e);
                self.close(CloseReason::TransportFailed(e.to_string()));
                false
            }
        }
    }
}

/// Split remote output into displayable lines.
///
/// Splits on `\n` and `\r\n`; a `\r` not followed by `\n` stays in the
/// segment. Segments that are blank after trimming are dropped, so runs of
/// line breaks collapse. Kept segments are not trimmed.
pub fn output_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
        .map(|segment| match segment.strip_suffix('\n') {
            Some(line) => line.strip_suffix('\r').unwrap_or(line),
            None => segment,
        })
        .filter(|segment| !segment.trim().is_empty())
}
