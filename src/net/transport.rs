//! WebSocket transport
//!
//! A background task owns the socket. Outgoing text is queued to it over a
//! channel, and lifecycle events (opened, message, error, closed) are pushed
//! into the session event queue in arrival order.

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::core::session::SessionEvent;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection closed")]
    Closed,
}

/// Message channel to the remote shell
pub trait Transport {
    /// Queue a text message for delivery
    fn send(&mut self, text: &str) -> Result<(), TransportError>;

    /// Close the channel. Must be safe to call more than once.
    fn close(&mut self);
}

/// Commands from the session to the socket task
#[derive(Debug)]
enum Command {
    Send(String),
    Close,
}

/// Transport over a WebSocket connection
pub struct WsTransport {
    commands: mpsc::UnboundedSender<Command>,
    task: Option<JoinHandle<()>>,
    closed: bool,
}

impl WsTransport {
    /// Start connecting to `endpoint`. Must be called from within a tokio runtime.
    pub fn connect(endpoint: &str, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_socket(endpoint.to_string(), command_rx, events));

        Self {
            commands,
            task: Some(task),
            closed: false,
        }
    }

    /// Wait for the socket task to finish flushing its close frame
    pub async fn join(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Transport task ended abnormally: {}", e);
            }
        }
    }
}

impl Transport for WsTransport {
    fn send(&mut self, text: &str) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.commands
            .send(Command::Send(text.to_string()))
            .map_err(|_| TransportError::Closed)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        // The task may already be gone if the remote hung up first
        let _ = self.commands.send(Command::Close);
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        self.close();
    }
}

/// Socket task: connect, then pump frames both ways until either side closes
async fn run_socket(
    endpoint: String,
    mut commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<SessionEvent>,
) {
    let stream = match connect_async(endpoint.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            error!("Failed to connect to {}: {}", endpoint, e);
            let _ = events.send(SessionEvent::Error(e.to_string()));
            let _ = events.send(SessionEvent::Closed);
            return;
        }
    };

    info!("Connected to {}", endpoint);
    if events.send(SessionEvent::Opened).is_err() {
        return;
    }

    let (mut ws_tx, mut ws_rx) = stream.split();

    loop {
        tokio::select! {
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if events.send(SessionEvent::Message(text)).is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Binary(data))) => {
                    let text = String::from_utf8_lossy(&data).into_owned();
                    if events.send(SessionEvent::Message(text)).is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    info!("Remote closed connection: {:?}", frame);
                    break;
                }
                // Ping/pong are answered by tungstenite
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("WebSocket read error: {}", e);
                    let _ = events.send(SessionEvent::Error(e.to_string()));
                    break;
                }
                None => {
                    info!("WebSocket stream ended");
                    break;
                }
            },
            command = commands.recv() => match command {
                Some(Command::Send(text)) => {
                    debug!("-> {:?}", text);
                    if let Err(e) = ws_tx.send(Message::Text(text)).await {
                        warn!("WebSocket write error: {}", e);
                        let _ = events.send(SessionEvent::Error(e.to_string()));
                        break;
                    }
                }
                Some(Command::Close) | None => {
                    debug!("Closing WebSocket");
                    let _ = ws_tx.close().await;
                    break;
                }
            },
        }
    }

    let _ = events.send(SessionEvent::Closed);
}
