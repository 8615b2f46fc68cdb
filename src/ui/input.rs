//! Keyboard and resize listener
//!
//! A dedicated thread polls crossterm for input and forwards key presses and
//! resize notifications into the session event queue. The pump keeps the
//! exact stop flag and thread handle it started with, so stopping it always
//! removes the listener that was registered.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use super::keymapper::KeyMapper;
use crate::config::DetachKey;
use crate::core::session::SessionEvent;

/// How long a single poll waits before re-checking the stop flag
const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Running input listener
pub struct InputPump {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputPump {
    /// Start forwarding terminal input to `events`
    pub fn spawn(events: UnboundedSender<SessionEvent>, detach: DetachKey) -> std::io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let handle = thread::Builder::new()
            .name("wsline-input".to_string())
            .spawn(move || pump(&flag, &events, detach))?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    /// Stop the listener and wait for its thread to exit
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Input thread panicked");
            }
            debug!("Input listener removed");
        }
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        self.stop();
    }
}

fn pump(running: &AtomicBool, events: &UnboundedSender<SessionEvent>, detach: DetachKey) {
    while running.load(Ordering::SeqCst) {
        match event::poll(POLL_TIMEOUT) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!("Input poll failed: {}", e);
                break;
            }
        }

        let forwarded = match event::read() {
            Ok(Event::Key(key_event)) => match KeyMapper::map(&key_event) {
                Some(key) if detach.matches(&key) => {
                    info!("Detach key pressed");
                    events.send(SessionEvent::Detach)
                }
                Some(key) => events.send(SessionEvent::Key(key)),
                None => Ok(()),
            },
            Ok(Event::Resize(cols, rows)) => events.send(SessionEvent::Resize(cols, rows)),
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("Input read failed: {}", e);
                break;
            }
        };

        // Session is gone
        if forwarded.is_err() {
            break;
        }
    }

    running.store(false, Ordering::SeqCst);
}
