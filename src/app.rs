//! Session runner
//!
//! Builds the display, the transport and the input listener, runs one
//! session over them and tears everything down in reverse order.

use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::core::session::{CloseReason, Session};
use crate::net::{Transport, WsTransport};
use crate::ui::{InputPump, Surface, TerminalSurface};

/// How long to wait for the close handshake after the session ends
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Run one session against the configured endpoint
pub fn run(config: &Config) -> anyhow::Result<CloseReason> {
    let prompt = config.prompt().context("Invalid prompt configuration")?;
    let banner = config.banner().context("Invalid banner configuration")?;
    let detach = config.detach_key()?;
    let endpoint = config.endpoint.trim().to_string();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async move {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();

        let mut surface = TerminalSurface::open(&format!("wsline - {}", endpoint))
            .context("Failed to open terminal")?;
        info!("Connecting to {}", endpoint);
        let mut transport = WsTransport::connect(&endpoint, events_tx.clone());
        let mut input = InputPump::spawn(events_tx, detach)
            .context("Failed to start input listener")?;

        let reason = {
            let mut session = Session::new(&mut surface, &mut transport, prompt, banner);
            session.run(&mut events_rx).await
        };

        input.stop();
        transport.close();
        if tokio::time::timeout(CLOSE_GRACE, transport.join()).await.is_err() {
            warn!("Timed out waiting for the connection to close");
        }
        surface.dispose();

        info!("Session ended: {}", reason);
        Ok::<_, anyhow::Error>(reason)
    })
}
