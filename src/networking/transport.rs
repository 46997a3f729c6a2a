//! WebSocket transport
//!
//! Runs the socket on a task and exposes it as two channels: transport
//! events coming in, text frames going out. The client context never
//! touches the socket directly.

use super::router::TransportEvent;
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};
use websocket::{ClientBuilder, Message};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("invalid server url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("websocket error: {0}")]
    WebSocket(#[from] websocket::Error),

    #[error("failed to start transport runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Handle to a running connection
///
/// Always ends its event stream with [`TransportEvent::Closed`], whether
/// the connection failed, the server hung up or the handle was dropped.
#[derive(Debug)]
pub struct TransportLink {
    events: UnboundedReceiver<TransportEvent>,
    outbound: UnboundedSender<String>,
}

impl TransportLink {
    /// Connect on the current tokio runtime
    pub fn connect(url: impl Into<String>) -> Self {
        let (link, task) = Self::channels(url.into());
        tokio::spawn(task);
        link
    }

    /// Connect on a dedicated thread with its own runtime, for callers
    /// outside of tokio such as a bevy app
    pub fn spawn_background(url: impl Into<String>) -> TransportResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (link, task) = Self::channels(url.into());
        std::thread::Builder::new()
            .name("party-transport".into())
            .spawn(move || runtime.block_on(task))?;
        Ok(link)
    }

    fn channels(url: String) -> (Self, impl std::future::Future<Output = ()> + Send + 'static) {
        let (event_tx, events) = mpsc::unbounded_channel();
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let task = async move {
            if let Err(e) = run(&url, &event_tx, outbound_rx).await {
                error!("[TRANSPORT] {}", e);
            }
            let _ = event_tx.send(TransportEvent::Closed);
        };
        (Self { events, outbound }, task)
    }

    /// Next event, `None` once the link is finished
    pub async fn next_event(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<TransportEvent> {
        self.events.try_recv().ok()
    }

    /// Queue a frame; dropped with a warning if the link is gone
    pub fn send(&self, text: String) {
        if self.outbound.send(text).is_err() {
            warn!("[TRANSPORT] Link closed, dropping outbound frame");
        }
    }

    pub fn send_all(&self, frames: impl IntoIterator<Item = String>) {
        for text in frames {
            self.send(text);
        }
    }
}

async fn run(
    url: &str,
    events: &UnboundedSender<TransportEvent>,
    mut outbound: UnboundedReceiver<String>,
) -> TransportResult<()> {
    info!("[TRANSPORT] Connecting to {}", url);
    let builder = ClientBuilder::new()
        .uri(url)
        .map_err(|e| TransportError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    let (mut stream, _response) = builder.connect().await?;
    info!("[TRANSPORT] Connected to {}", url);
    let _ = events.send(TransportEvent::Opened);

    loop {
        tokio::select! {
            frame = stream.next() => {
                let Some(frame) = frame else {
                    info!("[TRANSPORT] Server closed the stream");
                    return Ok(());
                };
                let msg = frame?;
                if msg.is_close() {
                    info!("[TRANSPORT] Server sent close");
                    return Ok(());
                }
                if let Some(text) = msg.as_text() {
                    if events.send(TransportEvent::Received(text.to_string())).is_err() {
                        debug!("[TRANSPORT] Event receiver dropped");
                        return Ok(());
                    }
                }
            }
            text = outbound.recv() => {
                let Some(text) = text else {
                    debug!("[TRANSPORT] Link dropped, closing");
                    let _ = stream.close().await;
                    return Ok(());
                };
                stream.send(Message::text(text)).await?;
            }
        }
    }
}
