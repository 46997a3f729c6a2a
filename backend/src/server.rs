//! WebSocket endpoint around the [`Lobby`]
//!
//! Every socket gets a connection id and an unbounded outbound channel.
//! All lobby mutation happens behind one mutex, so requests from
//! different sockets are handled one at a time.

use crate::lobby::{ConnId, Lobby, Outbox};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures::{SinkExt, StreamExt};
use shared::{decode, encode, ClientMessage};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::net::TcpListener;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{error, info, warn};

/// Path the websocket endpoint is mounted on
pub const GAME_PATH: &str = "/game";

#[derive(Debug, Default)]
pub struct Hub {
    lobby: Lobby,
    peers: HashMap<ConnId, UnboundedSender<String>>,
    next_conn: ConnId,
}

impl Hub {
    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    fn register(&mut self, tx: UnboundedSender<String>) -> ConnId {
        self.next_conn += 1;
        let conn = self.next_conn;
        self.peers.insert(conn, tx);
        self.lobby.connect(conn);
        conn
    }

    fn receive(&mut self, conn: ConnId, text: &str) {
        let msg = match decode::<ClientMessage>(text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("[SERVER] Discarding frame from {}: {}", conn, e);
                return;
            }
        };
        match self.lobby.handle(conn, msg) {
            Ok(out) => self.deliver(out),
            Err(e) => warn!("[LOBBY] Rejected request from {}: {}", conn, e),
        }
    }

    fn unregister(&mut self, conn: ConnId) {
        self.peers.remove(&conn);
        let out = self.lobby.disconnect(conn);
        self.deliver(out);
    }

    fn deliver(&self, out: Outbox) {
        for (conn, msg) in out {
            let text = match encode(&msg) {
                Ok(text) => text,
                Err(e) => {
                    error!("[SERVER] Failed to encode message for {}: {}", conn, e);
                    continue;
                }
            };
            if let Some(tx) = self.peers.get(&conn) {
                let _ = tx.send(text);
            }
        }
    }
}

pub type SharedHub = Arc<Mutex<Hub>>;

fn lock(hub: &SharedHub) -> MutexGuard<'_, Hub> {
    hub.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn router(hub: SharedHub) -> Router {
    Router::new()
        .route(GAME_PATH, get(ws_handler))
        .with_state(hub)
}

/// Serve the lobby on an already bound listener until it fails
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("[SERVER] Lobby listening on ws://{}{}", addr, GAME_PATH);
    }
    axum::serve(listener, router(SharedHub::default())).await
}

async fn ws_handler(State(hub): State<SharedHub>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(hub, socket))
}

async fn handle_socket(hub: SharedHub, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let conn = lock(&hub).register(tx);

    // Ends once the hub drops the sender or the socket stops accepting
    tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    while let Some(Ok(msg)) = ws_rx.next().await {
        match msg {
            Message::Text(text) => {
                lock(&hub).receive(conn, text.as_str());
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!("[SERVER] Connection {} closed", conn);
    lock(&hub).unregister(conn);
}
