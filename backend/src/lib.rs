//! Lobby server for partychess
//!
//! - `lobby` - matchmaking and move relay, no I/O
//! - `server` - axum websocket endpoint driving the lobby

pub mod lobby;
pub mod server;

pub use lobby::{ConnId, Lobby, LobbyError, LobbyResult, Outbox, PlayerState};
pub use server::{router, serve, Hub, SharedHub, GAME_PATH};
