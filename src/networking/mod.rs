//! Networking: session state, message routing and the server link
//!
//! - `session` - matchmaking state machine and party roster
//! - `router` - [`ClientContext`], the single entry point for inputs
//! - `transport` - WebSocket link running on a tokio task
//! - `plugin` - bevy wiring (feature `bevy`)

pub mod router;
pub mod session;
pub mod transport;

#[cfg(feature = "bevy")]
pub mod plugin;

pub use router::{ClientContext, ClientInput, Reaction, TransportEvent, UserIntent};
pub use session::{ClientChange, Effects, Roster, Session, SessionPhase, SessionState};
pub use transport::{TransportError, TransportLink, TransportResult};

#[cfg(feature = "bevy")]
pub use plugin::{
    BoardClick, BoardSelection, PartyChanged, PartyClient, PartyClientPlugin, PartyInbound,
    PartyIntent, PartyOutbound, PartyTransport,
};
