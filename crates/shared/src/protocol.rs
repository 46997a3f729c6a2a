use crate::types::{Color, Move, PartyId, Square};
use serde::{Deserialize, Serialize};

/// Payload of a move proposal sent by the player whose turn it is
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRequest {
    pub party_id: PartyId,
    pub from: Square,
    pub to: Square,
}

impl MoveRequest {
    pub fn as_move(&self) -> Move {
        Move::new(self.from, self.to)
    }
}

/// Payload of `game-started`: which party and which side this client plays
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameStart {
    pub party_id: PartyId,
    pub color: Color,
}

/// Messages a client sends to the lobby server
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Ask for the current open-party roster
    ListRequest,
    /// Open a new party and wait for a partner
    NewParty,
    /// Abandon the party this client created
    CancelWait,
    /// Join a party someone else opened
    JoinParty(PartyId),
    Move(MoveRequest),
}

/// Messages the lobby server sends to a client
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Full roster replace
    PartyListSnapshot(Vec<PartyId>),
    /// Confirms the party this client asked to create
    PartyCreated(PartyId),
    /// A party became joinable
    PlayerJoined(PartyId),
    /// A party stopped being joinable
    PlayerLeft(PartyId),
    GameStarted(GameStart),
    /// A move the server accepted, broadcast to both players
    MoveApplied(Move),
    /// The partner disconnected; the game is over
    GameBroken,
}

/// Tag vocabulary of a message family
///
/// Every serialized message carries one of these strings in its `type`
/// field. The codec uses the list to tell an unknown tag apart from a
/// known tag with a bad payload.
pub trait WireMessage: Serialize + for<'de> Deserialize<'de> {
    const KINDS: &'static [&'static str];

    fn kind(&self) -> &'static str;
}

impl WireMessage for ClientMessage {
    const KINDS: &'static [&'static str] = &[
        "list-request",
        "new-party",
        "cancel-wait",
        "join-party",
        "move",
    ];

    fn kind(&self) -> &'static str {
        match self {
            ClientMessage::ListRequest => "list-request",
            ClientMessage::NewParty => "new-party",
            ClientMessage::CancelWait => "cancel-wait",
            ClientMessage::JoinParty(_) => "join-party",
            ClientMessage::Move(_) => "move",
        }
    }
}

impl WireMessage for ServerMessage {
    const KINDS: &'static [&'static str] = &[
        "party-list-snapshot",
        "party-created",
        "player-joined",
        "player-left",
        "game-started",
        "move-applied",
        "game-broken",
    ];

    fn kind(&self) -> &'static str {
        match self {
            ServerMessage::PartyListSnapshot(_) => "party-list-snapshot",
            ServerMessage::PartyCreated(_) => "party-created",
            ServerMessage::PlayerJoined(_) => "player-joined",
            ServerMessage::PlayerLeft(_) => "player-left",
            ServerMessage::GameStarted(_) => "game-started",
            ServerMessage::MoveApplied(_) => "move-applied",
            ServerMessage::GameBroken => "game-broken",
        }
    }
}
