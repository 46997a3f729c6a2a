//! Message router
//!
//! Single entry point for everything that can happen to the client:
//! transport events and user intents go in, encoded outbound messages
//! and a list of changed areas come out. Malformed or unexpected input
//! is logged and dropped; nothing here panics on remote data.

use super::session::{ClientChange, Effects, Roster, Session, SessionPhase, SessionState};
use crate::game::{Board, Game, TurnGate};
use shared::{decode, encode, ClientMessage, PartyId, ServerMessage, Square, WireMessage};
use tracing::{debug, error, info, warn};

/// Lifecycle of the channel to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    /// One text frame from the server
    Received(String),
    Closed,
}

/// Things the player asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserIntent {
    ShowParties,
    CreateParty,
    JoinParty(PartyId),
    CancelWait,
    /// Squares are absolute board coordinates
    SubmitMove { from: Square, to: Square },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientInput {
    Transport(TransportEvent),
    Intent(UserIntent),
}

impl From<TransportEvent> for ClientInput {
    fn from(event: TransportEvent) -> Self {
        ClientInput::Transport(event)
    }
}

impl From<UserIntent> for ClientInput {
    fn from(intent: UserIntent) -> Self {
        ClientInput::Intent(intent)
    }
}

/// What handling one input produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    /// Encoded frames, in send order
    pub outbound: Vec<String>,
    /// Areas to refresh, each at most once
    pub changes: Vec<ClientChange>,
}

impl Reaction {
    pub fn is_empty(&self) -> bool {
        self.outbound.is_empty() && self.changes.is_empty()
    }

    pub fn has_change(&self, change: ClientChange) -> bool {
        self.changes.contains(&change)
    }
}

/// Client context: owns the session and routes every input through it
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    session: Session,
}

impl ClientContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, input: ClientInput) -> Reaction {
        match input {
            ClientInput::Transport(event) => self.handle_transport(event),
            ClientInput::Intent(intent) => self.handle_intent(intent),
        }
    }

    pub fn handle_transport(&mut self, event: TransportEvent) -> Reaction {
        let mut fx = Effects::default();
        match event {
            TransportEvent::Opened => info!("[ROUTER] Channel open"),
            TransportEvent::Received(text) => self.route(&text, &mut fx),
            TransportEvent::Closed => {
                warn!("[ROUTER] Channel closed");
                self.session.on_channel_closed(&mut fx);
            }
        }
        finish(fx)
    }

    pub fn handle_intent(&mut self, intent: UserIntent) -> Reaction {
        debug!("[ROUTER] Intent {:?}", intent);
        let mut fx = Effects::default();
        match intent {
            UserIntent::ShowParties => self.session.request_parties(&mut fx),
            UserIntent::CreateParty => self.session.create_party(&mut fx),
            UserIntent::JoinParty(party) => self.session.join_party(party, &mut fx),
            UserIntent::CancelWait => self.session.cancel_wait(&mut fx),
            UserIntent::SubmitMove { from, to } => self.session.submit_move(from, to, &mut fx),
        }
        finish(fx)
    }

    pub fn request_parties(&mut self) -> Reaction {
        self.handle_intent(UserIntent::ShowParties)
    }

    pub fn create_party(&mut self) -> Reaction {
        self.handle_intent(UserIntent::CreateParty)
    }

    pub fn join_party(&mut self, party: PartyId) -> Reaction {
        self.handle_intent(UserIntent::JoinParty(party))
    }

    pub fn cancel_wait(&mut self) -> Reaction {
        self.handle_intent(UserIntent::CancelWait)
    }

    /// Propose a move in absolute squares
    pub fn submit_move(&mut self, from: Square, to: Square) -> Reaction {
        self.handle_intent(UserIntent::SubmitMove { from, to })
    }

    /// Decode one inbound frame and dispatch it by kind
    fn route(&mut self, text: &str, fx: &mut Effects) {
        let msg = match decode::<ServerMessage>(text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("[ROUTER] Discarding inbound frame: {}", e);
                return;
            }
        };
        debug!("[ROUTER] <- {}", msg.kind());

        match msg {
            ServerMessage::PartyListSnapshot(parties) => self.session.on_party_list(parties, fx),
            ServerMessage::PartyCreated(party) => self.session.on_party_created(party, fx),
            ServerMessage::PlayerJoined(party) => self.session.on_player_joined(party, fx),
            ServerMessage::PlayerLeft(party) => self.session.on_player_left(party, fx),
            ServerMessage::GameStarted(start) => self.session.on_game_started(start, fx),
            ServerMessage::MoveApplied(mv) => self.session.on_move_applied(mv, fx),
            ServerMessage::GameBroken => self.session.on_game_broken(fx),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn roster(&self) -> &Roster {
        self.session.roster()
    }

    pub fn game(&self) -> Option<&Game> {
        self.session.game()
    }

    pub fn board(&self) -> Option<&Board> {
        self.game().map(Game::board)
    }

    pub fn turn(&self) -> Option<&TurnGate> {
        self.game().map(Game::turn)
    }
}

fn finish(fx: Effects) -> Reaction {
    let outbound = fx
        .outbound
        .iter()
        .filter_map(|msg| match encode::<ClientMessage>(msg) {
            Ok(text) => {
                debug!("[ROUTER] -> {}", msg.kind());
                Some(text)
            }
            Err(e) => {
                error!("[ROUTER] Failed to encode {}: {}", msg.kind(), e);
                None
            }
        })
        .collect();

    Reaction {
        outbound,
        changes: fx.changes,
    }
}
