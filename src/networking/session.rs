//! Session state machine
//!
//! Tracks where the player is in matchmaking and owns the running
//! [`Game`] while one is in progress.
//!
//! ```text
//!   Idle ──request_parties──▶ Searching ──create_party──▶ Waiting(None)
//!    │                          ▲   │                        │ party-created
//!    │ create_party             │   │ game-started           ▼
//!    └──────────────────────────┼───┼──────────────────▶ Waiting(Some(id))
//!                               │   ▼                        │
//!             game-broken ◀── Playing(game) ◀──game-started──┘
//!             cancel_wait ──▶ Searching
//! ```
//!
//! Transitions only happen on inbound messages or explicit user intent.
//! Anything that does not fit the current state is logged and ignored.

use crate::game::Game;
use shared::{ClientMessage, GameStart, Move, PartyId, Square};
use std::fmt;
use tracing::{debug, error, info, warn};

/// Observable part of the state, without the game it may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Idle,
    Searching,
    Waiting,
    Playing,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Searching => "searching",
            SessionPhase::Waiting => "waiting",
            SessionPhase::Playing => "playing",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Idle,
    /// Browsing the open-party roster
    Searching,
    /// Created a party; the id arrives with the server's confirmation
    Waiting(Option<PartyId>),
    Playing(Box<Game>),
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::Searching => SessionPhase::Searching,
            SessionState::Waiting(_) => SessionPhase::Waiting,
            SessionState::Playing(_) => SessionPhase::Playing,
        }
    }
}

/// What the presentation layer should refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientChange {
    Roster,
    Session,
    Board,
    Turn,
}

/// Messages to send and changes to announce, gathered while handling one event
#[derive(Debug, Default)]
pub struct Effects {
    pub outbound: Vec<ClientMessage>,
    pub changes: Vec<ClientChange>,
}

impl Effects {
    pub fn emit(&mut self, msg: ClientMessage) {
        self.outbound.push(msg);
    }

    /// Record a change once, keeping first-occurrence order
    pub fn changed(&mut self, change: ClientChange) {
        if !self.changes.contains(&change) {
            self.changes.push(change);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outbound.is_empty() && self.changes.is_empty()
    }
}

/// Joinable parties in the order they were announced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    parties: Vec<PartyId>,
}

impl Roster {
    pub fn parties(&self) -> &[PartyId] {
        &self.parties
    }

    pub fn contains(&self, party: PartyId) -> bool {
        self.parties.contains(&party)
    }

    pub fn len(&self) -> usize {
        self.parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }

    /// Replace the whole roster; duplicates in the snapshot are dropped
    pub fn replace(&mut self, parties: Vec<PartyId>) {
        self.parties.clear();
        for party in parties {
            self.add(party);
        }
    }

    /// Returns false when the party was already listed
    pub fn add(&mut self, party: PartyId) -> bool {
        if self.contains(party) {
            return false;
        }
        self.parties.push(party);
        true
    }

    /// Returns false when the party was not listed
    pub fn remove(&mut self, party: PartyId) -> bool {
        let before = self.parties.len();
        self.parties.retain(|listed| *listed != party);
        self.parties.len() != before
    }

    fn clear(&mut self) -> bool {
        let had_entries = !self.parties.is_empty();
        self.parties.clear();
        had_entries
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    roster: Roster,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn game(&self) -> Option<&Game> {
        match &self.state {
            SessionState::Playing(game) => Some(game),
            _ => None,
        }
    }

    /// Party created by this client, once the server confirmed it
    pub fn waiting_party(&self) -> Option<PartyId> {
        match self.state {
            SessionState::Waiting(party) => party,
            _ => None,
        }
    }

    fn enter(&mut self, state: SessionState, fx: &mut Effects) {
        let was_playing = matches!(self.state, SessionState::Playing(_));
        info!("[SESSION] {} -> {}", self.state.phase(), state.phase());
        self.state = state;
        fx.changed(ClientChange::Session);
        if was_playing || matches!(self.state, SessionState::Playing(_)) {
            fx.changed(ClientChange::Board);
            fx.changed(ClientChange::Turn);
        }
    }

    fn clear_roster(&mut self, fx: &mut Effects) {
        if self.roster.clear() {
            fx.changed(ClientChange::Roster);
        }
    }

    fn ignore(&self, what: &str) {
        warn!("[SESSION] Ignoring {} while {}", what, self.phase());
    }

    // ------------------------------------------------------------------
    // User intent
    // ------------------------------------------------------------------

    /// Show the roster (or refresh it when already searching)
    pub fn request_parties(&mut self, fx: &mut Effects) {
        match self.state {
            SessionState::Idle => self.enter(SessionState::Searching, fx),
            SessionState::Searching => {}
            _ => return self.ignore("party list request"),
        }
        fx.emit(ClientMessage::ListRequest);
    }

    pub fn create_party(&mut self, fx: &mut Effects) {
        match self.state {
            SessionState::Idle | SessionState::Searching => {
                fx.emit(ClientMessage::NewParty);
                self.clear_roster(fx);
                self.enter(SessionState::Waiting(None), fx);
            }
            _ => self.ignore("party creation"),
        }
    }

    pub fn join_party(&mut self, party: PartyId, fx: &mut Effects) {
        match self.state {
            SessionState::Searching => {
                if !self.roster.contains(party) {
                    debug!("[SESSION] Joining party {} not in roster", party);
                }
                fx.emit(ClientMessage::JoinParty(party));
            }
            _ => self.ignore("join request"),
        }
    }

    /// Abandon our party and go back to the roster
    pub fn cancel_wait(&mut self, fx: &mut Effects) {
        match self.state {
            SessionState::Waiting(_) => {
                fx.emit(ClientMessage::CancelWait);
                self.enter(SessionState::Searching, fx);
                fx.emit(ClientMessage::ListRequest);
            }
            _ => self.ignore("cancel"),
        }
    }

    /// Local move proposal in absolute squares; silently dropped when gated
    pub fn submit_move(&mut self, from: Square, to: Square, fx: &mut Effects) {
        let SessionState::Playing(game) = &mut self.state else {
            debug!("[SESSION] Dropping move {} -> {} while {}", from, to, self.phase());
            return;
        };
        if let Some(request) = game.propose(from, to) {
            fx.emit(ClientMessage::Move(request));
            fx.changed(ClientChange::Turn);
        }
    }

    // ------------------------------------------------------------------
    // Inbound messages
    // ------------------------------------------------------------------

    pub fn on_party_list(&mut self, parties: Vec<PartyId>, fx: &mut Effects) {
        match self.state {
            SessionState::Searching => {
                self.roster.replace(parties);
                fx.changed(ClientChange::Roster);
            }
            _ => self.ignore("party-list-snapshot"),
        }
    }

    pub fn on_party_created(&mut self, party: PartyId, fx: &mut Effects) {
        match self.state {
            SessionState::Waiting(None) => {
                info!("[SESSION] Party {} created, waiting for a partner", party);
                self.state = SessionState::Waiting(Some(party));
                fx.changed(ClientChange::Session);
            }
            _ => self.ignore("party-created"),
        }
    }

    pub fn on_player_joined(&mut self, party: PartyId, fx: &mut Effects) {
        match self.state {
            SessionState::Searching => {
                if self.roster.add(party) {
                    fx.changed(ClientChange::Roster);
                }
            }
            _ => self.ignore("player-joined"),
        }
    }

    pub fn on_player_left(&mut self, party: PartyId, fx: &mut Effects) {
        match self.state {
            SessionState::Searching => {
                if self.roster.remove(party) {
                    fx.changed(ClientChange::Roster);
                }
            }
            _ => self.ignore("player-left"),
        }
    }

    pub fn on_game_started(&mut self, start: GameStart, fx: &mut Effects) {
        match self.state {
            SessionState::Playing(_) => self.ignore("game-started"),
            SessionState::Waiting(Some(ours)) if ours != start.party_id => {
                warn!(
                    "[SESSION] Game started in party {} while waiting in {}",
                    start.party_id, ours
                );
                self.start_game(start, fx);
            }
            _ => self.start_game(start, fx),
        }
    }

    fn start_game(&mut self, start: GameStart, fx: &mut Effects) {
        info!(
            "[SESSION] Game started in party {}, playing {}",
            start.party_id, start.color
        );
        self.clear_roster(fx);
        self.enter(
            SessionState::Playing(Box::new(Game::new(start.party_id, start.color))),
            fx,
        );
    }

    /// Apply the server's board update to the running game
    pub fn on_move_applied(&mut self, mv: Move, fx: &mut Effects) {
        let SessionState::Playing(game) = &mut self.state else {
            return self.ignore("move-applied");
        };
        match game.apply(mv) {
            Ok(_) => {
                fx.changed(ClientChange::Board);
                fx.changed(ClientChange::Turn);
            }
            Err(e) => error!("[SESSION] Server sent unplayable move {}: {}", mv, e),
        }
    }

    pub fn on_game_broken(&mut self, fx: &mut Effects) {
        match self.state {
            SessionState::Playing(_) => {
                info!("[SESSION] Game broken by the other side");
                self.enter(SessionState::Searching, fx);
                fx.emit(ClientMessage::ListRequest);
            }
            _ => self.ignore("game-broken"),
        }
    }

    /// Channel went away: everything is stale
    pub fn on_channel_closed(&mut self, fx: &mut Effects) {
        self.clear_roster(fx);
        if !matches!(self.state, SessionState::Idle) {
            self.enter(SessionState::Idle, fx);
        }
    }
}
