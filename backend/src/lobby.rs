//! Lobby: matchmaking and turn-order relay
//!
//! Pure state, no I/O. Every call returns the messages to deliver as
//! `(connection, message)` pairs; the server module does the sending.
//!
//! A party is identified by the connection id of its creator. The
//! creator plays light and moves first, the joiner plays dark. The
//! lobby keeps its own board per game so a move naming an empty square
//! is rejected before it reaches either player.

use partychess::game::{Board, BoardError};
use shared::{ClientMessage, Color, GameStart, MoveRequest, PartyId, ServerMessage, WireMessage};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Server-side connection identifier
pub type ConnId = u64;

/// Messages to deliver, in order
pub type Outbox = Vec<(ConnId, ServerMessage)>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LobbyError {
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnId),

    #[error("{kind} is not allowed while {state}")]
    OutOfState {
        kind: &'static str,
        state: PlayerState,
    },

    #[error("party {0} is not open")]
    UnknownParty(PartyId),

    #[error("cannot join own party {0}")]
    OwnParty(PartyId),

    #[error("move names party {claimed} but the player is in party {actual}")]
    WrongParty { claimed: PartyId, actual: PartyId },

    #[error("move sent out of turn in party {0}")]
    OutOfTurn(PartyId),

    #[error("board rejected move: {0}")]
    Board(#[from] BoardError),
}

pub type LobbyResult<T> = Result<T, LobbyError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Searching,
    Waiting(PartyId),
    Playing(PartyId),
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerState::Searching => f.write_str("searching"),
            PlayerState::Waiting(party) => write!(f, "waiting in party {}", party),
            PlayerState::Playing(party) => write!(f, "playing in party {}", party),
        }
    }
}

#[derive(Debug, Clone)]
struct LobbyGame {
    light: ConnId,
    dark: ConnId,
    board: Board,
    to_move: Color,
}

impl LobbyGame {
    fn color_of(&self, conn: ConnId) -> Color {
        if conn == self.light {
            Color::Light
        } else {
            Color::Dark
        }
    }

    fn partner_of(&self, conn: ConnId) -> ConnId {
        if conn == self.light {
            self.dark
        } else {
            self.light
        }
    }
}

#[derive(Debug, Default)]
pub struct Lobby {
    players: BTreeMap<ConnId, PlayerState>,
    /// Open parties in creation order
    open: Vec<PartyId>,
    games: HashMap<PartyId, LobbyGame>,
}

impl Lobby {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_of(&self, conn: ConnId) -> Option<PlayerState> {
        self.players.get(&conn).copied()
    }

    pub fn open_parties(&self) -> &[PartyId] {
        &self.open
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Server copy of a running game's board
    pub fn board(&self, party: PartyId) -> Option<&Board> {
        self.games.get(&party).map(|game| &game.board)
    }

    /// New connection; it starts out searching and asks for the roster itself
    pub fn connect(&mut self, conn: ConnId) {
        info!("[LOBBY] Player {} connected", conn);
        self.players.insert(conn, PlayerState::Searching);
    }

    /// Connection went away; clean up and tell whoever is affected
    pub fn disconnect(&mut self, conn: ConnId) -> Outbox {
        let mut out = Outbox::new();
        match self.players.remove(&conn) {
            None => {}
            Some(PlayerState::Searching) => info!("[LOBBY] Player {} left", conn),
            Some(PlayerState::Waiting(party)) => {
                info!("[LOBBY] Player {} left, closing party {}", conn, party);
                self.close_party(party, &mut out);
            }
            Some(PlayerState::Playing(party)) => {
                if let Some(game) = self.games.remove(&party) {
                    let partner = game.partner_of(conn);
                    info!(
                        "[LOBBY] Player {} left party {}, partner {} back to search",
                        conn, party, partner
                    );
                    self.players.insert(partner, PlayerState::Searching);
                    out.push((partner, ServerMessage::GameBroken));
                }
            }
        }
        out
    }

    pub fn handle(&mut self, conn: ConnId, msg: ClientMessage) -> LobbyResult<Outbox> {
        let state = self
            .state_of(conn)
            .ok_or(LobbyError::UnknownConnection(conn))?;
        debug!("[LOBBY] {} from {} ({})", msg.kind(), conn, state);

        let mut out = Outbox::new();
        match (msg, state) {
            (ClientMessage::ListRequest, _) => {
                out.push((conn, ServerMessage::PartyListSnapshot(self.open.clone())));
            }
            (ClientMessage::NewParty, PlayerState::Searching) => {
                let party = PartyId(conn);
                self.players.insert(conn, PlayerState::Waiting(party));
                self.open.push(party);
                info!("[LOBBY] Player {} opened party {}", conn, party);

                out.push((conn, ServerMessage::PartyCreated(party)));
                self.broadcast_searchers(ServerMessage::PlayerJoined(party), &mut out);
            }
            (ClientMessage::CancelWait, PlayerState::Waiting(party)) => {
                self.players.insert(conn, PlayerState::Searching);
                info!("[LOBBY] Player {} cancelled party {}", conn, party);
                self.close_party(party, &mut out);
            }
            (ClientMessage::JoinParty(party), PlayerState::Searching) => {
                self.join(conn, party, &mut out)?;
            }
            (ClientMessage::Move(request), PlayerState::Playing(party)) => {
                self.relay_move(conn, party, request, &mut out)?;
            }
            (msg, state) => {
                return Err(LobbyError::OutOfState {
                    kind: msg.kind(),
                    state,
                })
            }
        }
        Ok(out)
    }

    fn join(&mut self, conn: ConnId, party: PartyId, out: &mut Outbox) -> LobbyResult<()> {
        if party == PartyId(conn) {
            return Err(LobbyError::OwnParty(party));
        }
        let creator = party.0;
        if !self.open.contains(&party)
            || self.state_of(creator) != Some(PlayerState::Waiting(party))
        {
            return Err(LobbyError::UnknownParty(party));
        }

        self.open.retain(|open| *open != party);
        self.players.insert(conn, PlayerState::Playing(party));
        self.players.insert(creator, PlayerState::Playing(party));
        self.games.insert(
            party,
            LobbyGame {
                light: creator,
                dark: conn,
                board: Board::new(),
                to_move: Color::Light,
            },
        );
        info!(
            "[LOBBY] Party {} started: {} light, {} dark",
            party, creator, conn
        );

        self.broadcast_searchers(ServerMessage::PlayerLeft(party), out);
        for (player, color) in [(creator, Color::Light), (conn, Color::Dark)] {
            out.push((
                player,
                ServerMessage::GameStarted(GameStart {
                    party_id: party,
                    color,
                }),
            ));
        }
        Ok(())
    }

    fn relay_move(
        &mut self,
        conn: ConnId,
        party: PartyId,
        request: MoveRequest,
        out: &mut Outbox,
    ) -> LobbyResult<()> {
        if request.party_id != party {
            return Err(LobbyError::WrongParty {
                claimed: request.party_id,
                actual: party,
            });
        }
        let game = self
            .games
            .get_mut(&party)
            .ok_or(LobbyError::UnknownParty(party))?;
        if game.color_of(conn) != game.to_move {
            return Err(LobbyError::OutOfTurn(party));
        }

        let mv = request.as_move();
        game.board.apply_move(mv)?;
        game.to_move = game.to_move.opponent();
        debug!("[LOBBY] Party {}: {}", party, mv);

        out.push((game.light, ServerMessage::MoveApplied(mv)));
        out.push((game.dark, ServerMessage::MoveApplied(mv)));
        Ok(())
    }

    fn close_party(&mut self, party: PartyId, out: &mut Outbox) {
        self.open.retain(|open| *open != party);
        self.broadcast_searchers(ServerMessage::PlayerLeft(party), out);
    }

    fn broadcast_searchers(&self, msg: ServerMessage, out: &mut Outbox) {
        for (conn, state) in &self.players {
            if *state == PlayerState::Searching {
                out.push((*conn, msg.clone()));
            }
        }
    }
}
