//! Game model - one running game as mirrored by this client
//!
//! # Module Organization
//!
//! - `piece` - piece records and kinds
//! - `board` - the 8x8 grid and its single mutation path
//! - `perspective` - absolute <-> player view coordinates
//! - `turn` - the turn gate
//! - `captured` - capture bookkeeping
//! - `selection` - pending selection owned by input handlers
//!
//! [`Game`] ties a board, a turn gate and the capture record to the
//! party and colour the server assigned. It exists only while the
//! session is playing; dropping it discards the board.

pub mod board;
pub mod captured;
pub mod perspective;
pub mod piece;
pub mod selection;
pub mod turn;

pub use board::{Board, BoardError, BoardResult, MoveOutcome};
pub use captured::CapturedPieces;
pub use piece::{Piece, PieceId, PieceKind};
pub use selection::{ClickOutcome, Selection};
pub use turn::TurnGate;

use shared::{Color, Move, MoveRequest, PartyId, Square};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Game {
    party: PartyId,
    color: Color,
    board: Board,
    turn: TurnGate,
    captured: CapturedPieces,
}

impl Game {
    /// Fresh game in the opening layout
    pub fn new(party: PartyId, color: Color) -> Self {
        Self {
            party,
            color,
            board: Board::new(),
            turn: TurnGate::new(color),
            captured: CapturedPieces::default(),
        }
    }

    pub fn party(&self) -> PartyId {
        self.party
    }

    /// Colour this client plays
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> &TurnGate {
        &self.turn
    }

    pub fn captured(&self) -> &CapturedPieces {
        &self.captured
    }

    /// Whether `square` holds one of this client's pieces
    pub fn owns(&self, square: Square) -> bool {
        self.board
            .piece_at(square)
            .is_some_and(|piece| piece.color == self.color)
    }

    /// Turn a local move attempt into a request for the server
    ///
    /// Returns `None`, changing nothing, when the gate is closed, the
    /// source is not one of our pieces or the move goes nowhere. On
    /// success the gate is locked until the server's update arrives.
    pub fn propose(&mut self, from: Square, to: Square) -> Option<MoveRequest> {
        if !self.turn.accepts_input() {
            debug!("[GAME] Ignoring move {} -> {}: input locked", from, to);
            return None;
        }
        if !self.owns(from) || from == to {
            debug!("[GAME] Ignoring move {} -> {}: not a move of ours", from, to);
            return None;
        }

        self.turn.lock();
        Some(MoveRequest {
            party_id: self.party,
            from,
            to,
        })
    }

    /// Apply a move the server reported, then hand the turn over
    pub fn apply(&mut self, mv: Move) -> BoardResult<MoveOutcome> {
        let outcome = self.board.apply_move(mv)?;
        if let Some(victim) = &outcome.captured {
            self.captured.record(victim, outcome.mover.color);
        }
        self.turn.on_move_applied();
        Ok(outcome)
    }
}
