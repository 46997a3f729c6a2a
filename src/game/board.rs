//! Board model - local mirror of the remote authority's board
//!
//! Holds an 8x8 grid of optional piece ids next to the set of active
//! pieces. The two are only ever changed together by [`Board::reset`],
//! [`Board::place`] and [`Board::apply_move`], so at rest:
//!
//! - every occupied cell refers to a piece whose `square` is that cell
//! - every active piece sits in exactly one cell
//!
//! Coordinates are absolute. No chess rules are known here: a move is
//! executed exactly as the server reported it.

use super::piece::{Piece, PieceId, PieceKind};
use shared::types::BOARD_SIZE;
use shared::{Color, Move, Square};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Back-rank order from file 0 to file 7
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Number of pieces in the opening layout
pub const OPENING_PIECE_COUNT: usize = 32;

/// Errors raised by board mutation; the board is unchanged when one is returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Move source holds no piece
    #[error("no piece at move source {0}")]
    EmptySource(Square),

    /// Source and destination are the same square
    #[error("move from {0} to itself")]
    NullMove(Square),

    /// Tried to place a piece on an occupied square
    #[error("square {0} is already occupied")]
    Occupied(Square),
}

/// Result type alias for board operations
pub type BoardResult<T> = Result<T, BoardError>;

/// What an applied move did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The moved piece, already at its destination
    pub mover: Piece,
    /// Piece removed from the destination, if any
    pub captured: Option<Piece>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Option<PieceId>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
    pieces: BTreeMap<PieceId, Piece>,
    next_id: u16,
}

impl Default for Board {
    fn default() -> Self {
        let mut board = Self::empty();
        board.reset();
        board
    }
}

impl Board {
    /// Board in the standard opening layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Board with no pieces at all
    pub fn empty() -> Self {
        Self {
            grid: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
            pieces: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Clear the board and lay out the 32 opening pieces
    pub fn reset(&mut self) {
        *self = Self::empty();

        for file in 0..BOARD_SIZE {
            self.spawn_pair(PieceKind::Pawn, file, true);
        }
        for (file, kind) in (0..BOARD_SIZE).zip(BACK_RANK) {
            self.spawn_pair(kind, file, false);
        }

        debug!("[BOARD] Reset to opening layout ({} pieces)", self.pieces.len());
    }

    fn spawn_pair(&mut self, kind: PieceKind, file: u8, pawn_row: bool) {
        for color in [Color::Light, Color::Dark] {
            let rank = if pawn_row {
                color.pawn_rank()
            } else {
                color.home_rank()
            };
            if let Ok(square) = Square::new(file, rank) {
                self.insert(kind, color, square);
            }
        }
    }

    fn insert(&mut self, kind: PieceKind, color: Color, square: Square) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        self.pieces.insert(
            id,
            Piece {
                id,
                kind,
                color,
                square,
            },
        );
        self.set_cell(square, Some(id));
        id
    }

    fn cell(&self, square: Square) -> Option<PieceId> {
        self.grid[square.file() as usize][square.rank() as usize]
    }

    fn set_cell(&mut self, square: Square, occupant: Option<PieceId>) {
        self.grid[square.file() as usize][square.rank() as usize] = occupant;
    }

    /// Occupant of a square, if any
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.cell(square).and_then(|id| self.pieces.get(&id))
    }

    /// Look a piece up by identity; `None` once it has been captured
    pub fn find(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    /// Active pieces in id order
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// Number of active pieces
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Put a new piece on an empty square
    pub fn place(&mut self, kind: PieceKind, color: Color, square: Square) -> BoardResult<PieceId> {
        if self.cell(square).is_some() {
            return Err(BoardError::Occupied(square));
        }
        Ok(self.insert(kind, color, square))
    }

    /// Execute a move as given, capturing whatever sits on the destination
    ///
    /// All checks happen before anything is touched, so an error leaves
    /// the board exactly as it was.
    pub fn apply_move(&mut self, mv: Move) -> BoardResult<MoveOutcome> {
        if mv.from == mv.to {
            return Err(BoardError::NullMove(mv.from));
        }
        let mover = self
            .cell(mv.from)
            .and_then(|id| self.pieces.get(&id))
            .copied()
            .ok_or(BoardError::EmptySource(mv.from))?;

        let captured = self.cell(mv.to).and_then(|id| self.pieces.remove(&id));
        self.set_cell(mv.from, None);
        self.set_cell(mv.to, Some(mover.id));

        let mover = Piece {
            square: mv.to,
            ..mover
        };
        self.pieces.insert(mover.id, mover);

        match captured {
            Some(victim) => debug!("[BOARD] {} captured {}", mover, victim),
            None => debug!("[BOARD] {} moved from {}", mover, mv.from),
        }

        Ok(MoveOutcome { mover, captured })
    }

    /// Check the grid / piece-set lockstep
    pub fn is_consistent(&self) -> bool {
        let occupied = Square::all().filter(|square| self.cell(*square).is_some()).count();
        let cells_match = Square::all().all(|square| match self.cell(square) {
            Some(id) => self.pieces.get(&id).is_some_and(|piece| piece.square == square),
            None => true,
        });
        let pieces_placed = self
            .pieces
            .values()
            .all(|piece| self.cell(piece.square) == Some(piece.id));

        cells_match && pieces_placed && occupied == self.pieces.len()
    }
}
