//! Board and party vocabulary shared by the client and the lobby server
//!
//! All coordinates here are *absolute*: file 0 is the light queen-side
//! edge and rank 0 is the light back rank. Player perspective is a
//! presentation concern handled by the client.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height of the board
pub const BOARD_SIZE: u8 = 8;

/// Opaque identifier of a matchmaking party, assigned by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(pub u64);

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Side a player sits on. Light always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Back rank of this colour's pieces in the opening layout
    pub fn home_rank(self) -> u8 {
        match self {
            Color::Light => 0,
            Color::Dark => BOARD_SIZE - 1,
        }
    }

    /// Rank this colour's pawns start on
    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::Light => 1,
            Color::Dark => BOARD_SIZE - 2,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Light => f.write_str("light"),
            Color::Dark => f.write_str("dark"),
        }
    }
}

/// Error returned when a coordinate falls outside the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("square ({file}, {rank}) is outside the 8x8 board")]
pub struct OutOfBoard {
    pub file: u8,
    pub rank: u8,
}

/// Absolute board square
///
/// Both coordinates are guaranteed to be in `0..8`. On the wire a square
/// is a two element array `[file, rank]`; out-of-range values fail to
/// decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Build a square, rejecting coordinates outside the board
    pub fn new(file: u8, rank: u8) -> Result<Self, OutOfBoard> {
        if file < BOARD_SIZE && rank < BOARD_SIZE {
            Ok(Self { file, rank })
        } else {
            Err(OutOfBoard { file, rank })
        }
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    /// Every square on the board, file-major
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|file| (0..BOARD_SIZE).map(move |rank| Square { file, rank }))
    }
}

impl TryFrom<(u8, u8)> for Square {
    type Error = OutOfBoard;

    fn try_from((file, rank): (u8, u8)) -> Result<Self, Self::Error> {
        Square::new(file, rank)
    }
}

impl From<Square> for (u8, u8) {
    fn from(square: Square) -> Self {
        (square.file, square.rank)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.file, self.rank)
    }
}

/// A positional move as executed by the board: source and destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_bounds() {
        assert!(Square::new(0, 0).is_ok());
        assert!(Square::new(7, 7).is_ok());
        assert_eq!(Square::new(8, 0), Err(OutOfBoard { file: 8, rank: 0 }));
        assert_eq!(Square::new(3, 9), Err(OutOfBoard { file: 3, rank: 9 }));
    }

    #[test]
    fn test_all_squares_cover_board_once() {
        let squares: Vec<Square> = Square::all().collect();
        assert_eq!(squares.len(), 64);
        let mut deduped = squares.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 64);
    }

    #[test]
    fn test_color_helpers() {
        assert_eq!(Color::Light.opponent(), Color::Dark);
        assert_eq!(Color::Dark.opponent(), Color::Light);
        assert_eq!(Color::Light.home_rank(), 0);
        assert_eq!(Color::Dark.home_rank(), 7);
        assert_eq!(Color::Light.pawn_rank(), 1);
        assert_eq!(Color::Dark.pawn_rank(), 6);
    }

    #[test]
    fn test_square_wire_shape() {
        let square = Square::new(4, 1).unwrap();
        assert_eq!(serde_json::to_string(&square).unwrap(), "[4,1]");

        let decoded: Square = serde_json::from_str("[6,7]").unwrap();
        assert_eq!(decoded, Square::new(6, 7).unwrap());

        assert!(serde_json::from_str::<Square>("[8,0]").is_err());
    }
}
