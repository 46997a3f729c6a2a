//! Capture bookkeeping
//!
//! Every piece the board removes on a move is recorded here, credited to
//! the side that took it, so a front end can show the taken pieces and
//! the material balance.
//!
//! # Material Values
//!
//! - Pawn: 1
//! - Knight/Bishop: 3
//! - Rook: 5
//! - Queen: 9
//! - King: 0
//!
//! Positive balance means light is ahead, negative means dark is ahead.

use super::piece::{Piece, PieceKind};
use shared::Color;

/// Pieces taken by each side, in capture order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedPieces {
    /// Pieces light has taken
    by_light: Vec<PieceKind>,
    /// Pieces dark has taken
    by_dark: Vec<PieceKind>,
}

impl CapturedPieces {
    /// Credit a captured piece to the side that moved onto it
    pub fn record(&mut self, victim: &Piece, by: Color) {
        match by {
            Color::Light => self.by_light.push(victim.kind),
            Color::Dark => self.by_dark.push(victim.kind),
        }
    }

    /// Kinds `color` has taken from the other side
    pub fn taken_by(&self, color: Color) -> &[PieceKind] {
        match color {
            Color::Light => &self.by_light,
            Color::Dark => &self.by_dark,
        }
    }

    pub fn total(&self) -> usize {
        self.by_light.len() + self.by_dark.len()
    }

    /// Material difference in pawn units, light minus dark
    pub fn material_balance(&self) -> i32 {
        let light: i32 = self.by_light.iter().copied().map(piece_value).sum();
        let dark: i32 = self.by_dark.iter().copied().map(piece_value).sum();
        light - dark
    }

    pub fn clear(&mut self) {
        self.by_light.clear();
        self.by_dark.clear();
    }
}

fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 1,
        PieceKind::Knight => 3,
        PieceKind::Bishop => 3,
        PieceKind::Rook => 5,
        PieceKind::Queen => 9,
        PieceKind::King => 0,
    }
}
