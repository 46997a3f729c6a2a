//! Player perspective transform
//!
//! Both players see their own pieces along the bottom edge of their view.
//! View coordinates are `(column, row)` with row 0 at the top. Light
//! flips the rank axis, dark flips the file axis. The transform is its
//! own inverse, so the same function converts in both directions.

use shared::types::BOARD_SIZE;
use shared::{Color, Square};

const LAST: u8 = BOARD_SIZE - 1;

/// Absolute square to the square as seen by `color`
pub fn to_local(square: Square, color: Color) -> Square {
    let (file, rank) = match color {
        Color::Light => (square.file(), LAST - square.rank()),
        Color::Dark => (LAST - square.file(), square.rank()),
    };
    // Both coordinates stay in 0..8, so this never falls back.
    Square::new(file, rank).unwrap_or(square)
}

/// Square as seen by `color` back to the absolute square
pub fn to_absolute(square: Square, color: Color) -> Square {
    to_local(square, color)
}
