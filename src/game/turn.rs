//! Turn gate
//!
//! Restricts local move submission to the player's own turn. The gate
//! only changes on three occasions:
//!
//! ```text
//! game start       is_local_turn = (color == light), input_accepted = is_local_turn
//! local move sent  input_accepted = false
//! move applied     is_local_turn = !is_local_turn, input_accepted = is_local_turn
//! ```
//!
//! The lock taken when a move is sent is only released by the server's
//! board update, so a second click cannot submit two moves for one turn.

use shared::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnGate {
    is_local_turn: bool,
    input_accepted: bool,
    /// Moves applied since the game started
    moves_applied: u32,
}

impl TurnGate {
    /// Gate for a game where this client plays `color`; light moves first
    pub fn new(color: Color) -> Self {
        let is_local_turn = color == Color::Light;
        Self {
            is_local_turn,
            input_accepted: is_local_turn,
            moves_applied: 0,
        }
    }

    pub fn is_local_turn(&self) -> bool {
        self.is_local_turn
    }

    pub fn accepts_input(&self) -> bool {
        self.input_accepted
    }

    pub fn moves_applied(&self) -> u32 {
        self.moves_applied
    }

    /// Close the gate after a local move was sent
    pub fn lock(&mut self) {
        self.input_accepted = false;
    }

    /// A move was applied to the board, whoever made it
    pub fn on_move_applied(&mut self) {
        self.is_local_turn = !self.is_local_turn;
        self.input_accepted = self.is_local_turn;
        self.moves_applied += 1;
    }
}
