//! Pending selection for click-driven move entry
//!
//! Owned by whatever handles input, never by the board. A click either
//! picks one of our pieces, re-picks another, or completes a move from
//! the picked piece to the clicked square. The selection is dropped on
//! every completed or abandoned attempt.

use super::perspective;
use super::piece::PieceId;
use super::Game;
use shared::Square;

/// Result of feeding one click into a [`Selection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing to do: input locked, or an empty/foreign square with nothing picked
    Ignored,
    /// One of our pieces is now picked
    Selected(PieceId),
    /// A move was completed; squares are absolute
    Proposed { from: Square, to: Square },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    piece: Option<PieceId>,
}

impl Selection {
    pub fn selected(&self) -> Option<PieceId> {
        self.piece
    }

    pub fn is_selected(&self) -> bool {
        self.piece.is_some()
    }

    pub fn clear(&mut self) {
        self.piece = None;
    }

    /// Handle a click on `view_square`, given in the player's view
    pub fn click(&mut self, view_square: Square, game: &Game) -> ClickOutcome {
        if !game.turn().accepts_input() {
            self.clear();
            return ClickOutcome::Ignored;
        }

        let target = perspective::to_absolute(view_square, game.color());
        let own_piece = game
            .board()
            .piece_at(target)
            .filter(|piece| piece.color == game.color());

        if let Some(piece) = own_piece {
            self.piece = Some(piece.id);
            return ClickOutcome::Selected(piece.id);
        }

        let source = self
            .piece
            .take()
            .and_then(|id| game.board().find(id))
            .map(|piece| piece.square);

        match source {
            Some(from) => ClickOutcome::Proposed { from, to: target },
            None => ClickOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Color, Move, PartyId};

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).unwrap()
    }

    fn view(square: Square, color: Color) -> Square {
        perspective::to_local(square, color)
    }

    #[test]
    fn test_select_then_propose() {
        let game = Game::new(PartyId(1), Color::Light);
        let mut selection = Selection::default();

        let picked = selection.click(view(sq(4, 1), Color::Light), &game);
        assert!(matches!(picked, ClickOutcome::Selected(_)));
        assert!(selection.is_selected());

        let outcome = selection.click(view(sq(4, 3), Color::Light), &game);
        assert_eq!(
            outcome,
            ClickOutcome::Proposed {
                from: sq(4, 1),
                to: sq(4, 3)
            }
        );
        assert!(!selection.is_selected());
    }

    #[test]
    fn test_reselect_own_piece() {
        let game = Game::new(PartyId(1), Color::Light);
        let mut selection = Selection::default();

        selection.click(view(sq(4, 1), Color::Light), &game);
        let outcome = selection.click(view(sq(6, 0), Color::Light), &game);

        let knight = game.board().piece_at(sq(6, 0)).unwrap().id;
        assert_eq!(outcome, ClickOutcome::Selected(knight));
        assert_eq!(selection.selected(), Some(knight));
    }

    #[test]
    fn test_foreign_piece_without_selection_ignored() {
        let game = Game::new(PartyId(1), Color::Light);
        let mut selection = Selection::default();

        let outcome = selection.click(view(sq(4, 6), Color::Light), &game);
        assert_eq!(outcome, ClickOutcome::Ignored);
        assert!(!selection.is_selected());
    }

    #[test]
    fn test_capture_click_proposes() {
        let mut game = Game::new(PartyId(1), Color::Dark);
        // Light opens so it is dark's turn
        game.apply(Move::new(sq(4, 1), sq(4, 3))).unwrap();
        let mut selection = Selection::default();

        selection.click(view(sq(3, 6), Color::Dark), &game);
        let outcome = selection.click(view(sq(4, 3), Color::Dark), &game);

        assert_eq!(
            outcome,
            ClickOutcome::Proposed {
                from: sq(3, 6),
                to: sq(4, 3)
            }
        );
    }

    #[test]
    fn test_locked_gate_clears_selection() {
        let mut game = Game::new(PartyId(1), Color::Light);
        let mut selection = Selection::default();
        selection.click(view(sq(4, 1), Color::Light), &game);

        game.propose(sq(3, 1), sq(3, 3)).unwrap();
        let outcome = selection.click(view(sq(4, 3), Color::Light), &game);

        assert_eq!(outcome, ClickOutcome::Ignored);
        assert!(!selection.is_selected());
    }
}
