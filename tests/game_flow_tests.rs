//! Game Flow Integration Tests
//!
//! Drives a [`ClientContext`] with raw server frames and user intents:
//! - Opening position after a game starts
//! - Local moves, server updates and turn alternation
//! - Captures
//! - Game broken by the partner
//! - Input gating and out-of-state messages

use partychess::game::{perspective, PieceKind};
use partychess::networking::{ClientChange, SessionPhase};
use partychess::{ClientContext, ClientInput, Reaction, TransportEvent, UserIntent};
use serde_json::{json, Value};
use shared::{Color, Square};

fn sq(file: u8, rank: u8) -> Square {
    Square::new(file, rank).unwrap()
}

fn frame(value: Value) -> ClientInput {
    ClientInput::Transport(TransportEvent::Received(value.to_string()))
}

fn sent(reaction: &Reaction) -> Vec<Value> {
    reaction
        .outbound
        .iter()
        .map(|text| serde_json::from_str(text).unwrap())
        .collect()
}

fn start(color: &str) -> ClientContext {
    let mut ctx = ClientContext::new();
    ctx.handle(UserIntent::ShowParties.into());
    ctx.handle(frame(json!({
        "type": "game-started",
        "content": {"party_id": 11, "color": color}
    })));
    ctx
}

fn applied(ctx: &mut ClientContext, from: Square, to: Square) -> Reaction {
    ctx.handle(frame(json!({
        "type": "move-applied",
        "content": {"from": [from.file(), from.rank()], "to": [to.file(), to.rank()]}
    })))
}

// ============================================================================
// Opening
// ============================================================================

#[test]
fn test_opening_position_for_both_colors() {
    for (name, color) in [("light", Color::Light), ("dark", Color::Dark)] {
        let ctx = start(name);
        let game = ctx.game().unwrap();
        let board = game.board();

        assert_eq!(ctx.phase(), SessionPhase::Playing);
        assert_eq!(board.len(), 32);
        assert!(board.is_consistent());
        assert_eq!(game.turn().is_local_turn(), color == Color::Light);
        assert_eq!(game.turn().accepts_input(), color == Color::Light);

        // Own back rank at the bottom of the player's view
        for col in 0..8 {
            let absolute = perspective::to_absolute(sq(col, 7), color);
            assert_eq!(board.piece_at(absolute).unwrap().color, color);
        }
    }
}

// ============================================================================
// Turn Alternation
// ============================================================================

#[test]
fn test_pawn_push_round_trip() {
    let mut ctx = start("light");

    let reaction = ctx.handle(
        UserIntent::SubmitMove {
            from: sq(4, 1),
            to: sq(4, 3),
        }
        .into(),
    );
    assert_eq!(
        sent(&reaction),
        vec![json!({"type": "move", "content": {"party_id": 11, "from": [4, 1], "to": [4, 3]}})]
    );
    // Board waits for the server
    assert!(ctx.board().unwrap().piece_at(sq(4, 1)).is_some());

    let reaction = applied(&mut ctx, sq(4, 1), sq(4, 3));
    assert!(reaction.has_change(ClientChange::Board));

    let board = ctx.board().unwrap();
    assert!(board.piece_at(sq(4, 1)).is_none());
    assert_eq!(board.piece_at(sq(4, 3)).unwrap().kind, PieceKind::Pawn);
    assert!(!ctx.turn().unwrap().is_local_turn());
    assert!(!ctx.turn().unwrap().accepts_input());
}

#[test]
fn test_turn_alternates_over_many_updates() {
    let mut ctx = start("dark");
    let shuffle = [
        (sq(6, 0), sq(5, 2)),
        (sq(6, 7), sq(5, 5)),
        (sq(5, 2), sq(6, 0)),
        (sq(5, 5), sq(6, 7)),
    ];

    for k in 1..=12u32 {
        let (from, to) = shuffle[(k as usize - 1) % shuffle.len()];
        applied(&mut ctx, from, to);
        let turn = ctx.turn().unwrap();
        // Dark moves after every odd number of updates
        assert_eq!(turn.is_local_turn(), k % 2 == 1, "after {k} updates");
        assert_eq!(turn.moves_applied(), k);
        assert!(ctx.board().unwrap().is_consistent());
    }
    assert_eq!(ctx.board().unwrap().len(), 32);
}

// ============================================================================
// Captures
// ============================================================================

#[test]
fn test_capture_removes_defender() {
    let mut ctx = start("light");
    applied(&mut ctx, sq(4, 1), sq(4, 3));
    applied(&mut ctx, sq(3, 6), sq(3, 4));
    let victim = ctx.board().unwrap().piece_at(sq(3, 4)).unwrap().id;
    let attacker = ctx.board().unwrap().piece_at(sq(4, 3)).unwrap().id;

    applied(&mut ctx, sq(4, 3), sq(3, 4));

    let game = ctx.game().unwrap();
    assert_eq!(game.board().len(), 31);
    assert!(game.board().find(victim).is_none());
    assert_eq!(game.board().piece_at(sq(3, 4)).unwrap().id, attacker);
    assert_eq!(game.captured().taken_by(Color::Light), &[PieceKind::Pawn]);
    assert!(game.board().is_consistent());
}

#[test]
fn test_update_from_empty_square_changes_nothing() {
    let mut ctx = start("light");
    let before = ctx.board().unwrap().clone();

    let reaction = applied(&mut ctx, sq(4, 4), sq(4, 5));

    assert!(reaction.is_empty());
    assert_eq!(ctx.board().unwrap(), &before);
    assert_eq!(ctx.turn().unwrap().moves_applied(), 0);
}

// ============================================================================
// Game Broken
// ============================================================================

#[test]
fn test_game_broken_returns_to_search() {
    let mut ctx = start("dark");
    applied(&mut ctx, sq(4, 1), sq(4, 3));

    let reaction = ctx.handle(frame(json!({"type": "game-broken"})));

    assert_eq!(ctx.phase(), SessionPhase::Searching);
    assert!(ctx.game().is_none());
    assert!(ctx.roster().is_empty());
    assert_eq!(sent(&reaction), vec![json!({"type": "list-request"})]);
    assert!(reaction.has_change(ClientChange::Session));
}

// ============================================================================
// Gating
// ============================================================================

#[test]
fn test_gated_moves_send_nothing() {
    let mut ctx = start("dark");

    // Not our turn
    let reaction = ctx.handle(
        UserIntent::SubmitMove {
            from: sq(4, 6),
            to: sq(4, 4),
        }
        .into(),
    );
    assert!(reaction.outbound.is_empty());

    applied(&mut ctx, sq(4, 1), sq(4, 3));

    // Opponent's piece
    let reaction = ctx.handle(
        UserIntent::SubmitMove {
            from: sq(4, 3),
            to: sq(4, 4),
        }
        .into(),
    );
    assert!(reaction.outbound.is_empty());

    // First real move goes out, the second is locked out
    let first = ctx.handle(
        UserIntent::SubmitMove {
            from: sq(4, 6),
            to: sq(4, 4),
        }
        .into(),
    );
    let second = ctx.handle(
        UserIntent::SubmitMove {
            from: sq(3, 6),
            to: sq(3, 4),
        }
        .into(),
    );
    assert_eq!(first.outbound.len(), 1);
    assert!(second.outbound.is_empty());
}

#[test]
fn test_move_applied_outside_a_game_is_ignored() {
    let mut ctx = ClientContext::new();
    ctx.handle(UserIntent::ShowParties.into());

    let reaction = applied(&mut ctx, sq(4, 1), sq(4, 3));

    assert!(reaction.is_empty());
    assert_eq!(ctx.phase(), SessionPhase::Searching);
    assert!(ctx.board().is_none());
}

#[test]
fn test_roster_messages_ignored_while_waiting() {
    let mut ctx = ClientContext::new();
    ctx.handle(UserIntent::CreateParty.into());

    let reaction = ctx.handle(frame(json!({"type": "player-joined", "content": 4})));

    assert!(reaction.is_empty());
    assert!(ctx.roster().is_empty());
    assert_eq!(ctx.phase(), SessionPhase::Waiting);
}
