//! Session transition table
//!
//! Every inbound message kind and every user intent is applied in every
//! session phase, and the resulting phase and outbound kinds are checked
//! against the expected table.

use partychess::networking::SessionPhase;
use partychess::networking::SessionPhase::{Idle, Playing, Searching, Waiting};
use partychess::{ClientContext, ClientInput, TransportEvent, UserIntent};
use serde_json::{json, Value};
use shared::{PartyId, Square};

fn received(value: Value) -> ClientInput {
    ClientInput::Transport(TransportEvent::Received(value.to_string()))
}

fn in_phase(phase: SessionPhase) -> ClientContext {
    let mut ctx = ClientContext::new();
    match phase {
        SessionPhase::Idle => {}
        SessionPhase::Searching => {
            ctx.handle(UserIntent::ShowParties.into());
        }
        SessionPhase::Waiting => {
            ctx.handle(UserIntent::CreateParty.into());
            ctx.handle(received(json!({"type": "party-created", "content": 1})));
        }
        SessionPhase::Playing => {
            ctx.handle(received(json!({
                "type": "game-started",
                "content": {"party_id": 1, "color": "light"}
            })));
        }
    }
    assert_eq!(ctx.phase(), phase);
    ctx
}

fn kinds(outbound: &[String]) -> Vec<String> {
    outbound
        .iter()
        .map(|text| {
            let value: Value = serde_json::from_str(text).unwrap();
            value["type"].as_str().unwrap().to_string()
        })
        .collect()
}

const PHASES: [SessionPhase; 4] = [
    SessionPhase::Idle,
    SessionPhase::Searching,
    SessionPhase::Waiting,
    SessionPhase::Playing,
];

fn check(input: impl Fn() -> ClientInput, expected: [(SessionPhase, &[&str]); 4]) {
    for (phase, (after, outbound)) in PHASES.into_iter().zip(expected) {
        let mut ctx = in_phase(phase);
        let reaction = ctx.handle(input());
        assert_eq!(ctx.phase(), after, "{:?} from {phase}", input());
        assert_eq!(
            kinds(&reaction.outbound),
            outbound,
            "{:?} from {phase}",
            input()
        );
    }
}

#[test]
fn test_show_parties() {
    check(
        || UserIntent::ShowParties.into(),
        [
            (Searching, &["list-request"]),
            (Searching, &["list-request"]),
            (Waiting, &[]),
            (Playing, &[]),
        ],
    );
}

#[test]
fn test_create_party() {
    check(
        || UserIntent::CreateParty.into(),
        [
            (Waiting, &["new-party"]),
            (Waiting, &["new-party"]),
            (Waiting, &[]),
            (Playing, &[]),
        ],
    );
}

#[test]
fn test_join_party() {
    check(
        || UserIntent::JoinParty(PartyId(5)).into(),
        [
            (Idle, &[]),
            (Searching, &["join-party"]),
            (Waiting, &[]),
            (Playing, &[]),
        ],
    );
}

#[test]
fn test_cancel_wait() {
    check(
        || UserIntent::CancelWait.into(),
        [
            (Idle, &[]),
            (Searching, &[]),
            (Searching, &["cancel-wait", "list-request"]),
            (Playing, &[]),
        ],
    );
}

#[test]
fn test_submit_move() {
    let from = Square::new(4, 1).unwrap();
    let to = Square::new(4, 3).unwrap();
    check(
        move || UserIntent::SubmitMove { from, to }.into(),
        [
            (Idle, &[]),
            (Searching, &[]),
            (Waiting, &[]),
            (Playing, &["move"]),
        ],
    );
}

#[test]
fn test_roster_messages() {
    for message in [
        json!({"type": "party-list-snapshot", "content": [1, 2]}),
        json!({"type": "player-joined", "content": 3}),
        json!({"type": "player-left", "content": 3}),
    ] {
        check(
            || received(message.clone()),
            [
                (Idle, &[]),
                (Searching, &[]),
                (Waiting, &[]),
                (Playing, &[]),
            ],
        );
    }
}

#[test]
fn test_party_created() {
    check(
        || received(json!({"type": "party-created", "content": 9})),
        [
            (Idle, &[]),
            (Searching, &[]),
            (Waiting, &[]),
            (Playing, &[]),
        ],
    );
}

#[test]
fn test_game_started() {
    check(
        || {
            received(json!({
                "type": "game-started",
                "content": {"party_id": 2, "color": "dark"}
            }))
        },
        [
            (Playing, &[]),
            (Playing, &[]),
            (Playing, &[]),
            (Playing, &[]),
        ],
    );
}

#[test]
fn test_move_applied() {
    check(
        || received(json!({"type": "move-applied", "content": {"from": [4, 1], "to": [4, 3]}})),
        [
            (Idle, &[]),
            (Searching, &[]),
            (Waiting, &[]),
            (Playing, &[]),
        ],
    );
}

#[test]
fn test_game_broken() {
    check(
        || received(json!({"type": "game-broken"})),
        [
            (Idle, &[]),
            (Searching, &[]),
            (Waiting, &[]),
            (Searching, &["list-request"]),
        ],
    );
}

#[test]
fn test_channel_closed() {
    check(
        || TransportEvent::Closed.into(),
        [(Idle, &[]), (Idle, &[]), (Idle, &[]), (Idle, &[])],
    );
}

#[test]
fn test_channel_opened() {
    check(
        || TransportEvent::Opened.into(),
        [
            (Idle, &[]),
            (Searching, &[]),
            (Waiting, &[]),
            (Playing, &[]),
        ],
    );
}
