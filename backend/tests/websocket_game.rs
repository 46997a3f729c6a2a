//! End-to-end game over real websockets
//!
//! Starts the lobby server on an ephemeral port and plays two client
//! contexts against each other through it.

use partychess::networking::{ClientContext, SessionPhase, TransportLink, UserIntent};
use shared::{Color, PartyId, Square};
use tokio::net::TcpListener;
use tokio::time::{timeout, Duration};

struct Player {
    link: TransportLink,
    ctx: ClientContext,
}

impl Player {
    fn connect(url: &str) -> Self {
        Self {
            link: TransportLink::connect(url),
            ctx: ClientContext::new(),
        }
    }

    fn act(&mut self, intent: UserIntent) {
        let reaction = self.ctx.handle(intent.into());
        self.link.send_all(reaction.outbound);
    }

    /// Feed transport events into the context until `done` holds
    async fn pump_until(&mut self, done: impl Fn(&ClientContext) -> bool) {
        let pumping = async {
            while !done(&self.ctx) {
                let event = self.link.next_event().await.expect("link ended early");
                let reaction = self.ctx.handle(event.into());
                self.link.send_all(reaction.outbound);
            }
        };
        timeout(Duration::from_secs(5), pumping)
            .await
            .expect("timed out waiting for the server");
    }

    fn moves(&self) -> u32 {
        self.ctx.turn().map(|turn| turn.moves_applied()).unwrap_or(0)
    }
}

async fn start_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(backend::serve(listener));
    format!("ws://{}{}", addr, backend::GAME_PATH)
}

fn sq(file: u8, rank: u8) -> Square {
    Square::new(file, rank).unwrap()
}

async fn play(mover: &mut Player, other: &mut Player, from: Square, to: Square) {
    let expected = mover.moves() + 1;
    mover.act(UserIntent::SubmitMove { from, to });
    mover.pump_until(|ctx| ctx.turn().unwrap().moves_applied() == expected).await;
    other.pump_until(|ctx| ctx.turn().unwrap().moves_applied() == expected).await;
}

#[tokio::test]
async fn test_two_clients_play_through_the_lobby() {
    let url = start_server().await;

    let mut light = Player::connect(&url);
    light.act(UserIntent::CreateParty);
    light
        .pump_until(|ctx| ctx.session().waiting_party().is_some())
        .await;
    let party: PartyId = light.ctx.session().waiting_party().unwrap();

    let mut dark = Player::connect(&url);
    dark.act(UserIntent::ShowParties);
    dark.pump_until(|ctx| ctx.roster().contains(party)).await;

    dark.act(UserIntent::JoinParty(party));
    dark.pump_until(|ctx| ctx.phase() == SessionPhase::Playing).await;
    light.pump_until(|ctx| ctx.phase() == SessionPhase::Playing).await;

    assert_eq!(light.ctx.game().unwrap().color(), Color::Light);
    assert_eq!(dark.ctx.game().unwrap().color(), Color::Dark);
    assert!(light.ctx.turn().unwrap().accepts_input());
    assert!(!dark.ctx.turn().unwrap().accepts_input());

    play(&mut light, &mut dark, sq(4, 1), sq(4, 3)).await;
    play(&mut dark, &mut light, sq(3, 6), sq(3, 4)).await;
    play(&mut light, &mut dark, sq(4, 3), sq(3, 4)).await;

    let light_board = light.ctx.board().unwrap();
    assert_eq!(light_board, dark.ctx.board().unwrap());
    assert_eq!(light_board.len(), 31);
    assert_eq!(
        light.ctx.game().unwrap().captured().taken_by(Color::Light).len(),
        1
    );

    // Dark walks away: light is sent back to the roster
    drop(dark);
    light
        .pump_until(|ctx| ctx.phase() == SessionPhase::Searching)
        .await;
    assert!(light.ctx.game().is_none());
}

#[tokio::test]
async fn test_roster_follows_party_lifecycle() {
    let url = start_server().await;

    let mut watcher = Player::connect(&url);
    watcher.act(UserIntent::ShowParties);

    let mut host = Player::connect(&url);
    host.act(UserIntent::CreateParty);
    host.pump_until(|ctx| ctx.session().waiting_party().is_some())
        .await;
    let party = host.ctx.session().waiting_party().unwrap();

    watcher.pump_until(|ctx| ctx.roster().contains(party)).await;

    host.act(UserIntent::CancelWait);
    watcher.pump_until(|ctx| !ctx.roster().contains(party)).await;
    assert_eq!(host.ctx.phase(), SessionPhase::Searching);
}
