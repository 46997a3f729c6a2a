//! Bevy integration for the party client
//!
//! Wraps [`ClientContext`] in a resource and moves transport events,
//! user intents and board clicks through it once per frame:
//!
//! ```text
//! drain_transport -> handle_board_clicks -> route_inputs -> forward_outbound
//! ```
//!
//! Front ends write [`PartyIntent`] and [`BoardClick`] messages and
//! redraw whatever [`PartyChanged`] names.
//!
//! # Usage
//!
//! ```rust,ignore
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(PartyClientPlugin::connect("ws://127.0.0.1:8080/game"))
//!     .run();
//! ```

use super::router::{ClientContext, ClientInput, TransportEvent, UserIntent};
use super::session::ClientChange;
use super::transport::TransportLink;
use crate::game::{ClickOutcome, Selection};
use bevy::prelude::*;
use shared::Square;
use tracing::{error, info};

#[derive(Resource, Debug, Default)]
pub struct PartyClient(pub ClientContext);

/// Live connection; absent when the plugin runs without a server
#[derive(Resource, Debug)]
pub struct PartyTransport(pub TransportLink);

/// Pending click selection on the board
#[derive(Resource, Debug, Default)]
pub struct BoardSelection(pub Selection);

#[derive(Message, Debug, Clone, Copy)]
pub struct PartyIntent(pub UserIntent);

#[derive(Message, Debug, Clone)]
pub struct PartyInbound(pub TransportEvent);

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartyChanged(pub ClientChange);

/// Encoded frame on its way to the server
#[derive(Message, Debug, Clone)]
pub struct PartyOutbound(pub String);

/// Click on a board square, in view coordinates
#[derive(Message, Debug, Clone, Copy)]
pub struct BoardClick(pub Square);

#[derive(Default)]
pub struct PartyClientPlugin {
    /// Server endpoint; `None` leaves transport to the caller
    pub server_url: Option<String>,
}

impl PartyClientPlugin {
    pub fn connect(url: impl Into<String>) -> Self {
        Self {
            server_url: Some(url.into()),
        }
    }
}

impl Plugin for PartyClientPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PartyClient>()
            .init_resource::<BoardSelection>()
            .add_message::<PartyIntent>()
            .add_message::<PartyInbound>()
            .add_message::<PartyChanged>()
            .add_message::<PartyOutbound>()
            .add_message::<BoardClick>();

        if let Some(url) = &self.server_url {
            match TransportLink::spawn_background(url.clone()) {
                Ok(link) => {
                    app.insert_resource(PartyTransport(link));
                }
                Err(e) => error!("[NETWORK] Could not start transport: {}", e),
            }
        }

        app.add_systems(
            Update,
            (
                drain_transport,
                handle_board_clicks,
                route_inputs,
                forward_outbound,
            )
                .chain(),
        );

        info!("[NETWORK] PartyClientPlugin loaded");
    }
}

fn drain_transport(
    transport: Option<ResMut<PartyTransport>>,
    mut inbound: MessageWriter<PartyInbound>,
) {
    let Some(mut transport) = transport else {
        return;
    };
    while let Some(event) = transport.0.try_next_event() {
        inbound.write(PartyInbound(event));
    }
}

fn handle_board_clicks(
    mut clicks: MessageReader<BoardClick>,
    client: Res<PartyClient>,
    mut selection: ResMut<BoardSelection>,
    mut intents: MessageWriter<PartyIntent>,
) {
    for click in clicks.read() {
        let Some(game) = client.0.game() else {
            continue;
        };
        if let ClickOutcome::Proposed { from, to } = selection.0.click(click.0, game) {
            intents.write(PartyIntent(UserIntent::SubmitMove { from, to }));
        }
    }
}

fn route_inputs(
    mut client: ResMut<PartyClient>,
    mut selection: ResMut<BoardSelection>,
    mut inbound: MessageReader<PartyInbound>,
    mut intents: MessageReader<PartyIntent>,
    mut outbound: MessageWriter<PartyOutbound>,
    mut changed: MessageWriter<PartyChanged>,
) {
    let inputs = inbound
        .read()
        .map(|msg| ClientInput::from(msg.0.clone()))
        .chain(intents.read().map(|msg| ClientInput::from(msg.0)));

    for input in inputs {
        let reaction = client.0.handle(input);
        for text in reaction.outbound {
            outbound.write(PartyOutbound(text));
        }
        for change in reaction.changes {
            if matches!(change, ClientChange::Session | ClientChange::Board) {
                selection.0.clear();
            }
            changed.write(PartyChanged(change));
        }
    }
}

fn forward_outbound(
    transport: Option<Res<PartyTransport>>,
    mut outbound: MessageReader<PartyOutbound>,
) {
    let Some(transport) = transport else {
        return;
    };
    for msg in outbound.read() {
        transport.0.send(msg.0.clone());
    }
}
