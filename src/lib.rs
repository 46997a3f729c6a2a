pub mod core;
pub mod game;
pub mod networking;
pub mod ui;

pub use game::{Board, Game};
pub use networking::{ClientContext, ClientInput, Reaction, TransportEvent, UserIntent};
