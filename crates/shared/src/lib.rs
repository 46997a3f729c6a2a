//! Wire vocabulary shared by the partychess client and lobby server

pub mod codec;
pub mod protocol;
pub mod types;

pub use codec::{decode, encode, CodecError};
pub use protocol::{ClientMessage, GameStart, MoveRequest, ServerMessage, WireMessage};
pub use types::{Color, Move, PartyId, Square};
