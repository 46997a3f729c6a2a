//! User interface
//!
//! - **terminal**: text rendering and command parsing for the
//!   `partychess` binary
//!
//! Graphical hosts use [`crate::networking::PartyClientPlugin`] instead
//! and draw from the same [`crate::networking::ClientContext`].

pub mod terminal;

pub use terminal::{render_board, render_status, Command, ParseCommandError, Terminal, HELP};
