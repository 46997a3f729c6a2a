//! Terminal front end
//!
//! Renders the session as plain text and turns typed commands into
//! [`UserIntent`]s. Squares typed by the player are view coordinates:
//! column left to right, row top to bottom, the player's own pieces on
//! rows 6 and 7.

use crate::game::{perspective, ClickOutcome, Game, Selection};
use crate::networking::{ClientChange, ClientContext, SessionState, UserIntent};
use shared::types::OutOfBoard;
use shared::{PartyId, Square};
use std::fmt::Write as _;
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  list                  show open parties
  create                open a party and wait for a partner
  join <id>             join an open party
  cancel                leave the party you opened
  click <col> <row>     pick a piece, then click its destination
  move <c1> <r1> <c2> <r2>
  help                  this text
  quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    List,
    Create,
    Join(PartyId),
    Cancel,
    /// View square
    Click(Square),
    /// View squares
    Move { from: Square, to: Square },
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command {0:?}, try `help`")]
    Unknown(String),

    #[error("`{command}` expects {expected}")]
    Arguments {
        command: &'static str,
        expected: &'static str,
    },

    #[error("{0:?} is not a number")]
    BadNumber(String),

    #[error(transparent)]
    OffBoard(#[from] OutOfBoard),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(ParseCommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "list" | "ls" => expect_none("list", &args, Command::List)?,
            "create" | "new" => expect_none("create", &args, Command::Create)?,
            "cancel" => expect_none("cancel", &args, Command::Cancel)?,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "join" => match args.as_slice() {
                [id] => Command::Join(PartyId(number(id)?)),
                _ => {
                    return Err(ParseCommandError::Arguments {
                        command: "join",
                        expected: "a party id",
                    })
                }
            },
            "click" => match args.as_slice() {
                [col, row] => Command::Click(square(col, row)?),
                _ => {
                    return Err(ParseCommandError::Arguments {
                        command: "click",
                        expected: "<col> <row>",
                    })
                }
            },
            "move" => match args.as_slice() {
                [c1, r1, c2, r2] => Command::Move {
                    from: square(c1, r1)?,
                    to: square(c2, r2)?,
                },
                _ => {
                    return Err(ParseCommandError::Arguments {
                        command: "move",
                        expected: "<c1> <r1> <c2> <r2>",
                    })
                }
            },
            other => return Err(ParseCommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn expect_none(
    command: &'static str,
    args: &[&str],
    parsed: Command,
) -> Result<Command, ParseCommandError> {
    if args.is_empty() {
        Ok(parsed)
    } else {
        Err(ParseCommandError::Arguments {
            command,
            expected: "no arguments",
        })
    }
}

fn number<T: FromStr>(word: &str) -> Result<T, ParseCommandError> {
    word.parse()
        .map_err(|_| ParseCommandError::BadNumber(word.to_string()))
}

fn square(col: &str, row: &str) -> Result<Square, ParseCommandError> {
    Ok(Square::new(number(col)?, number(row)?)?)
}

/// Terminal-side state: the pending click selection
#[derive(Debug, Default)]
pub struct Terminal {
    selection: Selection,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Translate a command into an intent for the client context
    ///
    /// Returns `None` for commands handled locally (help, quit) and for
    /// clicks that only change the selection.
    pub fn intent_for(&mut self, command: Command, ctx: &ClientContext) -> Option<UserIntent> {
        match command {
            Command::List => Some(UserIntent::ShowParties),
            Command::Create => Some(UserIntent::CreateParty),
            Command::Join(party) => Some(UserIntent::JoinParty(party)),
            Command::Cancel => Some(UserIntent::CancelWait),
            Command::Click(view) => {
                let game = ctx.game()?;
                match self.selection.click(view, game) {
                    ClickOutcome::Proposed { from, to } => {
                        Some(UserIntent::SubmitMove { from, to })
                    }
                    ClickOutcome::Selected(_) | ClickOutcome::Ignored => None,
                }
            }
            Command::Move { from, to } => {
                let color = ctx.game()?.color();
                self.selection.clear();
                Some(UserIntent::SubmitMove {
                    from: perspective::to_absolute(from, color),
                    to: perspective::to_absolute(to, color),
                })
            }
            Command::Help | Command::Quit => None,
        }
    }

    /// Drop the selection when the session or board it refers to changed
    pub fn on_changes(&mut self, changes: &[ClientChange]) {
        if changes
            .iter()
            .any(|change| matches!(change, ClientChange::Session | ClientChange::Board))
        {
            self.selection.clear();
        }
    }

    /// Full screen for the current state
    pub fn render(&self, ctx: &ClientContext) -> String {
        let mut out = render_status(ctx);
        if let Some(game) = ctx.game() {
            out.push('\n');
            out.push_str(&render_board(game, &self.selection));
        }
        out
    }
}

pub fn render_status(ctx: &ClientContext) -> String {
    match ctx.state() {
        SessionState::Idle => "Not in the lobby. Type `list` to browse parties.".to_string(),
        SessionState::Searching => {
            let parties = ctx.roster().parties();
            if parties.is_empty() {
                "No open parties. `create` one or `list` again.".to_string()
            } else {
                let ids: Vec<String> = parties.iter().map(ToString::to_string).collect();
                format!("Open parties: {}", ids.join(", "))
            }
        }
        SessionState::Waiting(None) => "Creating a party...".to_string(),
        SessionState::Waiting(Some(party)) => {
            format!("Waiting in party {} for a partner. `cancel` to leave.", party)
        }
        SessionState::Playing(game) => {
            let turn = if game.turn().accepts_input() {
                "your move"
            } else if game.turn().is_local_turn() {
                "move sent"
            } else {
                "partner's move"
            };
            format!(
                "Party {}, playing {}: {} (material {:+})",
                game.party(),
                game.color(),
                turn,
                game.captured().material_balance()
            )
        }
    }
}

/// Board as seen by the player; the selected piece is bracketed
pub fn render_board(game: &Game, selection: &Selection) -> String {
    let mut out = String::from("   0  1  2  3  4  5  6  7\n");
    for row in 0..8u8 {
        let _ = write!(out, "{} ", row);
        for col in 0..8u8 {
            let piece = Square::new(col, row)
                .ok()
                .map(|view| perspective::to_absolute(view, game.color()))
                .and_then(|square| game.board().piece_at(square));
            let cell = match piece {
                Some(piece) if selection.selected() == Some(piece.id) => {
                    format!("[{}]", piece.symbol())
                }
                Some(piece) => format!(" {} ", piece.symbol()),
                None => " . ".to_string(),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    out
}
