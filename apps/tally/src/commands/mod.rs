//! # Commands
//!
//! The event source: one stdin line in, one [`Command`] out.
//!
//! ## Grammar
//! ```text
//! + <id>       inc <id>       increase <id>     add one copy
//! - <id>       dec <id>       decrease <id>     take one copy away
//! rm <id>      remove <id>                      remove the line
//! restore                                       bring the original list back
//! show                                          redraw the whole cart
//! help | ?                                      list commands
//! quit | exit | q                               leave (after pending animations)
//! ```
//! Verbs are case-insensitive; ids are taken as typed.

pub mod cart;

use std::str::FromStr;

use thiserror::Error;

/// Help text printed by `help`.
pub const HELP: &str = "\
Commands:
  + <id> | inc <id>     add one copy
  - <id> | dec <id>     take one copy away (not below 1)
  rm <id>               remove the line
  restore               bring the original list back
  show                  redraw the cart
  help                  this text
  quit                  leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Increase(String),
    Decrease(String),
    Remove(String),
    Restore,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Empty command. Type `help` for a list of commands.")]
    Empty,

    #[error("Unknown command '{0}'. Type `help` for a list of commands.")]
    Unknown(String),

    #[error("'{0}' needs an item id, e.g. `{0} BOOK-DUNE`")]
    MissingId(String),

    #[error("'{verb}' takes {expected} argument(s), got {got}")]
    TooManyArguments {
        verb: String,
        expected: usize,
        got: usize,
    },
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?;
        let args: Vec<&str> = words.collect();
        let lowered = verb.to_lowercase();

        let with_id = |make: fn(String) -> Command| match args.as_slice() {
            [] => Err(CommandError::MissingId(verb.to_string())),
            [id] => Ok(make(id.to_string())),
            _ => Err(CommandError::TooManyArguments {
                verb: verb.to_string(),
                expected: 1,
                got: args.len(),
            }),
        };
        let bare = |command: Command| {
            if args.is_empty() {
                Ok(command)
            } else {
                Err(CommandError::TooManyArguments {
                    verb: verb.to_string(),
                    expected: 0,
                    got: args.len(),
                })
            }
        };

        match lowered.as_str() {
            "+" | "inc" | "increase" => with_id(Command::Increase),
            "-" | "dec" | "decrease" => with_id(Command::Decrease),
            "rm" | "remove" => with_id(Command::Remove),
            "restore" => bare(Command::Restore),
            "show" | "ls" => bare(Command::Show),
            "help" | "?" => bare(Command::Help),
            "quit" | "exit" | "q" => bare(Command::Quit),
            _ => Err(CommandError::Unknown(verb.to_string())),
        }
    }
}
