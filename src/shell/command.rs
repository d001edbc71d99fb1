/*!
 * Shell Commands
 * Parsing of single input lines into commands
 */

use crate::core::types::{Pid, Size};
use crate::memory::{FitStrategy, ParseStrategyError};
use thiserror::Error;

/// Command parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Invalid command!")]
    Unknown(String),

    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),

    #[error("Process size must be positive, got {0}")]
    NegativeSize(i64),

    #[error(transparent)]
    InvalidStrategy(#[from] ParseStrategyError),

    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

/// A parsed shell command
///
/// Arguments left out on the command line are prompted for by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `A [size [strategy]]`
    Allocate {
        size: Option<Size>,
        strategy: Option<FitStrategy>,
    },
    /// `D [pid]`
    Deallocate { pid: Option<Pid> },
    /// `R [json]`
    Report { json: bool },
    /// `S`
    Stats,
    /// `H` or `?`
    Help,
    /// `Q`
    Quit,
}

impl Command {
    /// Parse a line into a command; names are case-insensitive
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut parts = line.split_whitespace();
        let name = parts.next().ok_or(CommandError::Empty)?.to_ascii_uppercase();

        let command = match name.as_str() {
            "A" | "ALLOCATE" => Command::Allocate {
                size: parts.next().map(parse_size).transpose()?,
                strategy: parts.next().map(str::parse::<FitStrategy>).transpose()?,
            },
            "D" | "DEALLOCATE" | "FREE" => Command::Deallocate {
                pid: parts.next().map(parse_pid).transpose()?,
            },
            "R" | "REPORT" => match parts.next() {
                None => Command::Report { json: false },
                Some(arg) if arg.eq_ignore_ascii_case("json") => Command::Report { json: true },
                Some(arg) => return Err(CommandError::UnexpectedArgument(arg.to_string())),
            },
            "S" | "STATS" => Command::Stats,
            "H" | "HELP" | "?" => Command::Help,
            "Q" | "QUIT" | "EXIT" => Command::Quit,
            _ => return Err(CommandError::Unknown(name)),
        };

        if let Some(extra) = parts.next() {
            return Err(CommandError::UnexpectedArgument(extra.to_string()));
        }
        Ok(command)
    }
}

/// Parse a requested process size
///
/// Zero is passed through so the allocator can reject it.
pub(super) fn parse_size(text: &str) -> Result<Size, CommandError> {
    let text = text.trim();
    let value: i64 = text
        .parse()
        .map_err(|_| CommandError::InvalidNumber(text.to_string()))?;
    if value < 0 {
        return Err(CommandError::NegativeSize(value));
    }
    Size::try_from(value).map_err(|_| CommandError::InvalidNumber(text.to_string()))
}

pub(super) fn parse_pid(text: &str) -> Result<Pid, CommandError> {
    let text = text.trim();
    text.parse()
        .map_err(|_| CommandError::InvalidNumber(text.to_string()))
}
