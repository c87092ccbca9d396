//! Console commands typed by the user, one per line.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Replace the address text, like typing into the address input.
    SetAddress(String),
    SubmitAddress,
    TrackRider,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,
    #[error("`address` needs the address text")]
    MissingAddress,
    #[error("unknown command `{0}`; type `help`")]
    Unknown(String),
}

pub const HELP: &str = "\
commands:
  address <text>   set the address text
  submit           geocode the address and place the rider
  track            animate the rider toward the address
  status           show the current view state
  help             show this help
  quit             exit";

pub fn parse_command(line: &str) -> Result<ConsoleCommand, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "address" | "a" => {
            if rest.is_empty() {
                Err(ParseError::MissingAddress)
            } else {
                Ok(ConsoleCommand::SetAddress(rest.to_string()))
            }
        }
        "submit" | "s" => Ok(ConsoleCommand::SubmitAddress),
        "track" | "t" => Ok(ConsoleCommand::TrackRider),
        "status" => Ok(ConsoleCommand::Status),
        "help" | "?" => Ok(ConsoleCommand::Help),
        "quit" | "exit" | "q" => Ok(ConsoleCommand::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}
