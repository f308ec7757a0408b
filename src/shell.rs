//! Interactive shell commands
//!
//! Parses the text typed at the `raikv-cli` prompt and renders responses.
//!
//! ```text
//! put key:value   store a value
//! get key         fetch a value
//! pop key         delete a key
//! help            show usage
//! clear           clear the screen
//! exit            quit
//! ```

use std::fmt;

use crate::protocol::{Message, Method};

/// Usage text printed by `help`
pub const HELP: &str = "\
Commands:
  put <key>:<value>   store a value
  get <key>           fetch a value
  pop <key>           delete a key
  help                show this message
  clear               clear the screen
  exit                quit";

/// ANSI sequence that clears the terminal and homes the cursor
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// One line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Send a request to the server
    Request(Message),
    Help,
    Clear,
    Exit,
    /// Blank line
    Empty,
}

/// Why a line could not be turned into a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    MissingKey(String),
    MissingSeparator,
    Unexpected(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingKey(verb) => write!(f, "'{}' needs a key", verb),
            ParseError::MissingSeparator => f.write_str("usage: put <key>:<value>"),
            ParseError::Unexpected(line) => {
                write!(f, "unrecognized command '{}', type 'help' for usage", line)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl ShellCommand {
    /// Parse one input line
    ///
    /// A verb the shell doesn't know is still sent when it carries a key,
    /// so the server decides whether the method exists.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(ShellCommand::Empty);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match (verb, rest.is_empty()) {
            ("help", true) => return Ok(ShellCommand::Help),
            ("clear", true) => return Ok(ShellCommand::Clear),
            ("exit", true) => return Ok(ShellCommand::Exit),
            _ => {}
        }

        match verb.parse::<Method>() {
            Ok(_) if rest.is_empty() => Err(ParseError::MissingKey(verb.to_string())),
            Ok(Method::Put) => {
                let (key, value) = rest.split_once(':').ok_or(ParseError::MissingSeparator)?;
                if key.is_empty() {
                    return Err(ParseError::MissingKey(verb.to_string()));
                }
                Ok(ShellCommand::Request(Message::put(key, value)))
            }
            Ok(Method::Get) => Ok(ShellCommand::Request(Message::get(rest))),
            Ok(Method::Pop) => Ok(ShellCommand::Request(Message::pop(rest))),
            Err(_) if rest.is_empty() => Err(ParseError::Unexpected(line.to_string())),
            Err(_) => Ok(ShellCommand::Request(Message::request(verb, rest, ""))),
        }
    }
}

/// Format a response for the terminal
pub fn render(response: &Message) -> String {
    if response.is_error() {
        return response.error_msg.clone();
    }

    format!(
        "{{method: {}, key: {}, value: {}}}",
        response.method, response.key, response.value
    )
}
