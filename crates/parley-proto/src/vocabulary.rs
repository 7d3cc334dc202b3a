//! Control vocabulary.
//!
//! Commands travel as ordinary text lines. The session engine only acts on
//! [`BYE`]; everything else is forwarded to the server untouched.

use std::fmt;

/// Ends the session.
pub const BYE: &str = "bye";

/// Asks the server to disconnect a user: `kick <name>`.
pub const KICK: &str = "kick";

/// Asks the server to replay recent history.
pub const CATCHUP: &str = "catchup";

/// Classification of one user line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Terminate the session.
    Bye,
    /// Kick the named user.
    Kick(String),
    /// Replay history.
    Catchup,
    /// Plain chat text.
    Chat(String),
}

impl Command {
    /// Classify a line. Keywords match on the trimmed line; anything else is
    /// chat.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.split_once(char::is_whitespace) {
            Some((KICK, name)) if !name.trim().is_empty() => Self::Kick(name.trim().to_owned()),
            _ if trimmed == BYE => Self::Bye,
            _ if trimmed == CATCHUP => Self::Catchup,
            _ => Self::Chat(line.to_owned()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bye => f.write_str(BYE),
            Self::Kick(name) => write!(f, "{KICK} {name}"),
            Self::Catchup => f.write_str(CATCHUP),
            Self::Chat(text) => f.write_str(text),
        }
    }
}
