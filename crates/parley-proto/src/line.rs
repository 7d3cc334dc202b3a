//! Text line format.
//!
//! In TEXT mode the server sends one message per line:
//!
//! ```text
//! [2024/01/02 03:04:05] alice > hello
//! [2024/01/02 03:04:06] bob joined the chat
//! ```
//!
//! A line with an author uses `author > content` after the timestamp. A line
//! without the separator is a system message. Lines that do not start with a
//! bracketed timestamp are kept whole as system messages stamped with the
//! time they were received.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::Message;

/// `strftime` pattern of the bracketed timestamp (UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Separator between author and content.
pub const AUTHOR_SEPARATOR: &str = " > ";

impl Message {
    /// Parse one text line into a message.
    ///
    /// Never fails: anything that is not in the line format becomes a system
    /// message carrying the whole line. Trailing `\r`/`\n` are stripped.
    pub fn from_line(line: &str, received_at: DateTime<Utc>) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some((timestamp, rest)) = split_timestamp(line) else {
            return Self::system(line, received_at);
        };

        match rest.split_once(AUTHOR_SEPARATOR) {
            Some((author, content)) if !author.is_empty() => Self::new(author, content, timestamp),
            _ => Self::system(rest, timestamp),
        }
    }
}

/// Extract the author name from a rendered line, `None` for system lines.
pub fn parse_author(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once("] ")?;
    let (author, _) = rest.split_once(AUTHOR_SEPARATOR)?;
    (!author.is_empty()).then_some(author)
}

fn split_timestamp(line: &str) -> Option<(DateTime<Utc>, &str)> {
    let rest = line.strip_prefix('[')?;
    let (stamp, rest) = rest.split_once(']')?;
    let naive = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;
    Some((naive.and_utc(), rest.strip_prefix(' ').unwrap_or(rest)))
}
