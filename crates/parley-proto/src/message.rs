//! Chat message record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::line::{AUTHOR_SEPARATOR, TIMESTAMP_FORMAT};

/// A single chat message as produced by the server.
///
/// Messages are immutable once built. A message without an author is a
/// system message (server notices, join/leave announcements).
///
/// # Invariants
///
/// - `author` is never `Some("")`. Empty authors are normalized to `None` by
///   every constructor and by deserialization, so [`Message::author`] and
///   [`Message::is_system`] always agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "non_empty")]
    author: Option<String>,
    timestamp: DateTime<Utc>,
    content: String,
}

impl Message {
    /// Create a message from `author`. An empty author yields a system
    /// message.
    pub fn new(
        author: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let author = author.into();
        let author = (!author.is_empty()).then_some(author);
        Self { author, timestamp, content: content.into() }
    }

    /// Create a system message (no author).
    pub fn system(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self { author: None, timestamp, content: content.into() }
    }

    /// Author name, `None` for system messages.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Author name, empty for system messages. Used as the sort key.
    pub fn author_or_empty(&self) -> &str {
        self.author.as_deref().unwrap_or_default()
    }

    /// When the server stamped the message.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Message text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// True for messages without an author.
    pub fn is_system(&self) -> bool {
        self.author.is_none()
    }

    /// Render in the text line format, without the trailing newline.
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.timestamp.format(TIMESTAMP_FORMAT))?;
        match &self.author {
            Some(author) => write!(f, "{author}{AUTHOR_SEPARATOR}{}", self.content),
            None => f.write_str(&self.content),
        }
    }
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let author = Option::<String>::deserialize(deserializer)?;
    Ok(author.filter(|a| !a.is_empty()))
}
