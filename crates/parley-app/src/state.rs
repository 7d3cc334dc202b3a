//! Observable message state.
//!
//! [`MessageLog`] is the raw record of everything the server sent during a
//! session, in arrival order. Ordering and filtering never touch it; they
//! are applied when a view is materialized.

use std::collections::BTreeSet;

use parley_proto::Message;

/// Append-only, arrival-ordered message log.
///
/// # Invariants
///
/// - Messages are never reordered. Index order is arrival order and serves
///   as the tie-break for every sorted view.
/// - `authors` holds exactly the distinct non-empty authors of `messages`
///   seen since the last [`MessageLog::clear`].
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
    authors: BTreeSet<String>,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    ///
    /// Returns the author name if this is the first message from them.
    pub fn append(&mut self, message: Message) -> Option<String> {
        let new_author = message
            .author()
            .filter(|author| !self.authors.contains(*author))
            .map(str::to_owned);

        if let Some(author) = &new_author {
            self.authors.insert(author.clone());
        }
        self.messages.push(message);

        new_author
    }

    /// Messages in arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if no message has arrived since creation or the last clear.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Known authors, sorted.
    pub fn authors(&self) -> impl Iterator<Item = &str> {
        self.authors.iter().map(String::as_str)
    }

    /// True if `author` has posted since the last clear.
    pub fn knows_author(&self, author: &str) -> bool {
        self.authors.contains(author)
    }

    /// Drop all messages and forget all authors.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.authors.clear();
    }
}
