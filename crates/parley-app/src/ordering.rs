//! Live message ordering.
//!
//! The user toggles sort keys on and off while messages keep arriving. The
//! first key switched on is the primary key, the next one breaks its ties,
//! and so on. Whatever remains tied keeps arrival order.

use std::{cmp::Ordering, fmt};

use parley_proto::Message;

/// A dimension along which the message view can be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SortKey {
    /// Timestamp, oldest first.
    Date,
    /// Author name, lexicographic. System messages sort as the empty name.
    Author,
    /// Message text, lexicographic.
    Content,
}

impl SortKey {
    /// Every key, in menu order.
    pub const ALL: [SortKey; 3] = [SortKey::Date, SortKey::Author, SortKey::Content];

    /// Compare two messages along this key only.
    pub fn compare(self, a: &Message, b: &Message) -> Ordering {
        match self {
            Self::Date => a.timestamp().cmp(&b.timestamp()),
            Self::Author => a.author_or_empty().cmp(b.author_or_empty()),
            Self::Content => a.content().cmp(b.content()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Date => "date",
            Self::Author => "author",
            Self::Content => "content",
        };
        f.write_str(name)
    }
}

/// Ordered set of active sort keys.
///
/// # Invariants
///
/// - A key appears at most once.
/// - `keys[0]` is the most significant key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOrdering {
    keys: Vec<SortKey>,
}

impl MessageOrdering {
    /// Ordering with no active keys (arrival order).
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `key` as the least significant key.
    ///
    /// Returns `false` if it was already active.
    pub fn add_key(&mut self, key: SortKey) -> bool {
        if self.contains(key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    /// Deactivate `key`.
    ///
    /// Returns `false` if it was not active.
    pub fn remove_key(&mut self, key: SortKey) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| *k != key);
        self.keys.len() != before
    }

    /// Activate or deactivate `key`. Returns `true` if anything changed.
    pub fn set_key(&mut self, key: SortKey, enabled: bool) -> bool {
        if enabled { self.add_key(key) } else { self.remove_key(key) }
    }

    /// Number of active keys.
    pub fn active_count(&self) -> usize {
        self.keys.len()
    }

    /// True if `key` is active.
    pub fn contains(&self, key: SortKey) -> bool {
        self.keys.contains(&key)
    }

    /// Active keys, most significant first.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Composite comparison over all active keys. `Equal` when no key is
    /// active or all active keys tie.
    pub fn compare(&self, a: &Message, b: &Message) -> Ordering {
        self.keys
            .iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Stable-sort `messages` in place. Leaves them untouched when no key is
    /// active.
    pub fn sort(&self, messages: &mut [&Message]) {
        if self.keys.is_empty() {
            return;
        }
        messages.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;

    fn t(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, secs).unwrap()
    }

    fn sorted<'a>(ordering: &MessageOrdering, log: &'a [Message]) -> Vec<&'a str> {
        let mut view: Vec<&Message> = log.iter().collect();
        ordering.sort(&mut view);
        view.into_iter().map(Message::content).collect()
    }

    #[test]
    fn add_is_idempotent() {
        let mut ordering = MessageOrdering::new();
        assert!(ordering.add_key(SortKey::Date));
        assert!(!ordering.add_key(SortKey::Date));
        assert_eq!(ordering.active_count(), 1);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut ordering = MessageOrdering::new();
        assert!(!ordering.remove_key(SortKey::Author));
        assert_eq!(ordering.active_count(), 0);
    }

    #[test]
    fn insertion_order_sets_significance() {
        let mut ordering = MessageOrdering::new();
        ordering.add_key(SortKey::Content);
        ordering.add_key(SortKey::Date);
        ordering.remove_key(SortKey::Content);
        ordering.add_key(SortKey::Content);
        assert_eq!(ordering.keys(), [SortKey::Date, SortKey::Content]);
    }

    #[test]
    fn author_then_date() {
        let log = [
            Message::new("A", "hi", t(1)),
            Message::new("B", "yo", t(2)),
            Message::new("A", "bye", t(3)),
        ];
        let mut ordering = MessageOrdering::new();
        ordering.add_key(SortKey::Author);
        ordering.add_key(SortKey::Date);

        assert_eq!(sorted(&ordering, &log), ["hi", "bye", "yo"]);
    }

    #[test]
    fn no_keys_keeps_arrival_order() {
        let log = [Message::new("B", "2", t(2)), Message::new("A", "1", t(1))];
        assert_eq!(sorted(&MessageOrdering::new(), &log), ["2", "1"]);
    }

    #[test]
    fn ties_keep_arrival_order() {
        let log = [
            Message::new("bob", "third", t(5)),
            Message::new("amy", "first", t(9)),
            Message::new("bob", "second", t(1)),
        ];
        let mut ordering = MessageOrdering::new();
        ordering.add_key(SortKey::Author);

        assert_eq!(sorted(&ordering, &log), ["first", "third", "second"]);
    }

    #[test]
    fn system_messages_sort_first_by_author() {
        let log = [Message::new("zed", "z", t(1)), Message::system("notice", t(2))];
        let mut ordering = MessageOrdering::new();
        ordering.add_key(SortKey::Author);

        assert_eq!(sorted(&ordering, &log), ["notice", "z"]);
    }
}
