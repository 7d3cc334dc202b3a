//! Author filter.

use std::collections::BTreeSet;

use parley_proto::Message;

/// Selected authors plus an on/off switch.
///
/// While filtering is off the selection is kept but ignored. System
/// messages always pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorFilter {
    selected: BTreeSet<String>,
    filtering: bool,
}

impl AuthorFilter {
    /// Filter with an empty selection, switched off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch enforcement on or off.
    pub fn set_filtering(&mut self, enabled: bool) {
        self.filtering = enabled;
    }

    /// True while enforcement is on.
    pub fn is_filtering(&self) -> bool {
        self.filtering
    }

    /// Add an author to the selection. Returns `false` if already selected.
    pub fn add(&mut self, author: impl Into<String>) -> bool {
        self.selected.insert(author.into())
    }

    /// Remove an author. Returns `false` if not selected.
    pub fn remove(&mut self, author: &str) -> bool {
        self.selected.remove(author)
    }

    /// Empty the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Replace the selection with `authors`.
    pub fn select<I, S>(&mut self, authors: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = authors.into_iter().map(Into::into).collect();
    }

    /// True if `author` is selected.
    pub fn is_selected(&self, author: &str) -> bool {
        self.selected.contains(author)
    }

    /// Selected authors, sorted.
    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Whether `message` is shown.
    pub fn test(&self, message: &Message) -> bool {
        !self.filtering || message.author().is_none_or(|author| self.selected.contains(author))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn msg(author: &str) -> Message {
        Message::new(author, "text", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn disabled_accepts_everything() {
        let mut filter = AuthorFilter::new();
        filter.add("alice");
        assert!(filter.test(&msg("bob")));
    }

    #[test]
    fn enabled_accepts_selected_only() {
        let mut filter = AuthorFilter::new();
        filter.add("alice");
        filter.set_filtering(true);

        assert!(filter.test(&msg("alice")));
        assert!(!filter.test(&msg("bob")));
    }

    #[test]
    fn system_messages_always_pass() {
        let mut filter = AuthorFilter::new();
        filter.set_filtering(true);
        assert!(filter.test(&msg("")));
    }

    #[test]
    fn empty_selection_hides_all_authors() {
        let mut filter = AuthorFilter::new();
        filter.set_filtering(true);
        assert!(!filter.test(&msg("alice")));
    }

    #[test]
    fn select_replaces() {
        let mut filter = AuthorFilter::new();
        filter.add("alice");
        filter.select(["bob", "carol"]);

        assert!(!filter.is_selected("alice"));
        assert_eq!(filter.selected().collect::<Vec<_>>(), ["bob", "carol"]);
    }

    #[test]
    fn remove_and_clear() {
        let mut filter = AuthorFilter::new();
        filter.add("alice");
        assert!(filter.remove("alice"));
        assert!(!filter.remove("alice"));

        filter.add("bob");
        filter.clear();
        assert_eq!(filter.selected().count(), 0);
    }
}
