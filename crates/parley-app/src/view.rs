//! Shared view state.
//!
//! The inbound worker appends while the presentation layer toggles keys and
//! renders. [`ChatView`] keeps log, ordering and filter behind one lock so
//! that every read is a consistent snapshot of all three.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use parley_proto::Message;

use crate::{AuthorFilter, MessageLog, MessageOrdering, SortKey};

#[derive(Debug, Default)]
struct ViewState {
    log: MessageLog,
    ordering: MessageOrdering,
    filter: AuthorFilter,
}

/// Cloneable handle to one session's view state.
#[derive(Debug, Clone, Default)]
pub struct ChatView {
    inner: Arc<Mutex<ViewState>>,
}

impl ChatView {
    /// Empty view: no messages, no sort keys, filtering off.
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the state half-updated:
    // every mutation below is a single call on one of the three parts.
    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a received message. Returns the author if newly seen.
    pub fn append(&self, message: Message) -> Option<String> {
        self.lock().log.append(message)
    }

    /// Materialize the view: sort by the active keys (stable), then drop
    /// messages the filter rejects.
    pub fn current_view(&self) -> Vec<Message> {
        let state = self.lock();
        let mut view: Vec<&Message> = state.log.messages().iter().collect();
        state.ordering.sort(&mut view);
        view.into_iter().filter(|message| state.filter.test(message)).cloned().collect()
    }

    /// Number of messages in the log, ignoring ordering and filter.
    pub fn message_count(&self) -> usize {
        self.lock().log.len()
    }

    /// Known authors, sorted.
    pub fn authors(&self) -> Vec<String> {
        self.lock().log.authors().map(str::to_owned).collect()
    }

    /// Drop all messages and known authors.
    pub fn clear(&self) {
        self.lock().log.clear();
    }

    /// Activate or deactivate a sort key. Returns `true` if anything changed.
    pub fn set_sort_key(&self, key: SortKey, enabled: bool) -> bool {
        self.lock().ordering.set_key(key, enabled)
    }

    /// Active sort keys, most significant first.
    pub fn sort_keys(&self) -> Vec<SortKey> {
        self.lock().ordering.keys().to_vec()
    }

    /// Switch author filtering on or off.
    pub fn set_filtering(&self, enabled: bool) {
        self.lock().filter.set_filtering(enabled);
    }

    /// True while author filtering is on.
    pub fn is_filtering(&self) -> bool {
        self.lock().filter.is_filtering()
    }

    /// Replace the author selection.
    pub fn select_authors<I, S>(&self, authors: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().filter.select(authors);
    }

    /// Empty the author selection.
    pub fn clear_selection(&self) {
        self.lock().filter.clear();
    }

    /// Selected authors, sorted.
    pub fn selected_authors(&self) -> Vec<String> {
        self.lock().filter.selected().map(str::to_owned).collect()
    }
}
