//! View input events.
//!
//! Everything a presentation layer can ask of the [`crate::ChatApp`]:
//! menu toggles, list selection changes, the send box, and connection
//! notifications.

use crate::SortKey;

/// Events processed by the view controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// A sort key was checked or unchecked.
    SortToggled {
        /// Key being toggled.
        key: SortKey,
        /// New checked state.
        enabled: bool,
    },

    /// The filter switch changed.
    FilteringToggled(bool),

    /// The author list selection changed to exactly these names.
    SelectionChanged(Vec<String>),

    /// The author list selection was cleared.
    SelectionCleared,

    /// The user asked to clear the message pane.
    MessagesCleared,

    /// Kick every selected author.
    KickSelected,

    /// The send box was submitted with this text.
    Submit(String),

    /// Recall the previous sent line into the draft.
    HistoryPrevious,

    /// Move forward in sent-line history.
    HistoryNext,

    /// The user asked to leave.
    QuitRequested,

    /// The session ended.
    Disconnected,
}
