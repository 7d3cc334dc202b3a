//! View side-effects.
//!
//! This module defines the [`ViewAction`] enum, the instructions produced by
//! the [`crate::ChatApp`] for whoever owns the session's input pipe and the
//! screen.

/// Actions produced by the view controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// Re-read [`crate::ChatView::current_view`] and redraw.
    Render,

    /// Write this line to the session's user input.
    Send(String),

    /// Close the presentation layer.
    Quit,
}
