//! View controller.
//!
//! [`ChatApp`] is a pure state machine: it consumes [`ViewEvent`]s, updates
//! the shared [`ChatView`], and returns [`ViewAction`]s for the caller to
//! execute. It never touches a stream.
//!
//! # Responsibilities
//!
//! - Applies sort and filter toggles to the view.
//! - Expands "kick selected" into one command line per selected author.
//! - Keeps the draft and the history of sent lines.
//! - Stops emitting outbound lines once the session is disconnected.

use parley_proto::Command;

use crate::{ChatView, ViewAction, ViewEvent};

/// View controller for one session.
#[derive(Debug, Clone)]
pub struct ChatApp {
    view: ChatView,
    /// Cleared by [`ViewEvent::Disconnected`], never set again.
    connected: bool,
    /// Lines the user sent, oldest first.
    history: Vec<String>,
    /// Position while browsing history. `history.len()` when not browsing.
    cursor: usize,
    /// Current contents of the send box.
    draft: String,
}

impl ChatApp {
    /// Controller over `view`, initially connected.
    pub fn new(view: ChatView) -> Self {
        Self { view, connected: true, history: Vec::new(), cursor: 0, draft: String::new() }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: ViewEvent) -> Vec<ViewAction> {
        match event {
            ViewEvent::SortToggled { key, enabled } => {
                self.view.set_sort_key(key, enabled);
                tracing::debug!(%key, enabled, "sort key toggled");
                vec![ViewAction::Render]
            },
            ViewEvent::FilteringToggled(enabled) => {
                self.view.set_filtering(enabled);
                tracing::info!("filtering is {}", if enabled { "on" } else { "off" });
                vec![ViewAction::Render]
            },
            ViewEvent::SelectionChanged(authors) => {
                self.view.select_authors(authors);
                self.render_if_filtering()
            },
            ViewEvent::SelectionCleared => {
                self.view.clear_selection();
                self.render_if_filtering()
            },
            ViewEvent::MessagesCleared => {
                self.view.clear();
                vec![ViewAction::Render]
            },
            ViewEvent::KickSelected => {
                let lines = self
                    .view
                    .selected_authors()
                    .into_iter()
                    .map(|name| Command::Kick(name).to_string())
                    .collect();
                self.send_all(lines)
            },
            ViewEvent::Submit(text) => self.submit(text),
            ViewEvent::HistoryPrevious => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.draft.clone_from(&self.history[self.cursor]);
                }
                vec![ViewAction::Render]
            },
            ViewEvent::HistoryNext => {
                if self.cursor < self.history.len() {
                    self.cursor += 1;
                    self.draft = self.history.get(self.cursor).cloned().unwrap_or_default();
                }
                vec![ViewAction::Render]
            },
            ViewEvent::QuitRequested => {
                let mut actions = self.send_all(vec![Command::Bye.to_string()]);
                actions.push(ViewAction::Quit);
                actions
            },
            ViewEvent::Disconnected => {
                self.connected = false;
                vec![ViewAction::Render]
            },
        }
    }

    /// The shared view this controller drives.
    pub fn view(&self) -> &ChatView {
        &self.view
    }

    /// False once the session has ended.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Current send box contents.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the send box contents.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Lines sent so far, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    fn submit(&mut self, text: String) -> Vec<ViewAction> {
        if text.is_empty() {
            return vec![];
        }
        // Nothing can be sent: keep the draft for the user.
        if !self.connected {
            tracing::warn!("cannot submit: session disconnected");
            return vec![];
        }
        self.draft.clear();

        let line = match Command::parse(&text) {
            Command::Catchup => Command::Catchup.to_string(),
            Command::Bye | Command::Kick(_) | Command::Chat(_) => {
                self.history.push(text.clone());
                text
            },
        };
        self.cursor = self.history.len();

        let mut actions = self.send_all(vec![line]);
        actions.push(ViewAction::Render);
        actions
    }

    fn send_all(&self, lines: Vec<String>) -> Vec<ViewAction> {
        if !self.connected {
            tracing::warn!("dropping {} outbound line(s): session disconnected", lines.len());
            return vec![];
        }
        lines.into_iter().map(ViewAction::Send).collect()
    }

    fn render_if_filtering(&self) -> Vec<ViewAction> {
        if self.view.is_filtering() { vec![ViewAction::Render] } else { vec![] }
    }
}
