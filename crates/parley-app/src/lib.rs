//! Application layer for Parley
//!
//! Pure state for everything a session shows to its user: the append-only
//! message log, the live sort-key stack, the author filter, and the
//! controller that turns user actions into view updates and outbound lines.
//! Nothing here performs I/O, so the same code runs under the session engine
//! and in tests.
//!
//! # Components
//!
//! - [`MessageLog`]: arrival-ordered messages plus the set of known authors
//! - [`MessageOrdering`]: active [`SortKey`]s and their composite comparator
//! - [`AuthorFilter`]: author selection and the show/hide predicate
//! - [`ChatView`]: shared, lock-guarded snapshot of the three above
//! - [`ChatApp`]: controller mapping [`ViewEvent`]s to [`ViewAction`]s

#![forbid(unsafe_code)]

mod action;
mod app;
mod event;
mod filter;
mod ordering;
mod registry;
mod state;
mod view;

pub use action::ViewAction;
pub use app::ChatApp;
pub use event::ViewEvent;
pub use filter::AuthorFilter;
pub use ordering::{MessageOrdering, SortKey};
pub use registry::{AuthorRegistry, NoopRegistry};
pub use state::MessageLog;
pub use view::ChatView;
