//! Author discovery notifications.

/// Receives each author the session sees for the first time.
///
/// Presentation layers use it to grow user lists, completion vocabularies,
/// and the filter's selection widget. Called from the inbound worker, so
/// implementations must not block.
pub trait AuthorRegistry: Send + Sync {
    /// A non-empty author posted their first message since the log was last
    /// cleared.
    fn author_seen(&self, author: &str);
}

impl<F> AuthorRegistry for F
where
    F: Fn(&str) + Send + Sync,
{
    fn author_seen(&self, author: &str) {
        self(author);
    }
}

/// Registry that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRegistry;

impl AuthorRegistry for NoopRegistry {
    fn author_seen(&self, _author: &str) {}
}
