//! Session error types.

use thiserror::Error;

/// Errors that prevent a session from starting or from reporting its end.
///
/// Failures while the session runs are not errors: they end the affected
/// worker and show up as a [`crate::WorkerExit`] in the session report.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The server connection or one of the session streams could not be
    /// opened. Fatal: no workers were started.
    #[error("session setup failed: {0}")]
    Setup(String),

    /// A worker task panicked or was cancelled.
    #[error("worker task failed: {0}")]
    Worker(String),
}

impl From<tokio::task::JoinError> for SessionError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Worker(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_error_display() {
        let err = SessionError::Setup("connect to 127.0.0.1:1 failed: refused".to_string());
        assert_eq!(err.to_string(), "session setup failed: connect to 127.0.0.1:1 failed: refused");

        let err = SessionError::Worker("task 7 panicked".to_string());
        assert_eq!(err.to_string(), "worker task failed: task 7 panicked");
    }
}
