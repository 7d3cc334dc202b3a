//! Shared shutdown signal.
//!
//! One flag per session, shared by the inbound and outbound workers and by
//! whoever holds the [`crate::SessionHandle`]. It starts out running and can
//! only ever move to stopped.

use std::sync::Arc;

use tokio::sync::watch;

/// Running/stopped flag shared by the two workers of one session.
///
/// # Invariants
///
/// - Monotonic: running → stopped, never back.
/// - Exactly one [`ShutdownSignal::stop`] call observes the transition, even
///   when both workers race to stop.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    running: Arc<watch::Sender<bool>>,
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// New signal in the running state.
    pub fn new() -> Self {
        let (running, _) = watch::channel(true);
        Self { running: Arc::new(running) }
    }

    /// True until the first [`ShutdownSignal::stop`].
    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    /// Move to stopped. Returns `true` only for the call that performed the
    /// transition; later calls are no-ops.
    pub fn stop(&self) -> bool {
        self.running.send_if_modified(|running| {
            let was_running = *running;
            *running = false;
            was_running
        })
    }

    /// Resolves once the signal is stopped. Resolves immediately if it
    /// already is.
    pub async fn stopped(&self) {
        let mut rx = self.running.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|running| !*running).await;
    }
}
