//! Session assembly.
//!
//! A [`Session`] wires one server connection, one user input stream, and one
//! [`ChatView`] into an inbound and an outbound worker sharing a single
//! [`ShutdownSignal`]. [`Session::spawn`] starts both workers as tokio tasks
//! and hands back a [`SessionHandle`] to stop or await them.

use std::sync::Arc;

use parley_app::{AuthorRegistry, ChatView, NoopRegistry};
use parley_proto::vocabulary::BYE;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{TcpStream, ToSocketAddrs},
    task::JoinHandle,
};

use crate::{
    InboundReader, OutboundWriter, SessionError, ShutdownSignal,
    transport::{EchoSink, TransportMode, WorkerReport, send_line},
};

/// Per-session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Framing used on the server stream.
    pub mode: TransportMode,
    /// Framing used on the echo sink, if one is attached.
    pub echo_mode: TransportMode,
    /// A user line containing this keyword is sent and then ends the
    /// session. Empty disables the check.
    pub terminate_keyword: String,
    /// Sent as the first line after [`Session::connect`] opens the
    /// connection.
    pub user_name: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: TransportMode::Text,
            echo_mode: TransportMode::Text,
            terminate_keyword: BYE.to_string(),
            user_name: None,
        }
    }
}

/// A session that has not started yet.
pub struct Session {
    config: SessionConfig,
    signal: ShutdownSignal,
    view: ChatView,
    registry: Arc<dyn AuthorRegistry>,
    echo: Option<EchoSink>,
}

impl Session {
    /// New session with an empty view and no echo.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            signal: ShutdownSignal::new(),
            view: ChatView::new(),
            registry: Arc::new(NoopRegistry),
            echo: None,
        }
    }

    /// Append into an existing view instead of a fresh one.
    #[must_use]
    pub fn with_view(mut self, view: ChatView) -> Self {
        self.view = view;
        self
    }

    /// Report first-seen authors to `registry`.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<dyn AuthorRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Copy every inbound message to `echo`, framed as
    /// [`SessionConfig::echo_mode`].
    #[must_use]
    pub fn with_echo(mut self, echo: EchoSink) -> Self {
        self.echo = Some(echo);
        self
    }

    /// The signal both workers will share.
    pub fn signal(&self) -> &ShutdownSignal {
        &self.signal
    }

    /// The view the inbound worker will append to.
    pub fn view(&self) -> &ChatView {
        &self.view
    }

    /// Start both workers over already-open streams.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R, W, I>(self, server_read: R, server_write: W, user_input: I) -> SessionHandle
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
        I: AsyncRead + Unpin + Send + 'static,
    {
        let Self { config, signal, view, registry, echo } = self;

        let mut inbound =
            InboundReader::new(server_read, config.mode, signal.clone(), view.clone()).with_registry(registry);
        if let Some(echo) = echo {
            inbound = inbound.with_echo(echo, config.echo_mode);
        }
        let outbound = OutboundWriter::new(user_input, server_write, signal.clone(), config.terminate_keyword);

        tracing::info!(mode = %config.mode, echo_mode = %config.echo_mode, "session started");
        SessionHandle {
            signal,
            view,
            inbound: tokio::spawn(inbound.run()),
            outbound: tokio::spawn(outbound.run()),
        }
    }

    /// Connect to `addr` and start the session over the connection.
    ///
    /// Sends the configured user name first, if any. Any failure here is a
    /// setup failure and no worker is started.
    pub async fn connect<A, I>(self, addr: A, user_input: I) -> Result<SessionHandle, SessionError>
    where
        A: ToSocketAddrs + std::fmt::Display,
        I: AsyncRead + Unpin + Send + 'static,
    {
        let mut stream = TcpStream::connect(&addr)
            .await
            .map_err(|e| SessionError::Setup(format!("connect to {addr} failed: {e}")))?;
        tracing::info!(%addr, "connected");

        if let Some(name) = &self.config.user_name {
            send_line(&mut stream, name)
                .await
                .map_err(|e| SessionError::Setup(format!("sending user name failed: {e}")))?;
        }

        let (read, write) = stream.into_split();
        Ok(self.spawn(read, write, user_input))
    }
}

/// Handle to a running session.
#[derive(Debug)]
pub struct SessionHandle {
    signal: ShutdownSignal,
    view: ChatView,
    inbound: JoinHandle<WorkerReport>,
    outbound: JoinHandle<WorkerReport>,
}

impl SessionHandle {
    /// The session's shutdown signal.
    pub fn signal(&self) -> &ShutdownSignal {
        &self.signal
    }

    /// The view the inbound worker appends to.
    pub fn view(&self) -> &ChatView {
        &self.view
    }

    /// True until either worker or [`SessionHandle::stop`] ends the session.
    pub fn is_running(&self) -> bool {
        self.signal.is_running()
    }

    /// End the session. Both workers exit at their next check.
    pub fn stop(&self) {
        if self.signal.stop() {
            tracing::info!("session stopped by handle");
        }
    }

    /// Wait for both workers to finish.
    pub async fn join(self) -> Result<SessionReport, SessionError> {
        let (inbound, outbound) = tokio::join!(self.inbound, self.outbound);
        let report = SessionReport { inbound: inbound?, outbound: outbound? };
        tracing::info!(
            inbound = ?report.inbound.exit,
            received = report.inbound.count,
            outbound = ?report.outbound.exit,
            sent = report.outbound.count,
            "session ended"
        );
        Ok(report)
    }
}

/// Outcome of both workers of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    /// The server → view worker.
    pub inbound: WorkerReport,
    /// The user → server worker.
    pub outbound: WorkerReport,
}

impl SessionReport {
    /// True if either worker ended on an I/O or protocol failure.
    pub fn is_failure(&self) -> bool {
        self.inbound.exit.is_failure() || self.outbound.exit.is_failure()
    }
}
