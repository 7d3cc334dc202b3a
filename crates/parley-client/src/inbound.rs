//! Inbound worker: server stream → message log.
//!
//! Reads one message unit per iteration, appends it to the shared
//! [`ChatView`], reports first-seen authors, and optionally echoes the
//! message to a user-facing sink in its own format. Every read failure is
//! terminal: a broken stream, a closed stream, or a record that cannot be
//! decoded all end the session, and nothing after the failure point is ever
//! appended.

use std::sync::Arc;

use chrono::Utc;
use parley_app::{AuthorRegistry, ChatView, NoopRegistry};
use parley_proto::{Message, ProtocolError, read_record};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};

use crate::{
    ShutdownSignal,
    transport::{EchoSink, TransportMode, WorkerExit, WorkerReport, write_echo},
};

/// One unit read from the server.
enum Unit {
    Message(Message),
    /// A blank text line. Not a message, not terminal.
    Blank,
    /// Clean end of stream on a unit boundary.
    End,
}

/// Worker that owns the read side of the server connection.
pub struct InboundReader<R> {
    source: BufReader<R>,
    mode: TransportMode,
    signal: ShutdownSignal,
    view: ChatView,
    registry: Arc<dyn AuthorRegistry>,
    echo: Option<EchoSink>,
    echo_mode: TransportMode,
    received: usize,
}

impl<R> InboundReader<R>
where
    R: AsyncRead + Unpin + Send,
{
    /// Reader over `source` that appends into `view`.
    pub fn new(source: R, mode: TransportMode, signal: ShutdownSignal, view: ChatView) -> Self {
        Self {
            source: BufReader::new(source),
            mode,
            signal,
            view,
            registry: Arc::new(NoopRegistry),
            echo: None,
            echo_mode: TransportMode::Text,
            received: 0,
        }
    }

    /// Notify `registry` of each newly seen author.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<dyn AuthorRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Copy every received message to `echo`, framed as `mode`.
    ///
    /// The echo format is independent of the server stream's: a terminal
    /// wants text lines even when the server speaks records.
    #[must_use]
    pub fn with_echo(mut self, echo: EchoSink, mode: TransportMode) -> Self {
        self.echo = Some(echo);
        self.echo_mode = mode;
        self
    }

    /// Run until a terminal condition or until the signal is stopped.
    ///
    /// Stops the signal if this worker ended the session, then closes its
    /// streams. Close failures are logged and otherwise ignored.
    pub async fn run(mut self) -> WorkerReport {
        let exit = self.read_loop().await;
        if self.signal.stop() {
            tracing::info!(?exit, "inbound worker ended the session");
        }
        self.cleanup().await;

        WorkerReport { exit, count: self.received }
    }

    async fn read_loop(&mut self) -> WorkerExit {
        while self.signal.is_running() {
            let unit = tokio::select! {
                biased;
                () = self.signal.stopped() => return WorkerExit::Stopped,
                unit = read_unit(&mut self.source, self.mode) => unit,
            };

            let message = match unit {
                Ok(Unit::Message(message)) => message,
                Ok(Unit::Blank) => continue,
                Ok(Unit::End) => {
                    tracing::info!("server closed the stream");
                    return WorkerExit::InputClosed;
                },
                Err(e) if e.is_malformed() => {
                    tracing::warn!("malformed data from server: {e}");
                    return WorkerExit::Malformed;
                },
                Err(e) => {
                    tracing::warn!("reading from server failed: {e}");
                    return WorkerExit::ReadFailed;
                },
            };

            if let Err(exit) = self.publish(message).await {
                return exit;
            }
        }
        WorkerExit::Stopped
    }

    async fn publish(&mut self, message: Message) -> Result<(), WorkerExit> {
        tracing::debug!(author = message.author_or_empty(), "message received");

        let echoed = self.echo.is_some().then(|| message.clone());
        let new_author = self.view.append(message);
        self.received += 1;

        if let Some(author) = new_author {
            self.registry.author_seen(&author);
        }

        if let (Some(echo), Some(message)) = (self.echo.as_mut(), echoed)
            && let Err(e) = write_echo(echo, self.echo_mode, &message).await
        {
            tracing::warn!("writing to user output failed: {e}");
            return Err(WorkerExit::EchoFailed);
        }
        Ok(())
    }

    async fn cleanup(&mut self) {
        tracing::debug!("closing inbound streams");
        if let Some(echo) = self.echo.as_mut()
            && let Err(e) = echo.shutdown().await
        {
            tracing::warn!("closing user output failed: {e}");
        }
    }
}

async fn read_unit<R>(source: &mut BufReader<R>, mode: TransportMode) -> Result<Unit, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    match mode {
        TransportMode::Object => Ok(read_record(source).await?.map_or(Unit::End, Unit::Message)),
        TransportMode::Text => {
            let mut line = String::new();
            if source.read_line(&mut line).await? == 0 {
                return Ok(Unit::End);
            }
            if line.trim().is_empty() {
                return Ok(Unit::Blank);
            }
            Ok(Unit::Message(Message::from_line(&line, Utc::now())))
        },
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        pin::Pin,
        task::{Context, Poll},
    };

    use chrono::TimeZone;
    use parley_proto::encode_record;
    use tokio::io::{AsyncReadExt, AsyncWrite, ReadBuf};

    use super::*;

    /// Stream whose every read and write fails.
    struct Broken;

    impl AsyncRead for Broken {
        fn poll_read(self: Pin<&mut Self>, _: &mut Context<'_>, _: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::ErrorKind::ConnectionReset.into()))
        }
    }

    impl AsyncWrite for Broken {
        fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, _: &[u8]) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()))
        }

        fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()))
        }
    }

    #[tokio::test]
    async fn broken_server_stream_is_read_failure() {
        let signal = ShutdownSignal::new();
        let view = ChatView::new();
        let reader = InboundReader::new(Broken, TransportMode::Object, signal.clone(), view.clone());

        assert_eq!(reader.run().await, WorkerReport { exit: WorkerExit::ReadFailed, count: 0 });
        assert!(!signal.is_running());
        assert_eq!(view.message_count(), 0);
    }

    #[tokio::test]
    async fn broken_echo_ends_session_after_append() {
        let signal = ShutdownSignal::new();
        let view = ChatView::new();
        let reader = InboundReader::new(LINES.as_bytes(), TransportMode::Text, signal.clone(), view.clone())
            .with_echo(Box::new(Broken), TransportMode::Text);

        assert_eq!(reader.run().await, WorkerReport { exit: WorkerExit::EchoFailed, count: 1 });
        assert!(!signal.is_running());
        assert_eq!(view.authors(), ["alice"]);
    }

    #[tokio::test]
    async fn records_echo_as_text_lines() {
        let msg = Message::new("alice", "hi", Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        let wire = encode_record(&msg).unwrap();
        let (echo_tx, mut echo_rx) = tokio::io::duplex(4096);

        let reader = InboundReader::new(&wire[..], TransportMode::Object, ShutdownSignal::new(), ChatView::new())
            .with_echo(Box::new(echo_tx), TransportMode::Text);
        assert_eq!(reader.run().await.exit, WorkerExit::InputClosed);

        let mut echoed = String::new();
        echo_rx.read_to_string(&mut echoed).await.unwrap();
        assert_eq!(echoed, format!("{}\n", msg.to_line()));
    }

    const LINES: &str = "[2024/01/02 03:04:05] alice > hi\n\n[2024/01/02 03:04:06] bob > yo\n";

    #[tokio::test]
    async fn text_stream_until_eof() {
        let signal = ShutdownSignal::new();
        let view = ChatView::new();
        let reader = InboundReader::new(LINES.as_bytes(), TransportMode::Text, signal.clone(), view.clone());

        let report = reader.run().await;

        assert_eq!(report, WorkerReport { exit: WorkerExit::InputClosed, count: 2 });
        assert!(!signal.is_running());
        assert_eq!(view.authors(), ["alice", "bob"]);
    }

    #[tokio::test]
    async fn invalid_utf8_is_malformed() {
        let signal = ShutdownSignal::new();
        let bytes: &[u8] = b"\xff\xfe broken\n";
        let reader = InboundReader::new(bytes, TransportMode::Text, signal.clone(), ChatView::new());

        assert_eq!(reader.run().await.exit, WorkerExit::Malformed);
        assert!(!signal.is_running());
    }

    #[tokio::test]
    async fn already_stopped_reads_nothing() {
        let signal = ShutdownSignal::new();
        signal.stop();
        let view = ChatView::new();
        let reader = InboundReader::new(LINES.as_bytes(), TransportMode::Text, signal, view.clone());

        assert_eq!(reader.run().await, WorkerReport { exit: WorkerExit::Stopped, count: 0 });
        assert_eq!(view.message_count(), 0);
    }

    #[tokio::test]
    async fn garbage_record_stops_appending() {
        let good = Message::system("hello", Utc::now());
        let mut wire = encode_record(&good).unwrap().to_vec();
        wire.extend_from_slice(b"this is not a record header");
        wire.extend_from_slice(&encode_record(&good).unwrap());

        let signal = ShutdownSignal::new();
        let view = ChatView::new();
        let reader = InboundReader::new(wire.as_slice(), TransportMode::Object, signal.clone(), view.clone());

        assert_eq!(reader.run().await, WorkerReport { exit: WorkerExit::Malformed, count: 1 });
        assert!(!signal.is_running());
        assert_eq!(view.message_count(), 1);
    }
}
