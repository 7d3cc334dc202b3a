//! Outbound worker: user input → server stream.
//!
//! Forwards each input line to the server as-is, in order, flushing after
//! every line. A line containing the terminate keyword is still sent and then
//! ends the session.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{
    ShutdownSignal,
    transport::{WorkerExit, WorkerReport, send_line},
};

/// Worker that owns the user input and the write side of the server
/// connection.
pub struct OutboundWriter<I, W> {
    input: BufReader<I>,
    sink: W,
    signal: ShutdownSignal,
    terminate_keyword: String,
    sent: usize,
}

impl<I, W> OutboundWriter<I, W>
where
    I: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Writer forwarding `input` lines to `sink`.
    ///
    /// An empty `terminate_keyword` never matches.
    pub fn new(input: I, sink: W, signal: ShutdownSignal, terminate_keyword: impl Into<String>) -> Self {
        Self {
            input: BufReader::new(input),
            sink,
            signal,
            terminate_keyword: terminate_keyword.into(),
            sent: 0,
        }
    }

    /// Run until a terminal condition or until the signal is stopped.
    pub async fn run(mut self) -> WorkerReport {
        let exit = self.write_loop().await;
        if self.signal.stop() {
            tracing::info!(?exit, "outbound worker ended the session");
        }
        self.cleanup().await;

        WorkerReport { exit, count: self.sent }
    }

    async fn write_loop(&mut self) -> WorkerExit {
        let mut line = String::new();
        while self.signal.is_running() {
            line.clear();
            let read = tokio::select! {
                biased;
                () = self.signal.stopped() => return WorkerExit::Stopped,
                read = self.input.read_line(&mut line) => read,
            };

            match read {
                Ok(0) => {
                    tracing::info!("user input closed");
                    return WorkerExit::InputClosed;
                },
                Ok(_) => {},
                Err(e) => {
                    tracing::warn!("reading user input failed: {e}");
                    return WorkerExit::ReadFailed;
                },
            }

            let text = line.trim_end_matches(['\r', '\n']);
            let written = tokio::select! {
                biased;
                () = self.signal.stopped() => return WorkerExit::Stopped,
                written = send_line(&mut self.sink, text) => written,
            };
            if let Err(e) = written {
                tracing::warn!("writing to server failed: {e}");
                return WorkerExit::WriteFailed;
            }
            self.sent += 1;
            tracing::debug!(sent = self.sent, "line sent");

            if self.is_terminate(text) {
                tracing::info!(keyword = %self.terminate_keyword, "terminate keyword sent");
                return WorkerExit::Terminated;
            }
        }
        WorkerExit::Stopped
    }

    fn is_terminate(&self, line: &str) -> bool {
        !self.terminate_keyword.is_empty() && line.contains(self.terminate_keyword.as_str())
    }

    async fn cleanup(&mut self) {
        tracing::debug!("closing outbound streams");
        if let Err(e) = self.sink.shutdown().await {
            tracing::warn!("closing server stream failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        pin::Pin,
        task::{Context, Poll},
    };

    use tokio::io::ReadBuf;

    use super::*;

    /// Input that cannot be read.
    struct BrokenInput;

    impl AsyncRead for BrokenInput {
        fn poll_read(self: Pin<&mut Self>, _: &mut Context<'_>, _: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::ErrorKind::ConnectionReset.into()))
        }
    }

    /// Server stream that refuses every write.
    struct BrokenSink;

    impl AsyncWrite for BrokenSink {
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
    async fn refused_write_is_write_failure() {
        let signal = ShutdownSignal::new();

        let report = OutboundWriter::new("hello\nsecond\n".as_bytes(), BrokenSink, signal.clone(), "bye").run().await;

        assert_eq!(report, WorkerReport { exit: WorkerExit::WriteFailed, count: 0 });
        assert!(!signal.is_running());
    }

    #[tokio::test]
    async fn unreadable_input_is_read_failure() {
        let signal = ShutdownSignal::new();
        let mut sink = Vec::new();

        let report = OutboundWriter::new(BrokenInput, &mut sink, signal.clone(), "bye").run().await;

        assert_eq!(report, WorkerReport { exit: WorkerExit::ReadFailed, count: 0 });
        assert!(!signal.is_running());
        assert!(sink.is_empty());
    }

    async fn forward(input: &str, keyword: &str) -> (WorkerReport, String, ShutdownSignal) {
        let signal = ShutdownSignal::new();
        let mut sink = Vec::new();
        let report = OutboundWriter::new(input.as_bytes(), &mut sink, signal.clone(), keyword).run().await;
        (report, String::from_utf8(sink).unwrap(), signal)
    }

    #[tokio::test]
    async fn keyword_line_is_sent_then_terminates() {
        let (report, sent, signal) = forward("hello\nok bye now\nnever\n", "bye").await;

        assert_eq!(report, WorkerReport { exit: WorkerExit::Terminated, count: 2 });
        assert_eq!(sent, "hello\nok bye now\n");
        assert!(!signal.is_running());
    }

    #[tokio::test]
    async fn closed_input_stops_session() {
        let (report, sent, signal) = forward("a\nb", "bye").await;

        assert_eq!(report, WorkerReport { exit: WorkerExit::InputClosed, count: 2 });
        assert_eq!(sent, "a\nb\n");
        assert!(!signal.is_running());
    }

    #[tokio::test]
    async fn empty_keyword_never_matches() {
        let (report, sent, _) = forward("bye\n\n", "").await;

        assert_eq!(report.exit, WorkerExit::InputClosed);
        assert_eq!(sent, "bye\n\n");
    }

    #[tokio::test]
    async fn stopped_signal_sends_nothing() {
        let signal = ShutdownSignal::new();
        signal.stop();
        let mut sink = Vec::new();

        let report = OutboundWriter::new("hello\n".as_bytes(), &mut sink, signal, "bye").run().await;

        assert_eq!(report, WorkerReport { exit: WorkerExit::Stopped, count: 0 });
        assert!(sink.is_empty());
    }
}
