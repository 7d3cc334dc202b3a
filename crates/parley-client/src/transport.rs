//! Transport modes and worker outcomes.

use std::{fmt, io, str::FromStr};

use parley_proto::{Message, ProtocolError, write_record};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// User-facing sink that receives a copy of every inbound message.
pub type EchoSink = Box<dyn AsyncWrite + Unpin + Send>;

/// How the server stream (and the echo sink) carry messages.
///
/// Chosen once per session. Outbound traffic is text lines in both modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportMode {
    /// Newline-terminated lines in the text line format.
    #[default]
    Text,
    /// Framed CBOR records.
    Object,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Object => f.write_str("object"),
        }
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "object" => Ok(Self::Object),
            other => Err(format!("unknown transport mode '{other}' (expected text or object)")),
        }
    }
}

/// Why a worker loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The signal was stopped by the other worker or by the handle.
    Stopped,
    /// The worker's input reached end of stream.
    InputClosed,
    /// Reading the worker's input failed.
    ReadFailed,
    /// The server sent data that could not be resolved to a message.
    Malformed,
    /// Writing to the server failed.
    WriteFailed,
    /// Writing to the echo sink failed.
    EchoFailed,
    /// The user sent the terminate keyword.
    Terminated,
}

impl WorkerExit {
    /// True for exits caused by an I/O or protocol failure.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::ReadFailed | Self::Malformed | Self::WriteFailed | Self::EchoFailed)
    }
}

/// What one worker did before it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    /// Why the loop ended.
    pub exit: WorkerExit,
    /// Messages received (inbound) or lines sent (outbound).
    pub count: usize,
}

/// Write `line` plus a newline and flush.
pub(crate) async fn send_line<W>(writer: &mut W, line: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

/// Write one message to the echo sink in `mode` and flush.
pub(crate) async fn write_echo<W>(
    writer: &mut W,
    mode: TransportMode,
    message: &Message,
) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    match mode {
        TransportMode::Text => send_line(writer, &message.to_line()).await?,
        TransportMode::Object => {
            write_record(writer, message).await?;
            writer.flush().await?;
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use parley_proto::decode_record;

    use super::*;

    #[test]
    fn parse_mode() {
        assert_eq!("TEXT".parse::<TransportMode>(), Ok(TransportMode::Text));
        assert_eq!("object".parse::<TransportMode>(), Ok(TransportMode::Object));
        assert!("json".parse::<TransportMode>().is_err());
    }

    #[test]
    fn failure_classification() {
        assert!(WorkerExit::Malformed.is_failure());
        assert!(!WorkerExit::Terminated.is_failure());
        assert!(!WorkerExit::InputClosed.is_failure());
    }

    #[tokio::test]
    async fn echo_formats() {
        let msg = Message::new("alice", "hi", Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());

        let mut text = Vec::new();
        write_echo(&mut text, TransportMode::Text, &msg).await.unwrap();
        assert_eq!(text, b"[2024/01/02 03:04:05] alice > hi\n");

        let mut object = Vec::new();
        write_echo(&mut object, TransportMode::Object, &msg).await.unwrap();
        assert_eq!(decode_record(&object).unwrap(), msg);
    }
}
