//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding wire data.
///
/// Every variant except [`ProtocolError::Io`] means the peer sent something
/// whose structure could not be resolved. Sessions treat all of them as
/// terminal.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Record header does not start with the Parley magic number.
    #[error("invalid magic number: expected {expected:#010x}, got {found:#010x}")]
    InvalidMagic {
        /// Magic number this build understands
        expected: u32,
        /// Magic number found on the wire
        found: u32,
    },

    /// Record header carries a version this build cannot decode.
    #[error("unsupported record version: {0}")]
    UnsupportedVersion(u8),

    /// Record payload exceeds [`crate::RecordHeader::MAX_PAYLOAD_SIZE`].
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Claimed or actual payload size
        size: usize,
        /// Maximum allowed size
        max: usize,
    },

    /// Stream ended in the middle of a record.
    #[error("record truncated: expected {expected} bytes, got {actual}")]
    RecordTruncated {
        /// Bytes required
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// Message could not be serialized to CBOR.
    #[error("CBOR encode failed: {0}")]
    CborEncode(String),

    /// Record body is not a valid CBOR message.
    #[error("CBOR decode failed: {0}")]
    CborDecode(String),

    /// Underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// True when the error describes malformed data rather than a broken
    /// stream.
    pub fn is_malformed(&self) -> bool {
        match self {
            Self::Io(err) => err.kind() == std::io::ErrorKind::InvalidData,
            _ => true,
        }
    }
}
