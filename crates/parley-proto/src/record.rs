//! Framed CBOR records (OBJECT mode).
//!
//! Layout on the wire:
//! `[RecordHeader: 12 bytes, Big Endian] + [CBOR-encoded Message]`
//!
//! The header lets a reader size the body before touching it and reject
//! foreign or future streams without attempting a decode. Any header or body
//! that cannot be resolved to a [`Message`] is an error; readers never skip
//! a bad record.

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    Message,
    errors::{ProtocolError, Result},
};

/// Fixed 12-byte record header.
///
/// Fields are stored as byte arrays so every bit pattern is a valid value
/// and the struct has no padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct RecordHeader {
    magic: [u8; 4],        // 0x50524C59 ("PRLY")
    version: u8,           // 0x01
    flags: u8,             // reserved, zero
    reserved: [u8; 2],     // zero
    payload_size: [u8; 4], // u32 body length
}

const _: () = assert!(size_of::<RecordHeader>() == RecordHeader::SIZE);

impl RecordHeader {
    /// Size of the serialized header.
    pub const SIZE: usize = 12;

    /// Magic number: "PRLY" in ASCII.
    pub const MAGIC: u32 = 0x5052_4C59;

    /// Current record version.
    pub const VERSION: u8 = 0x01;

    /// Largest body a reader will allocate for (1 MiB).
    pub const MAX_PAYLOAD_SIZE: u32 = 1 << 20;

    /// Header for a body of `payload_size` bytes.
    pub fn new(payload_size: u32) -> Self {
        Self {
            magic: Self::MAGIC.to_be_bytes(),
            version: Self::VERSION,
            flags: 0,
            reserved: [0; 2],
            payload_size: payload_size.to_be_bytes(),
        }
    }

    /// Magic number field.
    pub fn magic(&self) -> u32 {
        u32::from_be_bytes(self.magic)
    }

    /// Version field.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Body length claimed by the header.
    pub fn payload_size(&self) -> u32 {
        u32::from_be_bytes(self.payload_size)
    }

    /// Serialize to wire bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out.copy_from_slice(self.as_bytes());
        out
    }

    /// Parse and validate a header from the front of `bytes`.
    ///
    /// # Errors
    ///
    /// - `RecordTruncated` if fewer than [`Self::SIZE`] bytes are given
    /// - `InvalidMagic`, `UnsupportedVersion`, `PayloadTooLarge` if the header
    ///   is well-sized but cannot be resolved
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (header, _) = Self::read_from_prefix(bytes).map_err(|_| {
            ProtocolError::RecordTruncated { expected: Self::SIZE, actual: bytes.len() }
        })?;
        header.validate()?;
        Ok(header)
    }

    fn validate(&self) -> Result<()> {
        if self.magic() != Self::MAGIC {
            return Err(ProtocolError::InvalidMagic { expected: Self::MAGIC, found: self.magic() });
        }
        if self.version() != Self::VERSION {
            return Err(ProtocolError::UnsupportedVersion(self.version()));
        }
        if self.payload_size() > Self::MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size: self.payload_size() as usize,
                max: Self::MAX_PAYLOAD_SIZE as usize,
            });
        }
        Ok(())
    }
}

/// Encode a message as one complete record.
pub fn encode_record(message: &Message) -> Result<Bytes> {
    let mut body = Vec::new();
    ciborium::into_writer(message, &mut body)
        .map_err(|e| ProtocolError::CborEncode(e.to_string()))?;

    let size = u32::try_from(body.len())
        .ok()
        .filter(|size| *size <= RecordHeader::MAX_PAYLOAD_SIZE)
        .ok_or(ProtocolError::PayloadTooLarge {
            size: body.len(),
            max: RecordHeader::MAX_PAYLOAD_SIZE as usize,
        })?;

    let mut buf = BytesMut::with_capacity(RecordHeader::SIZE + body.len());
    buf.put_slice(&RecordHeader::new(size).to_bytes());
    buf.put_slice(&body);
    Ok(buf.freeze())
}

/// Decode one complete record. Trailing bytes past the claimed body are
/// ignored.
pub fn decode_record(bytes: &[u8]) -> Result<Message> {
    let header = RecordHeader::from_bytes(bytes)?;
    let size = header.payload_size() as usize;
    let body = &bytes[RecordHeader::SIZE..];
    if body.len() < size {
        return Err(ProtocolError::RecordTruncated { expected: size, actual: body.len() });
    }
    decode_body(&body[..size])
}

/// Read the next record from `reader`.
///
/// Returns `Ok(None)` when the stream ends cleanly on a record boundary.
pub async fn read_record<R>(reader: &mut R) -> Result<Option<Message>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut header_buf = [0u8; RecordHeader::SIZE];
    let filled = fill(reader, &mut header_buf).await?;
    if filled == 0 {
        return Ok(None);
    }
    if filled < RecordHeader::SIZE {
        return Err(ProtocolError::RecordTruncated { expected: RecordHeader::SIZE, actual: filled });
    }

    let header = RecordHeader::from_bytes(&header_buf)?;
    let size = header.payload_size() as usize;
    let mut body = vec![0u8; size];
    let filled = fill(reader, &mut body).await?;
    if filled < size {
        return Err(ProtocolError::RecordTruncated { expected: size, actual: filled });
    }

    decode_body(&body).map(Some)
}

/// Write one record to `writer`. Does not flush.
pub async fn write_record<W>(writer: &mut W, message: &Message) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let record = encode_record(message)?;
    writer.write_all(&record).await?;
    Ok(())
}

fn decode_body(body: &[u8]) -> Result<Message> {
    ciborium::from_reader(body).map_err(|e| ProtocolError::CborDecode(e.to_string()))
}

/// Read until `buf` is full or the stream ends. Returns bytes read.
async fn fill<R>(reader: &mut R, buf: &mut [u8]) -> Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
