//! Parley protocol types
//!
//! The message model shared by every Parley component, plus the two wire
//! formats a session can speak with its server:
//!
//! - [`line`]: newline-terminated text, `[YYYY/MM/DD HH:MM:SS] author > content`
//! - [`record`]: framed CBOR records with a fixed binary header
//!
//! The [`vocabulary`] module names the control keywords that travel as plain
//! text in both modes.

#![forbid(unsafe_code)]

pub mod errors;
pub mod line;
pub mod message;
pub mod record;
pub mod vocabulary;

pub use errors::{ProtocolError, Result};
pub use line::parse_author;
pub use message::Message;
pub use record::{RecordHeader, decode_record, encode_record, read_record, write_record};
pub use vocabulary::Command;
