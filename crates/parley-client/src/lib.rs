//! Parley session engine
//!
//! One [`Session`] is one connection's lifetime. It runs two workers in
//! parallel:
//!
//! - [`InboundReader`]: server stream → [`parley_app::ChatView`] (and an
//!   optional echo sink)
//! - [`OutboundWriter`]: user input → server stream
//!
//! Both watch a single [`ShutdownSignal`]. Whichever worker hits a terminal
//! condition first flips it, and the other one exits at its next check.
//! Nothing reconnects: a new connection is a new session.

#![forbid(unsafe_code)]

pub mod error;
pub mod inbound;
pub mod outbound;
pub mod pipe;
pub mod session;
pub mod signal;
pub mod transport;

pub use error::SessionError;
pub use inbound::InboundReader;
pub use outbound::OutboundWriter;
pub use pipe::{InputSender, input_pipe};
pub use session::{Session, SessionConfig, SessionHandle, SessionReport};
pub use signal::ShutdownSignal;
pub use transport::{EchoSink, TransportMode, WorkerExit, WorkerReport};
