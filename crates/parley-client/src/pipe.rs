//! In-process user input stream.
//!
//! Lets a UI controller feed the outbound worker without a terminal: the
//! [`InputSender`] half writes lines, the [`DuplexStream`] half is the
//! worker's input.

use std::io;

use parley_app::ViewAction;
use tokio::io::{AsyncWriteExt, DuplexStream};

use crate::transport::send_line;

const PIPE_CAPACITY: usize = 64 * 1024;

/// Create a connected pair: a line sender and the input stream it feeds.
pub fn input_pipe() -> (InputSender, DuplexStream) {
    let (tx, rx) = tokio::io::duplex(PIPE_CAPACITY);
    (InputSender { tx }, rx)
}

/// Write half of [`input_pipe`].
#[derive(Debug)]
pub struct InputSender {
    tx: DuplexStream,
}

impl InputSender {
    /// Send one line of user input.
    pub async fn send_line(&mut self, line: &str) -> io::Result<()> {
        send_line(&mut self.tx, line).await
    }

    /// Carry out controller actions in order.
    ///
    /// Returns `true` once a [`ViewAction::Quit`] is reached; actions after it
    /// are not performed.
    pub async fn forward(&mut self, actions: Vec<ViewAction>) -> io::Result<bool> {
        for action in actions {
            match action {
                ViewAction::Send(line) => self.send_line(&line).await?,
                ViewAction::Quit => return Ok(true),
                ViewAction::Render => {},
            }
        }
        Ok(false)
    }

    /// Close the input. The reading side sees end of stream.
    pub async fn close(mut self) -> io::Result<()> {
        self.tx.shutdown().await
    }
}
