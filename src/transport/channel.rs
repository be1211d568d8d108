//! Framed TCP channel to webkit_server.
//!
//! Owns the single control connection and implements the byte-level wire
//! grammar: length-prefixed command writes, the status line, and payload
//! reassembly.
//!
//! The channel is strictly serial. Writes for one command complete in full
//! before its status line and payload are read, and there is never more than
//! one exchange in flight. Only the initial connect carries a timeout; once
//! a command has been accepted, reads block until the server answers or the
//! connection is lost.

// ============================================================================
// Imports
// ============================================================================

use std::io::ErrorKind;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::protocol::Command;

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for establishing the control connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// FramedChannel
// ============================================================================

/// A framed, strictly request/response TCP channel.
///
/// At most one live connection exists per channel instance. The stream is
/// buffered for line reads; raw payload bytes are read through the same
/// buffer so no data is lost between the two modes.
#[derive(Debug, Default)]
pub struct FramedChannel {
    /// The control connection, when established.
    stream: Option<BufReader<TcpStream>>,
}

impl FramedChannel {
    /// Creates a channel with no connection.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a connection is established.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Opens the control connection to `localhost:<port>`.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectTimeout`] if the connection is not established
    ///   within `connect_timeout`
    /// - [`Error::Connection`] if the connection attempt fails outright
    pub async fn connect(&mut self, port: u16, connect_timeout: Duration) -> Result<()> {
        debug!(port, "Connecting to webkit_server");

        let stream = timeout(connect_timeout, TcpStream::connect(("localhost", port)))
            .await
            .map_err(|_| Error::connect_timeout(connect_timeout.as_millis() as u64))?
            .map_err(|e| Error::connection(e.to_string()))?;

        self.stream = Some(BufReader::new(stream));
        debug!(port, "Control connection established");
        Ok(())
    }

    /// Closes the connection if open.
    ///
    /// Idempotent; safe to call when never connected.
    pub fn disconnect(&mut self) {
        if self.stream.take().is_some() {
            debug!("Control connection closed");
        }
    }

    /// Writes one command frame in full.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] if no connection is established
    /// - [`Error::Io`] if the write fails
    pub async fn send_command(&mut self, command: &Command) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!(command = %command, "Sending command frame");
        stream.write_all(&command.to_wire()).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Reads one newline-terminated status line and returns it trimmed.
    ///
    /// The literal string `ok` signals success; any other content is a
    /// failure whose detail follows in the payload.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] if no connection is established
    /// - [`Error::ConnectionLost`] if the stream closes before a full line
    ///   arrives; an unterminated fragment is never trusted as a status
    pub async fn read_status_line(&mut self) -> Result<String> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        let mut line = String::new();
        let read = stream.read_line(&mut line).await?;
        if read == 0 || !line.ends_with('\n') {
            return Err(Error::ConnectionLost);
        }

        Ok(line.trim().to_string())
    }

    /// Reads one length-prefixed payload.
    ///
    /// The decimal byte count arrives on its own line; a count of zero yields
    /// an empty payload immediately. Short reads are reassembled until the
    /// declared count is reached.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] if no connection is established
    /// - [`Error::InvalidResponse`] if the length header is malformed
    /// - [`Error::ConnectionLost`] if the stream closes mid-payload
    pub async fn read_payload(&mut self) -> Result<Vec<u8>> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        let mut header = String::new();
        let read = stream.read_line(&mut header).await?;
        if read == 0 || !header.ends_with('\n') {
            return Err(Error::ConnectionLost);
        }

        let length: usize = header
            .trim()
            .parse()
            .map_err(|_| Error::invalid_response(format!("bad payload length: {header:?}")))?;

        if length == 0 {
            return Ok(Vec::new());
        }

        let mut payload = vec![0u8; length];
        stream.read_exact(&mut payload).await.map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                Error::ConnectionLost
            } else {
                Error::Io(e)
            }
        })?;

        trace!(length, "Payload read");
        Ok(payload)
    }
}

// ============================================================================
// Tests
// ============================================================================
