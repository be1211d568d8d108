//! Error types for the webkit_server driver.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use webkit_driver::{Browser, Result};
//!
//! async fn example(browser: &mut Browser) -> Result<()> {
//!     browser.visit("http://example.com/").await?;
//!     let node = browser.find_one("//a").await?;
//!     browser.invoke("leftClick", &node, &[]).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Startup | [`Error::BinaryNotFound`], [`Error::Spawn`], [`Error::PortDiscovery`] |
//! | Transport | [`Error::ConnectTimeout`], [`Error::Connection`], [`Error::ConnectionLost`], [`Error::NotConnected`] |
//! | Protocol | [`Error::Command`], [`Error::InvalidResponse`] |
//! | Browser | [`Error::ElementNotFound`], [`Error::JavaScript`] |
//! | External | [`Error::Io`], [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error;

use crate::browser::ConsoleEntry;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Startup Errors
    // ========================================================================
    /// webkit_server binary not found at path.
    ///
    /// Returned before any process or socket activity when the configured
    /// binary path does not exist.
    #[error("webkit_server not found at: {path}")]
    BinaryNotFound {
        /// Path where the server binary was expected.
        path: PathBuf,
    },

    /// Failed to spawn the webkit_server process.
    ///
    /// Returned when the OS refuses to launch the child process.
    #[error("failed to launch webkit_server: {message}")]
    Spawn {
        /// Description of the spawn failure.
        message: String,
    },

    /// Could not discover the server port from its startup output.
    ///
    /// The first stdout line must match `listening on port: <digits>`.
    #[error("could not discover server port from startup line: {line:?}")]
    PortDiscovery {
        /// The startup line that failed to match.
        line: String,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Connection to the server socket timed out.
    ///
    /// Returned when the control socket cannot be established in time.
    #[error("connection to webkit_server timed out after {timeout_ms}ms")]
    ConnectTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Connection to the server socket failed.
    #[error("connection to webkit_server failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Connection closed by the server mid-exchange.
    ///
    /// Returned when the stream signals end-of-file while a status line or
    /// payload is still owed.
    #[error("connection to webkit_server lost")]
    ConnectionLost,

    /// A command was issued before a connection was established.
    #[error("not connected to webkit_server")]
    NotConnected,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// The server answered a command with a non-"ok" status.
    ///
    /// Carries the server's error payload byte-exact; display renders it
    /// as UTF-8 with lossy replacement.
    #[error("{}", String::from_utf8_lossy(.message))]
    Command {
        /// Error payload returned by the server, verbatim.
        message: Vec<u8>,
    },

    /// The server sent a frame the client cannot interpret.
    ///
    /// Returned for malformed length headers or payloads that fail to parse
    /// as the expected type.
    #[error("invalid server response: {message}")]
    InvalidResponse {
        /// Description of the malformed response.
        message: String,
    },

    // ========================================================================
    // Browser Errors
    // ========================================================================
    /// An XPath query matched no elements.
    #[error("element not found: {query}")]
    ElementNotFound {
        /// The XPath query that matched nothing.
        query: String,
    },

    /// The console log gained an error entry after a script ran.
    ///
    /// Carries every console entry appended since the last check, not only
    /// the offending one.
    #[error("JavaScript error occurred: {entries:?}")]
    JavaScript {
        /// Console entries appended since the previous snapshot.
        entries: Vec<ConsoleEntry>,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a binary not found error.
    #[inline]
    pub fn binary_not_found(path: impl Into<PathBuf>) -> Self {
        Self::BinaryNotFound { path: path.into() }
    }

    /// Creates a spawn error from the OS-level failure.
    #[inline]
    pub fn spawn(err: IoError) -> Self {
        Self::Spawn {
            message: err.to_string(),
        }
    }

    /// Creates a port discovery error.
    #[inline]
    pub fn port_discovery(line: impl Into<String>) -> Self {
        Self::PortDiscovery { line: line.into() }
    }

    /// Creates a connect timeout error.
    #[inline]
    pub fn connect_timeout(timeout_ms: u64) -> Self {
        Self::ConnectTimeout { timeout_ms }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a command error carrying the server's error payload.
    #[inline]
    pub fn command(message: impl Into<Vec<u8>>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }

    /// Creates an invalid response error.
    #[inline]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates an element not found error.
    #[inline]
    pub fn element_not_found(query: impl Into<String>) -> Self {
        Self::ElementNotFound {
            query: query.into(),
        }
    }

    /// Creates a JavaScript error from freshly appended console entries.
    #[inline]
    pub fn javascript(entries: Vec<ConsoleEntry>) -> Self {
        Self::JavaScript { entries }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a startup error.
    ///
    /// Startup errors are fatal and occur before any command exchange.
    #[inline]
    #[must_use]
    pub fn is_startup_error(&self) -> bool {
        matches!(
            self,
            Self::BinaryNotFound { .. } | Self::Spawn { .. } | Self::PortDiscovery { .. }
        )
    }

    /// Returns `true` if this is a transport error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::ConnectTimeout { .. }
                | Self::Connection { .. }
                | Self::ConnectionLost
                | Self::NotConnected
        )
    }

    /// Returns `true` if the caller can reasonably handle this error and
    /// keep the session alive.
    ///
    /// Command rejections and empty find results leave the connection in a
    /// usable state; everything else is fatal to the session.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Command { .. } | Self::ElementNotFound { .. } | Self::JavaScript { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = Error::connection("refused");
        assert_eq!(
            err.to_string(),
            "connection to webkit_server failed: refused"
        );
    }

    #[test]
    fn test_command_error_carries_payload_verbatim() {
        let err = Error::command("Unable to load URL: http://example.com/");
        assert_eq!(err.to_string(), "Unable to load URL: http://example.com/");
    }

    #[test]
    fn test_command_error_preserves_non_utf8_payload_bytes() {
        let payload = b"load failed: \xff\xfe tail".to_vec();
        let err = Error::command(payload.clone());

        match &err {
            Error::Command { message } => assert_eq!(message, &payload),
            other => panic!("unexpected error: {other}"),
        }
        // Display degrades lossily but never panics.
        assert!(err.to_string().starts_with("load failed:"));
    }

    #[test]
    fn test_binary_not_found_display() {
        let err = Error::binary_not_found("/opt/webkit_server");
        assert_eq!(
            err.to_string(),
            "webkit_server not found at: /opt/webkit_server"
        );
    }

    #[test]
    fn test_is_startup_error() {
        let spawn_err = Error::spawn(IoError::new(ErrorKind::PermissionDenied, "denied"));
        let port_err = Error::port_discovery("garbage");
        let other_err = Error::connection("test");

        assert!(spawn_err.is_startup_error());
        assert!(port_err.is_startup_error());
        assert!(!other_err.is_startup_error());
    }

    #[test]
    fn test_is_connection_error() {
        let timeout_err = Error::connect_timeout(5000);
        let lost_err = Error::ConnectionLost;
        let not_connected = Error::NotConnected;
        let other_err = Error::command("test");

        assert!(timeout_err.is_connection_error());
        assert!(lost_err.is_connection_error());
        assert!(not_connected.is_connection_error());
        assert!(!other_err.is_connection_error());
    }

    #[test]
    fn test_is_recoverable() {
        let command_err = Error::command("click failed");
        let not_found = Error::element_not_found("//a[@id='missing']");
        let lost_err = Error::ConnectionLost;

        assert!(command_err.is_recoverable());
        assert!(not_found.is_recoverable());
        assert!(!lost_err.is_recoverable());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
