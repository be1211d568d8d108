//! Browser client and lifecycle.
//!
//! The [`Browser`] struct is the public request/response API over the framed
//! transport. Each instance owns its own server process, control connection,
//! cached protocol variants, and console-log cursor; instances never share a
//! process or socket.
//!
//! # Example
//!
//! ```no_run
//! use webkit_driver::Browser;
//!
//! # async fn example() -> webkit_driver::Result<()> {
//! let mut browser = Browser::builder()
//!     .binary("/gems/capybara-webkit-1.1.0/bin/webkit_server")
//!     .build();
//!
//! browser.start().await?;
//! browser.visit("http://example.com/").await?;
//! let title = browser.evaluate_script("document.title").await?;
//! browser.stop().await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::protocol::{Command, ProtocolVariants, ServerVersion};
use crate::server::ServerProcess;
use crate::transport::{DEFAULT_CONNECT_TIMEOUT, FramedChannel};

use super::ConsoleEntry;

// ============================================================================
// Constants
// ============================================================================

/// Default server binary name, resolved through `PATH`.
const DEFAULT_BINARY: &str = "webkit_server";

// ============================================================================
// Browser
// ============================================================================

/// A client session against one webkit_server process.
///
/// The protocol is strictly request/response with a single exchange in
/// flight, so all command methods take `&mut self`. Multiple concurrent
/// sessions require multiple `Browser` instances, each with its own
/// subprocess.
///
/// The child process is force-terminated on [`stop`](Browser::stop) and on
/// drop, whichever comes first.
pub struct Browser {
    /// Path to the webkit_server binary.
    binary: PathBuf,
    /// Timeout for establishing the control connection.
    connect_timeout: Duration,
    /// Whether to issue `IgnoreSslErrors` right after connecting.
    ignore_ssl_errors: bool,
    /// The supervised server process, while running.
    server: Option<ServerProcess>,
    /// The framed control connection.
    channel: FramedChannel,
    /// Version and protocol variants, computed once from the binary path.
    gate: OnceLock<(ServerVersion, ProtocolVariants)>,
    /// Last-seen console snapshot; new entries are diffed against its length.
    pub(crate) console_log: Vec<ConsoleEntry>,
}

// ============================================================================
// Browser - Display
// ============================================================================

impl fmt::Debug for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Browser")
            .field("binary", &self.binary)
            .field("running", &self.server.is_some())
            .field("port", &self.port())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Browser - Construction
// ============================================================================

impl Browser {
    /// Creates a configuration builder for the browser.
    #[inline]
    #[must_use]
    pub fn builder() -> BrowserBuilder {
        BrowserBuilder::new()
    }

    /// Creates a browser with default configuration for the given binary.
    #[inline]
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self::builder().binary(binary).build()
    }
}

impl Default for Browser {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

// ============================================================================
// Browser - Lifecycle
// ============================================================================

impl Browser {
    /// Starts the server process and establishes the control connection.
    ///
    /// A no-op when the session is already running. If the socket cannot be
    /// established, the freshly spawned process is terminated before the
    /// error is returned.
    ///
    /// # Errors
    ///
    /// - [`Error::BinaryNotFound`] / [`Error::Spawn`] / [`Error::PortDiscovery`]
    ///   if the process cannot be brought up
    /// - [`Error::ConnectTimeout`] / [`Error::Connection`] if the control
    ///   socket cannot be established
    pub async fn start(&mut self) -> Result<()> {
        if self.server.is_some() {
            return Ok(());
        }

        let server = ServerProcess::launch(&self.binary).await?;
        let port = server.port();
        self.server = Some(server);

        if let Err(e) = self.channel.connect(port, self.connect_timeout).await {
            self.stop().await;
            return Err(e);
        }

        if self.ignore_ssl_errors
            && let Err(e) = self.execute("IgnoreSslErrors", &[]).await
        {
            self.stop().await;
            return Err(e);
        }

        info!(port, "Browser session started");
        Ok(())
    }

    /// Stops the session: terminates the server process and closes the
    /// control connection.
    ///
    /// Idempotent; safe to call whether or not [`start`](Browser::start)
    /// ever succeeded. Termination acts on the process handle only and never
    /// blocks on the socket.
    pub async fn stop(&mut self) {
        if let Some(mut server) = self.server.take() {
            server.kill().await;
        }
        self.channel.disconnect();
        self.console_log.clear();
    }

    /// Returns `true` if the server process is running.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.server.as_ref().is_some_and(ServerProcess::is_alive)
    }

    /// Returns the discovered control port, if the session is running.
    #[inline]
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.server.as_ref().map(ServerProcess::port)
    }
}

// ============================================================================
// Browser - Version Gate
// ============================================================================

impl Browser {
    /// Returns the server version, extracted once from the binary path.
    #[must_use]
    pub fn server_version(&self) -> &ServerVersion {
        &self.gate().0
    }

    /// Returns the protocol variants selected for this session.
    #[inline]
    pub(crate) fn variants(&self) -> ProtocolVariants {
        self.gate().1
    }

    fn gate(&self) -> &(ServerVersion, ProtocolVariants) {
        self.gate.get_or_init(|| {
            let version = ServerVersion::from_binary_path(&self.binary);
            let variants = ProtocolVariants::for_version(&version);
            debug!(version = %version, ?variants, "Protocol variants selected");
            (version, variants)
        })
    }
}

// ============================================================================
// Browser - Command Exchange
// ============================================================================

impl Browser {
    /// Sends a named command with string arguments and returns the payload.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] if the session is not started
    /// - [`Error::Command`] if the server answers a non-"ok" status; it
    ///   carries the failure payload byte-exact
    /// - [`Error::ConnectionLost`] if the stream closes mid-response
    pub async fn execute(&mut self, name: &str, args: &[&str]) -> Result<Vec<u8>> {
        self.execute_command(Command::with_args(name, args)).await
    }

    /// Sends a prebuilt command frame and returns the payload.
    ///
    /// This is the raw escape hatch for commands with non-UTF-8 arguments.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Browser::execute).
    pub async fn execute_command(&mut self, command: Command) -> Result<Vec<u8>> {
        debug!(command = %command, "Executing command");

        self.channel.send_command(&command).await?;

        let status = self.channel.read_status_line().await?;
        if status != "ok" {
            let payload = self.channel.read_payload().await?;
            debug!(command = command.name(), status = %status, "Command rejected");
            return Err(Error::command(payload));
        }

        self.channel.read_payload().await
    }

    /// Like [`execute`](Browser::execute), decoding the payload as UTF-8.
    pub(crate) async fn execute_text(&mut self, name: &str, args: &[&str]) -> Result<String> {
        let payload = self.execute(name, args).await?;
        String::from_utf8(payload)
            .map_err(|_| Error::invalid_response(format!("{name} payload is not valid UTF-8")))
    }
}

// ============================================================================
// Browser - Node Invocation
// ============================================================================

impl Browser {
    /// Finds all nodes matching an XPath query.
    ///
    /// Returns the server's opaque node ids in the order the server yields
    /// them; an empty result is an empty vector, not an error.
    pub async fn find(&mut self, query: &str) -> Result<Vec<String>> {
        let payload = self.execute_text("FindXpath", &[query]).await?;
        if payload.is_empty() {
            return Ok(Vec::new());
        }
        Ok(payload.split(',').map(str::to_string).collect())
    }

    /// Finds the first node matching an XPath query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementNotFound`] when the query matches nothing.
    pub async fn find_one(&mut self, query: &str) -> Result<String> {
        let mut nodes = self.find(query).await?;
        if nodes.is_empty() {
            return Err(Error::element_not_found(query));
        }
        Ok(nodes.remove(0))
    }

    /// Invokes a JavaScript-side node function on the server.
    ///
    /// Servers from 1.1.0 onward expect a literal `"true"` allow-unattached
    /// flag inserted as the second argument; earlier servers reject it. The
    /// shape is selected once per session from the version gate.
    pub async fn invoke(&mut self, function: &str, node: &str, extra: &[&str]) -> Result<String> {
        let mut command = Command::new("Node");
        command.push_arg(function);
        if self.variants().invoke_allow_unattached {
            command.push_arg("true");
        }
        command.push_arg(node);
        for arg in extra {
            command.push_arg(arg);
        }

        let payload = self.execute_command(command).await?;
        String::from_utf8(payload)
            .map_err(|_| Error::invalid_response("Node payload is not valid UTF-8".to_string()))
    }

    /// Resizes the browser window.
    ///
    /// Servers from 1.2 onward address a window handle as the first
    /// argument; earlier servers take only the dimensions. A missing handle
    /// is sent as an empty argument on the newer shape.
    pub async fn resize_window(
        &mut self,
        width: u32,
        height: u32,
        handle: Option<&str>,
    ) -> Result<()> {
        let width = width.to_string();
        let height = height.to_string();

        let args: Vec<&str> = if self.variants().resize_takes_handle {
            vec![handle.unwrap_or(""), &width, &height]
        } else {
            vec![&width, &height]
        };

        self.execute("ResizeWindow", &args).await?;
        Ok(())
    }
}

// ============================================================================
// BrowserBuilder
// ============================================================================

/// Builder for configuring a [`Browser`] instance.
///
/// Use [`Browser::builder()`] to create a new builder.
#[derive(Debug, Clone)]
pub struct BrowserBuilder {
    /// Path to the webkit_server binary.
    binary: PathBuf,
    /// Timeout for establishing the control connection.
    connect_timeout: Duration,
    /// Whether to issue `IgnoreSslErrors` right after connecting.
    ignore_ssl_errors: bool,
}

impl Default for BrowserBuilder {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            ignore_ssl_errors: false,
        }
    }
}

impl BrowserBuilder {
    /// Creates a new builder with default configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path to the webkit_server binary.
    #[inline]
    #[must_use]
    pub fn binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = path.into();
        self
    }

    /// Sets the control-connection timeout (default 5 s).
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Instructs the server to ignore SSL certificate errors.
    ///
    /// Issued as an `IgnoreSslErrors` command right after connecting.
    #[inline]
    #[must_use]
    pub fn ignore_ssl_errors(mut self) -> Self {
        self.ignore_ssl_errors = true;
        self
    }

    /// Builds the browser. No process is spawned until
    /// [`start`](Browser::start).
    #[must_use]
    pub fn build(self) -> Browser {
        Browser {
            binary: self.binary,
            connect_timeout: self.connect_timeout,
            ignore_ssl_errors: self.ignore_ssl_errors,
            server: None,
            channel: FramedChannel::new(),
            gate: OnceLock::new(),
            console_log: Vec::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let browser = Browser::builder().build();
        assert_eq!(browser.binary, PathBuf::from("webkit_server"));
        assert_eq!(browser.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert!(!browser.ignore_ssl_errors);
        assert!(!browser.is_running());
        assert_eq!(browser.port(), None);
    }

    #[test]
    fn test_version_gate_computed_from_binary_path() {
        let browser = Browser::new("/gems/capybara-webkit-1.2.0/bin/webkit_server");
        assert_eq!(
            browser.server_version(),
            &ServerVersion::parse("1.2.0")
        );
        assert!(browser.variants().invoke_allow_unattached);
        assert!(browser.variants().resize_takes_handle);
    }

    #[test]
    fn test_version_gate_defaults_without_gem_path() {
        let browser = Browser::new("webkit_server");
        assert_eq!(browser.server_version(), &ServerVersion::parse("0.0.0"));
        assert!(!browser.variants().invoke_allow_unattached);
    }

    #[tokio::test]
    async fn test_execute_before_start_is_not_connected() {
        let mut browser = Browser::default();
        let err = browser.execute("Reset", &[]).await.unwrap_err();
        assert!(matches!(err, Error::NotConnected));
    }

    #[tokio::test]
    async fn test_stop_without_start_is_safe() {
        let mut browser = Browser::default();
        browser.stop().await;
        browser.stop().await;
        assert!(!browser.is_running());
    }

    #[test]
    fn test_browser_is_debug() {
        fn assert_debug<T: std::fmt::Debug>() {}
        assert_debug::<Browser>();
    }
}
