//! webkit_server process supervision.
//!
//! Launches the server binary as a child process, discovers the port it
//! bound from its first stdout line, and guarantees the child is terminated
//! on every exit path of the owning scope.
//!
//! # Lifecycle
//!
//! 1. [`ServerProcess::launch`] - Existence check, spawn with piped stdio
//! 2. Read exactly one stdout line, match `listening on port: <digits>`
//! 3. Commands flow over a separate TCP socket (see `transport`)
//! 4. [`ServerProcess::kill`] - Force-terminate; also runs on drop
//!
//! Termination is unconditional: there is no graceful shutdown negotiation
//! with the server, and killing acts on the process handle only, never on
//! the socket.

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::path::Path;
use std::process::Stdio;
use std::sync::LazyLock;

use regex::Regex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tracing::{debug, info};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Pattern the server prints once it has bound its control port.
static PORT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"listening on port: (\d+)").expect("valid port pattern"));

// ============================================================================
// ProcessGuard
// ============================================================================

/// Guards the child process and ensures it is killed when dropped.
#[derive(Debug)]
struct ProcessGuard {
    /// The child process handle.
    child: Option<Child>,
    /// Process ID for logging.
    pid: u32,
}

impl ProcessGuard {
    /// Creates a new process guard.
    fn new(child: Child) -> Self {
        let pid = child.id().unwrap_or(0);
        debug!(pid, "Process guard created");
        Self {
            child: Some(child),
            pid,
        }
    }

    /// Kills the process and waits for it to exit.
    ///
    /// Idempotent: calling again after the child is gone is a no-op.
    async fn kill(&mut self) {
        if let Some(mut child) = self.child.take() {
            debug!(pid = self.pid, "Killing webkit_server process");
            if let Err(e) = child.kill().await {
                debug!(pid = self.pid, error = %e, "Failed to kill process");
            }
            if let Err(e) = child.wait().await {
                debug!(pid = self.pid, error = %e, "Failed to wait for process");
            }
            info!(pid = self.pid, "webkit_server terminated");
        }
    }

    /// Returns the process ID.
    #[inline]
    fn pid(&self) -> u32 {
        self.pid
    }

    /// Returns `true` if the child has not been explicitly killed.
    #[inline]
    fn is_alive(&self) -> bool {
        self.child.is_some()
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take()
            && let Err(e) = child.start_kill()
        {
            debug!(pid = self.pid, error = %e, "Failed to send kill signal in Drop");
        }
    }
}

// ============================================================================
// ServerProcess
// ============================================================================

/// A supervised webkit_server child process.
///
/// Owns the child handle exclusively. The control port is discovered once at
/// launch and is immutable for the lifetime of the process.
#[derive(Debug)]
pub struct ServerProcess {
    /// Protected process handle.
    guard: ProcessGuard,
    /// Discovered control port.
    port: u16,
    /// The server's stdout, held open past port discovery.
    _stdout: BufReader<ChildStdout>,
}

impl ServerProcess {
    /// Launches the server binary and discovers its control port.
    ///
    /// All three standard streams are piped, never inherited. Exactly one
    /// line is read from the child's stdout; it must match
    /// `listening on port: <digits>`.
    ///
    /// # Errors
    ///
    /// - [`Error::BinaryNotFound`] if `binary` does not exist
    /// - [`Error::Spawn`] if the OS fails to start the process
    /// - [`Error::PortDiscovery`] if the startup line is absent or malformed
    pub async fn launch(binary: &Path) -> Result<Self> {
        if !binary.exists() {
            return Err(Error::binary_not_found(binary));
        }

        let mut child = Command::new(binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(Error::spawn)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::spawn(IoError::other("stdout pipe unavailable")))?;
        let mut stdout = BufReader::new(stdout);

        let mut line = String::new();
        let read = stdout.read_line(&mut line).await?;
        if read == 0 {
            return Err(Error::port_discovery(""));
        }

        let port = discover_port(&line)?;
        let guard = ProcessGuard::new(child);
        info!(pid = guard.pid(), port, "webkit_server started");

        Ok(Self {
            guard,
            port,
            _stdout: stdout,
        })
    }

    /// Returns the discovered control port.
    #[inline]
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the server's process ID.
    #[inline]
    #[must_use]
    pub fn pid(&self) -> u32 {
        self.guard.pid()
    }

    /// Returns `true` if the child has not been explicitly killed.
    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.guard.is_alive()
    }

    /// Force-terminates the server process.
    ///
    /// Idempotent and safe to call mid-command; it never touches the socket.
    pub async fn kill(&mut self) {
        self.guard.kill().await;
    }
}

// ============================================================================
// Port Discovery
// ============================================================================

/// Extracts the control port from the server's startup line.
fn discover_port(line: &str) -> Result<u16> {
    PORT_PATTERN
        .captures(line)
        .and_then(|captures| captures[1].parse::<u16>().ok())
        .ok_or_else(|| Error::port_discovery(line.trim_end()))
}

// ============================================================================
// Tests
// ============================================================================
