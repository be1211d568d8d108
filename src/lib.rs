//! webkit-driver - Client for capybara-webkit's `webkit_server`.
//!
//! This library drives a headless WebKit server process over its private
//! length-framed TCP protocol: navigation, DOM queries, JavaScript
//! execution, and form interaction for automated-testing clients.
//!
//! # Architecture
//!
//! The driver follows a client-server model:
//!
//! - **Client (Rust)**: spawns the server, frames commands, decodes responses
//! - **Server (webkit_server)**: renders pages and executes the commands
//!
//! Key design principles:
//!
//! - Each [`Browser`] owns: server process + control socket + version gate
//! - Strictly one command in flight; the protocol is synchronous
//!   request/response with no pipelining
//! - The child process is force-terminated on stop and on drop, so it is
//!   never leaked regardless of how the client terminates
//! - Version-conditioned command shapes are selected once per session
//!
//! # Quick Start
//!
//! ```no_run
//! use webkit_driver::{Browser, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut browser = Browser::builder()
//!         .binary("/gems/capybara-webkit-1.1.0/bin/webkit_server")
//!         .build();
//!
//!     browser.start().await?;
//!     browser.visit("https://example.com").await?;
//!
//!     let node = browser.find_one("//h1").await?;
//!     let tag = browser.invoke("tagName", &node, &[]).await?;
//!     println!("First heading: {tag}");
//!
//!     browser.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`browser`] | The [`Browser`] client and automation verbs |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`protocol`] | Command frames and version gating (internal) |
//! | [`server`] | Process supervision and port discovery |
//! | [`transport`] | Framed TCP transport layer (internal) |

// ============================================================================
// Modules
// ============================================================================

/// The browser client and its automation verbs.
pub mod browser;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Wire protocol types: command frames and version-gated variants.
pub mod protocol;

/// webkit_server process supervision.
pub mod server;

/// Framed TCP transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Browser types
pub use browser::{Browser, BrowserBuilder, ConsoleEntry, FrameLocator, ProxyConfig};

// Error types
pub use error::{Error, Result};

// Protocol types
pub use protocol::{Command, ProtocolVariants, ServerVersion};

// Process and transport types
pub use server::ServerProcess;
pub use transport::{DEFAULT_CONNECT_TIMEOUT, FramedChannel};
