//! Wire protocol types.
//!
//! This module defines the message format spoken with webkit_server over
//! its control socket.
//!
//! # Protocol Overview
//!
//! Every exchange is strictly request/response, one command in flight at a
//! time:
//!
//! ```text
//! client → server    <name>\n<argCount>\n(<len>\n<raw bytes>)*
//! server → client    <status>\n<payloadLen>\n<payload raw bytes>
//! ```
//!
//! A status line of exactly `ok` signals success; any other content is a
//! server-side failure whose detail arrives in the payload.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Command frames and wire encoding |
//! | `version` | Server version extraction and protocol variants |

// ============================================================================
// Submodules
// ============================================================================

/// Command frames and their wire encoding.
pub mod command;

/// Server version extraction and version-gated protocol variants.
pub mod version;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::Command;
pub use version::{ProtocolVariants, ServerVersion};
