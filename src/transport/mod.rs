//! Framed TCP transport layer.
//!
//! This module owns the single control connection to webkit_server and the
//! byte-level framing spoken over it.
//!
//! ```text
//! ┌──────────────┐                              ┌─────────────────┐
//! │ Browser      │         TCP socket           │  webkit_server  │
//! │              │◄────────────────────────────►│                 │
//! │ FramedChannel│      localhost:PORT          │  control loop   │
//! └──────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `FramedChannel::connect` - Dial the discovered port (5 s timeout)
//! 2. `FramedChannel::send_command` - Write one framed command in full
//! 3. `read_status_line` / `read_payload` - Read the framed response
//! 4. `FramedChannel::disconnect` - Close on stop; idempotent

// ============================================================================
// Submodules
// ============================================================================

/// The framed control connection.
pub mod channel;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{DEFAULT_CONNECT_TIMEOUT, FramedChannel};
