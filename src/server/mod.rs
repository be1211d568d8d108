//! webkit_server process supervision.
//!
//! This module owns the child process: spawning, port discovery from the
//! startup line, and unconditional termination on stop or drop.
//!
//! ```text
//! ┌──────────────┐   spawn + stdout line    ┌────────────────┐
//! │ ServerProcess│─────────────────────────►│ webkit_server  │
//! │ (supervisor) │   kill on stop/drop      │ (child)        │
//! └──────────────┘                          └────────────────┘
//! ```
//!
//! Exactly one subprocess is alive per supervisor instance; instances never
//! share a process.

// ============================================================================
// Submodules
// ============================================================================

/// Process launch, port discovery, and the kill-on-drop guard.
pub mod process;

// ============================================================================
// Re-exports
// ============================================================================

pub use process::ServerProcess;
