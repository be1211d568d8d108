//! Browser client: session lifecycle, command exchange, and automation verbs.
//!
//! [`Browser`] is the public API. One instance drives one webkit_server
//! process over one control connection, strictly one command at a time.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Client struct, builder, lifecycle, command exchange |
//! | `console` | Console log snapshots and the JS error check |
//! | `script` | `Evaluate` / `Execute` with console bracketing |
//! | `page` | Navigation, page state, headers, rendering |
//! | `elements` | Invoke-based element verbs |
//! | `session` | Cookies and proxy configuration |

// ============================================================================
// Submodules
// ============================================================================

/// Client struct, builder, lifecycle, and the command exchange.
pub mod core;

/// Console log snapshots and the JavaScript error check.
pub mod console;

/// Invoke-based element verbs.
pub mod elements;

/// Navigation and page-state commands.
pub mod page;

/// JavaScript evaluation and execution.
pub mod script;

/// Cookie and proxy session state.
pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

pub use console::ConsoleEntry;
pub use self::core::{Browser, BrowserBuilder};
pub use page::FrameLocator;
pub use session::ProxyConfig;
