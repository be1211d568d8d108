//! Navigation and page-state commands.
//!
//! Each method is a thin mapping onto the generic command exchange with a
//! fixed command name and argument order; the server is a fixed external
//! binary that rejects mismatched frames, so these shapes are not
//! negotiable.

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::Command;

use super::Browser;

// ============================================================================
// FrameLocator
// ============================================================================

/// Addresses a frame for [`Browser::frame_focus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameLocator {
    /// The top-level frame (leaves any focused frame).
    Top,
    /// A frame addressed by name or id.
    Name(String),
    /// A frame addressed by zero-based index.
    Index(u32),
}

// ============================================================================
// Browser - Navigation
// ============================================================================

impl Browser {
    /// Navigates to a URL.
    pub async fn visit(&mut self, url: &str) -> Result<()> {
        debug!(url, "Visiting");
        self.execute("Visit", &[url]).await?;
        Ok(())
    }

    /// Returns the current URL.
    pub async fn current_url(&mut self) -> Result<String> {
        self.execute_text("CurrentUrl", &[]).await
    }

    /// Resets the browser session on the server (cookies, headers, history).
    pub async fn reset(&mut self) -> Result<()> {
        self.execute("Reset", &[]).await?;
        Ok(())
    }

    /// Moves frame focus.
    pub async fn frame_focus(&mut self, locator: FrameLocator) -> Result<()> {
        let command = match locator {
            FrameLocator::Top => Command::new("FrameFocus"),
            FrameLocator::Name(name) => Command::with_args("FrameFocus", ["", name.as_str()]),
            FrameLocator::Index(index) => {
                Command::with_args("FrameFocus", [index.to_string().as_str()])
            }
        };
        self.execute_command(command).await?;
        Ok(())
    }
}

// ============================================================================
// Browser - Page State
// ============================================================================

impl Browser {
    /// Returns the current page body.
    pub async fn body(&mut self) -> Result<String> {
        self.execute_text("Body", &[]).await
    }

    /// Returns the current page source.
    pub async fn source(&mut self) -> Result<String> {
        self.execute_text("Source", &[]).await
    }

    /// Returns the HTTP status code of the last response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResponse`] when the payload is not a number.
    pub async fn status_code(&mut self) -> Result<u16> {
        let payload = self.execute_text("Status", &[]).await?;
        payload
            .trim()
            .parse()
            .map_err(|_| Error::invalid_response(format!("bad status code: {payload:?}")))
    }

    /// Returns the response headers of the last response.
    pub async fn response_headers(&mut self) -> Result<FxHashMap<String, String>> {
        let payload = self.execute_text("Headers", &[]).await?;
        Ok(parse_headers(&payload))
    }

    /// Sets a request header for subsequent requests.
    pub async fn set_header(&mut self, key: &str, value: &str) -> Result<()> {
        self.execute("Header", &[key, value]).await?;
        Ok(())
    }

    /// Renders the page to an image file at `path`.
    pub async fn render(&mut self, path: &str, width: u32, height: u32) -> Result<()> {
        debug!(path, width, height, "Rendering page");
        self.execute("Render", &[path, &width.to_string(), &height.to_string()])
            .await?;
        Ok(())
    }
}

// ============================================================================
// Header Parsing
// ============================================================================

/// Parses the `Headers` payload: one `Key: Value` pair per line.
///
/// Blank lines and lines without a separator are skipped.
fn parse_headers(payload: &str) -> FxHashMap<String, String> {
    let mut headers = FxHashMap::default();
    for line in payload.lines() {
        if let Some((key, value)) = line.split_once(": ") {
            headers.insert(key.to_string(), value.to_string());
        }
    }
    headers
}

// ============================================================================
// Tests
// ============================================================================
