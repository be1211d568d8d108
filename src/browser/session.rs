//! Cookie and proxy session state.
//!
//! The `setCookies` command name is lower-cased on the wire; the server's
//! vocabulary is otherwise capitalized. The mismatch is the server's, not
//! ours.

// ============================================================================
// Imports
// ============================================================================

use tracing::debug;

use crate::error::Result;

use super::Browser;

// ============================================================================
// ProxyConfig
// ============================================================================

/// Proxy settings for [`Browser::set_proxy`].
///
/// # Example
///
/// ```
/// use webkit_driver::ProxyConfig;
///
/// let proxy = ProxyConfig::new("proxy.example.com", 8080)
///     .with_credentials("user", "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy host.
    pub host: String,
    /// Proxy port.
    pub port: u16,
    /// Username; empty when the proxy is unauthenticated.
    pub user: String,
    /// Password; empty when the proxy is unauthenticated.
    pub pass: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 0,
            user: String::new(),
            pass: String::new(),
        }
    }
}

impl ProxyConfig {
    /// Creates an unauthenticated proxy configuration.
    #[inline]
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Adds credentials.
    #[inline]
    #[must_use]
    pub fn with_credentials(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.user = user.into();
        self.pass = pass.into();
        self
    }
}

// ============================================================================
// Browser - Cookies
// ============================================================================

impl Browser {
    /// Sets cookies from a cookie string.
    pub async fn set_cookies(&mut self, cookies: &str) -> Result<()> {
        self.execute("setCookies", &[cookies]).await?;
        Ok(())
    }

    /// Returns all cookies, one cookie string per entry.
    pub async fn get_cookies(&mut self) -> Result<Vec<String>> {
        let payload = self.execute_text("GetCookies", &[]).await?;
        Ok(parse_cookie_lines(&payload))
    }

    /// Clears all cookies.
    pub async fn clear_cookies(&mut self) -> Result<()> {
        self.execute("ClearCookies", &[]).await?;
        Ok(())
    }
}

// ============================================================================
// Browser - Proxy
// ============================================================================

impl Browser {
    /// Routes subsequent requests through a proxy.
    pub async fn set_proxy(&mut self, config: &ProxyConfig) -> Result<()> {
        debug!(host = %config.host, port = config.port, "Setting proxy");
        let port = config.port.to_string();
        self.execute("SetProxy", &[&config.host, &port, &config.user, &config.pass])
            .await?;
        Ok(())
    }

    /// Clears the proxy configuration.
    ///
    /// A `SetProxy` with zero arguments restores a direct connection.
    pub async fn clear_proxy(&mut self) -> Result<()> {
        debug!("Clearing proxy");
        self.execute("SetProxy", &[]).await?;
        Ok(())
    }
}

// ============================================================================
// Cookie Parsing
// ============================================================================

/// Splits the `GetCookies` payload into trimmed, non-empty cookie lines.
fn parse_cookie_lines(payload: &str) -> Vec<String> {
    payload
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
