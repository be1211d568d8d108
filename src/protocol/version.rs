//! Server version extraction and version-gated protocol variants.
//!
//! capybara-webkit changed the argument shape of two commands across
//! releases. The server publishes no version over the wire, so the only
//! available signal is the gem path the binary lives under:
//! `.../capybara-webkit-<version>/bin/webkit_server`. A path without that
//! pattern is treated as version `0.0.0`, selecting the legacy shapes.

// ============================================================================
// Imports
// ============================================================================

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

// ============================================================================
// Constants
// ============================================================================

/// Pattern locating the version segment in the binary's gem path.
static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"capybara-webkit-([^/]*)/").expect("valid version pattern"));

// ============================================================================
// ServerVersion
// ============================================================================

/// A dotted-numeric server version, e.g. `1.1.0`.
///
/// Ordering pads missing segments with zeros, so `1.2 > 1.1.0` and
/// `1.1 == 1.1.0`. Non-numeric segments compare as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerVersion {
    /// Numeric version segments in order of significance.
    segments: Vec<u64>,
}

impl ServerVersion {
    /// Parses a dotted version string.
    #[must_use]
    pub fn parse(version: &str) -> Self {
        Self {
            segments: version
                .split('.')
                .map(|s| s.parse::<u64>().unwrap_or(0))
                .collect(),
        }
    }

    /// Extracts the version from the server binary's path.
    ///
    /// Falls back to `0.0.0` when the path does not carry the
    /// `capybara-webkit-<version>/` gem segment.
    #[must_use]
    pub fn from_binary_path(path: &Path) -> Self {
        let text = path.to_string_lossy();
        match VERSION_PATTERN.captures(&text) {
            Some(captures) => Self::parse(&captures[1]),
            None => Self::parse("0.0.0"),
        }
    }

    /// Returns the numeric segments.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }
}

impl PartialOrd for ServerVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServerVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).copied().unwrap_or(0);
            let b = other.segments.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ordering => return ordering,
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

// ============================================================================
// ProtocolVariants
// ============================================================================

/// The closed set of version-conditioned command shapes.
///
/// Selected once per client lifetime from the discovered [`ServerVersion`];
/// call sites branch on these flags instead of comparing versions inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVariants {
    /// `Node` invocations insert a literal `"true"` allow-unattached flag
    /// as the second argument (server 1.1.0 and later).
    pub invoke_allow_unattached: bool,
    /// `ResizeWindow` addresses a window handle as its first argument
    /// (server 1.2 and later).
    pub resize_takes_handle: bool,
}

impl ProtocolVariants {
    /// Selects the variants matching a server version.
    #[must_use]
    pub fn for_version(version: &ServerVersion) -> Self {
        Self {
            invoke_allow_unattached: *version >= ServerVersion::parse("1.1.0"),
            resize_takes_handle: *version >= ServerVersion::parse("1.2"),
        }
    }

    /// Selects the variants for the binary at `path`.
    #[inline]
    #[must_use]
    pub fn for_binary_path(path: &Path) -> Self {
        Self::for_version(&ServerVersion::from_binary_path(path))
    }
}

// ============================================================================
// Tests
// ============================================================================
