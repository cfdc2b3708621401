//! Route matching logic.
//!
//! # Responsibilities
//! - Match a request path against a configured prefix
//! - Compute the path forwarded upstream once the prefix is stripped
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Matching is segment-aware: `/svc` matches `/svc` and `/svc/...`, never `/svcx`
//! - `/` matches every path and is never stripped
//! - No regex to guarantee O(n) matching

/// Matches the request path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    /// A trailing `/` on anything but the root prefix is dropped, so `/svc/`
    /// and `/svc` register the same route.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let trimmed = prefix.trim_end_matches('/');
        let prefix = if trimmed.is_empty() { "/".to_string() } else { trimmed.to_string() };
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_root(&self) -> bool {
        self.prefix == "/"
    }

    /// Returns true if `path` falls under this prefix.
    pub fn matches(&self, path: &str) -> bool {
        if self.is_root() {
            return true;
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Path to forward for a matched request. An empty remainder becomes `/`.
    pub fn strip<'a>(&self, path: &'a str) -> &'a str {
        if self.is_root() {
            return path;
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some("") | None => "/",
            Some(rest) => rest,
        }
    }
}
