//! Error types for URL parsing.

use thiserror::Error;

/// Errors that can occur while decomposing a URL into a target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// URL does not fit the `scheme://host[:port]/path[?query][#fragment]` grammar.
    #[error("invalid URL '{url}': {reason}\n  Suggestion: {suggestion}")]
    UrlSyntax {
        /// The URL that failed to parse
        url: String,
        /// Why the URL is invalid
        reason: String,
        /// How to fix the issue
        suggestion: &'static str,
    },
}

impl ParseError {
    /// Creates a `UrlSyntax` error for input the URL grammar rejects.
    #[must_use]
    pub fn malformed(url: &str) -> Self {
        Self::UrlSyntax {
            url: url.to_string(),
            reason: "does not match scheme://host[:port]/path".to_string(),
            suggestion: "Check the URL format and try again",
        }
    }

    /// Creates a `UrlSyntax` error for a `host:port` suffix that is not a port number.
    #[must_use]
    pub fn invalid_port(url: &str, port: &str) -> Self {
        Self::UrlSyntax {
            url: url.to_string(),
            reason: format!("port '{port}' is not a number between 0 and 65535"),
            suggestion: "Use host:port with a numeric port, e.g. example.com:8080",
        }
    }
}
