//! Decomposition of URL strings into connection targets.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::error::ParseError;

/// Port used when the URL does not carry one.
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Scheme assumed when the URL does not carry one.
pub const DEFAULT_SCHEME: &str = "http";

/// URL grammar: `[scheme://][host[:port]][path][?query][#fragment]`.
///
/// Capture groups: 1 = scheme, 2 = host (with optional port), 3 = path,
/// 4 = `?query`, 5 = `#fragment`.
#[allow(clippy::expect_used)]
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([^:/?#]+)://)?([^/?#]*)([^?#]*)(\?[^#]*)?(#.*)?$")
        .expect("URL regex is valid") // Static pattern, safe to panic
});

/// A URL decomposed into the pieces needed to drive one connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Lower-cased scheme, `"http"` when the URL had none.
    pub protocol: String,
    /// Lower-cased host name or address, without the port.
    pub host: String,
    /// TCP port, 80 unless the host segment carried `:port`.
    pub port: u16,
    /// Path, query and fragment concatenated verbatim.
    pub path: String,
}

impl ParsedUrl {
    /// Returns the request target for the request line.
    ///
    /// An empty path is sent as `/`; everything else is sent verbatim.
    #[must_use]
    pub fn request_target(&self) -> &str {
        if self.path.is_empty() { "/" } else { &self.path }
    }

    /// Resolves a `Location` value against this target.
    ///
    /// Only locations starting with `/` are treated as relative and rebased onto
    /// this target's protocol, host and port. Anything else is returned as-is.
    #[must_use]
    pub fn resolve_location(&self, location: &str) -> String {
        if location.starts_with('/') {
            format!(
                "{}://{}:{}{location}",
                self.protocol, self.host, self.port
            )
        } else {
            location.to_string()
        }
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}:{}{}",
            self.protocol, self.host, self.port, self.path
        )
    }
}

/// Parses a URL into its protocol, host, port and path.
///
/// # Examples
///
/// ```
/// use http_get::parser::parse_url;
///
/// let target = parse_url("http://Example.com:8080/a?b#c").unwrap();
/// assert_eq!(target.protocol, "http");
/// assert_eq!(target.host, "example.com");
/// assert_eq!(target.port, 8080);
/// assert_eq!(target.path, "/a?b#c");
/// ```
///
/// # Errors
///
/// Returns [`ParseError::UrlSyntax`] if the URL does not fit the grammar or the
/// host segment carries a port suffix that is not a valid port number.
#[tracing::instrument(level = "trace")]
pub fn parse_url(url: &str) -> Result<ParsedUrl, ParseError> {
    let captures = URL_PATTERN
        .captures(url)
        .ok_or_else(|| ParseError::malformed(url))?;
    let group = |index: usize| captures.get(index).map_or("", |m| m.as_str());

    let protocol = match group(1) {
        "" => DEFAULT_SCHEME.to_string(),
        scheme => scheme.to_ascii_lowercase(),
    };
    let host_segment = group(2).to_ascii_lowercase();
    let path = format!("{}{}{}", group(3), group(4), group(5));

    let (host, port) = match host_segment.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| ParseError::invalid_port(url, port))?;
            (host.to_string(), port)
        }
        None => (host_segment, DEFAULT_HTTP_PORT),
    };

    let parsed = ParsedUrl {
        protocol,
        host,
        port,
        path,
    };
    trace!(%parsed, "parsed URL");
    Ok(parsed)
}
