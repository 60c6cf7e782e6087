//! Response header parsing and reading.

use std::collections::HashMap;

use tracing::{debug, instrument};

use super::error::HeaderError;
use crate::net::DeadlineSocket;

/// Byte sequence that ends a response header.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Status prefixes that ask the client to follow a `Location`.
const REDIRECT_PREFIXES: [(&str, u16); 6] = [
    ("300 ", 300),
    ("301 ", 301),
    ("302 ", 302),
    ("303 ", 303),
    ("307 ", 307),
    ("308 ", 308),
];

/// A parsed HTTP response header.
///
/// Field names are stored lower-cased; a repeated field keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    status: String,
    fields: HashMap<String, String>,
}

impl HttpResponse {
    /// Parses a raw response header.
    ///
    /// The first line yields the status (everything after the first space).
    /// Every later line with a space at a position other than 0 yields one
    /// field: the text before the space without a trailing `:`, lower-cased,
    /// maps to the text after it. Lines without such a space are skipped, so
    /// malformed input gives a sparse header rather than an error.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut response = Self::default();

        for (index, line) in raw.split('\n').enumerate() {
            let Some(space) = line.find(' ').filter(|&pos| pos != 0) else {
                continue;
            };
            let rest = &line[space + 1..];
            let value = rest.strip_suffix('\r').unwrap_or(rest);

            if index == 0 {
                response.status = value.to_string();
            } else {
                let name = &line[..space];
                let name = name.strip_suffix(':').unwrap_or(name);
                response
                    .fields
                    .insert(name.to_ascii_lowercase(), value.to_string());
            }
        }

        response
    }

    /// Returns the status text, e.g. `"200 OK"`.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the numeric status code when the status starts with three digits.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.status
            .get(..3)
            .filter(|code| code.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|code| code.parse().ok())
    }

    /// Returns true only for the exact status `"200 OK"`.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "200 OK"
    }

    /// Returns the redirect code if the status is 300, 301, 302, 303, 307 or 308.
    #[must_use]
    pub fn redirect_code(&self) -> Option<u16> {
        REDIRECT_PREFIXES
            .iter()
            .find(|(prefix, _)| self.status.starts_with(prefix))
            .map(|&(_, code)| code)
    }

    /// Looks up a field by name, ignoring case.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns all fields keyed by lower-cased name.
    #[must_use]
    pub fn fields(&self) -> &HashMap<String, String> {
        &self.fields
    }

    /// Returns the `location` field.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.field("location")
    }

    /// Returns the raw `content-length` field.
    #[must_use]
    pub fn content_length(&self) -> Option<&str> {
        self.field("content-length")
    }
}

/// Reads a response header from `socket` one byte at a time.
///
/// Reading stops right after the `\r\n\r\n` terminator so no body byte is
/// consumed.
///
/// # Errors
///
/// - [`HeaderError::Incomplete`] if the peer closes or stalls past the
///   deadline before the terminator
/// - [`HeaderError::Socket`] if a receive fails for any other reason
#[instrument(level = "debug", skip(socket))]
pub fn read_response_header(socket: &mut DeadlineSocket) -> Result<HttpResponse, HeaderError> {
    let mut raw = Vec::new();
    let mut byte = vec![0u8; 1];

    loop {
        byte.resize(1, 0);
        match socket.receive(&mut byte) {
            Ok(0) => return Err(HeaderError::incomplete(raw.len())),
            Ok(_) => {}
            Err(e) if e.is_timeout() => return Err(HeaderError::stalled(raw.len(), e)),
            Err(e) => return Err(e.into()),
        }
        raw.push(byte[0]);

        if raw.ends_with(HEADER_TERMINATOR) {
            let response = HttpResponse::parse(&String::from_utf8_lossy(&raw));
            debug!(
                status = %response.status(),
                fields = response.fields().len(),
                header_bytes = raw.len(),
                "response header received"
            );
            return Ok(response);
        }
    }
}
