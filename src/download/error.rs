//! Error types for the download module.
//!
//! Every variant is fatal to the current download attempt. Variants carry the
//! URL being fetched so a failure deep in a redirect chain still names the hop
//! that broke.

use thiserror::Error;

use crate::http::HeaderError;
use crate::net::SocketError;
use crate::parser::ParseError;

/// Errors that can occur while downloading a URL.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The URL could not be decomposed.
    #[error(transparent)]
    Url(#[from] ParseError),

    /// The URL uses a scheme other than `http`.
    #[error("protocol in URL {url} is '{protocol}', not http")]
    Protocol {
        /// The URL with the unsupported scheme.
        url: String,
        /// The scheme found in the URL.
        protocol: String,
    },

    /// Resolution, connect, stall timeout or transport failure.
    #[error("{source} (while fetching {url})")]
    Socket {
        /// The URL being fetched.
        url: String,
        /// The underlying socket error.
        #[source]
        source: SocketError,
    },

    /// The request could only be sent in part.
    #[error("couldn't send GET request for {url}")]
    RequestNotSent {
        /// The URL being fetched.
        url: String,
    },

    /// The connection closed or stalled before the response header was complete.
    #[error("incomplete response header from {url}: stream ended after {received} bytes")]
    IncompleteHeader {
        /// The URL being fetched.
        url: String,
        /// Header bytes received before the stream ended.
        received: usize,
        /// The stall timeout, if the peer stopped sending instead of closing.
        #[source]
        source: Option<SocketError>,
    },

    /// The server answered with a status that is neither `200 OK` nor a redirect.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL being fetched.
        url: String,
        /// The status text, e.g. `404 Not Found`.
        status: String,
    },

    /// The server answered with a redirect status but no `location` field.
    #[error("HTTP {status} from {url} is a redirect without a location")]
    Redirect {
        /// The URL being fetched.
        url: String,
        /// The redirect status text.
        status: String,
    },

    /// More redirects were chained than allowed.
    #[error("too many redirects from {url}: more than {max} hops")]
    RedirectLoop {
        /// The URL the chain started from.
        url: String,
        /// The redirect limit.
        max: u32,
    },

    /// The `content-length` field is not a byte count.
    #[error("invalid content-length '{value}' from {url}")]
    InvalidContentLength {
        /// The URL being fetched.
        url: String,
        /// The raw field value.
        value: String,
    },

    /// Writing the body to the output sink failed.
    #[error("IO error writing body of {url}: {source}")]
    Sink {
        /// The URL being fetched.
        url: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The body ended with a different number of bytes than announced.
    #[error(
        "body length mismatch for {url}: server announced {expected_bytes} bytes, got {actual_bytes}"
    )]
    LengthMismatch {
        /// The URL the body came from.
        url: String,
        /// Bytes announced by `content-length`.
        expected_bytes: u64,
        /// Bytes actually received.
        actual_bytes: u64,
    },
}

impl DownloadError {
    /// Creates a protocol error.
    pub fn protocol(url: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self::Protocol {
            url: url.into(),
            protocol: protocol.into(),
        }
    }

    /// Creates a socket error.
    pub fn socket(url: impl Into<String>, source: SocketError) -> Self {
        Self::Socket {
            url: url.into(),
            source,
        }
    }

    /// Converts a header read failure, keeping incomplete headers distinct.
    pub fn header(url: impl Into<String>, error: HeaderError) -> Self {
        match error {
            HeaderError::Incomplete { received, source } => Self::IncompleteHeader {
                url: url.into(),
                received,
                source,
            },
            HeaderError::Socket(source) => Self::socket(url, source),
        }
    }

    /// Creates a request-not-sent error.
    pub fn request_not_sent(url: impl Into<String>) -> Self {
        Self::RequestNotSent { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: impl Into<String>) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status: status.into(),
        }
    }

    /// Creates a redirect-without-location error.
    pub fn redirect(url: impl Into<String>, status: impl Into<String>) -> Self {
        Self::Redirect {
            url: url.into(),
            status: status.into(),
        }
    }

    /// Creates a redirect loop error.
    pub fn redirect_loop(url: impl Into<String>, max: u32) -> Self {
        Self::RedirectLoop {
            url: url.into(),
            max,
        }
    }

    /// Creates an invalid content-length error.
    pub fn invalid_content_length(url: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidContentLength {
            url: url.into(),
            value: value.into(),
        }
    }

    /// Creates a sink write error.
    pub fn sink(url: impl Into<String>, source: std::io::Error) -> Self {
        Self::Sink {
            url: url.into(),
            source,
        }
    }

    /// Creates a length mismatch error.
    pub fn length_mismatch(url: impl Into<String>, expected_bytes: u64, actual_bytes: u64) -> Self {
        Self::LengthMismatch {
            url: url.into(),
            expected_bytes,
            actual_bytes,
        }
    }

    /// Returns true for a body length mismatch, the one outcome that leaves a
    /// complete (if suspicious) body in the sink.
    #[must_use]
    pub fn is_length_mismatch(&self) -> bool {
        matches!(self, Self::LengthMismatch { .. })
    }
}
