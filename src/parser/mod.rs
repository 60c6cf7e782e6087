//! URL parsing for connection targets.
//!
//! A URL is decomposed into protocol, host, port and path. Parsing is purely
//! syntactic: no name resolution happens here, and schemes other than `http`
//! are accepted so the caller can reject them with a protocol error.
//!
//! # Example
//!
//! ```
//! use http_get::parser::parse_url;
//!
//! let target = parse_url("example.com/path").unwrap();
//! assert_eq!(target.protocol, "http");
//! assert_eq!(target.port, 80);
//! ```

mod error;
mod url;

pub use error::ParseError;
pub use url::{DEFAULT_HTTP_PORT, DEFAULT_SCHEME, ParsedUrl, parse_url};
