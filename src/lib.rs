//! Minimal HTTP/1.0 client over raw TCP.
//!
//! Fetches a single URL with a plain `GET`, follows redirects and streams the
//! body into a caller-supplied sink while reporting progress.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - URL decomposition into protocol, host, port and path
//! - [`net`] - TCP socket with a stall deadline on every send and receive
//! - [`http`] - GET request formatting and response header reading
//! - [`download`] - Redirects, adaptive chunked streaming, progress, length checks

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod http;
pub mod net;
pub mod parser;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use download::{
    DownloadConfig, DownloadError, DownloadReport, Downloader, LengthCheck, NoProgress,
    ProgressReporter, ProgressUpdate,
};
pub use http::{HeaderError, HttpResponse};
pub use net::{DeadlineSocket, SocketError};
pub use parser::{ParseError, ParsedUrl, parse_url};
