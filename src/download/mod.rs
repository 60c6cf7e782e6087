//! HTTP/1.0 download orchestration over a raw TCP connection.
//!
//! This module ties the URL parser, the deadline socket and the response
//! header reader together into a single blocking download that streams the
//! body into any [`std::io::Write`] sink.
//!
//! # Features
//!
//! - Redirect chasing (up to 10 hops by default), relative locations rebased
//!   onto the current URL
//! - Adaptive receive chunks between 1 KiB and 10 MiB
//! - Throttled progress reports through a [`ProgressReporter`]
//! - Body length verification against `content-length`
//!
//! # Example
//!
//! ```no_run
//! use http_get::download::Downloader;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (body, report) = Downloader::new().fetch_to_vec("http://example.com/")?;
//! println!("{} bytes after {} redirects", body.len(), report.redirects);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
pub mod constants;
mod engine;
mod error;
mod progress;
mod stream;

pub use config::DownloadConfig;
pub use constants::{DEFAULT_DEADLINE_SECS, DEFAULT_MAX_REDIRECTS};
pub use engine::{DownloadReport, Downloader, LengthCheck};
pub use error::DownloadError;
pub use progress::{NoProgress, ProgressReporter, ProgressUpdate};
pub use stream::{BodySource, ChunkPolicy};
