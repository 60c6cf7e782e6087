//! Download orchestration: redirects, status handling, body streaming and
//! length verification.
//!
//! # Overview
//!
//! A download walks `parse URL → connect → send request → read header →
//! interpret status`, then either follows a redirect with a fresh connection
//! or streams the body into the caller's sink. Every failure is returned to
//! the caller; nothing is retried.
//!
//! # Example
//!
//! ```no_run
//! use http_get::download::{Downloader, NoProgress};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = Downloader::new();
//! let mut out = std::io::stdout().lock();
//! let report = downloader.download("http://example.com/", &mut out, &mut NoProgress)?;
//! report.verify()?;
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use super::client::request_header;
use super::config::DownloadConfig;
use super::error::DownloadError;
use super::progress::{NoProgress, ProgressReporter, ProgressTracker};
use super::stream::stream_body;
use crate::http::HttpResponse;
use crate::parser::{ParsedUrl, parse_url};

/// Result of a download whose body stream ended normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// The URL the body was finally fetched from, after redirects.
    pub final_url: String,
    /// Body bytes written to the sink.
    pub bytes_received: u64,
    /// Size announced by `content-length`, if any.
    pub expected_bytes: Option<u64>,
    /// Redirect hops followed.
    pub redirects: u32,
    /// Time from the first connect to the end of the body.
    pub elapsed: Duration,
}

/// Outcome of comparing the received body with the announced size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthCheck {
    /// The body has exactly the announced size.
    Matched,
    /// The body size differs from the announced size.
    Mismatch {
        /// Bytes announced by `content-length`.
        expected: u64,
        /// Bytes received.
        actual: u64,
    },
    /// The server did not announce a size.
    Unknown,
}

impl DownloadReport {
    /// Compares the received byte count with the announced size.
    #[must_use]
    pub fn length_check(&self) -> LengthCheck {
        match self.expected_bytes {
            None => LengthCheck::Unknown,
            Some(expected) if expected == self.bytes_received => LengthCheck::Matched,
            Some(expected) => LengthCheck::Mismatch {
                expected,
                actual: self.bytes_received,
            },
        }
    }

    /// Turns a length mismatch into an error.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::LengthMismatch`] if the body size differs from
    /// the announced size.
    pub fn verify(&self) -> Result<(), DownloadError> {
        match self.length_check() {
            LengthCheck::Mismatch { expected, actual } => {
                Err(DownloadError::length_mismatch(&self.final_url, expected, actual))
            }
            LengthCheck::Matched | LengthCheck::Unknown => Ok(()),
        }
    }
}

/// What to do with a response whose header has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Disposition {
    /// Follow the redirect to this absolute (or as-given) location.
    Redirect(String),
    /// Stream the body; the size is known when `content-length` was sent.
    Body { expected_bytes: Option<u64> },
}

/// Decides between following a redirect and streaming the body.
///
/// A relative location (starting with `/`) is rebased onto `target`.
pub(crate) fn interpret_response(
    response: &HttpResponse,
    target: &ParsedUrl,
    url: &str,
) -> Result<Disposition, DownloadError> {
    if !response.is_ok() {
        if let Some(code) = response.redirect_code() {
            let Some(location) = response.location() else {
                return Err(DownloadError::redirect(url, response.status()));
            };
            let location = target.resolve_location(location);
            debug!(code, %location, "redirect");
            return Ok(Disposition::Redirect(location));
        }
        return Err(DownloadError::http_status(url, response.status()));
    }

    let expected_bytes = response
        .content_length()
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|_| DownloadError::invalid_content_length(url, value))
        })
        .transpose()?;
    Ok(Disposition::Body { expected_bytes })
}

/// Downloads a URL over plain HTTP/1.0, following redirects.
///
/// One connection is open at a time. Each redirect hop opens a new connection
/// after the previous one has been closed.
#[derive(Debug, Clone, Default)]
pub struct Downloader {
    config: DownloadConfig,
}

impl Downloader {
    /// Creates a downloader with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a downloader with an explicit configuration.
    #[must_use]
    pub fn with_config(config: DownloadConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Downloads `url` and writes the body to `sink` as it arrives.
    ///
    /// The returned report carries the byte count and the announced size; a
    /// size mismatch is not an error here, call [`DownloadReport::verify`] to
    /// treat it as one.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::RedirectLoop`] after more than `max_redirects` hops
    /// - [`DownloadError::Url`] / [`DownloadError::Protocol`] for unusable URLs
    /// - [`DownloadError::Socket`] / [`DownloadError::RequestNotSent`] /
    ///   [`DownloadError::IncompleteHeader`] for transport failures
    /// - [`DownloadError::HttpStatus`] / [`DownloadError::Redirect`] /
    ///   [`DownloadError::InvalidContentLength`] for unusable responses
    /// - [`DownloadError::Sink`] if writing the body fails
    #[instrument(skip(self, sink, progress), fields(url = %url))]
    pub fn download<W: Write + ?Sized>(
        &self,
        url: &str,
        sink: &mut W,
        progress: &mut dyn ProgressReporter,
    ) -> Result<DownloadReport, DownloadError> {
        let started = Instant::now();
        let mut current_url = url.to_string();
        let mut redirects: u32 = 0;

        loop {
            if redirects > self.config.max_redirects {
                warn!(redirects, "too deep redirect level");
                return Err(DownloadError::redirect_loop(url, self.config.max_redirects));
            }

            let target = parse_url(&current_url)?;
            if target.protocol != "http" {
                return Err(DownloadError::protocol(&current_url, &target.protocol));
            }

            let (mut socket, response) =
                request_header(&target, &current_url, self.config.deadline)?;
            info!(status = %response.status(), url = %current_url, "got response");

            match interpret_response(&response, &target, &current_url)? {
                Disposition::Redirect(location) => {
                    info!(from = %current_url, to = %location, "redirected");
                    drop(socket);
                    current_url = location;
                    redirects += 1;
                }
                Disposition::Body { expected_bytes } => {
                    debug!(?expected_bytes, "downloading body");
                    let mut tracker =
                        ProgressTracker::new(expected_bytes, self.config.progress_interval);
                    let bytes_received = stream_body(
                        &mut socket,
                        sink,
                        &self.config.chunk_policy,
                        &mut tracker,
                        progress,
                        &current_url,
                    )?;

                    let report = DownloadReport {
                        final_url: current_url,
                        bytes_received,
                        expected_bytes,
                        redirects,
                        elapsed: started.elapsed(),
                    };
                    match report.length_check() {
                        LengthCheck::Matched => debug!("body size matches announcement"),
                        LengthCheck::Mismatch { expected, actual } => {
                            warn!(expected, actual, "body size does not match announcement");
                        }
                        LengthCheck::Unknown => debug!("body size was not announced"),
                    }
                    info!(
                        bytes = report.bytes_received,
                        elapsed_ms = tracker.elapsed().as_millis(),
                        redirects = report.redirects,
                        "download finished"
                    );
                    progress.finish(&report);
                    return Ok(report);
                }
            }
        }
    }

    /// Downloads `url` into memory.
    ///
    /// Meant for small bodies; large bodies should go through
    /// [`download`](Self::download) with a streaming sink.
    ///
    /// # Errors
    ///
    /// Same as [`download`](Self::download).
    pub fn fetch_to_vec(&self, url: &str) -> Result<(Vec<u8>, DownloadReport), DownloadError> {
        let mut body = Vec::new();
        let report = self.download(url, &mut body, &mut NoProgress)?;
        Ok((body, report))
    }
}
