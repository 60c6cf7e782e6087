//! Progress reporting for body transfers.
//!
//! The downloader hands a [`ProgressUpdate`] to a [`ProgressReporter`] at most
//! once per progress interval. Rendering is left to the reporter.

use std::time::{Duration, Instant};

use super::engine::DownloadReport;

/// Snapshot of a body transfer in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Body bytes received so far.
    pub bytes_received: u64,
    /// Average speed since the transfer started, in bytes per second.
    pub speed_bytes_per_sec: f64,
    /// Time since the transfer started.
    pub elapsed: Duration,
    /// Percentage of the announced size received; only when the size is known.
    pub percent_complete: Option<f64>,
    /// Estimated time until the announced size is reached; only when the size is known.
    pub eta: Option<Duration>,
}

impl ProgressUpdate {
    /// Computes an update from the byte count, the announced size and the elapsed time.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(bytes_received: u64, expected_bytes: Option<u64>, elapsed: Duration) -> Self {
        let speed_bytes_per_sec = bytes_received as f64 / (elapsed.as_secs_f64() + 1e-6);

        let (percent_complete, eta) = match expected_bytes.filter(|&expected| expected > 0) {
            Some(expected) => {
                let percent = 100.0 * bytes_received as f64 / expected as f64;
                let remaining = expected.saturating_sub(bytes_received) as f64;
                let eta = (speed_bytes_per_sec > 0.0)
                    .then(|| Duration::try_from_secs_f64(remaining / speed_bytes_per_sec).ok())
                    .flatten();
                (Some(percent), eta)
            }
            None => (None, None),
        };

        Self {
            bytes_received,
            speed_bytes_per_sec,
            elapsed,
            percent_complete,
            eta,
        }
    }
}

/// Receives progress updates from a running download.
pub trait ProgressReporter {
    /// Called at most once per progress interval while the body streams.
    fn report(&mut self, update: &ProgressUpdate);

    /// Called once after the body stream ended.
    fn finish(&mut self, _report: &DownloadReport) {}
}

/// Reporter that discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _update: &ProgressUpdate) {}
}

/// Throttles progress updates for one body transfer.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    started: Instant,
    last_report: Instant,
    interval: Duration,
    expected_bytes: Option<u64>,
    bytes_received: u64,
}

impl ProgressTracker {
    pub(crate) fn new(expected_bytes: Option<u64>, interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_report: now,
            interval,
            expected_bytes,
            bytes_received: 0,
        }
    }

    /// Counts `bytes` and reports if the interval has passed since the last report.
    pub(crate) fn record(&mut self, bytes: usize, reporter: &mut dyn ProgressReporter) {
        self.bytes_received += bytes as u64;

        let now = Instant::now();
        if now.duration_since(self.last_report) > self.interval {
            self.last_report = now;
            let update = ProgressUpdate::compute(
                self.bytes_received,
                self.expected_bytes,
                now.duration_since(self.started),
            );
            reporter.report(&update);
        }
    }

    pub(crate) fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
