//! Tunables for a download run.

use std::time::Duration;

use super::constants::{DEFAULT_DEADLINE_SECS, DEFAULT_MAX_REDIRECTS, PROGRESS_INTERVAL};
use super::stream::ChunkPolicy;

/// Configuration for [`Downloader`](super::Downloader).
///
/// Defaults: 10 second stall deadline, at most 10 chained redirects, adaptive
/// chunks between 1 KiB and 10 MiB starting at 100 KiB, progress at most once
/// per second.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadConfig {
    /// Stall deadline applied to connect, send and receive.
    pub deadline: Duration,
    /// Redirect hops followed before failing with a redirect loop error.
    pub max_redirects: u32,
    /// Adaptive chunk sizing for the body transfer.
    pub chunk_policy: ChunkPolicy,
    /// Minimum time between two progress reports.
    pub progress_interval: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(DEFAULT_DEADLINE_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            chunk_policy: ChunkPolicy::default(),
            progress_interval: PROGRESS_INTERVAL,
        }
    }
}

impl DownloadConfig {
    /// Returns this configuration with a different stall deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Returns this configuration with a different redirect limit.
    #[must_use]
    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Returns this configuration with a different chunk policy.
    #[must_use]
    pub fn with_chunk_policy(mut self, chunk_policy: ChunkPolicy) -> Self {
        self.chunk_policy = chunk_policy;
        self
    }

    /// Returns this configuration with a different progress interval.
    #[must_use]
    pub fn with_progress_interval(mut self, progress_interval: Duration) -> Self {
        self.progress_interval = progress_interval;
        self
    }
}
