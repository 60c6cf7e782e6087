//! Constants for the download module (deadlines, redirects, chunk sizing).

use std::time::Duration;

/// Default stall deadline for socket send/receive (10 seconds).
pub const DEFAULT_DEADLINE_SECS: u64 = 10;

/// Maximum number of chained redirects followed before giving up.
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

/// Smallest receive chunk (1 KiB).
pub const MIN_CHUNK_SIZE: usize = 1024;

/// First receive chunk of every body transfer (100 KiB).
pub const INITIAL_CHUNK_SIZE: usize = 100 * MIN_CHUNK_SIZE;

/// Largest receive chunk (10 MiB).
pub const MAX_CHUNK_SIZE: usize = 10 * 1024 * 1024;

/// A chunk that completes faster than this grows; otherwise it shrinks.
pub const FAST_CHUNK_THRESHOLD: Duration = Duration::from_millis(500);

/// Chunk size multiplier after a fast chunk.
pub const CHUNK_GROWTH_FACTOR: f64 = 1.5;

/// Chunk size multiplier after a slow chunk.
pub const CHUNK_SHRINK_FACTOR: f64 = 0.8;

/// Minimum time between two progress reports.
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);
