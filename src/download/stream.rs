//! Adaptive-chunk streaming of a response body into an output sink.

use std::io::Write;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::constants::{
    CHUNK_GROWTH_FACTOR, CHUNK_SHRINK_FACTOR, FAST_CHUNK_THRESHOLD, INITIAL_CHUNK_SIZE,
    MAX_CHUNK_SIZE, MIN_CHUNK_SIZE,
};
use super::error::DownloadError;
use super::progress::{ProgressReporter, ProgressTracker};
use crate::net::{DeadlineSocket, SocketError};

/// How the receive chunk size reacts to observed throughput.
///
/// A chunk that arrives faster than `fast_threshold` means the link keeps up,
/// so the next read is `growth` times larger (up to `max`). A slower chunk
/// shrinks the next read by `shrink` (down to `min`) so progress updates stay
/// frequent and a half-filled buffer does not sit against the stall deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkPolicy {
    /// Smallest chunk in bytes.
    pub min: usize,
    /// First chunk of a transfer in bytes.
    pub initial: usize,
    /// Largest chunk in bytes.
    pub max: usize,
    /// Chunks faster than this grow the next chunk.
    pub fast_threshold: Duration,
    /// Multiplier after a fast chunk.
    pub growth: f64,
    /// Multiplier after a slow chunk.
    pub shrink: f64,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            min: MIN_CHUNK_SIZE,
            initial: INITIAL_CHUNK_SIZE,
            max: MAX_CHUNK_SIZE,
            fast_threshold: FAST_CHUNK_THRESHOLD,
            growth: CHUNK_GROWTH_FACTOR,
            shrink: CHUNK_SHRINK_FACTOR,
        }
    }
}

impl ChunkPolicy {
    /// Returns the effective `(min, max)` bounds.
    ///
    /// The floor is at least one byte and the ceiling never below the floor, so
    /// inverted or zero bounds still yield a usable receive buffer.
    #[must_use]
    pub fn bounds(&self) -> (usize, usize) {
        let min = self.min.max(1);
        (min, self.max.max(min))
    }

    /// Returns the size of the first chunk, clamped into [`bounds`](Self::bounds).
    #[must_use]
    pub fn initial_size(&self) -> usize {
        let (min, max) = self.bounds();
        self.initial.clamp(min, max)
    }

    /// Returns the chunk size to use after a chunk of `current` bytes took `chunk_time`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn next_size(&self, current: usize, chunk_time: Duration) -> usize {
        let (min, max) = self.bounds();
        let factor = if chunk_time < self.fast_threshold {
            self.growth
        } else {
            self.shrink
        };
        ((current as f64 * factor) as usize).clamp(min, max)
    }
}

/// Source of body bytes with the receive contract of [`DeadlineSocket::receive`].
pub trait BodySource {
    /// Fills `buffer` up to its length, truncates it to what arrived and
    /// returns that count; `Ok(0)` ends the body.
    ///
    /// # Errors
    ///
    /// Returns a [`SocketError`] when the transfer stalls or fails.
    fn receive(&mut self, buffer: &mut Vec<u8>) -> Result<usize, SocketError>;
}

impl BodySource for DeadlineSocket {
    fn receive(&mut self, buffer: &mut Vec<u8>) -> Result<usize, SocketError> {
        DeadlineSocket::receive(self, buffer)
    }
}

/// Streams the body from `source` into `sink` until the source reports end of
/// stream, returning the number of bytes written.
///
/// Each chunk is written to the sink as soon as it arrives, so the sink sees
/// the body in order and the body is never held in memory as a whole.
pub(crate) fn stream_body<S, W>(
    source: &mut S,
    sink: &mut W,
    policy: &ChunkPolicy,
    tracker: &mut ProgressTracker,
    reporter: &mut dyn ProgressReporter,
    url: &str,
) -> Result<u64, DownloadError>
where
    S: BodySource + ?Sized,
    W: Write + ?Sized,
{
    let mut chunk_size = policy.initial_size();
    let mut buffer = vec![0u8; chunk_size];
    let mut chunk_started = Instant::now();

    loop {
        let bytes = source
            .receive(&mut buffer)
            .map_err(|e| DownloadError::socket(url, e))?;
        if bytes == 0 {
            break;
        }

        sink.write_all(&buffer)
            .map_err(|e| DownloadError::sink(url, e))?;
        tracker.record(bytes, reporter);

        let now = Instant::now();
        chunk_size = policy.next_size(chunk_size, now.duration_since(chunk_started));
        chunk_started = now;
        trace!(bytes, next_chunk = chunk_size, "chunk received");

        buffer.resize(chunk_size, 0);
    }

    sink.flush().map_err(|e| DownloadError::sink(url, e))?;
    debug!(
        bytes = tracker.bytes_received(),
        final_chunk = chunk_size,
        "body stream ended"
    );
    Ok(tracker.bytes_received())
}
