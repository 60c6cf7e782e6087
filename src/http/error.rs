//! Error types for reading a response header.

use thiserror::Error;

use crate::net::SocketError;

/// Errors that can occur while reading a response header from a socket.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// The stream ended before the header terminator arrived: either the peer
    /// closed the connection or it stopped sending for longer than the deadline.
    #[error("response header ended after {received} bytes, before the blank line")]
    Incomplete {
        /// Header bytes received before the stream ended.
        received: usize,
        /// The stall timeout, when the stream ended by stalling rather than closing.
        #[source]
        source: Option<SocketError>,
    },

    /// The socket failed while reading.
    #[error(transparent)]
    Socket(#[from] SocketError),
}

impl HeaderError {
    /// Creates an incomplete-header error for a closed connection.
    #[must_use]
    pub fn incomplete(received: usize) -> Self {
        Self::Incomplete {
            received,
            source: None,
        }
    }

    /// Creates an incomplete-header error for a connection that stalled.
    #[must_use]
    pub fn stalled(received: usize, timeout: SocketError) -> Self {
        Self::Incomplete {
            received,
            source: Some(timeout),
        }
    }
}
