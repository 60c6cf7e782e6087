//! Error types for deadline-bounded socket operations.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while connecting to, writing to, or reading from a
/// [`DeadlineSocket`](super::DeadlineSocket).
#[derive(Debug, Error)]
pub enum SocketError {
    /// The transport resource could not be configured for deadline-bounded I/O.
    #[error("cannot configure socket: {source}")]
    Resource {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Name resolution produced no usable IPv4 address.
    #[error("cannot resolve host '{host}': {reason}")]
    Resolution {
        /// The host name that failed to resolve.
        host: String,
        /// Why resolution failed.
        reason: String,
    },

    /// The TCP connection could not be established.
    #[error("cannot connect to {host}:{port}: {source}")]
    Connect {
        /// The host that was dialed.
        host: String,
        /// The port that was dialed.
        port: u16,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// No bytes moved for longer than the stall deadline.
    #[error("timeout during {operation}: no progress for more than {deadline:?}")]
    Timeout {
        /// The operation that stalled (`send` or `receive`).
        operation: &'static str,
        /// The stall deadline that was exceeded.
        deadline: Duration,
    },

    /// Any other transport fault.
    #[error("IO error during {operation}: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl SocketError {
    /// Creates a resource configuration error.
    pub fn resource(source: std::io::Error) -> Self {
        Self::Resource { source }
    }

    /// Creates a name resolution error.
    pub fn resolution(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            host: host.into(),
            reason: reason.into(),
        }
    }

    /// Creates a connect error.
    pub fn connect(host: impl Into<String>, port: u16, source: std::io::Error) -> Self {
        Self::Connect {
            host: host.into(),
            port,
            source,
        }
    }

    /// Creates a stall timeout error.
    #[must_use]
    pub fn timeout(operation: &'static str, deadline: Duration) -> Self {
        Self::Timeout {
            operation,
            deadline,
        }
    }

    /// Creates a transport IO error.
    #[must_use]
    pub fn io(operation: &'static str, source: std::io::Error) -> Self {
        Self::Io { operation, source }
    }

    /// Returns true if this error is a stall timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
