//! TCP connection with stall-deadline semantics for send and receive.

use std::io::{ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::{debug, instrument, trace};

use super::error::SocketError;

/// Default stall deadline for send and receive (10 seconds).
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

/// Per-call OS timeout on the descriptor.
///
/// Each blocking read or write returns after at most this long so the stall
/// clock can be checked; it is a floor, not the user-facing deadline.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A connected TCP socket whose send and receive fail only after the peer makes
/// no progress for longer than the configured deadline.
///
/// The deadline is a stall deadline: every successful partial read or write
/// resets the clock, so slow but steady transfers run for as long as they need.
/// The descriptor is closed when the socket is dropped.
#[derive(Debug)]
pub struct DeadlineSocket {
    stream: TcpStream,
    deadline: Duration,
}

impl DeadlineSocket {
    /// Resolves `host` to an IPv4 address and connects to it on `port`.
    ///
    /// The connect itself is bounded by [`DEFAULT_DEADLINE`]; use
    /// [`connect_with_deadline`](Self::connect_with_deadline) to choose another.
    ///
    /// # Errors
    ///
    /// - [`SocketError::Resolution`] if the host has no IPv4 address
    /// - [`SocketError::Connect`] if the TCP connect fails
    /// - [`SocketError::Resource`] if the per-call timeout cannot be configured
    pub fn connect(host: &str, port: u16) -> Result<Self, SocketError> {
        Self::connect_with_deadline(host, port, DEFAULT_DEADLINE)
    }

    /// Connects like [`connect`](Self::connect) and applies `deadline` to the
    /// connect attempt and to every later send and receive.
    ///
    /// # Errors
    ///
    /// Same as [`connect`](Self::connect).
    #[instrument(level = "debug", skip(deadline))]
    pub fn connect_with_deadline(
        host: &str,
        port: u16,
        deadline: Duration,
    ) -> Result<Self, SocketError> {
        let addr = resolve_ipv4(host, port)?;
        debug!(%addr, "host resolved");

        let stream = TcpStream::connect_timeout(&addr, deadline.max(POLL_INTERVAL))
            .map_err(|e| SocketError::connect(host, port, e))?;

        let mut socket = Self::from_stream(stream)?;
        socket.set_deadline(deadline);
        debug!(%addr, "connected");
        Ok(socket)
    }

    /// Wraps an already connected stream.
    ///
    /// # Errors
    ///
    /// Returns [`SocketError::Resource`] if the per-call read or write timeout
    /// cannot be set on the descriptor.
    pub fn from_stream(stream: TcpStream) -> Result<Self, SocketError> {
        stream
            .set_read_timeout(Some(POLL_INTERVAL))
            .map_err(SocketError::resource)?;
        stream
            .set_write_timeout(Some(POLL_INTERVAL))
            .map_err(SocketError::resource)?;
        Ok(Self {
            stream,
            deadline: DEFAULT_DEADLINE,
        })
    }

    /// Returns the stall deadline.
    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Sets the stall deadline used by [`send`](Self::send) and [`receive`](Self::receive).
    pub fn set_deadline(&mut self, deadline: Duration) {
        self.deadline = deadline;
    }

    /// Sets the stall deadline in whole seconds.
    pub fn set_deadline_secs(&mut self, seconds: u64) {
        self.set_deadline(Duration::from_secs(seconds));
    }

    /// Returns the address of the connected peer, if the OS still knows it.
    #[must_use]
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.stream.peer_addr().ok()
    }

    /// Sends the whole buffer.
    ///
    /// Returns `Ok(true)` when every byte was written and `Ok(false)` when the
    /// peer stopped accepting data part way (a zero-length write).
    ///
    /// # Errors
    ///
    /// - [`SocketError::Timeout`] if no byte is written for longer than the deadline
    /// - [`SocketError::Io`] on any other transport error
    pub fn send(&mut self, message: &[u8]) -> Result<bool, SocketError> {
        let mut sent = 0;
        let mut last_progress = Instant::now();

        while sent < message.len() {
            match self.stream.write(&message[sent..]) {
                Ok(0) => break,
                Ok(bytes) => {
                    sent += bytes;
                    last_progress = Instant::now();
                }
                Err(e) if is_stall(&e) => {
                    if last_progress.elapsed() > self.deadline {
                        return Err(SocketError::timeout("send", self.deadline));
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(SocketError::io("send", e)),
            }
        }

        trace!(sent, total = message.len(), "send finished");
        Ok(sent == message.len())
    }

    /// Receives into `buffer` until it is full or the peer closes the connection.
    ///
    /// The capacity is `buffer.len()`. On return the buffer is truncated to the
    /// number of bytes received, which is also returned. `Ok(0)` means the peer
    /// closed the connection with nothing left to read.
    ///
    /// # Errors
    ///
    /// - [`SocketError::Io`] with [`ErrorKind::InvalidInput`] if `buffer` is empty
    /// - [`SocketError::Timeout`] if no byte arrives for longer than the deadline
    /// - [`SocketError::Io`] on any other transport error
    pub fn receive(&mut self, buffer: &mut Vec<u8>) -> Result<usize, SocketError> {
        if buffer.is_empty() {
            return Err(SocketError::io(
                "receive",
                std::io::Error::new(
                    ErrorKind::InvalidInput,
                    "receive buffer must have non-zero length",
                ),
            ));
        }

        let capacity = buffer.len();
        let mut received = 0;
        let mut last_progress = Instant::now();

        while received < capacity {
            match self.stream.read(&mut buffer[received..]) {
                Ok(0) => break,
                Ok(bytes) => {
                    received += bytes;
                    last_progress = Instant::now();
                }
                Err(e) if is_stall(&e) => {
                    if last_progress.elapsed() > self.deadline {
                        return Err(SocketError::timeout("receive", self.deadline));
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(SocketError::io("receive", e)),
            }
        }

        buffer.truncate(received);
        Ok(received)
    }
}

/// True for the errors a per-call timeout produces (`WouldBlock` on Unix,
/// `TimedOut` on Windows).
fn is_stall(error: &std::io::Error) -> bool {
    matches!(error.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

fn resolve_ipv4(host: &str, port: u16) -> Result<SocketAddr, SocketError> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|e| SocketError::resolution(host, e.to_string()))?;
    addrs
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| SocketError::resolution(host, "no IPv4 address found"))
}
