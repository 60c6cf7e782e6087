//! Deadline-bounded TCP transport.
//!
//! [`DeadlineSocket`] turns the partial reads and writes of a TCP stream into
//! whole-buffer operations that fail only when the peer stops making progress
//! for longer than a configurable stall deadline.
//!
//! # Example
//!
//! ```no_run
//! use http_get::net::DeadlineSocket;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut socket = DeadlineSocket::connect("example.com", 80)?;
//! socket.set_deadline_secs(5);
//! socket.send(b"GET / HTTP/1.0\r\n\r\n")?;
//! let mut buffer = vec![0; 4096];
//! let received = socket.receive(&mut buffer)?;
//! println!("got {received} bytes");
//! # Ok(())
//! # }
//! ```

mod error;
mod socket;

pub use error::SocketError;
pub use socket::{DEFAULT_DEADLINE, DeadlineSocket, POLL_INTERVAL};
