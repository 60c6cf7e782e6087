//! Localhost socket helpers for unit tests.
//!
//! The bind-or-skip guard is shared with the integration tests; see
//! `tests/support/socket_guard.rs`.

use std::net::{TcpListener, TcpStream};
use std::thread::JoinHandle;

#[path = "../tests/support/socket_guard.rs"]
mod socket_guard;

pub(crate) use socket_guard::bind_localhost_or_skip;

/// Accepts one connection on `listener` and hands it to `handler` on a new thread.
pub(crate) fn serve_once<F>(listener: TcpListener, handler: F) -> JoinHandle<()>
where
    F: FnOnce(TcpStream) + Send + 'static,
{
    std::thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            handler(stream);
        }
    })
}
