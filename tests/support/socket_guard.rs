//! Skip-or-fail guard for tests that need a localhost socket.
//!
//! Some sandboxes forbid binding sockets. Tests skip in that case unless
//! `HTTP_GET_REQUIRE_SOCKET_TESTS=1` asks them to fail instead.

use std::net::TcpListener;
use std::panic::Location;

pub fn socket_tests_required() -> bool {
    std::env::var("HTTP_GET_REQUIRE_SOCKET_TESTS")
        .ok()
        .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

#[track_caller]
pub fn bind_localhost_or_skip() -> Option<TcpListener> {
    match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => Some(listener),
        Err(error) => {
            let location = Location::caller();
            let message = format!(
                "[socket-bound-test] cannot bind localhost socket at {}:{} ({error})",
                location.file(),
                location.line()
            );
            assert!(
                !socket_tests_required(),
                "{message}. Set HTTP_GET_REQUIRE_SOCKET_TESTS=0 to allow local skip behavior."
            );
            eprintln!(
                "{message}. Skipping test. Set HTTP_GET_REQUIRE_SOCKET_TESTS=1 to fail-fast instead."
            );
            None
        }
    }
}
