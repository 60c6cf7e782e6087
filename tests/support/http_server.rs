//! Scripted HTTP/1.0 server on a localhost port.
//!
//! Every connection is answered by a routing closure that maps the request
//! path to a [`Reply`]. The server thread lives until the test process exits.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::socket_guard::bind_localhost_or_skip;

/// What the server does with one request.
pub enum Reply {
    /// Send these bytes (header and body) and close.
    Raw(Vec<u8>),
    /// Send nothing for this long, then close.
    Stall(Duration),
}

impl Reply {
    /// `200 OK` with a matching `Content-Length`.
    pub fn ok(body: &[u8]) -> Self {
        let mut raw =
            format!("HTTP/1.0 200 OK\r\nContent-Length: {}\r\n\r\n", body.len()).into_bytes();
        raw.extend_from_slice(body);
        Self::Raw(raw)
    }

    /// Redirect to `location`.
    pub fn redirect(status: &str, location: &str) -> Self {
        Self::Raw(format!("HTTP/1.0 {status}\r\nLocation: {location}\r\n\r\n").into_bytes())
    }

    /// A header block with no body.
    pub fn status(status: &str) -> Self {
        Self::Raw(format!("HTTP/1.0 {status}\r\n\r\n").into_bytes())
    }
}

pub struct TestServer {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Starts a server, or returns `None` when sockets are unavailable.
    #[track_caller]
    pub fn start<F>(route: F) -> Option<Self>
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        let listener = bind_localhost_or_skip()?;
        let port = listener.local_addr().expect("local addr").port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        let route = Arc::new(route);

        thread::spawn(move || accept_loop(&listener, &route, &log));

        Some(Self { port, requests })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    /// Request paths seen so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log").clone()
    }
}

fn accept_loop<F>(listener: &TcpListener, route: &Arc<F>, log: &Arc<Mutex<Vec<String>>>)
where
    F: Fn(&str) -> Reply + Send + Sync + 'static,
{
    for stream in listener.incoming() {
        let Ok(stream) = stream else { continue };
        let route = Arc::clone(route);
        let log = Arc::clone(log);
        thread::spawn(move || handle(stream, &*route, &log));
    }
}

fn handle<F>(mut stream: TcpStream, route: &F, log: &Mutex<Vec<String>>)
where
    F: Fn(&str) -> Reply,
{
    let Some(path) = read_request_path(&mut stream) else {
        return;
    };
    log.lock().expect("request log").push(path.clone());

    match route(&path) {
        Reply::Raw(bytes) => {
            let _ = stream.write_all(&bytes);
        }
        Reply::Stall(duration) => thread::sleep(duration),
    }
    finish(stream);
}

/// Reads up to the blank line ending the request header and returns the path.
fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut request = Vec::new();
    let mut byte = [0u8; 1];
    while !request.ends_with(b"\r\n\r\n") {
        match stream.read(&mut byte) {
            Ok(1) => request.push(byte[0]),
            _ => return None,
        }
    }
    let text = String::from_utf8_lossy(&request);
    let first_line = text.lines().next()?;
    first_line.split(' ').nth(1).map(str::to_string)
}

/// Closes the write side and drains the trailing request bytes so the close
/// is a clean FIN rather than a reset.
fn finish(mut stream: TcpStream) {
    let _ = stream.shutdown(Shutdown::Write);
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut sink = [0u8; 256];
    while matches!(stream.read(&mut sink), Ok(n) if n > 0) {}
}

/// Deterministic body of `len` bytes that is not a repeating short pattern.
pub fn patterned_body(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| ((i * 7919) ^ (i >> 8)) as u8)
        .collect()
}
