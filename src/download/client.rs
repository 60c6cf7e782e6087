//! One request/response exchange: connect, send the GET request, read the header.

use std::time::Duration;

use tracing::{debug, instrument};

use super::error::DownloadError;
use crate::http::{HttpResponse, format_get_request, read_response_header};
use crate::net::DeadlineSocket;
use crate::parser::ParsedUrl;

/// Opens a connection to `target`, sends a GET request and reads the response header.
///
/// The returned socket is positioned at the first body byte. `url` is the
/// string form of `target` used in error messages.
///
/// # Errors
///
/// - [`DownloadError::Socket`] if resolution, connect, send or receive fails
/// - [`DownloadError::RequestNotSent`] if the request could only be sent in part
/// - [`DownloadError::IncompleteHeader`] if the peer closes or stalls inside the header
#[instrument(level = "debug", skip(target, deadline), fields(url = %url))]
pub(crate) fn request_header(
    target: &ParsedUrl,
    url: &str,
    deadline: Duration,
) -> Result<(DeadlineSocket, HttpResponse), DownloadError> {
    debug!(host = %target.host, port = target.port, "looking up host");
    let mut socket = DeadlineSocket::connect_with_deadline(&target.host, target.port, deadline)
        .map_err(|e| DownloadError::socket(url, e))?;
    debug!(peer = ?socket.peer_addr(), "host found and connected");

    let request = format_get_request(&target.host, target.port, target.request_target());
    let sent = socket
        .send(request.as_bytes())
        .map_err(|e| DownloadError::socket(url, e))?;
    if !sent {
        return Err(DownloadError::request_not_sent(url));
    }

    let response =
        read_response_header(&mut socket).map_err(|e| DownloadError::header(url, e))?;
    Ok((socket, response))
}
