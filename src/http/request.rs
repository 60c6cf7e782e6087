//! Request formatting.

/// Formats a minimal HTTP/1.0 GET request.
///
/// The request carries a `Host` field with an explicit port, a
/// `Content-type: text/plain` field and a zero `Content-length`, followed by
/// the empty line that ends the header and one more CRLF.
///
/// # Examples
///
/// ```
/// use http_get::http::format_get_request;
///
/// let request = format_get_request("example.com", 80, "/index.html");
/// assert!(request.starts_with("GET /index.html HTTP/1.0\r\nHost: example.com:80\r\n"));
/// ```
#[must_use]
pub fn format_get_request(host: &str, port: u16, path: &str) -> String {
    format!(
        "GET {path} HTTP/1.0\r\n\
         Host: {host}:{port}\r\n\
         Content-type: text/plain\r\n\
         Content-length: 0\r\n\
         \r\n\
         \r\n"
    )
}
