//! HTTP/1.0 request formatting and response header handling.
//!
//! - [`format_get_request`] builds the request text sent to the server.
//! - [`read_response_header`] consumes a header from a socket without reading
//!   into the body.
//! - [`HttpResponse`] is the parsed status line and field map.

mod error;
mod request;
mod response;

pub use error::HeaderError;
pub use request::format_get_request;
pub use response::{HEADER_TERMINATOR, HttpResponse, read_response_header};
