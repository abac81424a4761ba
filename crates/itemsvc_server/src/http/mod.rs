//! Minimal HTTP/1.1 framing over raw byte buffers.
//!
//! Only what the item routes need: a request line, an optional body after
//! the first blank line, and fully rendered single-shot responses.

pub mod request;
pub mod response;

pub use request::{Method, Request, RequestParseError};
pub use response::{Response, StatusCode};
