//! Request parsing.
//!
//! # Invariants
//! - `method` and `path` are the first two whitespace-delimited tokens of
//!   the first line; the version token is kept but never validated.
//! - The body is everything after the first `\r\n\r\n`, with trailing
//!   whitespace removed; it is empty when the separator is absent.
//! - The body must be valid UTF-8; it is never altered beyond the trim.
//! - Headers are not interpreted; `Content-Length` is not checked.

use std::error::Error;
use std::fmt::{Display, Formatter};

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Request method token. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Other(String),
}

impl Method {
    fn from_token(token: &str) -> Self {
        match token {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Other(token) => token,
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestParseError {
    /// The first line does not carry at least a method and a path.
    MalformedRequestLine(String),
    /// The body is not valid UTF-8.
    InvalidBodyEncoding,
}

impl Display for RequestParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedRequestLine(line) => write!(f, "malformed request line `{line}`"),
            Self::InvalidBodyEncoding => write!(f, "request body is not valid UTF-8"),
        }
    }
}

impl Error for RequestParseError {}

/// A parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub version: Option<String>,
    pub body: String,
}

impl Request {
    /// Parses a raw buffer.
    ///
    /// Invalid UTF-8 in the head is replaced; in the body it is rejected.
    pub fn parse(raw: &[u8]) -> Result<Self, RequestParseError> {
        let (head, body) = match raw
            .windows(HEADER_TERMINATOR.len())
            .position(|window| window == HEADER_TERMINATOR)
        {
            Some(at) => (&raw[..at], &raw[at + HEADER_TERMINATOR.len()..]),
            None => (raw, &[][..]),
        };
        let head = String::from_utf8_lossy(head);

        let request_line = head.lines().next().unwrap_or_default();
        let mut tokens = request_line.split_whitespace();
        let (method, path) = match (tokens.next(), tokens.next()) {
            (Some(method), Some(path)) => (method, path),
            _ => {
                return Err(RequestParseError::MalformedRequestLine(
                    request_line.chars().take(80).collect(),
                ))
            }
        };
        let version = tokens.next().map(str::to_string);

        let body = std::str::from_utf8(body)
            .map_err(|_| RequestParseError::InvalidBodyEncoding)?
            .trim_end();

        Ok(Self {
            method: Method::from_token(method),
            path: path.to_string(),
            version,
            body: body.to_string(),
        })
    }
}
