//! # startline
//!
//! A **strict HTTP/1.x start-line parser** and canonical serializer,
//! designed for use both as a Rust library and as a CLI tool.
//!
//! The parser consumes a buffer that begins with one request (or response)
//! line, validates it against the start-line grammar and returns the
//! structured line together with the offset where header parsing should
//! resume. It performs no I/O, keeps no state between calls and never
//! borrows the input past the call.
//!
//! ## Quick start — parsing
//!
//! ```rust
//! use startline::{parse_request_line, Method, Version};
//!
//! let raw = b"GET /hello HTTP/1.1\r\nHost: example.com\r\n\r\n";
//! let (line, resume) = parse_request_line(raw).expect("valid request line");
//! assert_eq!(line.method, Method::GET);
//! assert_eq!(line.target, "/hello");
//! assert_eq!(line.version, Version::HTTP_11);
//! assert_eq!(&raw[resume..], b"Host: example.com\r\n\r\n");
//! ```
//!
//! ## Quick start — rendering
//!
//! ```rust
//! use startline::{render, Method, RequestLine, Target};
//!
//! let mut line = RequestLine::default();
//! line.method = Method::POST;
//! line.target = Target::new("/api").unwrap();
//! assert_eq!(render(&line), b"POST /api HTTP/1.1\r\n");
//! ```

mod error;
mod output;
mod parser;
mod serialize;
mod status;
mod types;

// Re-export public API.
pub use error::ParseError;
pub use output::{format_debug, format_json, format_wire, Report, StartLine};
pub use parser::{LineEnding, Parser, ParserConfig, MIN_REQUEST_LINE_LEN, MIN_STATUS_LINE_LEN};
pub use serialize::{render, render_status};
pub use status::{StatusCode, StatusLine};
pub use types::{Method, RequestLine, Target, Version};

/// Parse the request line at the start of `data` with default limits.
///
/// This is a convenience wrapper around [`Parser`]. Returns the line and the
/// offset of the first byte after its terminator.
///
/// # Errors
///
/// Returns [`ParseError`] if the data is too short, unterminated, or does
/// not match the request-line grammar.
pub fn parse_request_line(data: &[u8]) -> Result<(RequestLine, usize), ParseError> {
    Parser::new().parse_request_line(data)
}

/// Parse the request line at the start of `data` using custom
/// [`ParserConfig`] limits.
///
/// # Errors
///
/// Returns [`ParseError`] if the data is malformed or exceeds the
/// configured limits.
pub fn parse_request_line_with_config(
    data: &[u8],
    config: ParserConfig,
) -> Result<(RequestLine, usize), ParseError> {
    Parser::with_config(config).parse_request_line(data)
}

/// Parse the status line at the start of `data` with default limits.
///
/// # Errors
///
/// Returns [`ParseError`] if the data is too short, unterminated, or does
/// not match the status-line grammar.
pub fn parse_status_line(data: &[u8]) -> Result<(StatusLine, usize), ParseError> {
    Parser::new().parse_status_line(data)
}
