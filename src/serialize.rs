//! Canonical wire rendering of start lines.
//!
//! Output is always `\r\n`-terminated, whatever terminator the value was
//! parsed from.

use crate::status::StatusLine;
use crate::types::RequestLine;

/// Render `<METHOD> <target> HTTP/<major>.<minor>\r\n`.
///
/// The target is written back byte-for-byte.
pub fn render(line: &RequestLine) -> Vec<u8> {
    let version = line.version.to_string();
    let mut out = Vec::with_capacity(
        line.method.as_bytes().len() + line.target.len() + version.len() + 9,
    );

    out.extend_from_slice(line.method.as_bytes());
    out.push(b' ');
    out.extend_from_slice(line.target.as_bytes());
    out.extend_from_slice(b" HTTP/");
    out.extend_from_slice(version.as_bytes());
    out.extend_from_slice(b"\r\n");
    out
}

/// Render `HTTP/<major>.<minor> <code> <reason>\r\n`.
pub fn render_status(line: &StatusLine) -> Vec<u8> {
    format!("{line}\r\n").into_bytes()
}
