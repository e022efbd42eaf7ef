use serde::Serialize;
use std::fmt;

use crate::status::StatusLine;
use crate::types::RequestLine;

/// Either kind of HTTP/1.x start line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StartLine {
    Request(RequestLine),
    Status(StatusLine),
}

impl StartLine {
    /// Canonical CRLF-terminated wire form.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Request(line) => line.to_bytes(),
            Self::Status(line) => line.to_bytes(),
        }
    }
}

impl fmt::Display for StartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(line) => fmt::Display::fmt(line, f),
            Self::Status(line) => fmt::Display::fmt(line, f),
        }
    }
}

/// A parsed start line together with where the rest of the message begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub line: StartLine,
    /// Offset of the first byte after the line terminator.
    pub resume_offset: usize,
    /// Number of input bytes left for header/body parsing.
    pub remainder_len: usize,
}

impl Report {
    pub fn new(line: StartLine, resume_offset: usize, input_len: usize) -> Self {
        Self {
            line,
            resume_offset,
            remainder_len: input_len.saturating_sub(resume_offset),
        }
    }
}

/// Serialize a [`Report`] to a JSON string.
///
/// When `pretty` is `true` the output is indented for readability.
pub fn format_json(report: &Report, pretty: bool) -> String {
    let json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    json.unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

/// Render a [`Report`] in a human-readable debug format.
pub fn format_debug(report: &Report) -> String {
    let mut out = String::with_capacity(192);

    match &report.line {
        StartLine::Request(line) => {
            out.push_str("=== Request Line ===\n");
            out.push_str(&format!("Method:  {}\n", line.method));
            out.push_str(&format!("Target:  {}\n", line.target));
            out.push_str(&format!("Version: {}\n", line.version));
        }
        StartLine::Status(line) => {
            out.push_str("=== Status Line ===\n");
            out.push_str(&format!("Version: {}\n", line.version));
            out.push_str(&format!("Code:    {}\n", line.code));
            out.push_str(&format!("Reason:  {}\n", line.reason()));
        }
    }

    out.push_str(&format!(
        "\n--- Remainder ({} bytes from offset {}) ---\n",
        report.remainder_len, report.resume_offset
    ));
    out.push_str("====================\n");
    out
}

/// Render the canonical wire form, lossily decoded for display.
pub fn format_wire(report: &Report) -> String {
    String::from_utf8_lossy(&report.line.to_bytes()).into_owned()
}
