use tracing::{debug, trace};

use crate::error::ParseError;
use crate::status::{StatusCode, StatusLine};
use crate::types::{Method, RequestLine, Target, Version};

/// Shortest input accepted for a request line (`GET / HTTP/1.1\n`).
pub const MIN_REQUEST_LINE_LEN: usize = 15;

/// Shortest input accepted for a status line (`HTTP/1.1 200 OK\n`).
pub const MIN_STATUS_LINE_LEN: usize = 16;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configurable limits for the start-line parser.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Maximum length of the start line, terminator excluded (default: 8 192).
    pub max_line_len: usize,
    /// Accept a bare `\n` when no `\r\n` is present (default: `true`).
    pub allow_bare_lf: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_line_len: 8_192,
            allow_bare_lf: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Line splitting
// ---------------------------------------------------------------------------

/// The terminator that ended a start line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// Canonical `\r\n`.
    CrLf,
    /// Tolerated bare `\n`.
    Lf,
}

impl LineEnding {
    /// Number of bytes the terminator occupies.
    pub fn len(self) -> usize {
        match self {
            Self::CrLf => 2,
            Self::Lf => 1,
        }
    }
}

/// A start line cut out of the input buffer.
#[derive(Debug)]
struct Line<'a> {
    content: &'a [u8],
    ending: LineEnding,
    /// Offset of the first byte after the terminator.
    resume: usize,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// A stateless parser for HTTP/1.x start lines.
///
/// The parser only borrows its input for the duration of a call; parsed
/// values own copies of the bytes they need, so the caller may reuse its
/// buffer immediately afterwards. A `Parser` may be shared freely between
/// threads.
///
/// # Usage
///
/// ```rust
/// use startline::{Method, Parser};
///
/// let parser = Parser::new();
/// let data = b"GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n";
/// let (line, resume) = parser.parse_request_line(data).unwrap();
///
/// assert_eq!(line.method, Method::GET);
/// assert_eq!(&data[resume..], b"Host: localhost\r\n\r\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a new parser with custom limits.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// The limits this parser applies.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse the request line at the start of `data`.
    ///
    /// On success returns the line and the offset of the first byte after
    /// its terminator, where header parsing should resume.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] classifying the first violation found. The
    /// length guard runs before the terminator search, the structural scan
    /// before the method and version are decoded.
    pub fn parse_request_line(&self, data: &[u8]) -> Result<(RequestLine, usize), ParseError> {
        self.request_line(data)
            .inspect_err(|err| debug!(len = data.len(), "rejected request line: {err}"))
    }

    /// Parse the status line at the start of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] classifying the first violation found.
    pub fn parse_status_line(&self, data: &[u8]) -> Result<(StatusLine, usize), ParseError> {
        self.status_line(data)
            .inspect_err(|err| debug!(len = data.len(), "rejected status line: {err}"))
    }

    fn request_line(&self, data: &[u8]) -> Result<(RequestLine, usize), ParseError> {
        check_min_len(data, MIN_REQUEST_LINE_LEN)?;
        let line = self.split_line(data)?;
        let fields = scan_request_line(line.content)?;

        let method = Method::from_bytes(fields.method)?;
        let version = Version::from_digits(fields.major, fields.minor)?;
        let request_line = RequestLine::new(method, Target::from_scanned(fields.target), version);

        trace!(
            method = %request_line.method,
            target = %request_line.target,
            version = %request_line.version,
            ending = ?line.ending,
            resume = line.resume,
            "parsed request line"
        );
        Ok((request_line, line.resume))
    }

    fn status_line(&self, data: &[u8]) -> Result<(StatusLine, usize), ParseError> {
        check_min_len(data, MIN_STATUS_LINE_LEN)?;
        let line = self.split_line(data)?;
        let fields = scan_status_line(line.content)?;

        let version = Version::from_digits(fields.major, fields.minor)?;
        let code = StatusCode::new(three_digits(fields.code))?;
        let status_line = StatusLine::new(version, code);

        trace!(
            version = %status_line.version,
            code = %status_line.code,
            ending = ?line.ending,
            resume = line.resume,
            "parsed status line"
        );
        Ok((status_line, line.resume))
    }

    /// Locate the terminator: `\r\n` anywhere in the buffer wins over any
    /// bare `\n`, which is only searched for when no `\r\n` exists.
    fn split_line<'a>(&self, data: &'a [u8]) -> Result<Line<'a>, ParseError> {
        let (index, ending) = match find_crlf(data) {
            Some(index) => (index, LineEnding::CrLf),
            None if self.config.allow_bare_lf => match data.iter().position(|&b| b == b'\n') {
                Some(index) => (index, LineEnding::Lf),
                None => return Err(ParseError::MissingLineTerminator),
            },
            None => return Err(ParseError::MissingLineTerminator),
        };

        if index > self.config.max_line_len {
            return Err(ParseError::LineTooLong {
                len: index,
                max: self.config.max_line_len,
            });
        }

        Ok(Line {
            content: &data[..index],
            ending,
            resume: index + ending.len(),
        })
    }
}

fn check_min_len(data: &[u8], min: usize) -> Result<(), ParseError> {
    if data.len() < min {
        return Err(ParseError::InputTooShort {
            len: data.len(),
            min,
        });
    }
    Ok(())
}

fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(2).position(|w| w == b"\r\n")
}

// ---------------------------------------------------------------------------
// Grammar scanning
// ---------------------------------------------------------------------------

/// Byte spans of a structurally valid request line.
#[derive(Debug, PartialEq, Eq)]
struct RequestFields<'a> {
    method: &'a [u8],
    target: &'a [u8],
    major: &'a [u8],
    minor: &'a [u8],
}

/// Byte spans of a structurally valid status line.
#[derive(Debug, PartialEq, Eq)]
struct StatusFields<'a> {
    major: &'a [u8],
    minor: &'a [u8],
    code: &'a [u8],
}

/// ```text
/// request-line = *WSP method SP target SP "HTTP/" major "." minor
/// ```
fn scan_request_line(line: &[u8]) -> Result<RequestFields<'_>, ParseError> {
    let mut cursor = Cursor::new(line);

    cursor.take_while(is_space);
    let method = cursor.take_while(|b| !is_space(b));
    if method.is_empty() {
        return Err(mismatch("missing method"));
    }
    cursor.expect(b" ", "single SP after method")?;

    let target = cursor.take_while(|b| !is_space(b));
    if target.is_empty() {
        return Err(mismatch("empty request target"));
    }
    cursor.expect(b" ", "single SP after request target")?;

    cursor.expect(b"HTTP/", "\"HTTP/\" literal")?;
    let (major, minor) = scan_version(&mut cursor)?;
    cursor.expect_end("version")?;

    Ok(RequestFields {
        method,
        target,
        major,
        minor,
    })
}

/// ```text
/// status-line = "HTTP/" major "." minor SP 3DIGIT SP 1*(ALPHA / SP / "-")
/// ```
fn scan_status_line(line: &[u8]) -> Result<StatusFields<'_>, ParseError> {
    let mut cursor = Cursor::new(line);

    cursor.expect(b"HTTP/", "\"HTTP/\" literal")?;
    let (major, minor) = scan_version(&mut cursor)?;
    cursor.expect(b" ", "single SP after version")?;

    let code = cursor.take_while(|b| b.is_ascii_digit());
    if code.len() != 3 {
        return Err(mismatch("status code must be exactly three digits"));
    }
    cursor.expect(b" ", "single SP after status code")?;

    let reason = cursor.take_while(is_reason_byte);
    if reason.is_empty() {
        return Err(mismatch("missing reason phrase"));
    }
    cursor.expect_end("reason phrase")?;

    Ok(StatusFields { major, minor, code })
}

/// Digit runs are returned as found, possibly empty; the version decoder
/// classifies them.
fn scan_version<'a>(cursor: &mut Cursor<'a>) -> Result<(&'a [u8], &'a [u8]), ParseError> {
    let major = cursor.take_while(|b| b.is_ascii_digit());
    cursor.expect(b".", "'.' between version numbers")?;
    let minor = cursor.take_while(|b| b.is_ascii_digit());
    Ok((major, minor))
}

/// Value of a run already checked to be three ASCII digits.
fn three_digits(code: &[u8]) -> u16 {
    code.iter()
        .fold(0u16, |acc, &b| acc * 10 + u16::from(b - b'0'))
}

fn mismatch(reason: &str) -> ParseError {
    ParseError::GrammarMismatch(reason.to_owned())
}

/// Forward-only reader over a single line.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Consume the longest run of bytes satisfying `pred`.
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while self.pos < self.bytes.len() && pred(self.bytes[self.pos]) {
            self.pos += 1;
        }
        &self.bytes[start..self.pos]
    }

    fn expect(&mut self, literal: &[u8], expected: &str) -> Result<(), ParseError> {
        if self.bytes[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            Ok(())
        } else {
            Err(ParseError::GrammarMismatch(format!(
                "expected {expected} at byte {}",
                self.pos
            )))
        }
    }

    fn expect_end(&self, after: &str) -> Result<(), ParseError> {
        if self.pos == self.bytes.len() {
            Ok(())
        } else {
            Err(ParseError::GrammarMismatch(format!(
                "{} trailing bytes after {after}",
                self.bytes.len() - self.pos
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Character classification helpers
// ---------------------------------------------------------------------------

/// Whitespace as understood by the start-line grammar: SP, HTAB, LF, VT, FF
/// and CR.
#[inline]
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// Reason-phrase bytes: letters, SP and `-` (as in `Multi-Status`).
#[inline]
fn is_reason_byte(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b' ' || b == b'-'
}

// ---------------------------------------------------------------------------
// Tests (unit)
// ---------------------------------------------------------------------------
