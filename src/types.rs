use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::parser::is_space;

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

/// HTTP request methods recognised in a request line.
///
/// The set is closed: a token outside it is a parse failure, never a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
    OPTIONS,
    HEAD,
    TRACE,
    CONNECT,
}

impl Method {
    /// Every member, in declaration order.
    pub const ALL: [Method; 8] = [
        Self::GET,
        Self::POST,
        Self::PUT,
        Self::DELETE,
        Self::OPTIONS,
        Self::HEAD,
        Self::TRACE,
        Self::CONNECT,
    ];

    /// Decode a method from its wire token.
    ///
    /// Matching is byte-for-byte and case-sensitive; `get` is not `GET`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        match bytes {
            b"GET" => Ok(Self::GET),
            b"POST" => Ok(Self::POST),
            b"PUT" => Ok(Self::PUT),
            b"DELETE" => Ok(Self::DELETE),
            b"OPTIONS" => Ok(Self::OPTIONS),
            b"HEAD" => Ok(Self::HEAD),
            b"TRACE" => Ok(Self::TRACE),
            b"CONNECT" => Ok(Self::CONNECT),
            _ => Err(ParseError::unknown_method(bytes)),
        }
    }

    /// Return the canonical uppercase token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::DELETE => "DELETE",
            Self::OPTIONS => "OPTIONS",
            Self::HEAD => "HEAD",
            Self::TRACE => "TRACE",
            Self::CONNECT => "CONNECT",
        }
    }

    /// Return the canonical uppercase token as bytes.
    pub fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }

    /// Whether a request with this method may carry a `Content-Length` body.
    pub fn permits_body(&self) -> bool {
        matches!(self, Self::POST | Self::PUT)
    }
}

impl FromStr for Method {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// HTTP protocol version as a `major.minor` pair.
///
/// Ordering compares the major number first, then the minor number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    major: u32,
    minor: u32,
}

impl Version {
    /// HTTP/1.0
    pub const HTTP_10: Version = Version::new(1, 0);
    /// HTTP/1.1
    pub const HTTP_11: Version = Version::new(1, 1);

    /// Build a version from its two numbers.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Decode a version from its two decimal digit runs.
    ///
    /// Fails if either run is empty, holds a non-digit byte, or overflows
    /// `u32`.
    pub fn from_digits(major: &[u8], minor: &[u8]) -> Result<Self, ParseError> {
        Ok(Self {
            major: parse_decimal(major)?,
            minor: parse_decimal(minor)?,
        })
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn set_major(&mut self, major: u32) -> &mut Self {
        self.major = major;
        self
    }

    pub fn set_minor(&mut self, minor: u32) -> &mut Self {
        self.minor = minor;
        self
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::HTTP_11
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Unsigned decimal conversion that rejects signs, blanks and overflow.
fn parse_decimal(digits: &[u8]) -> Result<u32, ParseError> {
    if digits.is_empty() {
        return Err(ParseError::invalid_version(digits));
    }

    digits.iter().try_fold(0u32, |acc, &b| {
        if !b.is_ascii_digit() {
            return Err(ParseError::invalid_version(digits));
        }
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(b - b'0')))
            .ok_or_else(|| ParseError::invalid_version(digits))
    })
}

// ---------------------------------------------------------------------------
// Target
// ---------------------------------------------------------------------------

/// The request target, kept verbatim as it appeared on the wire.
///
/// Always non-empty and free of whitespace. Its inner structure (scheme,
/// path, query) is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target(Vec<u8>);

impl Target {
    /// Build a target from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::GrammarMismatch`] if `bytes` is empty or
    /// contains a whitespace byte.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ParseError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ParseError::GrammarMismatch("empty request target".into()));
        }
        if bytes.iter().copied().any(is_space) {
            return Err(ParseError::GrammarMismatch(
                "whitespace in request target".into(),
            ));
        }
        Ok(Self(bytes))
    }

    /// Wrap bytes already known to satisfy the target invariant.
    pub(crate) fn from_scanned(bytes: &[u8]) -> Self {
        debug_assert!(!bytes.is_empty());
        Self(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Return the target as `&str` if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed target.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Target {
    fn default() -> Self {
        Self(b"/".to_vec())
    }
}

impl FromStr for Target {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl PartialEq<str> for Target {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for Target {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(&self.0))
    }
}

// ---------------------------------------------------------------------------
// RequestLine
// ---------------------------------------------------------------------------

/// The start line of an HTTP/1.x request.
///
/// Defaults to `GET / HTTP/1.1`. Each field may be replaced independently to
/// build outbound lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct RequestLine {
    /// The request method.
    pub method: Method,
    /// The request target.
    pub target: Target,
    /// The protocol version.
    pub version: Version,
}

impl RequestLine {
    pub fn new(method: Method, target: Target, version: Version) -> Self {
        Self {
            method,
            target,
            version,
        }
    }

    /// Parse a request line from the start of `data` with default limits.
    ///
    /// Returns the line and the offset of the first byte after its
    /// terminator. See [`crate::Parser::parse_request_line`].
    pub fn parse(data: &[u8]) -> Result<(Self, usize), ParseError> {
        crate::parse_request_line(data)
    }

    /// The exact-match key used to pick a route handler.
    pub fn route_key(&self) -> (Method, &Target) {
        (self.method, &self.target)
    }

    /// Render the canonical CRLF-terminated wire form.
    pub fn to_bytes(&self) -> Vec<u8> {
        crate::serialize::render(self)
    }
}

/// Renders the line without its terminator, e.g. `GET / HTTP/1.1`.
impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} HTTP/{}", self.method, self.target, self.version)
    }
}
