use thiserror::Error;

/// Errors that can occur while parsing an HTTP start line.
///
/// Every variant is terminal for the parse attempt that produced it: the
/// parser keeps no partial state, so the same input always yields the same
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input is shorter than the shortest possible valid start line.
    #[error("input too short: {len} bytes (minimum {min})")]
    InputTooShort {
        /// Length of the rejected input.
        len: usize,
        /// Minimum length required.
        min: usize,
    },
    /// Neither `\r\n` nor an accepted bare `\n` was found.
    #[error("missing line terminator")]
    MissingLineTerminator,
    /// A terminator was found but the line does not match the grammar.
    #[error("malformed start line: {0}")]
    GrammarMismatch(String),
    /// The method token is positionally valid but not a known method.
    #[error("unknown HTTP method: '{0}'")]
    UnknownMethod(String),
    /// A version digit run is empty, contains non-digits, or overflows.
    #[error("invalid HTTP version number: '{0}'")]
    InvalidVersionNumber(String),
    /// The start line exceeds the configured maximum length.
    #[error("start line of {len} bytes exceeds maximum of {max}")]
    LineTooLong {
        /// Length of the line, terminator excluded.
        len: usize,
        /// Configured maximum.
        max: usize,
    },
    /// The status code of a status line is outside `100..=999`.
    #[error("invalid status code: '{0}'")]
    InvalidStatusCode(String),
}

impl ParseError {
    /// Build an [`UnknownMethod`](Self::UnknownMethod) from raw token bytes.
    pub(crate) fn unknown_method(token: &[u8]) -> Self {
        Self::UnknownMethod(String::from_utf8_lossy(token).into_owned())
    }

    /// Build an [`InvalidVersionNumber`](Self::InvalidVersionNumber) from a raw digit run.
    pub(crate) fn invalid_version(digits: &[u8]) -> Self {
        Self::InvalidVersionNumber(String::from_utf8_lossy(digits).into_owned())
    }
}
