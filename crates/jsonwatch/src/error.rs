use alloc::string::String;
use core::fmt;

use thiserror::Error;

/// A fatal error raised while parsing a streamed document.
///
/// Errors carry the 1-based line and column of the last character consumed
/// before the failure was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at {line}:{column}")]
pub struct ParseError {
    pub(crate) kind: ErrorKind,
    pub line: usize,
    pub column: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("unexpected end of input{}", Expected(.expected))]
    PrematureEnd { expected: Option<&'static str> },
    #[error("unexpected character {found:?}{}", Expected(.expected))]
    UnexpectedCharacter {
        found: String,
        expected: Option<&'static str>,
    },
    #[error("invalid unicode escape sequence \\u{0:04X}")]
    InvalidUnicodeEscape(u32),
    #[error("invalid UTF-8 byte 0x{0:02X}")]
    InvalidUtf8(u8),
    #[error("nesting deeper than {0} levels")]
    DepthLimitExceeded(usize),
}

struct Expected<'a>(&'a Option<&'static str>);

impl fmt::Display for Expected<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(expected) => write!(f, ", expected {expected}"),
            None => Ok(()),
        }
    }
}

impl ParseError {
    pub(crate) fn new(kind: ErrorKind, (line, column): (usize, usize)) -> Self {
        Self { kind, line, column }
    }

    /// Names what was expected when the source ended, unless already known.
    pub(crate) fn expecting(mut self, what: &'static str) -> Self {
        if let ErrorKind::PrematureEnd { expected } = &mut self.kind {
            if expected.is_none() {
                *expected = Some(what);
            }
        }
        self
    }

    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns `true` if the source ended before the document was complete.
    #[must_use]
    pub fn is_premature_end(&self) -> bool {
        matches!(self.kind, ErrorKind::PrematureEnd { .. })
    }

    /// Returns `true` if a character could not continue the grammar.
    #[must_use]
    pub fn is_unexpected_character(&self) -> bool {
        matches!(self.kind, ErrorKind::UnexpectedCharacter { .. })
    }
}
