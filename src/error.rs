//! Error type for parsing.

use core::fmt::{self, Display};

/// Error returned when input does not match the serialize grammar.
///
/// `offset` is the byte offset at which matching failed, accumulated through
/// nested containers so it is always relative to the start of the original
/// input. `total` carries the input's byte length; it is stamped on at the
/// top level, so diagnostics read "at offset K of N bytes".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The specific kind of mismatch.
    pub kind: ParseErrorKind,
    /// Byte offset at which the grammar failed to match.
    pub offset: usize,
    /// Byte length of the whole input.
    pub total: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, offset: usize) -> Self {
        ParseError {
            kind,
            offset,
            total: 0,
        }
    }

    /// Shifts the offset by the bytes a caller had already consumed, so a
    /// nested failure reports its absolute position.
    pub(crate) fn shift(mut self, by: usize) -> Self {
        self.offset += by;
        self
    }

    pub(crate) fn with_total(mut self, total: usize) -> Self {
        self.total = total;
        self
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error at offset {} of {} bytes: {}",
            self.offset, self.total, self.kind
        )
    }
}

impl core::error::Error for ParseError {}

/// Specific kinds of grammar mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No grammar production starts with this byte (`None` at end of input).
    UnrecognizedTag {
        /// The byte found at the failure position, if any.
        found: Option<char>,
    },
    /// A tag matched but its payload did not fit the tag's production.
    InvalidPayload {
        /// The tag whose payload was malformed.
        tag: char,
    },
    /// A string payload never summed to exactly the declared byte count.
    StringLength {
        /// The byte count declared in the length prefix.
        declared: usize,
        /// The bytes actually available/consumed when the mismatch surfaced.
        consumed: usize,
    },
    /// The closing quote after a string payload was absent.
    MissingQuote,
    /// A container element was not followed by `;` or `}`.
    MissingDelimiter,
    /// A container did not close with `}` after its declared pairs.
    UnterminatedContainer {
        /// The pair count declared in the container header.
        declared: usize,
    },
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnrecognizedTag { found: Some(c) } => {
                write!(f, "unrecognized tag {c:?}")
            }
            ParseErrorKind::UnrecognizedTag { found: None } => {
                write!(f, "unexpected end of input")
            }
            ParseErrorKind::InvalidPayload { tag } => {
                write!(f, "malformed payload for tag {tag:?}")
            }
            ParseErrorKind::StringLength { declared, consumed } => {
                write!(
                    f,
                    "string payload of {consumed} bytes does not match declared length {declared}"
                )
            }
            ParseErrorKind::MissingQuote => write!(f, "missing closing quote"),
            ParseErrorKind::MissingDelimiter => {
                write!(f, "expected ';' or '}}' after element")
            }
            ParseErrorKind::UnterminatedContainer { declared } => {
                write!(f, "container of {declared} pairs not closed with '}}'")
            }
        }
    }
}
