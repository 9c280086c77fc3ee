//! Parse errors.
//!
//! Every error raised by the compiler is fatal: parsing stops at the first
//! one and the error carries the 1-based line it was raised on. Failed
//! `accept` calls are not errors and never show up here.

use std::io;

use thiserror::Error;

/// Stable, copyable classification of a [`ParseErrorKind`].
///
/// Lets callers match on what went wrong without comparing messages or
/// holding on to the (non-`Clone`) I/O error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ParseErrorCode {
    /// An `expect` saw the wrong byte
    UnexpectedByte = 0,
    /// An `expect` ran into end of input
    UnexpectedEndOfInput,
    /// `{{` followed by something that is no known embedding
    MalformedEmbedding,
    /// A complete embedding body without its closing `}}`
    MissingEmbeddingSuffix,
    /// The source could not be opened or read
    IoFailure,
}

impl ParseErrorCode {
    /// Get a human-readable message for this error code.
    pub fn message(self) -> &'static str {
        match self {
            Self::UnexpectedByte => "unexpected byte",
            Self::UnexpectedEndOfInput => "unexpected end of input",
            Self::MalformedEmbedding => "unknown variable/function embedding",
            Self::MissingEmbeddingSuffix => "missing '}}' after embedding",
            Self::IoFailure => "i/o failure",
        }
    }
}

/// What went wrong, with the details needed to report it.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found:?}")]
    UnexpectedByte { expected: String, found: char },

    #[error("expected {expected}, found end of input")]
    UnexpectedEndOfInput { expected: String },

    #[error("unknown variable/function embedding")]
    MalformedEmbedding,

    #[error("missing '}}}}' after {embedding}")]
    MissingEmbeddingSuffix { embedding: String },

    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
}

impl ParseErrorKind {
    pub fn code(&self) -> ParseErrorCode {
        match self {
            Self::UnexpectedByte { .. } => ParseErrorCode::UnexpectedByte,
            Self::UnexpectedEndOfInput { .. } => ParseErrorCode::UnexpectedEndOfInput,
            Self::MalformedEmbedding => ParseErrorCode::MalformedEmbedding,
            Self::MissingEmbeddingSuffix { .. } => ParseErrorCode::MissingEmbeddingSuffix,
            Self::Io(_) => ParseErrorCode::IoFailure,
        }
    }
}

/// A fatal parse error and the line it was raised on.
#[derive(Debug, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// 1-based source line
    pub line: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: usize) -> Self {
        Self { kind, line }
    }

    #[inline]
    pub fn code(&self) -> ParseErrorCode {
        self.kind.code()
    }
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;
