//! Single-byte lookahead matching: `accept` and `expect`.
//!
//! Both primitives read one byte and test it against a [`Pattern`]. On a
//! match the byte may be appended to the scratch buffer, which collects
//! the symbol currently being recognized. `accept` pushes a mismatching
//! byte back and reports `false`; `expect` turns a mismatch into a fatal
//! [`ParseError`]. One byte of pushback is the only backtracking there is.

use std::io::Read;

use crate::error::{ParseError, ParseErrorKind, Result};
use crate::reader::ByteReader;

/// Character classes the grammar matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// `0-9`
    Digit,
    /// `a-z`, `A-Z`
    Letter,
    /// ASCII punctuation other than quotes and `=`
    Symbol,
    /// Letter, digit or `_`
    Identifier,
    /// Anything but a newline
    Content,
    /// Letter, digit or `-`
    AttributeIdent,
    /// Anything but a newline or the given closing quote
    Quoted(u8),
}

impl CharClass {
    #[inline]
    pub fn matches(self, b: u8) -> bool {
        match self {
            Self::Digit => b.is_ascii_digit(),
            Self::Letter => b.is_ascii_alphabetic(),
            Self::Symbol => b.is_ascii_punctuation() && !matches!(b, b'"' | b'\'' | b'='),
            Self::Identifier => b.is_ascii_alphanumeric() || b == b'_',
            Self::Content => b != b'\n',
            Self::AttributeIdent => b.is_ascii_alphanumeric() || b == b'-',
            Self::Quoted(quote) => b != b'\n' && b != quote,
        }
    }

    fn describe(self) -> String {
        match self {
            Self::Digit => "a digit".to_string(),
            Self::Letter => "a letter".to_string(),
            Self::Symbol => "a symbol".to_string(),
            Self::Identifier => "an identifier character".to_string(),
            Self::Content => "content".to_string(),
            Self::AttributeIdent => "an attribute name character".to_string(),
            Self::Quoted(quote) => format!("quoted text or {:?}", quote as char),
        }
    }
}

/// What `accept`/`expect` test the next byte against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Byte(u8),
    Class(CharClass),
}

impl Pattern {
    #[inline]
    pub fn matches(self, b: u8) -> bool {
        match self {
            Self::Byte(want) => b == want,
            Self::Class(class) => class.matches(b),
        }
    }

    pub fn describe(self) -> String {
        match self {
            Self::Byte(b) => format!("{:?}", b as char),
            Self::Class(class) => class.describe(),
        }
    }
}

impl From<u8> for Pattern {
    fn from(b: u8) -> Self {
        Self::Byte(b)
    }
}

impl From<CharClass> for Pattern {
    fn from(class: CharClass) -> Self {
        Self::Class(class)
    }
}

/// [`ByteReader`] plus the shared scratch buffer.
#[derive(Debug)]
pub struct Matcher<R> {
    reader: ByteReader<R>,
    scratch: Vec<u8>,
}

impl<R: Read> Matcher<R> {
    pub fn new(reader: ByteReader<R>) -> Self {
        Self { reader, scratch: Vec::with_capacity(64) }
    }

    /// Consume the next byte if it matches, storing it in the scratch
    /// buffer. Never fails on a mismatch.
    #[inline]
    pub fn accept(&mut self, pattern: impl Into<Pattern>) -> Result<bool> {
        self.accept_with(pattern.into(), true)
    }

    /// [`accept`](Self::accept) without touching the scratch buffer.
    #[inline]
    pub fn skip(&mut self, pattern: impl Into<Pattern>) -> Result<bool> {
        self.accept_with(pattern.into(), false)
    }

    fn accept_with(&mut self, pattern: Pattern, store: bool) -> Result<bool> {
        match self.read()? {
            Some(b) if pattern.matches(b) => {
                if store {
                    self.scratch.push(b);
                }
                Ok(true)
            }
            Some(_) => {
                self.reader.push_back();
                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// Consume the next byte, which must match, storing it in the scratch
    /// buffer.
    #[inline]
    pub fn expect(&mut self, pattern: impl Into<Pattern>) -> Result<()> {
        self.expect_with(pattern.into(), true)
    }

    /// [`expect`](Self::expect) without touching the scratch buffer.
    #[inline]
    pub fn require(&mut self, pattern: impl Into<Pattern>) -> Result<()> {
        self.expect_with(pattern.into(), false)
    }

    fn expect_with(&mut self, pattern: Pattern, store: bool) -> Result<()> {
        match self.read()? {
            Some(b) if pattern.matches(b) => {
                if store {
                    self.scratch.push(b);
                }
                Ok(())
            }
            Some(b) => Err(self.error(ParseErrorKind::UnexpectedByte {
                expected: pattern.describe(),
                found: b as char,
            })),
            None => Err(self.error(ParseErrorKind::UnexpectedEndOfInput {
                expected: pattern.describe(),
            })),
        }
    }

    /// Accept as many matching bytes as there are. Returns how many.
    pub fn accept_while(&mut self, pattern: impl Into<Pattern>) -> Result<usize> {
        let pattern = pattern.into();
        let mut n = 0;
        while self.accept_with(pattern, true)? {
            n += 1;
        }
        Ok(n)
    }

    /// One required byte of `pattern` followed by any number more.
    pub fn expect_run(&mut self, pattern: impl Into<Pattern>) -> Result<()> {
        let pattern = pattern.into();
        self.expect_with(pattern, true)?;
        self.accept_while(pattern)?;
        Ok(())
    }

    fn read(&mut self) -> Result<Option<u8>> {
        self.reader
            .next_byte()
            .map_err(|e| ParseError::new(ParseErrorKind::Io(e), self.reader.line()))
    }

    /// Build a fatal error at the current line.
    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.reader.line())
    }

    #[inline]
    pub fn clear_scratch(&mut self) {
        self.scratch.clear();
    }

    /// Take the scratch contents as text, leaving the buffer empty.
    pub fn take_scratch(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.scratch).into_owned();
        self.scratch.clear();
        text
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.reader.is_eof()
    }

    #[inline]
    pub fn line(&self) -> usize {
        self.reader.line()
    }
}
