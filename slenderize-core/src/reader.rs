//! Chunked, positional byte reader with a single byte of pushback.
//!
//! The reader pulls the source in fixed-size chunks so large views never
//! have to sit in memory whole. It also owns the line counter: a newline
//! byte bumps the line only when the *next* byte is read, so anything
//! that fails while the newline itself is being consumed still reports
//! the line that newline terminates.

use std::io::{self, Read};

/// Bytes pulled from the backing store per refill.
pub const CHUNK_SIZE: usize = 4096;

/// The chunk currently in memory plus where it sits in the source.
#[derive(Debug)]
struct SourceBuffer {
    chunk: Box<[u8]>,
    /// Valid bytes in `chunk`
    len: usize,
    /// Read position within `chunk`
    pos: usize,
    /// Absolute offset of the next byte
    offset: u64,
    /// Total source size, when the backing store knows it
    size: Option<u64>,
    eof: bool,
}

impl SourceBuffer {
    fn new(size: Option<u64>) -> Self {
        Self {
            chunk: vec![0; CHUNK_SIZE].into_boxed_slice(),
            len: 0,
            pos: 0,
            offset: 0,
            size,
            eof: size == Some(0),
        }
    }
}

/// Current 1-based line, with the deferred newline bump.
#[derive(Debug, Clone, Copy)]
struct LineCounter {
    line: usize,
    /// A newline was produced and the bump is owed on the next read
    pending: bool,
    /// The last read paid an owed bump (undone by pushback)
    bumped: bool,
}

/// Byte-at-a-time reader over any [`Read`] source.
#[derive(Debug)]
pub struct ByteReader<R> {
    inner: R,
    buf: SourceBuffer,
    lines: LineCounter,
    /// Last byte produced, cleared by pushback
    last: Option<u8>,
}

impl<R: Read> ByteReader<R> {
    /// Reader over a source of unknown size. End of input is signalled
    /// by a refill returning zero bytes.
    pub fn new(inner: R) -> Self {
        Self::build(inner, None)
    }

    /// Reader over a source of known size. End of input is flagged as
    /// soon as the offset reaches `size`.
    pub fn with_size(inner: R, size: u64) -> Self {
        Self::build(inner, Some(size))
    }

    fn build(inner: R, size: Option<u64>) -> Self {
        Self {
            inner,
            buf: SourceBuffer::new(size),
            lines: LineCounter { line: 1, pending: false, bumped: false },
            last: None,
        }
    }

    /// Next raw byte, or `None` at end of input.
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        self.lines.bumped = false;
        if self.buf.pos == self.buf.len && !self.refill()? {
            self.last = None;
            return Ok(None);
        }

        if self.lines.pending {
            self.lines.line += 1;
            self.lines.pending = false;
            self.lines.bumped = true;
        }

        let byte = self.buf.chunk[self.buf.pos];
        self.buf.pos += 1;
        self.buf.offset += 1;
        if self.buf.size.is_some_and(|size| self.buf.offset >= size) {
            self.buf.eof = true;
        }
        if byte == b'\n' {
            self.lines.pending = true;
        }
        self.last = Some(byte);
        Ok(Some(byte))
    }

    /// Rewind exactly one byte. A no-op unless the previous call to
    /// [`next_byte`](Self::next_byte) produced a byte.
    pub fn push_back(&mut self) {
        let Some(byte) = self.last.take() else {
            return;
        };
        // Always in range: the byte came out of the current chunk
        self.buf.pos -= 1;
        self.buf.offset -= 1;
        if self.buf.size.is_some_and(|size| self.buf.offset < size) {
            self.buf.eof = false;
        }
        if byte == b'\n' {
            self.lines.pending = false;
        }
        if self.lines.bumped {
            self.lines.line -= 1;
            self.lines.pending = true;
            self.lines.bumped = false;
        }
    }

    fn refill(&mut self) -> io::Result<bool> {
        if self.buf.eof {
            return Ok(false);
        }
        let n = loop {
            match self.inner.read(&mut self.buf.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        self.buf.len = n;
        self.buf.pos = 0;
        if n == 0 {
            self.buf.eof = true;
            return Ok(false);
        }
        Ok(true)
    }

    /// True once the end of input has been seen (or is known to be
    /// reached from the source size).
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.buf.eof && self.buf.pos == self.buf.len
    }

    /// Current 1-based line.
    #[inline]
    pub fn line(&self) -> usize {
        self.lines.line
    }
}
