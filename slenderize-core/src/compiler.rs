//! Compiler facade: source in, composed markup out.
//!
//! # Example
//!
//! ```
//! use slenderize_core::Compiler;
//!
//! let mut compiler = Compiler::new();
//! compiler.parse(&b"div\n\tp|Hello, world!\n"[..]).unwrap();
//! assert_eq!(
//!     compiler.compose().as_deref(),
//!     Some("<div><p>Hello, world!</p></div>\n"),
//! );
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{ParseError, ParseErrorKind, Result};
use crate::fragment::Fragment;
use crate::parser::Parser;
use crate::queue::OutputQueue;
use crate::reader::ByteReader;

/// The fragments of one successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledOutput {
    fragments: OutputQueue,
}

impl CompiledOutput {
    /// Fragments in emission order.
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Render every fragment in order, with one trailing newline.
    pub fn compose(&self) -> String {
        self.fragments.compose()
    }

    /// Take the fragments out, front to back.
    pub fn into_fragments(mut self) -> Vec<Fragment> {
        self.fragments.drain_in_order().collect()
    }
}

/// Compile a source of unknown size.
pub fn compile<R: Read>(source: R) -> Result<CompiledOutput> {
    run(ByteReader::new(source))
}

/// Compile a file. Its size is taken from the file metadata.
pub fn compile_file(path: impl AsRef<Path>) -> Result<CompiledOutput> {
    let path = path.as_ref();
    let io_failure = |e| ParseError::new(ParseErrorKind::Io(e), 1);
    let file = File::open(path).map_err(io_failure)?;
    let size = file.metadata().map_err(io_failure)?.len();
    debug!(path = %path.display(), size, "compiling view");
    run(ByteReader::with_size(file, size))
}

fn run<R: Read>(reader: ByteReader<R>) -> Result<CompiledOutput> {
    match Parser::new(reader).parse() {
        Ok(fragments) => {
            debug!(fragments = fragments.len(), "parse finished");
            Ok(CompiledOutput { fragments })
        }
        Err(err) => {
            debug!(line = err.line, code = err.code().message(), error = %err.kind, "parse failed");
            Err(err)
        }
    }
}

/// Stateful facade: `parse`, then `compose`.
///
/// Each `parse` starts from fresh state and discards the previous result,
/// so one compiler can be reused for any number of sources.
#[derive(Debug, Default)]
pub struct Compiler {
    output: Option<CompiledOutput>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source`. On error nothing is kept for `compose`.
    pub fn parse<R: Read>(&mut self, source: R) -> Result<()> {
        self.output = None;
        self.output = Some(compile(source)?);
        Ok(())
    }

    /// Parse the file at `path`.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.output = None;
        self.output = Some(compile_file(path)?);
        Ok(())
    }

    /// Composed output of the last successful parse, `None` if the last
    /// parse failed or nothing has been parsed yet.
    pub fn compose(&self) -> Option<String> {
        self.output.as_ref().map(CompiledOutput::compose)
    }

    pub fn output(&self) -> Option<&CompiledOutput> {
        self.output.as_ref()
    }
}
