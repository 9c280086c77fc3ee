//! Slenderize Core
//!
//! Compiler for an indentation-based markup shorthand. Tab depth expresses
//! nesting; each line is a tag, a tag with literal text, a tag with
//! attributes, or a `{{...}}` embedding. The output is HTML in which every
//! embedding has become an inline `<%= ... %>` directive for the host
//! runtime to evaluate.
//!
//! ```text
//! div                              <div><p>Hello</p>
//! 	p|Hello               -->     <a href="/x"></a></div>
//! 	a href="/x"
//! ```
//!
//! # Architecture
//!
//! - **reader.rs** - Chunked byte source with one byte of pushback
//! - **matcher.rs** - Byte predicates and accept/expect primitives
//! - **parser.rs** - Recursive-descent grammar over indentation depth
//! - **stack.rs** / **queue.rs** - Open-tag stack and FIFO fragment queue
//! - **fragment.rs** - Output fragments and their textual forms
//! - **compiler.rs** - `parse` / `compose` facade
//! - **runtime.rs** - Directive evaluation against bindings
//! - **page.rs** - View lookup, compiled-artifact cache, rendering

pub mod compiler;
pub mod error;
pub mod fragment;
pub mod matcher;
pub mod page;
pub mod parser;
pub mod queue;
pub mod reader;
pub mod runtime;
pub mod stack;
pub mod tags;

pub use compiler::{compile, compile_file, CompiledOutput, Compiler};
pub use error::{ParseError, ParseErrorCode, ParseErrorKind};
pub use fragment::Fragment;
pub use page::{sanitize_view_name, Page, PageConfig, PageError};
pub use runtime::{render, Binding, Bindings, Invocable, RenderError, StaticAccessor, StaticRegistry};
