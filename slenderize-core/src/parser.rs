//! Recursive-descent grammar over single-byte lookahead.
//!
//! ```text
//! line       := TAB* ( NL | embedding NL | tag after_tag )
//! tag        := LETTER+
//! after_tag  := NL                                      ; bare open
//!             | '|' CONTENT+ NL                         ; literal block
//!             | ' ' item (' ' item)* NL                 ; attributed
//! item       := embedding | attribute
//! attribute  := ATTR_IDENT+ '=' ( '"' [^"\n]* '"' | '\'' [^'\n]* '\'' )
//! embedding  := '{{' '$' IDENT ( '}}' | '->' IDENT '()' '}}' )
//!             | '{{' '\'? IDENT ('\' IDENT)* '::' ( IDENT '()' | '$' IDENT ) '}}'
//! ```
//!
//! End of input counts as a line terminator. Indentation is tabs only.
//! The parser keeps a `depth` counter: each non-blank line first closes
//! one open tag per level its tab count sits below `depth`, then sets
//! `depth` to that tab count, and every opened tag adds one. Everything
//! still open is closed once the input runs out.

use std::io::Read;

use tracing::{trace, warn};

use crate::error::{ParseErrorKind, Result};
use crate::fragment::Fragment;
use crate::matcher::{CharClass, Matcher};
use crate::queue::OutputQueue;
use crate::reader::ByteReader;
use crate::stack::TagStack;
use crate::tags;

/// Per-parse state: source, scratch, open tags and emitted fragments.
#[derive(Debug)]
pub struct Parser<R> {
    m: Matcher<R>,
    tags: TagStack,
    depth: usize,
    out: OutputQueue,
}

impl<R: Read> Parser<R> {
    pub fn new(reader: ByteReader<R>) -> Self {
        Self {
            m: Matcher::new(reader),
            tags: TagStack::new(),
            depth: 0,
            out: OutputQueue::new(),
        }
    }

    /// Run the `line` production until the input is exhausted, then close
    /// whatever is still open.
    pub fn parse(mut self) -> Result<OutputQueue> {
        while self.line()? {}
        self.dedent(0);
        Ok(self.out)
    }

    /// Returns `false` once there are no more lines.
    fn line(&mut self) -> Result<bool> {
        let mut tabs = 0;
        while self.m.skip(b'\t')? {
            tabs += 1;
        }
        if self.m.skip(b'\n')? {
            return Ok(true);
        }
        if self.m.is_eof() {
            return Ok(false);
        }

        self.dedent(tabs);

        if self.m.skip(b'{')? {
            self.m.require(b'{')?;
            let directive = self.embedding()?;
            self.out.append(directive);
            self.end_of_line()?;
            return Ok(true);
        }

        self.m.clear_scratch();
        self.m.expect_run(CharClass::Letter)?;
        let name = self.m.take_scratch();
        self.after_tag(name)?;
        Ok(true)
    }

    fn after_tag(&mut self, name: String) -> Result<()> {
        if !tags::is_known_tag(&name) {
            warn!(tag = %name, line = self.m.line(), "unknown html tag");
        }

        if self.at_end_of_line()? {
            self.open(Fragment::OpenTag(name.clone()), name);
            return Ok(());
        }

        if self.m.skip(b'|')? {
            self.open(Fragment::OpenTag(name.clone()), name);
            self.m.clear_scratch();
            self.m.expect_run(CharClass::Content)?;
            let text = self.m.take_scratch();
            self.out.append(Fragment::RawText(text));
            return self.end_of_line();
        }

        self.open(Fragment::HalfOpenTag(name.clone()), name);
        self.m.require(b' ')?;
        loop {
            if self.m.skip(b'{')? {
                self.m.require(b'{')?;
                let directive = self.embedding()?;
                self.out.append(Fragment::RawText(" ".to_string()));
                self.out.append(directive);
            } else {
                let attribute = self.attribute()?;
                self.out.append(Fragment::Attribute(attribute));
            }
            if !self.m.skip(b' ')? {
                break;
            }
        }
        self.out.append(Fragment::RawText(">".to_string()));
        self.end_of_line()
    }

    /// `name="value"` or `name='value'`, returned as written.
    fn attribute(&mut self) -> Result<String> {
        self.m.clear_scratch();
        self.m.expect_run(CharClass::AttributeIdent)?;
        self.m.expect(b'=')?;
        let quote = if self.m.accept(b'"')? {
            b'"'
        } else {
            self.m.expect(b'\'')?;
            b'\''
        };
        self.m.accept_while(CharClass::Quoted(quote))?;
        self.m.expect(quote)?;
        Ok(self.m.take_scratch())
    }

    /// Everything after an already consumed `{{`.
    fn embedding(&mut self) -> Result<Fragment> {
        if self.m.skip(b'$')? {
            return self.instance_embedding();
        }
        match self.static_embedding()? {
            Some(directive) => Ok(directive),
            None => Err(self.m.error(ParseErrorKind::MalformedEmbedding)),
        }
    }

    /// `$name}}` or `$object->method()}}`, with the `$` consumed.
    fn instance_embedding(&mut self) -> Result<Fragment> {
        let Some(name) = self.identifier()? else {
            return Err(self.m.error(ParseErrorKind::MalformedEmbedding));
        };

        if self.m.skip(b'}')? {
            return self.closing_braces(Fragment::VariableRef(name), 1);
        }

        if self.m.skip(b'-')? && self.m.skip(b'>')? {
            if let Some(method) = self.identifier()? {
                if self.m.skip(b'(')? && self.m.skip(b')')? {
                    let call = Fragment::InstanceCall { object: name, method };
                    return self.closing_braces(call, 0);
                }
            }
        }

        Err(self.m.error(ParseErrorKind::MalformedEmbedding))
    }

    /// `Path\To::method()}}` or `Path\To::$property}}`. `None` when the
    /// input stops looking like either before a member name is found.
    fn static_embedding(&mut self) -> Result<Option<Fragment>> {
        self.m.clear_scratch();
        self.m.accept(b'\\')?;
        loop {
            if self.m.accept_while(CharClass::Identifier)? == 0 {
                return Ok(None);
            }
            if !self.m.accept(b'\\')? {
                break;
            }
        }
        let path = self.m.take_scratch();

        if !(self.m.skip(b':')? && self.m.skip(b':')?) {
            return Ok(None);
        }

        if self.m.skip(b'$')? {
            let Some(property) = self.identifier()? else {
                return Ok(None);
            };
            let reference = Fragment::StaticPropertyRef { path, property };
            return self.closing_braces(reference, 0).map(Some);
        }

        let Some(method) = self.identifier()? else {
            return Ok(None);
        };
        if !(self.m.skip(b'(')? && self.m.skip(b')')?) {
            return Ok(None);
        }
        let call = Fragment::StaticCall { path, method };
        self.closing_braces(call, 0).map(Some)
    }

    /// Consume the rest of a `}}` of which `seen` braces are already in.
    fn closing_braces(&mut self, directive: Fragment, seen: usize) -> Result<Fragment> {
        for _ in seen..2 {
            if !self.m.skip(b'}')? {
                return Err(self.m.error(ParseErrorKind::MissingEmbeddingSuffix {
                    embedding: embedding_source(&directive),
                }));
            }
        }
        Ok(directive)
    }

    fn identifier(&mut self) -> Result<Option<String>> {
        self.m.clear_scratch();
        if self.m.accept_while(CharClass::Identifier)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.m.take_scratch()))
    }

    /// Consume a newline, or accept end of input, if that is what's next.
    fn at_end_of_line(&mut self) -> Result<bool> {
        Ok(self.m.skip(b'\n')? || self.m.is_eof())
    }

    fn end_of_line(&mut self) -> Result<()> {
        if self.at_end_of_line()? {
            return Ok(());
        }
        self.m.require(b'\n')
    }

    fn open(&mut self, fragment: Fragment, name: String) {
        trace!(tag = %name, depth = self.depth, "open");
        self.out.append(fragment);
        self.tags.push(name);
        self.depth += 1;
    }

    /// Pop one tag per level `tabs` sits below the current depth, then
    /// continue at depth `tabs`. Levels with no tag left to close (from a
    /// line indented past its parent) only lower the counter.
    fn dedent(&mut self, tabs: usize) {
        while tabs < self.depth {
            if let Some(name) = self.tags.pop() {
                trace!(tag = %name, depth = self.depth, "close");
                self.out.append(Fragment::CloseTag(name));
            }
            self.depth -= 1;
        }
        self.depth = tabs;
    }
}

/// The source text of a directive, for error messages.
fn embedding_source(directive: &Fragment) -> String {
    match directive {
        Fragment::VariableRef(name) => format!("{{{{${name}"),
        Fragment::InstanceCall { object, method } => format!("{{{{${object}->{method}()"),
        Fragment::StaticCall { path, method } => format!("{{{{{path}::{method}()"),
        Fragment::StaticPropertyRef { path, property } => format!("{{{{{path}::${property}"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseError, ParseErrorCode};
    use pretty_assertions::assert_eq;

    fn fragments(input: &str) -> Vec<Fragment> {
        let mut out = Parser::new(ByteReader::new(input.as_bytes())).parse().unwrap();
        out.drain_in_order().collect()
    }

    fn error(input: &str) -> ParseError {
        Parser::new(ByteReader::new(input.as_bytes())).parse().unwrap_err()
    }

    fn open(name: &str) -> Fragment {
        Fragment::OpenTag(name.to_string())
    }

    fn close(name: &str) -> Fragment {
        Fragment::CloseTag(name.to_string())
    }

    fn raw(text: &str) -> Fragment {
        Fragment::RawText(text.to_string())
    }

    #[test]
    fn test_bare_tag() {
        assert_eq!(fragments("div\n"), vec![open("div"), close("div")]);
    }

    #[test]
    fn test_last_line_without_newline() {
        assert_eq!(fragments("div"), vec![open("div"), close("div")]);
    }

    #[test]
    fn test_nesting() {
        assert_eq!(
            fragments("div\n\tspan\n\t\tb\n"),
            vec![open("div"), open("span"), open("b"), close("b"), close("span"), close("div")]
        );
    }

    #[test]
    fn test_siblings_after_dedent() {
        assert_eq!(
            fragments("ul\n\tli\n\tli\np\n"),
            vec![
                open("ul"),
                open("li"),
                close("li"),
                open("li"),
                close("li"),
                close("ul"),
                open("p"),
                close("p"),
            ]
        );
    }

    #[test]
    fn test_literal_block() {
        assert_eq!(
            fragments("p|Hello, {{$world}}!\n"),
            vec![open("p"), raw("Hello, {{$world}}!"), close("p")]
        );
    }

    #[test]
    fn test_attributes() {
        assert_eq!(
            fragments("a href=\"/x\" title='it \"is\"'\n"),
            vec![
                Fragment::HalfOpenTag("a".into()),
                Fragment::Attribute("href=\"/x\"".into()),
                Fragment::Attribute("title='it \"is\"'".into()),
                raw(">"),
                close("a"),
            ]
        );
    }

    #[test]
    fn test_embedding_among_attributes() {
        assert_eq!(
            fragments("input {{$extra}} data-x=\"1\"\n"),
            vec![
                Fragment::HalfOpenTag("input".into()),
                raw(" "),
                Fragment::VariableRef("extra".into()),
                Fragment::Attribute("data-x=\"1\"".into()),
                raw(">"),
                close("input"),
            ]
        );
    }

    #[test]
    fn test_directive_line_does_not_open() {
        assert_eq!(
            fragments("div\n\t{{$title}}\n\tp\n"),
            vec![
                open("div"),
                Fragment::VariableRef("title".into()),
                open("p"),
                close("p"),
                close("div"),
            ]
        );
    }

    #[test]
    fn test_static_forms() {
        assert_eq!(
            fragments("{{\\App\\Clock::now()}}\n{{Site::$name}}\n"),
            vec![
                Fragment::StaticCall { path: "\\App\\Clock".into(), method: "now".into() },
                Fragment::StaticPropertyRef { path: "Site".into(), property: "name".into() },
            ]
        );
    }

    #[test]
    fn test_blank_lines_change_nothing() {
        assert_eq!(
            fragments("div\n\n\tspan\n\t\n"),
            vec![open("div"), open("span"), close("span"), close("div")]
        );
    }

    #[test]
    fn test_over_indented_line_dedents_by_depth() {
        // `b` leaves depth at 3, so the one-tab `p` line pops twice
        assert_eq!(
            fragments("div\n\t\tb\n\tp\n"),
            vec![open("div"), open("b"), close("b"), close("div"), open("p"), close("p")]
        );
    }

    #[test]
    fn test_dedent_past_open_tags() {
        assert_eq!(
            fragments("div\n\t\t\tp\n\tspan\n\t\ti\n"),
            vec![
                open("div"),
                open("p"),
                close("p"),
                close("div"),
                open("span"),
                open("i"),
                close("i"),
                close("span"),
            ]
        );
    }

    #[test]
    fn test_digit_in_tag_name_is_fatal() {
        let err = error("h1|Title\n");
        assert_eq!(err.code(), ParseErrorCode::UnexpectedByte);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_missing_call_suffix() {
        let err = error("div\n{{$obj->foo()\n");
        assert_eq!(err.code(), ParseErrorCode::MissingEmbeddingSuffix);
        assert_eq!(err.line, 2);
        assert_eq!(err.to_string(), "line 2: missing '}}' after {{$obj->foo()");
    }

    #[test]
    fn test_half_closed_variable() {
        let err = error("{{$title}\n");
        assert_eq!(err.code(), ParseErrorCode::MissingEmbeddingSuffix);
    }

    #[test]
    fn test_unknown_instance_embedding() {
        assert_eq!(error("{{$obj.foo}}\n").code(), ParseErrorCode::MalformedEmbedding);
        assert_eq!(error("{{$obj->foo}}\n").code(), ParseErrorCode::MalformedEmbedding);
    }

    #[test]
    fn test_malformed_static_embedding() {
        assert_eq!(error("{{App:now()}}\n").code(), ParseErrorCode::MalformedEmbedding);
        assert_eq!(error("{{::now()}}\n").code(), ParseErrorCode::MalformedEmbedding);
    }

    #[test]
    fn test_empty_literal_is_fatal() {
        let err = error("p|\n");
        assert_eq!(err.code(), ParseErrorCode::UnexpectedByte);
    }

    #[test]
    fn test_unterminated_attribute() {
        let err = error("a href=\"/x\n");
        assert_eq!(err.code(), ParseErrorCode::UnexpectedByte);
        assert_eq!(err.line, 1);
    }
}
