//! Output fragments - the units the parser emits and `compose` renders.
//!
//! Fragments are appended to the output queue exactly once, in emission
//! order, and never change afterwards. Four of them are directives: they
//! render to an inline escape that the runtime replaces with a value
//! looked up in its binding table.
//!
//! ## Textual forms
//!
//! ```text
//! OpenTag("p")                      <p>
//! CloseTag("p")                     </p>
//! HalfOpenTag("a")                  <a
//! RawText("hi")                     hi
//! Attribute("href=\"/x\"")           href="/x"       (leading space)
//! VariableRef("title")              <%= $title %>
//! InstanceCall("obj", "foo")        <%= $obj->foo() %>
//! StaticCall("App\\Clock", "now")   <%= App\Clock::now() %>
//! StaticPropertyRef("App", "name")  <%= App::$name %>
//! ```
//!
//! Text that reaches the output from the source (`RawText`, `Attribute`)
//! has every `<%` written as `<%%`, so only directive fragments ever
//! produce a live `<%=`. The runtime turns `<%%` back into `<%`.

use std::fmt;

/// Opens a directive in composed output.
pub const DIRECTIVE_OPEN: &str = "<%=";
/// Closes a directive in composed output.
pub const DIRECTIVE_CLOSE: &str = "%>";
/// Starts every runtime escape, live or not.
pub const ESCAPE_MARK: &str = "<%";
/// A literal `<%` in composed output.
pub const ESCAPED_MARK: &str = "<%%";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    // ========== Structure ==========

    /// `<name>`
    OpenTag(String),

    /// `</name>`
    CloseTag(String),

    /// `<name`, closed later by a raw `>` once the attributes are out
    HalfOpenTag(String),

    // ========== Content ==========

    /// Literal text, rendered verbatim
    RawText(String),

    /// Raw `name="value"` text, rendered with one leading space
    Attribute(String),

    // ========== Directives ==========

    /// `{{$name}}`
    VariableRef(String),

    /// `{{$object->method()}}`
    InstanceCall { object: String, method: String },

    /// `{{Path\To::method()}}`
    StaticCall { path: String, method: String },

    /// `{{Path\To::$property}}`
    StaticPropertyRef { path: String, property: String },
}

impl Fragment {
    /// Check if this fragment is evaluated by the runtime.
    pub fn is_directive(&self) -> bool {
        matches!(
            self,
            Fragment::VariableRef(_)
                | Fragment::InstanceCall { .. }
                | Fragment::StaticCall { .. }
                | Fragment::StaticPropertyRef { .. }
        )
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::OpenTag(name) => write!(f, "<{name}>"),
            Fragment::CloseTag(name) => write!(f, "</{name}>"),
            Fragment::HalfOpenTag(name) => write!(f, "<{name}"),
            Fragment::RawText(text) => write_escaped(f, text),
            Fragment::Attribute(text) => {
                f.write_str(" ")?;
                write_escaped(f, text.trim())
            }
            Fragment::VariableRef(name) => {
                write!(f, "{DIRECTIVE_OPEN} ${name} {DIRECTIVE_CLOSE}")
            }
            Fragment::InstanceCall { object, method } => {
                write!(f, "{DIRECTIVE_OPEN} ${object}->{method}() {DIRECTIVE_CLOSE}")
            }
            Fragment::StaticCall { path, method } => {
                write!(f, "{DIRECTIVE_OPEN} {path}::{method}() {DIRECTIVE_CLOSE}")
            }
            Fragment::StaticPropertyRef { path, property } => {
                write!(f, "{DIRECTIVE_OPEN} {path}::${property} {DIRECTIVE_CLOSE}")
            }
        }
    }
}

/// Write `text` with each `<%` doubled up to `<%%`.
fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    let mut parts = text.split(ESCAPE_MARK);
    if let Some(first) = parts.next() {
        f.write_str(first)?;
    }
    for part in parts {
        f.write_str(ESCAPED_MARK)?;
        f.write_str(part)?;
    }
    Ok(())
}
