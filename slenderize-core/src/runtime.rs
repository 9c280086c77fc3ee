//! Render-time evaluation of composed output.
//!
//! Literal text is copied through untouched; every `<%= ... %>` directive
//! is replaced by the value it names in a [`Bindings`] table or a
//! [`StaticRegistry`]. Values are substituted as-is, without escaping.
//! An escaped `<%%` comes out as a plain `<%`, and a `<%` followed by
//! anything else is ordinary text.

use std::collections::HashMap;
use std::fmt;

use memchr::memmem;
use thiserror::Error;
use tracing::debug;

use crate::fragment::{DIRECTIVE_CLOSE, DIRECTIVE_OPEN, ESCAPED_MARK, ESCAPE_MARK};

/// An object whose zero-argument methods a view may call.
pub trait Invocable {
    /// Call `method`, or `None` if the object has no such method.
    fn invoke(&self, method: &str) -> Option<String>;
}

/// A global/namespaced accessor reachable as `Path\To::member`.
pub trait StaticAccessor {
    fn call(&self, method: &str) -> Option<String>;

    fn property(&self, _name: &str) -> Option<String> {
        None
    }
}

pub enum Binding {
    Value(String),
    Object(Box<dyn Invocable>),
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Binding::Object(_) => f.write_str("Object(..)"),
        }
    }
}

/// Names visible to `{{$name}}` and `{{$object->method()}}`.
#[derive(Debug, Default)]
pub struct Bindings {
    table: HashMap<String, Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, binding: Binding) -> Option<Binding> {
        self.table.insert(name.into(), binding)
    }

    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, Binding::Value(value.into()));
        self
    }

    pub fn with_object(mut self, name: impl Into<String>, object: impl Invocable + 'static) -> Self {
        self.insert(name, Binding::Object(Box::new(object)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.table.get(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Accessors visible to `{{Path\To::method()}}` and `{{Path\To::$property}}`.
///
/// Paths are matched without a leading `\`, so `\App\Clock` and
/// `App\Clock` name the same accessor.
#[derive(Default)]
pub struct StaticRegistry {
    table: HashMap<String, Box<dyn StaticAccessor>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, path: &str, accessor: impl StaticAccessor + 'static) {
        self.table.insert(normalize_path(path).to_string(), Box::new(accessor));
    }

    pub fn with(mut self, path: &str, accessor: impl StaticAccessor + 'static) -> Self {
        self.register(path, accessor);
        self
    }

    pub fn get(&self, path: &str) -> Option<&dyn StaticAccessor> {
        self.table.get(normalize_path(path)).map(|accessor| accessor.as_ref())
    }
}

impl fmt::Debug for StaticRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.table.keys()).finish()
    }
}

fn normalize_path(path: &str) -> &str {
    path.strip_prefix('\\').unwrap_or(path)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("directive at byte {offset} is never closed")]
    UnterminatedDirective { offset: usize },

    #[error("malformed directive `{0}`")]
    MalformedDirective(String),

    #[error("no binding named `{0}`")]
    UnboundVariable(String),

    #[error("`{0}` is bound to an object, not a value")]
    NotAValue(String),

    #[error("`{0}` is bound to a value, not an object")]
    NotAnObject(String),

    #[error("`{object}` has no method `{method}`")]
    UnknownMethod { object: String, method: String },

    #[error("no static accessor registered for `{0}`")]
    UnknownStatic(String),

    #[error("`{path}` has no member `{member}`")]
    UnknownStaticMember { path: String, member: String },
}

/// A directive body, parsed back out of composed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive<'a> {
    Variable(&'a str),
    Call { object: &'a str, method: &'a str },
    Static { path: &'a str, method: &'a str },
    StaticProperty { path: &'a str, property: &'a str },
}

impl<'a> Directive<'a> {
    fn parse(body: &'a str) -> Result<Self, RenderError> {
        let body = body.trim();
        let malformed = || RenderError::MalformedDirective(body.to_string());

        let directive = if let Some(rest) = body.strip_prefix('$') {
            match rest.split_once("->") {
                Some((object, call)) => Directive::Call {
                    object,
                    method: call.strip_suffix("()").ok_or_else(malformed)?,
                },
                None => Directive::Variable(rest),
            }
        } else {
            let (path, member) = body.split_once("::").ok_or_else(malformed)?;
            match member.strip_prefix('$') {
                Some(property) => Directive::StaticProperty { path, property },
                None => Directive::Static {
                    path,
                    method: member.strip_suffix("()").ok_or_else(malformed)?,
                },
            }
        };

        if directive.is_well_formed() {
            Ok(directive)
        } else {
            Err(malformed())
        }
    }

    fn is_well_formed(&self) -> bool {
        match *self {
            Directive::Variable(name) => is_identifier(name),
            Directive::Call { object, method } => is_identifier(object) && is_identifier(method),
            Directive::Static { path, method } => is_path(path) && is_identifier(method),
            Directive::StaticProperty { path, property } => {
                is_path(path) && is_identifier(property)
            }
        }
    }

    fn evaluate(self, bindings: &Bindings, statics: &StaticRegistry) -> Result<String, RenderError> {
        match self {
            Directive::Variable(name) => match bindings.get(name) {
                Some(Binding::Value(value)) => Ok(value.clone()),
                Some(Binding::Object(_)) => Err(RenderError::NotAValue(name.to_string())),
                None => Err(RenderError::UnboundVariable(name.to_string())),
            },
            Directive::Call { object, method } => match bindings.get(object) {
                Some(Binding::Object(target)) => {
                    target.invoke(method).ok_or_else(|| RenderError::UnknownMethod {
                        object: object.to_string(),
                        method: method.to_string(),
                    })
                }
                Some(Binding::Value(_)) => Err(RenderError::NotAnObject(object.to_string())),
                None => Err(RenderError::UnboundVariable(object.to_string())),
            },
            Directive::Static { path, method } => {
                let accessor = statics
                    .get(path)
                    .ok_or_else(|| RenderError::UnknownStatic(path.to_string()))?;
                accessor.call(method).ok_or_else(|| RenderError::UnknownStaticMember {
                    path: path.to_string(),
                    member: format!("{method}()"),
                })
            }
            Directive::StaticProperty { path, property } => {
                let accessor = statics
                    .get(path)
                    .ok_or_else(|| RenderError::UnknownStatic(path.to_string()))?;
                accessor.property(property).ok_or_else(|| RenderError::UnknownStaticMember {
                    path: path.to_string(),
                    member: format!("${property}"),
                })
            }
        }
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn is_path(s: &str) -> bool {
    normalize_path(s).split('\\').all(is_identifier)
}

/// Evaluate every directive in `compiled` and return the final document.
pub fn render(
    compiled: &str,
    bindings: &Bindings,
    statics: &StaticRegistry,
) -> Result<String, RenderError> {
    let mark = memmem::Finder::new(ESCAPE_MARK);
    let close = memmem::Finder::new(DIRECTIVE_CLOSE);
    let bytes = compiled.as_bytes();

    let mut out = String::with_capacity(compiled.len());
    let mut rest = 0;
    let mut count = 0;
    while let Some(found) = mark.find(&bytes[rest..]) {
        let start = rest + found;
        out.push_str(&compiled[rest..start]);

        if compiled[start..].starts_with(ESCAPED_MARK) {
            out.push_str(ESCAPE_MARK);
            rest = start + ESCAPED_MARK.len();
            continue;
        }
        if !compiled[start..].starts_with(DIRECTIVE_OPEN) {
            out.push_str(ESCAPE_MARK);
            rest = start + ESCAPE_MARK.len();
            continue;
        }

        let body_start = start + DIRECTIVE_OPEN.len();
        let body_len = close
            .find(&bytes[body_start..])
            .ok_or(RenderError::UnterminatedDirective { offset: start })?;
        let directive = Directive::parse(&compiled[body_start..body_start + body_len])?;
        out.push_str(&directive.evaluate(bindings, statics)?);

        rest = body_start + body_len + DIRECTIVE_CLOSE.len();
        count += 1;
    }
    out.push_str(&compiled[rest..]);

    debug!(directives = count, "rendered");
    Ok(out)
}
