//! Known HTML element names.
//!
//! Used only to warn about likely typos; unknown names still compile.
//! Names containing digits (`h1`..`h6`) are left out since a tag name is
//! letters only.

use phf::phf_set;

static KNOWN_TAGS: phf::Set<&'static str> = phf_set! {
    "a", "abbr", "address", "area", "article", "aside", "audio",
    "b", "base", "bdi", "bdo", "blockquote", "body", "br", "button",
    "canvas", "caption", "cite", "code", "col", "colgroup",
    "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt",
    "em", "embed",
    "fieldset", "figcaption", "figure", "footer", "form",
    "head", "header", "hgroup", "hr", "html",
    "i", "iframe", "img", "input", "ins",
    "kbd", "keygen",
    "label", "legend", "li", "link",
    "main", "map", "mark", "menu", "meta", "meter",
    "nav", "noscript",
    "object", "ol", "optgroup", "option", "output",
    "p", "param", "picture", "pre", "progress",
    "q",
    "rb", "rp", "rt", "rtc", "ruby",
    "s", "samp", "script", "search", "section", "select", "slot", "small", "source",
    "span", "strong", "style", "sub", "summary", "sup",
    "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead",
    "time", "title", "tr", "track",
    "u", "ul",
    "var", "video",
    "wbr",
};

/// Check if `name` is a known HTML element name (case-insensitive).
pub fn is_known_tag(name: &str) -> bool {
    if KNOWN_TAGS.contains(name) {
        return true;
    }
    name.bytes().any(|b| b.is_ascii_uppercase())
        && KNOWN_TAGS.contains(name.to_ascii_lowercase().as_str())
}
