//! Interpretation of CSS `content` declaration values.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `counter(name)` with an optional, ignored list-style argument.
    static ref COUNTER_RE: Regex =
        Regex::new(r"^counter\(\s*([\w-]+)\s*(?:,[^)]*)?\)$").unwrap();
    /// `attr(name)`.
    static ref ATTR_RE: Regex = Regex::new(r"^attr\(\s*([\w-]+)\s*\)$").unwrap();
}

/// A parsed `content` value.
///
/// `Counter` and `Attribute` cannot be turned into text until a specific
/// target node is known, so resolution is split: [`ContentSpec::resolve_static`]
/// handles everything except counters, whose values depend on traversal order
/// across sibling nodes and are filled in by the injector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSpec {
    /// A literal string, already unquoted.
    Literal(String),
    /// An ordinal counter, named in the stylesheet but scoped per parent.
    Counter(String),
    /// The value of a named attribute on the target node.
    Attribute(String),
    /// `none`, `""` or `''`.
    Empty,
}

impl ContentSpec {
    /// Classifies a raw `content` value.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == "none" || raw == "\"\"" || raw == "''" {
            return ContentSpec::Empty;
        }
        if let Some(caps) = COUNTER_RE.captures(raw) {
            return ContentSpec::Counter(caps[1].to_string());
        }
        if let Some(caps) = ATTR_RE.captures(raw) {
            return ContentSpec::Attribute(caps[1].to_string());
        }
        ContentSpec::Literal(unquote(raw).to_string())
    }

    /// Resolves the variants that do not depend on sibling order.
    ///
    /// Returns `None` for `Counter`, which the injector resolves against its
    /// counter tracker. A missing attribute resolves to the empty string.
    pub fn resolve_static<F>(&self, attribute: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        match self {
            ContentSpec::Literal(text) => Some(text.clone()),
            ContentSpec::Attribute(name) => Some(attribute(name).unwrap_or_default()),
            ContentSpec::Empty => Some(String::new()),
            ContentSpec::Counter(_) => None,
        }
    }
}

/// Removes a single layer of matching surrounding quotes.
fn unquote(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}
