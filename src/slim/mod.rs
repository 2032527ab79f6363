//! Slim front-end
//!
//! Slim sources are translated into MiniJinja templates when they are loaded;
//! evaluation itself is left to the engine.
//!
//! The module is structured as:
//! - `parser`: indentation-aware line parser producing a [`Node`] tree
//! - `attrs`: tag heads, shortcuts and attribute lists
//! - `expr`: Ruby-flavoured expressions and `#{}` interpolation
//! - `compiler`: emits MiniJinja source from the node tree

pub mod attrs;
pub mod compiler;
pub mod expr;
pub mod parser;

use crate::{config::EngineOptions, error::Result};
use log::trace;

/// A run of text, either literal or an interpolated expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    Interp { expr: String, escape: bool },
}

/// Value of a tag attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Quoted value, possibly with interpolations.
    Literal(Vec<Segment>),
    /// Unquoted expression evaluated at render time.
    Expr(String),
    /// Bare attribute name inside a wrapper.
    Boolean,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub name: String,
    pub value: AttrValue,
    pub escape: bool,
}

impl Attr {
    pub fn literal(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: AttrValue::Literal(vec![Segment::Literal(value.to_string())]),
            escape: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<Attr>,
    pub self_closing: bool,
    pub children: Vec<Node>,
}

/// Code lines (`- ...`).
#[derive(Debug, Clone, PartialEq)]
pub enum Code {
    If(String),
    Unless(String),
    Elsif(String),
    Else,
    /// `targets` is a single name or `k, v`; `index` names the
    /// `each_with_index` counter.
    For { targets: String, iterable: String, index: Option<String> },
    Assign { name: String, expr: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Doctype(String),
    Element(Element),
    Text { segments: Vec<Segment>, trailing_space: bool },
    Output { expr: String, escape: bool },
    Control { code: Code, line: usize, children: Vec<Node> },
    HtmlComment { segments: Vec<Segment>, children: Vec<Node> },
    InlineHtml { segments: Vec<Segment>, children: Vec<Node> },
    Include(String),
}

/// Translates a Slim source into MiniJinja source.
///
/// `name` is only used in error messages.
pub fn compile(source: &str, name: &str, options: &EngineOptions) -> Result<String> {
    let nodes = parser::parse(source, name, options)?;
    let compiled = compiler::Compiler::new(name, options).compile(&nodes)?;
    trace!("Compiled {name}:\n{compiled}");
    Ok(compiled)
}

/// HTML escaping applied to attribute literals and escaped output.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html_special_characters() {
        assert_eq!(escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;");
        assert_eq!(escape_html("/path/to"), "/path/to");
    }

    #[test]
    fn compile_reports_template_name() {
        let err = compile("p\n\tspan", "broken.slim", &EngineOptions::default()).unwrap_err();
        assert!(err.to_string().starts_with("broken.slim, Line 2"));
    }
}
