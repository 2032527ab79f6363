//! Indentation-aware line parser.

use super::attrs::parse_tag;
use super::expr::{interpolate, translate};
use super::{Code, Node};
use crate::config::EngineOptions;
use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static FOR_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^for\s+(\w+(?:\s*,\s*\w+)?)\s+in\s+(.+?)(?:\s+do)?$").expect("for pattern")
});

static EACH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\.(each|each_with_index)\s+do\s*\|\s*(\w+)\s*(?:,\s*(\w+)\s*)?\|$")
        .expect("each pattern")
});

static ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s*=\s*([^=].*)$").expect("assignment pattern"));

#[derive(Debug)]
struct Line<'a> {
    /// 1-based line number.
    number: usize,
    indent: usize,
    /// Line content without indentation.
    text: &'a str,
    raw: &'a str,
    blank: bool,
}

/// Parses a Slim source into a node tree.
pub fn parse(source: &str, name: &str, options: &EngineOptions) -> Result<Vec<Node>> {
    let mut lines = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let number = idx + 1;
        let text = raw.trim_start_matches(' ');
        let blank = text.trim().is_empty();
        if !blank && text.starts_with('\t') {
            return Err(Error::parse(name, number, "Tabs are not allowed in indentation"));
        }
        lines.push(Line {
            number,
            indent: raw.len() - text.len(),
            text: text.trim_end(),
            raw: raw.trim_end(),
            blank,
        });
    }

    let mut parser = Parser { name, options, lines, pos: 0 };
    let nodes = parser.parse_block(None)?;
    Ok(nodes)
}

struct Parser<'a> {
    name: &'a str,
    options: &'a EngineOptions,
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, line: usize, message: impl Into<String>) -> Error {
        Error::parse(self.name, line, message)
    }

    fn skip_blank(&mut self) {
        while self.lines.get(self.pos).is_some_and(|l| l.blank) {
            self.pos += 1;
        }
    }

    /// Parses sibling lines indented deeper than `parent`.
    fn parse_block(&mut self, parent: Option<usize>) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        let mut block_indent: Option<usize> = None;

        loop {
            self.skip_blank();
            let Some(line) = self.lines.get(self.pos) else { break };
            let (number, indent) = (line.number, line.indent);
            if parent.is_some_and(|p| indent <= p) {
                break;
            }
            let expected = *block_indent.get_or_insert(indent);
            if indent > expected {
                return Err(self.error(number, "Unexpected indentation"));
            }
            if indent < expected {
                return Err(self.error(number, "Malformed indentation"));
            }
            if let Some(node) = self.parse_line()? {
                nodes.push(node);
            }
        }

        Ok(nodes)
    }

    fn parse_line(&mut self) -> Result<Option<Node>> {
        let line = &self.lines[self.pos];
        let (number, indent, text) = (line.number, line.indent, line.text);
        self.pos += 1;
        let name = self.name;
        let wrap = move |message: String| Error::parse(name, number, message);

        if let Some(rest) = text.strip_prefix('|') {
            return self.parse_text(rest, indent, false).map(Some);
        }
        if let Some(rest) = text.strip_prefix('\'') {
            return self.parse_text(rest, indent, true).map(Some);
        }
        if let Some(rest) = text.strip_prefix("/!") {
            let segments = interpolate(rest.trim()).map_err(wrap)?;
            let children = self.parse_block(Some(indent))?;
            return Ok(Some(Node::HtmlComment { segments, children }));
        }
        if text.starts_with('/') {
            self.skip_nested(indent);
            return Ok(None);
        }
        if let Some(rest) = text.strip_prefix('=') {
            let (escape, expr) = match rest.strip_prefix('=') {
                Some(expr) => (false, expr),
                None => (true, rest),
            };
            if expr.trim().is_empty() {
                return Err(self.error(number, "Expected expression after '='"));
            }
            return Ok(Some(Node::Output { expr: translate(expr), escape }));
        }
        if let Some(rest) = text.strip_prefix('-') {
            let code = parse_code(rest.trim()).map_err(wrap)?;
            let children = self.parse_block(Some(indent))?;
            return Ok(code.map(|code| Node::Control { code, line: number, children }));
        }
        if text.starts_with('<') {
            let segments = interpolate(text).map_err(wrap)?;
            let children = self.parse_block(Some(indent))?;
            return Ok(Some(Node::InlineHtml { segments, children }));
        }
        if let Some(kind) = keyword_arg(text, "doctype") {
            let doctype = doctype(kind).ok_or_else(|| wrap(format!("Invalid doctype '{kind}'")))?;
            return Ok(Some(Node::Doctype(doctype.to_string())));
        }
        if let Some(target) = keyword_arg(text, "include") {
            if target.is_empty() {
                return Err(self.error(number, "Include requires a template name"));
            }
            return Ok(Some(Node::Include(target.to_string())));
        }

        let children = self.parse_block(Some(indent))?;
        let element = parse_tag(text, self.options, children).map_err(wrap)?;
        Ok(Some(Node::Element(element)))
    }

    /// Text block: the first line plus every following line indented deeper
    /// than the marker, joined by newlines.
    fn parse_text(&mut self, rest: &str, indent: usize, trailing_space: bool) -> Result<Node> {
        let number = self.lines[self.pos - 1].number;
        let first = rest.strip_prefix(' ').unwrap_or(rest);
        let mut text_col = (!first.is_empty()).then(|| indent + 1 + rest.len() - first.len());
        let mut parts: Vec<&str> = Vec::new();
        if !first.is_empty() {
            parts.push(first);
        }

        let mut pending_blank = 0;
        while let Some(next) = self.lines.get(self.pos) {
            if next.blank {
                pending_blank += 1;
                self.pos += 1;
                continue;
            }
            if next.indent <= indent {
                break;
            }
            let col = *text_col.get_or_insert(next.indent);
            parts.extend(std::iter::repeat("").take(pending_blank));
            pending_blank = 0;
            parts.push(&next.raw[col.min(next.indent)..]);
            self.pos += 1;
        }
        self.pos -= pending_blank;

        let segments = interpolate(&parts.join("\n")).map_err(|m| self.error(number, m))?;
        Ok(Node::Text { segments, trailing_space })
    }

    fn skip_nested(&mut self, indent: usize) {
        while let Some(next) = self.lines.get(self.pos) {
            if !next.blank && next.indent <= indent {
                break;
            }
            self.pos += 1;
        }
    }
}

/// Returns the argument of a `keyword arg` line, or `None` when the line does
/// not start with the keyword.
fn keyword_arg<'t>(text: &'t str, keyword: &str) -> Option<&'t str> {
    let rest = text.strip_prefix(keyword)?;
    if rest.is_empty() {
        return Some("");
    }
    rest.starts_with(' ').then(|| rest.trim())
}

fn doctype(kind: &str) -> Option<&'static str> {
    Some(match kind {
        "html" | "5" => "<!DOCTYPE html>",
        "xml" => r#"<?xml version="1.0" encoding="utf-8" ?>"#,
        "transitional" => {
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#
        }
        "strict" => {
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">"#
        }
        _ => return None,
    })
}

/// Parses the body of a `-` line. `end` yields `None`.
fn parse_code(code: &str) -> std::result::Result<Option<Code>, String> {
    let code = code.strip_suffix(" then").unwrap_or(code).trim();
    if code.is_empty() {
        return Err("Expected code after '-'".to_string());
    }
    if code == "end" {
        return Ok(None);
    }
    if code == "else" {
        return Ok(Some(Code::Else));
    }
    if let Some(cond) = keyword_arg(code, "if").filter(|c| !c.is_empty()) {
        return Ok(Some(Code::If(translate(cond))));
    }
    if let Some(cond) = keyword_arg(code, "elsif").filter(|c| !c.is_empty()) {
        return Ok(Some(Code::Elsif(translate(cond))));
    }
    if let Some(cond) = keyword_arg(code, "unless").filter(|c| !c.is_empty()) {
        return Ok(Some(Code::Unless(translate(cond))));
    }
    if let Some(caps) = FOR_IN.captures(code) {
        let targets = normalize_targets(&caps[1]);
        let iterable = iterable_for(&targets, translate(&caps[2]));
        return Ok(Some(Code::For { targets, iterable, index: None }));
    }
    if let Some(caps) = EACH.captures(code) {
        let first = caps[3].to_string();
        let second = caps.get(4).map(|m| m.as_str().to_string());
        let receiver = translate(&caps[1]);
        return Ok(Some(if &caps[2] == "each_with_index" {
            Code::For { targets: first, iterable: receiver, index: second }
        } else {
            let targets = match second {
                Some(second) => format!("{first}, {second}"),
                None => first,
            };
            Code::For { iterable: iterable_for(&targets, receiver), targets, index: None }
        }));
    }
    if let Some(caps) = ASSIGN.captures(code) {
        return Ok(Some(Code::Assign { name: caps[1].to_string(), expr: translate(&caps[2]) }));
    }
    Err(format!("Unsupported code '{code}'"))
}

fn normalize_targets(targets: &str) -> String {
    targets.split(',').map(str::trim).collect::<Vec<_>>().join(", ")
}

/// Two loop targets iterate a mapping's key/value pairs.
fn iterable_for(targets: &str, iterable: String) -> String {
    if targets.contains(',') {
        format!("({iterable})|items")
    } else {
        iterable
    }
}
