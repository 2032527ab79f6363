//! Tag lines: head, attribute shortcuts, attribute lists and inline content.

use super::expr::{interpolate, translate};
use super::{Attr, AttrValue, Element, Node};
use crate::config::EngineOptions;
use crate::constants::{DEFAULT_TAG, VOID_ELEMENTS};
use regex::Regex;
use std::sync::LazyLock;

static TAG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][\w-]*(?::[A-Za-z][\w-]*)*").expect("tag name pattern"));

/// Character scanner over a single line.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_whitespace(&mut self) -> usize {
        self.take_while(char::is_whitespace).len()
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn is_attr_name_char(c: char) -> bool {
    is_name_char(c) || c == ':' || c == '@'
}

fn closing_for(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

/// Parses a tag line. `block` holds the already parsed indented children,
/// which belong to the innermost tag of a `a: b: c` chain.
pub fn parse_tag(
    text: &str,
    options: &EngineOptions,
    block: Vec<Node>,
) -> Result<Element, String> {
    let mut cur = Cursor::new(text);
    let mut tag = TAG_NAME.find(text).map(|m| m.as_str().to_string());
    if let Some(name) = &tag {
        cur.pos = name.len();
    }

    let mut attrs = Vec::new();
    while let Some(c) = cur.peek() {
        let Some(shortcut) = options.shortcut(c) else { break };
        let mut probe = Cursor { text, pos: cur.pos };
        probe.bump();
        let value = probe.take_while(is_name_char);
        if value.is_empty() {
            break;
        }
        if tag.is_none() && attrs.is_empty() {
            tag = shortcut.tag.clone();
        }
        attrs.push(Attr::literal(&shortcut.attr, value));
        cur.pos = probe.pos;
    }

    if tag.is_none() && attrs.is_empty() {
        return Err(format!("Unknown line indicator '{}'", text.chars().next().unwrap_or(' ')));
    }
    let tag = tag.unwrap_or_else(|| DEFAULT_TAG.to_string());

    parse_attributes(&mut cur, &mut attrs)?;

    let mut element = Element { tag, attrs, self_closing: false, children: Vec::new() };
    let rest = cur.rest();
    let trimmed = rest.trim_start();

    if let Some(after) = trimmed.strip_prefix('/') {
        if !after.trim().is_empty() {
            return Err(format!("Unexpected text after closed tag '{}'", element.tag));
        }
        element.self_closing = true;
    } else if let Some(expr) = trimmed.strip_prefix("==") {
        element.children.push(output(expr, false)?);
    } else if let Some(expr) = trimmed.strip_prefix('=') {
        element.children.push(output(expr, true)?);
    } else if let Some(nested) = trimmed.strip_prefix(':') {
        let nested = nested.trim_start();
        if nested.is_empty() {
            return Err(format!("Expected tag after '{}:'", element.tag));
        }
        let child = parse_tag(nested, options, block)?;
        element.children.push(Node::Element(child));
        return finish(element, Vec::new());
    } else if !rest.is_empty() {
        let inline = rest.strip_prefix(' ').unwrap_or(rest);
        element.children.push(Node::Text { segments: interpolate(inline)?, trailing_space: false });
    }

    finish(element, block)
}

fn finish(mut element: Element, block: Vec<Node>) -> Result<Element, String> {
    element.children.extend(block);
    let void = VOID_ELEMENTS.contains(&element.tag.as_str());
    if (void || element.self_closing) && !element.children.is_empty() {
        return Err(format!("Void element '{}' cannot have content", element.tag));
    }
    Ok(element)
}

fn output(expr: &str, escape: bool) -> Result<Node, String> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err("Expected expression after '='".to_string());
    }
    Ok(Node::Output { expr: translate(expr), escape })
}

fn parse_attributes(cur: &mut Cursor<'_>, attrs: &mut Vec<Attr>) -> Result<(), String> {
    let start = cur.pos;
    cur.skip_whitespace();
    if let Some(close) = cur.peek().and_then(closing_for) {
        cur.bump();
        return parse_wrapped(cur, close, attrs);
    }
    cur.pos = start;

    loop {
        let save = cur.pos;
        if cur.skip_whitespace() == 0 {
            break;
        }
        let name = cur.take_while(is_attr_name_char);
        if name.is_empty() || !cur.rest().starts_with('=') {
            cur.pos = save;
            break;
        }
        let escape = !cur.eat("==");
        if escape {
            cur.eat("=");
        }
        let value = parse_value(cur, None)?;
        attrs.push(Attr { name: name.to_string(), value, escape });
    }
    Ok(())
}

fn parse_wrapped(cur: &mut Cursor<'_>, close: char, attrs: &mut Vec<Attr>) -> Result<(), String> {
    loop {
        cur.skip_whitespace();
        match cur.peek() {
            None => return Err(format!("Expected closing delimiter {close}")),
            Some(c) if c == close => {
                cur.bump();
                return Ok(());
            }
            _ => {}
        }
        let name = cur.take_while(is_attr_name_char);
        if name.is_empty() {
            return Err(format!("Invalid attribute near '{}'", cur.rest()));
        }
        cur.skip_whitespace();
        let (value, escape) = if cur.eat("==") {
            cur.skip_whitespace();
            (parse_value(cur, Some(close))?, false)
        } else if cur.eat("=") {
            cur.skip_whitespace();
            (parse_value(cur, Some(close))?, true)
        } else {
            (AttrValue::Boolean, true)
        };
        attrs.push(Attr { name: name.to_string(), value, escape });
    }
}

fn parse_value(cur: &mut Cursor<'_>, close: Option<char>) -> Result<AttrValue, String> {
    match cur.peek() {
        Some(quote @ ('"' | '\'')) => {
            cur.bump();
            let content = quoted(cur, quote)?;
            Ok(AttrValue::Literal(interpolate(&content)?))
        }
        _ => {
            let expr = expression(cur, close);
            if expr.is_empty() {
                return Err("Invalid empty attribute".to_string());
            }
            Ok(AttrValue::Expr(translate(expr)))
        }
    }
}

/// Reads up to the closing quote. Interpolations may contain the quote
/// character, so `#{...}` bodies are skipped as a whole.
fn quoted(cur: &mut Cursor<'_>, quote: char) -> Result<String, String> {
    let mut content = String::new();
    let mut depth = 0usize;
    while let Some(c) = cur.bump() {
        match c {
            '\\' if depth == 0 => match cur.bump() {
                Some(next) if next == quote => content.push(next),
                Some(next) => {
                    content.push('\\');
                    content.push(next);
                }
                None => break,
            },
            '#' if cur.peek() == Some('{') => {
                content.push(c);
                content.push('{');
                cur.bump();
                depth += 1;
            }
            '{' if depth > 0 => {
                depth += 1;
                content.push(c);
            }
            '}' if depth > 0 => {
                depth -= 1;
                content.push(c);
            }
            c if c == quote && depth == 0 => return Ok(content),
            c => content.push(c),
        }
    }
    Err(format!("Expected closing quote {quote}"))
}

/// Reads an unquoted attribute expression: everything up to whitespace or the
/// wrapper's closing delimiter at nesting depth zero.
fn expression<'a>(cur: &mut Cursor<'a>, close: Option<char>) -> &'a str {
    let start = cur.pos;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    while let Some(c) = cur.peek() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            cur.bump();
            continue;
        }
        if depth == 0 && (c.is_whitespace() || Some(c) == close) {
            break;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        cur.bump();
    }
    let text = cur.text;
    &text[start..cur.pos]
}
