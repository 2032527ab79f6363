//! Emits MiniJinja source from a parsed Slim tree.

use super::{escape_html, Attr, AttrValue, Code, Element, Node, Segment};
use crate::config::EngineOptions;
use crate::constants::{ATTR_HELPER, TEMPLATE_EXTENSION, VOID_ELEMENTS};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::path::Path;

pub struct Compiler<'a> {
    name: &'a str,
    options: &'a EngineOptions,
    out: String,
    depth: usize,
}

impl<'a> Compiler<'a> {
    pub fn new(name: &'a str, options: &'a EngineOptions) -> Self {
        Self { name, options, out: String::new(), depth: 0 }
    }

    pub fn compile(mut self, nodes: &[Node]) -> Result<String> {
        self.nodes(nodes)?;
        Ok(self.out)
    }

    fn nodes(&mut self, nodes: &[Node]) -> Result<()> {
        let mut iter = nodes.iter().peekable();
        while let Some(node) = iter.next() {
            match node {
                Node::Control { code: code @ (Code::If(_) | Code::Unless(_)), children, .. } => {
                    match code {
                        Code::Unless(cond) => self.tag(&format!("if not ({cond})")),
                        Code::If(cond) => self.tag(&format!("if {cond}")),
                        _ => {}
                    }
                    self.nodes(children)?;
                    while let Some(Node::Control { code: branch, children, .. }) = iter
                        .next_if(|n| matches!(n, Node::Control { code: Code::Elsif(_) | Code::Else, .. }))
                    {
                        match branch {
                            Code::Elsif(cond) => self.tag(&format!("elif {cond}")),
                            _ => self.tag("else"),
                        }
                        self.nodes(children)?;
                    }
                    self.tag("endif");
                }
                Node::Control { code: Code::Elsif(_), line, .. } => {
                    return Err(Error::parse(self.name, *line, "Unexpected 'elsif' without 'if'"));
                }
                Node::Control { code: Code::Else, line, .. } => {
                    return Err(Error::parse(self.name, *line, "Unexpected 'else' without 'if'"));
                }
                _ => self.node(node)?,
            }
        }
        Ok(())
    }

    fn node(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::Doctype(doctype) => self.literal(doctype),
            Node::Element(element) => self.element(element)?,
            Node::Text { segments, trailing_space } => {
                self.segments(segments);
                if *trailing_space {
                    self.out.push(' ');
                }
            }
            Node::Output { expr, escape } => self.output(expr, *escape),
            Node::Control { code, children, .. } => self.control(code, children)?,
            Node::HtmlComment { segments, children } => {
                self.out.push_str("<!--");
                self.segments(segments);
                self.nodes(children)?;
                self.out.push_str("-->");
            }
            Node::InlineHtml { segments, children } => {
                self.segments(segments);
                self.nodes(children)?;
            }
            Node::Include(target) => {
                let target = if Path::new(target).extension().is_some() {
                    target.clone()
                } else {
                    format!("{target}.{TEMPLATE_EXTENSION}")
                };
                self.tag(&format!("include {}", quote(&target)));
            }
        }
        Ok(())
    }

    fn control(&mut self, code: &Code, children: &[Node]) -> Result<()> {
        match code {
            Code::For { targets, iterable, index } => {
                self.tag(&format!("for {targets} in {iterable}"));
                if let Some(index) = index {
                    self.tag(&format!("set {index} = loop.index0"));
                }
                self.nodes(children)?;
                self.tag("endfor");
            }
            Code::Assign { name, expr } => {
                self.tag(&format!("set {name} = {expr}"));
                self.nodes(children)?;
            }
            // Conditionals are handled in `nodes`, where siblings are visible.
            Code::If(_) | Code::Unless(_) | Code::Elsif(_) | Code::Else => {}
        }
        Ok(())
    }

    fn element(&mut self, element: &Element) -> Result<()> {
        if self.options.pretty {
            self.newline();
        }
        self.out.push('<');
        self.out.push_str(&element.tag);
        self.attributes(&element.attrs);

        if element.self_closing || VOID_ELEMENTS.contains(&element.tag.as_str()) {
            self.out.push_str(" />");
            return Ok(());
        }
        self.out.push('>');

        self.depth += 1;
        self.nodes(&element.children)?;
        self.depth -= 1;

        if self.options.pretty && element.children.iter().any(|c| matches!(c, Node::Element(_))) {
            self.newline();
        }
        self.out.push_str("</");
        self.out.push_str(&element.tag);
        self.out.push('>');
        Ok(())
    }

    fn newline(&mut self) {
        if !self.out.is_empty() {
            self.out.push('\n');
            self.out.push_str(&"  ".repeat(self.depth));
        }
    }

    /// Merges repeated attributes (`class` values are joined, others replaced)
    /// and writes them in source order, or sorted when configured.
    fn attributes(&mut self, attrs: &[Attr]) {
        let mut merged: IndexMap<&str, Vec<&Attr>> = IndexMap::new();
        for attr in attrs {
            let values = merged.entry(attr.name.as_str()).or_default();
            if attr.name != "class" {
                values.clear();
            }
            values.push(attr);
        }
        if self.options.sort_attrs {
            merged.sort_keys();
        }

        for (name, values) in merged {
            if let [attr] = values.as_slice() {
                if attr.value == AttrValue::Boolean {
                    self.out.push_str(&format!(" {name}=\"\""));
                    continue;
                }
            }
            let statics: Option<Vec<String>> = values
                .iter()
                .map(|a| static_text(&a.value).map(|t| if a.escape { escape_html(&t) } else { t }))
                .collect();
            if let Some(mut texts) = statics {
                if texts.len() > 1 {
                    texts.retain(|t| !t.is_empty());
                }
                self.out.push_str(&format!(" {name}=\""));
                self.literal(&texts.join(" "));
                self.out.push('"');
                continue;
            }

            let escape = values.iter().all(|a| a.escape);
            let exprs: Vec<String> = values.iter().map(|a| value_expr(&a.value)).collect();
            let value = match exprs.as_slice() {
                [single] => single.clone(),
                many => format!("[{}]", many.join(", ")),
            };
            self.out.push_str(&format!(
                "{{{{ {ATTR_HELPER}({}, {value}, {escape}) }}}}",
                quote(name)
            ));
        }
    }

    fn segments(&mut self, segments: &[Segment]) {
        for segment in segments {
            match segment {
                Segment::Literal(text) => self.literal(text),
                Segment::Interp { expr, escape } => self.output(expr, *escape),
            }
        }
    }

    fn output(&mut self, expr: &str, escape: bool) {
        if escape {
            self.out.push_str(&format!("{{{{ {expr} }}}}"));
        } else {
            self.out.push_str(&format!("{{{{ ({expr})|safe }}}}"));
        }
    }

    fn tag(&mut self, body: &str) {
        self.out.push_str("{% ");
        self.out.push_str(body);
        self.out.push_str(" %}");
    }

    /// Static text. Every `{` is written as a string expression so no
    /// MiniJinja delimiter can be formed from template text.
    fn literal(&mut self, text: &str) {
        let mut parts = text.split('{');
        if let Some(first) = parts.next() {
            self.out.push_str(first);
        }
        for part in parts {
            self.out.push_str(r#"{{ "{" }}"#);
            self.out.push_str(part);
        }
    }
}

/// Text of a literal value without interpolations.
fn static_text(value: &AttrValue) -> Option<String> {
    let AttrValue::Literal(segments) = value else { return None };
    segments
        .iter()
        .map(|s| match s {
            Segment::Literal(text) => Some(text.as_str()),
            Segment::Interp { .. } => None,
        })
        .collect()
}

/// MiniJinja expression producing an attribute value.
fn value_expr(value: &AttrValue) -> String {
    match value {
        AttrValue::Boolean => "true".to_string(),
        AttrValue::Expr(expr) => format!("({expr})"),
        AttrValue::Literal(segments) if segments.is_empty() => quote(""),
        AttrValue::Literal(segments) => segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => quote(text),
                Segment::Interp { expr, .. } => format!("(({expr})|string)"),
            })
            .collect::<Vec<_>>()
            .join(" ~ "),
    }
}

/// Quotes a string as a MiniJinja string literal.
fn quote(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}
