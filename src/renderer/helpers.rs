//! Functions and formatting installed into the MiniJinja environment.

use crate::slim::escape_html;
use minijinja::value::{Value, ValueKind};
use minijinja::{AutoEscape, Error, Output, State};
use std::fmt::Write;

/// Renders one attribute from a runtime value.
///
/// `none` and `false` drop the attribute, `true` renders it empty, lists (as
/// produced by merged `class` values) are joined with spaces after dropping
/// their `none`/`false` members.
pub fn slim_attr(name: &str, value: Value, escape: Option<bool>) -> Value {
    let escape = escape.unwrap_or(true);
    let parts: Vec<Value> = match value.kind() {
        ValueKind::Seq => value.try_iter().map(|iter| iter.collect()).unwrap_or_default(),
        _ => vec![value],
    };

    let mut present = false;
    let mut rendered = Vec::new();
    for part in parts {
        if part.is_none() || part.is_undefined() {
            continue;
        }
        if part.kind() == ValueKind::Bool {
            present |= part.is_true();
            continue;
        }
        present = true;
        rendered.push(part.to_string());
    }

    if !present {
        return Value::from_safe_string(String::new());
    }
    let joined = rendered.join(" ");
    let joined = if escape { escape_html(&joined) } else { joined };
    Value::from_safe_string(format!(" {name}=\"{joined}\""))
}

/// Output formatter: `none` renders as nothing and escaping leaves `/` alone.
pub fn slim_formatter(out: &mut Output<'_>, state: &State<'_, '_>, value: &Value) -> Result<(), Error> {
    if value.is_none() {
        return Ok(());
    }
    if value.is_safe() || matches!(state.auto_escape(), AutoEscape::None) {
        write!(out, "{value}")?;
    } else {
        write!(out, "{}", escape_html(&value.to_string()))?;
    }
    Ok(())
}
