//! Loading of the template variables file.

use crate::error::{Error, Result};
use crate::ext::PathExt;
use log::debug;
use serde_json::{Map, Value};
use std::path::Path;

/// Names made available to the template.
pub type Bindings = Map<String, Value>;

/// Reads `vars_file` and returns its top-level object.
///
/// Anything other than an object is rejected: its keys are what the template
/// refers to.
pub fn load_bindings<P: AsRef<Path>>(vars_file: P) -> Result<Bindings> {
    let path = vars_file.as_ref();
    let content = path.read_text()?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|source| Error::Json { path: path.to_path_buf(), source })?;
    let bindings = bindings_from_value(value)?;
    debug!("Loaded {} binding(s) from {}", bindings.len(), path.display());
    Ok(bindings)
}

/// Accepts a parsed document as bindings if it is an object.
pub fn bindings_from_value(value: Value) -> Result<Bindings> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::Bindings(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
