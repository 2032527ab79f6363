//! Selection of the template file to render.

use crate::constants::TEMP_TEMPLATE_MARKER;
use log::debug;
use std::path::PathBuf;

/// Picks the file for `template_path`.
///
/// Paths containing `/tmp/tmp` anywhere are temp files written by the caller
/// and are used as given. Everything else is relative to `include_dir`.
pub fn resolve_template_path(include_dir: &str, template_path: &str) -> PathBuf {
    if template_path.contains(TEMP_TEMPLATE_MARKER) {
        debug!("Using temporary template {template_path} as given");
        PathBuf::from(template_path)
    } else {
        let resolved = format!("{include_dir}/{template_path}");
        debug!("Resolved template {template_path} to {resolved}");
        PathBuf::from(resolved)
    }
}
