use crate::{error::Result, vars::Bindings};
use std::path::Path;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders the Slim template stored at `template_path`.
    ///
    /// # Arguments
    /// * `template_path` - Resolved path of the template file
    /// * `bindings` - Names available to the template
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render_file(&self, template_path: &Path, bindings: &Bindings) -> Result<String>;

    /// Renders a Slim source held in memory.
    ///
    /// # Arguments
    /// * `name` - Template name used in error messages
    /// * `source` - Slim source text
    /// * `bindings` - Names available to the template
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render_str(&self, name: &str, source: &str, bindings: &Bindings) -> Result<String>;
}
