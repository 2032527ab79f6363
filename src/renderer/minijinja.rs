use super::helpers::{slim_attr, slim_formatter};
use crate::{
    config::EngineOptions,
    constants::ATTR_HELPER,
    error::Result,
    ext::PathExt,
    renderer::interface::TemplateRenderer,
    slim,
    vars::Bindings,
};
use log::debug;
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use std::path::Path;

/// MiniJinja-based renderer for Slim templates.
pub struct SlimRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
    options: EngineOptions,
}

impl SlimRenderer {
    /// Creates a renderer whose environment loads `include` targets from the
    /// configured include directories.
    pub fn new(options: EngineOptions) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_formatter(slim_formatter);
        env.add_function(ATTR_HELPER, slim_attr);

        let loader_options = options.clone();
        env.set_loader(move |name| load_include(&loader_options, name));

        Self { env, options }
    }

    /// Internal helper to compile and render a single top-level template
    fn render_internal(&self, name: &str, source: &str, bindings: &Bindings) -> Result<String> {
        let compiled = slim::compile(source, name, &self.options)?;
        let mut env = self.env.clone();
        env.add_template_owned(name.to_string(), compiled)?;

        let tmpl = env.get_template(name)?;
        Ok(tmpl.render(bindings)?)
    }
}

impl Default for SlimRenderer {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl TemplateRenderer for SlimRenderer {
    fn render_file(&self, template_path: &Path, bindings: &Bindings) -> Result<String> {
        let source = template_path.read_text()?;
        let name = template_path.to_str_checked()?;
        debug!("Rendering {name}");
        self.render_internal(name, &source, bindings)
    }

    fn render_str(&self, name: &str, source: &str, bindings: &Bindings) -> Result<String> {
        self.render_internal(name, source, bindings)
    }
}

/// Loader for `include`: finds the file on the search path and compiles it.
fn load_include(
    options: &EngineOptions,
    name: &str,
) -> std::result::Result<Option<String>, minijinja::Error> {
    let Some(path) = options.find_include(name) else {
        return Ok(None);
    };
    debug!("Including {} from {}", name, path.display());
    let source = path.read_text().map_err(|err| {
        minijinja::Error::new(ErrorKind::InvalidOperation, err.to_string())
    })?;
    slim::compile(&source, name, options)
        .map(Some)
        .map_err(|err| minijinja::Error::new(ErrorKind::SyntaxError, err.to_string()))
}
