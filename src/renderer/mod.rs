//! Template rendering for slimbridge
//!
//! Slim sources are compiled by [`crate::slim`] and evaluated by MiniJinja.
//!
//! The module is structured as:
//! - `interface`: Core trait definitions for template rendering
//! - `minijinja`: MiniJinja-based implementation of the template renderer
//! - `helpers`: Functions and the output formatter installed in the environment

pub mod helpers;
pub mod interface;
pub mod minijinja;

// Re-export the main types and traits for convenience
pub use interface::TemplateRenderer;
pub use minijinja::SlimRenderer;

use crate::config::EngineOptions;

/// Convenience function to create the default template renderer
pub fn new_renderer(options: EngineOptions) -> impl TemplateRenderer {
    SlimRenderer::new(options)
}
