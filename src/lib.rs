/// Handles argument parsing and the render pipeline.
pub mod cli;

/// Engine configuration.
pub mod config;

/// Fixed strings and defaults.
pub mod constants;

/// Defines custom error types.
pub mod error;

/// Extension traits for standard library types.
pub mod ext;

/// Template rendering on top of MiniJinja.
pub mod renderer;

/// Template path resolution.
pub mod resolve;

/// Slim to MiniJinja front-end.
pub mod slim;

/// Loading of template variables.
pub mod vars;
