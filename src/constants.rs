//! Constants used throughout slimbridge

/// Prefix of every error line written to stdout. Callers detect failure by
/// matching this string, so it must never change.
pub const ERROR_MARKER: &str = "#<Slim_Error_for_python>";

/// Template paths containing this substring are loaded verbatim instead of
/// being resolved against the include directory.
pub const TEMP_TEMPLATE_MARKER: &str = "/tmp/tmp";

/// Extension appended to `include` targets that have none.
pub const TEMPLATE_EXTENSION: &str = "slim";

/// Tag used when a line starts with an attribute shortcut.
pub const DEFAULT_TAG: &str = "div";

/// Environment variable read by `env_logger`.
pub const LOG_ENV: &str = "SLIMBRIDGE_LOG";

/// Log filter applied when `LOG_ENV` is unset.
pub const DEFAULT_LOG_FILTER: &str = "error";

/// Name of the helper function compiled templates call for dynamic attributes.
pub const ATTR_HELPER: &str = "slim_attr";

/// Elements that never get a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
    "param", "source", "track", "wbr",
];

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}
