use crate::constants::ERROR_MARKER;
use std::error::Error as _;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The variables file parsed but is not a JSON object.
    #[error("Invalid template variables: {0}")]
    Bindings(String),

    /// Slim syntax the front-end cannot translate.
    #[error("{template}, Line {line}: {message}")]
    Parse { template: String, line: usize, message: String },

    #[error("{0}")]
    Render(#[from] minijinja::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience type alias for Results with the crate error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Builds a parse error for `template` at the 1-based `line`.
    pub fn parse(template: &str, line: usize, message: impl Into<String>) -> Self {
        Error::Parse { template: template.to_string(), line, message: message.into() }
    }

    /// Full description including nested causes, on a single line.
    ///
    /// MiniJinja reports include failures as a chain, the interesting part
    /// being the innermost error.
    pub fn describe(&self) -> String {
        let mut message = self.to_string();
        if let Error::Render(err) = self {
            let mut source = err.source();
            while let Some(cause) = source {
                message.push_str(": ");
                message.push_str(&cause.to_string());
                source = cause.source();
            }
        }
        message.replace('\n', " ")
    }
}

/// Formats the line written to stdout when rendering fails.
pub fn marker_line(err: &Error) -> String {
    format!("{ERROR_MARKER}: {}", err.describe())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_line_starts_with_marker() {
        let err = Error::Bindings("expected an object".into());
        let line = marker_line(&err);
        assert!(line.starts_with("#<Slim_Error_for_python>: "));
        assert!(line.ends_with("expected an object"));
    }

    #[test]
    fn parse_error_names_template_and_line() {
        let err = Error::parse("home.slim", 3, "Unexpected indentation");
        assert_eq!(err.to_string(), "home.slim, Line 3: Unexpected indentation");
    }

    #[test]
    fn describe_is_single_line() {
        let err = Error::parse("a.slim", 1, "first\nsecond");
        assert!(!err.describe().contains('\n'));
    }
}
