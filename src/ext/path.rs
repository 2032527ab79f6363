use std::path::Path;

use crate::error::{Error, Result};

/// Extension trait for Path used when handing paths to the template engine.
pub trait PathExt {
    /// Converts a path to a string slice, returning an error if the path contains invalid Unicode characters.
    ///
    /// Template names inside MiniJinja are strings, so every path that becomes
    /// a template name goes through here.
    ///
    /// # Examples
    /// ```
    /// use slimbridge::ext::PathExt;
    /// use std::path::Path;
    ///
    /// let path = Path::new("views/home.slim");
    /// assert_eq!(path.to_str_checked().unwrap(), "views/home.slim");
    /// ```
    fn to_str_checked(&self) -> Result<&str>;

    /// Reads the whole file as UTF-8, attaching the path to any I/O error.
    fn read_text(&self) -> Result<String>;
}

impl PathExt for Path {
    fn to_str_checked(&self) -> Result<&str> {
        self.to_str().ok_or_else(|| {
            Error::Other(anyhow::anyhow!(
                "Path '{}' contains invalid Unicode characters",
                self.display()
            ))
        })
    }

    fn read_text(&self) -> Result<String> {
        std::fs::read_to_string(self)
            .map_err(|source| Error::Io { path: self.to_path_buf(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_to_str_checked_valid() {
        let path = Path::new("valid_path");
        assert_eq!(path.to_str_checked().unwrap(), "valid_path");
    }

    #[test]
    fn test_read_text_missing_file() {
        let path = Path::new("/path/that/does/not/exist.slim");
        let err = path.read_text().unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("/path/that/does/not/exist.slim"));
    }

    #[test]
    fn test_read_text_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.slim");
        std::fs::write(&file, "p hello").unwrap();
        assert_eq!(file.read_text().unwrap(), "p hello");
    }
}
