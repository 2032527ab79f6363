//! Engine configuration for the Slim front-end and the MiniJinja backend.

use indexmap::IndexMap;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Expansion rule for a one-character attribute shortcut such as `.` or `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    /// Tag used when the shortcut starts the line (`&text` becomes an `input`).
    pub tag: Option<String>,
    /// Attribute that receives the shortcut's value.
    pub attr: String,
}

impl Shortcut {
    pub fn attr(attr: &str) -> Self {
        Self { tag: None, attr: attr.to_string() }
    }

    pub fn tag_attr(tag: &str, attr: &str) -> Self {
        Self { tag: Some(tag.to_string()), attr: attr.to_string() }
    }
}

/// Options handed to the renderer once per process.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Shortcut characters in declaration order.
    pub shortcuts: IndexMap<char, Shortcut>,
    /// Directories searched by `include`.
    pub include_dirs: Vec<PathBuf>,
    /// Sort tag attributes by name instead of keeping source order.
    pub sort_attrs: bool,
    /// Indent nested elements on their own lines. Slow; the CLI never sets it.
    pub pretty: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        let mut shortcuts = IndexMap::new();
        shortcuts.insert('&', Shortcut::tag_attr("input", "type"));
        shortcuts.insert('#', Shortcut::attr("id"));
        shortcuts.insert('.', Shortcut::attr("class"));
        Self { shortcuts, include_dirs: Vec::new(), sort_attrs: false, pretty: false }
    }
}

impl EngineOptions {
    /// The fixed CLI configuration: default shortcuts with `include_dir/` as
    /// the only include search path.
    pub fn for_include_dir(include_dir: &str) -> Self {
        let with_separator = format!("{include_dir}{MAIN_SEPARATOR}");
        Self { include_dirs: vec![PathBuf::from(with_separator)], ..Self::default() }
    }

    pub fn with_sort_attrs(mut self, sort_attrs: bool) -> Self {
        self.sort_attrs = sort_attrs;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn shortcut(&self, c: char) -> Option<&Shortcut> {
        self.shortcuts.get(&c)
    }

    /// First existing file named `name` under the include search path.
    pub fn find_include(&self, name: &str) -> Option<PathBuf> {
        let candidate = Path::new(name);
        if candidate.is_absolute() {
            return candidate.is_file().then(|| candidate.to_path_buf());
        }
        self.include_dirs.iter().map(|dir| dir.join(candidate)).find(|p| p.is_file())
    }
}
