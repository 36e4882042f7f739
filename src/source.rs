use crate::error::OrionError;
use crate::models::options::DEFAULT_EXTENSION;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Where templates referenced by dotted names (`layouts.app`) come from.
pub trait TemplateSource: Send + Sync {
    /// Returns `Ok(None)` when the template does not exist.
    fn load(&self, name: &str) -> Result<Option<String>, OrionError>;
}

/// `a.b.c` with extension `ext` becomes `a/b/c.ext`.
pub fn relative_path(name: &str, extension: &str) -> String {
    format!("{}.{}", name.replace('.', "/"), extension)
}

/// Reads templates from a views directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
    extension: String,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            root: root.into(),
            extension: extension.to_string(),
        }
    }

    pub fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(relative_path(name, &self.extension))
    }
}

impl TemplateSource for FileSource {
    fn load(&self, name: &str) -> Result<Option<String>, OrionError> {
        let path = self.resolve(name);
        debug!("Looking for template file: {}", path.display());
        if !path.is_file() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| OrionError::Io { path, source })
    }
}

/// Templates held in memory, keyed by their path relative to the views root.
#[derive(Debug, Clone)]
pub struct MemorySource {
    files: HashMap<String, String>,
    extension: String,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self {
            files: HashMap::new(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a source from `(relative path, content)` pairs, as produced by `embed_views!`.
    pub fn from_assets<'a>(assets: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut source = Self::new();
        for (path, content) in assets {
            source.files.insert(path.to_string(), content.to_string());
        }
        source
    }

    /// Sets the extension dotted names resolve to, for views not ending in `.orion.php`.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Adds a template under its dotted view name.
    pub fn insert(&mut self, name: &str, content: impl Into<String>) {
        self.files
            .insert(relative_path(name, &self.extension), content.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl TemplateSource for MemorySource {
    fn load(&self, name: &str) -> Result<Option<String>, OrionError> {
        Ok(self
            .files
            .get(&relative_path(name, &self.extension))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_dotted_name_resolution() {
        let source = FileSource::new("./views/", "orion.php");
        assert_eq!(
            source.resolve("layouts.app"),
            Path::new("./views/layouts/app.orion.php")
        );
        assert_eq!(relative_path("home", "tpl"), "home.tpl");
    }

    #[test]
    fn test_missing_file_is_none() {
        let source = FileSource::new("/definitely/not/here", "orion.php");
        assert!(source.load("home").unwrap().is_none());
    }

    #[test]
    fn test_memory_source_uses_same_path_rule() {
        let source = MemorySource::from_assets([("partials/nav.orion.php", "<nav/>")]);
        assert_eq!(source.load("partials.nav").unwrap().as_deref(), Some("<nav/>"));
        assert!(source.load("partials.footer").unwrap().is_none());

        let mut source = MemorySource::new();
        source.insert("emails.welcome", "hi");
        assert_eq!(source.load("emails.welcome").unwrap().as_deref(), Some("hi"));
    }
}
