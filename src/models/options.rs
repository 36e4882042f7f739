use std::path::PathBuf;

pub const DEFAULT_EXTENSION: &str = "orion.php";
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 32;

#[derive(Debug, Clone)]
pub struct OrionOptions {
    /// Root directory that dotted view names resolve against.
    pub views_path: PathBuf,
    /// Directory walked for `*.xml` directive definition files.
    pub directives_path: PathBuf,
    /// Template file extension, without the leading dot.
    pub extension: String,
    /// Traces the working buffer after every compile stage.
    pub debug: bool,
    pub max_include_depth: usize,
}

impl Default for OrionOptions {
    fn default() -> Self {
        OrionOptions {
            views_path: PathBuf::from("./views/"),
            directives_path: PathBuf::from("./directives/"),
            extension: DEFAULT_EXTENSION.to_string(),
            debug: false,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

impl OrionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views_path(mut self, views_path: impl Into<PathBuf>) -> Self {
        self.views_path = views_path.into();
        self
    }

    pub fn directives_path(mut self, directives_path: impl Into<PathBuf>) -> Self {
        self.directives_path = directives_path.into();
        self
    }

    pub fn extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn max_include_depth(mut self, max_include_depth: usize) -> Self {
        self.max_include_depth = max_include_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = OrionOptions::new();
        assert_eq!(options.views_path, PathBuf::from("./views/"));
        assert_eq!(options.extension, "orion.php");
        assert!(!options.debug);
        assert_eq!(options.max_include_depth, 32);
    }

    #[test]
    fn test_builder() {
        let options = OrionOptions::new()
            .views_path("templates")
            .extension(".tpl")
            .debug(true)
            .max_include_depth(4);
        assert_eq!(options.views_path, PathBuf::from("templates"));
        assert_eq!(options.extension, "tpl");
        assert!(options.debug);
        assert_eq!(options.max_include_depth, 4);
    }
}
