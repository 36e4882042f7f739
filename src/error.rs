use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, compiling or executing templates.
#[derive(Error, Debug)]
pub enum OrionError {
    #[error("View {0} not found")]
    ViewNotFound(String),
    #[error("Layout {0} not found")]
    LayoutNotFound(String),
    #[error("Include file not found: {0}")]
    IncludeNotFound(String),
    #[error("Include cycle detected: {0}")]
    IncludeCycle(String),
    #[error("Include depth limit of {limit} exceeded at {view}")]
    IncludeDepthExceeded { view: String, limit: usize },
    #[error("Directive name '{0}' is reserved by a built-in directive")]
    ReservedDirective(String),
    #[error("Invalid directive name: '{0}'")]
    InvalidDirectiveName(String),
    #[error("Invalid template data: {0}")]
    InvalidData(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Execution error: {0}")]
    Execution(String),
}
