//! Orion compiles directive-annotated view templates into host code.
//!
//! ```ignore
//! let engine = Orion::new(OrionOptions::new().views_path("views"));
//! engine.directive("upper", |args: &[String]| {
//!     format!("<?php echo strtoupper({}); ?>", args.join(", "))
//! })?;
//! let html = engine.render("pages.home", &data)?;
//! ```

pub mod compile;
pub mod data;
pub mod directive;
pub mod engine;
pub mod error;
pub mod exec;
pub mod models;
pub mod source;

pub use compile::Compiler;
pub use data::{Data, Value, to_data, to_value};
pub use directive::{Directive, DirectiveRegistry, TemplateDirective};
pub use engine::Orion;
pub use error::OrionError;
pub use exec::{Executor, PreviewExecutor};
pub use models::options::OrionOptions;
pub use orion_macros::embed_views;
pub use source::{FileSource, MemorySource, TemplateSource};
