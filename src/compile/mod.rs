//! Source-to-source compilation of view templates into host code.

mod args;
mod compiler;
mod directives;
pub(crate) mod echo;
mod include;
pub(crate) mod literal;
pub(crate) mod scan;
mod sections;
mod statements;
mod switch;

pub use args::parse_arguments;
pub use compiler::Compiler;
pub use directives::compile_custom_directives;
pub use echo::{ESCAPE_FUNCTION, compile_echos, compile_raw_echos};
pub use literal::{coerce_scalar, parse_literal_map};
pub use sections::{SectionTable, check_extends, extract_sections, inject_sections};
pub use statements::{CSRF_FUNCTION, compile_statements};
pub use switch::compile_switch;
