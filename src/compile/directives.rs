use crate::compile::args::parse_arguments;
use crate::compile::scan::{self, ArgMode};
use crate::directive::DirectiveRegistry;
use tracing::trace;

/// Expands every registered directive, in registration order.
///
/// `@name(a, b)` hands the tokenized arguments to the handler, bare `@name`
/// calls it with none. Each directive gets a single pass, so a handler's output
/// is not fed back into that same handler.
pub fn compile_custom_directives(content: &str, registry: &DirectiveRegistry) -> String {
    let mut content = content.to_string();
    for (name, handler) in registry.iter() {
        content = scan::rewrite(&content, name, ArgMode::Optional, |raw| {
            let args = raw.map(parse_arguments).unwrap_or_default();
            trace!("Expanding @{} with {} argument(s)", name, args.len());
            Some(handler.call(&args))
        });
    }
    content
}
