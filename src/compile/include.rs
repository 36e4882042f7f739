use crate::compile::args::parse_arguments;
use crate::compile::echo::{compile_echos, compile_raw_echos};
use crate::compile::literal::{is_quoted, parse_literal_map, unquote};
use crate::compile::scan::{self, ArgMode};
use crate::compile::statements::compile_statements;
use crate::data::Data;
use crate::error::OrionError;
use crate::exec::Executor;
use crate::source::TemplateSource;
use tracing::debug;

/// Replaces `@include('view'[, [...]])` markers with the rendered view.
///
/// An included view sees the caller's data with the literal map's keys laid
/// over it. Its own includes are resolved first (depth first), then it gets
/// the statement and echo passes and is handed to the executor.
pub(crate) struct IncludeResolver<'a> {
    source: &'a dyn TemplateSource,
    executor: &'a dyn Executor,
    max_depth: usize,
}

impl<'a> IncludeResolver<'a> {
    pub(crate) fn new(
        source: &'a dyn TemplateSource,
        executor: &'a dyn Executor,
        max_depth: usize,
    ) -> Self {
        Self {
            source,
            executor,
            max_depth,
        }
    }

    pub(crate) fn process_includes(
        &self,
        content: &str,
        data: &Data,
    ) -> Result<String, OrionError> {
        self.process(content, data, &mut Vec::new())
    }

    fn process(
        &self,
        content: &str,
        data: &Data,
        chain: &mut Vec<String>,
    ) -> Result<String, OrionError> {
        let mut error = None;
        let out = scan::rewrite(content, "include", ArgMode::Required, |raw| {
            if error.is_some() {
                return None;
            }
            let (view, overrides) = parse_include_args(raw?)?;
            let mut include_data = data.clone();
            include_data.extend(overrides);
            match self.render_include(&view, &include_data, chain) {
                Ok(rendered) => Some(rendered),
                Err(e) => {
                    error = Some(e);
                    None
                }
            }
        });
        match error {
            Some(e) => Err(e),
            None => Ok(out),
        }
    }

    fn render_include(
        &self,
        view: &str,
        data: &Data,
        chain: &mut Vec<String>,
    ) -> Result<String, OrionError> {
        if chain.iter().any(|v| v == view) {
            let mut cycle = chain.clone();
            cycle.push(view.to_string());
            return Err(OrionError::IncludeCycle(cycle.join(" -> ")));
        }
        if chain.len() >= self.max_depth {
            return Err(OrionError::IncludeDepthExceeded {
                view: view.to_string(),
                limit: self.max_depth,
            });
        }

        debug!("Including view: {}", view);
        let content = self
            .source
            .load(view)?
            .ok_or_else(|| OrionError::IncludeNotFound(view.to_string()))?;

        chain.push(view.to_string());
        let nested = self.process(&content, data, chain);
        chain.pop();

        let compiled = compile_raw_echos(&compile_echos(&compile_statements(&nested?)));
        self.executor.execute(view, &compiled, data)
    }
}

/// The view name and optional literal-map overrides, or `None` when the marker
/// is not a quoted view name optionally followed by a `[...]` literal.
fn parse_include_args(raw: &str) -> Option<(String, Data)> {
    let args = parse_arguments(raw);
    let (view, literal) = match args.as_slice() {
        [view] => (view, None),
        [view, literal] => (view, Some(literal)),
        _ => return None,
    };

    let name = unquote(view);
    if !is_quoted(view) || name.is_empty() || name.contains(['\'', '"', ')']) {
        return None;
    }

    let overrides = match literal {
        Some(l) if l.starts_with('[') && l.ends_with(']') => parse_literal_map(l),
        Some(_) => return None,
        None => Data::new(),
    };
    Some((name.to_string(), overrides))
}
