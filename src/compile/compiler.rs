use crate::compile::directives::compile_custom_directives;
use crate::compile::echo::{compile_echos, compile_raw_echos};
use crate::compile::include::IncludeResolver;
use crate::compile::sections::{check_extends, extract_sections, inject_sections};
use crate::compile::statements::compile_statements;
use crate::compile::switch::compile_switch;
use crate::data::Data;
use crate::directive::DirectiveRegistry;
use crate::error::OrionError;
use crate::exec::Executor;
use crate::models::options::DEFAULT_MAX_INCLUDE_DEPTH;
use crate::source::TemplateSource;
use tracing::{debug, trace};

/// Runs the full compile pipeline over one view.
///
/// Stage order is fixed: layout inheritance, includes, `@switch`, custom
/// directives, control-flow statements, escaped echos, raw echos. Each stage
/// only sees what earlier stages produced.
pub struct Compiler<'a> {
    source: &'a dyn TemplateSource,
    directives: &'a DirectiveRegistry,
    executor: &'a dyn Executor,
    max_include_depth: usize,
    debug: bool,
}

impl<'a> Compiler<'a> {
    pub fn new(
        source: &'a dyn TemplateSource,
        directives: &'a DirectiveRegistry,
        executor: &'a dyn Executor,
    ) -> Self {
        Compiler {
            source,
            directives,
            executor,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            debug: false,
        }
    }

    pub fn max_include_depth(mut self, max_include_depth: usize) -> Self {
        self.max_include_depth = max_include_depth;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn compile(&self, content: &str, data: &Data) -> Result<String, OrionError> {
        let (layout, body) = check_extends(content);
        let (sections, body) = extract_sections(&body);
        let mut buf = match layout {
            Some(layout) => {
                debug!("Extending layout: {}", layout);
                let layout_content = self
                    .source
                    .load(&layout)?
                    .ok_or(OrionError::LayoutNotFound(layout))?;
                inject_sections(&layout_content, &sections)
            }
            None => body,
        };
        self.stage("layout", &buf);

        buf = IncludeResolver::new(self.source, self.executor, self.max_include_depth)
            .process_includes(&buf, data)?;
        self.stage("includes", &buf);

        buf = compile_switch(&buf);
        self.stage("switch", &buf);

        buf = compile_custom_directives(&buf, self.directives);
        self.stage("directives", &buf);

        buf = compile_statements(&buf);
        self.stage("statements", &buf);

        buf = compile_echos(&buf);
        self.stage("echos", &buf);

        buf = compile_raw_echos(&buf);
        self.stage("raw echos", &buf);

        Ok(buf)
    }

    fn stage(&self, name: &str, buf: &str) {
        debug!("Compile stage done: {}", name);
        if self.debug {
            trace!("After {}:\n{}", name, buf);
        }
    }
}
