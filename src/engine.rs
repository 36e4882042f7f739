use crate::compile::Compiler;
use crate::data::{Data, to_data};
use crate::directive::{self, Directive, DirectiveRegistry, validate_name};
use crate::error::OrionError;
use crate::exec::{Executor, PreviewExecutor};
use crate::models::options::OrionOptions;
use crate::source::{FileSource, TemplateSource};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// View engine: resolves views, compiles them and renders them through an [`Executor`].
///
/// Directives loaded from `directives_path` at construction are expanded first,
/// then directives registered on the engine, in registration order.
pub struct Orion {
    options: OrionOptions,
    source: Arc<dyn TemplateSource>,
    executor: Arc<dyn Executor>,
    file_directives: DirectiveRegistry,
    app_directives: DashMap<String, (usize, Arc<dyn Directive>)>,
    sequence: AtomicUsize,
}

impl Orion {
    pub fn new(options: OrionOptions) -> Self {
        let source = FileSource::new(options.views_path.clone(), &options.extension);
        let file_directives = directive::load_from_path(&options.directives_path);
        Self {
            options,
            source: Arc::new(source),
            executor: Arc::new(PreviewExecutor::new()),
            file_directives,
            app_directives: DashMap::new(),
            sequence: AtomicUsize::new(0),
        }
    }

    /// Replaces the file-system view source.
    pub fn with_source(mut self, source: impl TemplateSource + 'static) -> Self {
        self.source = Arc::new(source);
        self
    }

    /// Adds directives defined outside `directives_path`, such as definitions
    /// built with [`directive::load`] from embedded documents. They expand after
    /// the file directives and replace any with the same name.
    pub fn with_directives(mut self, directives: DirectiveRegistry) -> Self {
        self.file_directives.extend(&directives);
        self
    }

    pub fn with_executor(mut self, executor: impl Executor + 'static) -> Self {
        self.executor = Arc::new(executor);
        self
    }

    pub fn options(&self) -> &OrionOptions {
        &self.options
    }

    /// Registers a directive for every later compile. Safe to call from several threads.
    pub fn directive(
        &self,
        name: &str,
        handler: impl Directive + 'static,
    ) -> Result<(), OrionError> {
        validate_name(name)?;
        let handler: Arc<dyn Directive> = Arc::new(handler);
        self.app_directives
            .entry(name.to_string())
            .and_modify(|entry| entry.1 = Arc::clone(&handler))
            .or_insert_with(|| {
                let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
                (seq, Arc::clone(&handler))
            });
        debug!("Registered directive @{}", name);
        Ok(())
    }

    /// Point-in-time copy of every directive the next compile will expand.
    pub fn directives(&self) -> DirectiveRegistry {
        let mut app: Vec<(usize, String, Arc<dyn Directive>)> = self
            .app_directives
            .iter()
            .map(|entry| {
                let (seq, handler) = entry.value();
                (*seq, entry.key().clone(), Arc::clone(handler))
            })
            .collect();
        app.sort_by_key(|(seq, _, _)| *seq);

        let mut registry = self.file_directives.clone();
        for (_, name, handler) in app {
            registry.upsert(&name, handler);
        }
        registry
    }

    /// Compiles template text as if it were a view.
    pub fn compile(&self, content: &str, data: &Data) -> Result<String, OrionError> {
        let directives = self.directives();
        Compiler::new(self.source.as_ref(), &directives, self.executor.as_ref())
            .max_include_depth(self.options.max_include_depth)
            .debug(self.options.debug)
            .compile(content, data)
    }

    pub fn compile_view(&self, view: &str, data: &Data) -> Result<String, OrionError> {
        let content = self
            .source
            .load(view)?
            .ok_or_else(|| OrionError::ViewNotFound(view.to_string()))?;
        debug!("Compiling view: {}", view);
        self.compile(&content, data)
    }

    /// Compiles `view` and executes it with `data`.
    pub fn render<T: ?Sized + Serialize>(
        &self,
        view: &str,
        data: &T,
    ) -> Result<String, OrionError> {
        let data = to_data(data)?;
        let compiled = self.compile_view(view, &data)?;
        self.executor.execute(view, &compiled, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use std::collections::HashMap;

    fn engine() -> Orion {
        let mut source = MemorySource::new();
        source.insert("home", "<h1>{{ $title }}</h1>@shout('hey')");
        Orion::new(OrionOptions::new().directives_path("/nonexistent/orion/directives"))
            .with_source(source)
    }

    #[test]
    fn test_render_view() {
        let engine = engine();
        engine
            .directive("shout", |args: &[String]| args.join("").to_uppercase())
            .unwrap();

        let data = HashMap::from([("title", "Tom & Jerry")]);
        let out = engine.render("home", &data).unwrap();
        assert_eq!(out, "<h1>Tom &amp; Jerry</h1>'HEY'");
    }

    #[test]
    fn test_missing_view() {
        let err = engine().compile_view("nope", &Data::new()).unwrap_err();
        assert!(matches!(err, OrionError::ViewNotFound(v) if v == "nope"));
    }

    #[test]
    fn test_directive_validation() {
        let engine = engine();
        let noop = |_: &[String]| String::new();
        assert!(matches!(
            engine.directive("foreach", noop),
            Err(OrionError::ReservedDirective(_))
        ));
        assert!(matches!(
            engine.directive("my-dir", noop),
            Err(OrionError::InvalidDirectiveName(_))
        ));
        assert!(engine.directives().is_empty());
    }

    #[test]
    fn test_registration_order_is_kept() {
        let engine = engine();
        for name in ["zeta", "alpha", "mid"] {
            engine.directive(name, |_: &[String]| String::new()).unwrap();
        }
        engine.directive("zeta", |_: &[String]| "again".to_string()).unwrap();

        let directives = engine.directives();
        let names: Vec<&str> = directives.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(directives.get("zeta").unwrap().call(&[]), "again");
    }

    #[test]
    fn test_concurrent_registration() {
        let engine = Arc::new(engine());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    engine
                        .directive(&format!("d{}", i), move |_: &[String]| i.to_string())
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(engine.directives().len(), 8);
    }
}
