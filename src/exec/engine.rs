use crate::data::Data;
use crate::error::OrionError;
use crate::exec::Executor;
use crate::exec::cache::AstCache;
use crate::exec::render::render;
use crate::exec::render_context::Context;

/// Executes the common subset of compiled host syntax without a host runtime.
///
/// Supports text, `echo escape(...)`, raw `echo`, `if`/`elseif`/`else` and
/// `foreach`, with expressions limited to variables (including `['key']`,
/// `->key` and `[0]` access), literals, comparisons, `!`, `&&`/`and`,
/// `||`/`or` and `??`. Any other statement is an [`OrionError::Execution`].
#[derive(Default)]
pub struct PreviewExecutor {
    cache: AstCache,
}

impl PreviewExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Executor for PreviewExecutor {
    fn execute(&self, view: &str, compiled: &str, data: &Data) -> Result<String, OrionError> {
        let ast = self.cache.get_ast(view, compiled)?;
        let mut out = String::with_capacity(compiled.len());
        let mut ctx = Context::new(data);
        render(&ast, &mut ctx, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::Compiler;
    use crate::data::Value;
    use crate::directive::DirectiveRegistry;
    use crate::source::MemorySource;

    fn data(pairs: &[(&str, Value)]) -> Data {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_execute_conditionals() {
        let compiled =
            "<?php if ($x > 0): ?> positive <?php else: ?> negative <?php endif; ?>";
        let executor = PreviewExecutor::new();

        let out = executor.execute("sign", compiled, &data(&[("x", Value::Int(5))])).unwrap();
        assert_eq!(out.trim(), "positive");

        let out = executor.execute("sign", compiled, &data(&[("x", Value::Int(-1))])).unwrap();
        assert_eq!(out.trim(), "negative");
    }

    #[test]
    fn test_execute_escapes() {
        let compiled = "<?php echo escape($v); ?>|<?php echo $v; ?>";
        let out = PreviewExecutor::new()
            .execute("escapes", compiled, &data(&[("v", Value::from("<b>"))]))
            .unwrap();
        assert_eq!(out, "&lt;b&gt;|<b>");
    }

    #[test]
    fn test_execute_foreach() {
        let compiled = "<ul><?php foreach ($items as $item): ?>\
            <li><?php echo escape($item); ?></li><?php endforeach; ?></ul>";
        let out = PreviewExecutor::new()
            .execute("list", compiled, &data(&[("items", Value::from(vec!["a", "b"]))]))
            .unwrap();
        assert_eq!(out, "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_execute_unsupported() {
        let err = PreviewExecutor::new()
            .execute("form", "<?php echo csrfDirective(); ?>", &Data::new())
            .unwrap_err();
        assert!(matches!(err, OrionError::Execution(_)));
    }

    #[test]
    fn test_cache_holds_one_entry_per_view() {
        let mut source = MemorySource::new();
        source.insert("badge", "<b>{{ $n }}</b>");
        let directives = DirectiveRegistry::new();
        let executor = PreviewExecutor::new();

        for n in 0..200 {
            let data = data(&[("n", Value::Int(n))]);
            let compiled = Compiler::new(&source, &directives, &executor)
                .compile("@include('badge')", &data)
                .unwrap();
            let out = executor.execute("page", &compiled, &data).unwrap();
            assert_eq!(out, format!("<b>{}</b>", n));
        }
        // One for the include, one for the page.
        assert_eq!(executor.cache.len(), 2);
    }

    #[test]
    fn test_compiled_conditional_renders() {
        let source = MemorySource::new();
        let directives = DirectiveRegistry::new();
        let executor = PreviewExecutor::new();
        let template = "@if($x > 0) positive @else negative @endif";

        for (x, expected) in [(5, "positive"), (0, "negative")] {
            let data = data(&[("x", Value::Int(x))]);
            let compiled = Compiler::new(&source, &directives, &executor)
                .compile(template, &data)
                .unwrap();
            let out = executor.execute("sign", &compiled, &data).unwrap();
            assert_eq!(out.trim(), expected);
        }
    }
}
