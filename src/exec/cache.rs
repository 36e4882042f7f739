use crate::error::OrionError;
use crate::exec::ast::Node;
use crate::exec::parser::parse_compiled;
use dashmap::DashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Clone)]
struct CachedTemplate {
    ast: Arc<Vec<Node>>,
    content_hash: u64,
}

/// Parsed compiled text, one entry per view name.
///
/// The content hash only detects that a view compiled to different text since
/// it was parsed; the entry is then replaced, never added alongside.
#[derive(Default)]
pub(crate) struct AstCache {
    entries: DashMap<String, CachedTemplate>,
}

impl AstCache {
    pub(crate) fn get_ast(&self, view: &str, compiled: &str) -> Result<Arc<Vec<Node>>, OrionError> {
        let mut hasher = DefaultHasher::new();
        compiled.hash(&mut hasher);
        let content_hash = hasher.finish();

        if let Some(cached) = self.entries.get(view) {
            if cached.content_hash == content_hash {
                return Ok(Arc::clone(&cached.ast));
            }
        }

        let ast = Arc::new(parse_compiled(compiled)?);
        self.entries.insert(
            view.to_string(),
            CachedTemplate {
                ast: Arc::clone(&ast),
                content_hash,
            },
        );
        Ok(ast)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
