use crate::directive::{Directive, validate_name};
use crate::error::OrionError;
use std::fmt;
use std::sync::Arc;

/// Ordered, name-unique set of custom directives.
///
/// Iteration follows registration order, which is also the order the compiler
/// expands directives in. Re-registering a name swaps the handler but keeps its slot.
#[derive(Clone, Default)]
pub struct DirectiveRegistry {
    entries: Vec<(String, Arc<dyn Directive>)>,
}

impl DirectiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: &str,
        handler: impl Directive + 'static,
    ) -> Result<(), OrionError> {
        self.register_arc(name, Arc::new(handler))
    }

    pub fn register_arc(
        &mut self,
        name: &str,
        handler: Arc<dyn Directive>,
    ) -> Result<(), OrionError> {
        validate_name(name)?;
        self.upsert(name, handler);
        Ok(())
    }

    /// Appends every entry of `other`; names already present take the other handler.
    pub fn extend(&mut self, other: &DirectiveRegistry) {
        for (name, handler) in &other.entries {
            self.upsert(name, Arc::clone(handler));
        }
    }

    /// Inserts or replaces a handler whose name was already validated.
    pub(crate) fn upsert(&mut self, name: &str, handler: Arc<dyn Directive>) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = handler,
            None => self.entries.push((name.to_string(), handler)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Directive>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, h)| h)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Directive>)> {
        self.entries.iter().map(|(n, h)| (n.as_str(), h))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(n, _)| n))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::TemplateDirective;

    #[test]
    fn test_registration_order_is_kept() {
        let mut registry = DirectiveRegistry::new();
        registry.register("b", TemplateDirective::new("B")).unwrap();
        registry.register("a", TemplateDirective::new("A")).unwrap();
        registry.register("b", TemplateDirective::new("B2")).unwrap();

        let names: Vec<&str> = registry.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(registry.get("b").unwrap().call(&[]), "B2");
    }

    #[test]
    fn test_reserved_and_invalid_names() {
        let mut registry = DirectiveRegistry::new();
        assert!(matches!(
            registry.register("foreach", TemplateDirective::new("")),
            Err(OrionError::ReservedDirective(_))
        ));
        assert!(matches!(
            registry.register("bad name", TemplateDirective::new("")),
            Err(OrionError::InvalidDirectiveName(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_extend_overrides_in_place() {
        let mut base = DirectiveRegistry::new();
        base.register("x", TemplateDirective::new("file")).unwrap();
        base.register("y", TemplateDirective::new("y")).unwrap();

        let mut app = DirectiveRegistry::new();
        app.register("z", TemplateDirective::new("z")).unwrap();
        app.register("x", TemplateDirective::new("app")).unwrap();

        base.extend(&app);
        let names: Vec<&str> = base.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["x", "y", "z"]);
        assert_eq!(base.get("x").unwrap().call(&[]), "app");
    }
}
