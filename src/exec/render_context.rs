use crate::data::{Data, Value};

/// Variable scope for one execution: the data context plus loop variables.
pub struct Context<'a> {
    root: &'a Data,
    locals: Vec<(String, Value)>,
}

impl<'a> Context<'a> {
    pub fn new(root: &'a Data) -> Self {
        Self {
            root,
            locals: Vec::new(),
        }
    }

    pub fn push(&mut self, key: &str, value: Value) {
        self.locals.push((key.to_string(), value));
    }

    pub fn pop(&mut self) {
        self.locals.pop();
    }

    /// Looks up `name`, then walks `path` through maps (by key) and lists (by index).
    pub fn lookup(&self, name: &str, path: &[String]) -> Option<&Value> {
        let head = self.get_from_scope(name)?;
        Self::resolve_path(head, path)
    }

    fn get_from_scope(&self, key: &str) -> Option<&Value> {
        // Loop variables shadow the data context, innermost first.
        if let Some((_, v)) = self.locals.iter().rev().find(|(k, _)| k == key) {
            return Some(v);
        }
        self.root.get(key)
    }

    fn resolve_path<'v>(mut current: &'v Value, path: &[String]) -> Option<&'v Value> {
        for part in path {
            current = match current {
                Value::Map(m) => m.get(part)?,
                Value::List(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}
