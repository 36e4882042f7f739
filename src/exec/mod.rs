//! The execution boundary: turning compiled host syntax into rendered text.
//!
//! The compiler only produces compiled text. Includes, however, are rendered at
//! compile time, so the compiler needs something implementing [`Executor`].
//! [`PreviewExecutor`] understands the subset of host syntax that plain views
//! compile to (echoes, conditionals, `foreach`) and is the default.

mod ast;
mod cache;
mod engine;
mod parser;
mod render;
mod render_context;

use crate::data::Data;
use crate::error::OrionError;

pub use engine::PreviewExecutor;

pub trait Executor: Send + Sync {
    /// Runs compiled template text against `data` and returns the output.
    ///
    /// `view` names the template the text was compiled from. It stays the same
    /// across calls for one view while `compiled` may not, since included views
    /// are already rendered into it.
    fn execute(&self, view: &str, compiled: &str, data: &Data) -> Result<String, OrionError>;
}

pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }
}
