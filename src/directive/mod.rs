use crate::error::OrionError;

mod loader;
mod registry;

pub use loader::{load, load_from_path};
pub use registry::DirectiveRegistry;

/// Names the compiler already gives a meaning to; custom directives may not reuse them.
pub const RESERVED_NAMES: &[&str] = &[
    "extends",
    "section",
    "endsection",
    "yield",
    "include",
    "if",
    "elseif",
    "else",
    "endif",
    "foreach",
    "endforeach",
    "for",
    "endfor",
    "while",
    "endwhile",
    "dowhile",
    "enddowhile",
    "break",
    "php",
    "endphp",
    "csrf",
    "switch",
    "case",
    "default",
    "endswitch",
];

/// A custom directive handler: ordered string arguments in, replacement text out.
pub trait Directive: Send + Sync {
    fn call(&self, args: &[String]) -> String;
}

impl<F> Directive for F
where
    F: Fn(&[String]) -> String + Send + Sync,
{
    fn call(&self, args: &[String]) -> String {
        self(args)
    }
}

/// A handler defined as text: `$1`..`$N` receive positional arguments, `$*` all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDirective {
    body: String,
}

impl TemplateDirective {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl Directive for TemplateDirective {
    fn call(&self, args: &[String]) -> String {
        let mut out = String::with_capacity(self.body.len());
        let mut rest = self.body.as_str();
        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            if let Some(tail) = after.strip_prefix('*') {
                out.push_str(&args.join(", "));
                rest = tail;
                continue;
            }
            let digits = after.len() - after.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            match after[..digits].parse::<usize>() {
                Ok(n) if n > 0 => {
                    if let Some(arg) = args.get(n - 1) {
                        out.push_str(arg);
                    }
                    rest = &after[digits..];
                }
                _ => {
                    out.push('$');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Accepts identifier names that no built-in directive uses.
pub(crate) fn validate_name(name: &str) -> Result<(), OrionError> {
    if is_reserved(name) {
        return Err(OrionError::ReservedDirective(name.to_string()));
    }
    if !is_valid_name(name) {
        return Err(OrionError::InvalidDirectiveName(name.to_string()));
    }
    Ok(())
}

pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
