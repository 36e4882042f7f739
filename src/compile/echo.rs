use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Function the host provides to HTML-escape an echoed value.
pub const ESCAPE_FUNCTION: &str = "escape";

static ESCAPED_ECHO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(.+?)\s*\}\}").unwrap());

static RAW_ECHO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{!!\s*(.+?)\s*!!\}").unwrap());

/// `{{ expr }}` becomes an escaped echo. Expressions holding `!!` are left for the raw form.
pub fn compile_echos(content: &str) -> String {
    ESCAPED_ECHO_RE
        .replace_all(content, |caps: &Captures| {
            let expr = &caps[1];
            if expr.contains("!!") {
                caps[0].to_string()
            } else {
                format!("<?php echo {}({}); ?>", ESCAPE_FUNCTION, expr)
            }
        })
        .into_owned()
}

/// `{!! expr !!}` becomes an unescaped echo.
pub fn compile_raw_echos(content: &str) -> String {
    RAW_ECHO_RE
        .replace_all(content, |caps: &Captures| format!("<?php echo {}; ?>", &caps[1]))
        .into_owned()
}
