use crate::data::{Data, Value};
use regex::Regex;
use std::sync::LazyLock;

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Key,
    Value,
}

/// Parses an inline `['key' => value, ...]` literal into a data map.
///
/// Keys lose their surrounding quotes; values go through [`coerce_scalar`].
/// Nested `[...]` and `{...}` values are kept as raw text. Input that holds no
/// `key => value` pair yields an empty map; nothing here ever fails.
pub fn parse_literal_map(raw: &str) -> Data {
    let mut raw = raw.trim();
    if raw.len() >= 2 && raw.starts_with('[') && raw.ends_with(']') {
        raw = &raw[1..raw.len() - 1];
    }

    let mut result = Data::new();
    let mut state = State::Key;
    let mut buffer = String::new();
    let mut current_key = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth: i32 = 0;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if escaped {
            buffer.push(c);
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }

        if (c == '\'' || c == '"') && depth == 0 {
            match quote {
                None => quote = Some(c),
                Some(q) if q == c => quote = None,
                Some(_) => {}
            }
            buffer.push(c);
            continue;
        }
        if quote.is_some() {
            buffer.push(c);
            continue;
        }

        match c {
            '[' | '{' => {
                depth += 1;
                buffer.push(c);
            }
            ']' | '}' => {
                depth -= 1;
                buffer.push(c);
            }
            _ if depth > 0 => buffer.push(c),
            '=' if state == State::Key && chars.peek() == Some(&'>') => {
                chars.next();
                current_key = unquote(buffer.trim()).to_string();
                buffer.clear();
                state = State::Value;
            }
            ',' if state == State::Value => {
                if !current_key.is_empty() {
                    result.insert(
                        std::mem::take(&mut current_key),
                        coerce_scalar(buffer.trim()),
                    );
                }
                buffer.clear();
                state = State::Key;
            }
            _ => buffer.push(c),
        }
    }

    if state == State::Value && !current_key.is_empty() {
        result.insert(current_key, coerce_scalar(buffer.trim()));
    }
    result
}

/// Best-effort conversion of a literal: quoted text stays text, then
/// `true`/`false`/`null` (any case), then integers and floats.
pub fn coerce_scalar(value: &str) -> Value {
    if is_quoted(value) {
        return Value::Str(unquote(value).to_string());
    }

    match value.to_ascii_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }

    if is_numeric(value) {
        if !value.contains('.') {
            if let Ok(i) = value.parse::<i64>() {
                return Value::Int(i);
            }
        }
        if let Ok(f) = value.parse::<f64>() {
            return Value::Float(f);
        }
    }

    Value::Str(value.to_string())
}

/// Decimal integers and floats, optionally signed and with an exponent.
pub(crate) fn is_numeric(s: &str) -> bool {
    NUMERIC_RE.is_match(s)
}

pub(crate) fn is_quoted(s: &str) -> bool {
    s.len() >= 2
        && ((s.starts_with('\'') && s.ends_with('\'')) || (s.starts_with('"') && s.ends_with('"')))
}

pub(crate) fn unquote(s: &str) -> &str {
    if is_quoted(s) { &s[1..s.len() - 1] } else { s }
}
