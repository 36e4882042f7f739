use crate::compile::literal::{coerce_scalar, is_numeric, is_quoted, unquote};
use crate::compile::scan::{find_closing_paren, is_word_char};
use crate::data::Value;
use crate::error::OrionError;
use crate::exec::ast::Node;
use crate::exec::escape_html;
use crate::exec::render_context::Context;

const OR: &[&str] = &["||", " or "];
const AND: &[&str] = &["&&", " and "];
const COALESCE: &[&str] = &["??"];
const COMPARISONS: &[&str] = &["===", "!==", "==", "!=", ">=", "<=", ">", "<"];

pub(crate) fn render(
    nodes: &[Node],
    ctx: &mut Context,
    out: &mut String,
) -> Result<(), OrionError> {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Echo { expr, escaped } => {
                let text = eval_value(expr, ctx)?.to_string();
                if *escaped {
                    out.push_str(&escape_html(&text));
                } else {
                    out.push_str(&text);
                }
            }
            Node::If { branches } => {
                for (cond, body) in branches {
                    let taken = match cond {
                        Some(cond) => eval_condition(cond, ctx)?,
                        None => true,
                    };
                    if taken {
                        render(body, ctx, out)?;
                        break;
                    }
                }
            }
            Node::Foreach {
                collection,
                key,
                item,
                body,
            } => {
                let entries: Vec<(Value, Value)> = match eval_value(collection, ctx)? {
                    Value::List(items) => items
                        .into_iter()
                        .enumerate()
                        .map(|(i, v)| (Value::Int(i as i64), v))
                        .collect(),
                    Value::Map(map) => {
                        let mut entries: Vec<_> = map.into_iter().collect();
                        entries.sort_by(|a, b| a.0.cmp(&b.0));
                        entries.into_iter().map(|(k, v)| (Value::Str(k), v)).collect()
                    }
                    _ => continue,
                };

                for (k, v) in entries {
                    if let Some(key) = key {
                        ctx.push(key, k);
                    }
                    ctx.push(item, v);
                    let result = render(body, ctx, out);
                    ctx.pop();
                    if key.is_some() {
                        ctx.pop();
                    }
                    result?;
                }
            }
        }
    }
    Ok(())
}

/// Evaluates a condition built from comparisons joined by `&&`/`and` and `||`/`or`.
pub fn eval_condition(expr: &str, ctx: &Context) -> Result<bool, OrionError> {
    for or_part in split_top_level(expr, OR) {
        let mut and_satisfied = true;
        for atom in split_top_level(or_part, AND) {
            if !eval_atom(atom, ctx)? {
                and_satisfied = false;
                break;
            }
        }
        if and_satisfied {
            return Ok(true);
        }
    }
    Ok(false)
}

fn eval_atom(expr: &str, ctx: &Context) -> Result<bool, OrionError> {
    let expr = expr.trim();
    if let Some(rest) = expr.strip_prefix('!') {
        if !rest.starts_with('=') {
            return Ok(!eval_atom(rest, ctx)?);
        }
    }
    if let Some(inner) = strip_outer_parens(expr) {
        return eval_condition(inner, ctx);
    }

    match find_comparison(expr) {
        Some((at, op)) => {
            let left = eval_value(&expr[..at], ctx)?;
            let right = eval_value(&expr[at + op.len()..], ctx)?;
            Ok(compare(&left, op, &right))
        }
        None => Ok(eval_value(expr, ctx)?.is_truthy()),
    }
}

/// An operand, optionally chained with `??`.
fn eval_value(expr: &str, ctx: &Context) -> Result<Value, OrionError> {
    let parts = split_top_level(expr, COALESCE);
    let (last, rest) = parts
        .split_last()
        .ok_or_else(|| OrionError::Execution("empty expression".to_string()))?;
    for part in rest {
        let value = eval_operand(part, ctx)?;
        if value != Value::Null {
            return Ok(value);
        }
    }
    eval_operand(last, ctx)
}

fn eval_operand(expr: &str, ctx: &Context) -> Result<Value, OrionError> {
    let expr = expr.trim();
    if let Some(inner) = strip_outer_parens(expr) {
        return eval_value(inner, ctx);
    }
    if expr.starts_with('$') {
        let (name, path) = parse_variable(expr)
            .ok_or_else(|| unsupported(expr))?;
        // Undefined variables read as null, as in the host.
        return Ok(ctx.lookup(&name, &path).cloned().unwrap_or(Value::Null));
    }
    if is_quoted(expr) {
        return Ok(Value::Str(unescape(unquote(expr))));
    }
    if is_numeric(expr) || matches!(expr.to_ascii_lowercase().as_str(), "true" | "false" | "null") {
        return Ok(coerce_scalar(expr));
    }
    Err(unsupported(expr))
}

fn unsupported(expr: &str) -> OrionError {
    OrionError::Execution(format!("unsupported expression: {}", expr))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// `$user['name']->id[0]` becomes (`user`, [`name`, `id`, `0`]).
fn parse_variable(expr: &str) -> Option<(String, Vec<String>)> {
    let rest = expr.strip_prefix('$')?;
    let name_len = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let name = rest[..name_len].to_string();
    let mut rest = &rest[name_len..];
    let mut path = Vec::new();

    while !rest.is_empty() {
        if let Some(r) = rest.strip_prefix("->") {
            let len = r.find(|c: char| !is_word_char(c)).unwrap_or(r.len());
            if len == 0 {
                return None;
            }
            path.push(r[..len].to_string());
            rest = &r[len..];
        } else if let Some(r) = rest.strip_prefix('[') {
            let close = r.find(']')?;
            let key = r[..close].trim();
            if is_quoted(key) {
                path.push(unquote(key).to_string());
            } else if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
                path.push(key.to_string());
            } else {
                return None;
            }
            rest = &r[close + 1..];
        } else {
            return None;
        }
    }
    Some((name, path))
}

fn compare(left: &Value, op: &str, right: &Value) -> bool {
    match op {
        "===" => left == right,
        "!==" => left != right,
        "==" => loose_eq(left, right),
        "!=" => !loose_eq(left, right),
        _ => {
            let ordering = match (numeric(left), numeric(right)) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => Some(left.to_string().cmp(&right.to_string())),
            };
            let Some(ordering) = ordering else {
                return false;
            };
            match op {
                ">" => ordering.is_gt(),
                ">=" => ordering.is_ge(),
                "<" => ordering.is_lt(),
                "<=" => ordering.is_le(),
                _ => false,
            }
        }
    }
}

fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, other) | (other, Value::Null) => !other.is_truthy(),
        (Value::Bool(b), other) | (other, Value::Bool(b)) => *b == other.is_truthy(),
        _ => match (numeric(left), numeric(right)) {
            (Some(a), Some(b)) => a == b,
            _ => left.to_string() == right.to_string(),
        },
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Int(_) | Value::Float(_) => value.as_f64(),
        Value::Str(s) if is_numeric(s.trim()) => value.as_f64(),
        _ => None,
    }
}

/// The inner text when `expr` is entirely wrapped in one pair of parentheses.
fn strip_outer_parens(expr: &str) -> Option<&str> {
    if !expr.starts_with('(') {
        return None;
    }
    (find_closing_paren(expr, 0)? == expr.len() - 1).then(|| &expr[1..expr.len() - 1])
}

/// Walks `expr` outside quotes and brackets, calling `f` at every char boundary.
fn for_each_top_level(expr: &str, mut f: impl FnMut(usize) -> Option<usize>) {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth = 0i32;
    let mut skip_until = 0;

    for (i, c) in expr.char_indices() {
        if i < skip_until {
            continue;
        }
        if escaped {
            escaped = false;
            continue;
        }
        if let Some(q) = quote {
            match c {
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            _ if depth == 0 => {
                if let Some(skip) = f(i) {
                    skip_until = i + skip;
                }
            }
            _ => {}
        }
    }
}

fn split_top_level<'e>(expr: &'e str, separators: &[&str]) -> Vec<&'e str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for_each_top_level(expr, |i| {
        let sep = separators.iter().find(|sep| expr[i..].starts_with(**sep))?;
        parts.push(&expr[start..i]);
        start = i + sep.len();
        Some(sep.len())
    });
    parts.push(&expr[start..]);
    parts
}

fn find_comparison(expr: &str) -> Option<(usize, &'static str)> {
    let mut found = None;
    for_each_top_level(expr, |i| {
        if found.is_some() {
            return None;
        }
        let op = COMPARISONS.iter().find(|op| expr[i..].starts_with(**op))?;
        // `->` and `=>` are not comparisons.
        if op.starts_with('>') && matches!(expr[..i].chars().last(), Some('-') | Some('=')) {
            return None;
        }
        found = Some((i, *op));
        Some(op.len())
    });
    found
}
