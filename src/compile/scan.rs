/// How a directive consumes a parenthesized argument list after its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArgMode {
    /// `@else`: never takes arguments; a following `(` is plain text.
    None,
    /// `@if(...)`: only matches when a balanced argument list follows.
    Required,
    /// `@name` or `@name(...)`.
    Optional,
}

/// Rewrites every `@name` marker in `src`.
///
/// A marker only matches when the name is not followed by another word character,
/// so `@for` never matches inside `@foreach`. The callback receives the raw text
/// between the outer parentheses (if any) and returns the replacement, or `None`
/// to leave the marker untouched. Replacement text is never rescanned.
pub(crate) fn rewrite<F>(src: &str, name: &str, mode: ArgMode, mut f: F) -> String
where
    F: FnMut(Option<&str>) -> Option<String>,
{
    let marker = format!("@{}", name);
    let mut out = String::with_capacity(src.len());
    let mut pos = 0;

    while let Some(found) = src[pos..].find(&marker) {
        let start = pos + found;
        let after = start + marker.len();
        out.push_str(&src[pos..start]);

        if src[after..].chars().next().is_some_and(is_word_char) {
            out.push_str(&marker);
            pos = after;
            continue;
        }

        let matched = match mode {
            ArgMode::None => Some((None, after)),
            ArgMode::Required | ArgMode::Optional => {
                let open = after + (src[after..].len() - src[after..].trim_start().len());
                if src[open..].starts_with('(') {
                    match find_closing_paren(src, open) {
                        Some(close) => Some((Some(&src[open + 1..close]), close + 1)),
                        // `@name(` with no closing paren is neither form.
                        None if open == after || mode == ArgMode::Required => None,
                        None => Some((None, after)),
                    }
                } else if mode == ArgMode::Required {
                    None
                } else {
                    Some((None, after))
                }
            }
        };

        match matched.and_then(|(args, end)| f(args).map(|rep| (rep, end))) {
            Some((replacement, end)) => {
                out.push_str(&replacement);
                pos = end;
            }
            None => {
                out.push_str(&marker);
                pos = after;
            }
        }
    }

    out.push_str(&src[pos..]);
    out
}

/// Index of the `)` closing the `(` at `open`, skipping quoted text.
pub(crate) fn find_closing_paren(src: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in src[open..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' | '\'' => match quote {
                None => quote = Some(c),
                Some(q) if q == c => quote = None,
                Some(_) => {}
            },
            '(' if quote.is_none() => depth += 1,
            ')' if quote.is_none() => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
