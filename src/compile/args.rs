/// Splits the text between a directive's parentheses into trimmed arguments.
///
/// Commas only separate arguments outside quotes and at bracket depth zero.
/// Brackets count toward depth even inside quotes, so a quoted `(` or `)`
/// keeps the rest of the input in one argument. A backslash copies the next
/// character verbatim. Unbalanced quotes or brackets are not an error: the rest
/// of the input simply stays in the current argument.
pub fn parse_arguments(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let mut arguments = Vec::new();
    let mut buffer = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth: i32 = 0;

    for c in raw.chars() {
        if escaped {
            buffer.push(c);
            escaped = false;
            continue;
        }

        match c {
            '\\' => {
                escaped = true;
                buffer.push(c);
            }
            '"' | '\'' => {
                match quote {
                    None => quote = Some(c),
                    Some(q) if q == c => quote = None,
                    Some(_) => {}
                }
                buffer.push(c);
            }
            '(' | '[' | '{' => {
                depth += 1;
                buffer.push(c);
            }
            ')' | ']' | '}' => {
                depth -= 1;
                buffer.push(c);
            }
            ',' if quote.is_none() && depth == 0 => {
                arguments.push(buffer.trim().to_string());
                buffer.clear();
            }
            _ => buffer.push(c),
        }
    }

    if !buffer.trim().is_empty() {
        arguments.push(buffer.trim().to_string());
    }
    arguments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_and_parens_protect_commas() {
        assert_eq!(
            parse_arguments(r#"a, "b,c", (d,e)"#),
            vec!["a", r#""b,c""#, "(d,e)"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_arguments("").is_empty());
        assert!(parse_arguments("   ").is_empty());
    }

    #[test]
    fn test_escaped_quote_stays_inside_string() {
        assert_eq!(
            parse_arguments(r#""say \"hi, there\"", 2"#),
            vec![r#""say \"hi, there\"""#, "2"]
        );
    }

    #[test]
    fn test_whitespace_does_not_change_count() {
        assert_eq!(parse_arguments("a,b,c").len(), 3);
        assert_eq!(parse_arguments("  a ,\n b ,  c  ").len(), 3);
        assert_eq!(parse_arguments("a, b,"), vec!["a", "b"]);
    }

    #[test]
    fn test_nested_calls_and_arrays() {
        assert_eq!(
            parse_arguments("format($date, 'Y-m-d'), [1, 2], $user->name"),
            vec!["format($date, 'Y-m-d')", "[1, 2]", "$user->name"]
        );
    }

    #[test]
    fn test_other_quote_inside_string() {
        assert_eq!(
            parse_arguments(r#""it's", 'say "x"'"#),
            vec![r#""it's""#, r#"'say "x"'"#]
        );
    }

    #[test]
    fn test_unbalanced_input_degrades() {
        assert_eq!(parse_arguments("'open, b"), vec!["'open, b"]);
        assert_eq!(parse_arguments("f(a, b"), vec!["f(a, b"]);
    }

    #[test]
    fn test_quoted_brackets_still_count_toward_depth() {
        assert_eq!(parse_arguments(r#""(", b"#), vec![r#""(", b"#]);
        assert_eq!(parse_arguments(r#"")", b"#), vec![r#"")", b"#]);
        assert_eq!(parse_arguments(r#""()", b"#), vec![r#""()""#, "b"]);
    }
}
