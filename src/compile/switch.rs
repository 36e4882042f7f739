use crate::compile::scan::{self, ArgMode, find_closing_paren, is_word_char};

const OPEN: &str = "@switch";
const CLOSE: &str = "@endswitch";

/// Rewrites each `@switch(...) ... @endswitch` block as a unit.
///
/// The host does not allow output between `switch` and its first `case`, so the
/// first `@case` continues the `switch` statement's own tag while later cases
/// open a new one. Runs before the statement pass, which would otherwise claim
/// the `@break`s. Blocks do not nest.
pub fn compile_switch(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut pos = 0;

    while let Some(found) = content[pos..].find(OPEN) {
        let start = pos + found;
        let after = start + OPEN.len();
        out.push_str(&content[pos..start]);

        match match_block(content, after) {
            Some((condition, body, end)) => {
                out.push_str(&format!(
                    "<?php switch({}): {}<?php endswitch; ?>",
                    condition,
                    compile_body(body)
                ));
                pos = end;
            }
            None => {
                out.push_str(OPEN);
                pos = after;
            }
        }
    }

    out.push_str(&content[pos..]);
    out
}

/// Condition, body and end offset of the block whose `@switch` ends at `after`.
fn match_block(content: &str, after: usize) -> Option<(&str, &str, usize)> {
    if content[after..].chars().next().is_some_and(is_word_char) {
        return None;
    }
    let open = after + (content[after..].len() - content[after..].trim_start().len());
    if !content[open..].starts_with('(') {
        return None;
    }
    let close = find_closing_paren(content, open)?;
    let body_start = close + 1;
    let body_len = content[body_start..].find(CLOSE)?;
    Some((
        &content[open + 1..close],
        &content[body_start..body_start + body_len],
        body_start + body_len + CLOSE.len(),
    ))
}

fn compile_body(body: &str) -> String {
    let mut first_case = true;
    let body = scan::rewrite(body, "case", ArgMode::Required, |value| {
        let value = value.unwrap_or_default();
        if first_case {
            first_case = false;
            Some(format!("case ({}): ?>", value))
        } else {
            Some(format!("<?php case ({}): ?>", value))
        }
    });
    let body = scan::rewrite(&body, "default", ArgMode::None, |_| {
        Some("<?php default: ?>".to_string())
    });
    scan::rewrite(&body, "break", ArgMode::None, |_| {
        Some("<?php break; ?>".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_case_shares_the_switch_tag() {
        let out = compile_switch(
            "@switch($n) @case(1) A @break @case(2) B @break @default C @endswitch",
        );
        assert_eq!(
            out,
            "<?php switch($n):  case (1): ?> A <?php break; ?> \
             <?php case (2): ?> B <?php break; ?> \
             <?php default: ?> C <?php endswitch; ?>"
        );
    }

    #[test]
    fn test_each_block_restarts_first_case() {
        let out =
            compile_switch("@switch($a)@case(1)x@endswitch|@switch($b)@case(2)y@endswitch");
        assert_eq!(
            out,
            "<?php switch($a): case (1): ?>x<?php endswitch; ?>|\
             <?php switch($b): case (2): ?>y<?php endswitch; ?>"
        );
    }

    #[test]
    fn test_multiline_body_and_nested_condition() {
        let src = "@switch(strtolower($role))\n  @case('admin')\n    Admin\n    @break\n@endswitch";
        let out = compile_switch(src);
        assert!(out.starts_with("<?php switch(strtolower($role)): \n  case ('admin'): ?>"));
        assert!(out.ends_with("<?php break; ?>\n<?php endswitch; ?>"));
    }

    #[test]
    fn test_break_outside_switch_is_left_alone() {
        assert_eq!(compile_switch("@break"), "@break");
    }

    #[test]
    fn test_unterminated_switch_is_left_alone() {
        assert_eq!(compile_switch("@switch($x) @case(1)"), "@switch($x) @case(1)");
    }
}
