use crate::compile::echo::ESCAPE_FUNCTION;
use crate::error::OrionError;
use crate::exec::ast::Node;

const OPEN_TAG: &str = "<?php";
const CLOSE_TAG: &str = "?>";

enum TagFrame {
    If {
        branches: Vec<(Option<String>, Vec<Node>)>,
        cond: Option<String>,
    },
    Foreach {
        collection: String,
        key: Option<String>,
        item: String,
    },
}

/// Parses compiled host text into nodes. Unclosed blocks are closed at the end of input.
pub fn parse_compiled(compiled: &str) -> Result<Vec<Node>, OrionError> {
    let mut nodes_stack: Vec<Vec<Node>> = vec![Vec::new()];
    let mut tag_stack: Vec<TagFrame> = Vec::new();
    let mut pos = 0;

    while pos < compiled.len() {
        let remaining = &compiled[pos..];

        let Some(open) = remaining.find(OPEN_TAG) else {
            append_text(current(&mut nodes_stack), remaining);
            break;
        };
        if open > 0 {
            append_text(current(&mut nodes_stack), &remaining[..open]);
        }

        let code_start = open + OPEN_TAG.len();
        let close = remaining[code_start..]
            .find(CLOSE_TAG)
            .ok_or_else(|| OrionError::Execution("unterminated <?php tag".to_string()))?;
        let code = remaining[code_start..code_start + close].trim();
        pos += code_start + close + CLOSE_TAG.len();
        // The host swallows a single newline directly after a closing tag.
        if compiled[pos..].starts_with("\r\n") {
            pos += 2;
        } else if compiled[pos..].starts_with('\n') {
            pos += 1;
        }

        parse_statement(code, &mut nodes_stack, &mut tag_stack)?;
    }

    while let Some(tag) = tag_stack.pop() {
        let body = nodes_stack.pop().unwrap_or_default();
        let node = close_frame(tag, body);
        current(&mut nodes_stack).push(node);
    }

    Ok(nodes_stack.pop().unwrap_or_default())
}

fn parse_statement(
    code: &str,
    nodes_stack: &mut Vec<Vec<Node>>,
    tag_stack: &mut Vec<TagFrame>,
) -> Result<(), OrionError> {
    if let Some(expr) = code.strip_prefix("echo ") {
        let expr = expr.trim().trim_end_matches(';').trim();
        let node = match strip_call(expr, ESCAPE_FUNCTION) {
            Some(inner) => Node::Echo {
                expr: inner.to_string(),
                escaped: true,
            },
            None => Node::Echo {
                expr: expr.to_string(),
                escaped: false,
            },
        };
        current(nodes_stack).push(node);
        return Ok(());
    }

    if let Some(cond) = block_condition(code, "if") {
        nodes_stack.push(Vec::new());
        tag_stack.push(TagFrame::If {
            branches: Vec::new(),
            cond: Some(cond.to_string()),
        });
        return Ok(());
    }

    if let Some(cond) = block_condition(code, "elseif") {
        return next_branch(Some(cond.to_string()), nodes_stack, tag_stack);
    }

    if code == "else:" {
        return next_branch(None, nodes_stack, tag_stack);
    }

    if let Some(clause) = block_condition(code, "foreach") {
        let (collection, key, item) = parse_foreach(clause)?;
        nodes_stack.push(Vec::new());
        tag_stack.push(TagFrame::Foreach {
            collection,
            key,
            item,
        });
        return Ok(());
    }

    if code == "endif;" || code == "endforeach;" {
        let expects_if = code == "endif;";
        match tag_stack.pop() {
            Some(tag @ TagFrame::If { .. }) if expects_if => close_block(tag, nodes_stack),
            Some(tag @ TagFrame::Foreach { .. }) if !expects_if => close_block(tag, nodes_stack),
            _ => {
                return Err(OrionError::Execution(format!("unexpected `{}`", code)));
            }
        }
        return Ok(());
    }

    Err(OrionError::Execution(format!(
        "unsupported statement: <?php {} ?>",
        code
    )))
}

fn next_branch(
    cond: Option<String>,
    nodes_stack: &mut Vec<Vec<Node>>,
    tag_stack: &mut [TagFrame],
) -> Result<(), OrionError> {
    match tag_stack.last_mut() {
        Some(TagFrame::If {
            branches,
            cond: current_cond,
        }) => {
            let body = nodes_stack.pop().unwrap_or_default();
            branches.push((current_cond.take(), body));
            *current_cond = cond;
            nodes_stack.push(Vec::new());
            Ok(())
        }
        _ => Err(OrionError::Execution("`elseif`/`else` outside of `if`".to_string())),
    }
}

fn close_block(tag: TagFrame, nodes_stack: &mut Vec<Vec<Node>>) {
    let body = nodes_stack.pop().unwrap_or_default();
    let node = close_frame(tag, body);
    current(nodes_stack).push(node);
}

fn close_frame(tag: TagFrame, body: Vec<Node>) -> Node {
    match tag {
        TagFrame::If { mut branches, cond } => {
            branches.push((cond, body));
            Node::If { branches }
        }
        TagFrame::Foreach {
            collection,
            key,
            item,
        } => Node::Foreach {
            collection,
            key,
            item,
            body,
        },
    }
}

/// The innermost open node list. The root list is never popped while parsing.
fn current(nodes_stack: &mut Vec<Vec<Node>>) -> &mut Vec<Node> {
    if nodes_stack.is_empty() {
        nodes_stack.push(Vec::new());
    }
    let last = nodes_stack.len() - 1;
    &mut nodes_stack[last]
}

fn append_text(nodes: &mut Vec<Node>, text: &str) {
    if let Some(Node::Text(last_text)) = nodes.last_mut() {
        last_text.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}

/// `if ($x > 0):` with keyword `if` yields `$x > 0`.
fn block_condition<'a>(code: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = code.strip_prefix(keyword)?.trim_start();
    let inner = rest.strip_suffix(':')?.trim_end();
    inner.strip_prefix('(')?.strip_suffix(')').map(str::trim)
}

/// `escape($x)` with function `escape` yields `$x`.
fn strip_call<'a>(expr: &'a str, function: &str) -> Option<&'a str> {
    expr.strip_prefix(function)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_foreach(clause: &str) -> Result<(String, Option<String>, String), OrionError> {
    let (collection, binding) = clause
        .rsplit_once(" as ")
        .ok_or_else(|| OrionError::Execution(format!("malformed foreach: {}", clause)))?;
    let (key, item) = match binding.split_once("=>") {
        Some((k, v)) => (Some(variable_name(k)?), variable_name(v)?),
        None => (None, variable_name(binding)?),
    };
    Ok((collection.trim().to_string(), key, item))
}

fn variable_name(raw: &str) -> Result<String, OrionError> {
    raw.trim()
        .strip_prefix('$')
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| OrionError::Execution(format!("expected a variable, got `{}`", raw.trim())))
}
