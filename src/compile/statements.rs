use crate::compile::scan::{self, ArgMode};

/// Function the host provides to print the CSRF token field.
pub const CSRF_FUNCTION: &str = "csrfDirective";

/// One built-in directive and the host syntax it becomes.
struct Rule {
    name: &'static str,
    args: ArgMode,
    render: fn(&str) -> String,
}

/// Applied top to bottom, each as a single pass over the text.
const RULES: &[Rule] = &[
    Rule {
        name: "if",
        args: ArgMode::Required,
        render: |c| format!("<?php if ({}): ?>", c),
    },
    Rule {
        name: "elseif",
        args: ArgMode::Required,
        render: |c| format!("<?php elseif ({}): ?>", c),
    },
    Rule {
        name: "else",
        args: ArgMode::None,
        render: |_| "<?php else: ?>".to_string(),
    },
    Rule {
        name: "endif",
        args: ArgMode::None,
        render: |_| "<?php endif; ?>".to_string(),
    },
    Rule {
        name: "foreach",
        args: ArgMode::Required,
        render: |c| format!("<?php foreach ({}): ?>", c),
    },
    Rule {
        name: "endforeach",
        args: ArgMode::None,
        render: |_| "<?php endforeach; ?>".to_string(),
    },
    Rule {
        name: "php",
        args: ArgMode::None,
        render: |_| "<?php ".to_string(),
    },
    Rule {
        name: "endphp",
        args: ArgMode::None,
        render: |_| " ?>".to_string(),
    },
    Rule {
        name: "csrf",
        args: ArgMode::None,
        render: |_| format!("<?php echo {}(); ?>", CSRF_FUNCTION),
    },
    Rule {
        name: "for",
        args: ArgMode::Required,
        render: |c| format!("<?php for ({}): ?>", c),
    },
    Rule {
        name: "endfor",
        args: ArgMode::None,
        render: |_| "<?php endfor; ?>".to_string(),
    },
    Rule {
        name: "break",
        args: ArgMode::None,
        render: |_| "<?php break; ?>".to_string(),
    },
    Rule {
        name: "while",
        args: ArgMode::Required,
        render: |c| format!("<?php while ({}): ?>", c),
    },
    Rule {
        name: "endwhile",
        args: ArgMode::None,
        render: |_| "<?php endwhile; ?>".to_string(),
    },
    Rule {
        name: "dowhile",
        args: ArgMode::None,
        render: |_| "<?php do { ?>".to_string(),
    },
    Rule {
        name: "enddowhile",
        args: ArgMode::Required,
        render: |c| format!("<?php }} while ({}); ?>", c),
    },
];

/// Rewrites the built-in control-flow directives into host syntax.
///
/// Conditions are copied through verbatim.
pub fn compile_statements(content: &str) -> String {
    RULES.iter().fold(content.to_string(), |content, rule| {
        scan::rewrite(&content, rule.name, rule.args, |args| {
            Some((rule.render)(args.unwrap_or_default()))
        })
    })
}
