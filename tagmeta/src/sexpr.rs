// S-expression formatter for the tagmeta AST
// Prints each node with its kind so the parse tree is visible at a glance

use tagmeta_parser::*;

pub fn format_program_as_sexpr(program: &Program) -> String {
    let items: Vec<String> = program
        .items
        .iter()
        .map(|item| format_expression_with_indent(item, 2))
        .collect();

    if items.is_empty() {
        "(program)".to_string()
    } else {
        format!("(program\n  {})", items.join("\n  "))
    }
}

fn format_expression_with_indent(expr: &Expression, indent: usize) -> String {
    match &expr.kind {
        ExpressionKind::Integer(lit) => format!("(integer {})", lit.value),
        ExpressionKind::Boolean(lit) => format!("(boolean {})", lit.value),
        ExpressionKind::Identifier(id) => format!("(identifier {})", id.name),
        ExpressionKind::Placeholder(p) => format!("(placeholder {})", p.index),
        ExpressionKind::Form(form) => format_children("form", &form.elements, indent),
        ExpressionKind::List(list) => format_children("list", &list.elements, indent),
    }
}

fn format_children(label: &str, children: &[Expression], indent: usize) -> String {
    let formatted: Vec<String> = children
        .iter()
        .map(|child| format_expression_with_indent(child, indent + 2))
        .collect();

    if formatted.is_empty() {
        return format!("({label})");
    }

    // Keep short nodes on one line
    let inline = format!("({label} {})", formatted.join(" "));
    if inline.len() <= 72 && !inline.contains('\n') {
        return inline;
    }

    let padding = " ".repeat(indent + 2);
    format!("({label}\n{padding}{})", formatted.join(&format!("\n{padding}")))
}
