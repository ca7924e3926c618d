// Tests for form and list literal parsing
use pretty_assertions::assert_eq;
use tagmeta_parser::{ast::*, parse_expression, parse_program};

#[test]
fn test_simple_form() {
    let expr = parse_expression("(at (list x0 x1) 1)").unwrap();

    match &expr.kind {
        ExpressionKind::Form(form) => {
            assert_eq!(form.head_name(), Some("at"));
            assert_eq!(form.arguments().len(), 2);

            match &form.arguments()[0].kind {
                ExpressionKind::Form(inner) => {
                    assert_eq!(inner.head_name(), Some("list"));
                    assert_eq!(inner.arguments().len(), 2);
                }
                _ => panic!("Expected nested form"),
            }

            match &form.arguments()[1].kind {
                ExpressionKind::Integer(lit) => assert_eq!(lit.value, 1),
                _ => panic!("Expected integer"),
            }
        }
        _ => panic!("Expected form"),
    }
}

#[test]
fn test_bracket_list() {
    let expr = parse_expression("[a b c]").unwrap();

    match &expr.kind {
        ExpressionKind::List(list) => {
            let names: Vec<&str> = list
                .elements
                .iter()
                .filter_map(|e| e.identifier_name())
                .collect();
            assert_eq!(names, vec!["a", "b", "c"]);
        }
        _ => panic!("Expected list literal"),
    }
}

#[test]
fn test_empty_form_and_list() {
    let program = parse_program("() []").unwrap();
    assert_eq!(program.items.len(), 2);

    match &program.items[0].kind {
        ExpressionKind::Form(form) => {
            assert!(form.elements.is_empty());
            assert_eq!(form.head_name(), None);
        }
        _ => panic!("Expected empty form"),
    }

    match &program.items[1].kind {
        ExpressionKind::List(list) => assert!(list.elements.is_empty()),
        _ => panic!("Expected empty list"),
    }
}

#[test]
fn test_program_with_comments_and_commas() {
    let source = r#"
        ; build a map
        (define m (map (pair k0 v0), (pair k1 v1)))
        (at m k0) ; lookup
    "#;

    let program = parse_program(source).unwrap();
    assert_eq!(program.items.len(), 2);
    assert_eq!(
        program.items[0].to_string(),
        "(define m (map (pair k0 v0) (pair k1 v1)))"
    );
    assert_eq!(program.items[1].to_string(), "(at m k0)");
}

#[test]
fn test_spans_cover_source() {
    let source = "(less 1 2)";
    let expr = parse_expression(source).unwrap();
    assert_eq!(expr.span, Span::new(0, source.len()));

    match &expr.kind {
        ExpressionKind::Form(form) => {
            assert_eq!(form.elements[1].span, Span::new(6, 7));
        }
        _ => panic!("Expected form"),
    }
}

#[test]
fn test_source_file_is_recorded() {
    let program =
        tagmeta_parser::parse_program_with_source("x", Some("demo.tm".to_string())).unwrap();
    assert_eq!(program.source_file.as_deref(), Some("demo.tm"));
}

#[test]
fn test_unbalanced_form_is_an_error() {
    let result = parse_program("(list a b");
    assert!(result.is_err(), "Unclosed form should not parse");

    match result.unwrap_err() {
        tagmeta_parser::ParseError::PestError { message, .. } => {
            assert!(message.contains("EXPECTED"), "message was: {message}");
        }
        other => panic!("Expected pest error, got {other:?}"),
    }
}
