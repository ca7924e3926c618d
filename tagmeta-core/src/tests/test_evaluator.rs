//! Meta-language programs evaluated end to end

use crate::engine::Engine;
use crate::error::{ElaborationError, TagmetaError};
use crate::types::{Tag, Value};
use miette::Diagnostic;
use pretty_assertions::assert_eq;

fn evaluate(source: &str) -> Vec<Value> {
    let mut engine = Engine::new();
    match engine.evaluate_source(source) {
        Ok(values) => values,
        Err(error) => panic!("Evaluation failed: {error:?}"),
    }
}

fn failure(source: &str) -> ElaborationError {
    let mut engine = Engine::new();
    let error = engine.evaluate_source(source).unwrap_err();
    error
        .elaboration()
        .cloned()
        .unwrap_or_else(|| panic!("Expected an elaboration error, got {error:?}"))
}

#[test]
fn test_every_top_level_form_yields_a_value() {
    let values = evaluate(
        r#"
        (define xs [1 2 3])
        (length xs)
        (at xs 1)
        (less_equal 2 3)
        "#,
    );

    assert_eq!(
        values,
        vec![
            Value::list(vec![Value::int(1), Value::int(2), Value::int(3)]),
            Value::size_t(3),
            Value::int(2),
            Value::bool(true),
        ]
    );
}

#[test]
fn test_constructors_and_assertions() {
    let values = evaluate(
        r#"
        ; maps are looked up by key
        (define m (map (pair a 1) (pair b 2)))
        (assert_same (at m b) 2)
        (assert_same (at m c 0) 0)
        (assert_fails (at m c))
        (assert (is_same (size_t 3) (length (vector x y z))))
        (assert_same (push_back (vector 1 2) 3) (vector 1 2 3))
        "#,
    );
    assert_eq!(values.last(), Some(&Value::bool(true)));
}

#[test]
fn test_lambdas_and_quoted_operations() {
    let values = evaluate(
        r#"
        (define positive (lambda (greater _1 0)))
        (positive 5)
        (deref (find_if (vector -2 -1 4 7) positive))
        (unpack [3 4] (quote plus))
        (apply (quote vector) a b)
        ((lambda (minus _2 _1)) 1 10)
        "#,
    );

    assert_eq!(
        values[1..],
        [
            Value::bool(true),
            Value::int(4),
            Value::int(7),
            Value::vector(vec![Value::opaque("a"), Value::opaque("b")]),
            Value::int(9),
        ]
    );
}

#[test]
fn test_user_tags_dispatch() {
    let values = evaluate(
        r#"
        (deftag stack sequence)
        (tag_of (tagged s stack))
        (class_of (tagged s stack))
        "#,
    );
    assert_eq!(values[1], Value::Tag(Tag::new("stack")));
    assert_eq!(values[2], Value::Tag(Tag::new("Sequence")));
}

#[test]
fn test_common_datatype_declaration_and_query() {
    let values = evaluate(
        r#"
        (common_datatype feet meters meters)
        (common_datatype meters feet)
        (common_datatype meters kelvin)
        "#,
    );
    assert_eq!(values[1], Value::Tag(Tag::new("meters")));
    assert_eq!(values[2], Value::Tag(Tag::new("no_tag")));
}

#[test]
fn test_unbound_symbols_are_opaque_types() {
    assert_eq!(evaluate("widget"), vec![Value::opaque("widget")]);
    assert_eq!(evaluate("(pair a b)"), vec![Value::pair(Value::opaque("a"), Value::opaque("b"))]);
}

#[test]
fn test_elaboration_errors() {
    assert_eq!(failure("undefined"), ElaborationError::UndefinedEvaluated);
    assert_eq!(failure("_1"), ElaborationError::UnboundPlaceholder { index: 1 });
    assert_eq!(
        failure("(frobnicate 1)"),
        ElaborationError::UnknownOperation {
            name: "frobnicate".to_string()
        }
    );
    assert_eq!(
        failure("(quote frobnicate)"),
        ElaborationError::UnknownOperation {
            name: "frobnicate".to_string()
        }
    );
    assert!(matches!(
        failure("(assert (less 3 2))"),
        ElaborationError::AssertionFailed { .. }
    ));
    assert!(matches!(
        failure("(assert_fails (plus 1 2))"),
        ElaborationError::AssertionFailed { .. }
    ));
    assert!(matches!(failure("(deftag a b) (deftag b a)"), ElaborationError::Registry(_)));
    assert!(matches!(failure("(if_ true 1)"), ElaborationError::Usage { .. }));
}

#[test]
fn test_error_points_at_failing_form() {
    let mut engine = Engine::new();
    let source = "(length [a b])\n(at [1 2] 5)";
    let error = engine.evaluate_source(source).unwrap_err();

    match &error {
        TagmetaError::Elaboration { span, source, .. } => {
            assert_eq!(span.offset(), 15);
            assert_eq!(span.len(), 12);
            assert_eq!(source, &ElaborationError::IndexOutOfBounds { index: 5 });
        }
        other => panic!("Expected an elaboration error, got {other:?}"),
    }
    assert_eq!(
        error.code().map(|code| code.to_string()),
        Some("tagmeta::elaborate::failed".to_string())
    );
}

#[test]
fn test_parse_errors_are_reported() {
    let mut engine = Engine::new();
    let error = engine.evaluate_source("(length [a b)").unwrap_err();
    assert!(matches!(error, TagmetaError::Parse(_)));
}

#[test]
fn test_bindings_survive_a_failing_form() {
    let mut engine = Engine::new();
    assert!(engine.evaluate_source("(define n 4) undefined").is_err());
    assert_eq!(engine.lookup("n"), Some(&Value::int(4)));
}
