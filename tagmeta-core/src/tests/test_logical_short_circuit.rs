//! Short-circuit laws for `and_`, `or_`, `if_` and chained comparisons

use crate::engine::Engine;
use crate::error::ElaborationError;
use crate::types::Value;
use pretty_assertions::assert_eq;

fn evaluate(source: &str) -> Result<Value, ElaborationError> {
    let mut engine = Engine::new();
    match engine.evaluate_source(source) {
        Ok(mut values) => Ok(values.pop().unwrap()),
        Err(error) => Err(error.elaboration().cloned().unwrap()),
    }
}

#[test]
fn test_and_stops_at_first_false_operand() {
    assert_eq!(evaluate("(and_ false undefined)").unwrap(), Value::bool(false));
    assert_eq!(evaluate("(and_ true 0 undefined)").unwrap(), Value::bool(false));
}

#[test]
fn test_or_stops_at_first_true_operand() {
    assert_eq!(evaluate("(or_ true undefined)").unwrap(), Value::bool(true));
    assert_eq!(evaluate("(or_ false 3 undefined)").unwrap(), Value::bool(true));
}

#[test]
fn test_undefined_is_reached_when_not_short_circuited() {
    assert_eq!(
        evaluate("(and_ true undefined)"),
        Err(ElaborationError::UndefinedEvaluated)
    );
    assert_eq!(
        evaluate("(or_ false undefined)"),
        Err(ElaborationError::UndefinedEvaluated)
    );
}

#[test]
fn test_variadic_identities() {
    assert_eq!(evaluate("(and_)").unwrap(), Value::bool(true));
    assert_eq!(evaluate("(or_)").unwrap(), Value::bool(false));
}

#[test]
fn test_operands_must_be_boolean_convertible() {
    assert!(matches!(
        evaluate("(and_ x)"),
        Err(ElaborationError::NotABooleanConstant { .. })
    ));
}

#[test]
fn test_if_elaborates_only_the_chosen_branch() {
    assert_eq!(evaluate("(if_ (less 1 2) 10 undefined)").unwrap(), Value::int(10));
    assert_eq!(evaluate("(if_ false undefined 20)").unwrap(), Value::int(20));
}

#[test]
fn test_chained_comparisons() {
    assert_eq!(evaluate("(less 1 2 3)").unwrap(), Value::bool(true));
    assert_eq!(evaluate("(less 1 3 2)").unwrap(), Value::bool(false));
    assert_eq!(evaluate("(equal 2 2 2 2)").unwrap(), Value::bool(true));
    // The first false link ends the chain
    assert_eq!(evaluate("(greater 1 2 undefined)").unwrap(), Value::bool(false));
}

#[test]
fn test_quoted_and_applies_to_values() {
    let mut engine = Engine::new();
    let and = Value::quote("and_");
    assert_eq!(engine.apply(&and, &[]).unwrap(), Value::bool(true));
    assert_eq!(
        engine.apply(&and, &[Value::bool(true), Value::int(0)]).unwrap(),
        Value::bool(false)
    );
}
