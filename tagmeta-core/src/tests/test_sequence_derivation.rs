//! Generic sequence operations derived from the minimal interfaces

use crate::engine::Engine;
use crate::error::ElaborationError;
use crate::registry::TagPattern;
use crate::types::{tags, Value};
use pretty_assertions::assert_eq;

fn opaque_elements(count: usize) -> Vec<Value> {
    (0..count).map(|i| Value::opaque(format!("x{i}"))).collect()
}

#[test]
fn test_minimal_sequence_round_trip() {
    let mut engine = Engine::new();

    for n in 0..5 {
        let elements = opaque_elements(n);
        let sequence = Value::minimal_sequence(elements.clone());
        let args = std::slice::from_ref(&sequence);

        assert_eq!(engine.call("length", args).unwrap(), Value::size_t(n));
        assert_eq!(engine.call("is_empty", args).unwrap(), Value::bool(n == 0));

        for (k, element) in elements.iter().enumerate() {
            let at = engine.call("at_c", &[sequence.clone(), Value::int(k as i64)]).unwrap();
            assert_eq!(&at, element);
        }

        for k in [-1, n as i64] {
            assert_eq!(
                engine.call("at_c", &[sequence.clone(), Value::int(k)]),
                Err(ElaborationError::IndexOutOfBounds { index: k })
            );
        }

        match elements.last() {
            Some(last) => assert_eq!(&engine.call("last", args).unwrap(), last),
            None => assert_eq!(
                engine.call("last", args),
                Err(ElaborationError::EmptySequence {
                    operation: "last".to_string()
                })
            ),
        }
    }
}

#[test]
fn test_iterator_sequence_gets_cons_interface() {
    let mut engine = Engine::new();
    let vector = Value::vector(opaque_elements(3));
    let args = std::slice::from_ref(&vector);

    assert_eq!(engine.call("head", args).unwrap(), Value::opaque("x0"));
    assert_eq!(
        engine.call("tail", args).unwrap(),
        Value::vector(vec![Value::opaque("x1"), Value::opaque("x2")])
    );
    assert_eq!(engine.call("is_empty", args).unwrap(), Value::bool(false));
    assert_eq!(
        engine.call("head", &[Value::vector(vec![])]),
        Err(ElaborationError::EmptySequence {
            operation: "head".to_string()
        })
    );
}

#[test]
fn test_push_back_onto_five_element_list() {
    let mut engine = Engine::new();
    let original = opaque_elements(5);
    let appended = Value::opaque("x5");

    for sequence in [Value::list(original.clone()), Value::minimal_sequence(original.clone())] {
        let result = engine.call("push_back", &[sequence, appended.clone()]).unwrap();
        let args = std::slice::from_ref(&result);

        assert_eq!(engine.call("length", args).unwrap(), Value::size_t(6));
        assert_eq!(engine.call("last", args).unwrap(), appended);
        for (k, element) in original.iter().enumerate() {
            let at = engine.call("at_c", &[result.clone(), Value::int(k as i64)]).unwrap();
            assert_eq!(&at, element);
        }
    }
}

#[test]
fn test_push_front_keeps_datatype() {
    let mut engine = Engine::new();
    let vector = Value::vector(vec![Value::int(2), Value::int(3)]);
    let result = engine.call("push_front", &[vector, Value::int(1)]).unwrap();
    assert_eq!(result, Value::vector(vec![Value::int(1), Value::int(2), Value::int(3)]));
}

#[test]
fn test_list_unpack_uses_its_own_entry() {
    let mut engine = Engine::new();

    // Make the generic derivation unusable
    engine.registry_mut().replace(
        "unpack",
        vec![TagPattern::exact(&tags::SEQUENCE), TagPattern::Any],
        "unpack@sequence",
        |_, _| {
            Err(ElaborationError::AssertionFailed {
                message: "generic unpack reached".to_string(),
            })
        },
    );

    let elements = opaque_elements(3);
    let result = engine
        .call("unpack", &[Value::list(elements.clone()), Value::quote("vector")])
        .unwrap();
    assert_eq!(result, Value::vector(elements.clone()));

    // Datatypes without an override do reach the generic entry
    let result = engine.call("unpack", &[Value::vector(elements), Value::quote("list")]);
    assert!(matches!(result, Err(ElaborationError::AssertionFailed { .. })));
}

#[test]
fn test_generic_unpack_applies_elements() {
    let mut engine = Engine::new();
    let sequence = Value::minimal_sequence(vec![Value::int(4), Value::int(5)]);
    let result = engine.call("unpack", &[sequence, Value::quote("plus")]).unwrap();
    assert_eq!(result, Value::int(9));
}

#[test]
fn test_find_if_returns_iterator_to_match() {
    let mut engine = Engine::new();
    let vector = Value::vector(vec![Value::int(1), Value::int(5), Value::int(7)]);
    let program = "(lambda (greater _1 4))";
    let predicate = engine.evaluate_source(program).unwrap().remove(0);

    let found = engine.call("find_if", &[vector.clone(), predicate]).unwrap();
    assert_eq!(engine.call("deref", &[found]).unwrap(), Value::int(5));

    let never = engine.evaluate_source("(lambda false)").unwrap().remove(0);
    let found = engine.call("find_if", &[vector.clone(), never]).unwrap();
    let end = engine.call("end", &[vector]).unwrap();
    assert_eq!(found, end);
}

#[test]
fn test_insert_at_position() {
    let mut engine = Engine::new();
    let numbers = vec![Value::int(1), Value::int(2), Value::int(3)];

    for sequence in [Value::vector(numbers.clone()), Value::minimal_sequence(numbers.clone())] {
        let begin = engine.call("begin", std::slice::from_ref(&sequence)).unwrap();
        let position = engine.call("advance", &[begin, Value::int(1)]).unwrap();
        let result = engine
            .call("insert", &[sequence.clone(), position, Value::int(9)])
            .unwrap();

        let elements = crate::sequence::elements(&mut engine, "insert", &result).unwrap();
        assert_eq!(
            elements,
            vec![Value::int(1), Value::int(9), Value::int(2), Value::int(3)]
        );
        assert_eq!(result.tag(), sequence.tag());
    }
}

#[test]
fn test_sequence_traits() {
    let mut engine = Engine::new();
    let list = Value::list(vec![]);
    let vector = Value::vector(vec![]);
    let minimal = Value::minimal_sequence(vec![]);

    assert_eq!(engine.call("has_O1_unpack", &[list]).unwrap(), Value::bool(true));
    assert_eq!(engine.call("has_O1_unpack", &[vector.clone()]).unwrap(), Value::bool(false));
    assert_eq!(engine.call("has_O1_length", &[vector]).unwrap(), Value::bool(true));
    assert_eq!(engine.call("has_O1_length", &[minimal.clone()]).unwrap(), Value::bool(false));
    assert_eq!(engine.call("is_finite", &[minimal]).unwrap(), Value::bool(true));
}

#[test]
fn test_non_sequence_has_neither_interface() {
    let mut engine = Engine::new();
    let result = engine.call("length", &[Value::opaque("x")]);
    assert!(matches!(result, Err(ElaborationError::NoImplementation { .. })));
}
