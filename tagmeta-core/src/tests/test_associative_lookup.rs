//! `at` over associative and positional sequences

use crate::engine::Engine;
use crate::error::ElaborationError;
use crate::types::Value;
use pretty_assertions::assert_eq;

fn sample_map() -> Value {
    Value::map(vec![
        (Value::opaque("k0"), Value::opaque("v0")),
        (Value::opaque("k1"), Value::opaque("v1")),
    ])
}

#[test]
fn test_lookup_by_key() {
    let mut engine = Engine::new();
    let map = sample_map();

    assert_eq!(
        engine.call("at", &[map.clone(), Value::opaque("k0")]).unwrap(),
        Value::opaque("v0")
    );
    assert_eq!(
        engine.call("at", &[map, Value::opaque("k1")]).unwrap(),
        Value::opaque("v1")
    );
}

#[test]
fn test_missing_key_uses_default() {
    let mut engine = Engine::new();
    let result = engine
        .call("at", &[sample_map(), Value::opaque("missing"), Value::opaque("fallback")])
        .unwrap();
    assert_eq!(result, Value::opaque("fallback"));

    // A present key ignores the default
    let result = engine
        .call("at", &[sample_map(), Value::opaque("k1"), Value::opaque("fallback")])
        .unwrap();
    assert_eq!(result, Value::opaque("v1"));
}

#[test]
fn test_missing_key_without_default_fails() {
    let mut engine = Engine::new();
    assert_eq!(
        engine.call("at", &[sample_map(), Value::opaque("missing")]),
        Err(ElaborationError::KeyNotFound {
            key: "missing".to_string()
        })
    );
}

#[test]
fn test_at_rejects_wrong_operand_counts() {
    let mut engine = Engine::new();
    let map = sample_map();
    let key = Value::opaque("k0");

    for args in [
        vec![map.clone()],
        vec![map.clone(), key.clone(), key.clone(), key.clone()],
    ] {
        assert!(matches!(engine.call("at", &args), Err(ElaborationError::Usage { .. })));
    }

    // Defaults only make sense for key lookup
    let vector = Value::vector(vec![Value::int(1)]);
    assert!(matches!(
        engine.call("at", &[vector, Value::int(0), Value::int(5)]),
        Err(ElaborationError::Usage { .. })
    ));
}

#[test]
fn test_at_needs_a_traversal_category() {
    let mut engine = Engine::new();
    assert_eq!(
        engine.call("at", &[Value::opaque("x"), Value::int(0)]),
        Err(ElaborationError::UnknownTraversalCategory {
            sequence: "x".to_string()
        })
    );
}

#[test]
fn test_positional_at_by_category() {
    let mut engine = Engine::new();
    let elements = vec![Value::int(10), Value::int(20), Value::int(30)];

    for sequence in [
        Value::list(elements.clone()),
        Value::vector(elements.clone()),
        Value::minimal_sequence(elements.clone()),
    ] {
        for (index, expected) in elements.iter().enumerate() {
            let found = engine
                .call("at", &[sequence.clone(), Value::size_t(index)])
                .unwrap();
            assert_eq!(&found, expected);
        }
        assert_eq!(
            engine.call("at", &[sequence, Value::int(3)]),
            Err(ElaborationError::IndexOutOfBounds { index: 3 })
        );
    }
}

#[test]
fn test_map_insert_keeps_existing_key() {
    let mut engine = Engine::new();
    let map = sample_map();

    let inserted = engine
        .call("insert", &[map.clone(), Value::pair(Value::opaque("k2"), Value::opaque("v2"))])
        .unwrap();
    assert_eq!(
        engine.call("at", &[inserted.clone(), Value::opaque("k2")]).unwrap(),
        Value::opaque("v2")
    );
    assert_eq!(engine.call("length", &[inserted]).unwrap(), Value::size_t(3));

    let unchanged = engine
        .call("insert", &[map.clone(), Value::pair(Value::opaque("k0"), Value::opaque("other"))])
        .unwrap();
    assert_eq!(unchanged, map);
}

#[test]
fn test_has_key_and_erase_key() {
    let mut engine = Engine::new();
    let map = sample_map();

    assert!(engine.call_bool("has_key", &[map.clone(), Value::opaque("k1")]).unwrap());
    assert!(!engine.call_bool("has_key", &[map.clone(), Value::opaque("k9")]).unwrap());

    let erased = engine.call("erase_key", &[map, Value::opaque("k0")]).unwrap();
    assert!(!engine.call_bool("has_key", &[erased.clone(), Value::opaque("k0")]).unwrap());
    assert_eq!(engine.call("length", &[erased]).unwrap(), Value::size_t(1));
}
