//! Iterator stepping, distances and traversal category limits

use crate::engine::Engine;
use crate::error::ElaborationError;
use crate::types::Value;
use pretty_assertions::assert_eq;

fn letters() -> Vec<Value> {
    ["a", "b", "c", "d"].into_iter().map(Value::opaque).collect()
}

fn bounds(engine: &mut Engine, sequence: &Value) -> (Value, Value) {
    let args = std::slice::from_ref(sequence);
    (engine.call("begin", args).unwrap(), engine.call("end", args).unwrap())
}

#[test]
fn test_random_access_iterators_jump() {
    let mut engine = Engine::new();
    let vector = Value::vector(letters());
    let (begin, end) = bounds(&mut engine, &vector);

    let third = engine.call("advance", &[begin.clone(), Value::int(2)]).unwrap();
    assert_eq!(engine.call("deref", &[third.clone()]).unwrap(), Value::opaque("c"));

    let back = engine.call("advance", &[third, Value::int(-2)]).unwrap();
    assert_eq!(back, begin);

    assert_eq!(engine.call("distance", &[begin.clone(), end.clone()]).unwrap(), Value::long(4));
    assert_eq!(engine.call("distance", &[end.clone(), begin.clone()]).unwrap(), Value::long(-4));

    let last = engine.call("prior", &[end]).unwrap();
    assert_eq!(engine.call("deref", &[last]).unwrap(), Value::opaque("d"));

    assert_eq!(
        engine.call("advance", &[begin, Value::int(5)]),
        Err(ElaborationError::IteratorOutOfRange {
            position: 5,
            length: 4
        })
    );
}

#[test]
fn test_huge_jumps_are_out_of_range() {
    let mut engine = Engine::new();
    let vector = Value::vector(letters());
    let (begin, _) = bounds(&mut engine, &vector);
    let second = engine.call("next", &[begin.clone()]).unwrap();

    assert_eq!(
        engine.call("advance", &[second, Value::long(i64::MAX)]),
        Err(ElaborationError::IteratorOutOfRange {
            position: i64::MAX,
            length: 4
        })
    );
    assert!(matches!(
        engine.call("advance", &[begin, Value::long(i64::MIN)]),
        Err(ElaborationError::IteratorOutOfRange { .. })
    ));
}

#[test]
fn test_forward_iterators_step() {
    let mut engine = Engine::new();
    let sequence = Value::minimal_sequence(letters());
    let (begin, end) = bounds(&mut engine, &sequence);

    let third = engine.call("advance", &[begin.clone(), Value::int(2)]).unwrap();
    assert_eq!(engine.call("deref", &[third.clone()]).unwrap(), Value::opaque("c"));
    assert_eq!(engine.call("distance", &[begin.clone(), end.clone()]).unwrap(), Value::long(4));
    assert_eq!(engine.call("distance", &[third, end.clone()]).unwrap(), Value::long(2));

    assert_eq!(
        engine.call("advance", &[begin.clone(), Value::int(-1)]),
        Err(ElaborationError::NegativeAdvance { distance: -1 })
    );

    // Cons cursors cannot move backwards
    assert!(matches!(
        engine.call("prior", &[begin]),
        Err(ElaborationError::NoImplementation { .. })
    ));
}

#[test]
fn test_past_the_end_iterators() {
    let mut engine = Engine::new();

    for sequence in [Value::vector(letters()), Value::list(letters())] {
        let (_, end) = bounds(&mut engine, &sequence);
        assert!(matches!(
            engine.call("deref", &[end.clone()]),
            Err(ElaborationError::NotDereferenceable { .. })
        ));
        assert!(matches!(
            engine.call("next", &[end]),
            Err(ElaborationError::NotIncrementable { .. })
        ));
    }
}

#[test]
fn test_map_iterators_are_forward_only() {
    let mut engine = Engine::new();
    let map = Value::map(vec![(Value::opaque("k"), Value::opaque("v"))]);
    let (begin, end) = bounds(&mut engine, &map);

    assert_eq!(
        engine.call("deref", &[begin.clone()]).unwrap(),
        Value::pair(Value::opaque("k"), Value::opaque("v"))
    );
    assert_eq!(engine.call("distance", &[begin, end.clone()]).unwrap(), Value::long(1));
    assert!(matches!(
        engine.call("prior", &[end]),
        Err(ElaborationError::NoImplementation { .. })
    ));
}

#[test]
fn test_empty_cons_sequence_begins_at_its_end() {
    let mut engine = Engine::new();
    let (begin, end) = bounds(&mut engine, &Value::list(vec![]));
    assert_eq!(begin, end);
}
