//! `map`: an associative sequence of key/value pairs
//!
//! Keys are compared with `is_same`. Iteration visits pairs in insertion
//! order and is forward only.

use super::vector::{indexed_begin, indexed_end, stored, stored_length};
use crate::engine::Engine;
use crate::error::{ElabResult, ElaborationError, RegistryError};
use crate::registry::{DispatchRegistry, SequenceTraits, TagPattern};
use crate::sequence::iterator::register_indexed;
use crate::typeclass::binary;
use crate::types::tags::{self, TraversalCategory};
use crate::types::{SequenceKind, SequenceValue, Value};

/// Build a map from pair values
pub fn construct(args: &[Value]) -> ElabResult<Value> {
    if let Some(other) = args.iter().find(|arg| arg.as_pair().is_none()) {
        return Err(ElaborationError::type_mismatch("map", "a pair", other));
    }
    Ok(Value::sequence(SequenceKind::Map, args.to_vec()))
}

fn pair_argument<'v>(operation: &str, value: &'v Value) -> ElabResult<(&'v Value, &'v Value)> {
    value
        .as_pair()
        .ok_or_else(|| ElaborationError::type_mismatch(operation, "a pair", value))
}

fn key_of(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (_, element) = binary("key_of", args)?;
    Ok(pair_argument("key_of", element)?.0.clone())
}

fn value_of(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (_, element) = binary("value_of", args)?;
    Ok(pair_argument("value_of", element)?.1.clone())
}

/// Add a pair unless its key is already present
fn insert(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (map, element) = binary("insert", args)?;
    let map = stored("insert", map)?;
    pair_argument("insert", element)?;

    let mut elements = map.elements.to_vec();
    elements.push(element.clone());
    Ok(Value::Sequence(SequenceValue::from_elements(SequenceKind::Map, elements)))
}

/// Remove the pair with the given key, if any
fn erase_key(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (map, key) = binary("erase_key", args)?;
    let map = stored("erase_key", map)?;
    let elements = map
        .elements
        .iter()
        .filter(|element| element.pair_key() != Some(key))
        .cloned()
        .collect();
    Ok(Value::Sequence(SequenceValue::new(SequenceKind::Map, elements)))
}

pub fn register(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    registry.add_refinement(&tags::MAP, &tags::ASSOCIATIVE_SEQUENCE)?;
    registry.set_sequence_traits(
        &tags::MAP,
        SequenceTraits {
            has_o1_length: true,
            has_o1_unpack: false,
            is_finite: true,
        },
    );

    registry.add_refinement(&tags::MAP_ITERATOR, &tags::FORWARD_ITERATOR)?;
    register_indexed(registry, &tags::MAP_ITERATOR)?;

    let map = TagPattern::exact(&tags::MAP);
    let pair = TagPattern::exact(&tags::PAIR);

    registry.register("begin", vec![map.clone()], "begin@map", indexed_begin)?;
    registry.register("end", vec![map.clone()], "end@map", indexed_end)?;
    registry.register("length", vec![map.clone()], "length@map", stored_length)?;
    registry.register("key_of", vec![map.clone(), pair.clone()], "key_of@map", key_of)?;
    registry.register("value_of", vec![map.clone(), pair.clone()], "value_of@map", value_of)?;
    registry.register("insert", vec![map.clone(), pair], "insert@map", insert)?;
    registry.register("erase_key", vec![map, TagPattern::Any], "erase_key@map", erase_key)?;

    // Map iterators only move forward even though they index their map
    registry.set_traversal_category(&tags::MAP_ITERATOR, TraversalCategory::Forward);
    Ok(())
}
