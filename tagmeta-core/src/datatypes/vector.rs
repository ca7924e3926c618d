//! `vector`: a random access sequence implementing the iterator interface

use crate::engine::Engine;
use crate::error::{ElabResult, ElaborationError, RegistryError};
use crate::registry::{DispatchRegistry, SequenceTraits, TagPattern};
use crate::sequence::{self, iterator::register_indexed};
use crate::typeclass::unary;
use crate::types::tags::{self, TraversalCategory};
use crate::types::{IteratorValue, SequenceValue, Value};

/// The stored elements of a built-in sequence datatype
pub(crate) fn stored<'v>(operation: &str, value: &'v Value) -> ElabResult<&'v SequenceValue> {
    value
        .as_sequence()
        .ok_or_else(|| ElaborationError::type_mismatch(operation, "a built-in sequence", value))
}

/// `begin` over a sequence's stored elements
pub(crate) fn indexed_begin(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let sequence = stored("begin", unary("begin", args)?)?;
    Ok(IteratorValue::indexed(sequence.clone(), 0).into())
}

pub(crate) fn indexed_end(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let sequence = stored("end", unary("end", args)?)?;
    Ok(IteratorValue::indexed(sequence.clone(), sequence.len()).into())
}

pub(crate) fn stored_length(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let sequence = stored("length", unary("length", args)?)?;
    Ok(Value::size_t(sequence.len()))
}

fn insert_range(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let [vector, position, range] = args else {
        return Err(ElaborationError::usage(
            "insert_range",
            "expected a vector, an iterator into it and a range",
        ));
    };
    let target = stored("insert_range", vector)?;

    let offset = match position.as_iterator() {
        Some(IteratorValue::Indexed { sequence, position }) if sequence == target => *position,
        _ => {
            return Err(ElaborationError::type_mismatch(
                "insert_range",
                format!("an iterator into {vector}"),
                position,
            ))
        }
    };

    let inserted = sequence::elements(engine, "insert_range", range)?;
    let mut elements = target.elements.to_vec();
    elements.splice(offset..offset, inserted);
    Ok(Value::vector(elements))
}

pub fn register(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    registry.add_refinement(&tags::VECTOR, &tags::RANDOM_ACCESS_SEQUENCE)?;
    registry.set_sequence_traits(
        &tags::VECTOR,
        SequenceTraits {
            has_o1_length: true,
            has_o1_unpack: false,
            is_finite: true,
        },
    );

    registry.add_refinement(&tags::VECTOR_ITERATOR, &tags::RANDOM_ACCESS_ITERATOR)?;
    registry.set_traversal_category(&tags::VECTOR_ITERATOR, TraversalCategory::RandomAccess);
    register_indexed(registry, &tags::VECTOR_ITERATOR)?;

    let vector = TagPattern::exact(&tags::VECTOR);
    registry.register("begin", vec![vector.clone()], "begin@vector", indexed_begin)?;
    registry.register("end", vec![vector.clone()], "end@vector", indexed_end)?;
    registry.register("length", vec![vector.clone()], "length@vector", stored_length)?;
    registry.register(
        "insert_range",
        vec![
            vector,
            TagPattern::exact(&tags::VECTOR_ITERATOR),
            TagPattern::exact(&tags::SEQUENCE),
        ],
        "insert_range@vector",
        insert_range,
    )?;
    Ok(())
}
