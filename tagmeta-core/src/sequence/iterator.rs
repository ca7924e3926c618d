//! Iterator operations
//!
//! `next` and `deref` are per iterator datatype. `prior`, `advance` and
//! `distance` are registered per traversal category: the forward versions
//! step one position at a time, the random access versions jump.

use super::integer_argument;
use crate::engine::Engine;
use crate::error::{ElabResult, ElaborationError, RegistryError};
use crate::registry::{DispatchRegistry, TagPattern};
use crate::typeclass::{binary, unary};
use crate::types::{tags, IteratorValue, SequenceValue, Tag, Value};

fn indexed(iterator: &Value) -> Option<(&SequenceValue, usize)> {
    match iterator.as_iterator() {
        Some(IteratorValue::Indexed { sequence, position }) => Some((sequence, *position)),
        _ => None,
    }
}

fn indexed_next(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let iterator = unary("next", args)?;
    match indexed(iterator) {
        Some((sequence, position)) if position < sequence.len() => {
            Ok(IteratorValue::indexed(sequence.clone(), position + 1).into())
        }
        _ => Err(ElaborationError::NotIncrementable {
            iterator: iterator.to_string(),
        }),
    }
}

fn indexed_deref(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let iterator = unary("deref", args)?;
    match indexed(iterator) {
        Some((sequence, position)) if position < sequence.len() => {
            Ok(sequence.elements[position].clone())
        }
        _ => Err(ElaborationError::NotDereferenceable {
            iterator: iterator.to_string(),
        }),
    }
}

fn indexed_prior(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let iterator = unary("prior", args)?;
    match indexed(iterator) {
        Some((sequence, 0)) => Err(ElaborationError::IteratorOutOfRange {
            position: -1,
            length: sequence.len(),
        }),
        Some((sequence, position)) => {
            Ok(IteratorValue::indexed(sequence.clone(), position - 1).into())
        }
        None => Err(ElaborationError::type_mismatch(
            "prior",
            "an iterator with a known position",
            iterator,
        )),
    }
}

/// Register `next` and `deref` for an iterator datatype that indexes into its sequence
pub(crate) fn register_indexed(registry: &mut DispatchRegistry, iterator_tag: &Tag) -> Result<(), RegistryError> {
    let pattern = vec![TagPattern::exact(iterator_tag)];
    registry.register("next", pattern.clone(), format!("next@{iterator_tag}"), indexed_next)?;
    registry.register("deref", pattern, format!("deref@{iterator_tag}"), indexed_deref)?;
    Ok(())
}

fn step_limit(engine: &Engine, steps: u64) -> ElabResult<()> {
    let limit = engine.config().max_sequence_length;
    if steps > limit as u64 {
        Err(ElaborationError::SequenceTooLong { limit })
    } else {
        Ok(())
    }
}

fn step(engine: &mut Engine, operation: &str, iterator: Value, count: i64) -> ElabResult<Value> {
    step_limit(engine, count.unsigned_abs())?;
    let mut current = iterator;
    for _ in 0..count.unsigned_abs() {
        current = engine.call(operation, std::slice::from_ref(&current))?;
    }
    Ok(current)
}

fn forward_advance(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (iterator, distance) = binary("advance", args)?;
    let distance = integer_argument("advance", distance)?;
    if distance < 0 {
        return Err(ElaborationError::NegativeAdvance { distance });
    }
    step(engine, "next", iterator.clone(), distance)
}

fn bidirectional_advance(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (iterator, distance) = binary("advance", args)?;
    let distance = integer_argument("advance", distance)?;
    let operation = if distance < 0 { "prior" } else { "next" };
    step(engine, operation, iterator.clone(), distance)
}

fn random_access_advance(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (iterator, distance) = binary("advance", args)?;
    let Some((sequence, position)) = indexed(iterator) else {
        return bidirectional_advance(engine, args);
    };

    let distance = integer_argument("advance", distance)?;
    let target = (position as i64).saturating_add(distance);
    if target < 0 || target > sequence.len() as i64 {
        return Err(ElaborationError::IteratorOutOfRange {
            position: target,
            length: sequence.len(),
        });
    }
    Ok(IteratorValue::indexed(sequence.clone(), target as usize).into())
}

fn forward_distance(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (first, last) = binary("distance", args)?;
    let limit = engine.config().max_sequence_length;

    let mut current = first.clone();
    let mut steps: i64 = 0;
    while !engine.call_bool("equal", &[current.clone(), last.clone()])? {
        current = engine.call("next", std::slice::from_ref(&current))?;
        steps += 1;
        if steps as usize > limit {
            return Err(ElaborationError::SequenceTooLong { limit });
        }
    }
    Ok(Value::long(steps))
}

fn random_access_distance(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (first, last) = binary("distance", args)?;
    match (indexed(first), indexed(last)) {
        (Some((a, from)), Some((b, to))) if a == b => Ok(Value::long(to as i64 - from as i64)),
        _ => forward_distance(engine, args),
    }
}

pub fn register(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    let forward = TagPattern::exact(&tags::FORWARD_ITERATOR);
    let bidirectional = TagPattern::exact(&tags::BIDIRECTIONAL_ITERATOR);
    let random_access = TagPattern::exact(&tags::RANDOM_ACCESS_ITERATOR);
    let constant = TagPattern::exact(&tags::STATIC_CONSTANT);

    registry.register("prior", vec![bidirectional.clone()], "prior@bidirectional_iterator", indexed_prior)?;

    registry.register(
        "advance",
        vec![forward.clone(), constant.clone()],
        "advance@forward_iterator",
        forward_advance,
    )?;
    registry.register(
        "advance",
        vec![bidirectional, constant.clone()],
        "advance@bidirectional_iterator",
        bidirectional_advance,
    )?;
    registry.register(
        "advance",
        vec![random_access.clone(), constant],
        "advance@random_access_iterator",
        random_access_advance,
    )?;

    registry.register(
        "distance",
        vec![forward.clone(), forward],
        "distance@forward_iterator",
        forward_distance,
    )?;
    registry.register(
        "distance",
        vec![random_access.clone(), random_access],
        "distance@random_access_iterator",
        random_access_distance,
    )?;
    Ok(())
}
