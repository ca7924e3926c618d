//! Element access with `at`
//!
//! `at` picks its implementation from the traversal category of the
//! sequence: associative sequences are searched by key, everything else is
//! indexed by position using the cheapest traversal the category allows.

use super::algorithms::find_first;
use super::{integer_argument, is_cons};
use crate::engine::Engine;
use crate::error::{ElabResult, ElaborationError, RegistryError};
use crate::registry::{DispatchRegistry, TagPattern};
use crate::typeclass::binary;
use crate::types::{tags, TraversalCategory, Value};

fn at(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (sequence, selector, default) = match args {
        [sequence, selector] => (sequence, selector, None),
        [sequence, selector, default] => (sequence, selector, Some(default)),
        _ => return Err(ElaborationError::usage("at", "expected 2 or 3 operands")),
    };

    let category = engine
        .traversal_category_of(sequence)
        .ok_or_else(|| ElaborationError::UnknownTraversalCategory {
            sequence: sequence.to_string(),
        })?;

    match (category, default) {
        (TraversalCategory::Associative, default) => associative_at(engine, sequence, selector, default),
        (_, Some(_)) => Err(ElaborationError::usage(
            "at",
            "a default is only accepted when looking up a key in an associative sequence",
        )),
        (category, None) => {
            let index = integer_argument("at", selector)?;
            positional_at(engine, sequence, index, category)
        }
    }
}

/// The element at `key`, else `default`, else `KeyNotFound`
fn associative_at(
    engine: &mut Engine,
    sequence: &Value,
    key: &Value,
    default: Option<&Value>,
) -> ElabResult<Value> {
    let position = find_first(engine, sequence, |engine, element| {
        let element_key = engine.call("key_of", &[sequence.clone(), element.clone()])?;
        engine.call_bool("is_same", &[element_key, key.clone()])
    })?;

    let end = engine.call("end", std::slice::from_ref(sequence))?;
    if !engine.call_bool("equal", &[position.clone(), end])? {
        let element = engine.call("deref", &[position])?;
        return engine.call("value_of", &[sequence.clone(), element]);
    }

    default.cloned().ok_or_else(|| ElaborationError::KeyNotFound {
        key: key.to_string(),
    })
}

fn positional_at(
    engine: &mut Engine,
    sequence: &Value,
    index: i64,
    category: TraversalCategory,
) -> ElabResult<Value> {
    if index < 0 {
        return Err(ElaborationError::IndexOutOfBounds { index });
    }
    let limit = engine.config().max_sequence_length;
    if index as usize > limit {
        return Err(ElaborationError::SequenceTooLong { limit });
    }

    if is_cons(engine, sequence) {
        let mut remaining = sequence.clone();
        for _ in 0..index {
            if engine.call_bool("is_empty", std::slice::from_ref(&remaining))? {
                return Err(ElaborationError::IndexOutOfBounds { index });
            }
            remaining = engine.call("tail", std::slice::from_ref(&remaining))?;
        }
        if engine.call_bool("is_empty", std::slice::from_ref(&remaining))? {
            return Err(ElaborationError::IndexOutOfBounds { index });
        }
        return engine.call("head", &[remaining]);
    }

    let args = std::slice::from_ref(sequence);
    let begin = engine.call("begin", args)?;
    let end = engine.call("end", args)?;

    if category.is_random_access() {
        let length = engine.call("distance", &[begin.clone(), end])?;
        if index >= integer_argument("distance", &length)? {
            return Err(ElaborationError::IndexOutOfBounds { index });
        }
        let position = engine.call("advance", &[begin, Value::long(index)])?;
        return engine.call("deref", &[position]);
    }

    let mut current = begin;
    for _ in 0..index {
        if engine.call_bool("equal", &[current.clone(), end.clone()])? {
            return Err(ElaborationError::IndexOutOfBounds { index });
        }
        current = engine.call("next", std::slice::from_ref(&current))?;
    }
    if engine.call_bool("equal", &[current.clone(), end])? {
        return Err(ElaborationError::IndexOutOfBounds { index });
    }
    engine.call("deref", &[current])
}

fn has_key(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (sequence, key) = binary("has_key", args)?;
    let position = find_first(engine, sequence, |engine, element| {
        let element_key = engine.call("key_of", &[sequence.clone(), element.clone()])?;
        engine.call_bool("is_same", &[element_key, key.clone()])
    })?;
    let end = engine.call("end", std::slice::from_ref(sequence))?;
    Ok(Value::bool(!engine.call_bool("equal", &[position, end])?))
}

pub fn register(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    registry.register_usage(
        "at",
        vec![2, 3],
        "(at sequence index) or (at associative-sequence key [default])",
    );
    registry.register_default("at", 2, "at:by_category", at);
    registry.register_default("at", 3, "at:by_category", at);

    registry.register(
        "has_key",
        vec![TagPattern::exact(&tags::ASSOCIATIVE_SEQUENCE), TagPattern::Any],
        "has_key@associative_sequence",
        has_key,
    )?;
    Ok(())
}
