//! `list`: the cons interface plus constant-time overrides
//!
//! Lists know their elements up front, so `length`, `at`, `last` and
//! `unpack` skip the generic traversal.

use crate::engine::Engine;
use crate::error::{ElabResult, ElaborationError, RegistryError};
use crate::registry::{DispatchRegistry, SequenceTraits, TagPattern};
use crate::sequence::integer_argument;
use crate::typeclass::{binary, unary};
use crate::types::tags::{self, TraversalCategory};
use crate::types::{SequenceValue, Value};

fn list_argument<'v>(operation: &str, value: &'v Value) -> ElabResult<&'v SequenceValue> {
    value
        .as_sequence()
        .ok_or_else(|| ElaborationError::type_mismatch(operation, "a sequence", value))
}

/// `head` over a sequence's stored elements
pub(crate) fn cons_head(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let sequence = list_argument("head", unary("head", args)?)?;
    sequence
        .elements
        .first()
        .cloned()
        .ok_or_else(|| ElaborationError::EmptySequence {
            operation: "head".to_string(),
        })
}

pub(crate) fn cons_tail(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let sequence = list_argument("tail", unary("tail", args)?)?;
    if sequence.is_empty() {
        return Err(ElaborationError::EmptySequence {
            operation: "tail".to_string(),
        });
    }
    Ok(Value::Sequence(sequence.rest()))
}

pub(crate) fn cons_is_empty(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let sequence = list_argument("is_empty", unary("is_empty", args)?)?;
    Ok(Value::bool(sequence.is_empty()))
}

fn length(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let list = list_argument("length", unary("length", args)?)?;
    Ok(Value::size_t(list.len()))
}

fn at(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (list, index) = binary("at", args)?;
    let list = list_argument("at", list)?;
    let index = integer_argument("at", index)?;
    usize::try_from(index)
        .ok()
        .and_then(|i| list.elements.get(i))
        .cloned()
        .ok_or(ElaborationError::IndexOutOfBounds { index })
}

fn last(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let list = list_argument("last", unary("last", args)?)?;
    list.elements
        .last()
        .cloned()
        .ok_or_else(|| ElaborationError::EmptySequence {
            operation: "last".to_string(),
        })
}

fn unpack(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (list, function) = binary("unpack", args)?;
    let list = list_argument("unpack", list)?;
    engine.apply(function, &list.elements)
}

fn push_back(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (list, element) = binary("push_back", args)?;
    let list = list_argument("push_back", list)?;
    let mut elements = list.elements.to_vec();
    elements.push(element.clone());
    Ok(Value::list(elements))
}

fn push_front(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (list, element) = binary("push_front", args)?;
    let list = list_argument("push_front", list)?;
    let mut elements = Vec::with_capacity(list.len() + 1);
    elements.push(element.clone());
    elements.extend(list.elements.iter().cloned());
    Ok(Value::list(elements))
}

pub fn register(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    registry.add_refinement(&tags::LIST, &tags::SEQUENCE)?;
    registry.set_traversal_category(&tags::LIST, TraversalCategory::Forward);
    registry.set_sequence_traits(
        &tags::LIST,
        SequenceTraits {
            has_o1_length: true,
            has_o1_unpack: true,
            is_finite: true,
        },
    );

    let list = TagPattern::exact(&tags::LIST);
    let constant = TagPattern::exact(&tags::STATIC_CONSTANT);

    registry.register("head", vec![list.clone()], "head@list", cons_head)?;
    registry.register("tail", vec![list.clone()], "tail@list", cons_tail)?;
    registry.register("is_empty", vec![list.clone()], "is_empty@list", cons_is_empty)?;

    registry.register("length", vec![list.clone()], "length@list", length)?;
    registry.register("at", vec![list.clone(), constant], "at@list", at)?;
    registry.register("last", vec![list.clone()], "last@list", last)?;
    registry.register("unpack", vec![list.clone(), TagPattern::Any], "unpack@list", unpack)?;
    registry.register("push_back", vec![list.clone(), TagPattern::Any], "push_back@list", push_back)?;
    registry.register("push_front", vec![list, TagPattern::Any], "push_front@list", push_front)?;
    Ok(())
}
