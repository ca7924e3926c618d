//! Sequence algorithms derived from the minimal interfaces

use super::{elements, integer_argument, rebuild, require_finite, Walker};
use crate::engine::Engine;
use crate::error::{ElabResult, ElaborationError, RegistryError};
use crate::registry::{DispatchRegistry, SequenceTraits, TagPattern};
use crate::typeclass::{binary, unary};
use crate::types::{tags, Value};

fn length(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let sequence = unary("length", args)?;
    let mut walker = Walker::finite(engine, "length", sequence)?;
    let mut count = 0;
    while walker.next_element(engine)?.is_some() {
        count += 1;
    }
    Ok(Value::size_t(count))
}

fn last(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let sequence = unary("last", args)?;
    let mut walker = Walker::finite(engine, "last", sequence)?;
    let mut last = None;
    while let Some(element) = walker.next_element(engine)? {
        last = Some(element);
    }
    last.ok_or_else(|| ElaborationError::EmptySequence {
        operation: "last".to_string(),
    })
}

fn unpack(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (sequence, function) = binary("unpack", args)?;
    let elements = elements(engine, "unpack", sequence)?;
    engine.apply(function, &elements)
}

fn push_back(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (sequence, element) = binary("push_back", args)?;
    let mut elements = elements(engine, "push_back", sequence)?;
    elements.push(element.clone());
    Ok(rebuild(sequence, elements))
}

fn push_front(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (sequence, element) = binary("push_front", args)?;
    let mut elements = elements(engine, "push_front", sequence)?;
    elements.insert(0, element.clone());
    Ok(rebuild(sequence, elements))
}

/// Iterator to the first element satisfying `predicate`, or `end`
pub(crate) fn find_first<P>(engine: &mut Engine, sequence: &Value, mut predicate: P) -> ElabResult<Value>
where
    P: FnMut(&mut Engine, &Value) -> ElabResult<bool>,
{
    let args = std::slice::from_ref(sequence);
    let mut current = engine.call("begin", args)?;
    let end = engine.call("end", args)?;
    let limit = engine.config().max_sequence_length;

    for _ in 0..=limit {
        if engine.call_bool("equal", &[current.clone(), end.clone()])? {
            return Ok(current);
        }
        let element = engine.call("deref", std::slice::from_ref(&current))?;
        if predicate(engine, &element)? {
            return Ok(current);
        }
        current = engine.call("next", std::slice::from_ref(&current))?;
    }
    Err(ElaborationError::SequenceTooLong { limit })
}

fn find_if(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (sequence, predicate) = binary("find_if", args)?;
    find_first(engine, sequence, |engine, element| {
        let verdict = engine.apply(predicate, std::slice::from_ref(element))?;
        engine.truth(&verdict)
    })
}

fn insert_range(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let [sequence, position, range] = args else {
        return Err(ElaborationError::usage(
            "insert_range",
            "expected a sequence, an iterator into it and a range",
        ));
    };
    require_finite(engine, "insert_range", sequence)?;

    let begin = engine.call("begin", std::slice::from_ref(sequence))?;
    let offset = engine.call("distance", &[begin, position.clone()])?;
    let offset = integer_argument("insert_range", &offset)?;

    let mut elements = elements(engine, "insert_range", sequence)?;
    if offset < 0 || offset as usize > elements.len() {
        return Err(ElaborationError::IteratorOutOfRange {
            position: offset,
            length: elements.len(),
        });
    }

    let inserted = super::elements(engine, "insert_range", range)?;
    let offset = offset as usize;
    elements.splice(offset..offset, inserted);
    Ok(rebuild(sequence, elements))
}

fn insert_single(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let [sequence, position, element] = args else {
        return Err(ElaborationError::usage("insert", "expected a sequence, an iterator and an element"));
    };
    let range = Value::single_element(element.clone());
    engine.call("insert_range", &[sequence.clone(), position.clone(), range])
}

fn at_c(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (_, index) = binary("at_c", args)?;
    integer_argument("at_c", index)?;
    engine.call("at", args)
}

fn register_trait(
    registry: &mut DispatchRegistry,
    operation: &'static str,
    read: fn(&SequenceTraits) -> bool,
) {
    registry.register_default(operation, 1, format!("{operation}:traits"), move |engine, args| {
        let sequence = unary(operation, args)?;
        let traits = engine.registry().sequence_traits(&sequence.tag());
        Ok(Value::bool(read(&traits)))
    });
}

pub fn register(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    let sequence = TagPattern::exact(&tags::SEQUENCE);
    let any = TagPattern::Any;

    registry.register("length", vec![sequence.clone()], "length@sequence", length)?;
    registry.register("last", vec![sequence.clone()], "last@sequence", last)?;
    registry.register("unpack", vec![sequence.clone(), any.clone()], "unpack@sequence", unpack)?;
    registry.register("push_back", vec![sequence.clone(), any.clone()], "push_back@sequence", push_back)?;
    registry.register("push_front", vec![sequence.clone(), any.clone()], "push_front@sequence", push_front)?;
    registry.register("find_if", vec![sequence.clone(), any.clone()], "find_if@sequence", find_if)?;
    registry.register(
        "insert_range",
        vec![sequence.clone(), TagPattern::exact(&tags::ITERATOR), sequence],
        "insert_range@sequence",
        insert_range,
    )?;

    registry.register_usage("insert", vec![2, 3], "(insert sequence iterator element) or (insert associative-sequence element)");
    registry.register_default("insert", 3, "insert:insert_range", insert_single);
    registry.register_failing_default(
        "insert",
        2,
        "associative insert must be supplied by the datatype",
    );

    registry.register_usage("at_c", vec![2], "(at_c sequence index)");
    registry.register_default("at_c", 2, "at_c:at", at_c);

    register_trait(registry, "has_O1_length", |traits| traits.has_o1_length);
    register_trait(registry, "has_O1_unpack", |traits| traits.has_o1_unpack);
    register_trait(registry, "is_finite", |traits| traits.is_finite);
    Ok(())
}
