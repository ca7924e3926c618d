//! Bridges between the cons and iterator interfaces
//!
//! Cons sequences get `begin`/`end` through cursor iterators; iterator
//! sequences get `head`/`tail`/`is_empty` through their iterators. Both
//! bridges are registered as defaults, so a native entry always wins and
//! a sequence implementing neither interface fails cleanly instead of
//! bouncing between the two.

use super::{has_iterators, is_cons, rebuild, Walker};
use crate::engine::Engine;
use crate::error::{ElabResult, ElaborationError, RegistryError};
use crate::registry::{join_display, DispatchRegistry, TagPattern};
use crate::typeclass::unary;
use crate::types::{tags, IteratorValue, Tag, Value};

pub(crate) fn no_implementation(operation: &str, args: &[Value]) -> ElaborationError {
    let tags: Vec<Tag> = args.iter().map(Value::tag).collect();
    ElaborationError::NoImplementation {
        operation: operation.to_string(),
        tags: join_display(&tags),
    }
}

fn cons_begin(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let sequence = unary("begin", args)?;
    if !is_cons(engine, sequence) {
        return Err(no_implementation("begin", args));
    }
    if engine.call_bool("is_empty", args)? {
        Ok(IteratorValue::ConsEnd.into())
    } else {
        Ok(IteratorValue::cursor(sequence.clone()).into())
    }
}

fn cons_end(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let sequence = unary("end", args)?;
    if !is_cons(engine, sequence) {
        return Err(no_implementation("end", args));
    }
    Ok(IteratorValue::ConsEnd.into())
}

fn cursor_next(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let iterator = unary("next", args)?;
    match iterator.as_iterator() {
        Some(IteratorValue::Cursor { remaining }) => {
            let tail = engine.call("tail", &[remaining.as_ref().clone()])?;
            if engine.call_bool("is_empty", std::slice::from_ref(&tail))? {
                Ok(IteratorValue::ConsEnd.into())
            } else {
                Ok(IteratorValue::cursor(tail).into())
            }
        }
        _ => Err(ElaborationError::NotIncrementable {
            iterator: iterator.to_string(),
        }),
    }
}

fn cursor_deref(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let iterator = unary("deref", args)?;
    match iterator.as_iterator() {
        Some(IteratorValue::Cursor { remaining }) => engine.call("head", &[remaining.as_ref().clone()]),
        _ => Err(ElaborationError::NotDereferenceable {
            iterator: iterator.to_string(),
        }),
    }
}

/// `begin` and `end` of an iterator sequence
fn bounds(engine: &mut Engine, operation: &str, args: &[Value]) -> ElabResult<(Value, Value)> {
    let sequence = unary(operation, args)?;
    if !has_iterators(engine, sequence) {
        return Err(no_implementation(operation, args));
    }
    Ok((engine.call("begin", args)?, engine.call("end", args)?))
}

fn iterator_is_empty(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (begin, end) = bounds(engine, "is_empty", args)?;
    engine.call("equal", &[begin, end])
}

fn iterator_head(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let (begin, end) = bounds(engine, "head", args)?;
    if engine.call_bool("equal", &[begin.clone(), end])? {
        return Err(ElaborationError::EmptySequence {
            operation: "head".to_string(),
        });
    }
    engine.call("deref", &[begin])
}

fn iterator_tail(engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let sequence = unary("tail", args)?;
    if !has_iterators(engine, sequence) {
        return Err(no_implementation("tail", args));
    }
    let mut walker = Walker::new(engine, sequence)?;
    if walker.next_element(engine)?.is_none() {
        return Err(ElaborationError::EmptySequence {
            operation: "tail".to_string(),
        });
    }
    let rest = walker.collect(engine)?;
    Ok(rebuild(sequence, rest))
}

pub fn register(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    registry.register_default("begin", 1, "begin:cons", cons_begin);
    registry.register_default("end", 1, "end:cons", cons_end);
    registry.register(
        "next",
        vec![TagPattern::exact(&tags::CONS_ITERATOR)],
        "next@cons_iterator",
        cursor_next,
    )?;
    registry.register(
        "deref",
        vec![TagPattern::exact(&tags::CONS_ITERATOR)],
        "deref@cons_iterator",
        cursor_deref,
    )?;

    registry.register_default("is_empty", 1, "is_empty:iterators", iterator_is_empty);
    registry.register_default("head", 1, "head:iterators", iterator_head);
    registry.register_default("tail", 1, "tail:iterators", iterator_tail);
    Ok(())
}
