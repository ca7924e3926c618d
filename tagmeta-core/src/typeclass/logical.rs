//! Logical operations and chained comparisons
//!
//! Operands are produced on demand by a callback, so an operand after the
//! one that decides the result is never elaborated. The evaluator passes
//! unevaluated expressions through this; Rust callers pass values.

use crate::engine::Engine;
use crate::error::{ElabResult, ElaborationError, RegistryError};
use crate::registry::{DispatchRegistry, TagPattern};
use crate::types::{tags, Value};

/// Operations that accept more than two operands as a chain
pub const CHAINABLE: [&str; 5] = [
    "equal",
    "less",
    "less_equal",
    "greater",
    "greater_equal",
];

pub fn is_chainable(operation: &str) -> bool {
    CHAINABLE.contains(&operation)
}

/// Operations taking any number of operands, including none
pub fn is_variadic(operation: &str) -> bool {
    matches!(operation, "and_" | "or_")
}

/// Conjunction of `count` operands; the empty conjunction is true
pub fn and_with<F>(engine: &mut Engine, count: usize, mut operand: F) -> ElabResult<Value>
where
    F: FnMut(&mut Engine, usize) -> ElabResult<Value>,
{
    for index in 0..count {
        let value = operand(engine, index)?;
        if !engine.truth(&value)? {
            return Ok(Value::bool(false));
        }
    }
    Ok(Value::bool(true))
}

/// Disjunction of `count` operands; the empty disjunction is false
pub fn or_with<F>(engine: &mut Engine, count: usize, mut operand: F) -> ElabResult<Value>
where
    F: FnMut(&mut Engine, usize) -> ElabResult<Value>,
{
    for index in 0..count {
        let value = operand(engine, index)?;
        if engine.truth(&value)? {
            return Ok(Value::bool(true));
        }
    }
    Ok(Value::bool(false))
}

/// `op(x0, x1) && op(x1, x2) && ...`, stopping at the first false link
pub fn chain_with<F>(
    engine: &mut Engine,
    operation: &str,
    count: usize,
    mut operand: F,
) -> ElabResult<Value>
where
    F: FnMut(&mut Engine, usize) -> ElabResult<Value>,
{
    if count < 2 {
        return Err(ElaborationError::usage(
            operation,
            format!("comparison needs at least 2 operands, found {count}"),
        ));
    }

    let mut left = operand(engine, 0)?;
    for index in 1..count {
        let right = operand(engine, index)?;
        if !engine.call_bool(operation, &[left, right.clone()])? {
            return Ok(Value::bool(false));
        }
        left = right;
    }
    Ok(Value::bool(true))
}

/// Choose between two lazily produced branches
pub fn if_with<T, E>(engine: &mut Engine, condition: &Value, then: T, otherwise: E) -> ElabResult<Value>
where
    T: FnOnce(&mut Engine) -> ElabResult<Value>,
    E: FnOnce(&mut Engine) -> ElabResult<Value>,
{
    if engine.truth(condition)? {
        then(engine)
    } else {
        otherwise(engine)
    }
}

pub fn and_(engine: &mut Engine, operands: &[Value]) -> ElabResult<Value> {
    and_with(engine, operands.len(), |_, i| Ok(operands[i].clone()))
}

pub fn or_(engine: &mut Engine, operands: &[Value]) -> ElabResult<Value> {
    or_with(engine, operands.len(), |_, i| Ok(operands[i].clone()))
}

pub fn chain(engine: &mut Engine, operation: &str, operands: &[Value]) -> ElabResult<Value> {
    chain_with(engine, operation, operands.len(), |_, i| Ok(operands[i].clone()))
}

pub fn register(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    registry.register(
        "not_",
        vec![TagPattern::exact(&tags::STATIC_CONSTANT)],
        "not_@static_constant",
        |engine, args| {
            let value = super::unary("not_", args)?;
            Ok(Value::bool(!engine.truth(value)?))
        },
    )?;
    registry.register_default("not_", 1, "not_:default", |_, args| {
        let value = super::unary("not_", args)?;
        Err(ElaborationError::NotABooleanConstant {
            found: value.to_string(),
        })
    });
    Ok(())
}
