//! Typeclass instances for static constants
//!
//! Every constant kind shares one tag, so a single instance per typeclass
//! covers `bool`, `int`, `long` and `size_t`. Arithmetic results take the
//! promoted kind of their operands.

use crate::engine::Engine;
use crate::error::{ElabResult, ElaborationError, RegistryError};
use crate::registry::{DispatchRegistry, TagPattern};
use crate::typeclass::{binary, unary, Instance};
use crate::types::tags;
use crate::types::{ConstantKind, StaticConstant, Value};

fn constant<'v>(operation: &str, value: &'v Value) -> ElabResult<&'v StaticConstant> {
    value
        .as_constant()
        .ok_or_else(|| ElaborationError::type_mismatch(operation, "a static constant", value))
}

fn overflow(operation: &str) -> ElaborationError {
    ElaborationError::usage(operation, "arithmetic overflow")
}

/// A result constant of `kind`; `size_t` results must not be negative
fn result(operation: &str, kind: ConstantKind, value: i64) -> ElabResult<Value> {
    if kind == ConstantKind::SizeT && value < 0 {
        return Err(overflow(operation));
    }
    Ok(StaticConstant::new(kind, value).into())
}

/// Lift a checked binary operation on values to one on constants
fn arithmetic(
    operation: &'static str,
    apply: fn(i64, i64) -> Option<i64>,
) -> impl Fn(&mut Engine, &[Value]) -> ElabResult<Value> + Send + Sync + 'static {
    move |_, args| {
        let (left, right) = binary(operation, args)?;
        let (left, right) = (constant(operation, left)?, constant(operation, right)?);
        let value = apply(left.value, right.value).ok_or_else(|| overflow(operation))?;
        result(operation, left.kind.promote(right.kind), value)
    }
}

fn divide(
    operation: &'static str,
    apply: fn(i64, i64) -> Option<i64>,
) -> impl Fn(&mut Engine, &[Value]) -> ElabResult<Value> + Send + Sync + 'static {
    move |_, args| {
        let (left, right) = binary(operation, args)?;
        let (left, right) = (constant(operation, left)?, constant(operation, right)?);
        if right.value == 0 {
            return Err(ElaborationError::DivisionByZero {
                operation: operation.to_string(),
            });
        }
        let value = apply(left.value, right.value).ok_or_else(|| overflow(operation))?;
        result(operation, left.kind.promote(right.kind), value)
    }
}

fn shift(
    operation: &'static str,
    apply: fn(i64, u32) -> Option<i64>,
) -> impl Fn(&mut Engine, &[Value]) -> ElabResult<Value> + Send + Sync + 'static {
    move |_, args| {
        let (left, right) = binary(operation, args)?;
        let (left, right) = (constant(operation, left)?, constant(operation, right)?);
        let amount = u32::try_from(right.value).map_err(|_| overflow(operation))?;
        let value = apply(left.value, amount).ok_or_else(|| overflow(operation))?;
        result(operation, left.kind.promote(right.kind), value)
    }
}

/// Lift a unary operation; `bool` operands promote to `int`
fn unary_op(
    operation: &'static str,
    apply: fn(i64) -> Option<i64>,
) -> impl Fn(&mut Engine, &[Value]) -> ElabResult<Value> + Send + Sync + 'static {
    move |_, args| {
        let value = constant(operation, unary(operation, args)?)?;
        let computed = apply(value.value).ok_or_else(|| overflow(operation))?;
        result(operation, value.kind.promote(ConstantKind::Int), computed)
    }
}

/// A fixed constant of the same kind as the exemplar argument
fn identity(
    operation: &'static str,
    value: i64,
) -> impl Fn(&mut Engine, &[Value]) -> ElabResult<Value> + Send + Sync + 'static {
    move |_, args| {
        let exemplar = constant(operation, unary(operation, args)?)?;
        Ok(StaticConstant::new(exemplar.kind, value).into())
    }
}

fn compare(
    operation: &'static str,
    apply: fn(i64, i64) -> bool,
) -> impl Fn(&mut Engine, &[Value]) -> ElabResult<Value> + Send + Sync + 'static {
    move |_, args| {
        let (left, right) = binary(operation, args)?;
        let (left, right) = (constant(operation, left)?, constant(operation, right)?);
        Ok(Value::bool(apply(left.value, right.value)))
    }
}

pub fn register(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    let tag = tags::STATIC_CONSTANT.clone();
    let both = [tag.clone(), tag.clone()];
    let one = [tag.clone()];

    registry.set_class(&tag, &tags::STATIC_CONSTANT_CLASS);

    registry.instantiate(Instance::new("Comparable", &both).method("equal", compare("equal", |a, b| a == b)))?;
    registry.instantiate(Instance::new("Orderable", &both).method("less", compare("less", |a, b| a < b)))?;
    registry.instantiate(
        Instance::new("Enumerable", &one)
            .method("succ", unary_op("succ", |v| v.checked_add(1)))
            .method("pred", unary_op("pred", |v| v.checked_sub(1))),
    )?;
    registry.instantiate(
        Instance::new("Bitwise", &both)
            .method("bitand", arithmetic("bitand", |a, b| Some(a & b)))
            .method("bitor", arithmetic("bitor", |a, b| Some(a | b)))
            .method("bitxor", arithmetic("bitxor", |a, b| Some(a ^ b)))
            .method("shift_left", shift("shift_left", |v, n| v.checked_shl(n)))
            .method("shift_right", shift("shift_right", |v, n| v.checked_shr(n)))
            .method("compl", unary_op("compl", |v| Some(!v))),
    )?;

    registry.instantiate(
        Instance::new("Monoid", &one)
            .method("plus", arithmetic("plus", i64::checked_add))
            .method("zero", identity("zero", 0)),
    )?;
    registry.instantiate(Instance::new("Group", &one).method("minus", arithmetic("minus", i64::checked_sub)))?;
    registry.instantiate(
        Instance::new("Ring", &one)
            .method("times", arithmetic("times", i64::checked_mul))
            .method("one", identity("one", 1)),
    )?;
    registry.instantiate(Instance::new("Field", &one).method("quot", divide("quot", i64::checked_div)))?;

    registry.register(
        "mod_",
        vec![TagPattern::exact(&tag), TagPattern::exact(&tag)],
        "mod_@static_constant",
        divide("mod_", i64::checked_rem),
    )?;
    Ok(())
}
