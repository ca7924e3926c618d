//! Algebraic typeclasses: Monoid, Group, Ring and Field
//!
//! Identities are unary and take an exemplar of the datatype, so
//! `(zero x)` is the additive identity of whatever datatype `x` has.

use super::{binary, unary, Typeclass};
use crate::types::Value;

pub fn monoid() -> Typeclass {
    Typeclass::new("Monoid", 1)
        .method("plus", 2)
        .method("zero", 1)
        .minimal(&["plus", "zero"])
}

pub fn group() -> Typeclass {
    Typeclass::new("Group", 1)
        .derived("minus", 2, |engine, args| {
            let (left, right) = binary("minus", args)?;
            let negated = engine.call("negate", &[right.clone()])?;
            engine.call("plus", &[left.clone(), negated])
        })
        .derived("negate", 1, |engine, args| {
            let value = unary("negate", args)?;
            let zero = engine.call("zero", &[value.clone()])?;
            engine.call("minus", &[zero, value.clone()])
        })
        .minimal(&["minus"])
        .minimal(&["negate"])
}

pub fn ring() -> Typeclass {
    Typeclass::new("Ring", 1)
        .method("times", 2)
        .method("one", 1)
        .minimal(&["times", "one"])
}

pub fn field() -> Typeclass {
    Typeclass::new("Field", 1)
        .derived("quot", 2, |engine, args| {
            let (left, right) = binary("quot", args)?;
            let reciprocal = engine.call("recip", &[right.clone()])?;
            engine.call("times", &[left.clone(), reciprocal])
        })
        .derived("recip", 1, |engine, args| {
            let value = unary("recip", args)?;
            let one = engine.call("one", &[value.clone()])?;
            engine.call("quot", &[one, value.clone()])
        })
        .minimal(&["quot"])
        .minimal(&["recip"])
}

pub fn typeclasses() -> Vec<Typeclass> {
    vec![monoid(), group(), ring(), field()]
}
