//! `pair`: the element type of associative sequences

use crate::engine::Engine;
use crate::error::{ElabResult, ElaborationError, RegistryError};
use crate::registry::{DispatchRegistry, TagPattern};
use crate::typeclass::unary;
use crate::types::{tags, Value};

fn first(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let pair = unary("first", args)?;
    pair.as_pair()
        .map(|(first, _)| first.clone())
        .ok_or_else(|| ElaborationError::type_mismatch("first", "a pair", pair))
}

fn second(_: &mut Engine, args: &[Value]) -> ElabResult<Value> {
    let pair = unary("second", args)?;
    pair.as_pair()
        .map(|(_, second)| second.clone())
        .ok_or_else(|| ElaborationError::type_mismatch("second", "a pair", pair))
}

pub fn register(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    registry.set_class(&tags::PAIR, &tags::PAIR_CLASS);

    let pattern = vec![TagPattern::exact(&tags::PAIR)];
    registry.register("first", pattern.clone(), "first@pair", first)?;
    registry.register("second", pattern, "second@pair", second)?;
    Ok(())
}
