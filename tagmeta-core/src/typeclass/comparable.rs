//! Comparable: `equal` and `not_equal`
//!
//! Datatypes without an instance still compare, by structural identity.

use super::{binary, Typeclass};
use crate::error::RegistryError;
use crate::registry::DispatchRegistry;
use crate::types::Value;

pub fn typeclass() -> Typeclass {
    Typeclass::new("Comparable", 2)
        .derived("equal", 2, |engine, args| {
            let (left, right) = binary("equal", args)?;
            let different = engine.call_bool("not_equal", &[left.clone(), right.clone()])?;
            Ok(Value::bool(!different))
        })
        .derived("not_equal", 2, |engine, args| {
            let (left, right) = binary("not_equal", args)?;
            let same = engine.call_bool("equal", &[left.clone(), right.clone()])?;
            Ok(Value::bool(!same))
        })
        .minimal(&["equal"])
        .minimal(&["not_equal"])
}

/// Identity comparison, used by every datatype without an instance
pub fn is_same(left: &Value, right: &Value) -> bool {
    left == right
}

pub fn register_defaults(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    registry.register_default("is_same", 2, "is_same", |_, args| {
        let (left, right) = binary("is_same", args)?;
        Ok(Value::bool(is_same(left, right)))
    });
    registry.register_default("equal", 2, "equal:is_same", |_, args| {
        let (left, right) = binary("equal", args)?;
        Ok(Value::bool(is_same(left, right)))
    });
    registry.register_default("not_equal", 2, "not_equal:is_same", |_, args| {
        let (left, right) = binary("not_equal", args)?;
        Ok(Value::bool(!is_same(left, right)))
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::typeclass::Instance;
    use crate::types::Tag;

    #[test]
    fn test_equal_falls_back_to_identity() {
        let mut engine = Engine::new();
        let x = Value::opaque("x");

        assert!(engine.call_bool("equal", &[x.clone(), x.clone()]).unwrap());
        assert!(engine
            .call_bool("not_equal", &[x, Value::opaque("y")])
            .unwrap());
    }

    #[test]
    fn test_equal_derived_from_not_equal() {
        let mut engine = Engine::new();
        let tag = Tag::new("always_different");
        engine
            .registry_mut()
            .instantiate(
                Instance::new("Comparable", &[tag.clone(), tag.clone()])
                    .method("not_equal", |_, _| Ok(Value::bool(true))),
            )
            .unwrap();

        let a = Value::tagged("a", tag);
        assert!(!engine.call_bool("equal", &[a.clone(), a]).unwrap());
    }
}
