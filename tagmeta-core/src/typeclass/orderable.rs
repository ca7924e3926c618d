//! Orderable: a strict order from which the remaining comparisons derive

use super::{binary, Typeclass};
use crate::engine::Engine;
use crate::error::ElabResult;
use crate::types::Value;

fn less(engine: &mut Engine, left: &Value, right: &Value) -> ElabResult<bool> {
    engine.call_bool("less", &[left.clone(), right.clone()])
}

pub fn typeclass() -> Typeclass {
    Typeclass::new("Orderable", 2)
        .method("less", 2)
        .derived("less_equal", 2, |engine, args| {
            let (left, right) = binary("less_equal", args)?;
            Ok(Value::bool(!less(engine, right, left)?))
        })
        .derived("greater", 2, |engine, args| {
            let (left, right) = binary("greater", args)?;
            Ok(Value::bool(less(engine, right, left)?))
        })
        .derived("greater_equal", 2, |engine, args| {
            let (left, right) = binary("greater_equal", args)?;
            Ok(Value::bool(engine.call_bool("less_equal", &[right.clone(), left.clone()])?))
        })
        .derived("max", 2, |engine, args| {
            let (left, right) = binary("max", args)?;
            Ok((if less(engine, left, right)? { right } else { left }).clone())
        })
        .derived("min", 2, |engine, args| {
            let (left, right) = binary("min", args)?;
            Ok((if less(engine, right, left)? { right } else { left }).clone())
        })
        .minimal(&["less"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TagPattern;
    use crate::typeclass::Instance;
    use crate::types::Tag;

    /// Opaque values ordered by name, supplying only `less`
    fn engine_with_named_order() -> (Engine, Tag) {
        let mut engine = Engine::new();
        let tag = Tag::new("named");
        engine
            .registry_mut()
            .instantiate(
                Instance::new("Orderable", &[tag.clone(), tag.clone()]).method("less", |_, args| {
                    let name = |v: &Value| v.to_string();
                    Ok(Value::bool(name(&args[0]) < name(&args[1])))
                }),
            )
            .unwrap();
        (engine, tag)
    }

    #[test]
    fn test_comparisons_derive_from_less() {
        let (mut engine, tag) = engine_with_named_order();
        let a = Value::tagged("a", tag.clone());
        let b = Value::tagged("b", tag);

        assert!(engine.call_bool("less_equal", &[a.clone(), b.clone()]).unwrap());
        assert!(engine.call_bool("less_equal", &[a.clone(), a.clone()]).unwrap());
        assert!(engine.call_bool("greater", &[b.clone(), a.clone()]).unwrap());
        assert!(!engine.call_bool("greater_equal", &[a.clone(), b.clone()]).unwrap());
        assert_eq!(engine.call("max", &[a.clone(), b.clone()]).unwrap(), b);
        assert_eq!(engine.call("min", &[a.clone(), b]).unwrap(), a);
    }

    #[test]
    fn test_greater_equal_follows_a_supplied_less_equal() {
        let (mut engine, tag) = engine_with_named_order();
        let a = Value::tagged("a", tag.clone());
        let b = Value::tagged("b", tag.clone());

        // An instance whose less_equal holds for every pair
        engine.registry_mut().replace(
            "less_equal",
            vec![TagPattern::exact(&tag), TagPattern::exact(&tag)],
            "less_equal@named",
            |_, _| Ok(Value::bool(true)),
        );
        assert!(engine.call_bool("greater_equal", &[a, b]).unwrap());
    }

    #[test]
    fn test_derived_entries_are_labelled() {
        let (engine, tag) = engine_with_named_order();
        let a = Value::tagged("a", tag);
        let label = engine
            .resolve(&"less_equal".into(), &[a.clone(), a])
            .label()
            .map(str::to_string);
        assert_eq!(label.as_deref(), Some("Orderable<named, named>::less_equal (derived)"));
    }
}
