//! The built-in prelude
//!
//! Builds the registry every engine starts from: typeclasses, the generic
//! sequence derivations, the built-in datatypes and the tag queries. The
//! registry is built once and cloned into each engine.

use crate::datatypes;
use crate::error::{ElaborationError, RegistryError};
use crate::registry::DispatchRegistry;
use crate::sequence;
use crate::typeclass::{self, comparable, logical, unary};
use crate::types::{tags, Value};
use lazy_static::lazy_static;
use miette::Report;

lazy_static! {
    /// Prelude registry built on first use
    static ref PRELUDE: DispatchRegistry = load_prelude();
}

fn load_prelude() -> DispatchRegistry {
    match build_prelude() {
        Ok(registry) => registry,
        Err(error) => {
            eprintln!("🚨 Prelude Registration Error:");
            eprintln!("{:?}", Report::new(error));
            eprintln!("\n💡 This indicates a problem with the built-in datatypes.");
            std::process::exit(1);
        }
    }
}

/// A fresh copy of the prelude registry
pub fn prelude() -> DispatchRegistry {
    PRELUDE.clone()
}

fn register_tag_queries(registry: &mut DispatchRegistry) {
    registry.register_default("tag_of", 1, "tag_of", |_, args| {
        Ok(Value::Tag(unary("tag_of", args)?.tag()))
    });
    registry.register_default("class_of", 1, "class_of", |engine, args| {
        Ok(Value::Tag(engine.class_of(unary("class_of", args)?)))
    });
    registry.register_default("traversal_category_of", 1, "traversal_category_of", |engine, args| {
        let value = unary("traversal_category_of", args)?;
        let category = engine
            .traversal_category_of(value)
            .map(|category| category.as_tag())
            .unwrap_or_else(|| tags::NO_TAG.clone());
        Ok(Value::Tag(category))
    });
}

/// Build the prelude registry from scratch
pub fn build_prelude() -> Result<DispatchRegistry, RegistryError> {
    let mut registry = DispatchRegistry::new();

    typeclass::define_builtin(&mut registry);
    comparable::register_defaults(&mut registry)?;
    logical::register(&mut registry)?;
    register_tag_queries(&mut registry);
    sequence::register(&mut registry)?;
    datatypes::register(&mut registry)?;

    Ok(registry)
}

/// Whether a name refers to something callable in the prelude
pub fn is_callable(registry: &DispatchRegistry, name: &str) -> Result<(), ElaborationError> {
    if datatypes::is_constructor(name) || logical::is_variadic(name) || registry.is_operation(name) {
        Ok(())
    } else {
        Err(ElaborationError::UnknownOperation {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_builds() {
        let registry = build_prelude().unwrap();
        assert!(registry.is_operation("head"));
        assert!(registry.is_operation("less_equal"));
        assert!(registry.typeclass("Field").is_some());
    }

    #[test]
    fn test_is_callable() {
        let registry = prelude();
        assert!(is_callable(&registry, "vector").is_ok());
        assert!(is_callable(&registry, "unpack").is_ok());
        assert!(is_callable(&registry, "and_").is_ok());
        assert!(matches!(
            is_callable(&registry, "frobnicate"),
            Err(ElaborationError::UnknownOperation { .. })
        ));
    }
}
