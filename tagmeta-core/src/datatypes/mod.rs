//! Built-in datatypes
//!
//! Each datatype registers its place in the tag hierarchy, its metadata and
//! the native operations it provides. Constructors are variadic and are not
//! dispatched.

pub mod list;
pub mod map;
pub mod minimal_sequence;
pub mod pair;
pub mod single_element;
pub mod static_constant;
pub mod vector;

use crate::error::{ElabResult, ElaborationError, RegistryError};
use crate::registry::DispatchRegistry;
use crate::types::tags::{self, TraversalCategory};
use crate::types::{ConstantKind, StaticConstant, Value};

/// Names that construct values rather than dispatch
pub const CONSTRUCTORS: [&str; 10] = [
    "int",
    "long",
    "size_t",
    "bool",
    "list",
    "vector",
    "map",
    "minimal_sequence",
    "pair",
    "single_element",
];

pub fn is_constructor(name: &str) -> bool {
    CONSTRUCTORS.contains(&name)
}

fn constant(name: &str, kind: ConstantKind, args: &[Value]) -> ElabResult<Value> {
    let [value] = args else {
        return Err(ElaborationError::usage(name, "expected exactly one value"));
    };
    let constant = value
        .as_constant()
        .ok_or_else(|| ElaborationError::type_mismatch(name, "a static constant", value))?;
    if kind == ConstantKind::SizeT && constant.value < 0 {
        return Err(ElaborationError::type_mismatch(name, "a non-negative value", value));
    }
    Ok(Value::Constant(StaticConstant::new(kind, constant.value)))
}

/// Construct a value if `name` is a constructor
pub fn construct(name: &str, args: &[Value]) -> Option<ElabResult<Value>> {
    let value = match name {
        "int" => constant(name, ConstantKind::Int, args),
        "long" => constant(name, ConstantKind::Long, args),
        "size_t" => constant(name, ConstantKind::SizeT, args),
        "bool" => constant(name, ConstantKind::Bool, args),
        "list" => Ok(Value::list(args.to_vec())),
        "vector" => Ok(Value::vector(args.to_vec())),
        "minimal_sequence" => Ok(Value::minimal_sequence(args.to_vec())),
        "map" => map::construct(args),
        "pair" => match args {
            [first, second] => Ok(Value::pair(first.clone(), second.clone())),
            _ => Err(ElaborationError::usage("pair", "expected exactly two values")),
        },
        "single_element" => match args {
            [element] => Ok(Value::single_element(element.clone())),
            _ => Err(ElaborationError::usage("single_element", "expected exactly one value")),
        },
        _ => return None,
    };
    Some(value)
}

/// Category tags shared by the built-in datatypes
fn register_categories(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    registry.add_refinement(&tags::RANDOM_ACCESS_SEQUENCE, &tags::SEQUENCE)?;
    registry.add_refinement(&tags::ASSOCIATIVE_SEQUENCE, &tags::SEQUENCE)?;
    registry.set_traversal_category(&tags::RANDOM_ACCESS_SEQUENCE, TraversalCategory::RandomAccess);
    registry.set_traversal_category(&tags::ASSOCIATIVE_SEQUENCE, TraversalCategory::Associative);
    registry.set_class(&tags::SEQUENCE, &tags::SEQUENCE_CLASS);

    registry.add_refinement(&tags::FORWARD_ITERATOR, &tags::ITERATOR)?;
    registry.add_refinement(&tags::BIDIRECTIONAL_ITERATOR, &tags::FORWARD_ITERATOR)?;
    registry.add_refinement(&tags::RANDOM_ACCESS_ITERATOR, &tags::BIDIRECTIONAL_ITERATOR)?;
    registry.set_traversal_category(&tags::FORWARD_ITERATOR, TraversalCategory::Forward);
    registry.set_traversal_category(&tags::BIDIRECTIONAL_ITERATOR, TraversalCategory::Bidirectional);
    registry.set_traversal_category(&tags::RANDOM_ACCESS_ITERATOR, TraversalCategory::RandomAccess);
    registry.set_class(&tags::ITERATOR, &tags::ITERATOR_CLASS);

    registry.add_refinement(&tags::CONS_ITERATOR, &tags::FORWARD_ITERATOR)?;

    registry.set_class(&tags::METAFUNCTION, &tags::METAFUNCTION_CLASS);
    registry.set_class(&tags::TAG, &tags::TAG_CLASS);
    Ok(())
}

pub fn register(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    register_categories(registry)?;
    static_constant::register(registry)?;
    pair::register(registry)?;
    list::register(registry)?;
    minimal_sequence::register(registry)?;
    vector::register(registry)?;
    map::register(registry)?;
    single_element::register(registry)?;
    Ok(())
}
