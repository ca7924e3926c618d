//! `single_element`: a one-element random access sequence
//!
//! Used by the default `insert` to wrap the inserted element as a range.

use super::vector::{indexed_begin, indexed_end, stored_length};
use crate::error::RegistryError;
use crate::registry::{DispatchRegistry, SequenceTraits, TagPattern};
use crate::sequence::iterator::register_indexed;
use crate::types::tags::{self, TraversalCategory};

pub fn register(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    registry.add_refinement(&tags::SINGLE_ELEMENT, &tags::RANDOM_ACCESS_SEQUENCE)?;
    registry.set_sequence_traits(
        &tags::SINGLE_ELEMENT,
        SequenceTraits {
            has_o1_length: true,
            has_o1_unpack: true,
            is_finite: true,
        },
    );

    registry.add_refinement(&tags::SINGLE_ELEMENT_ITERATOR, &tags::RANDOM_ACCESS_ITERATOR)?;
    registry.set_traversal_category(&tags::SINGLE_ELEMENT_ITERATOR, TraversalCategory::RandomAccess);
    register_indexed(registry, &tags::SINGLE_ELEMENT_ITERATOR)?;

    let pattern = vec![TagPattern::exact(&tags::SINGLE_ELEMENT)];
    registry.register("begin", pattern.clone(), "begin@single_element", indexed_begin)?;
    registry.register("end", pattern.clone(), "end@single_element", indexed_end)?;
    registry.register("length", pattern, "length@single_element", stored_length)?;
    Ok(())
}
