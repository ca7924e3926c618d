//! `minimal_sequence`: only `head`, `tail` and `is_empty`
//!
//! Exercises the generic derivations, since it overrides nothing else.

use super::list::{cons_head, cons_is_empty, cons_tail};
use crate::error::RegistryError;
use crate::registry::{DispatchRegistry, TagPattern};
use crate::types::tags::{self, TraversalCategory};

pub fn register(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    registry.add_refinement(&tags::MINIMAL_SEQUENCE, &tags::SEQUENCE)?;
    registry.set_traversal_category(&tags::MINIMAL_SEQUENCE, TraversalCategory::Forward);

    let pattern = vec![TagPattern::exact(&tags::MINIMAL_SEQUENCE)];
    registry.register("head", pattern.clone(), "head@minimal_sequence", cons_head)?;
    registry.register("tail", pattern.clone(), "tail@minimal_sequence", cons_tail)?;
    registry.register("is_empty", pattern, "is_empty@minimal_sequence", cons_is_empty)?;
    Ok(())
}
