//! Specificity ordering of tag patterns
//!
//! Patterns are ordered component-wise: `Exact(a)` is at least as specific
//! as `Exact(b)` when `a` refines `b`, and every pattern is at least as
//! specific as `Any`.

use crate::registry::{DispatchRegistry, ImplementationEntry, TagPattern};
use crate::types::Tag;

/// Whether one argument's tag is accepted by `pattern`
pub fn pattern_matches(registry: &DispatchRegistry, pattern: &TagPattern, tag: &Tag) -> bool {
    match pattern {
        TagPattern::Any => true,
        TagPattern::Exact(expected) => registry.refines(tag, expected),
    }
}

/// Whether an entry with `pattern` accepts arguments tagged `tags`
pub fn is_applicable(registry: &DispatchRegistry, pattern: &[TagPattern], tags: &[Tag]) -> bool {
    pattern.len() == tags.len()
        && pattern
            .iter()
            .zip(tags)
            .all(|(p, tag)| pattern_matches(registry, p, tag))
}

fn component_at_least_as_specific(
    registry: &DispatchRegistry,
    a: &TagPattern,
    b: &TagPattern,
) -> bool {
    match (a, b) {
        (_, TagPattern::Any) => true,
        (TagPattern::Any, TagPattern::Exact(_)) => false,
        (TagPattern::Exact(a), TagPattern::Exact(b)) => registry.refines(a, b),
    }
}

/// Product order over patterns of equal length
pub fn at_least_as_specific(registry: &DispatchRegistry, a: &[TagPattern], b: &[TagPattern]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(a, b)| component_at_least_as_specific(registry, a, b))
}

/// Entries no other candidate is strictly more specific than
pub fn find_most_specific<'e>(
    registry: &DispatchRegistry,
    candidates: &[&'e ImplementationEntry],
) -> Vec<&'e ImplementationEntry> {
    candidates
        .iter()
        .filter(|candidate| {
            !candidates.iter().any(|other| {
                !std::ptr::eq(*other, **candidate)
                    && at_least_as_specific(registry, &other.pattern, &candidate.pattern)
                    && !at_least_as_specific(registry, &candidate.pattern, &other.pattern)
            })
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tags;

    fn registry() -> DispatchRegistry {
        let mut registry = DispatchRegistry::new();
        registry.add_refinement(&tags::VECTOR, &tags::RANDOM_ACCESS_SEQUENCE).unwrap();
        registry
            .add_refinement(&tags::RANDOM_ACCESS_SEQUENCE, &tags::SEQUENCE)
            .unwrap();
        registry
    }

    #[test]
    fn test_exact_is_more_specific_than_category() {
        let registry = registry();
        let exact = [TagPattern::exact(&tags::VECTOR)];
        let category = [TagPattern::exact(&tags::SEQUENCE)];

        assert!(at_least_as_specific(&registry, &exact, &category));
        assert!(!at_least_as_specific(&registry, &category, &exact));
        assert!(at_least_as_specific(&registry, &category, &[TagPattern::Any]));
    }

    #[test]
    fn test_mixed_patterns_are_incomparable() {
        let registry = registry();
        let left = [TagPattern::exact(&tags::VECTOR), TagPattern::Any];
        let right = [TagPattern::Any, TagPattern::exact(&tags::VECTOR)];

        assert!(!at_least_as_specific(&registry, &left, &right));
        assert!(!at_least_as_specific(&registry, &right, &left));
    }

    #[test]
    fn test_applicability_requires_arity() {
        let registry = registry();
        let pattern = [TagPattern::exact(&tags::SEQUENCE), TagPattern::Any];

        assert!(is_applicable(&registry, &pattern, &[tags::VECTOR.clone(), tags::NO_TAG.clone()]));
        assert!(!is_applicable(&registry, &pattern, &[tags::VECTOR.clone()]));
        assert!(!is_applicable(&registry, &pattern, &[tags::LIST.clone(), tags::NO_TAG.clone()]));
    }
}
