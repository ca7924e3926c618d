//! Entry selection: specificity, ambiguity and registration conflicts

use crate::dispatch::ResolutionKind;
use crate::engine::Engine;
use crate::error::{ElaborationError, RegistryError};
use crate::registry::TagPattern;
use crate::types::{tags, OperationTag, Tag, Value};
use pretty_assertions::assert_eq;

fn engine_with_gadgets() -> Engine {
    let mut engine = Engine::new();
    let registry = engine.registry_mut();
    registry
        .add_refinement(&Tag::new("widget"), &Tag::new("gadget"))
        .unwrap();
    registry
        .register(
            "describe",
            vec![TagPattern::exact(&Tag::new("gadget"))],
            "describe@gadget",
            |_, _| Ok(Value::int(1)),
        )
        .unwrap();
    registry
        .register(
            "describe",
            vec![TagPattern::exact(&Tag::new("widget"))],
            "describe@widget",
            |_, _| Ok(Value::int(2)),
        )
        .unwrap();
    engine
}

#[test]
fn test_exact_entry_beats_category_entry() {
    let mut engine = engine_with_gadgets();

    let widget = Value::tagged("w", Tag::new("widget"));
    let gadget = Value::tagged("g", Tag::new("gadget"));

    assert_eq!(engine.call("describe", &[widget]).unwrap(), Value::int(2));
    assert_eq!(engine.call("describe", &[gadget]).unwrap(), Value::int(1));
}

#[test]
fn test_datatype_entry_beats_generic_sequence_entry() {
    let engine = Engine::new();
    let resolution = engine
        .resolve(&OperationTag::new("length"), &[Value::list(vec![])])
        .into_result()
        .unwrap();

    assert_eq!(resolution.label, "length@list");
    assert_eq!(resolution.kind, ResolutionKind::Entry);

    let resolution = engine
        .resolve(&OperationTag::new("length"), &[Value::minimal_sequence(vec![])])
        .into_result()
        .unwrap();
    assert_eq!(resolution.label, "length@sequence");
}

#[test]
fn test_incomparable_entries_are_ambiguous() {
    let mut engine = engine_with_gadgets();
    let widget = Tag::new("widget");
    let registry = engine.registry_mut();
    registry
        .register(
            "combine",
            vec![TagPattern::exact(&widget), TagPattern::Any],
            "combine@widget,_",
            |_, _| Ok(Value::int(1)),
        )
        .unwrap();
    registry
        .register(
            "combine",
            vec![TagPattern::Any, TagPattern::exact(&widget)],
            "combine@_,widget",
            |_, _| Ok(Value::int(2)),
        )
        .unwrap();

    let w = Value::tagged("w", widget);
    let result = engine.call("combine", &[w.clone(), w.clone()]);
    assert_eq!(
        result,
        Err(ElaborationError::Ambiguous {
            operation: "combine".to_string(),
            tags: "widget, widget".to_string(),
            candidates: vec!["combine@widget,_".to_string(), "combine@_,widget".to_string()],
        })
    );

    // Only one entry applies here, so it is chosen
    let other = Value::opaque("x");
    assert_eq!(engine.call("combine", &[w, other]).unwrap(), Value::int(1));
}

#[test]
fn test_duplicate_pattern_is_a_conflict() {
    let mut engine = engine_with_gadgets();
    let result = engine.registry_mut().register(
        "describe",
        vec![TagPattern::exact(&Tag::new("widget"))],
        "describe@widget again",
        |_, _| Ok(Value::int(3)),
    );

    assert_eq!(
        result,
        Err(RegistryError::ConflictingImplementation {
            operation: "describe".to_string(),
            pattern: "widget".to_string(),
        })
    );
}

#[test]
fn test_replace_overrides_existing_entry() {
    let mut engine = engine_with_gadgets();
    engine.registry_mut().replace(
        "describe",
        vec![TagPattern::exact(&Tag::new("widget"))],
        "describe@widget v2",
        |_, _| Ok(Value::int(20)),
    );

    let widget = Value::tagged("w", Tag::new("widget"));
    assert_eq!(engine.call("describe", &[widget]).unwrap(), Value::int(20));
}

#[test]
fn test_unknown_tags_without_default_fail() {
    let mut engine = engine_with_gadgets();
    let result = engine.call("describe", &[Value::opaque("x")]);
    assert_eq!(
        result,
        Err(ElaborationError::NoImplementation {
            operation: "describe".to_string(),
            tags: tags::NO_TAG.to_string(),
        })
    );
}

#[test]
fn test_failing_default_reports_unsupported() {
    let mut engine = Engine::new();
    let result = engine.call("insert", &[Value::vector(vec![]), Value::int(1)]);
    assert!(matches!(result, Err(ElaborationError::Unsupported { .. })));
}

#[test]
fn test_refinement_cycle_is_rejected() {
    let mut engine = engine_with_gadgets();
    let result = engine
        .registry_mut()
        .add_refinement(&Tag::new("gadget"), &Tag::new("widget"));
    assert!(matches!(result, Err(RegistryError::TagCycle { .. })));
}
