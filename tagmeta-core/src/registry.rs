//! Dispatch registry
//!
//! Holds every implementation entry keyed by operation, per-operation
//! defaults, the tag hierarchy and the per-tag metadata (traversal
//! category, class, sequence traits, common datatypes) that dispatch and
//! the generic sequence derivations consult.

use crate::engine::Engine;
use crate::error::{ElabResult, RegistryError};
use crate::typeclass::Typeclass;
use crate::types::{OperationTag, Tag, TagHierarchy, TraversalCategory, Value};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Signature of an implementation body
pub type ImplementationFn = dyn Fn(&mut Engine, &[Value]) -> ElabResult<Value> + Send + Sync;

/// Shared, callable implementation body
#[derive(Clone)]
pub struct Implementation(Arc<ImplementationFn>);

impl Implementation {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&mut Engine, &[Value]) -> ElabResult<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(body))
    }

    pub fn invoke(&self, engine: &mut Engine, args: &[Value]) -> ElabResult<Value> {
        (self.0)(engine, args)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Implementation(..)")
    }
}

/// Matches one argument's tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagPattern {
    /// Matches the tag and everything refining it
    Exact(Tag),
    /// Matches any tag
    Any,
}

impl TagPattern {
    pub fn exact(tag: &Tag) -> Self {
        TagPattern::Exact(tag.clone())
    }
}

impl fmt::Display for TagPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagPattern::Exact(tag) => write!(f, "{tag}"),
            TagPattern::Any => write!(f, "_"),
        }
    }
}

/// Render tags or patterns as `a, b, c`
pub fn join_display<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone)]
pub struct ImplementationEntry {
    pub operation: OperationTag,
    pub pattern: Vec<TagPattern>,
    /// Identifies the entry in ambiguity reports and trace output
    pub label: String,
    pub body: Implementation,
}

impl ImplementationEntry {
    pub fn arity(&self) -> usize {
        self.pattern.len()
    }
}

/// What happens when no entry matches an operation at some arity
#[derive(Debug, Clone)]
pub enum DefaultImplementation {
    Body { label: String, body: Implementation },
    /// The operation has no sensible default and the datatype must supply it
    Fail { message: String },
}

/// Arities an operation accepts, checked before dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRule {
    pub arities: Vec<usize>,
    pub message: String,
}

/// Static facts about a sequence datatype
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceTraits {
    pub has_o1_length: bool,
    pub has_o1_unpack: bool,
    pub is_finite: bool,
}

impl Default for SequenceTraits {
    fn default() -> Self {
        Self {
            has_o1_length: false,
            has_o1_unpack: false,
            is_finite: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DispatchRegistry {
    entries: IndexMap<OperationTag, Vec<ImplementationEntry>>,
    defaults: IndexMap<(OperationTag, usize), DefaultImplementation>,
    usage: IndexMap<OperationTag, UsageRule>,
    hierarchy: TagHierarchy,
    traversal_categories: IndexMap<Tag, TraversalCategory>,
    classes: IndexMap<Tag, Tag>,
    sequence_traits: IndexMap<Tag, SequenceTraits>,
    common_datatypes: IndexMap<(Tag, Tag), Tag>,
    pub(crate) typeclasses: IndexMap<String, Typeclass>,
}

impl DispatchRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an implementation entry
    ///
    /// Fails if an entry with the identical pattern already exists.
    pub fn register<F>(
        &mut self,
        operation: impl Into<OperationTag>,
        pattern: Vec<TagPattern>,
        label: impl Into<String>,
        body: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&mut Engine, &[Value]) -> ElabResult<Value> + Send + Sync + 'static,
    {
        self.register_implementation(operation, pattern, label, Implementation::new(body))
    }

    pub fn register_implementation(
        &mut self,
        operation: impl Into<OperationTag>,
        pattern: Vec<TagPattern>,
        label: impl Into<String>,
        body: Implementation,
    ) -> Result<(), RegistryError> {
        let operation = operation.into();
        let entries = self.entries.entry(operation.clone()).or_default();

        if entries.iter().any(|entry| entry.pattern == pattern) {
            return Err(RegistryError::ConflictingImplementation {
                operation: operation.to_string(),
                pattern: join_display(&pattern),
            });
        }

        entries.push(ImplementationEntry {
            operation,
            pattern,
            label: label.into(),
            body,
        });
        Ok(())
    }

    /// Register an entry, replacing any entry with the identical pattern
    pub fn replace<F>(
        &mut self,
        operation: impl Into<OperationTag>,
        pattern: Vec<TagPattern>,
        label: impl Into<String>,
        body: F,
    ) where
        F: Fn(&mut Engine, &[Value]) -> ElabResult<Value> + Send + Sync + 'static,
    {
        let operation = operation.into();
        let entries = self.entries.entry(operation.clone()).or_default();
        entries.retain(|entry| entry.pattern != pattern);
        entries.push(ImplementationEntry {
            operation,
            pattern,
            label: label.into(),
            body: Implementation::new(body),
        });
    }

    /// Register the fallback used when no entry matches at `arity`
    pub fn register_default<F>(
        &mut self,
        operation: impl Into<OperationTag>,
        arity: usize,
        label: impl Into<String>,
        body: F,
    ) where
        F: Fn(&mut Engine, &[Value]) -> ElabResult<Value> + Send + Sync + 'static,
    {
        self.defaults.insert(
            (operation.into(), arity),
            DefaultImplementation::Body {
                label: label.into(),
                body: Implementation::new(body),
            },
        );
    }

    /// Register a default that always fails with `message`
    pub fn register_failing_default(
        &mut self,
        operation: impl Into<OperationTag>,
        arity: usize,
        message: impl Into<String>,
    ) {
        self.defaults.insert(
            (operation.into(), arity),
            DefaultImplementation::Fail {
                message: message.into(),
            },
        );
    }

    /// Restrict the arities `operation` may be called with
    pub fn register_usage(
        &mut self,
        operation: impl Into<OperationTag>,
        arities: Vec<usize>,
        message: impl Into<String>,
    ) {
        self.usage.insert(
            operation.into(),
            UsageRule {
                arities,
                message: message.into(),
            },
        );
    }

    pub fn entries(&self, operation: &OperationTag) -> &[ImplementationEntry] {
        self.entries
            .get(operation)
            .map(|entries| entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn default_for(&self, operation: &OperationTag, arity: usize) -> Option<&DefaultImplementation> {
        self.defaults.get(&(operation.clone(), arity))
    }

    pub fn usage(&self, operation: &OperationTag) -> Option<&UsageRule> {
        self.usage.get(operation)
    }

    /// Every operation that has entries or defaults
    pub fn operations(&self) -> Vec<OperationTag> {
        let mut operations: Vec<OperationTag> = self.entries.keys().cloned().collect();
        for (operation, _) in self.defaults.keys() {
            if !operations.contains(operation) {
                operations.push(operation.clone());
            }
        }
        operations
    }

    pub fn is_operation(&self, name: &str) -> bool {
        let operation = OperationTag::new(name);
        self.entries.contains_key(&operation) || self.defaults.keys().any(|(op, _)| *op == operation)
    }

    // Tag hierarchy

    pub fn add_refinement(&mut self, child: &Tag, parent: &Tag) -> Result<(), RegistryError> {
        self.hierarchy.add_refinement(child, parent)
    }

    pub fn refines(&self, tag: &Tag, ancestor: &Tag) -> bool {
        self.hierarchy.refines(tag, ancestor)
    }

    pub fn hierarchy(&self) -> &TagHierarchy {
        &self.hierarchy
    }

    // Per-tag metadata

    pub fn set_traversal_category(&mut self, tag: &Tag, category: TraversalCategory) {
        self.traversal_categories.insert(tag.clone(), category);
    }

    /// Traversal category of `tag`, inherited from the nearest ancestor
    pub fn traversal_category(&self, tag: &Tag) -> Option<TraversalCategory> {
        self.hierarchy
            .ancestors(tag)
            .iter()
            .find_map(|ancestor| self.traversal_categories.get(ancestor).copied())
    }

    pub fn set_class(&mut self, tag: &Tag, class: &Tag) {
        self.classes.insert(tag.clone(), class.clone());
    }

    /// Class of `tag`, inherited from the nearest ancestor
    pub fn class_of(&self, tag: &Tag) -> Option<Tag> {
        self.hierarchy
            .ancestors(tag)
            .iter()
            .find_map(|ancestor| self.classes.get(ancestor).cloned())
    }

    pub fn set_sequence_traits(&mut self, tag: &Tag, traits: SequenceTraits) {
        self.sequence_traits.insert(tag.clone(), traits);
    }

    pub fn sequence_traits(&self, tag: &Tag) -> SequenceTraits {
        self.hierarchy
            .ancestors(tag)
            .iter()
            .find_map(|ancestor| self.sequence_traits.get(ancestor).copied())
            .unwrap_or_default()
    }

    /// Declare `common` as the datatype both `a` and `b` convert to
    pub fn set_common_datatype(&mut self, a: &Tag, b: &Tag, common: &Tag) {
        self.common_datatypes
            .insert((a.clone(), b.clone()), common.clone());
        self.common_datatypes
            .insert((b.clone(), a.clone()), common.clone());
    }

    pub fn common_datatype(&self, a: &Tag, b: &Tag) -> Option<Tag> {
        if a == b {
            return Some(a.clone());
        }
        self.common_datatypes.get(&(a.clone(), b.clone())).cloned()
    }
}
