//! Tags, operation names and the tag refinement hierarchy
//!
//! A tag names the datatype a value belongs to. Tags form a DAG under
//! refinement (`vector` refines `random_access_sequence` refines `sequence`),
//! which dispatch uses to rank implementation entries.

use crate::error::RegistryError;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use std::fmt;
use std::sync::Arc;

/// Interned datatype tag
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(Arc<str>);

impl Tag {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Tag::new(name)
    }
}

/// Name of a dispatched operation such as `head` or `less`
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationTag(Arc<str>);

impl OperationTag {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OperationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperationTag({})", self.0)
    }
}

impl fmt::Display for OperationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OperationTag {
    fn from(name: &str) -> Self {
        OperationTag::new(name)
    }
}

impl From<&OperationTag> for OperationTag {
    fn from(op: &OperationTag) -> Self {
        op.clone()
    }
}

lazy_static! {
    /// Tag of values that do not opt into tag dispatch
    pub static ref NO_TAG: Tag = Tag::new("no_tag");
    /// Class of tags nobody assigned a class to
    pub static ref DEFAULT_CLASS: Tag = Tag::new("default_class");

    // Sequence categories
    pub static ref SEQUENCE: Tag = Tag::new("sequence");
    pub static ref RANDOM_ACCESS_SEQUENCE: Tag = Tag::new("random_access_sequence");
    pub static ref ASSOCIATIVE_SEQUENCE: Tag = Tag::new("associative_sequence");

    // Iterator categories
    pub static ref ITERATOR: Tag = Tag::new("iterator");
    pub static ref FORWARD_ITERATOR: Tag = Tag::new("forward_iterator");
    pub static ref BIDIRECTIONAL_ITERATOR: Tag = Tag::new("bidirectional_iterator");
    pub static ref RANDOM_ACCESS_ITERATOR: Tag = Tag::new("random_access_iterator");

    // Built-in datatypes
    pub static ref LIST: Tag = Tag::new("list");
    pub static ref MINIMAL_SEQUENCE: Tag = Tag::new("minimal_sequence");
    pub static ref VECTOR: Tag = Tag::new("vector");
    pub static ref MAP: Tag = Tag::new("map");
    pub static ref SINGLE_ELEMENT: Tag = Tag::new("single_element");
    pub static ref STATIC_CONSTANT: Tag = Tag::new("static_constant");
    pub static ref PAIR: Tag = Tag::new("pair");
    pub static ref METAFUNCTION: Tag = Tag::new("metafunction");
    pub static ref TAG: Tag = Tag::new("tag");

    // Built-in iterator datatypes
    pub static ref CONS_ITERATOR: Tag = Tag::new("cons_iterator");
    pub static ref VECTOR_ITERATOR: Tag = Tag::new("vector_iterator");
    pub static ref MAP_ITERATOR: Tag = Tag::new("map_iterator");
    pub static ref SINGLE_ELEMENT_ITERATOR: Tag = Tag::new("single_element_iterator");

    // Classes
    pub static ref SEQUENCE_CLASS: Tag = Tag::new("Sequence");
    pub static ref ITERATOR_CLASS: Tag = Tag::new("Iterator");
    pub static ref STATIC_CONSTANT_CLASS: Tag = Tag::new("StaticConstant");
    pub static ref PAIR_CLASS: Tag = Tag::new("Pair");
    pub static ref METAFUNCTION_CLASS: Tag = Tag::new("Metafunction");
    pub static ref TAG_CLASS: Tag = Tag::new("Tag");
}

/// How a sequence or iterator can be traversed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalCategory {
    Forward,
    Bidirectional,
    RandomAccess,
    Associative,
}

impl TraversalCategory {
    pub fn name(&self) -> &'static str {
        match self {
            TraversalCategory::Forward => "forward",
            TraversalCategory::Bidirectional => "bidirectional",
            TraversalCategory::RandomAccess => "random_access",
            TraversalCategory::Associative => "associative",
        }
    }

    /// Tag value reported by `traversal_category_of`
    pub fn as_tag(&self) -> Tag {
        Tag::new(self.name())
    }

    /// Whether positions can be jumped to in constant time
    pub fn is_random_access(&self) -> bool {
        matches!(self, TraversalCategory::RandomAccess)
    }
}

impl fmt::Display for TraversalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Refinement DAG over tags, child -> parent edges
#[derive(Debug, Clone, Default)]
pub struct TagHierarchy {
    graph: DiGraph<Tag, ()>,
    nodes: IndexMap<Tag, NodeIndex>,
}

impl TagHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, tag: &Tag) -> NodeIndex {
        if let Some(index) = self.nodes.get(tag) {
            return *index;
        }
        let index = self.graph.add_node(tag.clone());
        self.nodes.insert(tag.clone(), index);
        index
    }

    /// Declare that `child` refines `parent`
    pub fn add_refinement(&mut self, child: &Tag, parent: &Tag) -> Result<(), RegistryError> {
        if self.refines(parent, child) {
            return Err(RegistryError::TagCycle {
                tag: child.to_string(),
                parent: parent.to_string(),
            });
        }

        let child_index = self.node(child);
        let parent_index = self.node(parent);
        self.graph.update_edge(child_index, parent_index, ());
        Ok(())
    }

    /// Reflexive, transitive refinement check
    pub fn refines(&self, tag: &Tag, ancestor: &Tag) -> bool {
        if tag == ancestor {
            return true;
        }
        match (self.nodes.get(tag), self.nodes.get(ancestor)) {
            (Some(from), Some(to)) => has_path_connecting(&self.graph, *from, *to, None),
            _ => false,
        }
    }

    /// Direct parents of `tag`
    pub fn parents(&self, tag: &Tag) -> Vec<Tag> {
        let Some(index) = self.nodes.get(tag) else {
            return Vec::new();
        };
        let mut parents: Vec<Tag> = self
            .graph
            .neighbors(*index)
            .map(|parent| self.graph[parent].clone())
            .collect();
        // petgraph yields neighbours newest first
        parents.reverse();
        parents
    }

    /// `tag` followed by all of its ancestors, nearest first
    pub fn ancestors(&self, tag: &Tag) -> Vec<Tag> {
        let Some(index) = self.nodes.get(tag) else {
            return vec![tag.clone()];
        };
        let mut bfs = Bfs::new(&self.graph, *index);
        let mut ancestors = Vec::new();
        while let Some(node) = bfs.next(&self.graph) {
            ancestors.push(self.graph[node].clone());
        }
        ancestors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refinement_is_transitive_and_reflexive() {
        let mut hierarchy = TagHierarchy::new();
        hierarchy.add_refinement(&VECTOR, &RANDOM_ACCESS_SEQUENCE).unwrap();
        hierarchy
            .add_refinement(&RANDOM_ACCESS_SEQUENCE, &SEQUENCE)
            .unwrap();

        assert!(hierarchy.refines(&VECTOR, &SEQUENCE));
        assert!(hierarchy.refines(&VECTOR, &VECTOR));
        assert!(!hierarchy.refines(&SEQUENCE, &VECTOR));
        assert!(!hierarchy.refines(&LIST, &SEQUENCE));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let mut hierarchy = TagHierarchy::new();
        hierarchy.add_refinement(&Tag::new("a"), &Tag::new("b")).unwrap();
        hierarchy.add_refinement(&Tag::new("b"), &Tag::new("c")).unwrap();

        let result = hierarchy.add_refinement(&Tag::new("c"), &Tag::new("a"));
        assert!(matches!(result, Err(RegistryError::TagCycle { .. })));
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let mut hierarchy = TagHierarchy::new();
        hierarchy.add_refinement(&MAP, &ASSOCIATIVE_SEQUENCE).unwrap();
        hierarchy.add_refinement(&ASSOCIATIVE_SEQUENCE, &SEQUENCE).unwrap();

        assert_eq!(
            hierarchy.ancestors(&MAP),
            vec![MAP.clone(), ASSOCIATIVE_SEQUENCE.clone(), SEQUENCE.clone()]
        );
        assert_eq!(hierarchy.parents(&MAP), vec![ASSOCIATIVE_SEQUENCE.clone()]);
    }
}
