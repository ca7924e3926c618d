//! Meta-level values
//!
//! Values are immutable and structurally comparable. Two values are
//! `is_same` exactly when they are `==`, which also makes them usable as
//! memoization keys.

use super::constant::StaticConstant;
use super::iterator::IteratorValue;
use super::tags::{self, OperationTag, Tag};
use crate::expr::Expr;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// An opaque type, optionally opting into dispatch with a tag
    Opaque(OpaqueValue),
    Constant(StaticConstant),
    Pair(Arc<Value>, Arc<Value>),
    Sequence(SequenceValue),
    Iterator(IteratorValue),
    Function(FunctionValue),
    Tag(Tag),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpaqueValue {
    pub name: Arc<str>,
    pub tag: Option<Tag>,
}

/// The built-in sequence datatypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    List,
    MinimalSequence,
    Vector,
    Map,
    SingleElement,
}

impl SequenceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SequenceKind::List => "list",
            SequenceKind::MinimalSequence => "minimal_sequence",
            SequenceKind::Vector => "vector",
            SequenceKind::Map => "map",
            SequenceKind::SingleElement => "single_element",
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            SequenceKind::List => tags::LIST.clone(),
            SequenceKind::MinimalSequence => tags::MINIMAL_SEQUENCE.clone(),
            SequenceKind::Vector => tags::VECTOR.clone(),
            SequenceKind::Map => tags::MAP.clone(),
            SequenceKind::SingleElement => tags::SINGLE_ELEMENT.clone(),
        }
    }

    /// Tag of iterators that index into this kind of sequence
    pub fn iterator_tag(&self) -> Tag {
        match self {
            SequenceKind::Vector => tags::VECTOR_ITERATOR.clone(),
            SequenceKind::Map => tags::MAP_ITERATOR.clone(),
            SequenceKind::SingleElement => tags::SINGLE_ELEMENT_ITERATOR.clone(),
            SequenceKind::List | SequenceKind::MinimalSequence => tags::CONS_ITERATOR.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceValue {
    pub kind: SequenceKind,
    pub elements: Arc<[Value]>,
}

impl SequenceValue {
    pub fn new(kind: SequenceKind, elements: Vec<Value>) -> Self {
        Self {
            kind,
            elements: Arc::from(elements),
        }
    }

    /// Rebuild a sequence of `kind` from elements
    ///
    /// Maps keep the first element for each key.
    pub fn from_elements(kind: SequenceKind, elements: Vec<Value>) -> Self {
        if kind != SequenceKind::Map {
            return Self::new(kind, elements);
        }

        let mut unique: Vec<Value> = Vec::with_capacity(elements.len());
        for element in elements {
            let duplicate = match element.pair_key() {
                Some(key) => unique.iter().any(|kept| kept.pair_key() == Some(key)),
                None => false,
            };
            if !duplicate {
                unique.push(element);
            }
        }
        Self::new(kind, unique)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn tag(&self) -> Tag {
        self.kind.tag()
    }

    /// The same kind of sequence minus its first element
    pub fn rest(&self) -> SequenceValue {
        let rest = self.elements.iter().skip(1).cloned().collect();
        SequenceValue::new(self.kind, rest)
    }
}

/// A metafunction value passed to `unpack`, `find_if` and `apply`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FunctionValue {
    /// `(quote op)`: an operation or constructor by name
    Quoted(OperationTag),
    /// `(lambda body)`: a body whose `_N` placeholders bind to arguments
    Lambda(Arc<Expr>),
}

impl Value {
    pub fn int(value: i64) -> Self {
        Value::Constant(StaticConstant::int(value))
    }

    pub fn long(value: i64) -> Self {
        Value::Constant(StaticConstant::long(value))
    }

    pub fn size_t(value: usize) -> Self {
        Value::Constant(StaticConstant::size_t(value))
    }

    pub fn bool(value: bool) -> Self {
        Value::Constant(StaticConstant::bool(value))
    }

    /// An untagged opaque type
    pub fn opaque(name: impl AsRef<str>) -> Self {
        Value::Opaque(OpaqueValue {
            name: Arc::from(name.as_ref()),
            tag: None,
        })
    }

    /// An opaque type that dispatches as `tag`
    pub fn tagged(name: impl AsRef<str>, tag: Tag) -> Self {
        Value::Opaque(OpaqueValue {
            name: Arc::from(name.as_ref()),
            tag: Some(tag),
        })
    }

    pub fn pair(first: Value, second: Value) -> Self {
        Value::Pair(Arc::new(first), Arc::new(second))
    }

    pub fn sequence(kind: SequenceKind, elements: Vec<Value>) -> Self {
        Value::Sequence(SequenceValue::from_elements(kind, elements))
    }

    pub fn list(elements: Vec<Value>) -> Self {
        Self::sequence(SequenceKind::List, elements)
    }

    pub fn vector(elements: Vec<Value>) -> Self {
        Self::sequence(SequenceKind::Vector, elements)
    }

    pub fn minimal_sequence(elements: Vec<Value>) -> Self {
        Self::sequence(SequenceKind::MinimalSequence, elements)
    }

    pub fn single_element(element: Value) -> Self {
        Self::sequence(SequenceKind::SingleElement, vec![element])
    }

    /// A map from key/value pairs, first occurrence of a key wins
    pub fn map(entries: Vec<(Value, Value)>) -> Self {
        let pairs = entries
            .into_iter()
            .map(|(key, value)| Value::pair(key, value))
            .collect();
        Self::sequence(SequenceKind::Map, pairs)
    }

    pub fn quote(operation: impl Into<OperationTag>) -> Self {
        Value::Function(FunctionValue::Quoted(operation.into()))
    }

    pub fn lambda(body: Expr) -> Self {
        Value::Function(FunctionValue::Lambda(Arc::new(body)))
    }

    /// The tag this value dispatches on
    pub fn tag(&self) -> Tag {
        match self {
            Value::Opaque(opaque) => opaque.tag.clone().unwrap_or_else(|| tags::NO_TAG.clone()),
            Value::Constant(_) => tags::STATIC_CONSTANT.clone(),
            Value::Pair(_, _) => tags::PAIR.clone(),
            Value::Sequence(sequence) => sequence.tag(),
            Value::Iterator(iterator) => iterator.tag(),
            Value::Function(_) => tags::METAFUNCTION.clone(),
            Value::Tag(_) => tags::TAG.clone(),
        }
    }

    pub fn as_constant(&self) -> Option<&StaticConstant> {
        match self {
            Value::Constant(constant) => Some(constant),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SequenceValue> {
        match self {
            Value::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    pub fn as_iterator(&self) -> Option<&IteratorValue> {
        match self {
            Value::Iterator(iterator) => Some(iterator),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionValue> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&Value, &Value)> {
        match self {
            Value::Pair(first, second) => Some((first, second)),
            _ => None,
        }
    }

    /// First component of a pair
    pub fn pair_key(&self) -> Option<&Value> {
        self.as_pair().map(|(key, _)| key)
    }
}

impl From<StaticConstant> for Value {
    fn from(constant: StaticConstant) -> Self {
        Value::Constant(constant)
    }
}

impl From<Tag> for Value {
    fn from(tag: Tag) -> Self {
        Value::Tag(tag)
    }
}

fn write_elements(f: &mut fmt::Formatter<'_>, elements: &[Value]) -> fmt::Result {
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{element}")?;
    }
    Ok(())
}

impl fmt::Display for SequenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SequenceKind::List => {
                write!(f, "[")?;
                write_elements(f, &self.elements)?;
                write!(f, "]")
            }
            kind => {
                write!(f, "({}", kind.name())?;
                if !self.elements.is_empty() {
                    write!(f, " ")?;
                }
                write_elements(f, &self.elements)?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Opaque(opaque) => match &opaque.tag {
                Some(tag) => write!(f, "(tagged {} {})", opaque.name, tag),
                None => write!(f, "{}", opaque.name),
            },
            Value::Constant(constant) => write!(f, "{constant}"),
            Value::Pair(first, second) => write!(f, "(pair {first} {second})"),
            Value::Sequence(sequence) => write!(f, "{sequence}"),
            Value::Iterator(iterator) => write!(f, "{iterator}"),
            Value::Function(FunctionValue::Quoted(op)) => write!(f, "(quote {op})"),
            Value::Function(FunctionValue::Lambda(body)) => write!(f, "(lambda {body})"),
            Value::Tag(tag) => write!(f, "(tag {tag})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_keeps_first_key() {
        let map = Value::map(vec![
            (Value::opaque("k0"), Value::opaque("v0")),
            (Value::opaque("k0"), Value::opaque("v1")),
            (Value::opaque("k1"), Value::opaque("v2")),
        ]);

        assert_eq!(
            map.to_string(),
            "(map (pair k0 v0) (pair k1 v2))"
        );
    }

    #[test]
    fn test_tags_of_values() {
        assert_eq!(Value::int(1).tag(), *tags::STATIC_CONSTANT);
        assert_eq!(Value::opaque("x").tag(), *tags::NO_TAG);
        assert_eq!(Value::tagged("x", Tag::new("foo")).tag(), Tag::new("foo"));
        assert_eq!(Value::list(vec![]).tag(), *tags::LIST);
    }

    #[test]
    fn test_list_display() {
        let list = Value::list(vec![Value::opaque("a"), Value::int(2)]);
        assert_eq!(list.to_string(), "[a 2]");
        assert_eq!(Value::vector(vec![]).to_string(), "(vector)");
    }
}
