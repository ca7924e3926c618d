//! Core value and tag types for the elaboration engine

pub mod constant;
pub mod iterator;
pub mod tags;
pub mod value;

pub use constant::{ConstantKind, StaticConstant};
pub use iterator::IteratorValue;
pub use tags::{OperationTag, Tag, TagHierarchy, TraversalCategory};
pub use value::{FunctionValue, OpaqueValue, SequenceKind, SequenceValue, Value};
