//! Iterator values
//!
//! Indexed iterators point into a random-access or associative sequence.
//! Cursors walk sequences that only expose `head`/`tail`/`is_empty`, with
//! `ConsEnd` as the shared past-the-end position.

use super::tags::{self, Tag};
use super::value::{SequenceValue, Value};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IteratorValue {
    Indexed {
        sequence: SequenceValue,
        position: usize,
    },
    /// Points at the first element of `remaining`, which is never empty
    Cursor { remaining: Arc<Value> },
    ConsEnd,
}

impl IteratorValue {
    pub fn indexed(sequence: SequenceValue, position: usize) -> Self {
        IteratorValue::Indexed { sequence, position }
    }

    pub fn cursor(remaining: Value) -> Self {
        IteratorValue::Cursor {
            remaining: Arc::new(remaining),
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            IteratorValue::Indexed { sequence, .. } => sequence.kind.iterator_tag(),
            IteratorValue::Cursor { .. } | IteratorValue::ConsEnd => tags::CONS_ITERATOR.clone(),
        }
    }

    pub fn is_past_the_end(&self) -> bool {
        match self {
            IteratorValue::Indexed { sequence, position } => *position >= sequence.len(),
            IteratorValue::Cursor { .. } => false,
            IteratorValue::ConsEnd => true,
        }
    }
}

impl From<IteratorValue> for Value {
    fn from(iterator: IteratorValue) -> Self {
        Value::Iterator(iterator)
    }
}

impl fmt::Display for IteratorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IteratorValue::Indexed { sequence, position } => {
                write!(f, "(iterator {sequence} {position})")
            }
            IteratorValue::Cursor { remaining } => write!(f, "(iterator {remaining})"),
            IteratorValue::ConsEnd => write!(f, "(iterator end)"),
        }
    }
}
