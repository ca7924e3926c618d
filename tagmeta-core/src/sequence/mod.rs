//! Generic sequence operations
//!
//! A sequence datatype implements one of two minimal interfaces:
//!
//! - cons: `head`, `tail` and `is_empty`
//! - iterator: `begin` and `end`, with `next`/`deref` on its iterators
//!
//! Everything else (`length`, `at`, `last`, `unpack`, `find_if`, ...) is
//! derived here from whichever interface is present, and is registered at
//! the `sequence` category so datatypes can override it with an entry for
//! their own tag. Every traversal is an explicit loop bounded by
//! `max_sequence_length`.

pub mod algorithms;
pub mod associative;
pub mod cons;
pub mod iterator;

use crate::engine::Engine;
use crate::error::{ElabResult, ElaborationError, RegistryError};
use crate::registry::DispatchRegistry;
use crate::types::{SequenceKind, SequenceValue, Value};

/// Whether `sequence` natively implements `head`/`tail`/`is_empty`
pub(crate) fn is_cons(engine: &Engine, sequence: &Value) -> bool {
    let args = std::slice::from_ref(sequence);
    engine.has_entry("is_empty", args) && engine.has_entry("head", args) && engine.has_entry("tail", args)
}

/// Whether `sequence` natively implements `begin`/`end`
pub(crate) fn has_iterators(engine: &Engine, sequence: &Value) -> bool {
    let args = std::slice::from_ref(sequence);
    engine.has_entry("begin", args) && engine.has_entry("end", args)
}

/// Fail on sequences marked infinite
pub(crate) fn require_finite(engine: &Engine, operation: &str, sequence: &Value) -> ElabResult<()> {
    if engine.registry().sequence_traits(&sequence.tag()).is_finite {
        Ok(())
    } else {
        Err(ElaborationError::InfiniteSequence {
            operation: operation.to_string(),
            sequence: sequence.to_string(),
        })
    }
}

/// Read an index or distance argument
pub(crate) fn integer_argument(operation: &str, value: &Value) -> ElabResult<i64> {
    value
        .as_constant()
        .map(|constant| constant.value)
        .ok_or_else(|| ElaborationError::type_mismatch(operation, "a static constant", value))
}

/// Build a sequence of the same datatype as `like` from `elements`
///
/// Sequences that are not built-in datatypes come back as lists.
pub(crate) fn rebuild(like: &Value, elements: Vec<Value>) -> Value {
    let kind = like
        .as_sequence()
        .map(|sequence| sequence.kind)
        .unwrap_or(SequenceKind::List);
    let kind = match kind {
        // A single element sequence cannot hold anything else
        SequenceKind::SingleElement if elements.len() != 1 => SequenceKind::List,
        kind => kind,
    };
    Value::Sequence(SequenceValue::from_elements(kind, elements))
}

enum WalkState {
    Cons(Value),
    Iterator { current: Value, end: Value },
}

/// Visits the elements of a sequence through its minimal interface
pub(crate) struct Walker {
    state: WalkState,
    visited: usize,
    limit: usize,
}

impl Walker {
    pub(crate) fn new(engine: &mut Engine, sequence: &Value) -> ElabResult<Self> {
        let state = if is_cons(engine, sequence) {
            WalkState::Cons(sequence.clone())
        } else {
            let args = std::slice::from_ref(sequence);
            WalkState::Iterator {
                current: engine.call("begin", args)?,
                end: engine.call("end", args)?,
            }
        };

        Ok(Self {
            state,
            visited: 0,
            limit: engine.config().max_sequence_length,
        })
    }

    /// Walk a sequence that will be traversed to its end
    pub(crate) fn finite(engine: &mut Engine, operation: &str, sequence: &Value) -> ElabResult<Self> {
        require_finite(engine, operation, sequence)?;
        Self::new(engine, sequence)
    }

    pub(crate) fn next_element(&mut self, engine: &mut Engine) -> ElabResult<Option<Value>> {
        let element = match &mut self.state {
            WalkState::Cons(remaining) => {
                let args = std::slice::from_ref(remaining);
                if engine.call_bool("is_empty", args)? {
                    return Ok(None);
                }
                let head = engine.call("head", args)?;
                *remaining = engine.call("tail", args)?;
                head
            }
            WalkState::Iterator { current, end } => {
                if engine.call_bool("equal", &[current.clone(), end.clone()])? {
                    return Ok(None);
                }
                let args = std::slice::from_ref(current);
                let element = engine.call("deref", args)?;
                *current = engine.call("next", args)?;
                element
            }
        };

        self.visited += 1;
        if self.visited > self.limit {
            return Err(ElaborationError::SequenceTooLong { limit: self.limit });
        }
        Ok(Some(element))
    }

    pub(crate) fn collect(mut self, engine: &mut Engine) -> ElabResult<Vec<Value>> {
        let mut elements = Vec::new();
        while let Some(element) = self.next_element(engine)? {
            elements.push(element);
        }
        Ok(elements)
    }
}

/// Every element of a finite sequence, in order
pub(crate) fn elements(engine: &mut Engine, operation: &str, sequence: &Value) -> ElabResult<Vec<Value>> {
    Walker::finite(engine, operation, sequence)?.collect(engine)
}

pub fn register(registry: &mut DispatchRegistry) -> Result<(), RegistryError> {
    cons::register(registry)?;
    iterator::register(registry)?;
    algorithms::register(registry)?;
    associative::register(registry)?;
    Ok(())
}
