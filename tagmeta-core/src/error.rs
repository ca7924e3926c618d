//! Error types for the tagmeta elaboration engine
//!
//! Following the parser's miette patterns so every failure renders as a
//! diagnostic with a stable code.

use miette::{Diagnostic, NamedSource, SourceSpan};
use tagmeta_parser::ParseError;
use thiserror::Error;

/// Result alias for everything that happens during elaboration
pub type ElabResult<T> = Result<T, ElaborationError>;

/// Top-level error for evaluating meta-language source
#[derive(Error, Diagnostic, Debug)]
#[allow(clippy::result_large_err)]
pub enum TagmetaError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error("Elaboration failed: {source}")]
    #[diagnostic(code(tagmeta::elaborate::failed))]
    Elaboration {
        #[source_code]
        src: NamedSource<String>,
        #[label("while elaborating this form")]
        span: SourceSpan,
        #[diagnostic_source]
        source: ElaborationError,
    },
}

impl TagmetaError {
    /// The elaboration error underneath a located failure, if any
    pub fn elaboration(&self) -> Option<&ElaborationError> {
        match self {
            TagmetaError::Elaboration { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors raised while building or mutating a dispatch registry
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Conflicting implementation of `{operation}` for ({pattern})")]
    #[diagnostic(
        code(tagmeta::registry::conflicting_implementation),
        help("An entry with this exact tag pattern is already registered; use `replace` to override it")
    )]
    ConflictingImplementation { operation: String, pattern: String },

    #[error("Refining `{tag}` by `{parent}` would create a cycle in the tag hierarchy")]
    #[diagnostic(
        code(tagmeta::registry::tag_cycle),
        help("`{parent}` already refines `{tag}`")
    )]
    TagCycle { tag: String, parent: String },

    #[error("Instance {typeclass}<{tags}> is incomplete: missing {}", .missing.join(", "))]
    #[diagnostic(
        code(tagmeta::registry::incomplete_instance),
        help("Provide one of the minimal complete definitions: {alternatives}")
    )]
    IncompleteInstance {
        typeclass: String,
        tags: String,
        missing: Vec<String>,
        alternatives: String,
    },

    #[error("Unknown typeclass `{name}`")]
    #[diagnostic(code(tagmeta::registry::unknown_typeclass))]
    UnknownTypeclass { name: String },

    #[error("`{operation}` is not a method of typeclass {typeclass}")]
    #[diagnostic(code(tagmeta::registry::unknown_method))]
    UnknownMethod { typeclass: String, operation: String },

    #[error("Typeclass {typeclass} takes {expected} datatype parameters, found {found}")]
    #[diagnostic(code(tagmeta::registry::parameter_count))]
    ParameterCount {
        typeclass: String,
        expected: usize,
        found: usize,
    },
}

/// Errors raised while elaborating an operation
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ElaborationError {
    #[error("No implementation of `{operation}` for ({tags})")]
    #[diagnostic(
        code(tagmeta::elaborate::no_implementation),
        help("Register an implementation of `{operation}` for these tags, a category they refine, or a default")
    )]
    NoImplementation { operation: String, tags: String },

    #[error("Ambiguous dispatch of `{operation}` for ({tags}): {}", .candidates.join(" and "))]
    #[diagnostic(
        code(tagmeta::elaborate::ambiguous),
        help("Register an entry that is more specific than every candidate")
    )]
    Ambiguous {
        operation: String,
        tags: String,
        candidates: Vec<String>,
    },

    #[error("`{operation}` is not supported for ({tags}): {message}")]
    #[diagnostic(code(tagmeta::elaborate::unsupported))]
    Unsupported {
        operation: String,
        tags: String,
        message: String,
    },

    #[error("Invalid usage of `{operation}`: {message}")]
    #[diagnostic(code(tagmeta::elaborate::usage))]
    Usage { operation: String, message: String },

    #[error("Trying to access a sequence at index {index}, which is out of bounds")]
    #[diagnostic(code(tagmeta::elaborate::index_out_of_bounds))]
    IndexOutOfBounds { index: i64 },

    #[error("No element with key {key} in the associative sequence")]
    #[diagnostic(
        code(tagmeta::elaborate::key_not_found),
        help("Pass a third argument to `at` to get a default instead")
    )]
    KeyNotFound { key: String },

    #[error("Cannot select an `at` implementation for {sequence}: unknown traversal category")]
    #[diagnostic(code(tagmeta::elaborate::unknown_traversal_category))]
    UnknownTraversalCategory { sequence: String },

    #[error("`{operation}` requires a non-empty sequence")]
    #[diagnostic(code(tagmeta::elaborate::empty_sequence))]
    EmptySequence { operation: String },

    #[error("Cannot dereference past-the-end iterator {iterator}")]
    #[diagnostic(code(tagmeta::elaborate::not_dereferenceable))]
    NotDereferenceable { iterator: String },

    #[error("Cannot increment past-the-end iterator {iterator}")]
    #[diagnostic(code(tagmeta::elaborate::not_incrementable))]
    NotIncrementable { iterator: String },

    #[error("Iterator position {position} is outside a sequence of length {length}")]
    #[diagnostic(code(tagmeta::elaborate::iterator_out_of_range))]
    IteratorOutOfRange { position: i64, length: usize },

    #[error("Cannot advance a forward iterator by negative distance {distance}")]
    #[diagnostic(code(tagmeta::elaborate::negative_advance))]
    NegativeAdvance { distance: i64 },

    #[error("`undefined` was evaluated")]
    #[diagnostic(
        code(tagmeta::elaborate::undefined),
        help("Lazy operations such as `and_`, `or_` and chained comparisons only evaluate the operands they need")
    )]
    UndefinedEvaluated,

    #[error("Expected a boolean-convertible constant, found {found}")]
    #[diagnostic(code(tagmeta::elaborate::not_a_boolean_constant))]
    NotABooleanConstant { found: String },

    #[error("`{operation}` expected {expected}, found {found}")]
    #[diagnostic(code(tagmeta::elaborate::type_mismatch))]
    TypeMismatch {
        operation: String,
        expected: String,
        found: String,
    },

    #[error("Division by zero in `{operation}`")]
    #[diagnostic(code(tagmeta::elaborate::division_by_zero))]
    DivisionByZero { operation: String },

    #[error("Elaboration exceeded the maximum depth of {limit}")]
    #[diagnostic(
        code(tagmeta::elaborate::recursion_limit),
        help("Raise `max_depth` or check for an operation that dispatches back to itself")
    )]
    RecursionLimit { limit: usize },

    #[error("Sequence traversal exceeded the maximum length of {limit}")]
    #[diagnostic(
        code(tagmeta::elaborate::sequence_too_long),
        help("Raise `max_sequence_length` if the sequence is genuinely this long")
    )]
    SequenceTooLong { limit: usize },

    #[error("`{operation}` cannot be applied to infinite sequence {sequence}")]
    #[diagnostic(code(tagmeta::elaborate::infinite_sequence))]
    InfiniteSequence { operation: String, sequence: String },

    #[error("`{name}` is neither an operation nor a constructor")]
    #[diagnostic(code(tagmeta::elaborate::unknown_operation))]
    UnknownOperation { name: String },

    #[error("Placeholder _{index} has no argument")]
    #[diagnostic(code(tagmeta::elaborate::unbound_placeholder))]
    UnboundPlaceholder { index: u8 },

    #[error("Assertion failed: {message}")]
    #[diagnostic(code(tagmeta::elaborate::assertion_failed))]
    AssertionFailed { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),
}

impl ElaborationError {
    /// Create a type mismatch error for `operation`
    pub fn type_mismatch(
        operation: impl Into<String>,
        expected: impl Into<String>,
        found: impl std::fmt::Display,
    ) -> Self {
        ElaborationError::TypeMismatch {
            operation: operation.into(),
            expected: expected.into(),
            found: found.to_string(),
        }
    }

    /// Create a usage error for `operation`
    pub fn usage(operation: impl Into<String>, message: impl Into<String>) -> Self {
        ElaborationError::Usage {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_message_lists_candidates() {
        let error = ElaborationError::Ambiguous {
            operation: "length".to_string(),
            tags: "foo".to_string(),
            candidates: vec!["length@a".to_string(), "length@b".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Ambiguous dispatch of `length` for (foo): length@a and length@b"
        );
    }

    #[test]
    fn test_registry_error_is_transparent() {
        let error: ElaborationError = RegistryError::UnknownTypeclass {
            name: "Monad".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Unknown typeclass `Monad`");
        assert_eq!(
            error.code().map(|c| c.to_string()),
            Some("tagmeta::registry::unknown_typeclass".to_string())
        );
    }
}
