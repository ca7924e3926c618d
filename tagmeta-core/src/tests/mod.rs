//! Behavioural tests for the elaboration engine
//!
//! Unit tests for individual modules live next to them; these exercise the
//! prelude end to end through `Engine`.

// Dispatch and typeclasses
mod test_dispatch_specificity;
mod test_logical_short_circuit;

// Sequences
mod test_sequence_derivation;
mod test_associative_lookup;
mod test_iterators;

mod test_evaluator;
