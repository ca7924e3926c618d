//! tagmeta core
//!
//! A meta-level elaborator for tag-dispatched generic programming. Values
//! carry tags, operations dispatch on the tags of their arguments, and
//! typeclasses group operations with derived defaults.
//!
//! ## Architecture
//!
//! - **Dispatch Registry**: implementation entries keyed by operation and tag
//!   pattern, per-arity defaults and the tag refinement hierarchy
//! - **Dispatch Resolver**: picks the unique most specific entry, retrying
//!   with a common datatype before falling back to the default
//! - **Typeclasses**: method sets with minimal complete definitions; an
//!   instance fills in every method it does not supply from the derivations
//! - **Sequences**: the cons and iterator interfaces, bridged in both
//!   directions, with generic algorithms that datatypes may override
//! - **Engine**: memoized, depth-limited elaboration plus the evaluator for
//!   the s-expression meta-language

pub mod config;
pub mod core_library;
pub mod datatypes;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod expr;
pub mod registry;
pub mod sequence;
pub mod typeclass;
pub mod types;

// Re-export public API
pub use config::EngineConfig;
pub use dispatch::{DispatchResolver, DispatchResult, Resolution, ResolutionKind};
pub use engine::{CacheStats, Engine};
pub use error::{ElabResult, ElaborationError, RegistryError, TagmetaError};
pub use expr::Expr;
pub use registry::{DispatchRegistry, SequenceTraits, TagPattern};
pub use typeclass::{Instance, Typeclass};
pub use types::{OperationTag, StaticConstant, Tag, TraversalCategory, Value};

#[cfg(test)]
mod tests;
