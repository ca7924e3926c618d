//! The elaboration engine
//!
//! Owns a dispatch registry (cloned from the prelude), the configuration
//! limits, top-level bindings and the memoization cache. Every operation
//! invocation goes through [`Engine::call`], which enforces the depth
//! guard, consults the cache and dispatches on the argument tags.

use crate::config::EngineConfig;
use crate::core_library;
use crate::dispatch::{DispatchResolver, DispatchResult};
use crate::error::{ElabResult, ElaborationError};
use crate::registry::DispatchRegistry;
use crate::types::tags;
use crate::types::{FunctionValue, OperationTag, Tag, TraversalCategory, Value};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Cache statistics reported by [`Engine::stats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug, Default)]
struct ElaborationCache {
    results: HashMap<(OperationTag, Vec<Value>), Value>,
    hits: u64,
    misses: u64,
}

impl ElaborationCache {
    fn get(&mut self, operation: &OperationTag, args: &[Value]) -> Option<Value> {
        let key = (operation.clone(), args.to_vec());
        match self.results.get(&key) {
            Some(value) => {
                self.hits += 1;
                Some(value.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    fn insert(&mut self, operation: OperationTag, args: Vec<Value>, value: Value) {
        self.results.insert((operation, args), value);
    }

    fn clear(&mut self) {
        self.results.clear();
    }
}

pub struct Engine {
    registry: DispatchRegistry,
    config: EngineConfig,
    bindings: IndexMap<Arc<str>, Value>,
    cache: ElaborationCache,
    depth: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine over the built-in prelude with default limits
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_registry(core_library::prelude(), config)
    }

    /// Create an engine over an arbitrary registry
    pub fn with_registry(registry: DispatchRegistry, config: EngineConfig) -> Self {
        Self {
            registry,
            config,
            bindings: IndexMap::new(),
            cache: ElaborationCache::default(),
            depth: 0,
        }
    }

    pub fn registry(&self) -> &DispatchRegistry {
        &self.registry
    }

    /// Mutable access to the registry
    ///
    /// Cached results may depend on the old registry, so the cache is cleared.
    pub fn registry_mut(&mut self) -> &mut DispatchRegistry {
        self.cache.clear();
        &mut self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.cache.hits,
            misses: self.cache.misses,
            entries: self.cache.results.len(),
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    // Bindings

    pub fn bind(&mut self, name: &str, value: Value) {
        // Lambdas may read bindings, so earlier results can go stale
        self.cache.clear();
        self.bindings.insert(Arc::from(name), value);
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(name, value)| (name.as_ref(), value))
    }

    pub fn clear_bindings(&mut self) {
        self.cache.clear();
        self.bindings.clear();
    }

    // Tag queries

    pub fn tag_of(&self, value: &Value) -> Tag {
        value.tag()
    }

    pub fn class_of(&self, value: &Value) -> Tag {
        self.registry
            .class_of(&value.tag())
            .unwrap_or_else(|| tags::DEFAULT_CLASS.clone())
    }

    pub fn traversal_category_of(&self, value: &Value) -> Option<TraversalCategory> {
        self.registry.traversal_category(&value.tag())
    }

    // Dispatch

    /// Resolve `operation` for `args` without invoking it
    pub fn resolve(&self, operation: &OperationTag, args: &[Value]) -> DispatchResult {
        let tags: Vec<Tag> = args.iter().map(Value::tag).collect();
        DispatchResolver::new(&self.registry).resolve(operation, &tags)
    }

    /// Whether a registered entry (as opposed to a default) handles the call
    pub fn has_entry(&self, operation: &str, args: &[Value]) -> bool {
        self.resolve(&OperationTag::new(operation), args).is_entry()
    }

    /// Run `f` one level deeper, failing once `max_depth` is exceeded
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Engine) -> ElabResult<T>,
    ) -> ElabResult<T> {
        if self.depth >= self.config.max_depth {
            return Err(ElaborationError::RecursionLimit {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Invoke `operation` on `args`
    pub fn call(&mut self, operation: impl Into<OperationTag>, args: &[Value]) -> ElabResult<Value> {
        let operation = operation.into();

        if let Some(rule) = self.registry.usage(&operation) {
            if !rule.arities.contains(&args.len()) {
                return Err(ElaborationError::usage(operation.as_str(), rule.message.clone()));
            }
        }

        if self.config.memoize {
            if let Some(value) = self.cache.get(&operation, args) {
                trace!(operation = %operation, "cache hit");
                return Ok(value);
            }
        }

        let value = self.nested(|engine| engine.dispatch(&operation, args))?;

        if self.config.memoize {
            self.cache.insert(operation, args.to_vec(), value.clone());
        }
        Ok(value)
    }

    fn dispatch(&mut self, operation: &OperationTag, args: &[Value]) -> ElabResult<Value> {
        let result = self.resolve(operation, args);
        if let DispatchResult::Ambiguous { candidates, .. } = &result {
            warn!(operation = %operation, ?candidates, "ambiguous dispatch");
        }

        let resolution = result.into_result()?;
        debug!(
            operation = %operation,
            implementation = %resolution.label,
            depth = self.depth,
            "resolved"
        );
        resolution.body.invoke(self, args)
    }

    /// Invoke an operation and read its result as a boolean constant
    pub fn call_bool(&mut self, operation: impl Into<OperationTag>, args: &[Value]) -> ElabResult<bool> {
        let value = self.call(operation, args)?;
        self.truth(&value)
    }

    /// Truth of a boolean-convertible constant
    pub fn truth(&self, value: &Value) -> ElabResult<bool> {
        value
            .as_constant()
            .map(|constant| constant.truth())
            .ok_or_else(|| ElaborationError::NotABooleanConstant {
                found: value.to_string(),
            })
    }

    /// Apply a metafunction value to arguments
    pub fn apply(&mut self, function: &Value, args: &[Value]) -> ElabResult<Value> {
        match function {
            Value::Function(FunctionValue::Quoted(operation)) => self.apply_named(operation.as_str(), args),
            Value::Function(FunctionValue::Lambda(body)) => {
                let body = body.substitute(args)?;
                self.nested(|engine| engine.evaluate_expr(&body))
            }
            other => Err(ElaborationError::type_mismatch("apply", "a metafunction", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_requires_a_function() {
        let mut engine = Engine::new();
        let result = engine.apply(&Value::int(1), &[]);
        assert!(matches!(result, Err(ElaborationError::TypeMismatch { .. })));
    }

    #[test]
    fn test_truth_of_non_constant() {
        let engine = Engine::new();
        assert_eq!(
            engine.truth(&Value::opaque("x")),
            Err(ElaborationError::NotABooleanConstant {
                found: "x".to_string()
            })
        );
    }

    #[test]
    fn test_class_of_untagged_value_is_default() {
        let engine = Engine::new();
        assert_eq!(engine.class_of(&Value::opaque("x")), *tags::DEFAULT_CLASS);
        assert_eq!(engine.class_of(&Value::list(vec![])), *tags::SEQUENCE_CLASS);
    }
}
