//! Typeclasses
//!
//! A typeclass groups operations under a minimal complete definition. An
//! instance for some datatype tags supplies at least one minimal set of
//! methods; every other method with a derivation is registered
//! automatically in terms of the supplied ones.

pub mod arithmetic;
pub mod bitwise;
pub mod comparable;
pub mod enumerable;
pub mod logical;
pub mod orderable;

use crate::engine::Engine;
use crate::error::{ElabResult, RegistryError};
use crate::registry::{join_display, DispatchRegistry, Implementation, TagPattern};
use crate::types::{Tag, Value};

#[derive(Debug, Clone)]
pub struct TypeclassMethod {
    pub name: String,
    pub arity: usize,
    /// Implementation in terms of other methods of the typeclass
    pub derived: Option<Implementation>,
}

#[derive(Debug, Clone)]
pub struct Typeclass {
    pub name: String,
    /// Number of datatype tags an instance is keyed by
    pub parameters: usize,
    pub methods: Vec<TypeclassMethod>,
    /// Alternative sets of methods, any one of which makes an instance complete
    pub minimal: Vec<Vec<String>>,
}

impl Typeclass {
    pub fn new(name: impl Into<String>, parameters: usize) -> Self {
        Self {
            name: name.into(),
            parameters,
            methods: Vec::new(),
            minimal: Vec::new(),
        }
    }

    /// Declare a method instances must supply (or get from a minimal set)
    pub fn method(mut self, name: &str, arity: usize) -> Self {
        self.methods.push(TypeclassMethod {
            name: name.to_string(),
            arity,
            derived: None,
        });
        self
    }

    /// Declare a method with a derivation from other methods
    pub fn derived<F>(mut self, name: &str, arity: usize, body: F) -> Self
    where
        F: Fn(&mut Engine, &[Value]) -> ElabResult<Value> + Send + Sync + 'static,
    {
        self.methods.push(TypeclassMethod {
            name: name.to_string(),
            arity,
            derived: Some(Implementation::new(body)),
        });
        self
    }

    pub fn minimal(mut self, methods: &[&str]) -> Self {
        self.minimal
            .push(methods.iter().map(|m| m.to_string()).collect());
        self
    }

    fn find_method(&self, name: &str) -> Option<&TypeclassMethod> {
        self.methods.iter().find(|method| method.name == name)
    }

    fn describe_minimal(&self) -> String {
        self.minimal
            .iter()
            .map(|set| format!("{{{}}}", set.join(", ")))
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

/// A typeclass instance under construction
pub struct Instance {
    typeclass: String,
    tags: Vec<Tag>,
    methods: Vec<(String, Implementation)>,
}

impl Instance {
    pub fn new(typeclass: &str, tags: &[Tag]) -> Self {
        Self {
            typeclass: typeclass.to_string(),
            tags: tags.to_vec(),
            methods: Vec::new(),
        }
    }

    /// Supply a method implementation
    pub fn method<F>(mut self, name: &str, body: F) -> Self
    where
        F: Fn(&mut Engine, &[Value]) -> ElabResult<Value> + Send + Sync + 'static,
    {
        self.methods
            .push((name.to_string(), Implementation::new(body)));
        self
    }
}

impl DispatchRegistry {
    pub fn define_typeclass(&mut self, typeclass: Typeclass) {
        self.typeclasses
            .insert(typeclass.name.clone(), typeclass);
    }

    pub fn typeclass(&self, name: &str) -> Option<&Typeclass> {
        self.typeclasses.get(name)
    }

    /// Register an instance and the derivations it enables
    pub fn instantiate(&mut self, instance: Instance) -> Result<(), RegistryError> {
        let typeclass = self
            .typeclass(&instance.typeclass)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownTypeclass {
                name: instance.typeclass.clone(),
            })?;

        if instance.tags.len() != typeclass.parameters {
            return Err(RegistryError::ParameterCount {
                typeclass: typeclass.name.clone(),
                expected: typeclass.parameters,
                found: instance.tags.len(),
            });
        }

        for (name, _) in &instance.methods {
            if typeclass.find_method(name).is_none() {
                return Err(RegistryError::UnknownMethod {
                    typeclass: typeclass.name.clone(),
                    operation: name.clone(),
                });
            }
        }

        let supplied = |name: &String| instance.methods.iter().any(|(m, _)| m == name);
        let complete = typeclass.minimal.is_empty()
            || typeclass.minimal.iter().any(|set| set.iter().all(supplied));

        if !complete {
            // Report the minimal set that is closest to being satisfied
            let missing = typeclass
                .minimal
                .iter()
                .map(|set| set.iter().filter(|m| !supplied(*m)).cloned().collect::<Vec<_>>())
                .min_by_key(|missing| missing.len())
                .unwrap_or_default();
            return Err(RegistryError::IncompleteInstance {
                typeclass: typeclass.name.clone(),
                tags: join_display(&instance.tags),
                missing,
                alternatives: typeclass.describe_minimal(),
            });
        }

        let instance_name = format!("{}<{}>", typeclass.name, join_display(&instance.tags));
        for method in &typeclass.methods {
            let pattern = instance_pattern(&instance.tags, method.arity);
            let supplied_body = instance
                .methods
                .iter()
                .find(|(name, _)| *name == method.name)
                .map(|(_, body)| body.clone());

            match (supplied_body, &method.derived) {
                (Some(body), _) => self.register_implementation(
                    method.name.as_str(),
                    pattern,
                    format!("{instance_name}::{}", method.name),
                    body,
                )?,
                (None, Some(derived)) => self.register_implementation(
                    method.name.as_str(),
                    pattern,
                    format!("{instance_name}::{} (derived)", method.name),
                    derived.clone(),
                )?,
                (None, None) => {}
            }
        }
        Ok(())
    }
}

/// Pattern for a method of `arity` in an instance keyed by `tags`
///
/// Extra arguments reuse the last instance tag, so a single-parameter
/// instance keys binary methods on the same tag twice.
fn instance_pattern(tags: &[Tag], arity: usize) -> Vec<TagPattern> {
    (0..arity)
        .map(|i| match tags.get(i).or_else(|| tags.last()) {
            Some(tag) => TagPattern::Exact(tag.clone()),
            None => TagPattern::Any,
        })
        .collect()
}

/// Define every built-in typeclass
pub fn define_builtin(registry: &mut DispatchRegistry) {
    registry.define_typeclass(comparable::typeclass());
    registry.define_typeclass(orderable::typeclass());
    registry.define_typeclass(enumerable::typeclass());
    registry.define_typeclass(bitwise::typeclass());
    for typeclass in arithmetic::typeclasses() {
        registry.define_typeclass(typeclass);
    }
}

/// Read a binary method's arguments
pub(crate) fn binary<'v>(operation: &str, args: &'v [Value]) -> ElabResult<(&'v Value, &'v Value)> {
    match args {
        [left, right] => Ok((left, right)),
        _ => Err(crate::error::ElaborationError::usage(
            operation,
            format!("expected 2 arguments, found {}", args.len()),
        )),
    }
}

/// Read a unary method's argument
pub(crate) fn unary<'v>(operation: &str, args: &'v [Value]) -> ElabResult<&'v Value> {
    match args {
        [value] => Ok(value),
        _ => Err(crate::error::ElaborationError::usage(
            operation,
            format!("expected 1 argument, found {}", args.len()),
        )),
    }
}
