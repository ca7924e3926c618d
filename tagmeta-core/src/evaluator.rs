//! Meta-language evaluation
//!
//! Lowers parsed programs to [`Expr`] and elaborates them on an [`Engine`].
//! Special forms control evaluation of their operands; every other form
//! evaluates its arguments and then constructs a value or dispatches an
//! operation.

use crate::core_library;
use crate::datatypes;
use crate::engine::Engine;
use crate::error::{ElabResult, ElaborationError, TagmetaError};
use crate::expr::Expr;
use crate::typeclass::logical;
use crate::types::{tags, Tag, Value};
use miette::NamedSource;
use tagmeta_parser::{parse_program_with_source, Program};
use tracing::debug;

const ANONYMOUS_SOURCE: &str = "<input>";

impl Engine {
    /// Parse and evaluate every top-level form in `source`
    pub fn evaluate_source(&mut self, source: &str) -> Result<Vec<Value>, TagmetaError> {
        self.evaluate_source_named(source, ANONYMOUS_SOURCE)
    }

    pub fn evaluate_source_named(&mut self, source: &str, name: &str) -> Result<Vec<Value>, TagmetaError> {
        let program = parse_program_with_source(source, Some(name.to_string()))?;
        self.evaluate_program(&program, source)
    }

    /// Evaluate a parsed program, attaching the failing form's span to errors
    ///
    /// Evaluation stops at the first failing form; bindings made by earlier
    /// forms are kept.
    pub fn evaluate_program(&mut self, program: &Program, source: &str) -> Result<Vec<Value>, TagmetaError> {
        let name = program
            .source_file
            .clone()
            .unwrap_or_else(|| ANONYMOUS_SOURCE.to_string());

        let mut values = Vec::with_capacity(program.items.len());
        for item in &program.items {
            let result = Expr::lower(item).and_then(|expr| self.evaluate_expr(&expr));
            match result {
                Ok(value) => values.push(value),
                Err(error) => {
                    return Err(TagmetaError::Elaboration {
                        src: NamedSource::new(name, source.to_string()),
                        span: (item.span.start, item.span.len()).into(),
                        source: error,
                    })
                }
            }
        }
        Ok(values)
    }

    pub fn evaluate_expr(&mut self, expr: &Expr) -> ElabResult<Value> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Symbol(name) => Ok(self
                .lookup(name)
                .cloned()
                .unwrap_or_else(|| Value::opaque(name.as_ref()))),
            Expr::Placeholder(index) => Err(ElaborationError::UnboundPlaceholder { index: *index }),
            Expr::Undefined => Err(ElaborationError::UndefinedEvaluated),
            Expr::List(elements) => Ok(Value::list(self.evaluate_all(elements)?)),
            Expr::Apply { function, args } => {
                let function = self.evaluate_expr(function)?;
                let args = self.evaluate_all(args)?;
                self.apply(&function, &args)
            }
            Expr::Call { head, args } => self.evaluate_form(head, args),
        }
    }

    fn evaluate_all(&mut self, exprs: &[Expr]) -> ElabResult<Vec<Value>> {
        exprs.iter().map(|expr| self.evaluate_expr(expr)).collect()
    }

    fn evaluate_form(&mut self, head: &str, args: &[Expr]) -> ElabResult<Value> {
        match head {
            "define" => self.evaluate_define(args),
            "quote" => match args {
                [Expr::Symbol(name)] => {
                    core_library::is_callable(self.registry(), name)?;
                    Ok(Value::quote(name.as_ref()))
                }
                _ => Err(ElaborationError::usage("quote", "expected an operation name")),
            },
            "lambda" => match args {
                [body] => Ok(Value::lambda(body.clone())),
                _ => Err(ElaborationError::usage("lambda", "expected a single body expression")),
            },
            "and_" => logical::and_with(self, args.len(), |engine, i| engine.evaluate_expr(&args[i])),
            "or_" => logical::or_with(self, args.len(), |engine, i| engine.evaluate_expr(&args[i])),
            "if_" => match args {
                [condition, then, otherwise] => {
                    let condition = self.evaluate_expr(condition)?;
                    logical::if_with(
                        self,
                        &condition,
                        |engine| engine.evaluate_expr(then),
                        |engine| engine.evaluate_expr(otherwise),
                    )
                }
                _ => Err(ElaborationError::usage("if_", "expected a condition and two branches")),
            },
            name if logical::is_chainable(name) && args.len() > 2 => {
                logical::chain_with(self, name, args.len(), |engine, i| engine.evaluate_expr(&args[i]))
            }
            "assert" => self.evaluate_assert(args),
            "assert_same" => match args {
                [actual, expected] => {
                    let (found, wanted) = (self.evaluate_expr(actual)?, self.evaluate_expr(expected)?);
                    if found == wanted {
                        Ok(Value::bool(true))
                    } else {
                        Err(ElaborationError::AssertionFailed {
                            message: format!("expected {actual} to be {wanted}, found {found}"),
                        })
                    }
                }
                _ => Err(ElaborationError::usage("assert_same", "expected two expressions")),
            },
            "assert_fails" => match args {
                [expr] => match self.evaluate_expr(expr) {
                    Ok(value) => Err(ElaborationError::AssertionFailed {
                        message: format!("expected {expr} to fail, but it produced {value}"),
                    }),
                    Err(error) => {
                        debug!(%expr, %error, "expected failure");
                        Ok(Value::bool(true))
                    }
                },
                _ => Err(ElaborationError::usage("assert_fails", "expected one expression")),
            },
            "tagged" => match args {
                [Expr::Symbol(name), tag] => {
                    let tag = self.tag_argument("tagged", tag)?;
                    Ok(Value::tagged(name.as_ref(), tag))
                }
                _ => Err(ElaborationError::usage("tagged", "expected a type name and a tag")),
            },
            "deftag" => match args {
                [child, parent] => {
                    let child = self.tag_argument("deftag", child)?;
                    let parent = self.tag_argument("deftag", parent)?;
                    self.registry_mut().add_refinement(&child, &parent)?;
                    Ok(Value::Tag(child))
                }
                _ => Err(ElaborationError::usage("deftag", "expected a tag and the tag it refines")),
            },
            "common_datatype" => self.evaluate_common_datatype(args),
            "apply" => match args.split_first() {
                Some((function, rest)) => {
                    let function = self.evaluate_expr(function)?;
                    let rest = self.evaluate_all(rest)?;
                    self.apply(&function, &rest)
                }
                None => Err(ElaborationError::usage("apply", "expected a metafunction")),
            },
            name => {
                let args = self.evaluate_all(args)?;
                match self.lookup(name).cloned() {
                    Some(function) => self.apply(&function, &args),
                    None => self.apply_named(name, &args),
                }
            }
        }
    }

    fn evaluate_define(&mut self, args: &[Expr]) -> ElabResult<Value> {
        let [Expr::Symbol(name), expr] = args else {
            return Err(ElaborationError::usage("define", "expected a name and an expression"));
        };
        let value = self.evaluate_expr(expr)?;
        self.bind(name, value.clone());
        Ok(value)
    }

    fn evaluate_assert(&mut self, args: &[Expr]) -> ElabResult<Value> {
        let [condition] = args else {
            return Err(ElaborationError::usage("assert", "expected one condition"));
        };
        let value = self.evaluate_expr(condition)?;
        if self.truth(&value)? {
            Ok(Value::bool(true))
        } else {
            Err(ElaborationError::AssertionFailed {
                message: format!("{condition} is false"),
            })
        }
    }

    /// `(common_datatype a b)` queries, `(common_datatype a b c)` declares
    fn evaluate_common_datatype(&mut self, args: &[Expr]) -> ElabResult<Value> {
        match args {
            [a, b] => {
                let (a, b) = (
                    self.tag_argument("common_datatype", a)?,
                    self.tag_argument("common_datatype", b)?,
                );
                let common = self
                    .registry()
                    .common_datatype(&a, &b)
                    .unwrap_or_else(|| tags::NO_TAG.clone());
                Ok(Value::Tag(common))
            }
            [a, b, common] => {
                let a = self.tag_argument("common_datatype", a)?;
                let b = self.tag_argument("common_datatype", b)?;
                let common = self.tag_argument("common_datatype", common)?;
                self.registry_mut().set_common_datatype(&a, &b, &common);
                Ok(Value::Tag(common))
            }
            _ => Err(ElaborationError::usage(
                "common_datatype",
                "expected two tags to query or three to declare",
            )),
        }
    }

    /// A tag named by a bare identifier or produced by an expression
    fn tag_argument(&mut self, operation: &str, expr: &Expr) -> ElabResult<Tag> {
        match self.evaluate_expr(expr)? {
            Value::Tag(tag) => Ok(tag),
            Value::Opaque(opaque) if opaque.tag.is_none() => Ok(Tag::new(opaque.name.as_ref())),
            other => Err(ElaborationError::type_mismatch(operation, "a tag", &other)),
        }
    }

    /// Apply an operation or constructor by name to evaluated arguments
    pub(crate) fn apply_named(&mut self, name: &str, args: &[Value]) -> ElabResult<Value> {
        if let Some(constructed) = datatypes::construct(name, args) {
            return constructed;
        }
        match name {
            "and_" => logical::and_(self, args),
            "or_" => logical::or_(self, args),
            _ if logical::is_chainable(name) && args.len() > 2 => logical::chain(self, name, args),
            _ if self.registry().is_operation(name) => self.call(name, args),
            _ => Err(ElaborationError::UnknownOperation {
                name: name.to_string(),
            }),
        }
    }
}
