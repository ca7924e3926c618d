//! Core expression form
//!
//! The parser AST carries spans and literal wrappers; elaboration works on
//! this smaller, hashable form so lambda bodies can live inside values.

use crate::error::{ElabResult, ElaborationError};
use crate::types::Value;
use std::fmt;
use std::sync::Arc;
use tagmeta_parser::ast::{Expression, ExpressionKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(Value),
    Symbol(Arc<str>),
    Placeholder(u8),
    Undefined,
    /// `(head args...)` where head names a special form, constructor or operation
    Call { head: Arc<str>, args: Vec<Expr> },
    /// `(expr args...)` where the head evaluates to a metafunction
    Apply { function: Box<Expr>, args: Vec<Expr> },
    /// `[a b c]`
    List(Vec<Expr>),
}

impl Expr {
    pub fn call(head: &str, args: Vec<Expr>) -> Self {
        Expr::Call {
            head: Arc::from(head),
            args,
        }
    }

    pub fn symbol(name: &str) -> Self {
        Expr::Symbol(Arc::from(name))
    }

    /// Lower a parsed expression
    pub fn lower(expression: &Expression) -> ElabResult<Expr> {
        match &expression.kind {
            ExpressionKind::Integer(lit) => Ok(Expr::Literal(Value::int(lit.value))),
            ExpressionKind::Boolean(lit) => Ok(Expr::Literal(Value::bool(lit.value))),
            ExpressionKind::Identifier(id) if id.name == "undefined" => Ok(Expr::Undefined),
            ExpressionKind::Identifier(id) => Ok(Expr::symbol(&id.name)),
            ExpressionKind::Placeholder(p) => Ok(Expr::Placeholder(p.index)),
            ExpressionKind::List(list) => Ok(Expr::List(Self::lower_all(&list.elements)?)),
            ExpressionKind::Form(form) => {
                let Some((head, rest)) = form.elements.split_first() else {
                    return Err(ElaborationError::usage("()", "empty form has no operation"));
                };
                let args = Self::lower_all(rest)?;
                match head.identifier_name() {
                    Some(name) if name != "undefined" => Ok(Expr::call(name, args)),
                    _ => Ok(Expr::Apply {
                        function: Box::new(Self::lower(head)?),
                        args,
                    }),
                }
            }
        }
    }

    fn lower_all(expressions: &[Expression]) -> ElabResult<Vec<Expr>> {
        expressions.iter().map(Self::lower).collect()
    }

    /// Replace `_N` with the Nth argument
    ///
    /// Nested `lambda` bodies keep their own placeholders.
    pub fn substitute(&self, arguments: &[Value]) -> ElabResult<Expr> {
        match self {
            Expr::Placeholder(index) => arguments
                .get(usize::from(*index).wrapping_sub(1))
                .cloned()
                .map(Expr::Literal)
                .ok_or(ElaborationError::UnboundPlaceholder { index: *index }),
            Expr::Call { head, .. } if head.as_ref() == "lambda" => Ok(self.clone()),
            Expr::Call { head, args } => Ok(Expr::Call {
                head: head.clone(),
                args: Self::substitute_all(args, arguments)?,
            }),
            Expr::Apply { function, args } => Ok(Expr::Apply {
                function: Box::new(function.substitute(arguments)?),
                args: Self::substitute_all(args, arguments)?,
            }),
            Expr::List(elements) => Ok(Expr::List(Self::substitute_all(elements, arguments)?)),
            Expr::Literal(_) | Expr::Symbol(_) | Expr::Undefined => Ok(self.clone()),
        }
    }

    fn substitute_all(exprs: &[Expr], arguments: &[Value]) -> ElabResult<Vec<Expr>> {
        exprs.iter().map(|e| e.substitute(arguments)).collect()
    }
}

fn write_all(f: &mut fmt::Formatter<'_>, exprs: &[Expr]) -> fmt::Result {
    for expr in exprs {
        write!(f, " {expr}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Symbol(name) => write!(f, "{name}"),
            Expr::Placeholder(index) => write!(f, "_{index}"),
            Expr::Undefined => write!(f, "undefined"),
            Expr::Call { head, args } => {
                write!(f, "({head}")?;
                write_all(f, args)?;
                write!(f, ")")
            }
            Expr::Apply { function, args } => {
                write!(f, "({function}")?;
                write_all(f, args)?;
                write!(f, ")")
            }
            Expr::List(elements) => {
                let rendered: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", rendered.join(" "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tagmeta_parser::parse_expression;

    fn lower(source: &str) -> Expr {
        Expr::lower(&parse_expression(source).unwrap()).unwrap()
    }

    #[test]
    fn test_lowering_round_trips_through_display() {
        for source in ["(at [a b] 1)", "(lambda (less _1 3))", "((quote f) x)"] {
            assert_eq!(lower(source).to_string(), source);
        }
    }

    #[test]
    fn test_undefined_is_special() {
        assert_eq!(lower("undefined"), Expr::Undefined);
    }

    #[test]
    fn test_substitute_placeholders() {
        let body = lower("(less _2 _1)");
        let substituted = body.substitute(&[Value::int(1), Value::int(2)]).unwrap();
        assert_eq!(substituted.to_string(), "(less 2 1)");
    }

    #[test]
    fn test_substitute_missing_argument() {
        let body = lower("(less _1 _3)");
        let result = body.substitute(&[Value::int(1)]);
        assert_eq!(result, Err(ElaborationError::UnboundPlaceholder { index: 3 }));
    }

    #[test]
    fn test_nested_lambda_is_left_alone() {
        let body = lower("(find_if _1 (lambda (is_same _1 x)))");
        let substituted = body.substitute(&[Value::list(vec![])]).unwrap();
        assert_eq!(substituted.to_string(), "(find_if [] (lambda (is_same _1 x)))");
    }

    #[test]
    fn test_empty_form_is_rejected() {
        let result = Expr::lower(&parse_expression("()").unwrap());
        assert!(matches!(result, Err(ElaborationError::Usage { .. })));
    }
}
