// tagmeta AST
// Syntax tree for meta-programs, with byte spans for diagnostics

use std::fmt;

/// Byte range in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(&self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// A parsed meta-program: a sequence of top-level expressions
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub items: Vec<Expression>,
    pub span: Span,
    pub source_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Integer(IntegerLiteral),
    Boolean(BooleanLiteral),
    Identifier(Identifier),
    Placeholder(Placeholder),
    /// `(head args...)`
    Form(Form),
    /// `[a b c]`, sugar for `(list a b c)`
    List(ListLiteral),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub value: i64,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// Lambda argument placeholder `_1` .. `_9`
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub index: u8,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub elements: Vec<Expression>,
    pub span: Span,
}

impl Form {
    /// Name of the head identifier, if the form starts with one
    pub fn head_name(&self) -> Option<&str> {
        match self.elements.first().map(|e| &e.kind) {
            Some(ExpressionKind::Identifier(id)) => Some(id.name.as_str()),
            _ => None,
        }
    }

    /// Everything after the head
    pub fn arguments(&self) -> &[Expression] {
        self.elements.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListLiteral {
    pub elements: Vec<Expression>,
    pub span: Span,
}

impl Expression {
    pub fn identifier_name(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::Identifier(id) => Some(id.name.as_str()),
            _ => None,
        }
    }
}

/// Source reconstruction: prints the expression back in meta-language syntax
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Integer(lit) => write!(f, "{}", lit.value),
            ExpressionKind::Boolean(lit) => write!(f, "{}", lit.value),
            ExpressionKind::Identifier(id) => write!(f, "{}", id.name),
            ExpressionKind::Placeholder(p) => write!(f, "_{}", p.index),
            ExpressionKind::Form(form) => {
                write!(f, "(")?;
                write_separated(f, &form.elements)?;
                write!(f, ")")
            }
            ExpressionKind::List(list) => {
                write!(f, "[")?;
                write_separated(f, &list.elements)?;
                write!(f, "]")
            }
        }
    }
}

fn write_separated(f: &mut fmt::Formatter<'_>, elements: &[Expression]) -> fmt::Result {
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{element}")?;
    }
    Ok(())
}
