// tagmeta Parser
// Pest-based parser turning meta-language source into the AST

mod forms;
mod literals;

use crate::ast::*;
use crate::error::*;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct TagmetaParser;

impl TagmetaParser {
    /// Parse a complete program
    pub fn parse_program(input: &str) -> ParseResult<Program> {
        Self::parse_program_with_source(input, None)
    }

    /// Parse a complete program, remembering which file it came from
    pub fn parse_program_with_source(
        input: &str,
        source_file: Option<String>,
    ) -> ParseResult<Program> {
        let mut pairs = Self::parse(Rule::program, input)
            .map_err(|e| ParseError::from_pest_error(e, input.to_string()))?;

        let program_pair = pairs.next().ok_or_else(|| ParseError::UnexpectedRule {
            expected: "program".to_string(),
            found: Rule::EOI,
            span: Span::new(0, input.len()),
        })?;
        let span = Self::extract_span(&program_pair);

        let mut items = Vec::new();
        for pair in program_pair.into_inner() {
            match pair.as_rule() {
                Rule::expression => items.push(Self::parse_expression_pair(pair, input)?),
                Rule::EOI => {}
                other => {
                    return Err(ParseError::UnexpectedRule {
                        expected: "expression".to_string(),
                        found: other,
                        span: Self::extract_span(&pair),
                    })
                }
            }
        }

        Ok(Program {
            items,
            span,
            source_file,
        })
    }

    /// Parse exactly one expression
    pub fn parse_expression(input: &str) -> ParseResult<Expression> {
        let mut pairs = Self::parse(Rule::expression_only, input)
            .map_err(|e| ParseError::from_pest_error(e, input.to_string()))?;

        let expression_pair = pairs
            .next()
            .and_then(|pair| pair.into_inner().find(|p| p.as_rule() == Rule::expression))
            .ok_or_else(|| ParseError::UnexpectedRule {
                expected: "expression".to_string(),
                found: Rule::EOI,
                span: Span::new(0, input.len()),
            })?;

        Self::parse_expression_pair(expression_pair, input)
    }

    /// Parse an `expression` pair into an AST node
    pub(crate) fn parse_expression_pair(
        pair: pest::iterators::Pair<Rule>,
        src: &str,
    ) -> ParseResult<Expression> {
        let span = Self::extract_span(&pair);
        let inner = Self::single_inner(pair, "expression")?;

        let kind = match inner.as_rule() {
            Rule::form => ExpressionKind::Form(Self::parse_form(inner, src)?),
            Rule::bracket_list => ExpressionKind::List(Self::parse_bracket_list(inner, src)?),
            Rule::boolean => ExpressionKind::Boolean(Self::parse_boolean(inner)),
            Rule::integer => ExpressionKind::Integer(Self::parse_integer(inner, src)?),
            Rule::placeholder => ExpressionKind::Placeholder(Self::parse_placeholder(inner, src)?),
            Rule::identifier => ExpressionKind::Identifier(Self::parse_identifier(inner)),
            other => {
                return Err(ParseError::UnexpectedRule {
                    expected: "form, list or atom".to_string(),
                    found: other,
                    span,
                })
            }
        };

        Ok(Expression { kind, span })
    }

    /// Extract span information from a Pest pair
    pub(crate) fn extract_span(pair: &pest::iterators::Pair<Rule>) -> Span {
        let span = pair.as_span();
        Span::new(span.start(), span.end())
    }

    fn single_inner<'i>(
        pair: pest::iterators::Pair<'i, Rule>,
        expected: &str,
    ) -> ParseResult<pest::iterators::Pair<'i, Rule>> {
        let span = Self::extract_span(&pair);
        let rule = pair.as_rule();
        pair.into_inner()
            .next()
            .ok_or_else(|| ParseError::UnexpectedRule {
                expected: expected.to_string(),
                found: rule,
                span,
            })
    }

    /// Build a span-carrying parse error for a literal
    pub(crate) fn create_parse_error<F>(span: &Span, src: &str, text: &str, f: F) -> ParseError
    where
        F: FnOnce(String, miette::SourceSpan, String) -> ParseError,
    {
        f(
            src.to_string(),
            miette::SourceSpan::new(span.start.into(), span.len()),
            text.to_string(),
        )
    }
}
