// tagmeta Parser Error Handling
// Error reporting with miette integration

use crate::parser::Rule;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Main parse error type with miette integration
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("Parse error")]
    #[diagnostic(
        code(tagmeta::parse::pest_error),
        help("Check the syntax near the highlighted location")
    )]
    PestError {
        #[source_code]
        src: String,
        #[label("error occurred here")]
        span: SourceSpan,
        message: String,
    },

    #[error("Invalid integer literal")]
    #[diagnostic(
        code(tagmeta::parse::invalid_integer),
        help("Integer literals must fit in a signed 64-bit value")
    )]
    InvalidInteger {
        #[source_code]
        src: String,
        #[label("invalid integer")]
        span: SourceSpan,
        found: String,
    },

    #[error("Invalid placeholder")]
    #[diagnostic(
        code(tagmeta::parse::invalid_placeholder),
        help("Placeholders are written _1 through _9")
    )]
    InvalidPlaceholder {
        #[source_code]
        src: String,
        #[label("invalid placeholder")]
        span: SourceSpan,
        found: String,
    },

    #[error("Unexpected grammar rule")]
    #[diagnostic(
        code(tagmeta::parse::unexpected_rule),
        help("Expected rule: {expected}")
    )]
    UnexpectedRule {
        expected: String,
        found: Rule,
        span: crate::ast::Span,
    },
}

impl ParseError {
    /// Create a parse error from a Pest parsing error
    pub fn from_pest_error(error: pest::error::Error<Rule>, src: String) -> Self {
        let span = match error.location {
            pest::error::InputLocation::Pos(pos) => SourceSpan::new(pos.into(), 1),
            pest::error::InputLocation::Span((start, end)) => {
                SourceSpan::new(start.into(), end - start)
            }
        };

        let message = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } => {
                let mut message_parts = vec![format!("{error}")];

                if !positives.is_empty() {
                    let expected: Vec<String> = positives
                        .iter()
                        .map(rule_to_user_friendly_description)
                        .collect();
                    message_parts.push(format!("\nEXPECTED: {}", expected.join(", ")));
                }

                let context = get_parsing_context(&src, &error.location);
                if !context.is_empty() {
                    message_parts.push(format!("\nCONTEXT: {context}"));
                }

                message_parts.join("")
            }
            pest::error::ErrorVariant::CustomError { message } => message.clone(),
        };

        ParseError::PestError { src, span, message }
    }

    /// Create an invalid integer error
    pub fn invalid_integer(src: String, span: SourceSpan, found: String) -> Self {
        ParseError::InvalidInteger { src, span, found }
    }

    /// Create an invalid placeholder error
    pub fn invalid_placeholder(src: String, span: SourceSpan, found: String) -> Self {
        ParseError::InvalidPlaceholder { src, span, found }
    }

    /// The offending source span, when one is attached
    pub fn source_span(&self) -> Option<SourceSpan> {
        match self {
            ParseError::PestError { span, .. }
            | ParseError::InvalidInteger { span, .. }
            | ParseError::InvalidPlaceholder { span, .. } => Some(*span),
            ParseError::UnexpectedRule { span, .. } => {
                Some(SourceSpan::new(span.start.into(), span.len()))
            }
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Convert a parser rule to a user-friendly description
fn rule_to_user_friendly_description(rule: &Rule) -> String {
    match rule {
        Rule::integer => "an integer (like 42 or -3)".to_string(),
        Rule::boolean => "a boolean (true or false)".to_string(),
        Rule::identifier => "an identifier (like x0 or less_equal)".to_string(),
        Rule::placeholder => "a placeholder (_1 .. _9)".to_string(),
        Rule::form => "a form (like (at seq 1))".to_string(),
        Rule::bracket_list => "a list literal (like [a b c])".to_string(),
        Rule::expression => "an expression".to_string(),
        Rule::program => "a program".to_string(),
        Rule::EOI => "end of input".to_string(),
        _ => format!("a {rule:?}").replace('_', " "),
    }
}

/// Describe where in the source a parse error happened
fn get_parsing_context(source: &str, location: &pest::error::InputLocation) -> String {
    let position = match location {
        pest::error::InputLocation::Pos(pos) => *pos,
        pest::error::InputLocation::Span((start, _)) => *start,
    };

    let mut current_pos = 0;
    for (line_num, line) in source.lines().enumerate() {
        let line_end = current_pos + line.len();

        if position >= current_pos && position <= line_end {
            let content = if line.trim().is_empty() {
                "on empty line".to_string()
            } else {
                format!("in: {}", line.trim())
            };
            return format!("line {}, {}", line_num + 1, content);
        }

        current_pos = line_end + 1;
    }

    String::new()
}
