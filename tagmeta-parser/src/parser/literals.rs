// Literal parsing functions for the tagmeta parser
// Handles boolean, integer, placeholder and identifier atoms

use super::{Rule, TagmetaParser};
use crate::ast::*;
use crate::error::*;

impl TagmetaParser {
    /// Parse a boolean literal from a Pest pair
    pub(super) fn parse_boolean(pair: pest::iterators::Pair<Rule>) -> BooleanLiteral {
        let span = Self::extract_span(&pair);
        BooleanLiteral {
            value: pair.as_str() == "true",
            span,
        }
    }

    /// Parse a decimal integer literal from a Pest pair
    pub(super) fn parse_integer(
        pair: pest::iterators::Pair<Rule>,
        src: &str,
    ) -> ParseResult<IntegerLiteral> {
        let span = Self::extract_span(&pair);
        let text = pair.as_str();

        let value = text
            .parse::<i64>()
            .map_err(|_| Self::create_parse_error(&span, src, text, ParseError::invalid_integer))?;

        Ok(IntegerLiteral { value, span })
    }

    /// Parse a `_N` placeholder
    pub(super) fn parse_placeholder(
        pair: pest::iterators::Pair<Rule>,
        src: &str,
    ) -> ParseResult<Placeholder> {
        let span = Self::extract_span(&pair);
        let text = pair.as_str();

        let index = text[1..]
            .parse::<u8>()
            .map_err(|_| Self::create_parse_error(&span, src, text, ParseError::invalid_placeholder))?;

        Ok(Placeholder { index, span })
    }

    pub(super) fn parse_identifier(pair: pest::iterators::Pair<Rule>) -> Identifier {
        Identifier {
            name: pair.as_str().to_string(),
            span: Self::extract_span(&pair),
        }
    }
}
