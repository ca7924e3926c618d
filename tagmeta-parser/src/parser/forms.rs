// Compound expression parsing for the tagmeta parser
// Handles `( ... )` forms and `[ ... ]` list literals

use super::{Rule, TagmetaParser};
use crate::ast::*;
use crate::error::*;

impl TagmetaParser {
    /// Parse a parenthesised form
    pub(super) fn parse_form(pair: pest::iterators::Pair<Rule>, src: &str) -> ParseResult<Form> {
        let span = Self::extract_span(&pair);
        let elements = Self::parse_elements(pair, src)?;
        Ok(Form { elements, span })
    }

    /// Parse a bracketed list literal
    pub(super) fn parse_bracket_list(
        pair: pest::iterators::Pair<Rule>,
        src: &str,
    ) -> ParseResult<ListLiteral> {
        let span = Self::extract_span(&pair);
        let elements = Self::parse_elements(pair, src)?;
        Ok(ListLiteral { elements, span })
    }

    fn parse_elements(
        pair: pest::iterators::Pair<Rule>,
        src: &str,
    ) -> ParseResult<Vec<Expression>> {
        pair.into_inner()
            .filter(|inner| inner.as_rule() == Rule::expression)
            .map(|inner| Self::parse_expression_pair(inner, src))
            .collect()
    }
}
