use serde::{Deserialize, Serialize};

use crate::ebnf::CompiledGrammar;
use crate::grammar::{self, formula_grammar};
use crate::{ParseError, ParserContext, ProviderError, TextCursor, Token};

const INFO_BASE_URL: &str = "https://formula-parser.invalid/parser/";

/// Name and documentation URL of a parser a provider can build.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParserInfo {
    pub name: String,
    pub url: String,
}

/// Builds parsers by name for an external registry.
pub trait ParserProvider {
    fn parser(&self, name: &str, values: &[String]) -> Result<SpreadsheetParser, ProviderError>;

    /// The parsers this provider can build, in a stable order.
    fn parser_infos(&self) -> Vec<ParserInfo>;
}

/// A production of the built-in grammar, parsed on demand.
#[derive(Clone, Copy, Debug)]
pub struct SpreadsheetParser {
    production: &'static str,
    grammar: &'static CompiledGrammar,
}

impl SpreadsheetParser {
    #[inline]
    pub fn production(&self) -> &'static str {
        self.production
    }

    /// Parse a prefix of the cursor's remaining text.
    pub fn parse(
        &self,
        cursor: &mut TextCursor<'_>,
        context: &dyn ParserContext,
    ) -> Result<Option<Token>, ParseError> {
        self.grammar.parse(self.production, cursor, context)
    }

    /// Parse all of `text`.
    pub fn parse_text(&self, text: &str, context: &dyn ParserContext) -> Result<Token, ParseError> {
        self.grammar.parse_text(self.production, text, context)
    }
}

/// Provides the parsers of the built-in formula grammar.
#[derive(Clone, Copy, Debug, Default)]
pub struct FormulaParserProvider;

const PARSERS: [(&str, &str); 13] = [
    ("formula", grammar::FORMULA),
    ("expression", grammar::EXPRESSION),
    ("cell", grammar::CELL),
    ("cell-range", grammar::CELL_RANGE),
    ("column", grammar::COLUMN),
    ("row", grammar::ROW),
    ("label", grammar::LABEL_NAME),
    ("reference", grammar::REFERENCE),
    ("function-name", grammar::FUNCTION_NAME),
    ("number", grammar::SIGNED_NUMBER),
    ("date", grammar::DATE),
    ("time", grammar::TIME),
    ("date-time", grammar::DATE_TIME),
];

impl ParserProvider for FormulaParserProvider {
    fn parser(&self, name: &str, values: &[String]) -> Result<SpreadsheetParser, ProviderError> {
        let Some(&(_, production)) = PARSERS.iter().find(|(known, _)| *known == name) else {
            return Err(ProviderError::UnknownParser(name.to_string()));
        };
        if !values.is_empty() {
            return Err(ProviderError::UnexpectedValues {
                name: name.to_string(),
                count: values.len(),
            });
        }
        log::trace!("resolved parser {name} to production {production}");
        Ok(SpreadsheetParser {
            production,
            grammar: formula_grammar(),
        })
    }

    fn parser_infos(&self) -> Vec<ParserInfo> {
        PARSERS
            .iter()
            .map(|(name, _)| ParserInfo {
                name: (*name).to_string(),
                url: format!("{INFO_BASE_URL}{name}"),
            })
            .collect()
    }
}
