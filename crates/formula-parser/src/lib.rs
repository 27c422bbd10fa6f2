//! `formula-parser` turns spreadsheet formula text into an immutable parse tree and lowers that
//! tree into an [`Expression`].
//!
//! The formula language is described by an EBNF grammar ([`grammar::FORMULA_GRAMMAR`]) which
//! is compiled into backtracking parser combinators once per process. Binary operator runs are
//! resolved by priority, and [`lower`] walks the finished tree into the expression AST.
//!
//! ```
//! use formula_parser::{compile_formula, BasicParserContext};
//!
//! let context = BasicParserContext::en_us();
//! let expr = compile_formula("=1+2*3", &context).unwrap().unwrap();
//! assert_eq!(expr.to_string(), "add(1, multiply(2, 3))");
//! ```

pub mod combinator;
mod context;
mod cursor;
pub mod ebnf;
mod error;
mod expr;
pub mod grammar;
mod leaf_parsers;
mod lower;
mod precedence;
mod provider;
mod token;
mod transformer;

pub use crate::combinator::Parser;
pub use crate::context::{BasicParserContext, ParserContext};
pub use crate::cursor::{SavePoint, TextCursor};
pub use crate::error::{
    FormulaError, GrammarError, LoweringError, ParseError, ProviderError, TokenError,
};
pub use crate::expr::{
    BinaryExpr, BinaryOp, CallExpr, Expression, ExpressionReference, ExpressionValue, UnaryExpr,
    UnaryOp,
};
pub use crate::grammar::formula_grammar;
pub use crate::leaf_parsers::predefined_parsers;
pub use crate::lower::lower;
pub use crate::precedence::resolve as resolve_precedence;
pub use crate::provider::{FormulaParserProvider, ParserInfo, ParserProvider, SpreadsheetParser};
pub use crate::token::{
    AmPm, Leaves, LeafToken, LeafValue, ParentKind, ParentToken, SymbolKind, Token, MAX_PRIORITY,
};
pub use crate::transformer::FormulaGrammarTransformer;

pub use formula_reference;

/// Parse a whole formula, including its leading `=`.
pub fn parse_formula(text: &str, context: &dyn ParserContext) -> Result<Token, ParseError> {
    formula_grammar().parse_text(grammar::FORMULA, text, context)
}

/// Parse a whole expression without the leading `=`.
pub fn parse_expression(text: &str, context: &dyn ParserContext) -> Result<Token, ParseError> {
    formula_grammar().parse_text(grammar::EXPRESSION, text, context)
}

/// Parse a formula and lower it in one step.
pub fn compile_formula(
    text: &str,
    context: &dyn ParserContext,
) -> Result<Option<Expression>, FormulaError> {
    let token = parse_formula(text, context)?;
    Ok(lower(&token, context)?)
}
