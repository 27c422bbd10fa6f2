use formula_reference::{NameError, ReferenceError};

use crate::token::ParentKind;

/// Errors raised while reading or compiling a grammar description.
///
/// These are configuration errors: a grammar that fails to compile is a defect in the grammar
/// asset, not in the formula text being parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("grammar syntax error at byte {position}: {message} (near {near:?})")]
    Syntax {
        message: String,
        position: usize,
        near: String,
    },

    #[error("rule {0} is defined more than once")]
    DuplicateRule(String),

    #[error("rule {rule} references unknown identifier {name}")]
    UnknownIdentifier { rule: String, name: String },

    #[error("terminal {0:?} reached; terminals must be wrapped in a named production")]
    UnexpectedTerminal(String),
}

/// A parent token whose children do not have the shape its kind requires.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("{0} token text must not be empty")]
    EmptyText(&'static str),

    #[error("{kind:?} token requires at least one child")]
    NoChildren { kind: ParentKind },

    #[error("{kind:?} token expected {expected}, found {found} in {text:?}")]
    InvalidShape {
        kind: ParentKind,
        expected: &'static str,
        found: String,
        text: String,
    },

    #[error("token text {actual:?} does not match its children {expected:?}")]
    TextMismatch { expected: String, actual: String },
}

/// Hard parse failures. An ordinary mismatch is not an error; it is `Ok(None)`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected {production} at byte {position} near {near:?} in {text:?}")]
    Required {
        production: String,
        position: usize,
        near: String,
        text: String,
    },

    #[error("invalid reference: {0}")]
    Reference(#[from] ReferenceError),

    #[error("invalid parse tree: {0}")]
    Token(#[from] TokenError),

    #[error("{production} does not match {text:?}")]
    NoMatch { production: String, text: String },

    #[error("unexpected {remaining:?} after {production} in {text:?}")]
    TrailingText {
        production: String,
        remaining: String,
        text: String,
    },

    #[error("unknown production {0}")]
    UnknownProduction(String),

    #[error("formula nesting exceeds {limit} levels at byte {position} in {text:?}")]
    TooDeep {
        limit: usize,
        position: usize,
        text: String,
    },

    #[error("invalid name: {0}")]
    Name(#[from] NameError),
}

/// Failures while lowering a parse tree into an [`crate::Expression`].
///
/// Apart from the scalar conversions these indicate a parse tree that violates its own
/// invariants.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LoweringError {
    #[error("{kind:?} {text:?} expected {expected} lowered children, found {actual}")]
    Arity {
        kind: ParentKind,
        text: String,
        expected: usize,
        actual: usize,
    },

    #[error("expected at most one expression, found {count} in {text:?}")]
    MultipleResults { count: usize, text: String },

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("invalid date {year:04}-{month:02}-{day:02} in {text:?}")]
    InvalidDate {
        year: i32,
        month: u32,
        day: u32,
        text: String,
    },

    #[error("invalid time {hour:02}:{minute:02}:{second:02}.{millis:03} in {text:?}")]
    InvalidTime {
        hour: u32,
        minute: u32,
        second: u32,
        millis: u32,
        text: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("unknown parser {0:?}")]
    UnknownParser(String),

    #[error("parser {name:?} takes no construction values, got {count}")]
    UnexpectedValues { name: String, count: usize },
}

/// Union of the errors from parsing and lowering a formula in one step.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FormulaError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Lowering(#[from] LoweringError),
}
