//! The built-in formula grammar, compiled once per process.

use std::sync::OnceLock;

use crate::ebnf::{compile, parse_grammar, CompiledGrammar};
use crate::leaf_parsers::predefined_parsers;
use crate::transformer::FormulaGrammarTransformer;
use crate::GrammarError;

/// Source of the built-in grammar.
pub const FORMULA_GRAMMAR: &str = include_str!("formula.grammar");

pub const FORMULA: &str = "FORMULA";
pub const EXPRESSION: &str = "EXPRESSION";
pub const CELL: &str = "CELL";
pub const CELL_RANGE: &str = "CELL_RANGE";
pub const COLUMN: &str = "COLUMN";
pub const ROW: &str = "ROW";
pub const LABEL_NAME: &str = "LABEL_NAME";
pub const REFERENCE: &str = "REFERENCE";
pub const FUNCTION_NAME: &str = "FUNCTION_NAME";
pub const SIGNED_NUMBER: &str = "SIGNED_NUMBER";
pub const DATE: &str = "DATE";
pub const TIME: &str = "TIME";
pub const DATE_TIME: &str = "DATE_TIME";

/// Compile [`FORMULA_GRAMMAR`] against the predefined leaf parsers.
pub fn compile_formula_grammar() -> Result<CompiledGrammar, GrammarError> {
    let grammar = parse_grammar(FORMULA_GRAMMAR)?;
    compile(&grammar, predefined_parsers(), &FormulaGrammarTransformer)
}

/// The shared compiled formula grammar.
///
/// # Panics
///
/// If the built-in grammar does not compile. That is a defect in the grammar asset and is
/// caught by this crate's tests.
pub fn formula_grammar() -> &'static CompiledGrammar {
    static GRAMMAR: OnceLock<CompiledGrammar> = OnceLock::new();
    GRAMMAR.get_or_init(|| match compile_formula_grammar() {
        Ok(grammar) => {
            log::debug!(
                "compiled formula grammar with {} productions",
                grammar.production_names().count()
            );
            grammar
        }
        Err(err) => panic!("built-in formula grammar is invalid: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_grammar_compiles() {
        let grammar = compile_formula_grammar().unwrap();
        for name in [
            FORMULA,
            EXPRESSION,
            CELL,
            CELL_RANGE,
            COLUMN,
            ROW,
            LABEL_NAME,
            REFERENCE,
            FUNCTION_NAME,
            SIGNED_NUMBER,
            DATE,
            TIME,
            DATE_TIME,
        ] {
            assert!(grammar.production(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn shared_grammar_is_compiled_once() {
        assert!(std::ptr::eq(formula_grammar(), formula_grammar()));
    }
}
