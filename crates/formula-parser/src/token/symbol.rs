use serde::{Deserialize, Serialize};

use super::ParentKind;

/// Operators, punctuation and separators.
///
/// Each symbol knows its operator priority (`0` for structural symbols that never take part in
/// a binary expression) and which binary parent token it builds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Plus,
    Minus,
    Multiply,
    Divide,
    Power,
    Concat,
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanEquals,
    LessThan,
    LessThanEquals,
    Between,
    Percent,
    ParenthesisOpen,
    ParenthesisClose,
    ValueSeparator,
    DoubleQuote,
    DecimalSeparator,
    Exponent,
    DateSeparator,
    TimeSeparator,
}

/// Highest priority in use; `0` means "not a binary operator".
pub const MAX_PRIORITY: u8 = 6;

impl SymbolKind {
    pub const ALL: [SymbolKind; 22] = [
        SymbolKind::Plus,
        SymbolKind::Minus,
        SymbolKind::Multiply,
        SymbolKind::Divide,
        SymbolKind::Power,
        SymbolKind::Concat,
        SymbolKind::Equals,
        SymbolKind::NotEquals,
        SymbolKind::GreaterThan,
        SymbolKind::GreaterThanEquals,
        SymbolKind::LessThan,
        SymbolKind::LessThanEquals,
        SymbolKind::Between,
        SymbolKind::Percent,
        SymbolKind::ParenthesisOpen,
        SymbolKind::ParenthesisClose,
        SymbolKind::ValueSeparator,
        SymbolKind::DoubleQuote,
        SymbolKind::DecimalSeparator,
        SymbolKind::Exponent,
        SymbolKind::DateSeparator,
        SymbolKind::TimeSeparator,
    ];

    pub const fn priority(self) -> u8 {
        match self {
            SymbolKind::Equals
            | SymbolKind::NotEquals
            | SymbolKind::GreaterThan
            | SymbolKind::GreaterThanEquals
            | SymbolKind::LessThan
            | SymbolKind::LessThanEquals => 1,
            SymbolKind::Concat => 2,
            SymbolKind::Plus | SymbolKind::Minus => 3,
            SymbolKind::Multiply | SymbolKind::Divide => 4,
            SymbolKind::Power => 5,
            SymbolKind::Between => MAX_PRIORITY,
            SymbolKind::Percent
            | SymbolKind::ParenthesisOpen
            | SymbolKind::ParenthesisClose
            | SymbolKind::ValueSeparator
            | SymbolKind::DoubleQuote
            | SymbolKind::DecimalSeparator
            | SymbolKind::Exponent
            | SymbolKind::DateSeparator
            | SymbolKind::TimeSeparator => 0,
        }
    }

    #[inline]
    pub const fn is_operator(self) -> bool {
        self.priority() > 0
    }

    /// The parent kind an operator builds from `left op right`.
    pub const fn binary_kind(self) -> Option<ParentKind> {
        Some(match self {
            SymbolKind::Plus => ParentKind::Addition,
            SymbolKind::Minus => ParentKind::Subtraction,
            SymbolKind::Multiply => ParentKind::Multiplication,
            SymbolKind::Divide => ParentKind::Division,
            SymbolKind::Power => ParentKind::Power,
            SymbolKind::Concat => ParentKind::Concatenation,
            SymbolKind::Equals => ParentKind::Equals,
            SymbolKind::NotEquals => ParentKind::NotEquals,
            SymbolKind::GreaterThan => ParentKind::GreaterThan,
            SymbolKind::GreaterThanEquals => ParentKind::GreaterThanEquals,
            SymbolKind::LessThan => ParentKind::LessThan,
            SymbolKind::LessThanEquals => ParentKind::LessThanEquals,
            SymbolKind::Between => ParentKind::CellRange,
            _ => return None,
        })
    }

    /// Name of the predefined grammar parser for this symbol.
    pub const fn production(self) -> &'static str {
        match self {
            SymbolKind::Plus => "PLUS_SYMBOL",
            SymbolKind::Minus => "MINUS_SYMBOL",
            SymbolKind::Multiply => "MULTIPLY_SYMBOL",
            SymbolKind::Divide => "DIVIDE_SYMBOL",
            SymbolKind::Power => "POWER_SYMBOL",
            SymbolKind::Concat => "CONCAT_SYMBOL",
            SymbolKind::Equals => "EQUALS_SYMBOL",
            SymbolKind::NotEquals => "NOT_EQUALS_SYMBOL",
            SymbolKind::GreaterThan => "GREATER_THAN_SYMBOL",
            SymbolKind::GreaterThanEquals => "GREATER_THAN_EQUALS_SYMBOL",
            SymbolKind::LessThan => "LESS_THAN_SYMBOL",
            SymbolKind::LessThanEquals => "LESS_THAN_EQUALS_SYMBOL",
            SymbolKind::Between => "BETWEEN_SYMBOL",
            SymbolKind::Percent => "PERCENT_SYMBOL",
            SymbolKind::ParenthesisOpen => "PARENTHESIS_OPEN_SYMBOL",
            SymbolKind::ParenthesisClose => "PARENTHESIS_CLOSE_SYMBOL",
            SymbolKind::ValueSeparator => "VALUE_SEPARATOR_SYMBOL",
            SymbolKind::DoubleQuote => "DOUBLE_QUOTE_SYMBOL",
            SymbolKind::DecimalSeparator => "DECIMAL_SEPARATOR_SYMBOL",
            SymbolKind::Exponent => "EXPONENT_SYMBOL",
            SymbolKind::DateSeparator => "DATE_SEPARATOR_SYMBOL",
            SymbolKind::TimeSeparator => "TIME_SEPARATOR_SYMBOL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operator_builds_a_binary_parent() {
        for symbol in SymbolKind::ALL {
            assert_eq!(
                symbol.is_operator(),
                symbol.binary_kind().is_some(),
                "{symbol:?}"
            );
            if let Some(kind) = symbol.binary_kind() {
                assert!(kind.is_binary() || kind == ParentKind::CellRange, "{kind:?}");
            }
        }
    }

    #[test]
    fn priorities_are_ordered_loosest_first() {
        assert!(SymbolKind::Equals.priority() < SymbolKind::Concat.priority());
        assert!(SymbolKind::Concat.priority() < SymbolKind::Plus.priority());
        assert_eq!(SymbolKind::Plus.priority(), SymbolKind::Minus.priority());
        assert!(SymbolKind::Minus.priority() < SymbolKind::Multiply.priority());
        assert!(SymbolKind::Divide.priority() < SymbolKind::Power.priority());
        assert!(SymbolKind::Power.priority() < SymbolKind::Between.priority());
        assert_eq!(SymbolKind::ParenthesisOpen.priority(), 0);
    }

    #[test]
    fn production_names_are_unique() {
        let mut names: Vec<_> = SymbolKind::ALL.iter().map(|s| s.production()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SymbolKind::ALL.len());
    }
}
