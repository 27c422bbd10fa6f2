//! The immutable parse tree.
//!
//! A [`Token`] is either a [`LeafToken`] carrying one typed value or a [`ParentToken`] carrying
//! an ordered, non-empty list of children. A parent's text is always the concatenation of its
//! children's text, and [`ParentToken::new`] checks that the children have the shape the kind
//! requires. Construction is the only place those rules are enforced, so every token in
//! existence is valid. Edits never mutate; they return a rebuilt, revalidated token.

mod symbol;

use core::fmt;

use formula_reference::{
    CellRangeReference, CellReference, ColumnReference, FunctionName, LabelName, RowReference,
};
use serde::{Deserialize, Serialize};

use crate::TokenError;

pub use symbol::{SymbolKind, MAX_PRIORITY};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmPm {
    Am,
    Pm,
}

/// The typed value of a leaf token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeafValue {
    Whitespace,
    Symbol(SymbolKind),
    /// A run of decimal digits; the digits are the token text.
    Digits,
    /// Text literal content with `""` escapes already collapsed.
    TextLiteral(String),
    Column(ColumnReference),
    Row(RowReference),
    Label(LabelName),
    FunctionName(FunctionName),
    /// 0-based weekday, Sunday first.
    DayName(u32),
    DayNumber(u32),
    /// 1-based month.
    MonthNumber(u32),
    /// 1-based month.
    MonthName(u32),
    /// The year as written; a short token text marks a two-digit year.
    Year(i32),
    Hour(u32),
    Minute(u32),
    Seconds(u32),
    Millis(u32),
    AmPm(AmPm),
}

impl LeafValue {
    pub const fn name(&self) -> &'static str {
        match self {
            LeafValue::Whitespace => "Whitespace",
            LeafValue::Symbol(_) => "Symbol",
            LeafValue::Digits => "Digits",
            LeafValue::TextLiteral(_) => "TextLiteral",
            LeafValue::Column(_) => "Column",
            LeafValue::Row(_) => "Row",
            LeafValue::Label(_) => "Label",
            LeafValue::FunctionName(_) => "FunctionName",
            LeafValue::DayName(_) => "DayName",
            LeafValue::DayNumber(_) => "DayNumber",
            LeafValue::MonthNumber(_) => "MonthNumber",
            LeafValue::MonthName(_) => "MonthName",
            LeafValue::Year(_) => "Year",
            LeafValue::Hour(_) => "Hour",
            LeafValue::Minute(_) => "Minute",
            LeafValue::Seconds(_) => "Seconds",
            LeafValue::Millis(_) => "Millis",
            LeafValue::AmPm(_) => "AmPm",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafToken {
    value: LeafValue,
    text: String,
}

impl LeafToken {
    pub fn new(value: LeafValue, text: impl Into<String>) -> Result<Self, TokenError> {
        let text = text.into();
        if text.is_empty() {
            return Err(TokenError::EmptyText(value.name()));
        }
        Ok(Self { value, text })
    }

    #[inline]
    pub fn value(&self) -> &LeafValue {
        &self.value
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whitespace and symbols carry no meaning of their own once the tree is built.
    #[inline]
    pub fn is_noise(&self) -> bool {
        matches!(self.value, LeafValue::Whitespace | LeafValue::Symbol(_))
    }

    #[inline]
    pub fn symbol(&self) -> Option<SymbolKind> {
        match self.value {
            LeafValue::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Power,
    Concatenation,
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanEquals,
    LessThan,
    LessThanEquals,
    Negative,
    Percentage,
    Group,
    /// Transparent wrapper produced by a concatenation that is not an operator tree.
    Sequence,
    CellReference,
    CellRange,
    NamedFunction,
    LambdaFunction,
    FunctionParameters,
    Number,
    Text,
    Date,
    Time,
    DateTime,
}

impl ParentKind {
    pub const fn is_binary(self) -> bool {
        matches!(
            self,
            ParentKind::Addition
                | ParentKind::Subtraction
                | ParentKind::Multiplication
                | ParentKind::Division
                | ParentKind::Power
                | ParentKind::Concatenation
                | ParentKind::Equals
                | ParentKind::NotEquals
                | ParentKind::GreaterThan
                | ParentKind::GreaterThanEquals
                | ParentKind::LessThan
                | ParentKind::LessThanEquals
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ParentReference {
    Cell(CellReference),
    Range(CellRangeReference),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParentToken {
    kind: ParentKind,
    children: Vec<Token>,
    text: String,
    // Derived once at construction.
    non_noise: Vec<usize>,
    reference: Option<ParentReference>,
}

impl ParentToken {
    /// Build a parent from its children, validating the shape `kind` requires.
    pub fn new(kind: ParentKind, children: Vec<Token>) -> Result<Self, TokenError> {
        if children.is_empty() {
            return Err(TokenError::NoChildren { kind });
        }

        let text: String = children.iter().map(Token::text).collect();
        let non_noise = children
            .iter()
            .enumerate()
            .filter(|(_, child)| !child.is_noise())
            .map(|(index, _)| index)
            .collect();

        let mut token = Self {
            kind,
            children,
            text,
            non_noise,
            reference: None,
        };
        token.reference = token.validate()?;
        Ok(token)
    }

    /// Like [`ParentToken::new`], additionally checking the children reproduce `text` exactly.
    pub fn with_text(
        kind: ParentKind,
        children: Vec<Token>,
        text: &str,
    ) -> Result<Self, TokenError> {
        let token = Self::new(kind, children)?;
        if token.text != text {
            return Err(TokenError::TextMismatch {
                expected: token.text,
                actual: text.to_string(),
            });
        }
        Ok(token)
    }

    #[inline]
    pub fn kind(&self) -> ParentKind {
        self.kind
    }

    #[inline]
    pub fn children(&self) -> &[Token] {
        &self.children
    }

    #[inline]
    pub fn into_children(self) -> Vec<Token> {
        self.children
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Children other than whitespace and symbols, in source order.
    pub fn non_noise_children(&self) -> impl ExactSizeIterator<Item = &Token> + '_ {
        self.non_noise.iter().map(move |&index| &self.children[index])
    }

    #[inline]
    pub fn non_noise_count(&self) -> usize {
        self.non_noise.len()
    }

    /// The cell a [`ParentKind::CellReference`] token denotes.
    pub fn cell_reference(&self) -> Option<CellReference> {
        match self.reference {
            Some(ParentReference::Cell(cell)) => Some(cell),
            _ => None,
        }
    }

    /// The range a [`ParentKind::CellRange`] token denotes.
    pub fn cell_range(&self) -> Option<CellRangeReference> {
        match self.reference {
            Some(ParentReference::Range(range)) => Some(range),
            _ => None,
        }
    }

    /// Rebuild with new children, returning a clone when they are unchanged.
    pub fn set_children(&self, children: Vec<Token>) -> Result<Self, TokenError> {
        if children == self.children {
            return Ok(self.clone());
        }
        Self::new(self.kind, children)
    }

    fn invalid_shape(&self, expected: &'static str) -> TokenError {
        let found = self
            .non_noise_children()
            .map(Token::describe)
            .collect::<Vec<_>>()
            .join(", ");
        TokenError::InvalidShape {
            kind: self.kind,
            expected,
            found: if found.is_empty() {
                "nothing".to_string()
            } else {
                found
            },
            text: self.text.clone(),
        }
    }

    fn expect_count(&self, count: usize, expected: &'static str) -> Result<(), TokenError> {
        if self.non_noise.len() == count {
            Ok(())
        } else {
            Err(self.invalid_shape(expected))
        }
    }

    fn validate(&self) -> Result<Option<ParentReference>, TokenError> {
        let non_noise: Vec<&Token> = self.non_noise_children().collect();

        match self.kind {
            kind if kind.is_binary() => self.expect_count(2, "a left and a right operand")?,
            ParentKind::Negative | ParentKind::Percentage | ParentKind::Group => {
                self.expect_count(1, "exactly one operand")?
            }
            ParentKind::Sequence | ParentKind::FunctionParameters => {}
            ParentKind::CellReference => {
                const EXPECTED: &str = "exactly one column and one row";
                let mut column = None;
                let mut row = None;
                for child in &non_noise {
                    match child.leaf_value() {
                        Some(LeafValue::Column(value)) if column.is_none() => {
                            column = Some(*value)
                        }
                        Some(LeafValue::Row(value)) if row.is_none() => row = Some(*value),
                        _ => return Err(self.invalid_shape(EXPECTED)),
                    }
                }
                return match (column, row) {
                    (Some(column), Some(row)) => Ok(Some(ParentReference::Cell(
                        CellReference::new(column, row),
                    ))),
                    _ => Err(self.invalid_shape(EXPECTED)),
                };
            }
            ParentKind::CellRange => {
                return match non_noise.as_slice() {
                    [begin, end] => match (begin.cell_reference(), end.cell_reference()) {
                        (Some(begin), Some(end)) => Ok(Some(ParentReference::Range(
                            CellRangeReference::new(begin, end),
                        ))),
                        _ => Err(self.invalid_shape("a begin and an end cell")),
                    },
                    _ => Err(self.invalid_shape("a begin and an end cell")),
                };
            }
            ParentKind::NamedFunction => match non_noise.as_slice() {
                [name, parameters] if name.is_function_name() && parameters.is_parameters() => {}
                _ => return Err(self.invalid_shape("a function name and parameters")),
            },
            ParentKind::LambdaFunction => match non_noise.as_slice() {
                [name, formals, values]
                    if name.is_function_name()
                        && formals.is_parameters()
                        && values.is_parameters() => {}
                _ => {
                    return Err(self.invalid_shape(
                        "a function name, formal parameters and argument values",
                    ))
                }
            },
            ParentKind::Number => {
                let digits = non_noise
                    .iter()
                    .all(|child| matches!(child.leaf_value(), Some(LeafValue::Digits)));
                if non_noise.is_empty() || !digits {
                    return Err(self.invalid_shape("digits"));
                }
            }
            ParentKind::Text => {
                let literal = non_noise
                    .iter()
                    .all(|child| matches!(child.leaf_value(), Some(LeafValue::TextLiteral(_))));
                if non_noise.len() > 1 || !literal {
                    return Err(self.invalid_shape("at most one text literal"));
                }
            }
            ParentKind::Date => {
                let day = self.count_leaves(|v| matches!(v, LeafValue::DayNumber(_)));
                let month = self.count_leaves(|v| {
                    matches!(v, LeafValue::MonthNumber(_) | LeafValue::MonthName(_))
                });
                let year = self.count_leaves(|v| matches!(v, LeafValue::Year(_)));
                if day != 1 || month != 1 || year > 1 {
                    return Err(self.invalid_shape("a day, a month and an optional year"));
                }
            }
            ParentKind::Time => {
                let hour = self.count_leaves(|v| matches!(v, LeafValue::Hour(_)));
                let minute = self.count_leaves(|v| matches!(v, LeafValue::Minute(_)));
                if hour != 1 || minute != 1 {
                    return Err(self.invalid_shape("an hour and a minute"));
                }
            }
            ParentKind::DateTime => match non_noise.as_slice() {
                [date, time]
                    if date.parent_kind() == Some(ParentKind::Date)
                        && time.parent_kind() == Some(ParentKind::Time) => {}
                _ => return Err(self.invalid_shape("a date and a time")),
            },
            _ => {}
        }

        Ok(None)
    }

    fn count_leaves(&self, predicate: impl Fn(&LeafValue) -> bool) -> usize {
        self.non_noise_children()
            .filter(|child| child.leaf_value().is_some_and(&predicate))
            .count()
    }
}

/// A node of the parse tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Leaf(LeafToken),
    Parent(ParentToken),
}

impl Token {
    pub fn leaf(value: LeafValue, text: impl Into<String>) -> Result<Self, TokenError> {
        LeafToken::new(value, text).map(Token::Leaf)
    }

    pub fn parent(kind: ParentKind, children: Vec<Token>) -> Result<Self, TokenError> {
        ParentToken::new(kind, children).map(Token::Parent)
    }

    /// The exact source text this token was parsed from.
    #[inline]
    pub fn text(&self) -> &str {
        match self {
            Token::Leaf(leaf) => leaf.text(),
            Token::Parent(parent) => parent.text(),
        }
    }

    #[inline]
    pub fn children(&self) -> &[Token] {
        match self {
            Token::Leaf(_) => &[],
            Token::Parent(parent) => parent.children(),
        }
    }

    #[inline]
    pub fn is_noise(&self) -> bool {
        matches!(self, Token::Leaf(leaf) if leaf.is_noise())
    }

    #[inline]
    pub fn is_whitespace(&self) -> bool {
        matches!(self.leaf_value(), Some(LeafValue::Whitespace))
    }

    #[inline]
    pub fn symbol(&self) -> Option<SymbolKind> {
        match self {
            Token::Leaf(leaf) => leaf.symbol(),
            Token::Parent(_) => None,
        }
    }

    #[inline]
    pub fn leaf_value(&self) -> Option<&LeafValue> {
        match self {
            Token::Leaf(leaf) => Some(leaf.value()),
            Token::Parent(_) => None,
        }
    }

    #[inline]
    pub fn parent_kind(&self) -> Option<ParentKind> {
        match self {
            Token::Leaf(_) => None,
            Token::Parent(parent) => Some(parent.kind()),
        }
    }

    #[inline]
    pub fn as_parent(&self) -> Option<&ParentToken> {
        match self {
            Token::Leaf(_) => None,
            Token::Parent(parent) => Some(parent),
        }
    }

    pub fn cell_reference(&self) -> Option<CellReference> {
        self.as_parent().and_then(ParentToken::cell_reference)
    }

    fn is_function_name(&self) -> bool {
        matches!(self.leaf_value(), Some(LeafValue::FunctionName(_)))
    }

    fn is_parameters(&self) -> bool {
        self.parent_kind() == Some(ParentKind::FunctionParameters)
    }

    fn describe(&self) -> String {
        match self {
            Token::Leaf(leaf) => leaf.value().name().to_string(),
            Token::Parent(parent) => format!("{:?}", parent.kind()),
        }
    }

    /// Leaves in source order, without recursion.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }

    /// Remove every descendant matching `predicate`. The token itself is never removed.
    pub fn remove_if<P>(&self, mut predicate: P) -> Result<Token, TokenError>
    where
        P: FnMut(&Token) -> bool,
    {
        Ok(self
            .remove_descendants(&mut predicate, false)?
            .unwrap_or_else(|| self.clone()))
    }

    /// Remove the first descendant, depth first, matching `predicate`.
    pub fn remove_first_if<P>(&self, mut predicate: P) -> Result<Token, TokenError>
    where
        P: FnMut(&Token) -> bool,
    {
        Ok(self
            .remove_descendants(&mut predicate, true)?
            .unwrap_or_else(|| self.clone()))
    }

    /// Replace this token or any descendant matching `predicate` with `mapper`'s result.
    /// Replacements are not searched again.
    pub fn replace_if<P, M>(&self, mut predicate: P, mut mapper: M) -> Result<Token, TokenError>
    where
        P: FnMut(&Token) -> bool,
        M: FnMut(&Token) -> Token,
    {
        Ok(self
            .replace_matching(&mut predicate, &mut mapper, false)?
            .unwrap_or_else(|| self.clone()))
    }

    /// Replace the first token, depth first and starting with this one, matching `predicate`.
    pub fn replace_first_if<P, M>(
        &self,
        mut predicate: P,
        mut mapper: M,
    ) -> Result<Token, TokenError>
    where
        P: FnMut(&Token) -> bool,
        M: FnMut(&Token) -> Token,
    {
        Ok(self
            .replace_matching(&mut predicate, &mut mapper, true)?
            .unwrap_or_else(|| self.clone()))
    }

    // `Ok(None)` means nothing changed.
    fn remove_descendants(
        &self,
        predicate: &mut dyn FnMut(&Token) -> bool,
        first_only: bool,
    ) -> Result<Option<Token>, TokenError> {
        let Token::Parent(parent) = self else {
            return Ok(None);
        };

        let mut changed = false;
        let mut children = Vec::with_capacity(parent.children.len());
        for child in &parent.children {
            if changed && first_only {
                children.push(child.clone());
                continue;
            }
            if predicate(child) {
                changed = true;
                continue;
            }
            match child.remove_descendants(predicate, first_only)? {
                Some(edited) => {
                    changed = true;
                    children.push(edited);
                }
                None => children.push(child.clone()),
            }
        }

        if !changed {
            return Ok(None);
        }
        Token::parent(parent.kind, children).map(Some)
    }

    fn replace_matching(
        &self,
        predicate: &mut dyn FnMut(&Token) -> bool,
        mapper: &mut dyn FnMut(&Token) -> Token,
        first_only: bool,
    ) -> Result<Option<Token>, TokenError> {
        if predicate(self) {
            return Ok(Some(mapper(self)));
        }
        let Token::Parent(parent) = self else {
            return Ok(None);
        };

        let mut changed = false;
        let mut children = Vec::with_capacity(parent.children.len());
        for child in &parent.children {
            if changed && first_only {
                children.push(child.clone());
                continue;
            }
            match child.replace_matching(predicate, mapper, first_only)? {
                Some(edited) => {
                    changed = true;
                    children.push(edited);
                }
                None => children.push(child.clone()),
            }
        }

        if !changed {
            return Ok(None);
        }
        Token::parent(parent.kind, children).map(Some)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl From<LeafToken> for Token {
    fn from(value: LeafToken) -> Self {
        Token::Leaf(value)
    }
}

impl From<ParentToken> for Token {
    fn from(value: ParentToken) -> Self {
        Token::Parent(value)
    }
}

/// Depth-first iterator over the leaves of a token.
pub struct Leaves<'a> {
    stack: Vec<&'a Token>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a LeafToken;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(token) = self.stack.pop() {
            match token {
                Token::Leaf(leaf) => return Some(leaf),
                Token::Parent(parent) => self.stack.extend(parent.children.iter().rev()),
            }
        }
        None
    }
}
