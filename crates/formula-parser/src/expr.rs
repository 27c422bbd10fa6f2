use core::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use formula_reference::{
    CellRangeReference, CellReference, ColumnReference, FunctionName, LabelName, RowReference,
};
use serde::{Deserialize, Serialize};

/// The lowered form of a formula.
///
/// `Display` renders the functional form used in diagnostics, e.g. `add(1, multiply(2, 3))`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Value(ExpressionValue),
    Reference(ExpressionReference),
    /// The callee of a [`CallExpr`].
    Function(FunctionName),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Call(CallExpr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionValue {
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpressionReference {
    Cell(CellReference),
    Range(CellRangeReference),
    Label(LabelName),
    Column(ColumnReference),
    Row(RowReference),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Negate,
}

impl UnaryOp {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            UnaryOp::Negate => "negate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub expr: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
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
}

impl BinaryOp {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
            BinaryOp::Power => "power",
            BinaryOp::Concat => "concat",
            BinaryOp::Equals => "equals",
            BinaryOp::NotEquals => "notEquals",
            BinaryOp::GreaterThan => "greaterThan",
            BinaryOp::GreaterThanEquals => "greaterThanEquals",
            BinaryOp::LessThan => "lessThan",
            BinaryOp::LessThanEquals => "lessThanEquals",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// A call of `callee` with `args`. Lambdas lower to a call whose callee is itself a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub callee: Box<Expression>,
    pub args: Vec<Expression>,
}

impl Expression {
    #[must_use]
    pub fn number(value: f64) -> Self {
        Expression::Value(ExpressionValue::Number(value))
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Expression::Value(ExpressionValue::Text(value.into()))
    }

    #[must_use]
    pub fn negate(expr: Expression) -> Self {
        Expression::Unary(UnaryExpr {
            op: UnaryOp::Negate,
            expr: Box::new(expr),
        })
    }

    #[must_use]
    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    #[must_use]
    pub fn call(callee: Expression, args: Vec<Expression>) -> Self {
        Expression::Call(CallExpr {
            callee: Box::new(callee),
            args,
        })
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Value(value) => fmt::Display::fmt(value, f),
            Expression::Reference(reference) => fmt::Display::fmt(reference, f),
            Expression::Function(name) => fmt::Display::fmt(name, f),
            Expression::Unary(unary) => write!(f, "{}({})", unary.op.name(), unary.expr),
            Expression::Binary(binary) => write!(
                f,
                "{}({}, {})",
                binary.op.name(),
                binary.left,
                binary.right
            ),
            Expression::Call(call) => {
                write!(f, "{}(", call.callee)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(arg, f)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for ExpressionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionValue::Number(value) => fmt::Display::fmt(value, f),
            ExpressionValue::Text(text) => write!(f, "{text:?}"),
            ExpressionValue::Date(date) => fmt::Display::fmt(date, f),
            ExpressionValue::Time(time) => fmt::Display::fmt(time, f),
            ExpressionValue::DateTime(date_time) => fmt::Display::fmt(date_time, f),
        }
    }
}

impl fmt::Display for ExpressionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionReference::Cell(cell) => fmt::Display::fmt(cell, f),
            ExpressionReference::Range(range) => fmt::Display::fmt(range, f),
            ExpressionReference::Label(label) => fmt::Display::fmt(label, f),
            ExpressionReference::Column(column) => fmt::Display::fmt(column, f),
            ExpressionReference::Row(row) => fmt::Display::fmt(row, f),
        }
    }
}
