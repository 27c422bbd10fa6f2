//! Lowering of a parse tree into an [`Expression`].
//!
//! The walk is iterative. Entering a parent opens a fresh accumulator for its children's
//! expressions; leaving it folds that accumulator into the parent's expression(s) and appends
//! them to the enclosing accumulator. Whitespace and symbols contribute nothing.

mod scalar;

use std::mem;

use crate::expr::{BinaryOp, ExpressionReference};
use crate::{Expression, LeafValue, LoweringError, ParentKind, ParentToken, ParserContext, Token};

enum Step<'a> {
    Enter(&'a Token),
    Exit(&'a ParentToken),
}

/// Lower `token` into at most one expression.
///
/// Returns `Ok(None)` for a tree with no meaningful content, such as bare whitespace.
pub fn lower(token: &Token, context: &dyn ParserContext) -> Result<Option<Expression>, LoweringError> {
    let mut steps = vec![Step::Enter(token)];
    let mut current: Vec<Expression> = Vec::new();
    let mut saved: Vec<Vec<Expression>> = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(token) => match token {
                Token::Leaf(leaf) => current.extend(lower_leaf(leaf.value(), leaf.text())?),
                Token::Parent(parent) => {
                    if let Some(expr) = lower_scalar(token, parent, context)? {
                        current.push(expr);
                        continue;
                    }
                    saved.push(mem::take(&mut current));
                    steps.push(Step::Exit(parent));
                    steps.extend(parent.children().iter().rev().map(Step::Enter));
                }
            },
            Step::Exit(parent) => {
                let values = mem::replace(&mut current, saved.pop().unwrap_or_default());
                current.extend(fold(parent, values)?);
            }
        }
    }

    match current.len() {
        0 => Ok(None),
        1 => Ok(current.pop()),
        count => Err(LoweringError::MultipleResults {
            count,
            text: token.text().to_string(),
        }),
    }
}

fn lower_leaf(value: &LeafValue, text: &str) -> Result<Option<Expression>, LoweringError> {
    let expr = match value {
        LeafValue::Label(label) => {
            Expression::Reference(ExpressionReference::Label(label.clone()))
        }
        LeafValue::Column(column) => Expression::Reference(ExpressionReference::Column(*column)),
        LeafValue::Row(row) => Expression::Reference(ExpressionReference::Row(*row)),
        LeafValue::FunctionName(name) => Expression::Function(name.clone()),
        LeafValue::TextLiteral(literal) => Expression::text(literal.as_str()),
        LeafValue::Digits => Expression::number(scalar::parse_number(text)?),
        _ => return Ok(None),
    };
    Ok(Some(expr))
}

/// Parents that lower straight from their own text and leaves, without visiting children.
fn lower_scalar(
    token: &Token,
    parent: &ParentToken,
    context: &dyn ParserContext,
) -> Result<Option<Expression>, LoweringError> {
    let expr = match parent.kind() {
        ParentKind::CellReference => match parent.cell_reference() {
            Some(cell) => Expression::Reference(ExpressionReference::Cell(cell)),
            None => return Err(arity(parent, 1, 0)),
        },
        ParentKind::CellRange => match parent.cell_range() {
            Some(range) => Expression::Reference(ExpressionReference::Range(range)),
            None => return Err(arity(parent, 1, 0)),
        },
        ParentKind::Number => scalar::number(token)?,
        ParentKind::Text => scalar::text(parent),
        ParentKind::Date => scalar::date(token, context)?,
        ParentKind::Time => scalar::time(token)?,
        ParentKind::DateTime => scalar::date_time(parent, context)?,
        _ => return Ok(None),
    };
    Ok(Some(expr))
}

fn fold(parent: &ParentToken, mut values: Vec<Expression>) -> Result<Vec<Expression>, LoweringError> {
    let kind = parent.kind();
    if let Some(op) = binary_op(kind) {
        let [left, right] = exactly::<2>(parent, values)?;
        return Ok(vec![Expression::binary(op, left, right)]);
    }

    match kind {
        ParentKind::Group | ParentKind::Sequence | ParentKind::FunctionParameters => Ok(values),
        ParentKind::Negative => {
            let [operand] = exactly::<1>(parent, values)?;
            Ok(vec![Expression::negate(operand)])
        }
        ParentKind::Percentage => {
            let [operand] = exactly::<1>(parent, values)?;
            Ok(vec![Expression::binary(
                BinaryOp::Divide,
                operand,
                Expression::number(100.0),
            )])
        }
        ParentKind::NamedFunction => {
            if values.is_empty() {
                return Err(arity(parent, 1, 0));
            }
            let callee = values.remove(0);
            Ok(vec![Expression::call(callee, values)])
        }
        ParentKind::LambdaFunction => {
            let formals = parent
                .children()
                .iter()
                .find_map(|child| {
                    child
                        .as_parent()
                        .filter(|p| p.kind() == ParentKind::FunctionParameters)
                })
                .map_or(0, ParentToken::non_noise_count);
            if values.len() < formals + 1 {
                return Err(arity(parent, formals + 1, values.len()));
            }
            let arguments = values.split_off(formals + 1);
            let callee = values.remove(0);
            Ok(vec![Expression::call(
                Expression::call(callee, values),
                arguments,
            )])
        }
        // Everything else lowers on entry.
        _ => Ok(values),
    }
}

fn binary_op(kind: ParentKind) -> Option<BinaryOp> {
    Some(match kind {
        ParentKind::Addition => BinaryOp::Add,
        ParentKind::Subtraction => BinaryOp::Subtract,
        ParentKind::Multiplication => BinaryOp::Multiply,
        ParentKind::Division => BinaryOp::Divide,
        ParentKind::Power => BinaryOp::Power,
        ParentKind::Concatenation => BinaryOp::Concat,
        ParentKind::Equals => BinaryOp::Equals,
        ParentKind::NotEquals => BinaryOp::NotEquals,
        ParentKind::GreaterThan => BinaryOp::GreaterThan,
        ParentKind::GreaterThanEquals => BinaryOp::GreaterThanEquals,
        ParentKind::LessThan => BinaryOp::LessThan,
        ParentKind::LessThanEquals => BinaryOp::LessThanEquals,
        _ => return None,
    })
}

fn exactly<const N: usize>(
    parent: &ParentToken,
    values: Vec<Expression>,
) -> Result<[Expression; N], LoweringError> {
    let actual = values.len();
    values.try_into().map_err(|_| arity(parent, N, actual))
}

fn arity(parent: &ParentToken, expected: usize, actual: usize) -> LoweringError {
    LoweringError::Arity {
        kind: parent.kind(),
        text: parent.text().to_string(),
        expected,
        actual,
    }
}
