//! Turns the flat operand/operator run produced by a concatenation into a binary tree.
//!
//! The operator with the lowest priority is the root; among equals the rightmost wins, which
//! makes every level left-associative. An operator only counts when the nearest
//! non-whitespace token on both sides is an operand, so a leading `=` or a unary sign is left
//! alone.

use crate::{ParentKind, Token, TokenError};

/// Splice the children of nested [`ParentKind::Sequence`] tokens into one flat list.
pub fn flatten(tokens: Vec<Token>) -> Vec<Token> {
    let mut flat = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = tokens.into_iter().rev().collect();
    while let Some(token) = stack.pop() {
        match token {
            Token::Parent(parent) if parent.kind() == ParentKind::Sequence => {
                stack.extend(parent.into_children().into_iter().rev());
            }
            token => flat.push(token),
        }
    }
    flat
}

/// Resolve a concatenation's output into at most one token.
///
/// Several tokens without an operator between them are kept in a transparent
/// [`ParentKind::Sequence`].
pub fn resolve(tokens: Vec<Token>) -> Result<Option<Token>, TokenError> {
    let mut resolved = resolve_tokens(flatten(tokens))?;
    match resolved.len() {
        0 => Ok(None),
        1 => Ok(resolved.pop()),
        _ => Token::parent(ParentKind::Sequence, resolved).map(Some),
    }
}

fn is_operand(token: Option<&Token>) -> bool {
    token.is_some_and(|token| token.symbol().is_none())
}

fn nearest_non_whitespace<'a>(mut tokens: impl Iterator<Item = &'a Token>) -> Option<&'a Token> {
    tokens.find(|token| !token.is_whitespace())
}

/// Index of the operator to split at and the parent kind it builds.
fn split_point(tokens: &[Token]) -> Option<(usize, ParentKind)> {
    let mut best: Option<(usize, ParentKind, u8)> = None;
    for (index, token) in tokens.iter().enumerate() {
        let Some(symbol) = token.symbol() else {
            continue;
        };
        let Some(kind) = symbol.binary_kind() else {
            continue;
        };
        let priority = symbol.priority();
        let left = nearest_non_whitespace(tokens[..index].iter().rev());
        let right = nearest_non_whitespace(tokens[index + 1..].iter());
        if !(is_operand(left) && is_operand(right)) {
            continue;
        }
        match best {
            Some((_, _, lowest)) if priority > lowest => {}
            _ => best = Some((index, kind, priority)),
        }
    }
    best.map(|(index, kind, _)| (index, kind))
}

// Leading and trailing whitespace stays outside the tree.
fn resolve_tokens(mut tokens: Vec<Token>) -> Result<Vec<Token>, TokenError> {
    let leading = tokens
        .iter()
        .take_while(|token| token.is_whitespace())
        .count();
    if leading == tokens.len() {
        return Ok(tokens);
    }
    let trailing_start = tokens.len()
        - tokens
            .iter()
            .rev()
            .take_while(|token| token.is_whitespace())
            .count();

    let trailing = tokens.split_off(trailing_start);
    let core = tokens.split_off(leading);
    let mut resolved = tokens;
    resolved.extend(build(core)?);
    resolved.extend(trailing);
    Ok(resolved)
}

fn build(mut core: Vec<Token>) -> Result<Vec<Token>, TokenError> {
    let Some((index, kind)) = split_point(&core) else {
        return Ok(core);
    };
    let right = core.split_off(index + 1);
    let operator = core.pop();
    let left = core;

    let mut children = operand(left)?;
    children.extend(operator);
    children.extend(operand(right)?);
    Ok(vec![Token::parent(kind, children)?])
}

fn operand(tokens: Vec<Token>) -> Result<Vec<Token>, TokenError> {
    let mut resolved = resolve_tokens(tokens)?;
    let meaningful = resolved.iter().filter(|t| !t.is_whitespace()).count();
    if meaningful <= 1 {
        return Ok(resolved);
    }

    // Several operands without an operator between them count as one.
    let leading = resolved.iter().take_while(|t| t.is_whitespace()).count();
    let trailing = resolved.iter().rev().take_while(|t| t.is_whitespace()).count();
    let tail = resolved.split_off(resolved.len() - trailing);
    let middle = resolved.split_off(leading);
    resolved.push(Token::parent(ParentKind::Sequence, middle)?);
    resolved.extend(tail);
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LeafValue, SymbolKind};
    use pretty_assertions::assert_eq;

    fn number(text: &str) -> Token {
        Token::parent(
            ParentKind::Number,
            vec![Token::leaf(LeafValue::Digits, text).unwrap()],
        )
        .unwrap()
    }

    fn op(symbol: SymbolKind, text: &str) -> Token {
        Token::leaf(LeafValue::Symbol(symbol), text).unwrap()
    }

    fn ws() -> Token {
        Token::leaf(LeafValue::Whitespace, " ").unwrap()
    }

    /// Render a resolved tree as nested kinds for comparison.
    fn shape(token: &Token) -> String {
        match token {
            Token::Parent(parent) if parent.kind() == ParentKind::Number => {
                parent.text().to_string()
            }
            Token::Parent(parent) => {
                let children: Vec<String> = parent.non_noise_children().map(shape).collect();
                format!("{:?}({})", parent.kind(), children.join(", "))
            }
            Token::Leaf(leaf) => leaf.text().to_string(),
        }
    }

    #[test]
    fn multiplication_binds_tighter() {
        let tokens = vec![
            number("1"),
            op(SymbolKind::Plus, "+"),
            number("2"),
            op(SymbolKind::Multiply, "*"),
            number("3"),
        ];
        let root = resolve(tokens).unwrap().unwrap();
        assert_eq!(shape(&root), "Addition(1, Multiplication(2, 3))");
        assert_eq!(root.text(), "1+2*3");
    }

    #[test]
    fn equal_priorities_associate_left() {
        let tokens = vec![
            number("1"),
            op(SymbolKind::Minus, "-"),
            number("2"),
            op(SymbolKind::Plus, "+"),
            number("3"),
        ];
        let root = resolve(tokens).unwrap().unwrap();
        assert_eq!(shape(&root), "Addition(Subtraction(1, 2), 3)");

        let tokens = vec![
            number("2"),
            op(SymbolKind::Power, "^"),
            number("3"),
            op(SymbolKind::Power, "^"),
            number("2"),
        ];
        let root = resolve(tokens).unwrap().unwrap();
        assert_eq!(shape(&root), "Power(Power(2, 3), 2)");
    }

    #[test]
    fn comparison_and_concatenation_are_loosest() {
        let tokens = vec![
            number("1"),
            op(SymbolKind::Concat, "&"),
            number("2"),
            op(SymbolKind::Equals, "="),
            number("3"),
            op(SymbolKind::Plus, "+"),
            number("4"),
        ];
        let root = resolve(tokens).unwrap().unwrap();
        assert_eq!(
            shape(&root),
            "Equals(Concatenation(1, 2), Addition(3, 4))"
        );
    }

    #[test]
    fn whitespace_and_nested_sequences() {
        let inner = Token::parent(
            ParentKind::Sequence,
            vec![ws(), op(SymbolKind::Plus, "+"), ws(), number("2")],
        )
        .unwrap();
        let root = resolve(vec![ws(), number("1"), inner, ws()])
            .unwrap()
            .unwrap();

        assert_eq!(root.parent_kind(), Some(ParentKind::Sequence));
        assert_eq!(root.text(), " 1 + 2 ");
        let addition = root.as_parent().unwrap().non_noise_children().next().unwrap();
        assert_eq!(shape(addition), "Addition(1, 2)");
        assert_eq!(addition.text(), "1 + 2");
    }

    #[test]
    fn operators_next_to_symbols_are_ignored() {
        // `-1` is a sign, not a subtraction.
        let tokens = vec![op(SymbolKind::Minus, "-"), number("1")];
        let root = resolve(tokens).unwrap().unwrap();
        assert_eq!(root.parent_kind(), Some(ParentKind::Sequence));

        // `1*-2` with a bare sign: neither symbol has operands on both sides.
        let tokens = vec![
            number("1"),
            op(SymbolKind::Multiply, "*"),
            op(SymbolKind::Minus, "-"),
            number("2"),
        ];
        let root = resolve(tokens).unwrap().unwrap();
        assert_eq!(root.parent_kind(), Some(ParentKind::Sequence));
    }

    #[test]
    fn single_operand_is_returned_unchanged() {
        assert_eq!(resolve(vec![number("7")]).unwrap(), Some(number("7")));
        assert_eq!(resolve(vec![]).unwrap(), None);
    }
}
