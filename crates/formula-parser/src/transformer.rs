use std::collections::HashMap;
use std::sync::OnceLock;

use crate::ebnf::{required_if_suffixed, EbnfNode, GrammarTransformer, REQUIRED_SUFFIX};
use crate::precedence::{flatten, resolve};
use crate::{GrammarError, ParentKind, ParseError, Parser, SymbolKind, Token};

type Factory = fn(Vec<Token>) -> Result<Vec<Token>, ParseError>;

/// Wires the formula grammar's productions to parse-tree tokens.
///
/// Concatenations go through operator-precedence resolution, named productions are built
/// into their token kind, and `_REQUIRED` references become hard failures. Signs, groups and
/// function calls count towards the nesting limit. Terminals are rejected: every piece of
/// formula text is matched by a named leaf parser.
#[derive(Copy, Clone, Debug, Default)]
pub struct FormulaGrammarTransformer;

impl GrammarTransformer for FormulaGrammarTransformer {
    fn concatenation(&self, _node: &EbnfNode, parser: Parser) -> Result<Parser, GrammarError> {
        Ok(parser.transform(|tokens| Ok(resolve(tokens)?.into_iter().collect())))
    }

    fn identifier(&self, name: &str, parser: Parser) -> Result<Parser, GrammarError> {
        let base = name.strip_suffix(REQUIRED_SUFFIX).unwrap_or(name);
        let mut parser = match factories().get(base) {
            Some(&factory) => parser.transform(factory),
            None => parser,
        };
        if NESTED.contains(&base) {
            parser = parser.nested();
        }
        Ok(required_if_suffixed(name, parser))
    }

    fn range(&self, _node: &EbnfNode, parser: Parser) -> Result<Parser, GrammarError> {
        Ok(parser.transform(|tokens| build(ParentKind::CellRange, tokens)))
    }

    fn terminal(&self, node: &EbnfNode, _parser: Parser) -> Result<Parser, GrammarError> {
        let text = match node {
            EbnfNode::Terminal(text) => text.clone(),
            other => format!("{other:?}"),
        };
        Err(GrammarError::UnexpectedTerminal(text))
    }
}

const NESTED: &[&str] = &["NEGATIVE", "GROUP", "NAMED_FUNCTION", "LAMBDA_FUNCTION"];

fn factories() -> &'static HashMap<&'static str, Factory> {
    static FACTORIES: OnceLock<HashMap<&'static str, Factory>> = OnceLock::new();
    FACTORIES.get_or_init(|| {
        let mut map: HashMap<&'static str, Factory> = HashMap::new();
        map.insert("FORMULA", group_if_needed);
        map.insert("EXPRESSION", group_if_needed);
        map.insert("NEGATIVE", |t| build(ParentKind::Negative, t));
        map.insert("PERCENTAGE", |t| build(ParentKind::Percentage, t));
        map.insert("PERCENTAGE_OR_VALUE", percentage_if_marked);
        map.insert("GROUP", |t| build(ParentKind::Group, t));
        map.insert("NAMED_FUNCTION", |t| build(ParentKind::NamedFunction, t));
        map.insert("LAMBDA_FUNCTION", lambda_or_call);
        map.insert("FUNCTION_PARAMETERS", |t| {
            build(ParentKind::FunctionParameters, t)
        });
        map.insert("CELL", |t| build(ParentKind::CellReference, t));
        map.insert("NUMBER", |t| build(ParentKind::Number, t));
        map.insert("SIGNED_NUMBER", |t| build(ParentKind::Number, t));
        map.insert("TEXT", |t| build(ParentKind::Text, t));
        map.insert("DATE", |t| build(ParentKind::Date, t));
        map.insert("TIME", |t| build(ParentKind::Time, t));
        map.insert("DATE_TIME", |t| build(ParentKind::DateTime, t));
        map
    })
}

fn build(kind: ParentKind, tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
    Ok(vec![Token::parent(kind, flatten(tokens))?])
}

/// A lone token is already typed; anything else (e.g. an operand with surrounding
/// whitespace) is wrapped in a [`ParentKind::Group`].
fn group_if_needed(tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
    let mut flat = flatten(tokens);
    match flat.len() {
        0 => Ok(flat),
        1 if !flat[0].is_noise() => Ok(vec![flat.remove(0)]),
        _ => Ok(vec![Token::parent(ParentKind::Group, flat)?]),
    }
}

/// `LAMBDA(..)(..)` is a lambda; `LAMBDA(..)` on its own is an ordinary call.
fn lambda_or_call(tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
    let flat = flatten(tokens);
    let lists = flat
        .iter()
        .filter(|token| token.parent_kind() == Some(ParentKind::FunctionParameters))
        .count();
    let kind = if lists == 2 {
        ParentKind::LambdaFunction
    } else {
        ParentKind::NamedFunction
    };
    Ok(vec![Token::parent(kind, flat)?])
}

fn percentage_if_marked(tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
    let flat = flatten(tokens);
    if flat
        .iter()
        .any(|token| token.symbol() == Some(SymbolKind::Percent))
    {
        return Ok(vec![Token::parent(ParentKind::Percentage, flat)?]);
    }
    Ok(flat)
}
