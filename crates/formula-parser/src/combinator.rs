//! Backtracking parser combinators produced by grammar compilation.
//!
//! A parser returns `Ok(Some(tokens))` on a match, `Ok(None)` on an ordinary mismatch (the
//! cursor is restored to where the attempt started) and `Err` on a hard failure, which no
//! enclosing alternative may recover from.

use core::fmt;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{LeafValue, ParentKind, ParseError, ParserContext, TextCursor, Token};

pub type LeafFn = dyn Fn(&mut TextCursor<'_>, &dyn ParserContext) -> Result<Option<Token>, ParseError>
    + Send
    + Sync;

pub type TransformFn = dyn Fn(Vec<Token>) -> Result<Vec<Token>, ParseError> + Send + Sync;

/// Deepest [`Parser::Nested`] stack a parse may enter.
pub const MAX_NESTING: usize = 64;

/// Everything a parse needs besides the cursor.
#[derive(Copy, Clone)]
pub struct ParseEnv<'a> {
    pub rules: &'a HashMap<String, Parser>,
    pub context: &'a dyn ParserContext,
    /// Number of [`Parser::Nested`] parsers currently entered.
    pub depth: usize,
}

impl<'a> ParseEnv<'a> {
    pub fn new(rules: &'a HashMap<String, Parser>, context: &'a dyn ParserContext) -> Self {
        Self {
            rules,
            context,
            depth: 0,
        }
    }
}

/// A hand-written parser for a single leaf token.
#[derive(Clone)]
pub struct LeafParser {
    name: &'static str,
    parse: Arc<LeafFn>,
}

impl LeafParser {
    pub fn new<F>(name: &'static str, parse: F) -> Self
    where
        F: Fn(&mut TextCursor<'_>, &dyn ParserContext) -> Result<Option<Token>, ParseError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name,
            parse: Arc::new(parse),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the parser, leaving the cursor where it was when nothing matches.
    pub fn parse(
        &self,
        cursor: &mut TextCursor<'_>,
        context: &dyn ParserContext,
    ) -> Result<Option<Token>, ParseError> {
        let start = cursor.save();
        let token = (self.parse)(cursor, context)?;
        if token.is_none() {
            cursor.restore(start);
        }
        Ok(token)
    }
}

impl fmt::Debug for LeafParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LeafParser").field(&self.name).finish()
    }
}

/// Post-processing applied to the tokens a parser produced.
#[derive(Clone)]
pub struct TokenTransform(Arc<TransformFn>);

impl TokenTransform {
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(Vec<Token>) -> Result<Vec<Token>, ParseError> + Send + Sync + 'static,
    {
        Self(Arc::new(transform))
    }

    pub fn apply(&self, tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
        (self.0)(tokens)
    }
}

impl fmt::Debug for TokenTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenTransform")
    }
}

#[derive(Clone, Debug)]
pub enum Parser {
    /// Ordered choice: the first alternative that matches wins.
    Alternatives(Vec<Parser>),
    /// Every part in order; yields one [`ParentKind::Sequence`] token.
    Concatenation(Vec<Parser>),
    Optional(Box<Parser>),
    Repeated(Box<Parser>),
    /// `parser` unless `exception` matches at the same position.
    Exception {
        parser: Box<Parser>,
        exception: Box<Parser>,
    },
    Terminal(String),
    /// A named production, resolved lazily so rules can recurse.
    Reference(String),
    Leaf(LeafParser),
    Transform {
        parser: Box<Parser>,
        transform: TokenTransform,
    },
    /// Turns a mismatch of `parser` into [`ParseError::Required`].
    Required {
        parser: Box<Parser>,
        production: String,
    },
    /// One level of formula nesting. A parse may attempt one level past [`MAX_NESTING`], so
    /// a mismatch there is still a mismatch; attempting a level beyond that is a hard failure.
    Nested(Box<Parser>),
}

impl Parser {
    pub fn transform<F>(self, transform: F) -> Self
    where
        F: Fn(Vec<Token>) -> Result<Vec<Token>, ParseError> + Send + Sync + 'static,
    {
        Parser::Transform {
            parser: Box::new(self),
            transform: TokenTransform::new(transform),
        }
    }

    pub fn required(self, production: impl Into<String>) -> Self {
        Parser::Required {
            parser: Box::new(self),
            production: production.into(),
        }
    }

    pub fn nested(self) -> Self {
        Parser::Nested(Box::new(self))
    }

    /// Run the parser. On `Ok(None)` the cursor is back where the attempt started.
    pub fn parse(
        &self,
        cursor: &mut TextCursor<'_>,
        env: ParseEnv<'_>,
    ) -> Result<Option<Vec<Token>>, ParseError> {
        // Entered dozens of times per nesting level: every arm stays a plain call.
        match self {
            Parser::Alternatives(alternatives) => parse_alternatives(alternatives, cursor, env),
            Parser::Concatenation(parts) => parse_concatenation(parts, cursor, env),
            Parser::Optional(parser) => parse_optional(parser, cursor, env),
            Parser::Repeated(parser) => parse_repeated(parser, cursor, env),
            Parser::Exception { parser, exception } => {
                parse_exception(parser, exception, cursor, env)
            }
            Parser::Terminal(text) => parse_terminal(text, cursor),
            Parser::Reference(name) => parse_reference(name, cursor, env),
            Parser::Leaf(leaf) => parse_leaf(leaf, cursor, env),
            Parser::Transform { parser, transform } => {
                parse_transform(parser, transform, cursor, env)
            }
            Parser::Required { parser, production } => {
                parse_required(parser, production, cursor, env)
            }
            Parser::Nested(parser) => parse_nested(parser, cursor, env),
        }
    }
}

#[inline(never)]
fn parse_alternatives(
    alternatives: &[Parser],
    cursor: &mut TextCursor<'_>,
    env: ParseEnv<'_>,
) -> Result<Option<Vec<Token>>, ParseError> {
    let start = cursor.save();
    for alternative in alternatives {
        if let Some(tokens) = alternative.parse(cursor, env)? {
            return Ok(Some(tokens));
        }
        cursor.restore(start);
    }
    Ok(None)
}

#[inline(never)]
fn parse_concatenation(
    parts: &[Parser],
    cursor: &mut TextCursor<'_>,
    env: ParseEnv<'_>,
) -> Result<Option<Vec<Token>>, ParseError> {
    let start = cursor.save();
    let mut children = Vec::new();
    for part in parts {
        match part.parse(cursor, env)? {
            Some(tokens) => children.extend(tokens),
            None => {
                cursor.restore(start);
                return Ok(None);
            }
        }
    }
    if children.is_empty() {
        return Ok(Some(Vec::new()));
    }
    Ok(Some(vec![Token::parent(ParentKind::Sequence, children)?]))
}

#[inline(never)]
fn parse_optional(
    parser: &Parser,
    cursor: &mut TextCursor<'_>,
    env: ParseEnv<'_>,
) -> Result<Option<Vec<Token>>, ParseError> {
    Ok(Some(parser.parse(cursor, env)?.unwrap_or_default()))
}

#[inline(never)]
fn parse_repeated(
    parser: &Parser,
    cursor: &mut TextCursor<'_>,
    env: ParseEnv<'_>,
) -> Result<Option<Vec<Token>>, ParseError> {
    let mut tokens = Vec::new();
    loop {
        let before = cursor.save();
        match parser.parse(cursor, env)? {
            Some(more) if cursor.position() > before.position() => tokens.extend(more),
            Some(_) => break,
            None => {
                cursor.restore(before);
                break;
            }
        }
    }
    Ok(Some(tokens))
}

#[inline(never)]
fn parse_exception(
    parser: &Parser,
    exception: &Parser,
    cursor: &mut TextCursor<'_>,
    env: ParseEnv<'_>,
) -> Result<Option<Vec<Token>>, ParseError> {
    let start = cursor.save();
    let excluded = exception.parse(cursor, env)?.is_some();
    cursor.restore(start);
    if excluded {
        return Ok(None);
    }
    parser.parse(cursor, env)
}

#[inline(never)]
fn parse_terminal(
    text: &str,
    cursor: &mut TextCursor<'_>,
) -> Result<Option<Vec<Token>>, ParseError> {
    if !cursor.consume_str(text) {
        return Ok(None);
    }
    Ok(Some(vec![Token::leaf(
        LeafValue::TextLiteral(text.to_string()),
        text,
    )?]))
}

#[inline(never)]
fn parse_reference(
    name: &str,
    cursor: &mut TextCursor<'_>,
    env: ParseEnv<'_>,
) -> Result<Option<Vec<Token>>, ParseError> {
    let rule = env
        .rules
        .get(name)
        .ok_or_else(|| ParseError::UnknownProduction(name.to_string()))?;
    rule.parse(cursor, env)
}

#[inline(never)]
fn parse_leaf(
    leaf: &LeafParser,
    cursor: &mut TextCursor<'_>,
    env: ParseEnv<'_>,
) -> Result<Option<Vec<Token>>, ParseError> {
    Ok(leaf.parse(cursor, env.context)?.map(|token| vec![token]))
}

#[inline(never)]
fn parse_transform(
    parser: &Parser,
    transform: &TokenTransform,
    cursor: &mut TextCursor<'_>,
    env: ParseEnv<'_>,
) -> Result<Option<Vec<Token>>, ParseError> {
    match parser.parse(cursor, env)? {
        Some(tokens) => Ok(Some(transform.apply(tokens)?)),
        None => Ok(None),
    }
}

#[inline(never)]
fn parse_required(
    parser: &Parser,
    production: &str,
    cursor: &mut TextCursor<'_>,
    env: ParseEnv<'_>,
) -> Result<Option<Vec<Token>>, ParseError> {
    if let Some(tokens) = parser.parse(cursor, env)? {
        return Ok(Some(tokens));
    }
    log::debug!(
        "required production {production} missing at byte {}",
        cursor.position()
    );
    Err(ParseError::Required {
        production: production.to_string(),
        position: cursor.position(),
        near: cursor.near(),
        text: cursor.text().to_string(),
    })
}

#[inline(never)]
fn parse_nested(
    parser: &Parser,
    cursor: &mut TextCursor<'_>,
    env: ParseEnv<'_>,
) -> Result<Option<Vec<Token>>, ParseError> {
    if env.depth > MAX_NESTING {
        log::debug!("nesting limit reached at byte {}", cursor.position());
        return Err(ParseError::TooDeep {
            limit: MAX_NESTING,
            position: cursor.position(),
            text: cursor.text().to_string(),
        });
    }
    parser.parse(
        cursor,
        ParseEnv {
            depth: env.depth + 1,
            ..env
        },
    )
}
