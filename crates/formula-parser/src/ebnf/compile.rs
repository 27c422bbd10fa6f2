use std::collections::{HashMap, HashSet};

use super::{EbnfGrammar, EbnfNode};
use crate::combinator::ParseEnv;
use crate::{GrammarError, ParentKind, ParseError, Parser, ParserContext, TextCursor, Token};

/// Identifiers ending in this suffix must match or the whole parse fails.
pub const REQUIRED_SUFFIX: &str = "_REQUIRED";

/// Hooks invoked once per grammar node while compiling.
///
/// Each hook receives the node and the parser already compiled for it, and returns the parser
/// to use in its place. Every method defaults to returning the parser unchanged, except
/// [`GrammarTransformer::identifier`] which applies [`required_if_suffixed`].
pub trait GrammarTransformer {
    fn alternatives(&self, _node: &EbnfNode, parser: Parser) -> Result<Parser, GrammarError> {
        Ok(parser)
    }

    fn concatenation(&self, _node: &EbnfNode, parser: Parser) -> Result<Parser, GrammarError> {
        Ok(parser)
    }

    fn exception(&self, _node: &EbnfNode, parser: Parser) -> Result<Parser, GrammarError> {
        Ok(parser)
    }

    fn group(&self, _node: &EbnfNode, parser: Parser) -> Result<Parser, GrammarError> {
        Ok(parser)
    }

    /// `name` is the identifier as written, including any [`REQUIRED_SUFFIX`].
    fn identifier(&self, name: &str, parser: Parser) -> Result<Parser, GrammarError> {
        Ok(required_if_suffixed(name, parser))
    }

    fn optional(&self, _node: &EbnfNode, parser: Parser) -> Result<Parser, GrammarError> {
        Ok(parser)
    }

    fn range(&self, _node: &EbnfNode, parser: Parser) -> Result<Parser, GrammarError> {
        Ok(parser)
    }

    fn repeated(&self, _node: &EbnfNode, parser: Parser) -> Result<Parser, GrammarError> {
        Ok(parser)
    }

    fn terminal(&self, _node: &EbnfNode, parser: Parser) -> Result<Parser, GrammarError> {
        Ok(parser)
    }
}

/// A transformer that keeps every compiled parser as is.
#[derive(Copy, Clone, Debug, Default)]
pub struct PassThrough;

impl GrammarTransformer for PassThrough {}

/// Wrap `parser` as [`Parser::Required`] when `name` carries the required suffix.
pub fn required_if_suffixed(name: &str, parser: Parser) -> Parser {
    match name.strip_suffix(REQUIRED_SUFFIX) {
        Some(base) if !base.is_empty() => parser.required(base),
        _ => parser,
    }
}

/// Compile `grammar`, resolving identifiers against its own rules and then `predefined`.
pub fn compile(
    grammar: &EbnfGrammar,
    predefined: HashMap<String, Parser>,
    transformer: &dyn GrammarTransformer,
) -> Result<CompiledGrammar, GrammarError> {
    let mut names = HashSet::with_capacity(grammar.rules.len());
    for rule in &grammar.rules {
        if !names.insert(rule.name.as_str()) || predefined.contains_key(&rule.name) {
            return Err(GrammarError::DuplicateRule(rule.name.clone()));
        }
    }

    let compiler = Compiler {
        transformer,
        is_known: &|name: &str| names.contains(name) || predefined.contains_key(name),
    };

    let mut rules = HashMap::with_capacity(grammar.rules.len() + predefined.len());
    for rule in &grammar.rules {
        let body = compiler.node(&rule.name, &rule.body)?;
        rules.insert(rule.name.clone(), body);
    }
    rules.extend(predefined);

    let mut entries = HashMap::with_capacity(rules.len());
    for name in rules.keys() {
        let entry = transformer.identifier(name, Parser::Reference(name.clone()))?;
        entries.insert(name.clone(), entry);
    }

    log::debug!(
        "compiled grammar: {} rules, {} productions",
        grammar.rules.len(),
        entries.len()
    );
    Ok(CompiledGrammar { rules, entries })
}

struct Compiler<'a> {
    transformer: &'a dyn GrammarTransformer,
    is_known: &'a dyn Fn(&str) -> bool,
}

impl Compiler<'_> {
    fn resolve(&self, rule: &str, name: &str) -> Result<String, GrammarError> {
        if (self.is_known)(name) {
            return Ok(name.to_string());
        }
        match name.strip_suffix(REQUIRED_SUFFIX) {
            Some(base) if (self.is_known)(base) => Ok(base.to_string()),
            _ => Err(GrammarError::UnknownIdentifier {
                rule: rule.to_string(),
                name: name.to_string(),
            }),
        }
    }

    fn nodes(&self, rule: &str, nodes: &[EbnfNode]) -> Result<Vec<Parser>, GrammarError> {
        nodes.iter().map(|node| self.node(rule, node)).collect()
    }

    fn node(&self, rule: &str, node: &EbnfNode) -> Result<Parser, GrammarError> {
        let t = self.transformer;
        match node {
            EbnfNode::Alternatives(items) => {
                t.alternatives(node, Parser::Alternatives(self.nodes(rule, items)?))
            }
            EbnfNode::Concatenation(items) => {
                t.concatenation(node, Parser::Concatenation(self.nodes(rule, items)?))
            }
            EbnfNode::Exception { parser, exception } => t.exception(
                node,
                Parser::Exception {
                    parser: Box::new(self.node(rule, parser)?),
                    exception: Box::new(self.node(rule, exception)?),
                },
            ),
            EbnfNode::Group(inner) => t.group(node, self.node(rule, inner)?),
            EbnfNode::Identifier(name) => {
                let resolved = self.resolve(rule, name)?;
                t.identifier(name, Parser::Reference(resolved))
            }
            EbnfNode::Optional(inner) => {
                t.optional(node, Parser::Optional(Box::new(self.node(rule, inner)?)))
            }
            EbnfNode::Range { begin, end } => t.range(
                node,
                Parser::Concatenation(vec![self.node(rule, begin)?, self.node(rule, end)?]),
            ),
            EbnfNode::Repeated(inner) => {
                t.repeated(node, Parser::Repeated(Box::new(self.node(rule, inner)?)))
            }
            EbnfNode::Terminal(text) => t.terminal(node, Parser::Terminal(text.clone())),
        }
    }
}

/// Compiled productions, each reachable by name.
#[derive(Clone, Debug)]
pub struct CompiledGrammar {
    rules: HashMap<String, Parser>,
    entries: HashMap<String, Parser>,
}

impl CompiledGrammar {
    /// The parser for `name` as seen from outside the grammar, with the transformer's wrapping.
    pub fn production(&self, name: &str) -> Option<&Parser> {
        self.entries.get(name)
    }

    pub fn production_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Parse a prefix of the cursor's remaining text.
    ///
    /// Returns `Ok(None)` if the production does not match or matches nothing.
    pub fn parse(
        &self,
        production: &str,
        cursor: &mut TextCursor<'_>,
        context: &dyn ParserContext,
    ) -> Result<Option<Token>, ParseError> {
        let parser = self
            .production(production)
            .ok_or_else(|| ParseError::UnknownProduction(production.to_string()))?;
        let env = ParseEnv::new(&self.rules, context);

        let start = cursor.save();
        let Some(mut tokens) = parser.parse(cursor, env)? else {
            return Ok(None);
        };
        match tokens.len() {
            0 => {
                cursor.restore(start);
                Ok(None)
            }
            1 => Ok(tokens.pop()),
            _ => Ok(Some(Token::parent(ParentKind::Sequence, tokens)?)),
        }
    }

    /// Parse the whole of `text`.
    pub fn parse_text(
        &self,
        production: &str,
        text: &str,
        context: &dyn ParserContext,
    ) -> Result<Token, ParseError> {
        let mut cursor = TextCursor::new(text);
        let token = self
            .parse(production, &mut cursor, context)?
            .ok_or_else(|| ParseError::NoMatch {
                production: production.to_string(),
                text: text.to_string(),
            })?;
        if !cursor.is_empty() {
            return Err(ParseError::TrailingText {
                production: production.to_string(),
                remaining: cursor.remaining().to_string(),
                text: text.to_string(),
            });
        }
        Ok(token)
    }
}
