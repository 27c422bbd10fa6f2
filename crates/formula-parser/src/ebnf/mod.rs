//! EBNF grammar descriptions and their compilation into [`crate::Parser`]s.
//!
//! ```text
//! RULE          = IDENTIFIER "=" ALTERNATIVES ";" ;
//! ALTERNATIVES  = CONCATENATION { "|" CONCATENATION } ;
//! CONCATENATION = EXCEPTION { "," EXCEPTION } ;
//! EXCEPTION     = RANGE [ "-" RANGE ] ;
//! RANGE         = PRIMARY [ ".." PRIMARY ] ;
//! PRIMARY       = IDENTIFIER | TERMINAL | "[" ALTERNATIVES "]" | "{" ALTERNATIVES "}"
//!               | "(" ALTERNATIVES ")" ;
//! ```
//!
//! Terminals are single or double quoted and `(* ... *)` is a comment.

mod compile;
mod parser;

pub use compile::{
    compile, required_if_suffixed, CompiledGrammar, GrammarTransformer, PassThrough,
    REQUIRED_SUFFIX,
};
pub use parser::parse_grammar;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EbnfGrammar {
    pub rules: Vec<EbnfRule>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EbnfRule {
    pub name: String,
    pub body: EbnfNode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EbnfNode {
    Alternatives(Vec<EbnfNode>),
    Concatenation(Vec<EbnfNode>),
    Exception {
        parser: Box<EbnfNode>,
        exception: Box<EbnfNode>,
    },
    Group(Box<EbnfNode>),
    Identifier(String),
    Optional(Box<EbnfNode>),
    Range {
        begin: Box<EbnfNode>,
        end: Box<EbnfNode>,
    },
    Repeated(Box<EbnfNode>),
    Terminal(String),
}

impl EbnfGrammar {
    pub fn rule(&self, name: &str) -> Option<&EbnfRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }
}
