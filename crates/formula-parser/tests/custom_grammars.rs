use formula_parser::ebnf::{compile, parse_grammar, EbnfNode, GrammarTransformer, PassThrough};
use formula_parser::{
    predefined_parsers, BasicParserContext, FormulaGrammarTransformer, GrammarError, ParentKind,
    ParseError, Parser, TextCursor,
};
use pretty_assertions::assert_eq;

#[test]
fn formula_transformer_resolves_operators_in_any_grammar() {
    let grammar = parse_grammar("SUMS = DIGITS, { PLUS_SYMBOL, DIGITS_REQUIRED } ;").unwrap();
    let compiled = compile(&grammar, predefined_parsers(), &FormulaGrammarTransformer).unwrap();
    let context = BasicParserContext::en_us();

    let token = compiled.parse_text("SUMS", "1+2+3", &context).unwrap();
    assert_eq!(token.parent_kind(), Some(ParentKind::Addition));
    let left = token.as_parent().unwrap().non_noise_children().next().unwrap();
    assert_eq!(left.parent_kind(), Some(ParentKind::Addition));
    assert_eq!(left.text(), "1+2");

    assert!(matches!(
        compiled.parse_text("SUMS", "1+", &context),
        Err(ParseError::Required { ref production, position: 2, .. }) if production == "DIGITS"
    ));
}

#[test]
fn pass_through_keeps_raw_sequences() {
    let grammar = parse_grammar("PAIR = DIGITS, MINUS_SYMBOL, DIGITS ;").unwrap();
    let compiled = compile(&grammar, predefined_parsers(), &PassThrough).unwrap();
    let token = compiled
        .parse_text("PAIR", "4-2", &BasicParserContext::en_us())
        .unwrap();
    assert_eq!(token.parent_kind(), Some(ParentKind::Sequence));
    assert_eq!(token.children().len(), 3);
}

#[test]
fn prefix_parsing_leaves_the_cursor_after_the_match() {
    let grammar = parse_grammar("WORD = LABEL_NAME ;").unwrap();
    let compiled = compile(&grammar, predefined_parsers(), &PassThrough).unwrap();
    let context = BasicParserContext::en_us();

    let mut cursor = TextCursor::new("total + 1");
    let token = compiled.parse("WORD", &mut cursor, &context).unwrap().unwrap();
    assert_eq!(token.text(), "total");
    assert_eq!(cursor.remaining(), " + 1");

    let mut cursor = TextCursor::new("A1");
    assert_eq!(compiled.parse("WORD", &mut cursor, &context), Ok(None));
    assert_eq!(cursor.position(), 0);
}

struct Uppercase;

impl GrammarTransformer for Uppercase {
    fn terminal(&self, node: &EbnfNode, parser: Parser) -> Result<Parser, GrammarError> {
        match node {
            EbnfNode::Terminal(text) if text.chars().any(char::is_lowercase) => {
                Err(GrammarError::UnexpectedTerminal(text.clone()))
            }
            _ => Ok(parser),
        }
    }
}

#[test]
fn transformers_can_veto_nodes() {
    let grammar = parse_grammar("A = 'X' ; B = 'y' ;").unwrap();
    assert_eq!(
        compile(&grammar, predefined_parsers(), &Uppercase).unwrap_err(),
        GrammarError::UnexpectedTerminal("y".to_string())
    );
}
