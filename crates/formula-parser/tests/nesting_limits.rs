use std::time::{Duration, Instant};

use formula_parser::combinator::MAX_NESTING;
use formula_parser::formula_reference::{NameError, MAX_NAME_LEN};
use formula_parser::{
    compile_formula, parse_expression, parse_formula, BasicParserContext, ParentKind, ParseError,
};
use pretty_assertions::assert_eq;

fn nested_calls(depth: usize) -> String {
    format!("={}1{}", "F(".repeat(depth), ")".repeat(depth))
}

#[test]
fn calls_nest_up_to_the_limit() {
    let context = BasicParserContext::en_us();
    let text = nested_calls(MAX_NESTING);
    let token = parse_formula(&text, &context).unwrap();
    assert_eq!(token.text(), text);
    let call = parse_expression(&text[1..], &context).unwrap();
    assert_eq!(call.parent_kind(), Some(ParentKind::NamedFunction));

    let expr = compile_formula(&text, &context).unwrap().unwrap();
    let expected = format!("{}1{}", "F(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
    assert_eq!(expr.to_string(), expected);
}

#[test]
fn groups_and_signs_nest_up_to_the_limit() {
    let context = BasicParserContext::en_us();
    let groups = format!("={}1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
    assert_eq!(parse_formula(&groups, &context).unwrap().text(), groups);

    let signs = format!("={}1", "-".repeat(MAX_NESTING));
    assert_eq!(parse_formula(&signs, &context).unwrap().text(), signs);
}

#[test]
fn nesting_past_the_limit_is_an_error() {
    let context = BasicParserContext::en_us();
    let text = nested_calls(MAX_NESTING + 1);
    let err = parse_formula(&text, &context).unwrap_err();
    assert_eq!(
        err,
        ParseError::TooDeep {
            limit: MAX_NESTING,
            position: 1 + 2 * (MAX_NESTING + 1),
            text: text.clone(),
        }
    );

    let groups = format!("={}1{}", "(".repeat(200), ")".repeat(200));
    assert!(matches!(
        parse_formula(&groups, &context),
        Err(ParseError::TooDeep { .. })
    ));
}

#[test]
fn nested_lambda_calls_parse_in_linear_time() {
    let context = BasicParserContext::en_us();
    let text = format!("{}1{}", "LAMBDA(".repeat(20), ")".repeat(20));

    let started = Instant::now();
    let token = parse_expression(&text, &context).unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));

    assert_eq!(token.parent_kind(), Some(ParentKind::NamedFunction));
    assert_eq!(token.text(), text);
}

#[test]
fn overlong_label_reports_its_length() {
    let context = BasicParserContext::en_us();
    let name = "x".repeat(MAX_NAME_LEN + 1);
    let err = parse_formula(&format!("={name}+1"), &context).unwrap_err();
    assert!(matches!(
        err,
        ParseError::Name(NameError::TooLong { len, max, .. })
            if len == MAX_NAME_LEN + 1 && max == MAX_NAME_LEN
    ));
}
