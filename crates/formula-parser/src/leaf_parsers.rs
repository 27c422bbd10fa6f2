//! Hand-written parsers for the grammar's leaf productions.

use std::collections::HashMap;

use formula_reference::{
    scan_column, scan_row, ColumnReference, FunctionName, LabelName, NameError, RowReference,
};

use crate::combinator::LeafParser;
use crate::token::AmPm;
use crate::{LeafValue, ParseError, Parser, ParserContext, SymbolKind, TextCursor, Token};

type LeafResult = Result<Option<Token>, ParseError>;

fn leaf(value: LeafValue, text: &str) -> LeafResult {
    Ok(Some(Token::leaf(value, text)?))
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic()
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Every predefined leaf parser, keyed by production name.
pub fn predefined_parsers() -> HashMap<String, Parser> {
    let mut parsers: Vec<LeafParser> = vec![
        LeafParser::new("WHITESPACE", whitespace),
        LeafParser::new("DIGITS", digits),
        LeafParser::new("COLUMN", column),
        LeafParser::new("ROW", row),
        LeafParser::new("LABEL_NAME", label_name),
        LeafParser::new("FUNCTION_NAME", function_name),
        LeafParser::new("LAMBDA_FUNCTION_NAME", lambda_function_name),
        LeafParser::new("TEXT_CHARACTERS", text_characters),
        LeafParser::new("DAY_NAME", day_name),
        LeafParser::new("DAY_NUMBER", |cursor, _| {
            bounded_number(cursor, 2, 1..=31, LeafValue::DayNumber)
        }),
        LeafParser::new("MONTH_NAME", month_name),
        LeafParser::new("MONTH_NUMBER", |cursor, _| {
            bounded_number(cursor, 2, 1..=12, LeafValue::MonthNumber)
        }),
        LeafParser::new("YEAR", year),
        LeafParser::new("HOUR", |cursor, _| {
            bounded_number(cursor, 2, 0..=23, LeafValue::Hour)
        }),
        LeafParser::new("MINUTE", |cursor, _| {
            bounded_number(cursor, 2, 0..=59, LeafValue::Minute)
        }),
        LeafParser::new("SECONDS", |cursor, _| {
            bounded_number(cursor, 2, 0..=59, LeafValue::Seconds)
        }),
        LeafParser::new("MILLIS", millis),
        LeafParser::new("AM_PM", am_pm),
    ];
    parsers.extend(SymbolKind::ALL.into_iter().map(symbol_parser));

    parsers
        .into_iter()
        .map(|parser| (parser.name().to_string(), Parser::Leaf(parser)))
        .collect()
}

fn whitespace(cursor: &mut TextCursor<'_>, _: &dyn ParserContext) -> LeafResult {
    let text = cursor.consume_while(char::is_whitespace);
    if text.is_empty() {
        return Ok(None);
    }
    leaf(LeafValue::Whitespace, text)
}

fn digits(cursor: &mut TextCursor<'_>, _: &dyn ParserContext) -> LeafResult {
    let text = cursor.consume_while(|c| c.is_ascii_digit());
    if text.is_empty() {
        return Ok(None);
    }
    leaf(LeafValue::Digits, text)
}

// An out-of-range column or row is a hard error: the text can only be a reference.
fn column(cursor: &mut TextCursor<'_>, _: &dyn ParserContext) -> LeafResult {
    let Some(scan) = scan_column(cursor.remaining()) else {
        return Ok(None);
    };
    let text = cursor.advance(scan.len);
    let column = ColumnReference::from_scan(scan, text)?;
    leaf(LeafValue::Column(column), text)
}

fn row(cursor: &mut TextCursor<'_>, _: &dyn ParserContext) -> LeafResult {
    let Some(scan) = scan_row(cursor.remaining()) else {
        return Ok(None);
    };
    let text = cursor.advance(scan.len);
    let row = RowReference::from_scan(scan, text)?;
    leaf(LeafValue::Row(row), text)
}

fn identifier<'a>(cursor: &mut TextCursor<'a>, extra: &[char]) -> Option<&'a str> {
    if !cursor.peek().is_some_and(is_identifier_start) {
        return None;
    }
    Some(cursor.consume_while(|c| is_identifier_part(c) || extra.contains(&c)))
}

fn label_name(cursor: &mut TextCursor<'_>, _: &dyn ParserContext) -> LeafResult {
    let Some(text) = identifier(cursor, &[]) else {
        return Ok(None);
    };
    match LabelName::new(text) {
        Ok(label) => leaf(LeafValue::Label(label), text),
        // Longer than any column and row, so it cannot be read as anything else.
        Err(err @ NameError::TooLong { .. }) => Err(err.into()),
        // Cell references and other invalid names fall through to the next alternative.
        Err(_) => Ok(None),
    }
}

fn function_name(cursor: &mut TextCursor<'_>, _: &dyn ParserContext) -> LeafResult {
    let Some(text) = identifier(cursor, &['.']) else {
        return Ok(None);
    };
    match FunctionName::new(text) {
        Ok(name) => leaf(LeafValue::FunctionName(name), text),
        Err(_) => Ok(None),
    }
}

fn lambda_function_name(cursor: &mut TextCursor<'_>, _: &dyn ParserContext) -> LeafResult {
    let Some(text) = cursor.consume_str_ignore_case("LAMBDA") else {
        return Ok(None);
    };
    if cursor.peek().is_some_and(|c| is_identifier_part(c) || c == '.') {
        return Ok(None);
    }
    match FunctionName::new(text) {
        Ok(name) => leaf(LeafValue::FunctionName(name), text),
        Err(_) => Ok(None),
    }
}

/// Characters between the quotes of a text literal; `""` stands for one `"`.
fn text_characters(cursor: &mut TextCursor<'_>, _: &dyn ParserContext) -> LeafResult {
    let start = cursor.save();
    let mut value = String::new();
    loop {
        if cursor.consume_str("\"\"") {
            value.push('"');
            continue;
        }
        match cursor.peek() {
            None | Some('"') => break,
            Some(c) => {
                cursor.bump();
                value.push(c);
            }
        }
    }
    let text = cursor.text_since(start);
    if text.is_empty() {
        return Ok(None);
    }
    leaf(LeafValue::TextLiteral(value), text)
}

/// Longest case-insensitive match among `names`, returning its index.
fn longest_name<'a>(
    cursor: &mut TextCursor<'a>,
    names: &[&[String]],
) -> Option<(usize, &'a str)> {
    let start = cursor.save();
    let mut best: Option<(usize, usize)> = None;
    for list in names {
        for (index, name) in list.iter().enumerate() {
            if let Some(matched) = cursor.consume_str_ignore_case(name) {
                match best {
                    Some((_, len)) if matched.len() <= len => {}
                    _ => best = Some((index, matched.len())),
                }
            }
            cursor.restore(start);
        }
    }
    let (index, len) = best?;
    Some((index, cursor.advance(len)))
}

fn day_name(cursor: &mut TextCursor<'_>, context: &dyn ParserContext) -> LeafResult {
    let names = [
        context.weekday_names(),
        context.weekday_name_abbreviations(),
    ];
    match longest_name(cursor, &names) {
        Some((index, text)) => leaf(LeafValue::DayName(index as u32), text),
        None => Ok(None),
    }
}

fn month_name(cursor: &mut TextCursor<'_>, context: &dyn ParserContext) -> LeafResult {
    let names = [context.month_names(), context.month_name_abbreviations()];
    match longest_name(cursor, &names) {
        Some((index, text)) => leaf(LeafValue::MonthName(index as u32 + 1), text),
        None => Ok(None),
    }
}

/// Up to `max_len` digits whose value lies in `range`.
fn bounded_number(
    cursor: &mut TextCursor<'_>,
    max_len: usize,
    range: core::ops::RangeInclusive<u32>,
    value: fn(u32) -> LeafValue,
) -> LeafResult {
    let start = cursor.save();
    let mut remaining = max_len;
    let text = cursor.consume_while(|c| {
        let take = remaining > 0 && c.is_ascii_digit();
        remaining = remaining.saturating_sub(1);
        take
    });
    match text.parse::<u32>() {
        Ok(number) if range.contains(&number) => leaf(value(number), text),
        _ => {
            cursor.restore(start);
            Ok(None)
        }
    }
}

fn year(cursor: &mut TextCursor<'_>, _: &dyn ParserContext) -> LeafResult {
    let start = cursor.save();
    let mut remaining = 4usize;
    let text = cursor.consume_while(|c| {
        let take = remaining > 0 && c.is_ascii_digit();
        remaining = remaining.saturating_sub(1);
        take
    });
    match text.parse::<i32>() {
        Ok(year) => leaf(LeafValue::Year(year), text),
        Err(_) => {
            cursor.restore(start);
            Ok(None)
        }
    }
}

/// Fractional seconds in milliseconds: `5` is 500ms and `05` is 50ms. Digits past the third
/// are consumed and ignored.
fn millis(cursor: &mut TextCursor<'_>, _: &dyn ParserContext) -> LeafResult {
    let text = cursor.consume_while(|c| c.is_ascii_digit());
    if text.is_empty() {
        return Ok(None);
    }
    let value = text
        .chars()
        .chain(core::iter::repeat('0'))
        .take(3)
        .filter_map(|c| c.to_digit(10))
        .fold(0, |acc, d| acc * 10 + d);
    leaf(LeafValue::Millis(value), text)
}

fn am_pm(cursor: &mut TextCursor<'_>, context: &dyn ParserContext) -> LeafResult {
    match longest_name(cursor, &[context.ampms()]) {
        Some((0, text)) => leaf(LeafValue::AmPm(AmPm::Am), text),
        Some((_, text)) => leaf(LeafValue::AmPm(AmPm::Pm), text),
        None => Ok(None),
    }
}

fn consume_char(cursor: &mut TextCursor<'_>, expected: char) -> bool {
    if cursor.peek() == Some(expected) {
        cursor.bump();
        true
    } else {
        false
    }
}

fn symbol_parser(kind: SymbolKind) -> LeafParser {
    LeafParser::new(kind.production(), move |cursor, context| {
        let start = cursor.save();
        let matched = match kind {
            SymbolKind::Plus => consume_char(cursor, context.positive_sign()),
            SymbolKind::Minus => consume_char(cursor, context.negative_sign()),
            SymbolKind::Percent => consume_char(cursor, context.percent_symbol()),
            SymbolKind::ValueSeparator => consume_char(cursor, context.value_separator()),
            SymbolKind::DecimalSeparator => consume_char(cursor, context.decimal_separator()),
            SymbolKind::Exponent => cursor
                .consume_str_ignore_case(context.exponent_symbol())
                .is_some(),
            SymbolKind::DateSeparator => consume_char(cursor, '/') || consume_char(cursor, '-'),
            SymbolKind::Multiply => cursor.consume_str("*"),
            SymbolKind::Divide => cursor.consume_str("/"),
            SymbolKind::Power => cursor.consume_str("^"),
            SymbolKind::Concat => cursor.consume_str("&"),
            SymbolKind::Equals => cursor.consume_str("="),
            SymbolKind::NotEquals => cursor.consume_str("<>"),
            SymbolKind::GreaterThan => cursor.consume_str(">"),
            SymbolKind::GreaterThanEquals => cursor.consume_str(">="),
            SymbolKind::LessThan => cursor.consume_str("<"),
            SymbolKind::LessThanEquals => cursor.consume_str("<="),
            SymbolKind::Between | SymbolKind::TimeSeparator => cursor.consume_str(":"),
            SymbolKind::ParenthesisOpen => cursor.consume_str("("),
            SymbolKind::ParenthesisClose => cursor.consume_str(")"),
            SymbolKind::DoubleQuote => cursor.consume_str("\""),
        };
        if matched {
            leaf(LeafValue::Symbol(kind), cursor.text_since(start))
        } else {
            Ok(None)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BasicParserContext;
    use formula_reference::ReferenceError;
    use pretty_assertions::assert_eq;

    fn parse(name: &str, text: &str) -> (LeafResult, usize) {
        let parsers = predefined_parsers();
        let Some(Parser::Leaf(parser)) = parsers.get(name) else {
            panic!("no leaf parser {name}");
        };
        let context = BasicParserContext::en_us();
        let mut cursor = TextCursor::new(text);
        let result = parser.parse(&mut cursor, &context);
        (result, cursor.position())
    }

    fn value(name: &str, text: &str) -> Option<LeafValue> {
        parse(name, text)
            .0
            .unwrap()
            .and_then(|token| token.leaf_value().cloned())
    }

    #[test]
    fn column_and_row() {
        let (result, position) = parse("COLUMN", "$AB12");
        let token = result.unwrap().unwrap();
        assert_eq!(token.text(), "$AB");
        assert_eq!(position, 3);
        assert!(matches!(
            token.leaf_value(),
            Some(LeafValue::Column(column)) if column.value() == 27
        ));

        assert!(matches!(
            parse("ROW", "0").0,
            Err(ParseError::Reference(ReferenceError::RowOutOfRange { .. }))
        ));
        assert!(matches!(
            parse("COLUMN", "XFE1").0,
            Err(ParseError::Reference(ReferenceError::ColumnOutOfRange { .. }))
        ));
        assert_eq!(parse("COLUMN", "12").0, Ok(None));
    }

    #[test]
    fn label_rejects_cell_references_softly() {
        assert_eq!(parse("LABEL_NAME", "A1"), (Ok(None), 0));
        let (result, position) = parse("LABEL_NAME", "Total+1");
        assert_eq!(result.unwrap().unwrap().text(), "Total");
        assert_eq!(position, 5);
    }

    #[test]
    fn overlong_label_is_a_name_error() {
        let text = "a".repeat(formula_reference::MAX_NAME_LEN + 1);
        assert!(matches!(
            parse("LABEL_NAME", &text).0,
            Err(ParseError::Name(NameError::TooLong { len, .. }))
                if len == formula_reference::MAX_NAME_LEN + 1
        ));
    }

    #[test]
    fn lambda_name_is_a_whole_word() {
        assert!(value("LAMBDA_FUNCTION_NAME", "lambda(").is_some());
        assert_eq!(value("LAMBDA_FUNCTION_NAME", "LAMBDAX("), None);
        assert_eq!(value("LAMBDA_FUNCTION_NAME", "LAMB"), None);
    }

    #[test]
    fn text_characters_collapse_escaped_quotes() {
        let (result, position) = parse("TEXT_CHARACTERS", r#"say ""hi"""#);
        let token = result.unwrap().unwrap();
        assert_eq!(token.text(), r#"say ""hi"""#);
        assert_eq!(
            token.leaf_value(),
            Some(&LeafValue::TextLiteral(r#"say "hi""#.to_string()))
        );
        assert_eq!(position, 10);
        assert_eq!(parse("TEXT_CHARACTERS", "\"").0, Ok(None));
    }

    #[test]
    fn names_use_longest_match() {
        assert_eq!(value("MONTH_NAME", "december"), Some(LeafValue::MonthName(12)));
        assert_eq!(value("MONTH_NAME", "Dec 1"), Some(LeafValue::MonthName(12)));
        assert_eq!(value("DAY_NAME", "Tue"), Some(LeafValue::DayName(2)));
        assert_eq!(value("AM_PM", "pm"), Some(LeafValue::AmPm(AmPm::Pm)));
        assert_eq!(value("MONTH_NAME", "Foo"), None);
    }

    #[test]
    fn bounded_numbers() {
        assert_eq!(value("DAY_NUMBER", "31"), Some(LeafValue::DayNumber(31)));
        assert_eq!(value("DAY_NUMBER", "32"), None);
        assert_eq!(value("MONTH_NUMBER", "123"), Some(LeafValue::MonthNumber(12)));
        assert_eq!(value("HOUR", "24"), None);
        assert_eq!(value("YEAR", "99"), Some(LeafValue::Year(99)));
        assert_eq!(value("YEAR", "19999"), Some(LeafValue::Year(1999)));
        assert_eq!(value("MILLIS", "5"), Some(LeafValue::Millis(500)));
        assert_eq!(value("MILLIS", "0456"), Some(LeafValue::Millis(45)));
    }

    #[test]
    fn symbols_follow_context() {
        let parsers = predefined_parsers();
        let Some(Parser::Leaf(separator)) = parsers.get("VALUE_SEPARATOR_SYMBOL") else {
            panic!("missing separator");
        };
        let german = BasicParserContext::de_de();
        let mut cursor = TextCursor::new(";");
        assert!(separator.parse(&mut cursor, &german).unwrap().is_some());
        let mut cursor = TextCursor::new(",");
        assert!(separator.parse(&mut cursor, &german).unwrap().is_none());

        assert_eq!(
            value("EXPONENT_SYMBOL", "e5"),
            Some(LeafValue::Symbol(SymbolKind::Exponent))
        );
        assert_eq!(
            value("GREATER_THAN_EQUALS_SYMBOL", ">="),
            Some(LeafValue::Symbol(SymbolKind::GreaterThanEquals))
        );
        assert_eq!(
            value("DATE_SEPARATOR_SYMBOL", "-"),
            Some(LeafValue::Symbol(SymbolKind::DateSeparator))
        );
    }
}
