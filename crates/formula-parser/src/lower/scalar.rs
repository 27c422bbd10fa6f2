//! Numbers, text, dates and times assembled from the leaves of their parent token.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::expr::ExpressionValue;
use crate::token::AmPm;
use crate::{
    Expression, LeafValue, LoweringError, ParentKind, ParentToken, ParserContext, SymbolKind, Token,
};

pub(super) fn parse_number(text: &str) -> Result<f64, LoweringError> {
    text.parse()
        .map_err(|_| LoweringError::InvalidNumber(text.to_string()))
}

/// Rebuild the number in canonical form (`-`, digits, `.`, `e`) whatever the locale's symbols.
pub(super) fn number(token: &Token) -> Result<Expression, LoweringError> {
    let mut canonical = String::with_capacity(token.text().len());
    for leaf in token.leaves() {
        match leaf.value() {
            LeafValue::Digits => canonical.push_str(leaf.text()),
            LeafValue::Symbol(SymbolKind::Minus) => canonical.push('-'),
            LeafValue::Symbol(SymbolKind::Plus) => canonical.push('+'),
            LeafValue::Symbol(SymbolKind::DecimalSeparator) => canonical.push('.'),
            LeafValue::Symbol(SymbolKind::Exponent) => canonical.push('e'),
            _ => {}
        }
    }
    let value = canonical
        .parse()
        .map_err(|_| LoweringError::InvalidNumber(token.text().to_string()))?;
    Ok(Expression::number(value))
}

pub(super) fn text(parent: &ParentToken) -> Expression {
    let literal = parent
        .children()
        .iter()
        .find_map(|child| match child.leaf_value() {
            Some(LeafValue::TextLiteral(literal)) => Some(literal.as_str()),
            _ => None,
        })
        .unwrap_or_default();
    Expression::text(literal)
}

pub(super) fn date(token: &Token, context: &dyn ParserContext) -> Result<Expression, LoweringError> {
    naive_date(token, context).map(|date| Expression::Value(ExpressionValue::Date(date)))
}

pub(super) fn time(token: &Token) -> Result<Expression, LoweringError> {
    naive_time(token).map(|time| Expression::Value(ExpressionValue::Time(time)))
}

pub(super) fn date_time(
    parent: &ParentToken,
    context: &dyn ParserContext,
) -> Result<Expression, LoweringError> {
    let mut date = None;
    let mut time = None;
    for child in parent.non_noise_children() {
        match child.parent_kind() {
            Some(ParentKind::Date) => date = Some(naive_date(child, context)?),
            Some(ParentKind::Time) => time = Some(naive_time(child)?),
            _ => {}
        }
    }
    let date_time = NaiveDateTime::new(
        date.unwrap_or_default(),
        time.unwrap_or_default(),
    );
    Ok(Expression::Value(ExpressionValue::DateTime(date_time)))
}

/// Missing parts default to the first of January; a missing year is the context's default.
/// A year written with at most two digits is expanded by the context.
fn naive_date(token: &Token, context: &dyn ParserContext) -> Result<NaiveDate, LoweringError> {
    let mut day = 1;
    let mut month = 1;
    let mut year = None;
    for leaf in token.leaves() {
        match *leaf.value() {
            LeafValue::DayNumber(value) => day = value,
            LeafValue::MonthNumber(value) | LeafValue::MonthName(value) => month = value,
            LeafValue::Year(value) if leaf.text().len() <= 2 => {
                year = Some(context.two_to_four_digit_year(value));
            }
            LeafValue::Year(value) => year = Some(value),
            _ => {}
        }
    }
    let year = year.unwrap_or_else(|| context.default_year());

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| LoweringError::InvalidDate {
        year,
        month,
        day,
        text: token.text().to_string(),
    })
}

fn naive_time(token: &Token) -> Result<NaiveTime, LoweringError> {
    let mut hour = 0;
    let mut minute = 0;
    let mut second = 0;
    let mut millis = 0;
    let mut am_pm = None;
    for leaf in token.leaves() {
        match *leaf.value() {
            LeafValue::Hour(value) => hour = value,
            LeafValue::Minute(value) => minute = value,
            LeafValue::Seconds(value) => second = value,
            LeafValue::Millis(value) => millis = value,
            LeafValue::AmPm(value) => am_pm = Some(value),
            _ => {}
        }
    }
    hour = match am_pm {
        Some(AmPm::Am) if hour == 12 => 0,
        Some(AmPm::Pm) if hour < 12 => hour + 12,
        _ => hour,
    };

    NaiveTime::from_hms_milli_opt(hour, minute, second, millis).ok_or_else(|| {
        LoweringError::InvalidTime {
            hour,
            minute,
            second,
            millis,
            text: token.text().to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BasicParserContext;
    use pretty_assertions::assert_eq;

    fn leaf(value: LeafValue, text: &str) -> Token {
        Token::leaf(value, text).unwrap()
    }

    fn slash() -> Token {
        leaf(LeafValue::Symbol(SymbolKind::DateSeparator), "/")
    }

    fn date_token(year: Option<(i32, &str)>) -> Token {
        let mut children = vec![
            leaf(LeafValue::DayNumber(29), "29"),
            slash(),
            leaf(LeafValue::MonthNumber(2), "2"),
        ];
        if let Some((value, text)) = year {
            children.push(slash());
            children.push(leaf(LeafValue::Year(value), text));
        }
        Token::parent(ParentKind::Date, children).unwrap()
    }

    #[test]
    fn two_digit_years_are_expanded() {
        let context = BasicParserContext::en_us();
        let date = naive_date(&date_token(Some((4, "04"))), &context).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2004, 2, 29).unwrap());

        let date = naive_date(&date_token(Some((96, "96"))), &context).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1996, 2, 29).unwrap());
    }

    #[test]
    fn missing_year_uses_default_and_invalid_dates_fail() {
        let context = BasicParserContext::en_us();
        let date = naive_date(&date_token(None), &context).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2000, 2, 29).unwrap());

        let err = naive_date(&date_token(Some((2003, "2003"))), &context).unwrap_err();
        assert_eq!(
            err,
            LoweringError::InvalidDate {
                year: 2003,
                month: 2,
                day: 29,
                text: "29/2/2003".to_string(),
            }
        );
    }

    #[test]
    fn am_pm_adjusts_the_hour() {
        let colon = || leaf(LeafValue::Symbol(SymbolKind::TimeSeparator), ":");
        let time = |hour: u32, am_pm: AmPm| {
            let token = Token::parent(
                ParentKind::Time,
                vec![
                    leaf(LeafValue::Hour(hour), &hour.to_string()),
                    colon(),
                    leaf(LeafValue::Minute(5), "05"),
                    leaf(LeafValue::AmPm(am_pm), "xm"),
                ],
            )
            .unwrap();
            naive_time(&token).unwrap()
        };
        assert_eq!(time(12, AmPm::Am), NaiveTime::from_hms_opt(0, 5, 0).unwrap());
        assert_eq!(time(12, AmPm::Pm), NaiveTime::from_hms_opt(12, 5, 0).unwrap());
        assert_eq!(time(3, AmPm::Pm), NaiveTime::from_hms_opt(15, 5, 0).unwrap());
    }

    #[test]
    fn numbers_use_canonical_symbols() {
        let token = Token::parent(
            ParentKind::Number,
            vec![
                leaf(LeafValue::Symbol(SymbolKind::Minus), "-"),
                leaf(LeafValue::Digits, "1"),
                leaf(LeafValue::Symbol(SymbolKind::DecimalSeparator), ","),
                leaf(LeafValue::Digits, "5"),
                leaf(LeafValue::Symbol(SymbolKind::Exponent), "E"),
                leaf(LeafValue::Digits, "2"),
            ],
        )
        .unwrap();
        assert_eq!(number(&token).unwrap(), Expression::number(-150.0));
    }
}
