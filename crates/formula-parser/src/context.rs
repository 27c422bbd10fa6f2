use serde::{Deserialize, Serialize};

/// Locale-like tables and numeric conventions consumed by the leaf parsers and by date/time
/// assembly. Parsers only read a context; they never build or change one.
pub trait ParserContext {
    /// Full month names, January first.
    fn month_names(&self) -> &[String];
    fn month_name_abbreviations(&self) -> &[String];
    /// Full weekday names, Sunday first.
    fn weekday_names(&self) -> &[String];
    fn weekday_name_abbreviations(&self) -> &[String];
    /// AM then PM.
    fn ampms(&self) -> &[String];

    /// Year used when a date omits it.
    fn default_year(&self) -> i32;
    /// Expand a year written with one or two digits.
    fn two_to_four_digit_year(&self, year: i32) -> i32;

    fn decimal_separator(&self) -> char;
    fn exponent_symbol(&self) -> &str;
    fn negative_sign(&self) -> char;
    fn positive_sign(&self) -> char;
    fn percent_symbol(&self) -> char;
    fn value_separator(&self) -> char;
}

/// Plain-data [`ParserContext`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicParserContext {
    pub month_names: Vec<String>,
    pub month_name_abbreviations: Vec<String>,
    pub weekday_names: Vec<String>,
    pub weekday_name_abbreviations: Vec<String>,
    pub ampms: Vec<String>,
    pub default_year: i32,
    /// Two-digit years below this expand into the 2000s, the rest into the 1900s.
    pub two_digit_year: i32,
    pub decimal_separator: char,
    pub exponent_symbol: String,
    pub negative_sign: char,
    pub positive_sign: char,
    pub percent_symbol: char,
    pub value_separator: char,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl BasicParserContext {
    #[must_use]
    pub fn en_us() -> Self {
        Self {
            month_names: strings(&[
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]),
            month_name_abbreviations: strings(&[
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]),
            weekday_names: strings(&[
                "Sunday",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
            ]),
            weekday_name_abbreviations: strings(&["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]),
            ampms: strings(&["AM", "PM"]),
            default_year: 2000,
            two_digit_year: 30,
            decimal_separator: '.',
            exponent_symbol: "E".to_string(),
            negative_sign: '-',
            positive_sign: '+',
            percent_symbol: '%',
            value_separator: ',',
        }
    }

    /// German conventions: `,` decimal separator and `;` between function arguments.
    #[must_use]
    pub fn de_de() -> Self {
        Self {
            month_names: strings(&[
                "Januar",
                "Februar",
                "März",
                "April",
                "Mai",
                "Juni",
                "Juli",
                "August",
                "September",
                "Oktober",
                "November",
                "Dezember",
            ]),
            month_name_abbreviations: strings(&[
                "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
            ]),
            weekday_names: strings(&[
                "Sonntag",
                "Montag",
                "Dienstag",
                "Mittwoch",
                "Donnerstag",
                "Freitag",
                "Samstag",
            ]),
            weekday_name_abbreviations: strings(&["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"]),
            ampms: strings(&["AM", "PM"]),
            default_year: 2000,
            two_digit_year: 30,
            decimal_separator: ',',
            exponent_symbol: "E".to_string(),
            negative_sign: '-',
            positive_sign: '+',
            percent_symbol: '%',
            value_separator: ';',
        }
    }
}

impl Default for BasicParserContext {
    fn default() -> Self {
        Self::en_us()
    }
}

impl ParserContext for BasicParserContext {
    fn month_names(&self) -> &[String] {
        &self.month_names
    }

    fn month_name_abbreviations(&self) -> &[String] {
        &self.month_name_abbreviations
    }

    fn weekday_names(&self) -> &[String] {
        &self.weekday_names
    }

    fn weekday_name_abbreviations(&self) -> &[String] {
        &self.weekday_name_abbreviations
    }

    fn ampms(&self) -> &[String] {
        &self.ampms
    }

    fn default_year(&self) -> i32 {
        self.default_year
    }

    fn two_to_four_digit_year(&self, year: i32) -> i32 {
        if year < self.two_digit_year {
            2000 + year
        } else {
            1900 + year
        }
    }

    fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    fn exponent_symbol(&self) -> &str {
        &self.exponent_symbol
    }

    fn negative_sign(&self) -> char {
        self.negative_sign
    }

    fn positive_sign(&self) -> char {
        self.positive_sign
    }

    fn percent_symbol(&self) -> char {
        self.percent_symbol
    }

    fn value_separator(&self) -> char {
        self.value_separator
    }
}
