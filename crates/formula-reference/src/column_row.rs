use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ReferenceError;

/// Number of addressable columns (`A` through `XFD`).
pub const MAX_COLUMNS: u32 = 16_384;
/// Number of addressable rows (`1` through `1048576`).
pub const MAX_ROWS: u32 = 1_048_576;

/// Column letters are a bijective base-26 numeral (`A` = 1, `Z` = 26, `AA` = 27).
pub const COLUMN_RADIX: u32 = 26;
pub const ROW_RADIX: u32 = 10;

/// Prefix marking a column or row as absolute (`$A$1`).
pub const ABSOLUTE_MARKER: char = '$';

/// Whether a column/row survives relative adjustment (`$A`) or not (`A`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Absolute,
    Relative,
}

impl ReferenceKind {
    #[inline]
    pub const fn prefix(self) -> &'static str {
        match self {
            ReferenceKind::Absolute => "$",
            ReferenceKind::Relative => "",
        }
    }
}

/// Outcome of scanning a column or row from the start of some text.
///
/// This is the single implementation of column/row lexing: the reference parsers and the
/// label ambiguity check ([`is_cell_reference`]) both go through it so they can never
/// disagree about what a reference looks like.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReferenceScan {
    pub kind: ReferenceKind,
    /// Accumulated 1-based value, `None` if it overflowed.
    pub value: Option<u32>,
    /// Bytes consumed, including the absolute marker.
    pub len: usize,
}

impl ReferenceScan {
    /// The 0-based index when the scanned value lies within `1..=max`.
    #[inline]
    pub fn index(self, max: u32) -> Option<u32> {
        match self.value {
            Some(value) if (1..=max).contains(&value) => Some(value - 1),
            _ => None,
        }
    }
}

/// Value of a single column letter, case-insensitive.
#[inline]
pub fn column_digit(c: char) -> Option<u32> {
    c.is_ascii_alphabetic()
        .then(|| u32::from(c.to_ascii_uppercase() as u8 - b'A') + 1)
}

#[inline]
pub fn row_digit(c: char) -> Option<u32> {
    c.to_digit(ROW_RADIX)
}

fn scan(text: &str, radix: u32, digit: fn(char) -> Option<u32>) -> Option<ReferenceScan> {
    let (kind, start) = if text.starts_with(ABSOLUTE_MARKER) {
        (ReferenceKind::Absolute, ABSOLUTE_MARKER.len_utf8())
    } else {
        (ReferenceKind::Relative, 0)
    };

    let mut value = Some(0u32);
    let mut len = start;
    for c in text[start..].chars() {
        let Some(d) = digit(c) else {
            break;
        };
        value = value
            .and_then(|v| v.checked_mul(radix))
            .and_then(|v| v.checked_add(d));
        len += c.len_utf8();
    }

    (len > start).then_some(ReferenceScan { kind, value, len })
}

/// Scan an optional `$` followed by column letters.
pub fn scan_column(text: &str) -> Option<ReferenceScan> {
    scan(text, COLUMN_RADIX, column_digit)
}

/// Scan an optional `$` followed by row digits.
pub fn scan_row(text: &str) -> Option<ReferenceScan> {
    scan(text, ROW_RADIX, row_digit)
}

/// Returns true if the whole of `text` is a cell reference within sheet bounds.
pub fn is_cell_reference(text: &str) -> bool {
    let Some(column) = scan_column(text) else {
        return false;
    };
    let Some(row) = scan_row(&text[column.len..]) else {
        return false;
    };
    column.len + row.len == text.len()
        && column.index(MAX_COLUMNS).is_some()
        && row.index(MAX_ROWS).is_some()
}

/// A 0-indexed column reference (`A` is column `0`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnReference {
    value: u32,
    kind: ReferenceKind,
}

impl ColumnReference {
    pub fn new(value: u32, kind: ReferenceKind) -> Result<Self, ReferenceError> {
        if value >= MAX_COLUMNS {
            return Err(ReferenceError::ColumnOutOfRange {
                text: value.to_string(),
                max: MAX_COLUMNS,
            });
        }
        Ok(Self { value, kind })
    }

    /// Build from a scan of `text`, where `text` is the scanned slice itself.
    pub fn from_scan(scan: ReferenceScan, text: &str) -> Result<Self, ReferenceError> {
        let value = scan
            .index(MAX_COLUMNS)
            .ok_or_else(|| ReferenceError::ColumnOutOfRange {
                text: text.to_string(),
                max: MAX_COLUMNS,
            })?;
        Ok(Self {
            value,
            kind: scan.kind,
        })
    }

    #[inline]
    pub const fn value(self) -> u32 {
        self.value
    }

    #[inline]
    pub const fn kind(self) -> ReferenceKind {
        self.kind
    }

    /// Column letters without any absolute marker (e.g. `XFD`).
    pub fn letters(self) -> String {
        let mut n = self.value + 1;
        let mut out = Vec::<char>::new();
        while n > 0 {
            let rem = (n - 1) % COLUMN_RADIX;
            out.push(char::from(b'A' + rem as u8));
            n = (n - 1) / COLUMN_RADIX;
        }
        out.iter().rev().collect()
    }
}

impl fmt::Display for ColumnReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.letters())
    }
}

impl FromStr for ColumnReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let scan = scan_column(s).ok_or_else(|| ReferenceError::MissingColumn(s.to_string()))?;
        if scan.len != s.len() {
            return Err(ReferenceError::TrailingCharacters(s.to_string()));
        }
        Self::from_scan(scan, s)
    }
}

/// A 0-indexed row reference (`1` is row `0`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowReference {
    value: u32,
    kind: ReferenceKind,
}

impl RowReference {
    pub fn new(value: u32, kind: ReferenceKind) -> Result<Self, ReferenceError> {
        if value >= MAX_ROWS {
            return Err(ReferenceError::RowOutOfRange {
                text: value.to_string(),
                max: MAX_ROWS,
            });
        }
        Ok(Self { value, kind })
    }

    pub fn from_scan(scan: ReferenceScan, text: &str) -> Result<Self, ReferenceError> {
        let value = scan
            .index(MAX_ROWS)
            .ok_or_else(|| ReferenceError::RowOutOfRange {
                text: text.to_string(),
                max: MAX_ROWS,
            })?;
        Ok(Self {
            value,
            kind: scan.kind,
        })
    }

    #[inline]
    pub const fn value(self) -> u32 {
        self.value
    }

    #[inline]
    pub const fn kind(self) -> ReferenceKind {
        self.kind
    }
}

impl fmt::Display for RowReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.value + 1)
    }
}

impl FromStr for RowReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let scan = scan_row(s).ok_or_else(|| ReferenceError::MissingRow(s.to_string()))?;
        if scan.len != s.len() {
            return Err(ReferenceError::TrailingCharacters(s.to_string()));
        }
        Self::from_scan(scan, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_stops_at_first_non_digit() {
        let scan = scan_column("$AB12").unwrap();
        assert_eq!(scan.kind, ReferenceKind::Absolute);
        assert_eq!(scan.value, Some(28));
        assert_eq!(scan.len, 3);

        let row = scan_row("12+").unwrap();
        assert_eq!(row.value, Some(12));
        assert_eq!(row.len, 2);

        assert_eq!(scan_column("1A"), None);
        assert_eq!(scan_row("$"), None);
    }

    #[test]
    fn scan_reports_overflow_as_missing_value() {
        let scan = scan_row("99999999999999999999").unwrap();
        assert_eq!(scan.value, None);
        assert_eq!(scan.index(MAX_ROWS), None);
    }

    #[test]
    fn column_letters_roundtrip() {
        assert_eq!(ColumnReference::from_str("A").unwrap().value(), 0);
        assert_eq!(ColumnReference::from_str("z").unwrap().value(), 25);
        assert_eq!(ColumnReference::from_str("AA").unwrap().value(), 26);

        let xfd = ColumnReference::from_str("$XFD").unwrap();
        assert_eq!(xfd.value(), MAX_COLUMNS - 1);
        assert_eq!(xfd.to_string(), "$XFD");
    }

    #[test]
    fn bounds_match_sheet_limits() {
        assert!(ColumnReference::from_str("XFE").is_err());
        assert!(RowReference::from_str("0").is_err());
        assert!(RowReference::from_str("1048576").is_ok());
        assert!(RowReference::from_str("1048577").is_err());
        assert!(ColumnReference::new(MAX_COLUMNS, ReferenceKind::Relative).is_err());
    }

    #[test]
    fn cell_reference_detection() {
        assert!(is_cell_reference("A1"));
        assert!(is_cell_reference("ab11"));
        assert!(is_cell_reference("XFD1048576"));
        assert!(!is_cell_reference("XFE1"));
        assert!(!is_cell_reference("A1048577"));
        assert!(!is_cell_reference("A1B"));
        assert!(!is_cell_reference("Total"));
        assert!(!is_cell_reference("A"));
        assert!(!is_cell_reference("1"));
        assert!(!is_cell_reference(""));
    }
}
