use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{scan_column, scan_row, ColumnReference, ReferenceError, RowReference};

/// A cell reference such as `B2` or `$A$1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellReference {
    column: ColumnReference,
    row: RowReference,
}

impl CellReference {
    #[inline]
    pub const fn new(column: ColumnReference, row: RowReference) -> Self {
        Self { column, row }
    }

    #[inline]
    pub const fn column(self) -> ColumnReference {
        self.column
    }

    #[inline]
    pub const fn row(self) -> RowReference {
        self.row
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

impl FromStr for CellReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let column_scan =
            scan_column(s).ok_or_else(|| ReferenceError::MissingColumn(s.to_string()))?;
        let rest = &s[column_scan.len..];
        let row_scan = scan_row(rest).ok_or_else(|| ReferenceError::MissingRow(s.to_string()))?;
        if column_scan.len + row_scan.len != s.len() {
            return Err(ReferenceError::TrailingCharacters(s.to_string()));
        }

        let column = ColumnReference::from_scan(column_scan, &s[..column_scan.len])?;
        let row = RowReference::from_scan(row_scan, &rest[..row_scan.len])?;
        Ok(Self::new(column, row))
    }
}

/// Two cell references bounding a range, e.g. `A1:B2`.
///
/// The bounds are kept as written; `begin <= end` is not enforced here.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRangeReference {
    begin: CellReference,
    end: CellReference,
}

impl CellRangeReference {
    #[inline]
    pub const fn new(begin: CellReference, end: CellReference) -> Self {
        Self { begin, end }
    }

    #[inline]
    pub const fn begin(self) -> CellReference {
        self.begin
    }

    #[inline]
    pub const fn end(self) -> CellReference {
        self.end
    }
}

impl fmt::Display for CellRangeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.begin, self.end)
    }
}

impl FromStr for CellRangeReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((begin, end)) = s.split_once(':') else {
            return Err(ReferenceError::MissingRangeBound {
                part: "end",
                text: s.to_string(),
            });
        };
        if begin.is_empty() {
            return Err(ReferenceError::MissingRangeBound {
                part: "begin",
                text: s.to_string(),
            });
        }
        if end.is_empty() {
            return Err(ReferenceError::MissingRangeBound {
                part: "end",
                text: s.to_string(),
            });
        }
        Ok(Self::new(begin.parse()?, end.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReferenceKind;

    #[test]
    fn cell_parse_and_display() {
        let cell: CellReference = "$B$3".parse().unwrap();
        assert_eq!(cell.column().value(), 1);
        assert_eq!(cell.column().kind(), ReferenceKind::Absolute);
        assert_eq!(cell.row().value(), 2);
        assert_eq!(cell.row().kind(), ReferenceKind::Absolute);
        assert_eq!(cell.to_string(), "$B$3");

        let mixed: CellReference = "c$10".parse().unwrap();
        assert_eq!(mixed.to_string(), "C$10");
    }

    #[test]
    fn cell_parse_errors() {
        assert_eq!(
            "12".parse::<CellReference>(),
            Err(ReferenceError::MissingColumn("12".to_string()))
        );
        assert_eq!(
            "AB".parse::<CellReference>(),
            Err(ReferenceError::MissingRow("AB".to_string()))
        );
        assert_eq!(
            "A1B".parse::<CellReference>(),
            Err(ReferenceError::TrailingCharacters("A1B".to_string()))
        );
        assert!(matches!(
            "A0".parse::<CellReference>(),
            Err(ReferenceError::RowOutOfRange { .. })
        ));
    }

    #[test]
    fn range_parse_keeps_bounds_as_written() {
        let range: CellRangeReference = "B2:A1".parse().unwrap();
        assert_eq!(range.begin().to_string(), "B2");
        assert_eq!(range.end().to_string(), "A1");
        assert_eq!(range.to_string(), "B2:A1");
    }

    #[test]
    fn range_missing_bound() {
        assert_eq!(
            ":A1".parse::<CellRangeReference>(),
            Err(ReferenceError::MissingRangeBound {
                part: "begin",
                text: ":A1".to_string()
            })
        );
        assert!(matches!(
            "A1".parse::<CellRangeReference>(),
            Err(ReferenceError::MissingRangeBound { part: "end", .. })
        ));
    }
}
