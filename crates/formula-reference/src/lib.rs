//! `formula-reference` defines the reference values shared by the formula parsers:
//! columns, rows, cells, cell ranges, labels and function names.
//!
//! Column/row lexing lives in exactly one place ([`scan_column`] / [`scan_row`]) and the
//! sheet bounds in one pair of constants ([`MAX_COLUMNS`] / [`MAX_ROWS`]). The reference
//! parsers and the "is this label actually a cell?" check are both built on them.

mod cell;
mod column_row;
mod error;
mod names;

pub use cell::{CellRangeReference, CellReference};
pub use column_row::{
    column_digit, is_cell_reference, row_digit, scan_column, scan_row, ColumnReference,
    ReferenceKind, ReferenceScan, RowReference, ABSOLUTE_MARKER, COLUMN_RADIX, MAX_COLUMNS,
    MAX_ROWS, ROW_RADIX,
};
pub use error::{NameError, ReferenceError};
pub use names::{FunctionName, LabelName, MAX_NAME_LEN};
