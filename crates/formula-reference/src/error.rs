use thiserror::Error;

/// Errors raised when building or parsing column, row, cell and range references.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("column {text:?} is out of range (max {max})")]
    ColumnOutOfRange { text: String, max: u32 },
    #[error("row {text:?} is out of range (max {max})")]
    RowOutOfRange { text: String, max: u32 },
    #[error("missing column in reference {0:?}")]
    MissingColumn(String),
    #[error("missing row in reference {0:?}")]
    MissingRow(String),
    #[error("missing {part} in range {text:?}")]
    MissingRangeBound { part: &'static str, text: String },
    #[error("trailing characters in reference {0:?}")]
    TrailingCharacters(String),
}

/// Validation errors for label names and function names.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("{kind} cannot be empty")]
    Empty { kind: &'static str },
    #[error("{kind} {text:?} is too long ({len} > {max})")]
    TooLong {
        kind: &'static str,
        text: String,
        len: usize,
        max: usize,
    },
    #[error("{kind} {text:?} has invalid first character '{ch}' (must start with a letter)")]
    InvalidStartCharacter {
        kind: &'static str,
        text: String,
        ch: char,
    },
    #[error("{kind} {text:?} has invalid character '{ch}' at index {index}")]
    InvalidCharacter {
        kind: &'static str,
        text: String,
        ch: char,
        index: usize,
    },
    #[error("label {0:?} cannot look like a cell reference")]
    LooksLikeCellReference(String),
}
