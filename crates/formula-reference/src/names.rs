use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::{is_cell_reference, NameError};

/// Maximum length of a label or function name in characters.
pub const MAX_NAME_LEN: usize = 255;

fn validate_name(kind: &'static str, text: &str, extra: &[char]) -> Result<(), NameError> {
    if text.is_empty() {
        return Err(NameError::Empty { kind });
    }

    let len = text.chars().count();
    if len > MAX_NAME_LEN {
        return Err(NameError::TooLong {
            kind,
            text: text.to_string(),
            len,
            max: MAX_NAME_LEN,
        });
    }

    for (index, ch) in text.chars().enumerate() {
        if index == 0 {
            if !ch.is_alphabetic() {
                return Err(NameError::InvalidStartCharacter {
                    kind,
                    text: text.to_string(),
                    ch,
                });
            }
            continue;
        }
        if !(ch.is_alphanumeric() || ch == '_' || extra.contains(&ch)) {
            return Err(NameError::InvalidCharacter {
                kind,
                text: text.to_string(),
                ch,
                index,
            });
        }
    }

    Ok(())
}

fn folded(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().flat_map(char::to_lowercase)
}

macro_rules! case_insensitive_name {
    ($name:ident) => {
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                folded(&self.0).eq(folded(&other.0))
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                folded(&self.0).cmp(folded(&other.0))
            }
        }

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                for ch in folded(&self.0) {
                    ch.hash(state);
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = NameError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

/// A user-defined label (named range / named value).
///
/// Labels compare, order and hash case-insensitively. A label can never be spelled like a
/// cell reference: `A1` is rejected while `A1B` and `Total` are accepted.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelName(String);

impl LabelName {
    /// Validate and build a label.
    ///
    /// Rules:
    /// - 1 to [`MAX_NAME_LEN`] characters
    /// - the first character is a letter
    /// - remaining characters are letters, digits or `_`
    /// - the whole name is not a cell reference within sheet bounds
    pub fn new(text: &str) -> Result<Self, NameError> {
        validate_name("label", text, &[])?;
        if is_cell_reference(text) {
            return Err(NameError::LooksLikeCellReference(text.to_string()));
        }
        Ok(Self(text.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

case_insensitive_name!(LabelName);

/// The name of a spreadsheet function, e.g. `SUM` or a dotted name such as `STDEV.S`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FunctionName(String);

impl FunctionName {
    pub fn new(text: &str) -> Result<Self, NameError> {
        validate_name("function name", text, &['.'])?;
        Ok(Self(text.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

case_insensitive_name!(FunctionName);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_that_look_like_cells_are_rejected() {
        for text in ["A1", "AB11", "XFD1048576", "a1"] {
            assert_eq!(
                LabelName::new(text),
                Err(NameError::LooksLikeCellReference(text.to_string())),
                "{text}"
            );
        }
    }

    #[test]
    fn labels_outside_reference_bounds_are_accepted() {
        for text in ["Total", "A1B", "XFE1", "A1048577", "Tax_2024"] {
            assert!(LabelName::new(text).is_ok(), "{text}");
        }
    }

    #[test]
    fn label_character_rules() {
        assert_eq!(LabelName::new(""), Err(NameError::Empty { kind: "label" }));
        assert!(matches!(
            LabelName::new("1abc"),
            Err(NameError::InvalidStartCharacter { ch: '1', .. })
        ));
        assert!(matches!(
            LabelName::new("ab-c"),
            Err(NameError::InvalidCharacter { ch: '-', index: 2, .. })
        ));
        assert!(LabelName::new(&"a".repeat(MAX_NAME_LEN)).is_ok());
        assert!(matches!(
            LabelName::new(&"a".repeat(MAX_NAME_LEN + 1)),
            Err(NameError::TooLong { len: 256, .. })
        ));
    }

    #[test]
    fn labels_are_case_insensitive() {
        let lower = LabelName::new("total").unwrap();
        let upper = LabelName::new("TOTAL").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.cmp(&upper), Ordering::Equal);
        assert!(LabelName::new("alpha").unwrap() < LabelName::new("Beta").unwrap());
        assert_eq!(upper.to_string(), "TOTAL");
    }

    #[test]
    fn function_names_allow_dots() {
        assert!(FunctionName::new("_xlfn").is_err());
        assert_eq!(
            FunctionName::new("Stdev.S").unwrap(),
            FunctionName::new("STDEV.S").unwrap()
        );
    }
}
