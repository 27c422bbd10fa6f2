use formula_reference::{
    is_cell_reference, CellRangeReference, CellReference, ColumnReference, LabelName, NameError,
    ReferenceKind, RowReference, MAX_COLUMNS, MAX_ROWS,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn arb_cell() -> impl Strategy<Value = CellReference> {
    (0..MAX_COLUMNS, 0..MAX_ROWS).prop_map(|(col, row)| {
        CellReference::new(
            ColumnReference::new(col, ReferenceKind::Relative).unwrap(),
            RowReference::new(row, ReferenceKind::Relative).unwrap(),
        )
    })
}

proptest! {
    #[test]
    fn every_in_bounds_cell_is_rejected_as_a_label(cell in arb_cell()) {
        let text = cell.to_string();
        prop_assert!(is_cell_reference(&text));
        prop_assert_eq!(
            LabelName::new(&text),
            Err(NameError::LooksLikeCellReference(text.clone()))
        );
        prop_assert_eq!(text.parse::<CellReference>().unwrap(), cell);
    }

    #[test]
    fn cell_followed_by_letters_is_a_label(cell in arb_cell(), suffix in "[A-Za-z_][A-Za-z0-9_]{0,4}") {
        let text = format!("{cell}{suffix}");
        prop_assert!(!is_cell_reference(&text));
        prop_assert!(LabelName::new(&text).is_ok());
    }
}

#[test]
fn boundary_cells() {
    let last: CellReference = "XFD1048576".parse().unwrap();
    assert_eq!(last.column().value(), MAX_COLUMNS - 1);
    assert_eq!(last.row().value(), MAX_ROWS - 1);
    assert!(LabelName::new("XFD1048576").is_err());
    assert!(LabelName::new("XFD1048577").is_ok());
}

#[test]
fn serde_uses_plain_strings_for_names() {
    let label = LabelName::new("Total").unwrap();
    assert_eq!(serde_json::to_string(&label).unwrap(), "\"Total\"");
    let back: LabelName = serde_json::from_str("\"TOTAL\"").unwrap();
    assert_eq!(back, label);
    assert!(serde_json::from_str::<LabelName>("\"A1\"").is_err());
}

#[test]
fn range_display() {
    let range: CellRangeReference = "$A$1:b2".parse().unwrap();
    assert_eq!(range.to_string(), "$A$1:B2");
}
