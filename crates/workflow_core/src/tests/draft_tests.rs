use super::*;
use crate::test_support::{approx, catalog_item};

fn working(key: &str, unit_price: f64, quantity: i64, discount: f64) -> WorkingItem {
    let mut item = catalog_item(key, unit_price);
    item.quantity = quantity;
    item.discount = discount;
    WorkingItem::from_catalog(item)
}

#[test]
fn discount_edit_recomputes_total() {
    let items = vec![working("a", 10.0, 3, 20.0)];
    assert!(approx(items[0].total_price(), 24.0));

    let merged = merge_drafts(&items, &[DraftEdit::single("a", EditableField::Discount, "0")]);

    assert!(approx(merged[0].discount(), 0.0));
    assert!(approx(merged[0].total_price(), 30.0));
}

#[test]
fn unedited_rows_are_reemitted_unchanged() {
    let items = vec![working("a", 10.0, 1, 0.0), working("b", 4.0, 2, 0.0)];

    let merged = merge_drafts(&items, &[DraftEdit::single("b", EditableField::Quantity, "5")]);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0], items[0]);
    assert_eq!(merged[1].quantity(), 5);
    assert!(approx(merged[1].total_price(), 20.0));
}

#[test]
fn later_edits_win_per_field() {
    let items = vec![working("a", 10.0, 1, 0.0)];
    let edits = vec![
        DraftEdit::new("a")
            .with(EditableField::Quantity, "2")
            .with(EditableField::UnitPrice, "8"),
        DraftEdit::single("a", EditableField::Quantity, "4"),
    ];

    let merged = merge_drafts(&items, &edits);

    assert_eq!(merged[0].quantity(), 4);
    assert!(approx(merged[0].unit_price(), 8.0));
    assert!(approx(merged[0].total_price(), 32.0));
}

#[test]
fn invalid_input_falls_back_to_defaults() {
    let items = vec![working("a", 10.0, 3, 15.0)];
    let edit = DraftEdit::new("a")
        .with(EditableField::Quantity, "")
        .with(EditableField::UnitPrice, "ten")
        .with(EditableField::Discount, "not a number");

    let merged = merge_drafts(&items, &[edit]);

    assert_eq!(merged[0].quantity(), 1);
    assert!(approx(merged[0].unit_price(), 0.0));
    assert!(approx(merged[0].discount(), 0.0));
    assert!(approx(merged[0].total_price(), 0.0));
}

#[test]
fn explicit_zero_quantity_is_kept_for_validation() {
    let items = vec![working("a", 10.0, 3, 0.0)];
    let merged = merge_drafts(&items, &[DraftEdit::single("a", EditableField::Quantity, "0")]);
    assert_eq!(merged[0].quantity(), 0);
    assert!(approx(merged[0].total_price(), 0.0));
}

#[test]
fn edits_for_unknown_keys_are_ignored() {
    let items = vec![working("a", 10.0, 1, 0.0)];
    let merged = merge_drafts(&items, &[DraftEdit::single("ghost", EditableField::Quantity, "9")]);
    assert_eq!(merged, items);
}

#[test]
fn decodes_grid_draft_payload() {
    let edit: DraftEdit =
        serde_json::from_str(r#"{"entryKey":"a","unitPrice":"12.5"}"#).expect("draft");
    assert_eq!(edit.unit_price.as_deref(), Some("12.5"));
    assert_eq!(edit.quantity, None);
    assert_eq!("unitPrice".parse::<EditableField>(), Ok(EditableField::UnitPrice));
}
