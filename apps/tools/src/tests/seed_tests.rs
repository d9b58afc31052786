use super::*;
use serde_json::json;

#[test]
fn products_get_positional_reference_ids() {
    let csv = "\u{FEFF}ProductCode;Name;Family;IsActive\n\
               HW-1; Bolt ;Hardware;TRUE\n\
               SW-9;License;;no\n";

    let seed = convert_products(csv.as_bytes()).expect("convert");

    assert_eq!(seed.records.len(), 2);
    assert_eq!(seed.records[0].attributes.reference_id, "ProductRef1");
    assert_eq!(seed.records[0].name, "Bolt");
    assert!(seed.records[0].is_active);
    assert_eq!(seed.records[1].family, "");
    assert!(!seed.records[1].is_active);
}

#[test]
fn product_json_uses_import_field_names() {
    let csv = "ProductCode;Name;Family;IsActive\nHW-1;Bolt;Hardware;true\n";
    let seed = convert_products(csv.as_bytes()).expect("convert");

    let value = serde_json::to_value(&seed).expect("json");

    assert_eq!(
        value,
        json!({
            "records": [{
                "attributes": {"type": "Product2", "referenceId": "ProductRef1"},
                "ProductCode": "HW-1",
                "Name": "Bolt",
                "Family": "Hardware",
                "IsActive": true
            }]
        })
    );
}

#[test]
fn missing_columns_default_to_empty() {
    let seed = convert_products("Name\nWidget\n".as_bytes()).expect("convert");
    assert_eq!(seed.records[0].product_code, "");
    assert!(!seed.records[0].is_active);
}

#[test]
fn entries_reference_products_and_parse_decimal_commas() {
    let csv = "UnitPrice;IsActive;UseStandardPrice\n\
               12,50;true;false\n\
               n/a;false;TRUE\n";

    let seed = convert_price_list_entries(csv.as_bytes(), "pl-standard").expect("convert");

    let first = &seed.records[0];
    assert_eq!(first.attributes.kind, "PricebookEntry");
    assert_eq!(first.attributes.reference_id, "PricebookEntryRef1");
    assert_eq!(first.product_ref, "@ProductRef1");
    assert_eq!(first.price_list_id, "pl-standard");
    assert!((first.unit_price - 12.5).abs() < 1e-9);
    assert!(first.is_active && !first.use_standard_price);

    let second = &seed.records[1];
    assert_eq!(second.product_ref, "@ProductRef2");
    assert_eq!(second.unit_price, 0.0);
    assert!(second.use_standard_price);
}

#[test]
fn entry_json_uses_import_field_names() {
    let csv = "UnitPrice;IsActive;UseStandardPrice\n3;true;true\n";
    let seed = convert_price_list_entries(csv.as_bytes(), "pl-1").expect("convert");

    let value = serde_json::to_value(&seed.records[0]).expect("json");

    assert_eq!(value["Pricebook2Id"], "pl-1");
    assert_eq!(value["Product2Id"], "@ProductRef1");
    assert_eq!(value["UnitPrice"], 3.0);
    assert_eq!(value["UseStandardPrice"], true);
}
