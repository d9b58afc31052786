use super::*;
use crate::test_support::catalog_item;

fn names(items: &[CatalogItem]) -> Vec<&str> {
    items.iter().map(|item| item.entry_key.as_str()).collect()
}

#[test]
fn sorts_case_insensitively_ascending_and_descending() {
    let mut a = catalog_item("a", 1.0);
    a.product_name = "bolt".into();
    let mut b = catalog_item("b", 1.0);
    b.product_name = "Anchor".into();
    let mut c = catalog_item("c", 1.0);
    c.product_name = "clamp".into();
    let items = vec![a, b, c];

    let asc = sort_items(&items, SortField::ProductName, SortDirection::Asc);
    assert_eq!(names(&asc), ["b", "a", "c"]);

    let desc = sort_items(&items, SortField::ProductName, SortDirection::Desc);
    assert_eq!(names(&desc), ["c", "a", "b"]);
}

#[test]
fn equal_keys_keep_relative_order_in_both_directions() {
    let mut items = Vec::new();
    for (key, category) in [("1", "Tools"), ("2", "tools"), ("3", "Fasteners"), ("4", "TOOLS")] {
        let mut item = catalog_item(key, 1.0);
        item.category = category.into();
        items.push(item);
    }

    let asc = sort_items(&items, SortField::Category, SortDirection::Asc);
    assert_eq!(names(&asc), ["3", "1", "2", "4"]);

    let desc = sort_items(&items, SortField::Category, SortDirection::Desc);
    assert_eq!(names(&desc), ["1", "2", "4", "3"]);
}

#[test]
fn resorting_sorted_sequence_is_identity() {
    let items: Vec<_> = ["delta", "Alpha", "charlie", "alpha", "Bravo"]
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut item = catalog_item(&idx.to_string(), 1.0);
            item.product_name = name.to_string();
            item
        })
        .collect();

    let once = sort_items(&items, SortField::ProductName, SortDirection::Desc);
    let twice = sort_items(&once, SortField::ProductName, SortDirection::Desc);
    assert_eq!(once, twice);
}

#[test]
fn missing_values_sort_as_empty_string() {
    let mut priced = catalog_item("priced", 1.0);
    priced.list_price = Some(5.0);
    let mut unpriced = catalog_item("unpriced", 1.0);
    unpriced.list_price = None;
    let items = vec![priced, unpriced];

    let asc = sort_items(&items, SortField::ListPrice, SortDirection::Asc);
    assert_eq!(names(&asc), ["unpriced", "priced"]);
}

#[test]
fn does_not_mutate_input() {
    let mut first = catalog_item("first", 1.0);
    first.product_code = "Z-1".into();
    let mut second = catalog_item("second", 1.0);
    second.product_code = "A-1".into();
    let items = vec![first, second];

    let sorted = sort_items(&items, SortField::ProductCode, SortDirection::Asc);
    assert_eq!(names(&sorted), ["second", "first"]);
    assert_eq!(names(&items), ["first", "second"]);
}

#[test]
fn parses_field_and_direction_names() {
    assert_eq!("listPrice".parse::<SortField>(), Ok(SortField::ListPrice));
    assert_eq!("family".parse::<SortField>(), Ok(SortField::Category));
    assert!("spacer".parse::<SortField>().is_err());
    assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
}
