//! Projection of selected catalog rows into the editable working set.

use std::collections::{HashMap, HashSet};

use shared::domain::{line_total, CatalogItem, EntryKey};

use crate::sort::{SortField, SortKey};

/// A selected catalog row with operator-adjustable pricing and its derived
/// total. The total is recomputed by every constructor and repricing call and
/// cannot be set directly.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingItem {
    item: CatalogItem,
    total_price: f64,
}

impl WorkingItem {
    pub fn from_catalog(item: CatalogItem) -> Self {
        let total_price = line_total(item.unit_price, item.quantity, item.discount);
        Self { item, total_price }
    }

    /// Copy of this item with new pricing values and a recomputed total.
    pub fn repriced(&self, quantity: i64, unit_price: f64, discount: f64) -> Self {
        let mut item = self.item.clone();
        item.quantity = quantity;
        item.unit_price = unit_price;
        item.discount = discount;
        Self::from_catalog(item)
    }

    pub fn entry_key(&self) -> &EntryKey {
        &self.item.entry_key
    }

    pub fn item(&self) -> &CatalogItem {
        &self.item
    }

    pub fn quantity(&self) -> i64 {
        self.item.quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.item.unit_price
    }

    pub fn discount(&self) -> f64 {
        self.item.discount
    }

    pub fn total_price(&self) -> f64 {
        self.total_price
    }
}

impl SortKey for WorkingItem {
    fn sort_value(&self, field: SortField) -> Option<String> {
        match field {
            SortField::TotalPrice => Some(self.total_price.to_string()),
            other => self.item.sort_value(other),
        }
    }
}

/// Result of rebuilding the working set for a new selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionProjection {
    /// Requested keys that were found in the catalog, deduplicated, in
    /// request order.
    pub selection: Vec<EntryKey>,
    pub working_items: Vec<WorkingItem>,
    /// Requested keys with no loaded catalog row.
    pub dropped: Vec<EntryKey>,
}

/// Rebuilds the working set from scratch for `keys`.
///
/// Keys that are not present in `catalog` are dropped rather than projected.
/// When the catalog holds duplicate keys the first row wins.
pub fn project_selection(catalog: &[CatalogItem], keys: &[EntryKey]) -> SelectionProjection {
    let mut index: HashMap<&EntryKey, &CatalogItem> = HashMap::with_capacity(catalog.len());
    for item in catalog {
        index.entry(&item.entry_key).or_insert(item);
    }

    let mut seen = HashSet::with_capacity(keys.len());
    let mut projection = SelectionProjection::default();
    for key in keys {
        if !seen.insert(key) {
            continue;
        }
        match index.get(key) {
            Some(item) => {
                projection.selection.push(key.clone());
                projection
                    .working_items
                    .push(WorkingItem::from_catalog((*item).clone()));
            }
            None => projection.dropped.push(key.clone()),
        }
    }
    projection
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
