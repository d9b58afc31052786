//! Merging of pending grid edits into the working set.

use std::{collections::HashMap, str::FromStr};

use serde::{Deserialize, Serialize};
use shared::domain::{coerce_discount, coerce_quantity, coerce_unit_price, parse_numeric, EntryKey};

use crate::selection::WorkingItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditableField {
    Quantity,
    UnitPrice,
    Discount,
}

impl FromStr for EditableField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "quantity" => Ok(EditableField::Quantity),
            "unitPrice" | "unit_price" => Ok(EditableField::UnitPrice),
            "discount" => Ok(EditableField::Discount),
            other => Err(format!("field '{other}' is not editable")),
        }
    }
}

/// Raw, unsaved edit for one working-set row, as typed into the grid.
///
/// Only the fields present are merged; values are coerced when the edit is
/// applied, not when it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEdit {
    pub entry_key: EntryKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
}

impl DraftEdit {
    pub fn new(entry_key: impl Into<EntryKey>) -> Self {
        Self {
            entry_key: entry_key.into(),
            quantity: None,
            unit_price: None,
            discount: None,
        }
    }

    /// A single `{key, field, value}` edit.
    pub fn single(
        entry_key: impl Into<EntryKey>,
        field: EditableField,
        raw: impl Into<String>,
    ) -> Self {
        Self::new(entry_key).with(field, raw)
    }

    pub fn with(mut self, field: EditableField, raw: impl Into<String>) -> Self {
        self.set(field, raw);
        self
    }

    pub fn set(&mut self, field: EditableField, raw: impl Into<String>) {
        let raw = Some(raw.into());
        match field {
            EditableField::Quantity => self.quantity = raw,
            EditableField::UnitPrice => self.unit_price = raw,
            EditableField::Discount => self.discount = raw,
        }
    }

    fn absorb(&mut self, later: &DraftEdit) {
        if later.quantity.is_some() {
            self.quantity.clone_from(&later.quantity);
        }
        if later.unit_price.is_some() {
            self.unit_price.clone_from(&later.unit_price);
        }
        if later.discount.is_some() {
            self.discount.clone_from(&later.discount);
        }
    }
}

/// Returns the new working set with `edits` merged in.
///
/// Edits for the same key are collapsed field by field, later edits winning.
/// Every row is re-emitted; rows without an edit are cloned unchanged, edited
/// rows get coerced values and a recomputed total. Edits for keys not in the
/// working set are ignored.
pub fn merge_drafts(items: &[WorkingItem], edits: &[DraftEdit]) -> Vec<WorkingItem> {
    let mut collapsed: HashMap<&EntryKey, DraftEdit> = HashMap::with_capacity(edits.len());
    for edit in edits {
        collapsed
            .entry(&edit.entry_key)
            .and_modify(|merged| merged.absorb(edit))
            .or_insert_with(|| edit.clone());
    }

    items
        .iter()
        .map(|item| match collapsed.get(item.entry_key()) {
            Some(edit) => apply_edit(item, edit),
            None => item.clone(),
        })
        .collect()
}

fn apply_edit(item: &WorkingItem, edit: &DraftEdit) -> WorkingItem {
    let quantity = match &edit.quantity {
        Some(raw) => coerce_quantity(parse_numeric(raw)),
        None => item.quantity(),
    };
    let unit_price = match &edit.unit_price {
        Some(raw) => coerce_unit_price(parse_numeric(raw)),
        None => item.unit_price(),
    };
    let discount = match &edit.discount {
        Some(raw) => coerce_discount(parse_numeric(raw)),
        None => item.discount(),
    };
    item.repriced(quantity, unit_price, discount)
}

#[cfg(test)]
#[path = "tests/draft_tests.rs"]
mod tests;
