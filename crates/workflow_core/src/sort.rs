//! Stable column sorting shared by the catalog and working-set views.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared::domain::CatalogItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    ProductName,
    ProductCode,
    Category,
    ListPrice,
    UnitPrice,
    Quantity,
    Discount,
    TotalPrice,
}

impl SortField {
    pub fn field_name(&self) -> &'static str {
        match self {
            SortField::ProductName => "productName",
            SortField::ProductCode => "productCode",
            SortField::Category => "category",
            SortField::ListPrice => "listPrice",
            SortField::UnitPrice => "unitPrice",
            SortField::Quantity => "quantity",
            SortField::Discount => "discount",
            SortField::TotalPrice => "totalPrice",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s.trim() {
            "productName" | "product_name" | "name" => SortField::ProductName,
            "productCode" | "product_code" | "code" => SortField::ProductCode,
            "category" | "family" => SortField::Category,
            "listPrice" | "list_price" => SortField::ListPrice,
            "unitPrice" | "unit_price" => SortField::UnitPrice,
            "quantity" => SortField::Quantity,
            "discount" => SortField::Discount,
            "totalPrice" | "total_price" => SortField::TotalPrice,
            other => return Err(format!("unknown sort field '{other}'")),
        };
        Ok(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") || s.eq_ignore_ascii_case("ascending") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") || s.eq_ignore_ascii_case("descending") {
            Ok(SortDirection::Desc)
        } else {
            Err(format!("unknown sort direction '{s}'"))
        }
    }
}

/// Rows that expose a displayable value per sortable column.
pub trait SortKey {
    /// The column value as displayed, or `None` when the row has no value.
    fn sort_value(&self, field: SortField) -> Option<String>;
}

impl SortKey for CatalogItem {
    fn sort_value(&self, field: SortField) -> Option<String> {
        match field {
            SortField::ProductName => Some(self.product_name.clone()),
            SortField::ProductCode => Some(self.product_code.clone()),
            SortField::Category => Some(self.category.clone()),
            SortField::ListPrice => self.list_price.map(|price| price.to_string()),
            SortField::UnitPrice => Some(self.unit_price.to_string()),
            SortField::Quantity => Some(self.quantity.to_string()),
            SortField::Discount => Some(self.discount.to_string()),
            SortField::TotalPrice => None,
        }
    }
}

/// Returns a sorted copy of `items`.
///
/// Values are compared as lowercased strings; missing values compare as the
/// empty string. The sort is stable in both directions, so rows with equal
/// keys keep their relative order and re-sorting is idempotent.
pub fn sort_items<T>(items: &[T], field: SortField, direction: SortDirection) -> Vec<T>
where
    T: SortKey + Clone,
{
    let mut keyed: Vec<(String, &T)> = items
        .iter()
        .map(|item| {
            let key = item
                .sort_value(field)
                .map(|value| value.to_lowercase())
                .unwrap_or_default();
            (key, item)
        })
        .collect();

    keyed.sort_by(|(left, _), (right, _)| match direction {
        SortDirection::Asc => left.cmp(right),
        SortDirection::Desc => right.cmp(left),
    });

    keyed.into_iter().map(|(_, item)| item.clone()).collect()
}

#[cfg(test)]
#[path = "tests/sort_tests.rs"]
mod tests;
