use serde::{Deserialize, Serialize};

use crate::protocol::CatalogRecord;

pub const DEFAULT_QUANTITY: i64 = 1;
pub const DEFAULT_UNIT_PRICE: f64 = 0.0;
pub const DEFAULT_DISCOUNT: f64 = 0.0;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(EntryKey);
id_newtype!(ProductId);
id_newtype!(ParentId);
id_newtype!(PriceListId);

/// A purchasable price-list entry as held in the loaded catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub entry_key: EntryKey,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub product_code: String,
    pub category: String,
    pub list_price: Option<f64>,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount: f64,
}

impl CatalogItem {
    pub fn from_record(record: CatalogRecord) -> Self {
        Self {
            entry_key: record.entry_key,
            product_id: record.product_id.filter(|id| !id.is_blank()),
            product_name: record.product_name,
            product_code: record.product_code,
            category: record.category,
            list_price: record.list_price.filter(|price| price.is_finite()),
            quantity: coerce_quantity(record.quantity),
            unit_price: coerce_unit_price(record.unit_price),
            discount: coerce_discount(record.discount),
        }
    }
}

/// Absent or non-finite quantities fall back to one; present values are
/// truncated and kept as-is so that create-time validation can reject them.
pub fn coerce_quantity(raw: Option<f64>) -> i64 {
    match raw {
        Some(value) if value.is_finite() => value.trunc() as i64,
        _ => DEFAULT_QUANTITY,
    }
}

pub fn coerce_unit_price(raw: Option<f64>) -> f64 {
    match raw {
        Some(value) if value.is_finite() => value.max(0.0),
        _ => DEFAULT_UNIT_PRICE,
    }
}

pub fn coerce_discount(raw: Option<f64>) -> f64 {
    match raw {
        Some(value) if value.is_finite() => value.clamp(0.0, 100.0),
        _ => DEFAULT_DISCOUNT,
    }
}

/// Parses a raw cell value typed by the operator. Blank and unparsable input
/// yields `None`.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn line_total(unit_price: f64, quantity: i64, discount: f64) -> f64 {
    unit_price * quantity as f64 * (1.0 - discount / 100.0)
}
