//! Converters from semicolon-delimited CSV exports to record import files.

use std::io::Read;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct SeedFile<T> {
    pub records: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attributes {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "referenceId")]
    pub reference_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductSeed {
    #[serde(rename = "attributes")]
    pub attributes: Attributes,
    pub product_code: String,
    pub name: String,
    pub family: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceListEntrySeed {
    #[serde(rename = "attributes")]
    pub attributes: Attributes,
    #[serde(rename = "Pricebook2Id")]
    pub price_list_id: String,
    #[serde(rename = "Product2Id")]
    pub product_ref: String,
    pub unit_price: f64,
    pub is_active: bool,
    pub use_standard_price: bool,
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    #[serde(rename = "ProductCode", default)]
    product_code: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Family", default)]
    family: String,
    #[serde(rename = "IsActive", default)]
    is_active: String,
}

#[derive(Debug, Deserialize)]
struct PriceListEntryRow {
    #[serde(rename = "UnitPrice", default)]
    unit_price: String,
    #[serde(rename = "IsActive", default)]
    is_active: String,
    #[serde(rename = "UseStandardPrice", default)]
    use_standard_price: String,
}

/// Reference id of the `index`th product (1-based). Price-list entry rows
/// point at products by position through this id.
pub fn product_reference(index: usize) -> String {
    format!("ProductRef{index}")
}

fn flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

/// Decimal commas are accepted; anything unparsable becomes 0.
fn price(raw: &str) -> f64 {
    let normalized = raw.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            if !normalized.is_empty() {
                warn!(value = raw, "unparsable unit price; using 0");
            }
            0.0
        }
    }
}

fn rows<T: DeserializeOwned>(mut input: impl Read) -> Result<Vec<T>> {
    let mut text = String::new();
    input
        .read_to_string(&mut text)
        .context("failed to read csv input")?;
    let text = text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    reader
        .deserialize()
        .enumerate()
        .map(|(idx, row)| row.with_context(|| format!("malformed csv row {}", idx + 1)))
        .collect()
}

pub fn convert_products(input: impl Read) -> Result<SeedFile<ProductSeed>> {
    let records = rows::<ProductRow>(input)?
        .into_iter()
        .enumerate()
        .map(|(idx, row)| ProductSeed {
            attributes: Attributes {
                kind: "Product2",
                reference_id: product_reference(idx + 1),
            },
            product_code: row.product_code.trim().to_string(),
            name: row.name.trim().to_string(),
            family: row.family.trim().to_string(),
            is_active: flag(&row.is_active),
        })
        .collect();
    Ok(SeedFile { records })
}

pub fn convert_price_list_entries(
    input: impl Read,
    price_list_id: &str,
) -> Result<SeedFile<PriceListEntrySeed>> {
    let records = rows::<PriceListEntryRow>(input)?
        .into_iter()
        .enumerate()
        .map(|(idx, row)| PriceListEntrySeed {
            attributes: Attributes {
                kind: "PricebookEntry",
                reference_id: format!("PricebookEntryRef{}", idx + 1),
            },
            price_list_id: price_list_id.to_string(),
            product_ref: format!("@{}", product_reference(idx + 1)),
            unit_price: price(&row.unit_price),
            is_active: flag(&row.is_active),
            use_standard_price: flag(&row.use_standard_price),
        })
        .collect();
    Ok(SeedFile { records })
}

#[cfg(test)]
#[path = "tests/seed_tests.rs"]
mod tests;
