use serde::{Deserialize, Serialize};

use crate::domain::{EntryKey, PriceListId, ProductId};

/// Parameters of one catalog page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub offset: usize,
    pub page_size: usize,
    pub search_term: String,
    pub category: String,
}

/// A catalog row as sent by the service, before numeric defaults are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    pub entry_key: EntryKey,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_code: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub list_price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub discount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceListOption {
    pub label: String,
    pub value: PriceListId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPageResponse {
    #[serde(default)]
    pub items: Vec<CatalogRecord>,
    #[serde(default)]
    pub total_count: usize,
    #[serde(default)]
    pub price_list_options: Vec<PriceListOption>,
    #[serde(default)]
    pub assigned_price_list_id: Option<PriceListId>,
}

impl CatalogPageResponse {
    /// The assigned price list, treating an empty identifier as unassigned.
    pub fn assigned_price_list(&self) -> Option<&PriceListId> {
        self.assigned_price_list_id
            .as_ref()
            .filter(|id| !id.is_blank())
    }
}

/// One line item to be created against the parent document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDraft {
    pub entry_key: EntryKey,
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLineItemsRequest {
    pub items: Vec<LineItemDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPriceListRequest {
    pub price_list_id: PriceListId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_assigned_price_list_counts_as_unassigned() {
        let response: CatalogPageResponse = serde_json::from_str(
            r#"{"items":[],"totalCount":0,"priceListOptions":[],"assignedPriceListId":""}"#,
        )
        .expect("response");
        assert_eq!(response.assigned_price_list(), None);

        let response: CatalogPageResponse =
            serde_json::from_str(r#"{"assignedPriceListId":"pl-7"}"#).expect("response");
        assert_eq!(
            response.assigned_price_list(),
            Some(&PriceListId::from("pl-7"))
        );
    }

    #[test]
    fn query_serializes_camel_case() {
        let query = CatalogQuery {
            offset: 50,
            page_size: 50,
            search_term: "bolt".into(),
            category: String::new(),
        };
        let value = serde_json::to_value(&query).expect("query");
        assert_eq!(value["pageSize"], 50);
        assert_eq!(value["searchTerm"], "bolt");
    }
}
