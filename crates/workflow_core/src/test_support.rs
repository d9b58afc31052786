//! Fixtures and a scripted `CatalogService` shared by the unit tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use shared::{
    domain::{CatalogItem, EntryKey, ParentId, PriceListId, ProductId},
    error::ApiError,
    protocol::{CatalogPageResponse, CatalogQuery, CatalogRecord, LineItemDraft, PriceListOption},
};
use tokio::sync::{oneshot, Mutex};

use crate::service::CatalogService;

pub(crate) fn approx(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}

pub(crate) fn catalog_item(key: &str, unit_price: f64) -> CatalogItem {
    CatalogItem {
        entry_key: EntryKey::from(key),
        product_id: Some(ProductId::from(format!("prod-{key}"))),
        product_name: format!("Product {key}"),
        product_code: format!("P-{key}"),
        category: String::new(),
        list_price: Some(unit_price),
        quantity: 1,
        unit_price,
        discount: 0.0,
    }
}

pub(crate) fn record(key: &str, name: &str, category: &str) -> CatalogRecord {
    CatalogRecord {
        entry_key: EntryKey::from(key),
        product_id: Some(ProductId::from(format!("prod-{key}"))),
        product_name: name.to_string(),
        product_code: format!("P-{key}"),
        category: category.to_string(),
        list_price: Some(10.0),
        quantity: None,
        unit_price: Some(10.0),
        discount: None,
    }
}

/// `count` records cycling through three categories.
pub(crate) fn records(count: usize) -> Vec<CatalogRecord> {
    const CATEGORIES: [&str; 3] = ["Hardware", "Software", ""];
    (0..count)
        .map(|idx| {
            record(
                &format!("pbe-{idx:03}"),
                &format!("Item {idx:03}"),
                CATEGORIES[idx % CATEGORIES.len()],
            )
        })
        .collect()
}

pub(crate) fn price_list_options() -> Vec<PriceListOption> {
    vec![
        PriceListOption {
            label: "Standard".into(),
            value: PriceListId::from("pl-standard"),
        },
        PriceListOption {
            label: "Partner".into(),
            value: PriceListId::from("pl-partner"),
        },
    ]
}

pub(crate) enum FetchStep {
    Ready(Result<CatalogPageResponse, ApiError>),
    Gated(oneshot::Receiver<Result<CatalogPageResponse, ApiError>>),
}

/// In-memory service. Queued fetch steps take priority; otherwise pages are
/// served from `catalog`, filtered by search term (name, case-insensitive)
/// and category.
pub(crate) struct ScriptedService {
    catalog: Vec<CatalogRecord>,
    assigned_price_list: Option<PriceListId>,
    fetch_steps: Mutex<VecDeque<FetchStep>>,
    create_results: Mutex<VecDeque<Result<(), ApiError>>>,
    assign_results: Mutex<VecDeque<Result<(), ApiError>>>,
    pub fetch_calls: Mutex<Vec<CatalogQuery>>,
    pub create_calls: Mutex<Vec<(ParentId, Vec<LineItemDraft>)>>,
    pub assign_calls: Mutex<Vec<(ParentId, PriceListId)>>,
}

impl ScriptedService {
    pub(crate) fn with_catalog(catalog: Vec<CatalogRecord>) -> Self {
        Self {
            catalog,
            assigned_price_list: Some(PriceListId::from("pl-standard")),
            fetch_steps: Mutex::new(VecDeque::new()),
            create_results: Mutex::new(VecDeque::new()),
            assign_results: Mutex::new(VecDeque::new()),
            fetch_calls: Mutex::new(Vec::new()),
            create_calls: Mutex::new(Vec::new()),
            assign_calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn without_price_list(mut self) -> Self {
        self.assigned_price_list = None;
        self
    }

    pub(crate) async fn push_fetch(&self, step: FetchStep) {
        self.fetch_steps.lock().await.push_back(step);
    }

    pub(crate) async fn push_create(&self, result: Result<(), ApiError>) {
        self.create_results.lock().await.push_back(result);
    }

    pub(crate) async fn push_assign(&self, result: Result<(), ApiError>) {
        self.assign_results.lock().await.push_back(result);
    }

    pub(crate) async fn fetch_count(&self) -> usize {
        self.fetch_calls.lock().await.len()
    }

    pub(crate) fn page(&self, query: &CatalogQuery) -> CatalogPageResponse {
        let needle = query.search_term.trim().to_lowercase();
        let matching: Vec<&CatalogRecord> = self
            .catalog
            .iter()
            .filter(|record| {
                needle.is_empty() || record.product_name.to_lowercase().contains(&needle)
            })
            .filter(|record| query.category.is_empty() || record.category == query.category)
            .collect();

        CatalogPageResponse {
            items: matching
                .iter()
                .skip(query.offset)
                .take(query.page_size)
                .map(|record| (*record).clone())
                .collect(),
            total_count: matching.len(),
            price_list_options: price_list_options(),
            assigned_price_list_id: self.assigned_price_list.clone(),
        }
    }
}

#[async_trait]
impl CatalogService for ScriptedService {
    async fn fetch_catalog_page(
        &self,
        _parent_id: &ParentId,
        query: &CatalogQuery,
    ) -> Result<CatalogPageResponse, ApiError> {
        self.fetch_calls.lock().await.push(query.clone());
        let step = self.fetch_steps.lock().await.pop_front();
        match step {
            Some(FetchStep::Ready(result)) => result,
            Some(FetchStep::Gated(gate)) => gate
                .await
                .unwrap_or_else(|_| Err(ApiError::without_message(Default::default()))),
            None => Ok(self.page(query)),
        }
    }

    async fn create_line_items(
        &self,
        parent_id: &ParentId,
        items: &[LineItemDraft],
    ) -> Result<(), ApiError> {
        self.create_calls
            .lock()
            .await
            .push((parent_id.clone(), items.to_vec()));
        self.create_results.lock().await.pop_front().unwrap_or(Ok(()))
    }

    async fn assign_price_list(
        &self,
        parent_id: &ParentId,
        price_list_id: &PriceListId,
    ) -> Result<(), ApiError> {
        self.assign_calls
            .lock()
            .await
            .push((parent_id.clone(), price_list_id.clone()));
        self.assign_results.lock().await.pop_front().unwrap_or(Ok(()))
    }
}
