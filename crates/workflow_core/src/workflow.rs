//! The line-item workflow controller: user-facing handlers over the page
//! loader, selection, drafts and the create/assign submissions.

use std::{collections::HashSet, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{
    domain::{EntryKey, ParentId, PriceListId},
    protocol::LineItemDraft,
};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::{
    config::WorkflowSettings,
    debounce::Debouncer,
    draft::{merge_drafts, DraftEdit},
    error::{Operation, WorkflowError, NO_PRICE_LIST, NO_VALID_ITEMS},
    page_loader::{FlagGuard, PageLoader},
    selection::{project_selection, WorkingItem},
    service::CatalogService,
    sort::{sort_items, SortDirection, SortField},
    store::{ActiveSort, LoadingFlag, StateStore, ViewState},
};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    fn success(message: &str) -> Self {
        Self {
            title: "Success".to_string(),
            message: message.to_string(),
            severity: Severity::Success,
            raised_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    Notification(Notification),
    /// The host should reload the whole page. Sent once the configured delay
    /// has passed after a successful price-list assignment.
    PageReloadRequested,
}

/// Projects the selected working items into create payload rows.
///
/// Rows whose key is not selected are skipped, as are rows with a blank key,
/// no product id, a non-finite unit price or a quantity below 1.
pub fn build_create_payload(selection: &[EntryKey], items: &[WorkingItem]) -> Vec<LineItemDraft> {
    let selected: HashSet<&EntryKey> = selection.iter().collect();
    items
        .iter()
        .filter(|item| selected.contains(item.entry_key()))
        .filter_map(|item| {
            let product_id = item.item().product_id.clone()?;
            let valid = !item.entry_key().is_blank()
                && !product_id.is_blank()
                && item.unit_price().is_finite()
                && item.quantity() > 0;
            valid.then(|| LineItemDraft {
                entry_key: item.entry_key().clone(),
                product_id,
                quantity: item.quantity(),
                unit_price: item.unit_price(),
                discount: item.discount(),
            })
        })
        .collect()
}

pub struct LineItemWorkflow {
    parent_id: ParentId,
    service: Arc<dyn CatalogService>,
    store: StateStore,
    loader: PageLoader,
    search_debounce: Debouncer,
    page_reload_delay: Duration,
    events: broadcast::Sender<WorkflowEvent>,
}

impl LineItemWorkflow {
    pub fn new(
        parent_id: ParentId,
        service: Arc<dyn CatalogService>,
        settings: &WorkflowSettings,
    ) -> Arc<Self> {
        let store = StateStore::new(settings.page_size);
        let loader = PageLoader::new(
            Arc::clone(&service),
            store.clone(),
            parent_id.clone(),
            settings.page_size,
            settings.discard_stale_responses,
        );
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            parent_id,
            service,
            store,
            loader,
            search_debounce: Debouncer::new(settings.search_debounce()),
            page_reload_delay: settings.page_reload_delay(),
            events,
        })
    }

    pub fn parent_id(&self) -> &ParentId {
        &self.parent_id
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn snapshot(&self) -> ViewState {
        self.store.snapshot()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ViewState> {
        self.store.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    /// First page under the current filter.
    pub async fn load_initial(&self) -> Result<(), WorkflowError> {
        self.loader.load(0, false).await
    }

    pub async fn load(&self, offset: usize, append: bool) -> Result<(), WorkflowError> {
        self.loader.load(offset, append).await
    }

    pub async fn fetch_filtered_items(&self) -> Result<(), WorkflowError> {
        self.loader.fetch_filtered_items().await
    }

    /// Appends the next page; `Ok(false)` when the catalog is exhausted.
    pub async fn handle_load_more(&self) -> Result<bool, WorkflowError> {
        self.loader.load_more().await
    }

    /// Records the search term now and schedules one filtered fetch once
    /// typing has been quiet for the debounce delay. A keystroke arriving
    /// before then replaces the scheduled fetch.
    pub fn handle_search_change(self: &Arc<Self>, value: impl Into<String>) {
        self.store.set_search_term(value);
        let workflow = Arc::clone(self);
        self.search_debounce.schedule(async move {
            if let Err(err) = workflow.loader.fetch_filtered_items().await {
                debug!(error = %err, "debounced search fetch failed");
            }
        });
    }

    /// Applies the category and fetches right away.
    pub async fn handle_category_change(
        &self,
        value: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        self.store.set_category(value);
        self.loader.fetch_filtered_items().await
    }

    /// Replaces the selection and rebuilds the working set from the loaded
    /// catalog. Returns the requested keys that had no loaded row.
    pub fn set_selection(&self, keys: &[EntryKey]) -> Vec<EntryKey> {
        let projection = self
            .store
            .read(|state| project_selection(&state.page.items, keys));
        let dropped = projection.dropped.clone();
        if !dropped.is_empty() {
            debug!(dropped = dropped.len(), "selection keys not in loaded catalog");
        }
        self.store.set_selection(projection);
        dropped
    }

    /// Queues raw grid edits without touching the working set.
    pub fn stage_edits(&self, edits: impl IntoIterator<Item = DraftEdit>) {
        let mut pending = self.store.read(|state| state.pending_edits.clone());
        pending.extend(edits);
        self.store.set_pending_edits(pending);
    }

    /// Merges the staged edits into the working set. Returns how many edits
    /// were applied.
    pub fn save_drafts(&self) -> usize {
        let pending = self.store.read(|state| state.pending_edits.clone());
        if pending.is_empty() {
            return 0;
        }
        self.apply_edits(&pending);
        pending.len()
    }

    /// Merges `edits` into the working set and drops any staged edits.
    pub fn apply_edits(&self, edits: &[DraftEdit]) {
        let merged = self
            .store
            .read(|state| merge_drafts(&state.working_items, edits));
        self.store.set_working_items(merged);
    }

    pub fn sort_catalog(&self, field: SortField, direction: SortDirection) {
        let sorted = self
            .store
            .read(|state| sort_items(&state.page.items, field, direction));
        self.store
            .set_sorted_catalog(sorted, ActiveSort { field, direction });
    }

    pub fn sort_working_set(&self, field: SortField, direction: SortDirection) {
        let sorted = self
            .store
            .read(|state| sort_items(&state.working_items, field, direction));
        self.store
            .set_sorted_working_items(sorted, ActiveSort { field, direction });
    }

    /// A blank id clears the choice.
    pub fn handle_price_list_change(&self, price_list_id: impl Into<PriceListId>) {
        let price_list_id = price_list_id.into();
        let selected = (!price_list_id.is_blank()).then_some(price_list_id);
        self.store.set_selected_price_list(selected);
    }

    pub fn cancel_price_list_modal(&self) {
        self.store.set_price_list_modal(false);
    }

    /// Creates line items for the valid selected working rows, then clears the
    /// selection and reloads the catalog from the first page.
    ///
    /// Returns the number of rows submitted. Nothing is sent when no row is
    /// valid.
    pub async fn submit_create(&self) -> Result<usize, WorkflowError> {
        self.store.clear_messages();
        let payload = self
            .store
            .read(|state| build_create_payload(&state.selection, &state.working_items));
        if payload.is_empty() {
            self.store.set_error(NO_VALID_ITEMS);
            return Err(WorkflowError::validation(NO_VALID_ITEMS));
        }

        let result = {
            let _flag = FlagGuard::raise(&self.store, LoadingFlag::Submitting);
            debug!(parent = %self.parent_id, items = payload.len(), "creating line items");
            self.service
                .create_line_items(&self.parent_id, &payload)
                .await
        };

        if let Err(failure) = result {
            let err = WorkflowError::remote(Operation::Create, &failure);
            warn!(parent = %self.parent_id, error = %err, "line item creation failed");
            self.store.set_error(err.user_message());
            return Err(err);
        }

        info!(parent = %self.parent_id, items = payload.len(), "line items created");
        self.store.clear_selection();
        self.store.set_success();
        if let Err(err) = self.loader.load(0, false).await {
            warn!(error = %err, "catalog reload after create failed");
        }
        self.notify(Notification::success("Line items created."));
        Ok(payload.len())
    }

    /// Assigns the chosen price list to the parent document. On success the
    /// modal closes and a page reload is requested after the configured delay.
    pub async fn submit_assign_price_list(&self) -> Result<(), WorkflowError> {
        self.store.clear_messages();
        let Some(price_list_id) = self.store.read(|state| state.price_lists.selected.clone())
        else {
            self.store.set_error(NO_PRICE_LIST);
            return Err(WorkflowError::validation(NO_PRICE_LIST));
        };

        let result = {
            let _flag = FlagGuard::raise(&self.store, LoadingFlag::Submitting);
            debug!(parent = %self.parent_id, price_list = %price_list_id, "assigning price list");
            self.service
                .assign_price_list(&self.parent_id, &price_list_id)
                .await
        };

        if let Err(failure) = result {
            let err = WorkflowError::remote(Operation::AssignPriceList, &failure);
            warn!(parent = %self.parent_id, error = %err, "price list assignment failed");
            self.store.set_error(err.user_message());
            return Err(err);
        }

        info!(parent = %self.parent_id, price_list = %price_list_id, "price list assigned");
        self.store.set_price_list_modal(false);
        self.store.set_success();
        self.notify(Notification::success("Price list assigned."));
        self.schedule_page_reload();
        Ok(())
    }

    fn schedule_page_reload(&self) {
        let events = self.events.clone();
        let delay = self.page_reload_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(WorkflowEvent::PageReloadRequested);
        });
    }

    fn notify(&self, notification: Notification) {
        let _ = self.events.send(WorkflowEvent::Notification(notification));
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
