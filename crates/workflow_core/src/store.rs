//! Observable view state.
//!
//! Every mutation goes through a named setter on [`StateStore`], which
//! publishes the new state to all `watch` subscribers.

use std::sync::Arc;

use shared::{
    domain::{CatalogItem, EntryKey, PriceListId},
    protocol::PriceListOption,
};
use tokio::sync::watch;

use crate::{
    draft::DraftEdit,
    selection::{SelectionProjection, WorkingItem},
    sort::{SortDirection, SortField},
};

/// Accumulated catalog rows and the pagination cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    /// Number of rows loaded so far; the offset of the next page.
    pub offset: usize,
    pub page_size: usize,
    pub total_count: usize,
}

impl CatalogPage {
    pub fn has_more(&self) -> bool {
        self.items.len() < self.total_count
    }

    pub fn contains(&self, key: &EntryKey) -> bool {
        self.items.iter().any(|item| &item.entry_key == key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub search_term: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub label: String,
    pub value: String,
}

impl CategoryOption {
    pub fn all() -> Self {
        Self {
            label: "All".to_string(),
            value: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingFlag {
    /// Primary (non-appending) catalog fetch.
    Loading,
    /// Appending catalog fetch.
    LoadingMore,
    /// Filter-only catalog refresh.
    TableLoading,
    /// Create or assign submission.
    Submitting,
}

impl LoadingFlag {
    fn index(self) -> usize {
        match self {
            LoadingFlag::Loading => 0,
            LoadingFlag::LoadingMore => 1,
            LoadingFlag::TableLoading => 2,
            LoadingFlag::Submitting => 3,
        }
    }
}

/// A flag stays raised while any operation of its kind is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    pub loading: bool,
    pub loading_more: bool,
    pub table_loading: bool,
    pub submitting: bool,
    in_flight: [u32; 4],
}

impl LoadingFlags {
    pub fn get(&self, flag: LoadingFlag) -> bool {
        match flag {
            LoadingFlag::Loading => self.loading,
            LoadingFlag::LoadingMore => self.loading_more,
            LoadingFlag::TableLoading => self.table_loading,
            LoadingFlag::Submitting => self.submitting,
        }
    }

    pub fn in_flight(&self, flag: LoadingFlag) -> u32 {
        self.in_flight[flag.index()]
    }

    fn raise(&mut self, flag: LoadingFlag) {
        self.in_flight[flag.index()] += 1;
        self.sync(flag);
    }

    fn lower(&mut self, flag: LoadingFlag) {
        let count = &mut self.in_flight[flag.index()];
        *count = count.saturating_sub(1);
        self.sync(flag);
    }

    fn sync(&mut self, flag: LoadingFlag) {
        let active = self.in_flight(flag) > 0;
        match flag {
            LoadingFlag::Loading => self.loading = active,
            LoadingFlag::LoadingMore => self.loading_more = active,
            LoadingFlag::TableLoading => self.table_loading = active,
            LoadingFlag::Submitting => self.submitting = active,
        }
    }

    pub fn any(&self) -> bool {
        self.loading || self.loading_more || self.table_loading || self.submitting
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceListState {
    pub options: Vec<PriceListOption>,
    pub selected: Option<PriceListId>,
    /// Set when the parent document has no price list assigned yet.
    pub modal_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSort {
    pub field: SortField,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub page: CatalogPage,
    pub filter: Filter,
    pub category_options: Vec<CategoryOption>,
    pub price_lists: PriceListState,
    pub selection: Vec<EntryKey>,
    pub working_items: Vec<WorkingItem>,
    pub pending_edits: Vec<DraftEdit>,
    pub catalog_sort: Option<ActiveSort>,
    pub working_sort: Option<ActiveSort>,
    pub flags: LoadingFlags,
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Clone)]
pub struct StateStore {
    tx: Arc<watch::Sender<ViewState>>,
}

impl StateStore {
    pub fn new(page_size: usize) -> Self {
        let state = ViewState {
            page: CatalogPage {
                page_size,
                ..CatalogPage::default()
            },
            category_options: vec![CategoryOption::all()],
            ..ViewState::default()
        };
        let (tx, _) = watch::channel(state);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.tx.borrow().clone()
    }

    /// Runs `f` against the current state. `f` must not call back into the
    /// store.
    pub fn read<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&self.tx.borrow())
    }

    fn update(&self, f: impl FnOnce(&mut ViewState)) {
        self.tx.send_modify(f);
    }

    pub fn raise_flag(&self, flag: LoadingFlag) {
        self.update(|state| state.flags.raise(flag));
    }

    pub fn lower_flag(&self, flag: LoadingFlag) {
        self.update(|state| state.flags.lower(flag));
    }

    /// Error and success are mutually exclusive; setting one clears the other.
    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|state| {
            state.error = Some(message);
            state.success = false;
        });
    }

    pub fn clear_error(&self) {
        self.update(|state| state.error = None);
    }

    pub fn set_success(&self) {
        self.update(|state| {
            state.error = None;
            state.success = true;
        });
    }

    pub fn clear_messages(&self) {
        self.update(|state| {
            state.error = None;
            state.success = false;
        });
    }

    /// Changing the search term rewinds the cursor; the caller is expected to
    /// follow with a non-appending fetch.
    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        self.update(|state| {
            state.filter.search_term = term;
            state.page.offset = 0;
        });
    }

    pub fn set_category(&self, category: impl Into<String>) {
        let category = category.into();
        self.update(|state| {
            state.filter.category = category;
            state.page.offset = 0;
        });
    }

    /// Replaces (or extends, when `append`) the loaded catalog rows. Rows
    /// arrive in service order, so any active catalog sort is cleared.
    pub fn set_catalog_rows(&self, rows: Vec<CatalogItem>, total_count: usize, append: bool) {
        self.update(|state| {
            state.catalog_sort = None;
            if append {
                state.page.items.extend(rows);
            } else {
                state.page.items = rows;
            }
            state.page.offset = state.page.items.len();
            state.page.total_count = total_count.max(state.page.offset);
            merge_category_options(&mut state.category_options, &state.page.items);
        });
    }

    pub fn set_sorted_catalog(&self, items: Vec<CatalogItem>, sort: ActiveSort) {
        self.update(|state| {
            state.page.items = items;
            state.catalog_sort = Some(sort);
        });
    }

    pub fn set_price_list_options(
        &self,
        options: Vec<PriceListOption>,
        assigned: Option<PriceListId>,
    ) {
        self.update(|state| {
            state.price_lists.options = options;
            state.price_lists.modal_open = assigned.is_none();
            state.price_lists.selected = assigned;
        });
    }

    pub fn set_selected_price_list(&self, price_list: Option<PriceListId>) {
        self.update(|state| state.price_lists.selected = price_list);
    }

    pub fn set_price_list_modal(&self, open: bool) {
        self.update(|state| state.price_lists.modal_open = open);
    }

    pub fn set_selection(&self, projection: SelectionProjection) {
        self.update(|state| {
            state.selection = projection.selection;
            state.working_items = projection.working_items;
        });
    }

    pub fn set_working_items(&self, items: Vec<WorkingItem>) {
        self.update(|state| {
            state.working_items = items;
            state.pending_edits.clear();
        });
    }

    pub fn set_sorted_working_items(&self, items: Vec<WorkingItem>, sort: ActiveSort) {
        self.update(|state| {
            state.working_items = items;
            state.working_sort = Some(sort);
        });
    }

    pub fn set_pending_edits(&self, edits: Vec<DraftEdit>) {
        self.update(|state| state.pending_edits = edits);
    }

    pub fn clear_selection(&self) {
        self.update(|state| {
            state.selection.clear();
            state.working_items.clear();
            state.pending_edits.clear();
        });
    }
}

/// Adds categories seen in `items` to `options`, keeping first-seen order.
/// Options are never removed, so the list only grows as more pages arrive.
fn merge_category_options(options: &mut Vec<CategoryOption>, items: &[CatalogItem]) {
    if options.is_empty() {
        options.push(CategoryOption::all());
    }
    for item in items {
        let category = item.category.trim();
        if category.is_empty() || options.iter().any(|option| option.value == category) {
            continue;
        }
        options.push(CategoryOption {
            label: category.to_string(),
            value: category.to_string(),
        });
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
