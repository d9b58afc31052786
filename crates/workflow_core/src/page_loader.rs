//! Catalog pagination: cursor, filter, and fetch sequencing.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::{
    domain::{CatalogItem, ParentId},
    protocol::{CatalogPageResponse, CatalogQuery},
};
use tracing::{debug, warn};

use crate::{
    error::{Operation, WorkflowError},
    service::CatalogService,
    store::{LoadingFlag, StateStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Primary,
    Append,
    Filter,
}

impl FetchKind {
    fn flag(self) -> LoadingFlag {
        match self {
            FetchKind::Primary => LoadingFlag::Loading,
            FetchKind::Append => LoadingFlag::LoadingMore,
            FetchKind::Filter => LoadingFlag::TableLoading,
        }
    }

    fn operation(self) -> Operation {
        match self {
            FetchKind::Primary | FetchKind::Append => Operation::Load,
            FetchKind::Filter => Operation::Filter,
        }
    }
}

/// Clears a loading flag when dropped, so every exit path (including a
/// dropped future) releases it.
pub(crate) struct FlagGuard<'a> {
    store: &'a StateStore,
    flag: LoadingFlag,
}

impl<'a> FlagGuard<'a> {
    pub(crate) fn raise(store: &'a StateStore, flag: LoadingFlag) -> Self {
        store.raise_flag(flag);
        Self { store, flag }
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.store.lower_flag(self.flag);
    }
}

pub struct PageLoader {
    service: Arc<dyn CatalogService>,
    store: StateStore,
    parent_id: ParentId,
    page_size: usize,
    discard_stale: bool,
    issued: AtomicU64,
}

impl PageLoader {
    pub fn new(
        service: Arc<dyn CatalogService>,
        store: StateStore,
        parent_id: ParentId,
        page_size: usize,
        discard_stale: bool,
    ) -> Self {
        Self {
            service,
            store,
            parent_id,
            page_size: page_size.max(1),
            discard_stale,
            issued: AtomicU64::new(0),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetches the page at `offset` under the current filter and either
    /// replaces the loaded rows or appends to them.
    ///
    /// On success the price-list state is refreshed as well: an assigned
    /// price list becomes the selection, otherwise the assignment modal opens.
    pub async fn load(&self, offset: usize, append: bool) -> Result<(), WorkflowError> {
        let kind = if append {
            FetchKind::Append
        } else {
            FetchKind::Primary
        };
        self.fetch(kind, offset).await
    }

    /// Non-appending reload from offset 0 under the table-only loading flag.
    pub async fn fetch_filtered_items(&self) -> Result<(), WorkflowError> {
        self.fetch(FetchKind::Filter, 0).await
    }

    /// Appends the next page. Returns `Ok(false)` without fetching when every
    /// row reported by the service is already loaded.
    pub async fn load_more(&self) -> Result<bool, WorkflowError> {
        let next_offset = self
            .store
            .read(|state| state.page.has_more().then_some(state.page.items.len()));
        let Some(offset) = next_offset else {
            debug!("catalog fully loaded; load more skipped");
            return Ok(false);
        };
        self.load(offset, true).await?;
        Ok(true)
    }

    async fn fetch(&self, kind: FetchKind, offset: usize) -> Result<(), WorkflowError> {
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let query = self.store.read(|state| CatalogQuery {
            offset,
            page_size: self.page_size,
            search_term: state.filter.search_term.clone(),
            category: state.filter.category.clone(),
        });

        let _flag = FlagGuard::raise(&self.store, kind.flag());
        self.store.clear_error();
        debug!(
            token,
            offset,
            kind = ?kind,
            search_term = %query.search_term,
            category = %query.category,
            "fetching catalog page"
        );

        let result = self
            .service
            .fetch_catalog_page(&self.parent_id, &query)
            .await;

        if self.discard_stale && self.issued.load(Ordering::SeqCst) != token {
            warn!(
                token,
                kind = ?kind,
                "discarding catalog rows superseded by a newer request"
            );
            // Price-list state does not depend on the filter, and filter
            // fetches never carry it.
            match &result {
                Ok(response) if kind != FetchKind::Filter => self.apply_price_lists(response),
                _ => {}
            }
            return Ok(());
        }

        match result {
            Ok(response) => {
                self.apply(kind, response);
                Ok(())
            }
            Err(failure) => {
                let err = WorkflowError::remote(kind.operation(), &failure);
                warn!(token, kind = ?kind, error = %err, "catalog fetch failed");
                self.store.set_error(err.user_message());
                Err(err)
            }
        }
    }

    fn apply(&self, kind: FetchKind, response: CatalogPageResponse) {
        if kind != FetchKind::Filter {
            self.apply_price_lists(&response);
        }
        let CatalogPageResponse {
            items, total_count, ..
        } = response;
        let rows: Vec<CatalogItem> = items.into_iter().map(CatalogItem::from_record).collect();
        debug!(rows = rows.len(), total_count, kind = ?kind, "catalog page settled");

        self.store
            .set_catalog_rows(rows, total_count, kind == FetchKind::Append);
    }

    /// An assigned price list becomes the selection; otherwise the
    /// assignment modal opens.
    fn apply_price_lists(&self, response: &CatalogPageResponse) {
        self.store.set_price_list_options(
            response.price_list_options.clone(),
            response.assigned_price_list().cloned(),
        );
    }
}

#[cfg(test)]
#[path = "tests/page_loader_tests.rs"]
mod tests;
