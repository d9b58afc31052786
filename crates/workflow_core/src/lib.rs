//! Client-side workflow for turning a paginated product catalog into line
//! items on a parent document.
//!
//! [`LineItemWorkflow`] is the entry point. It owns the page loader, the
//! selection and draft projections, the debounced search handler and the
//! create/assign submissions. All state lives in a [`StateStore`] that
//! notifies subscribers on every mutation.

pub mod config;
pub mod debounce;
pub mod draft;
pub mod error;
pub mod page_loader;
pub mod selection;
pub mod service;
pub mod sort;
pub mod store;
pub mod workflow;

pub use config::{load_settings, WorkflowSettings};
pub use debounce::Debouncer;
pub use draft::{merge_drafts, DraftEdit, EditableField};
pub use error::{Operation, WorkflowError};
pub use page_loader::PageLoader;
pub use selection::{project_selection, SelectionProjection, WorkingItem};
pub use service::{CatalogService, HttpCatalogService};
pub use sort::{sort_items, SortDirection, SortField, SortKey};
pub use store::{
    ActiveSort, CatalogPage, CategoryOption, Filter, LoadingFlag, LoadingFlags, PriceListState,
    StateStore, ViewState,
};
pub use workflow::{
    build_create_payload, LineItemWorkflow, Notification, Severity, WorkflowEvent,
};

#[cfg(test)]
pub(crate) mod test_support;
