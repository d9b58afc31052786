use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::domain::{EntryKey, ParentId};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use workflow_core::{
    load_settings, DraftEdit, EditableField, HttpCatalogService, LineItemWorkflow, SortDirection,
    SortField, ViewState, WorkflowEvent,
};

#[derive(Parser, Debug)]
#[command(about = "Add catalog entries to a parent document as line items")]
struct Cli {
    /// Parent document the line items and price list belong to.
    #[arg(long)]
    parent: String,
    #[arg(long)]
    service_url: Option<String>,
    #[arg(long)]
    page_size: Option<usize>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the first catalog page, or every page with `--all`.
    Browse {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long)]
        all: bool,
        #[arg(long)]
        sort: Option<SortField>,
        #[arg(long, default_value = "asc")]
        direction: SortDirection,
    },
    /// Create line items from entry keys, each optionally written as
    /// `key=quantity[:unitPrice[:discount]]`.
    Add {
        #[arg(required = true)]
        entries: Vec<String>,
    },
    AssignPriceList {
        price_list_id: String,
    },
}

/// One `add` argument: the entry key and the overrides typed after it.
#[derive(Debug, PartialEq)]
struct EntryArg {
    key: EntryKey,
    edit: Option<DraftEdit>,
}

fn parse_entry(raw: &str) -> Result<EntryArg> {
    let (key, overrides) = match raw.split_once('=') {
        Some((key, overrides)) => (key.trim(), Some(overrides)),
        None => (raw.trim(), None),
    };
    if key.is_empty() {
        bail!("entry '{raw}' has no key");
    }

    let edit = match overrides {
        None => None,
        Some(overrides) => {
            let fields = [
                EditableField::Quantity,
                EditableField::UnitPrice,
                EditableField::Discount,
            ];
            let values: Vec<&str> = overrides.split(':').collect();
            if values.len() > fields.len() {
                bail!("entry '{raw}' has more than three overrides");
            }
            let mut edit = DraftEdit::new(key);
            for (field, value) in fields.into_iter().zip(values) {
                if !value.trim().is_empty() {
                    edit.set(field, value.trim());
                }
            }
            Some(edit)
        }
    };

    Ok(EntryArg {
        key: EntryKey::from(key),
        edit,
    })
}

fn print_catalog(state: &ViewState) {
    for item in &state.page.items {
        println!(
            "{:<20} {:<12} {:<32} {:<14} {:>10.2}",
            item.entry_key,
            item.product_code,
            item.product_name,
            item.category,
            item.unit_price
        );
    }
    println!(
        "showing {} of {} entries",
        state.page.items.len(),
        state.page.total_count
    );
}

fn print_working_set(state: &ViewState) {
    for item in &state.working_items {
        println!(
            "{:<20} qty={:<5} unit={:>10.2} disc={:>6.2}% total={:>12.2}",
            item.entry_key(),
            item.quantity(),
            item.unit_price(),
            item.discount(),
            item.total_price()
        );
    }
}

/// Loads pages until every key in `keys` is present or the catalog runs out.
async fn load_until_present(workflow: &LineItemWorkflow, keys: &[EntryKey]) -> Result<()> {
    workflow
        .load_initial()
        .await
        .context("failed to load catalog")?;
    loop {
        let missing = workflow
            .store()
            .read(|state| keys.iter().any(|key| !state.page.contains(key)));
        if !missing {
            return Ok(());
        }
        let loaded_more = workflow
            .handle_load_more()
            .await
            .context("failed to load more catalog entries")?;
        if !loaded_more {
            return Ok(());
        }
    }
}

async fn browse(
    workflow: &LineItemWorkflow,
    search: String,
    category: String,
    all: bool,
    sort: Option<(SortField, SortDirection)>,
) -> Result<()> {
    workflow.store().set_search_term(search);
    workflow.store().set_category(category);
    workflow
        .load_initial()
        .await
        .context("failed to load catalog")?;
    if all {
        while workflow
            .handle_load_more()
            .await
            .context("failed to load more catalog entries")?
        {}
    }
    if let Some((field, direction)) = sort {
        workflow.sort_catalog(field, direction);
    }
    print_catalog(&workflow.snapshot());
    Ok(())
}

async fn add(workflow: &LineItemWorkflow, entries: Vec<String>) -> Result<()> {
    let entries = entries
        .iter()
        .map(String::as_str)
        .map(parse_entry)
        .collect::<Result<Vec<_>>>()?;
    let keys: Vec<EntryKey> = entries.iter().map(|entry| entry.key.clone()).collect();

    load_until_present(workflow, &keys).await?;
    let dropped = workflow.set_selection(&keys);
    for key in &dropped {
        warn!(entry = %key, "entry not found in catalog; skipped");
    }

    let edits: Vec<DraftEdit> = entries.into_iter().filter_map(|entry| entry.edit).collect();
    workflow.apply_edits(&edits);
    print_working_set(&workflow.snapshot());

    let created = workflow
        .submit_create()
        .await
        .context("failed to create line items")?;
    println!("created {created} line item(s) on {}", workflow.parent_id());
    Ok(())
}

async fn assign_price_list(workflow: &LineItemWorkflow, price_list_id: String) -> Result<()> {
    let mut events = workflow.subscribe_events();
    workflow
        .load_initial()
        .await
        .context("failed to load catalog")?;
    let known = workflow.store().read(|state| {
        state
            .price_lists
            .options
            .iter()
            .any(|option| option.value.as_str() == price_list_id)
    });
    if !known {
        warn!(price_list = %price_list_id, "price list not offered for this parent");
    }

    workflow.handle_price_list_change(price_list_id.as_str());
    workflow
        .submit_assign_price_list()
        .await
        .context("failed to assign price list")?;

    while let Ok(event) = events.recv().await {
        match event {
            WorkflowEvent::Notification(notification) => {
                println!("{}: {}", notification.title, notification.message);
            }
            WorkflowEvent::PageReloadRequested => {
                info!("page reload requested");
                break;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(service_url) = cli.service_url {
        settings.service_url = service_url;
    }
    if let Some(page_size) = cli.page_size.filter(|size| *size > 0) {
        settings.page_size = page_size;
    }

    let service = HttpCatalogService::new(&settings.service_url, settings.request_timeout())
        .context("failed to create catalog service client")?;
    let workflow = LineItemWorkflow::new(ParentId::from(cli.parent), Arc::new(service), &settings);

    match cli.command {
        Command::Browse {
            search,
            category,
            all,
            sort,
            direction,
        } => {
            browse(
                &workflow,
                search,
                category,
                all,
                sort.map(|field| (field, direction)),
            )
            .await?
        }
        Command::Add { entries } => add(&workflow, entries).await?,
        Command::AssignPriceList { price_list_id } => {
            assign_price_list(&workflow, price_list_id).await?
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
