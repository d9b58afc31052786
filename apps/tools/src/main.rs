use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod seed;

#[derive(Parser, Debug)]
#[command(about = "Seed data converters for the product catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Product CSV (`ProductCode;Name;Family;IsActive`) to a product import file.
    Products {
        #[arg(long, default_value = "data/products.csv")]
        input: PathBuf,
        #[arg(long, default_value = "data/products.json")]
        output: PathBuf,
    },
    /// Entry CSV (`UnitPrice;IsActive;UseStandardPrice`) to a price-list entry
    /// import file. Row N is linked to product N of the product file.
    PriceListEntries {
        #[arg(long)]
        price_list_id: String,
        #[arg(long, default_value = "data/price-list-entries.csv")]
        input: PathBuf,
        #[arg(long, default_value = "data/price-list-entries.json")]
        output: PathBuf,
    },
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("failed to open {}", path.display()))
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("failed to write {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Products { input, output } => {
            let seed = seed::convert_products(open(&input)?)?;
            write_json(&output, &seed)?;
            info!(input = %input.display(), "product seed converted");
            println!("{} products written to {}", seed.records.len(), output.display());
        }
        Command::PriceListEntries {
            price_list_id,
            input,
            output,
        } => {
            let seed = seed::convert_price_list_entries(open(&input)?, &price_list_id)?;
            write_json(&output, &seed)?;
            info!(
                input = %input.display(),
                price_list = %price_list_id,
                "price list entry seed converted"
            );
            println!(
                "{} price list entries written to {}",
                seed.records.len(),
                output.display()
            );
        }
    }

    Ok(())
}
