//! Command line interface - argument definitions, shared context and dispatch.
//!
//! Handlers in [`commands`] return the text to show; only [`run`] prints.

/// Command handlers grouped by area (catalog, sales, recommend)
pub mod commands;

use crate::{
    config::settings::{AppConfig, DEFAULT_CONFIG_PATH},
    core::ledger::YearMonth,
    entities::Priority,
    errors::Result,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use sea_orm::DatabaseConnection;
use std::path::PathBuf;

/// Replenishment recommendations from sales history and current stock.
#[derive(Parser, Debug)]
#[command(name = "restock", version, about = "Replenishment recommendation engine")]
pub struct Cli {
    /// Settings file with policy constants and template layout.
    #[arg(long, global = true, env = "RESTOCK_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Database URL (falls back to `DATABASE_URL`, then a local `SQLite` file).
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the product catalog.
    Catalog {
        /// Catalog operation.
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Load and browse the sales ledger.
    Sales {
        /// Sales operation.
        #[command(subcommand)]
        action: SalesAction,
    },

    /// Compute purchase recommendations for an inventory snapshot.
    Recommend(RecommendArgs),
}

/// `restock catalog ...`
#[derive(Subcommand, Debug)]
pub enum CatalogAction {
    /// Add a product.
    Add {
        /// Product code (e.g. FB063).
        code: String,
        /// Product name.
        name: String,
        /// Sale units per purchasing box.
        #[arg(long)]
        units_per_box: i64,
        /// Priority tier: low, medium or high.
        #[arg(long, default_value = "low")]
        priority: Priority,
    },

    /// List products, optionally filtered by code or name.
    List {
        /// Substring of the code or name.
        #[arg(long)]
        search: Option<String>,
    },

    /// Change the priority tier of a product.
    Priority {
        /// Product code.
        code: String,
        /// New tier: low, medium or high.
        priority: Priority,
    },
}

/// `restock sales ...`
#[derive(Subcommand, Debug)]
pub enum SalesAction {
    /// Ingest a month folder (`YYYY-MM`) of daily sales files.
    Ingest {
        /// Folder holding one CSV per day.
        folder: PathBuf,
    },

    /// Show the rows loaded for one day.
    List {
        /// Load date (YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,
        /// Substring of the code, name or quantity.
        #[arg(long)]
        search: Option<String>,
    },

    /// Per-day totals of one product over a date range.
    Daily {
        /// Product code.
        code: String,
        /// First day (YYYY-MM-DD).
        #[arg(long)]
        from: NaiveDate,
        /// Last day, inclusive (YYYY-MM-DD).
        #[arg(long)]
        to: NaiveDate,
    },

    /// Months in which a product has sales.
    Months {
        /// Product code.
        code: String,
    },

    /// Compare daily totals of a product across months.
    Compare {
        /// Product code.
        code: String,
        /// Months to compare (YYYY-MM), at least two.
        #[arg(required = true, num_args = 2..)]
        months: Vec<YearMonth>,
        /// Move every series onto this year so they overlay.
        #[arg(long)]
        reference_year: Option<i32>,
    },
}

/// `restock recommend ...`
#[derive(Args, Debug, Clone)]
pub struct RecommendArgs {
    /// Inventory snapshot CSV with code, name and quantity columns.
    #[arg(long)]
    pub inventory: PathBuf,

    /// Order template directory (one CSV per sheet) to fill in.
    #[arg(long, requires = "output")]
    pub template: Option<PathBuf>,

    /// Directory receiving the filled order document.
    #[arg(long, requires = "template")]
    pub output: Option<PathBuf>,

    /// Match template names exactly instead of by substring.
    #[arg(long)]
    pub exact_match: bool,
}

/// Shared state handed to every command handler.
pub struct AppContext {
    /// Database connection for all ledger and catalog operations
    pub database: DatabaseConnection,
    /// Loaded settings
    pub config: AppConfig,
}

impl AppContext {
    /// Creates a context from an open connection and loaded settings.
    #[must_use]
    pub const fn new(database: DatabaseConnection, config: AppConfig) -> Self {
        Self { database, config }
    }
}

/// Executes `command` and prints its output.
pub async fn run(ctx: &AppContext, command: Commands) -> Result<()> {
    let output = match command {
        Commands::Catalog { action } => commands::catalog::handle(ctx, action).await?,
        Commands::Sales { action } => commands::sales::handle(ctx, action).await?,
        Commands::Recommend(args) => {
            let today = chrono::Local::now().date_naive();
            commands::recommend::handle(ctx, &args, today).await?
        }
    };
    print!("{output}");
    Ok(())
}
