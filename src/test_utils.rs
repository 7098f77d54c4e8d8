//! Shared test utilities for `restock`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating catalog and ledger rows with sensible defaults.

use crate::{
    core::{
        catalog,
        ledger::{self, SalesRecord},
    },
    entities::{Priority, product},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all database tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a catalog product with low priority.
///
/// # Arguments
/// * `db` - Database connection
/// * `code` - Product code
/// * `name` - Product name
/// * `units_per_box` - Sale units per purchasing box
pub async fn create_test_product(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
    units_per_box: i64,
) -> Result<product::Model> {
    catalog::create_product(db, code, name, units_per_box, Priority::Low).await
}

/// Appends one ledger row named "Test product".
pub async fn record_test_sale(
    db: &DatabaseConnection,
    code: &str,
    quantity: i64,
    load_date: NaiveDate,
) -> Result<()> {
    let record = SalesRecord::new(code, "Test product", quantity, load_date)?;
    ledger::record_sales(db, &[record]).await?;
    Ok(())
}
