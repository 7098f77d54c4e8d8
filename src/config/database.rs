//! Database configuration module for Restock.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. The sales ledger additionally gets
//! indexes on product code and load date, the two columns every ledger query filters on.

use crate::entities::{Product, Sale, SaleColumn};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, Schema,
    sea_query::{Index, IndexCreateStatement},
};
use std::path::Path;
use tracing::debug;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/restock.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Creates the directory holding a file-backed `SQLite` database, if any.
fn ensure_sqlite_dir(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let file = rest.split('?').next().unwrap_or_default();
    if let Some(parent) = Path::new(file).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    ensure_sqlite_dir(database_url)?;
    debug!("Connecting to database at {database_url}");
    Database::connect(database_url).await.map_err(Into::into)
}

fn sales_indexes() -> [IndexCreateStatement; 2] {
    [
        Index::create()
            .if_not_exists()
            .name("idx_sales_code")
            .table(Sale)
            .col(SaleColumn::Code)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_sales_load_date")
            .table(Sale)
            .col(SaleColumn::LoadDate)
            .to_owned(),
    ]
}

/// Creates the catalog and ledger tables (and ledger indexes) if they do not exist yet.
///
/// Safe to call on every start-up.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut product_table = schema.create_table_from_entity(Product);
    product_table.if_not_exists();
    let mut sale_table = schema.create_table_from_entity(Sale);
    sale_table.if_not_exists();

    db.execute(builder.build(&product_table)).await?;
    db.execute(builder.build(&sale_table)).await?;

    for index in sales_indexes() {
        db.execute(builder.build(&index)).await?;
    }

    Ok(())
}
