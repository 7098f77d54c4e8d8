//! Product catalog business logic - Handles all product-related operations.
//!
//! This module provides functions for adding, retrieving, searching and reprioritizing
//! products in the catalog. Box size and priority are validated here, at the catalog
//! boundary, so the recommendation engine can rely on typed values.
//!
//! Recommendation runs never query the store product by product: they take a
//! [`CatalogSnapshot`] up front and look entries up through [`CatalogLookup`].
//! Priority updates are not serialized against runs in progress; callers that need
//! that must order the two themselves.

use crate::{
    entities::{Priority, Product, product},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use std::{collections::HashMap, num::NonZeroU32};
use tracing::{debug, info};

/// The attributes of a product that the reorder policy needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Product code
    pub code: String,
    /// Catalog name
    pub name: String,
    /// Sale units per purchasing box
    pub units_per_box: NonZeroU32,
    /// Priority tier
    pub priority: Priority,
}

impl TryFrom<product::Model> for CatalogEntry {
    type Error = Error;

    fn try_from(model: product::Model) -> Result<Self> {
        let units_per_box = u32::try_from(model.units_per_box)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(Error::InvalidBoxSize {
                units_per_box: i64::from(model.units_per_box),
            })?;
        Ok(Self {
            code: model.code,
            name: model.name,
            units_per_box,
            priority: model.priority,
        })
    }
}

/// Read access to catalog entries by product code.
pub trait CatalogLookup {
    /// The entry for `code`, or `None` when the product is not in the catalog.
    fn lookup(&self, code: &str) -> Option<&CatalogEntry>;
}

/// In-memory copy of (part of) the catalog, keyed by product code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    entries: HashMap<String, CatalogEntry>,
}

impl CatalogSnapshot {
    /// Number of products in the snapshot
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no products
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CatalogEntry> for CatalogSnapshot {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|entry| (entry.code.clone(), entry))
                .collect(),
        }
    }
}

impl CatalogLookup for CatalogSnapshot {
    fn lookup(&self, code: &str) -> Option<&CatalogEntry> {
        self.entries.get(code)
    }
}

impl CatalogLookup for HashMap<String, CatalogEntry> {
    fn lookup(&self, code: &str) -> Option<&CatalogEntry> {
        self.get(code)
    }
}

/// Retrieves every product, ordered by code.
pub async fn get_all_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Code)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a product by its code, returning None if it is not in the catalog.
pub async fn get_product_by_code(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Code.eq(code.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Products whose code or name contains `term`, ordered by code.
///
/// An empty term lists the whole catalog.
pub async fn search_products(db: &DatabaseConnection, term: &str) -> Result<Vec<product::Model>> {
    let term = term.trim();
    if term.is_empty() {
        return get_all_products(db).await;
    }

    Product::find()
        .filter(
            Condition::any()
                .add(product::Column::Code.contains(term))
                .add(product::Column::Name.contains(term)),
        )
        .order_by_asc(product::Column::Code)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds a product to the catalog.
///
/// # Errors
/// Returns an error if:
/// - The code or name is empty or whitespace-only
/// - `units_per_box` is not a positive number that fits the column
/// - A product with the same code already exists
/// - The database insert operation fails
pub async fn create_product(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
    units_per_box: i64,
    priority: Priority,
) -> Result<product::Model> {
    let code = code.trim();
    let name = name.trim();
    if code.is_empty() {
        return Err(Error::Validation {
            message: "Product code cannot be empty".to_string(),
        });
    }
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Product name cannot be empty".to_string(),
        });
    }
    let units = i32::try_from(units_per_box)
        .ok()
        .filter(|units| *units > 0)
        .ok_or(Error::InvalidBoxSize { units_per_box })?;

    if get_product_by_code(db, code).await?.is_some() {
        return Err(Error::DuplicateProduct {
            code: code.to_string(),
        });
    }

    let now = chrono::Utc::now().naive_utc();
    let product = product::ActiveModel {
        code: Set(code.to_string()),
        name: Set(name.to_string()),
        units_per_box: Set(units),
        priority: Set(priority),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = product.insert(db).await?;
    info!("Added product {} ({}) to the catalog", created.code, created.name);
    Ok(created)
}

/// Reassigns the priority tier of a product.
///
/// # Errors
/// Returns an error if the product does not exist or the update fails.
pub async fn set_priority(
    db: &DatabaseConnection,
    code: &str,
    priority: Priority,
) -> Result<product::Model> {
    let mut product: product::ActiveModel = get_product_by_code(db, code)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            code: code.to_string(),
        })?
        .into();

    product.priority = Set(priority);
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    let updated = product.update(db).await?;
    info!("Priority of {} set to {}", updated.code, updated.priority);
    Ok(updated)
}

/// Loads the catalog entries for `codes` into memory.
///
/// Codes without a catalog row are absent from the snapshot. Rows whose stored box
/// size is not positive are left out as well, so they are skipped like missing ones.
pub async fn load_catalog(db: &DatabaseConnection, codes: &[String]) -> Result<CatalogSnapshot> {
    if codes.is_empty() {
        return Ok(CatalogSnapshot::default());
    }

    let rows = Product::find()
        .filter(product::Column::Code.is_in(codes.iter().cloned()))
        .all(db)
        .await?;

    let snapshot: CatalogSnapshot = rows
        .into_iter()
        .filter_map(|row| {
            let code = row.code.clone();
            CatalogEntry::try_from(row)
                .inspect_err(|e| debug!("Ignoring catalog row {code}: {e}"))
                .ok()
        })
        .collect();
    debug!(
        "Loaded {} of {} requested catalog entries",
        snapshot.len(),
        codes.len()
    );
    Ok(snapshot)
}
