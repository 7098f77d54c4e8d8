//! Recommendation runs - applies the reorder policy to every row of an inventory snapshot.
//!
//! A run distinguishes two kinds of trouble. Products that cannot be evaluated
//! (not in the catalog, or never sold) are recoverable skips: they are logged and
//! produce no recommendation. Structural problems with the inputs are fatal and
//! surface as [`Error`](crate::errors::Error) before any product is evaluated.

use crate::{
    core::{
        catalog::{self, CatalogLookup},
        demand::SalesHistory,
        ledger,
        policy::{Recommendation, ReorderPolicy, StockPosition},
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::fmt;
use tracing::{debug, info};

/// One row of the current inventory snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRow {
    /// Product code
    pub code: String,
    /// Product name as written in the snapshot
    pub name: String,
    /// Units in stock
    pub on_hand: u32,
}

/// Why a snapshot row produced no recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The product code has no catalog entry
    MissingCatalogEntry,
    /// The product has no sale dates in the ledger
    NoSalesHistory,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCatalogEntry => f.write_str("not in catalog"),
            Self::NoSalesHistory => f.write_str("no sales history"),
        }
    }
}

/// Result of evaluating one snapshot row.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductOutcome {
    /// The policy produced a recommendation
    Recommended(Recommendation),
    /// The row was skipped; the run continues
    Skipped {
        /// Product code of the skipped row
        code: String,
        /// Why it was skipped
        reason: SkipReason,
    },
}

/// Everything one run produced, in snapshot order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationRun {
    /// One recommendation per evaluated product, including zero-box ones
    pub recommendations: Vec<Recommendation>,
    /// Codes that were skipped, with the reason
    pub skipped: Vec<(String, SkipReason)>,
}

impl RecommendationRun {
    /// Recommendations that actually order at least one box.
    #[must_use]
    pub fn to_order(&self) -> Vec<Recommendation> {
        self.recommendations
            .iter()
            .filter(|rec| rec.boxes_to_order > 0)
            .cloned()
            .collect()
    }
}

/// Evaluates one snapshot row against the catalog and sales history.
#[must_use]
pub fn evaluate<L>(
    row: &InventoryRow,
    catalog: &L,
    history: &SalesHistory,
    policy: &ReorderPolicy,
) -> ProductOutcome
where
    L: CatalogLookup + ?Sized,
{
    let skip = |reason| ProductOutcome::Skipped {
        code: row.code.clone(),
        reason,
    };

    let Some(entry) = catalog.lookup(&row.code) else {
        return skip(SkipReason::MissingCatalogEntry);
    };
    let Some(avg_daily_demand) = history.estimate(&row.code) else {
        return skip(SkipReason::NoSalesHistory);
    };

    let position = StockPosition {
        code: &row.code,
        name: &row.name,
        on_hand: row.on_hand,
        units_per_box: entry.units_per_box,
        priority: entry.priority,
    };
    ProductOutcome::Recommended(policy.recommend(&position, avg_daily_demand))
}

/// Evaluates every snapshot row. Pure: no I/O, no shared state.
#[must_use]
pub fn run<L>(
    rows: &[InventoryRow],
    catalog: &L,
    history: &SalesHistory,
    policy: &ReorderPolicy,
) -> RecommendationRun
where
    L: CatalogLookup + ?Sized,
{
    let mut result = RecommendationRun::default();
    for row in rows {
        match evaluate(row, catalog, history, policy) {
            ProductOutcome::Recommended(rec) => result.recommendations.push(rec),
            ProductOutcome::Skipped { code, reason } => {
                debug!("Skipping {code}: {reason}");
                result.skipped.push((code, reason));
            }
        }
    }
    result
}

/// Loads catalog and sales snapshots for the snapshot's products, then runs the policy.
///
/// The connection is only used to take the two snapshots; the computation itself
/// runs on in-memory data.
pub async fn run_for_snapshot(
    db: &DatabaseConnection,
    rows: &[InventoryRow],
    policy: &ReorderPolicy,
) -> Result<RecommendationRun> {
    let mut codes: Vec<String> = rows.iter().map(|row| row.code.clone()).collect();
    codes.sort();
    codes.dedup();

    let catalog = catalog::load_catalog(db, &codes).await?;
    let history = ledger::load_history(db, &codes).await?;

    let result = run(rows, &catalog, &history, policy);
    info!(
        "Recommendation run: {} evaluated, {} to order, {} skipped",
        result.recommendations.len(),
        result.to_order().len(),
        result.skipped.len()
    );
    Ok(result)
}
