//! Demand estimation over an in-memory sales history.
//!
//! Demand is the arithmetic mean over *observed* sale days: days on which no
//! sales file was loaded do not count as zero-demand days.

use crate::core::ledger::SalesRecord;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Per-product, per-date summed sales, detached from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesHistory {
    daily: HashMap<String, BTreeMap<NaiveDate, i64>>,
}

impl SalesHistory {
    /// Empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one observation, summing it into any existing total for the same day.
    pub fn record(&mut self, code: &str, load_date: NaiveDate, quantity: i64) {
        *self
            .daily
            .entry(code.to_string())
            .or_default()
            .entry(load_date)
            .or_insert(0) += quantity;
    }

    /// Summed quantity per load date for `code`, if it has any sales.
    #[must_use]
    pub fn daily_totals(&self, code: &str) -> Option<&BTreeMap<NaiveDate, i64>> {
        self.daily.get(code)
    }

    /// Whether no product has any sales
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }

    /// Mean daily demand of `code`, or `None` when it has no sale dates.
    #[must_use]
    pub fn estimate(&self, code: &str) -> Option<f64> {
        self.daily_totals(code).and_then(average_daily_demand)
    }
}

impl FromIterator<SalesRecord> for SalesHistory {
    fn from_iter<I: IntoIterator<Item = SalesRecord>>(iter: I) -> Self {
        let mut history = Self::new();
        for record in iter {
            history.record(&record.code, record.load_date, record.quantity);
        }
        history
    }
}

/// Sum of the per-date totals divided by the number of distinct dates.
///
/// Returns `None` for an empty series so callers cannot divide by zero.
#[must_use]
pub fn average_daily_demand(daily: &BTreeMap<NaiveDate, i64>) -> Option<f64> {
    if daily.is_empty() {
        return None;
    }
    let total: i64 = daily.values().sum();

    // Cast safety: unit totals and day counts stay far below 2^52
    #[allow(clippy::cast_precision_loss)]
    let average = total as f64 / daily.len() as f64;
    Some(average)
}
