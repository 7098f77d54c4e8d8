//! Sales ledger business logic - Append-only storage and queries over ingested sales.
//!
//! The ledger only ever inserts rows. Queries either return the raw rows for
//! browsing or fold them into per-date totals, summing every row that shares a
//! `(code, load_date)` pair.

use crate::{
    core::demand::SalesHistory,
    entities::{Sale, sale},
    errors::{Error, Result},
};
use chrono::{Datelike, NaiveDate};
use sea_orm::{
    Condition, QueryOrder, QuerySelect, Set,
    prelude::*,
    sea_query::{Alias, Expr, Func},
};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};
use tracing::{debug, info};

/// `SQLite` caps bound parameters per statement; four columns per row keeps us well below it.
const INSERT_CHUNK: usize = 200;

/// One unit-sales observation as produced by ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesRecord {
    /// Product code
    pub code: String,
    /// Product name as written in the sales file
    pub name: String,
    /// Units sold
    pub quantity: i64,
    /// Day the sales file belongs to
    pub load_date: NaiveDate,
}

impl SalesRecord {
    /// Builds a record, rejecting negative quantities.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        quantity: i64,
        load_date: NaiveDate,
    ) -> Result<Self> {
        if quantity < 0 {
            return Err(Error::InvalidQuantity { quantity });
        }
        Ok(Self {
            code: code.into(),
            name: name.into(),
            quantity,
            load_date,
        })
    }
}

impl From<sale::Model> for SalesRecord {
    fn from(model: sale::Model) -> Self {
        Self {
            code: model.code,
            name: model.name,
            quantity: model.quantity,
            load_date: model.load_date,
        }
    }
}

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Returns `None` when `month` is not in `1..=12`.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// Month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month number, 1 to 12
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Day `day` of this month, or `None` if the month has no such day.
    #[must_use]
    pub fn day(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        // `new` and `of` both guarantee a valid year/month pair
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month, accounting for leap years.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        let first = self.first_day();
        first
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(first)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Validation {
            message: format!("'{s}' is not a month in YYYY-MM format"),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

/// Units sold of one product on one day, all same-day rows summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTotal {
    /// Load date (or its re-based equivalent in a month comparison)
    pub date: NaiveDate,
    /// Summed units
    pub quantity: i64,
}

/// Daily totals of one product for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSeries {
    /// Month the sales were loaded in
    pub month: YearMonth,
    /// Per-day totals in date order
    pub points: Vec<DailyTotal>,
}

fn fold_daily(rows: impl IntoIterator<Item = sale::Model>) -> Vec<DailyTotal> {
    let mut totals: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for row in rows {
        *totals.entry(row.load_date).or_insert(0) += row.quantity;
    }
    totals
        .into_iter()
        .map(|(date, quantity)| DailyTotal { date, quantity })
        .collect()
}

/// Appends sales records to the ledger, returning how many rows were written.
///
/// Generic over the connection so ingestion can run it inside a database transaction.
pub async fn record_sales<C>(db: &C, records: &[SalesRecord]) -> Result<usize>
where
    C: ConnectionTrait,
{
    for chunk in records.chunks(INSERT_CHUNK) {
        let models = chunk.iter().map(|record| sale::ActiveModel {
            code: Set(record.code.clone()),
            name: Set(record.name.clone()),
            quantity: Set(record.quantity),
            load_date: Set(record.load_date),
            ..Default::default()
        });
        Sale::insert_many(models).exec(db).await?;
    }
    debug!("Recorded {} sales rows", records.len());
    Ok(records.len())
}

/// Retrieves every ledger row loaded for `date`, in insertion order.
pub async fn get_sales_for_date(
    db: &DatabaseConnection,
    date: NaiveDate,
) -> Result<Vec<sale::Model>> {
    Sale::find()
        .filter(sale::Column::LoadDate.eq(date))
        .order_by_asc(sale::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Searches the rows loaded for `date`.
///
/// The term matches as a substring of the code, the name or the quantity as
/// written (`2` finds a quantity of 12). An empty term returns the whole day.
pub async fn search_sales(
    db: &DatabaseConnection,
    date: NaiveDate,
    term: &str,
) -> Result<Vec<sale::Model>> {
    let term = term.trim();
    if term.is_empty() {
        return get_sales_for_date(db, date).await;
    }

    let quantity_text = Func::cast_as(Expr::col(sale::Column::Quantity), Alias::new("TEXT"));
    let matches = Condition::any()
        .add(sale::Column::Code.contains(term))
        .add(sale::Column::Name.contains(term))
        .add(Expr::expr(quantity_text).like(format!("%{term}%")));

    Sale::find()
        .filter(sale::Column::LoadDate.eq(date))
        .filter(matches)
        .order_by_asc(sale::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Loads the sales history of the given products into memory.
///
/// The returned snapshot is detached from the connection; products without
/// any ledger rows are simply absent from it.
pub async fn load_history(db: &DatabaseConnection, codes: &[String]) -> Result<SalesHistory> {
    if codes.is_empty() {
        return Ok(SalesHistory::default());
    }

    let rows = Sale::find()
        .filter(sale::Column::Code.is_in(codes.iter().cloned()))
        .all(db)
        .await?;
    debug!(
        "Loaded {} sales rows for {} products",
        rows.len(),
        codes.len()
    );

    Ok(rows.into_iter().map(SalesRecord::from).collect())
}

/// Per-date totals of one product between `from` and `to`, both inclusive.
pub async fn get_daily_totals(
    db: &DatabaseConnection,
    code: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DailyTotal>> {
    if from > to {
        return Err(Error::Validation {
            message: format!("Start date {from} is after end date {to}"),
        });
    }

    let rows = Sale::find()
        .filter(sale::Column::Code.eq(code))
        .filter(sale::Column::LoadDate.between(from, to))
        .all(db)
        .await?;

    Ok(fold_daily(rows))
}

/// Distinct months in which `code` has ledger rows, oldest first.
pub async fn get_sales_months(db: &DatabaseConnection, code: &str) -> Result<Vec<YearMonth>> {
    let dates: Vec<NaiveDate> = Sale::find()
        .select_only()
        .column(sale::Column::LoadDate)
        .filter(sale::Column::Code.eq(code))
        .into_tuple()
        .all(db)
        .await?;

    let months: BTreeSet<YearMonth> = dates.into_iter().map(YearMonth::of).collect();
    Ok(months.into_iter().collect())
}

/// Daily totals of `code` for each selected month, for side-by-side comparison.
///
/// With a `reference_year`, every point is moved onto that year (keeping month
/// and day) so series from different years overlay on one axis. Days missing in
/// the reference year (February 29) are dropped. Months without sales are left
/// out of the result.
///
/// # Errors
/// Returns a validation error when fewer than two distinct months are selected.
pub async fn compare_months(
    db: &DatabaseConnection,
    code: &str,
    months: &[YearMonth],
    reference_year: Option<i32>,
) -> Result<Vec<MonthSeries>> {
    let selected: BTreeSet<YearMonth> = months.iter().copied().collect();
    if selected.len() < 2 {
        return Err(Error::Validation {
            message: "Select at least two months to compare".to_string(),
        });
    }

    let mut series = Vec::with_capacity(selected.len());
    for month in selected {
        let mut points =
            get_daily_totals(db, code, month.first_day(), month.last_day()).await?;
        if points.is_empty() {
            continue;
        }
        if let Some(year) = reference_year {
            points = points
                .into_iter()
                .filter_map(|point| {
                    point.date.with_year(year).map(|date| DailyTotal {
                        date,
                        quantity: point.quantity,
                    })
                })
                .collect();
        }
        series.push(MonthSeries { month, points });
    }

    info!("Compared {} months of sales for {code}", series.len());
    Ok(series)
}
