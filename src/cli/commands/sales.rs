//! Sales commands - month ingestion and ledger browsing.

use crate::{
    cli::{AppContext, SalesAction},
    core::{ledger, report},
    errors::Result,
    ingest,
};
use std::fmt::Write;

/// Runs a `sales` subcommand.
pub async fn handle(ctx: &AppContext, action: SalesAction) -> Result<String> {
    let db = &ctx.database;
    match action {
        SalesAction::Ingest { folder } => {
            let summary = ingest::sales::ingest_month_folder(db, &folder).await?;
            Ok(format!(
                "{}: {} records from {} files\n",
                summary.month, summary.records_written, summary.files_processed
            ))
        }
        SalesAction::List { date, search } => {
            let rows = ledger::search_sales(db, date, search.as_deref().unwrap_or_default()).await?;
            Ok(report::format_sales_rows(&rows))
        }
        SalesAction::Daily { code, from, to } => {
            let points = ledger::get_daily_totals(db, &code, from, to).await?;
            if points.is_empty() {
                return Ok(format!("No sales of {code} between {from} and {to}\n"));
            }
            Ok(report::format_daily_totals(&points))
        }
        SalesAction::Months { code } => {
            let months = ledger::get_sales_months(db, &code).await?;
            if months.is_empty() {
                return Ok(format!("No sales recorded for {code}\n"));
            }
            let mut out = String::new();
            for month in months {
                let _ = writeln!(out, "{month}");
            }
            Ok(out)
        }
        SalesAction::Compare {
            code,
            months,
            reference_year,
        } => {
            let series = ledger::compare_months(db, &code, &months, reference_year).await?;
            if series.is_empty() {
                return Ok(format!("No sales of {code} in the selected months\n"));
            }
            Ok(report::format_month_comparison(&series))
        }
    }
}
