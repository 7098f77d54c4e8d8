//! Report generation for recommendation runs and sales series.
//!
//! These helpers return plain strings; the CLI decides where they are printed.

use crate::{
    core::{
        ledger::{DailyTotal, MonthSeries},
        policy::Recommendation,
        recommend::RecommendationRun,
    },
    entities::{ProductModel, SaleModel},
};
use std::fmt::Write;

const HEADERS: [&str; 6] = [
    "Product",
    "On hand",
    "Avg daily demand",
    "Reorder point",
    "EOQ",
    "Boxes",
];

fn row_cells(rec: &Recommendation) -> [String; 6] {
    [
        rec.product_name.clone(),
        rec.on_hand.to_string(),
        format!("{:.2}", rec.avg_daily_demand),
        format!("{:.2}", rec.reorder_point),
        format!("{:.2}", rec.eoq),
        rec.boxes_to_order.to_string(),
    ]
}

/// Renders recommendations as an aligned text table.
///
/// The product column is left-aligned, numeric columns are right-aligned.
#[must_use]
pub fn format_recommendation_table(recommendations: &[Recommendation]) -> String {
    let rows: Vec<[String; 6]> = recommendations.iter().map(row_cells).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: [&str; 6]| {
        let mut line = String::new();
        for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            let pad = " ".repeat(width.saturating_sub(cell.chars().count()));
            if i == 0 {
                line.push_str(cell);
                line.push_str(&pad);
            } else {
                line.push_str(&pad);
                line.push_str(cell);
            }
        }
        line.trim_end().to_string()
    };

    let mut table = render(HEADERS);
    table.push('\n');
    table.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    table.push('\n');
    for row in &rows {
        table.push_str(&render(row.each_ref().map(String::as_str)));
        table.push('\n');
    }
    table
}

/// One-line summary of a run.
#[must_use]
pub fn format_run_summary(run: &RecommendationRun) -> String {
    let boxes: u64 = run
        .recommendations
        .iter()
        .map(|rec| u64::from(rec.boxes_to_order))
        .sum();
    format!(
        "{} products evaluated, {} to order ({} boxes), {} skipped",
        run.recommendations.len(),
        run.to_order().len(),
        boxes,
        run.skipped.len()
    )
}

/// Renders daily totals as `date  quantity` lines.
#[must_use]
pub fn format_daily_totals(points: &[DailyTotal]) -> String {
    let mut out = String::new();
    for point in points {
        // write! into a String cannot fail
        let _ = writeln!(out, "{}  {:>6}", point.date, point.quantity);
    }
    out
}

/// Renders a month comparison, one block per month.
#[must_use]
pub fn format_month_comparison(series: &[MonthSeries]) -> String {
    let mut out = String::new();
    for month in series {
        let total: i64 = month.points.iter().map(|p| p.quantity).sum();
        let _ = writeln!(
            out,
            "{} ({} days, {} units)",
            month.month,
            month.points.len(),
            total
        );
        out.push_str(&format_daily_totals(&month.points));
    }
    out
}

/// Renders catalog entries as `code  box  priority  name` lines.
#[must_use]
pub fn format_products(products: &[ProductModel]) -> String {
    if products.is_empty() {
        return "No products found.\n".to_string();
    }
    let code_width = products
        .iter()
        .map(|p| p.code.chars().count())
        .max()
        .unwrap_or_default();
    let mut out = String::new();
    for product in products {
        let _ = writeln!(
            out,
            "{:<code_width$}  {:>4}/box  {:<6}  {}",
            product.code, product.units_per_box, product.priority, product.name
        );
    }
    out
}

/// Renders ledger rows as `code  quantity  name` lines.
#[must_use]
pub fn format_sales_rows(rows: &[SaleModel]) -> String {
    if rows.is_empty() {
        return "No sales found.\n".to_string();
    }
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(out, "{:<10}  {:>6}  {}", row.code, row.quantity, row.name);
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{ledger::YearMonth, recommend::SkipReason},
        entities::Priority,
    };
    use chrono::NaiveDate;

    fn rec(name: &str, on_hand: u32, boxes: u32) -> Recommendation {
        Recommendation {
            code: "FB007".to_string(),
            product_name: name.to_string(),
            on_hand,
            avg_daily_demand: 10.0,
            reorder_point: 50.0,
            eoq: 56.34,
            boxes_to_order: boxes,
        }
    }

    #[test]
    fn test_format_recommendation_table() {
        let table = format_recommendation_table(&[rec("DXN Morinzhi", 40, 5)]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Product"));
        assert!(lines[0].ends_with("Boxes"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].starts_with("DXN Morinzhi"));
        assert!(lines[2].contains("10.00"));
        assert!(lines[2].contains("50.00"));
        assert!(lines[2].contains("56.34"));
        assert!(lines[2].ends_with('5'));
        // Header and rows line up on the right edge
        assert_eq!(lines[0].len(), lines[2].len());
    }

    #[test]
    fn test_format_recommendation_table_empty() {
        let table = format_recommendation_table(&[]);
        assert_eq!(table.lines().count(), 2);
    }

    #[test]
    fn test_format_run_summary() {
        let run = RecommendationRun {
            recommendations: vec![rec("A", 0, 5), rec("B", 100, 0)],
            skipped: vec![("C".to_string(), SkipReason::NoSalesHistory)],
        };
        assert_eq!(
            format_run_summary(&run),
            "2 products evaluated, 1 to order (5 boxes), 1 skipped"
        );
    }

    #[test]
    fn test_format_products() {
        let now = chrono::Utc::now().naive_utc();
        let product = |code: &str, units: i32, priority: Priority| ProductModel {
            id: 1,
            code: code.to_string(),
            name: "DXN Morinzhi".to_string(),
            units_per_box: units,
            priority,
            created_at: now,
            updated_at: now,
        };

        let text = format_products(&[
            product("FB007", 36, Priority::High),
            product("FB3", 6, Priority::Low),
        ]);
        assert_eq!(
            text,
            "FB007    36/box  high    DXN Morinzhi\nFB3       6/box  low     DXN Morinzhi\n"
        );
        assert_eq!(format_products(&[]), "No products found.\n");
    }

    #[test]
    fn test_format_month_comparison() {
        let series = vec![MonthSeries {
            month: YearMonth::new(2024, 2).unwrap(),
            points: vec![
                DailyTotal {
                    date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                    quantity: 3,
                },
                DailyTotal {
                    date: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                    quantity: 4,
                },
            ],
        }];

        let text = format_month_comparison(&series);
        assert_eq!(
            text,
            "2024-02 (2 days, 7 units)\n2024-02-01       3\n2024-02-02       4\n"
        );
    }
}
