//! Order reconciliation - writes recommended box counts into an order template.
//!
//! The template is a loosely structured spreadsheet maintained by the supplier.
//! Product names in it rarely equal catalog names exactly ("DXN Morinzhi 36's"),
//! so rows are paired with recommendations through a [`NameMatcher`]. The
//! reconciler only walks rows and writes cells; loading and saving the document
//! belongs to [`crate::ingest::template`].

use crate::{
    core::policy::Recommendation,
    errors::{Error, Result},
};
use tracing::{debug, info, warn};

/// One named sheet: rows of text cells, ragged rows allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    /// Sheet name
    pub name: String,
    /// Cell text, row-major, 0-based
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Creates a sheet from its rows.
    #[must_use]
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Cell text at 0-based `(row, column)`, if the cell exists.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }
}

/// An order template document: an ordered collection of sheets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderTemplate {
    sheets: Vec<Sheet>,
}

impl OrderTemplate {
    /// Creates a template from its sheets.
    #[must_use]
    pub const fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// All sheets in document order
    #[must_use]
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Sheet with exactly this name
    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|sheet| sheet.name == name)
    }
}

/// Where the order lines live in a template, in 1-based spreadsheet coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLayout {
    sheet: String,
    name_column: usize,
    quantity_column: usize,
    start_row: usize,
}

impl TemplateLayout {
    /// Builds a layout. Columns and row are 1-based, as shown in a spreadsheet (B = 2).
    ///
    /// # Errors
    /// Returns a validation error when the sheet name is empty, any coordinate
    /// is zero, or both columns are the same.
    pub fn new(
        sheet: impl Into<String>,
        name_column: usize,
        quantity_column: usize,
        start_row: usize,
    ) -> Result<Self> {
        let sheet = sheet.into();
        if sheet.trim().is_empty() {
            return Err(Error::Validation {
                message: "sheet name cannot be empty".to_string(),
            });
        }
        if name_column == 0 || quantity_column == 0 || start_row == 0 {
            return Err(Error::Validation {
                message: "columns and rows are numbered from 1".to_string(),
            });
        }
        if name_column == quantity_column {
            return Err(Error::Validation {
                message: "name and quantity columns must differ".to_string(),
            });
        }
        Ok(Self {
            sheet,
            name_column,
            quantity_column,
            start_row,
        })
    }

    /// Sheet holding the order lines
    #[must_use]
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// 1-based product name column
    #[must_use]
    pub const fn name_column(&self) -> usize {
        self.name_column
    }

    /// 1-based quantity column
    #[must_use]
    pub const fn quantity_column(&self) -> usize {
        self.quantity_column
    }

    /// 1-based first product row
    #[must_use]
    pub const fn start_row(&self) -> usize {
        self.start_row
    }
}

/// Decides whether a recommendation's product name refers to a template cell.
pub trait NameMatcher {
    /// `true` when `candidate` (a recommended product name) matches `cell`.
    fn matches(&self, candidate: &str, cell: &str) -> bool;
}

/// Trims and lowercases text before comparison.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Matches when the normalized candidate occurs anywhere in the normalized cell.
///
/// An empty candidate never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl NameMatcher for SubstringMatcher {
    fn matches(&self, candidate: &str, cell: &str) -> bool {
        let candidate = normalize(candidate);
        !candidate.is_empty() && normalize(cell).contains(&candidate)
    }
}

/// Matches only when both normalized texts are equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl NameMatcher for ExactMatcher {
    fn matches(&self, candidate: &str, cell: &str) -> bool {
        let candidate = normalize(candidate);
        !candidate.is_empty() && normalize(cell) == candidate
    }
}

/// Outcome of a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// At least one row received a quantity
    Filled {
        /// Template with quantities written
        template: OrderTemplate,
        /// Number of rows filled
        matched: usize,
    },
    /// No row matched any recommendation; the template is unchanged
    NoMatches {
        /// The untouched template
        template: OrderTemplate,
    },
}

impl ReconcileOutcome {
    /// Number of rows filled (zero for [`ReconcileOutcome::NoMatches`]).
    #[must_use]
    pub const fn matched(&self) -> usize {
        match self {
            Self::Filled { matched, .. } => *matched,
            Self::NoMatches { .. } => 0,
        }
    }
}

/// Fills the template's quantity column from the recommendations.
///
/// Only recommendations with at least one box take part. Rows are walked from the
/// layout's start row; every row with a non-blank name cell takes the box count
/// of the first recommendation (in list order) that the matcher accepts. Each row
/// is filled at most once, but one recommendation may fill several rows.
///
/// # Errors
/// Returns [`Error::TemplateSheetMissing`] when the layout's sheet is absent.
pub fn reconcile<M>(
    recommendations: &[Recommendation],
    mut template: OrderTemplate,
    layout: &TemplateLayout,
    matcher: &M,
) -> Result<ReconcileOutcome>
where
    M: NameMatcher + ?Sized,
{
    let orders: Vec<&Recommendation> = recommendations
        .iter()
        .filter(|rec| rec.boxes_to_order > 0)
        .collect();

    let name_idx = layout.name_column - 1;
    let quantity_idx = layout.quantity_column - 1;

    let sheet = template
        .sheet_mut(layout.sheet())
        .ok_or_else(|| Error::TemplateSheetMissing {
            sheet: layout.sheet().to_string(),
        })?;

    let mut matched = 0;
    for (idx, row) in sheet.rows.iter_mut().enumerate().skip(layout.start_row - 1) {
        let Some(cell) = row.get(name_idx).filter(|cell| !cell.trim().is_empty()) else {
            continue;
        };
        let Some(rec) = orders
            .iter()
            .find(|rec| matcher.matches(&rec.product_name, cell))
        else {
            continue;
        };

        debug!(
            "Row {} '{}' <- {} ({} boxes)",
            idx + 1,
            cell.trim(),
            rec.product_name,
            rec.boxes_to_order
        );
        if row.len() <= quantity_idx {
            row.resize(quantity_idx + 1, String::new());
        }
        row[quantity_idx] = rec.boxes_to_order.to_string();
        matched += 1;
    }

    if matched == 0 {
        warn!(
            "No template rows in sheet '{}' matched {} recommended products",
            layout.sheet(),
            orders.len()
        );
        return Ok(ReconcileOutcome::NoMatches { template });
    }

    info!("Filled {matched} rows of sheet '{}'", layout.sheet());
    Ok(ReconcileOutcome::Filled { template, matched })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn rec(name: &str, boxes: u32) -> Recommendation {
        Recommendation {
            code: String::new(),
            product_name: name.to_string(),
            on_hand: 0,
            avg_daily_demand: 0.0,
            reorder_point: 0.0,
            eoq: 0.0,
            boxes_to_order: boxes,
        }
    }

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    /// Sheet laid out like the default template: names in column B, quantities in H,
    /// products from row 4.
    fn template(names: &[&str]) -> OrderTemplate {
        let mut rows = vec![
            cells(&["ORDER FORM"]),
            cells(&[]),
            cells(&["#", "Product", "", "", "", "", "", "Boxes"]),
        ];
        for (i, name) in names.iter().enumerate() {
            rows.push(cells(&[&(i + 1).to_string(), name]));
        }
        OrderTemplate::new(vec![
            Sheet::new("Summary", vec![cells(&["Product"])]),
            Sheet::new("Arequipa", rows),
        ])
    }

    fn layout() -> TemplateLayout {
        TemplateLayout::new("Arequipa", 2, 8, 4).unwrap()
    }

    fn filled(outcome: ReconcileOutcome) -> (OrderTemplate, usize) {
        match outcome {
            ReconcileOutcome::Filled { template, matched } => (template, matched),
            ReconcileOutcome::NoMatches { .. } => panic!("expected rows to be filled"),
        }
    }

    #[test]
    fn test_substring_match_fills_first_row_only() {
        let outcome = reconcile(
            &[rec("DXN Morinzhi", 15)],
            template(&["DXN Morinzhi 36's", "DXN Oozhi Tea"]),
            &layout(),
            &SubstringMatcher,
        )
        .unwrap();

        let (template, matched) = filled(outcome);
        assert_eq!(matched, 1);
        let sheet = template.sheet("Arequipa").unwrap();
        assert_eq!(sheet.cell(3, 7), Some("15"));
        assert_eq!(sheet.cell(4, 7), None);
    }

    #[test]
    fn test_matching_ignores_case_and_surrounding_spaces() {
        let outcome = reconcile(
            &[rec("  dxn oozhi TEA ", 3)],
            template(&["   DXN OOZHI TEA (30's)"]),
            &layout(),
            &SubstringMatcher,
        )
        .unwrap();
        assert_eq!(outcome.matched(), 1);
    }

    #[test]
    fn test_first_recommendation_in_list_order_wins() {
        let outcome = reconcile(
            &[rec("DXN Oozhi Tea", 2), rec("DXN Oozhi", 9)],
            template(&["DXN Oozhi Tea 30g"]),
            &layout(),
            &SubstringMatcher,
        )
        .unwrap();

        let (template, _) = filled(outcome);
        assert_eq!(template.sheet("Arequipa").unwrap().cell(3, 7), Some("2"));
    }

    #[test]
    fn test_one_recommendation_may_fill_several_rows() {
        let outcome = reconcile(
            &[rec("Oozhi Tea", 4)],
            template(&["DXN Oozhi Tea", "DXN Oozhi Tea 30g", "DXN Spica Tea"]),
            &layout(),
            &SubstringMatcher,
        )
        .unwrap();

        let (template, matched) = filled(outcome);
        assert_eq!(matched, 2);
        let sheet = template.sheet("Arequipa").unwrap();
        assert_eq!(sheet.cell(3, 7), Some("4"));
        assert_eq!(sheet.cell(4, 7), Some("4"));
        assert_eq!(sheet.cell(5, 7), None);
    }

    #[test]
    fn test_zero_box_recommendations_do_not_participate() {
        let outcome = reconcile(
            &[rec("DXN Morinzhi", 0)],
            template(&["DXN Morinzhi 36's"]),
            &layout(),
            &SubstringMatcher,
        )
        .unwrap();

        assert!(matches!(outcome, ReconcileOutcome::NoMatches { .. }));
        assert_eq!(outcome.matched(), 0);
    }

    #[test]
    fn test_no_matches_returns_template_unchanged() {
        let original = template(&["DXN Spica Tea"]);
        let outcome = reconcile(
            &[rec("RG Powder", 3)],
            original.clone(),
            &layout(),
            &SubstringMatcher,
        )
        .unwrap();

        assert_eq!(outcome, ReconcileOutcome::NoMatches { template: original });
    }

    #[test]
    fn test_rows_above_start_row_and_blank_names_are_ignored() {
        // "Product" header sits on row 3, above the start row
        let outcome = reconcile(
            &[rec("Product", 1), rec("DXN Lemonzhi", 6)],
            template(&["", "   ", "DXN Lemonzhi"]),
            &layout(),
            &SubstringMatcher,
        )
        .unwrap();

        let (doc, matched) = filled(outcome);
        assert_eq!(matched, 1);
        let sheet = doc.sheet("Arequipa").unwrap();
        assert_eq!(sheet.cell(2, 7), Some("Boxes"));
        assert_eq!(sheet.cell(5, 7), Some("6"));
    }

    #[test]
    fn test_missing_sheet_is_an_error() {
        let result = reconcile(
            &[rec("DXN Morinzhi", 1)],
            template(&["DXN Morinzhi"]),
            &TemplateLayout::new("Lima", 2, 8, 4).unwrap(),
            &SubstringMatcher,
        );
        assert!(matches!(
            result,
            Err(Error::TemplateSheetMissing { sheet }) if sheet == "Lima"
        ));
    }

    #[test]
    fn test_exact_matcher_requires_whole_name() {
        let outcome = reconcile(
            &[rec("DXN Morinzhi", 15)],
            template(&["DXN Morinzhi 36's", " dxn morinzhi "]),
            &layout(),
            &ExactMatcher,
        )
        .unwrap();

        let (template, matched) = filled(outcome);
        assert_eq!(matched, 1);
        let sheet = template.sheet("Arequipa").unwrap();
        assert_eq!(sheet.cell(3, 7), None);
        assert_eq!(sheet.cell(4, 7), Some("15"));
    }

    #[test]
    fn test_empty_candidate_never_matches() {
        assert!(!SubstringMatcher.matches("   ", "DXN Morinzhi"));
        assert!(!ExactMatcher.matches("", ""));
    }

    #[test]
    fn test_layout_validation() {
        assert!(TemplateLayout::new("", 2, 8, 4).is_err());
        assert!(TemplateLayout::new("Arequipa", 0, 8, 4).is_err());
        assert!(TemplateLayout::new("Arequipa", 2, 2, 4).is_err());
        assert!(TemplateLayout::new("Arequipa", 2, 8, 0).is_err());
    }
}
