//! Spreadsheet collaborators - reading sales files and inventory snapshots, loading
//! and saving order templates.
//!
//! Spreadsheets are exchanged as CSV. The rest of the crate only sees parsed
//! records; nothing outside this module touches the file formats.

/// Order template load/save (one CSV file per sheet)
pub mod template;
/// Current inventory snapshot reader
pub mod inventory;
/// Month-folder sales ingestion
pub mod sales;

use csv::StringRecord;

/// Positions of `required` columns in `headers`, compared trimmed and case-insensitively.
///
/// On failure returns the names of the missing columns.
pub(crate) fn locate_columns<const N: usize>(
    headers: &StringRecord,
    required: [&'static str; N],
) -> std::result::Result<[usize; N], Vec<&'static str>> {
    let position = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(name))
    };

    let found = required.map(position);
    let missing: Vec<&'static str> = required
        .iter()
        .zip(found)
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(missing);
    }
    Ok(found.map(|idx| idx.unwrap_or_default()))
}

/// Trimmed field text, empty when the record is shorter than `idx`.
pub(crate) fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).map_or("", str::trim)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_locate_columns_ignores_case_order_and_padding() {
        let headers = StringRecord::from(vec![" Quantity", "extra", "NAME ", "Code"]);
        let found = locate_columns(&headers, ["code", "name", "quantity"]).unwrap();
        assert_eq!(found, [3, 2, 0]);
    }

    #[test]
    fn test_locate_columns_reports_every_missing_column() {
        let headers = StringRecord::from(vec!["code", "descripcion"]);
        let missing = locate_columns(&headers, ["code", "name", "quantity"]).unwrap_err();
        assert_eq!(missing, vec!["name", "quantity"]);
    }
}
