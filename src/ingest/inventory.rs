//! Current inventory snapshot reader.

use crate::{
    core::recommend::InventoryRow,
    errors::{Error, Result},
    ingest::{field, locate_columns},
};
use std::path::Path;
use tracing::info;

const REQUIRED_COLUMNS: [&str; 3] = ["code", "name", "quantity"];

/// Reads an inventory snapshot with `code`, `name` and `quantity` columns.
///
/// Column order and header case do not matter; extra columns are ignored and
/// fully blank rows are dropped.
///
/// # Errors
/// Returns [`Error::MalformedSnapshot`] when a required column is absent, or a
/// row has an empty code, an empty name or a quantity that is not a non-negative integer.
pub fn read_snapshot(path: &Path) -> Result<Vec<InventoryRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let [code_idx, name_idx, quantity_idx] =
        locate_columns(&headers, REQUIRED_COLUMNS).map_err(|missing| Error::MalformedSnapshot {
            details: format!("missing column(s): {}", missing.join(", ")),
        })?;

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row = line + 2;

        let code = field(&record, code_idx);
        if code.is_empty() {
            return Err(Error::MalformedSnapshot {
                details: format!("row {row} has no product code"),
            });
        }
        let name = field(&record, name_idx);
        if name.is_empty() {
            return Err(Error::MalformedSnapshot {
                details: format!("row {row} ({code}) has no product name"),
            });
        }
        let raw_quantity = field(&record, quantity_idx);
        let on_hand = raw_quantity
            .parse::<u32>()
            .map_err(|_| Error::MalformedSnapshot {
                details: format!("row {row} ({code}) has invalid quantity '{raw_quantity}'"),
            })?;

        rows.push(InventoryRow {
            code: code.to_string(),
            name: name.to_string(),
            on_hand,
        });
    }

    info!("Read {} inventory rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::fs;

    fn snapshot(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventario.csv");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_read_snapshot() {
        let (_dir, path) = snapshot(
            "Warehouse,CODE,Name,Quantity\n\
             Arequipa,FB063,DXN Zhi Café Classic,40\n\
             ,,,\n\
             Arequipa, FB007 , DXN Morinzhi ,0\n",
        );

        let rows = read_snapshot(&path).unwrap();
        assert_eq!(
            rows,
            vec![
                InventoryRow {
                    code: "FB063".to_string(),
                    name: "DXN Zhi Café Classic".to_string(),
                    on_hand: 40,
                },
                InventoryRow {
                    code: "FB007".to_string(),
                    name: "DXN Morinzhi".to_string(),
                    on_hand: 0,
                },
            ]
        );
    }

    #[test]
    fn test_missing_columns_are_named() {
        let (_dir, path) = snapshot("code,stock\nFB063,40\n");

        let err = read_snapshot(&path).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedSnapshot { ref details } if details == "missing column(s): name, quantity"
        ));
    }

    #[test]
    fn test_invalid_quantity_names_the_row() {
        let (_dir, path) = snapshot("code,name,quantity\nFB063,Coffee,40\nFB007,Morinzhi,-3\n");

        let err = read_snapshot(&path).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedSnapshot { ref details } if details.starts_with("row 3 (FB007)")
        ));
    }

    #[test]
    fn test_missing_code_is_rejected() {
        let (_dir, path) = snapshot("code,name,quantity\n,Coffee,40\n");
        assert!(matches!(
            read_snapshot(&path),
            Err(Error::MalformedSnapshot { .. })
        ));
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let (_dir, path) = snapshot("code,name,quantity\nFB063,Coffee,40\nFB007,  ,3\n");

        let err = read_snapshot(&path).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedSnapshot { ref details } if details == "row 3 (FB007) has no product name"
        ));
    }
}
