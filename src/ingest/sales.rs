//! Month-folder sales ingestion.
//!
//! Sales arrive as one folder per month named `YYYY-MM`, holding one CSV file per
//! day whose name ends in the day number (`ventas_15.csv`, `3.csv`). Each file
//! needs `code`, `name` and `quantity` columns; files without them are skipped.
//! All rows of a folder are written in a single database transaction, so a bad
//! row leaves the ledger untouched.

use crate::{
    core::ledger::{self, SalesRecord, YearMonth},
    errors::{Error, Result},
    ingest::{field, locate_columns},
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const REQUIRED_COLUMNS: [&str; 3] = ["code", "name", "quantity"];

/// Parsed content of a month folder, not yet written to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBatch {
    /// Month taken from the folder name
    pub month: YearMonth,
    /// Files that contributed records
    pub files_processed: usize,
    /// Files ignored (no day number, impossible date, or missing columns)
    pub files_skipped: usize,
    /// Records in file-name order
    pub records: Vec<SalesRecord>,
}

/// Result of ingesting one month folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Month ingested
    pub month: YearMonth,
    /// Files that contributed records
    pub files_processed: usize,
    /// Ledger rows written
    pub records_written: usize,
}

/// Day number at the end of a CSV file name: `ventas_15.csv` gives 15.
///
/// Only the last one or two digits before the extension are considered.
#[must_use]
pub fn day_from_file_name(file_name: &str) -> Option<u32> {
    let stem = file_name.strip_suffix(".csv")?;
    let digits: String = stem
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .take(2)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn month_of_folder(folder: &Path) -> Result<YearMonth> {
    let name = folder
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    name.parse().map_err(|_| Error::Ingest {
        file: folder.display().to_string(),
        message: "folder name must be a month in YYYY-MM format".to_string(),
    })
}

/// Reads the records of one daily sales file.
///
/// Returns `Ok(None)` when the file lacks one of the required columns.
///
/// # Errors
/// Fails on unreadable CSV, a row without a code, or a quantity that is not a
/// non-negative integer.
pub fn read_sales_file(path: &Path, load_date: NaiveDate) -> Result<Option<Vec<SalesRecord>>> {
    let file = path.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let [code_idx, name_idx, quantity_idx] = match locate_columns(&headers, REQUIRED_COLUMNS) {
        Ok(found) => found,
        Err(missing) => {
            warn!("Skipping {file}: missing column(s) {}", missing.join(", "));
            return Ok(None);
        }
    };

    let mut records = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        // Header is line 1
        let row = line + 2;

        let code = field(&record, code_idx);
        if code.is_empty() {
            return Err(Error::Ingest {
                file,
                message: format!("row {row} has no product code"),
            });
        }
        let raw_quantity = field(&record, quantity_idx);
        let quantity = raw_quantity
            .parse::<i64>()
            .ok()
            .filter(|quantity| *quantity >= 0)
            .ok_or_else(|| Error::Ingest {
                file: file.clone(),
                message: format!("row {row} has invalid quantity '{raw_quantity}'"),
            })?;

        records.push(SalesRecord::new(
            code,
            field(&record, name_idx),
            quantity,
            load_date,
        )?);
    }

    debug!("Read {} records from {file}", records.len());
    Ok(Some(records))
}

/// Reads every daily file in a month folder, without touching the store.
///
/// # Errors
/// Fails when the folder name is not `YYYY-MM`, the folder cannot be listed,
/// or any file fails in [`read_sales_file`].
pub fn read_month_folder(folder: &Path) -> Result<MonthBatch> {
    let month = month_of_folder(folder)?;

    let mut files: Vec<PathBuf> = std::fs::read_dir(folder)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    files.sort();

    let mut batch = MonthBatch {
        month,
        files_processed: 0,
        files_skipped: 0,
        records: Vec::new(),
    };

    for path in files {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        let Some(load_date) = day_from_file_name(file_name).and_then(|day| month.day(day)) else {
            debug!("Skipping {file_name}: no valid day number in {month}");
            batch.files_skipped += 1;
            continue;
        };

        match read_sales_file(&path, load_date)? {
            Some(records) => {
                batch.records.extend(records);
                batch.files_processed += 1;
            }
            None => batch.files_skipped += 1,
        }
    }

    Ok(batch)
}

/// Ingests a month folder into the sales ledger.
///
/// # Errors
/// Fails as [`read_month_folder`] does, or when the database write fails; in
/// either case no rows are written.
pub async fn ingest_month_folder(db: &DatabaseConnection, folder: &Path) -> Result<IngestSummary> {
    let batch = read_month_folder(folder)?;

    let txn = db.begin().await?;
    let records_written = ledger::record_sales(&txn, &batch.records).await?;
    txn.commit().await?;

    info!(
        "Ingested {} files ({} records) for {}; {} files skipped",
        batch.files_processed, records_written, batch.month, batch.files_skipped
    );
    Ok(IngestSummary {
        month: batch.month,
        files_processed: batch.files_processed,
        records_written,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use std::fs;

    fn month_dir(root: &Path, name: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        dir
    }

    #[test]
    fn test_day_from_file_name() {
        assert_eq!(day_from_file_name("ventas_15.csv"), Some(15));
        assert_eq!(day_from_file_name("3.csv"), Some(3));
        assert_eq!(day_from_file_name("sales-2023-11-07.csv"), Some(7));
        assert_eq!(day_from_file_name("ventas.csv"), None);
        assert_eq!(day_from_file_name("ventas_15.xlsx"), None);
    }

    #[test]
    fn test_read_month_folder() {
        let root = tempfile::tempdir().unwrap();
        let dir = month_dir(root.path(), "2023-11");
        fs::write(
            dir.join("ventas_01.csv"),
            "Code,Name,Quantity\nFB007,DXN Morinzhi,5\nFB308,DXN Oozhi Tea,2\n",
        )
        .unwrap();
        fs::write(
            dir.join("ventas_2.csv"),
            "quantity,code,name\n 4 , FB007 , DXN Morinzhi \n,,\n",
        )
        .unwrap();
        // Skipped: missing column, no day number, impossible day, not csv
        fs::write(dir.join("ventas_3.csv"), "code,name\nFB007,DXN Morinzhi\n").unwrap();
        fs::write(dir.join("resumen.csv"), "code,name,quantity\nX,Y,1\n").unwrap();
        fs::write(dir.join("ventas_31.csv"), "code,name,quantity\nX,Y,1\n").unwrap();
        fs::write(dir.join("notes_4.txt"), "ignored").unwrap();

        let batch = read_month_folder(&dir).unwrap();
        assert_eq!(batch.month.to_string(), "2023-11");
        assert_eq!(batch.files_processed, 2);
        assert_eq!(batch.files_skipped, 3);
        assert_eq!(batch.records.len(), 3);

        let nov_2 = NaiveDate::from_ymd_opt(2023, 11, 2).unwrap();
        assert_eq!(
            batch.records[2],
            SalesRecord::new("FB007", "DXN Morinzhi", 4, nov_2).unwrap()
        );
    }

    #[test]
    fn test_read_month_folder_rejects_bad_folder_name() {
        let root = tempfile::tempdir().unwrap();
        let dir = month_dir(root.path(), "november");
        let result = read_month_folder(&dir);
        assert!(matches!(result, Err(Error::Ingest { .. })));
    }

    #[test]
    fn test_read_sales_file_rejects_negative_quantity() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("ventas_1.csv");
        fs::write(&path, "code,name,quantity\nFB007,DXN Morinzhi,-2\n").unwrap();

        let date = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
        let result = read_sales_file(&path, date);
        assert!(matches!(
            result,
            Err(Error::Ingest { message, .. }) if message.contains("row 2")
        ));
    }

    #[test]
    fn test_read_sales_file_rejects_missing_code() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("ventas_1.csv");
        fs::write(&path, "code,name,quantity\n,DXN Morinzhi,2\n").unwrap();

        let date = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
        assert!(matches!(
            read_sales_file(&path, date),
            Err(Error::Ingest { .. })
        ));
    }

    #[tokio::test]
    async fn test_ingest_month_folder_writes_ledger() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let dir = month_dir(root.path(), "2024-02");
        fs::write(
            dir.join("ventas_29.csv"),
            "code,name,quantity\nFB007,DXN Morinzhi,5\nFB007,DXN Morinzhi,3\n",
        )?;

        let summary = ingest_month_folder(&db, &dir).await?;
        assert_eq!(summary.files_processed, 1);
        assert_eq!(summary.records_written, 2);

        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let rows = ledger::get_sales_for_date(&db, day).await?;
        assert_eq!(rows.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_ingest_month_folder_is_all_or_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let dir = month_dir(root.path(), "2024-03");
        fs::write(dir.join("ventas_1.csv"), "code,name,quantity\nFB007,A,5\n")?;
        fs::write(dir.join("ventas_2.csv"), "code,name,quantity\nFB007,A,many\n")?;

        let result = ingest_month_folder(&db, &dir).await;
        assert!(matches!(result, Err(Error::Ingest { .. })));

        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(ledger::get_sales_for_date(&db, day).await?.is_empty());

        Ok(())
    }
}
