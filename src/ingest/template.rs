//! Order template storage.
//!
//! A template document is a directory with one CSV file per sheet; the file stem
//! is the sheet name. Cells are kept as raw text and every physical line outside
//! a quoted cell is one row, blank lines included, so layout coordinates match
//! the spreadsheet the file was exported from.

use crate::{
    core::reconcile::{OrderTemplate, Sheet},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix of generated order documents.
pub const OUTPUT_PREFIX: &str = "Orden_Pedido_";

/// Name of the document written for `sheet` on `date`: `Orden_Pedido_<sheet><YYYY-MM-DD>`.
#[must_use]
pub fn default_output_name(sheet: &str, date: NaiveDate) -> String {
    format!("{OUTPUT_PREFIX}{sheet}{}", date.format("%Y-%m-%d"))
}

/// Puts an empty quoted field on every blank line outside a quoted cell.
///
/// The csv reader skips blank lines; a line holding `""` is read as a row with a
/// single empty cell instead.
fn mark_blank_lines(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut in_quotes = false;
    let mut field_start = true;
    let mut line_start = true;
    let mut bytes = raw.iter().copied().peekable();

    while let Some(byte) = bytes.next() {
        if in_quotes {
            out.push(byte);
            if byte == b'"' {
                // `""` inside a quoted cell is an escaped quote
                if bytes.peek() == Some(&b'"') {
                    out.push(b'"');
                    bytes.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        match byte {
            b'\r' | b'\n' => {
                if line_start {
                    out.extend_from_slice(b"\"\"");
                }
                out.push(byte);
                if byte == b'\r' && bytes.peek() == Some(&b'\n') {
                    out.push(b'\n');
                    bytes.next();
                }
                line_start = true;
                field_start = true;
            }
            b'"' if field_start => {
                out.push(byte);
                in_quotes = true;
                field_start = false;
                line_start = false;
            }
            b',' => {
                out.push(byte);
                field_start = true;
                line_start = false;
            }
            _ => {
                out.push(byte);
                field_start = false;
                line_start = false;
            }
        }
    }
    out
}

fn read_sheet(path: &Path, name: String) -> Result<Sheet> {
    let raw = std::fs::read(path)?;
    let marked = mark_blank_lines(&raw);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(marked.as_slice());

    let rows = reader
        .records()
        .map(|record| {
            let record = record?;
            if record.len() == 1 && record[0].is_empty() {
                return Ok(Vec::new());
            }
            Ok(record.iter().map(ToString::to_string).collect())
        })
        .collect::<Result<Vec<Vec<String>>>>()?;

    debug!("Loaded sheet '{name}' with {} rows", rows.len());
    Ok(Sheet::new(name, rows))
}

/// Loads every `*.csv` file in `dir` as a sheet, ordered by file name.
///
/// # Errors
/// Fails when `dir` cannot be listed, holds no CSV files, or a file is not
/// valid CSV.
pub fn load_template(dir: &Path) -> Result<OrderTemplate> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(Error::Validation {
            message: format!("order template {} contains no sheets", dir.display()),
        });
    }

    let sheets = files
        .iter()
        .map(|path| {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            read_sheet(path, name)
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Loaded order template {} ({} sheets)", dir.display(), sheets.len());
    Ok(OrderTemplate::new(sheets))
}

/// Writes every sheet of `template` into `dir`, creating it if needed.
///
/// Existing files for the same sheet names are overwritten.
///
/// # Errors
/// Fails on any file system or CSV write error.
pub fn save_template(template: &OrderTemplate, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    for sheet in template.sheets() {
        let path = dir.join(format!("{}.csv", sheet.name));
        let mut writer = csv::WriterBuilder::new().flexible(true).from_path(&path)?;
        for row in &sheet.rows {
            if row.is_empty() {
                writer.write_record([""])?;
            } else {
                writer.write_record(row)?;
            }
        }
        writer.flush()?;
    }

    info!("Saved order template to {}", dir.display());
    Ok(())
}
