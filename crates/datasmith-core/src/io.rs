//! File-backed dataset storage.
//!
//! Loads raw CSV and spreadsheet files into datasets and writes cleaned
//! datasets and their reports under the directories named by
//! [`StorageConfig`].

use crate::config::StorageConfig;
use crate::dataset::{Dataset, DatasetId};
use crate::error::{DatasmithError, Result, ResultExt};
use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::Timelike;
use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Field separators tried when sniffing a CSV header, in order of preference.
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Load a dataset, picking the reader from the file extension.
///
/// `.xlsx`, `.xlsm`, `.xls` and `.ods` files go through the spreadsheet
/// reader; `.csv`, `.tsv` and `.txt` through the CSV reader.
pub fn load_table(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "tsv" | "txt" => load_csv(path),
        "xlsx" | "xlsm" | "xls" | "ods" => load_excel(path),
        _ => Err(DatasmithError::Validation(format!(
            "Unsupported file type: '{}'",
            path.display()
        ))),
    }
}

/// Load a CSV file with a header row into a raw dataset named after the file.
///
/// The separator is detected from the header line (`,`, `;`, tab or `|`).
/// A file without data rows is rejected.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    ensure_non_empty_file(path)?;

    let mut header = String::new();
    BufReader::new(File::open(path)?).read_line(&mut header)?;
    let separator = detect_delimiter(&header);
    debug!(
        "Detected separator {:?} for '{}'",
        separator as char,
        path.display()
    );

    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(separator)
                .with_quote_char(Some(b'"')),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .context(format!("Reading CSV '{}'", path.display()))?;

    into_dataset(path, df)
}

/// Load the first worksheet of a spreadsheet. The first row is the header.
pub fn load_excel(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    ensure_non_empty_file(path)?;

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            DatasmithError::Validation(format!("'{}' has no worksheets", path.display()))
        })??;

    let df = frame_from_range(&range).context(format!("Reading sheet '{}'", path.display()))?;
    into_dataset(path, df)
}

fn ensure_non_empty_file(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|_| DatasmithError::NotFound {
        kind: "File",
        id: path.display().to_string(),
    })?;
    if metadata.len() == 0 {
        return Err(DatasmithError::Validation(format!(
            "'{}' is empty",
            path.display()
        )));
    }
    Ok(())
}

fn into_dataset(path: &Path, df: DataFrame) -> Result<Dataset> {
    if df.width() == 0 {
        return Err(DatasmithError::Validation(format!(
            "'{}' has no columns",
            path.display()
        )));
    }
    if df.height() == 0 {
        return Err(DatasmithError::Validation(format!(
            "'{}' has a header but no data rows",
            path.display()
        )));
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());

    info!(
        "Loaded '{}' ({} rows x {} columns)",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(Dataset::new(name, df))
}

/// Pick the candidate separator that occurs most often in the header line.
/// Falls back to a comma.
fn detect_delimiter(header: &str) -> u8 {
    let mut best = (b',', 0);
    for candidate in CANDIDATE_DELIMITERS {
        let count = header.bytes().filter(|b| *b == candidate).count();
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}

/// Convert a worksheet range into a frame.
///
/// Columns whose cells are all integers become Int64, all numbers Float64,
/// all booleans Boolean; anything else is read as strings. Empty and error
/// cells are nulls.
fn frame_from_range(range: &Range<Data>) -> Result<DataFrame> {
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| DatasmithError::Validation("worksheet is empty".to_string()))?;
    let body: Vec<&[Data]> = rows.collect();

    let columns = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = match cell_value(Some(cell)) {
                Some(value) => value.to_string(),
                None => format!("column_{}", idx + 1),
            };
            let cells: Vec<Option<&Data>> =
                body.iter().map(|row| cell_value(row.get(idx))).collect();
            sheet_column(&name, &cells)
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

fn cell_value(cell: Option<&Data>) -> Option<&Data> {
    match cell? {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.trim().is_empty() => None,
        other => Some(other),
    }
}

fn sheet_column(name: &str, cells: &[Option<&Data>]) -> Column {
    let present = || cells.iter().flatten();

    if present().all(|c| matches!(c, Data::Int(_))) && present().next().is_some() {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Some(Data::Int(v)) => Some(*v),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), values);
    }

    if present().all(|c| matches!(c, Data::Int(_) | Data::Float(_))) && present().next().is_some()
    {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Some(Data::Int(v)) => Some(*v as f64),
                Some(Data::Float(v)) => Some(*v),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), values);
    }

    if present().all(|c| matches!(c, Data::Bool(_))) && present().next().is_some() {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Some(Data::Bool(v)) => Some(*v),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), values);
    }

    let values: Vec<Option<String>> = cells.iter().map(|c| c.map(render_cell)).collect();
    Column::new(name.into(), values)
}

fn render_cell(cell: &Data) -> String {
    match cell {
        Data::DateTime(value) => match value.as_datetime() {
            Some(dt) if dt.num_seconds_from_midnight() == 0 => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => value.as_f64().to_string(),
        },
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Write a dataset to `cleaned_dir/{id}.csv`.
pub fn save_cleaned(dataset: &Dataset, storage: &StorageConfig) -> Result<PathBuf> {
    let dir = storage.cleaned_path();
    fs::create_dir_all(&dir)?;
    let output_path = dir.join(format!("{}.csv", dataset.id()));

    let mut file = File::create(&output_path)?;
    let mut frame = dataset.frame().clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut frame)
        .context(format!("Writing CSV '{}'", output_path.display()))?;

    info!("Dataset saved: {}", output_path.display());
    Ok(output_path)
}

/// Write a JSON report to `reports_dir/{id}_report.json`.
pub fn write_report<T: Serialize>(
    id: DatasetId,
    report: &T,
    storage: &StorageConfig,
) -> Result<PathBuf> {
    let dir = storage.reports_path();
    fs::create_dir_all(&dir)?;
    let report_path = dir.join(format!("{id}_report.json"));

    let mut file = File::create(&report_path)?;
    file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

    info!("Report saved: {}", report_path.display());
    Ok(report_path)
}
