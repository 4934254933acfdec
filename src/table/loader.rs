//! Table loading from CSV and spreadsheet files.
//!
//! The reader is picked from the file extension:
//! - `.csv`: comma-separated values with a header row
//! - `.xls`, `.xlsx`, `.xlsm`, `.xlsb`, `.ods`: first worksheet, header row
//!
//! Anything else fails with [`DataError::UnsupportedFormat`]. Loading only
//! reads the source file.

use std::fs::File;
use std::path::Path;

use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader};
use chrono::Timelike;

use super::{parse_number, CellValue, Table};
use crate::error::DataError;

/// Field values that are read as missing cells.
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "na", "NULL", "null", "None", "NaN", "nan", "-NaN", "-nan", "#N/A",
    "#NA", "<NA>",
];

/// Input formats understood by [`load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated values
    Csv,
    /// Any workbook format calamine can open
    Spreadsheet,
}

impl InputFormat {
    /// Detect the format from a path's extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

/// Load a table from `path`.
///
/// # Errors
///
/// - [`DataError::UnsupportedFormat`] for an unknown extension
/// - [`DataError::Io`] if the file cannot be opened
/// - [`DataError::Parse`] if the content is malformed
///
/// # Example
///
/// ```no_run
/// use datadupe::table::load;
/// use std::path::Path;
///
/// let table = load(Path::new("customers.csv")).unwrap();
/// println!("{} rows, columns: {:?}", table.row_count(), table.columns());
/// ```
pub fn load(path: &Path) -> Result<Table, DataError> {
    let format = InputFormat::from_path(path)
        .ok_or_else(|| DataError::UnsupportedFormat(path.to_path_buf()))?;

    log::info!("Loading {} as {:?}", path.display(), format);
    let table = match format {
        InputFormat::Csv => load_csv(path)?,
        InputFormat::Spreadsheet => load_spreadsheet(path)?,
    };
    log::debug!(
        "Loaded {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

fn is_missing_marker(field: &str) -> bool {
    MISSING_MARKERS.contains(&field)
}

/// Make header names unique and non-blank.
///
/// Blank names become `Unnamed: {index}`; repeats get `.1`, `.2`, ... suffixes.
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut n = 1;
        while out.contains(&candidate) {
            candidate = format!("{base}.{n}");
            n += 1;
        }
        out.push(candidate);
    }
    out
}

fn load_csv(path: &Path) -> Result<Table, DataError> {
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(DataError::parse(path, "No columns to parse from file"));
    }
    let columns = normalize_headers(headers);
    let width = columns.len();

    let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_error(path, e))?;
        if record.len() > width {
            return Err(DataError::parse(
                path,
                format!(
                    "Expected {} fields in line {}, saw {}",
                    width,
                    idx + 2,
                    record.len()
                ),
            ));
        }
        let row = record
            .iter()
            .map(|f| (!is_missing_marker(f)).then(|| f.to_string()))
            .collect();
        raw_rows.push(row);
    }

    // A column is read as numbers only if every present field parses.
    let numeric: Vec<bool> = (0..width)
        .map(|col| {
            raw_rows.iter().all(|row| match row.get(col) {
                Some(Some(field)) => parse_number(field).is_some(),
                _ => true,
            })
        })
        .collect();

    let mut table = Table::new(columns);
    for raw in raw_rows {
        let row = raw
            .into_iter()
            .enumerate()
            .map(|(col, field)| match field {
                None => CellValue::Missing,
                Some(f) if numeric[col] => parse_number(&f).map_or(CellValue::Missing, CellValue::Number),
                Some(f) => CellValue::Text(f),
            })
            .collect();
        table.push_row(row).map_err(|n| row_too_wide(path, n, width))?;
    }
    Ok(table)
}

fn csv_error(path: &Path, err: csv::Error) -> DataError {
    if err.is_io_error() {
        if let csv::ErrorKind::Io(io) = err.into_kind() {
            return DataError::io(path, io);
        }
        return DataError::parse(path, "I/O failure while reading CSV");
    }
    DataError::parse(path, err)
}

fn load_spreadsheet(path: &Path) -> Result<Table, DataError> {
    if !path.exists() {
        return Err(DataError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        ));
    }
    let mut workbook = open_workbook_auto(path).map_err(|e| DataError::parse(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DataError::parse(path, "Workbook has no worksheets"))?
        .map_err(|e| DataError::parse(path, e))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| DataError::parse(path, "No columns to parse from file"))?;
    let columns = normalize_headers(header.iter().map(header_name).collect());
    let width = columns.len();

    let mut table = Table::new(columns);
    for row in rows {
        let cells: Vec<CellValue> = row.iter().take(width).map(convert_cell).collect();
        table.push_row(cells).map_err(|n| row_too_wide(path, n, width))?;
    }
    Ok(table)
}

fn row_too_wide(path: &Path, cells: usize, width: usize) -> DataError {
    DataError::parse(path, format!("Row has {cells} cells but the header has {width}"))
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(f) => super::format_number(*f),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) if is_missing_marker(s) => CellValue::Missing,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::DateTime(dt) => convert_datetime(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Render a date or duration cell as text so it never reads as a number.
///
/// Dates at midnight print as `YYYY-MM-DD`, other timestamps as
/// `YYYY-MM-DD HH:MM:SS`, durations in ISO 8601 form.
fn convert_datetime(dt: &ExcelDateTime) -> CellValue {
    if dt.is_duration() {
        return match dt.as_duration() {
            Some(d) => CellValue::Text(d.to_string()),
            None => CellValue::Missing,
        };
    }
    match dt.as_datetime() {
        Some(t) if t.num_seconds_from_midnight() == 0 && t.nanosecond() == 0 => {
            CellValue::Text(t.format("%Y-%m-%d").to_string())
        }
        Some(t) => CellValue::Text(t.format("%Y-%m-%d %H:%M:%S").to_string()),
        None => {
            log::warn!("Date cell out of range (serial {}), read as missing", dt.as_f64());
            CellValue::Missing
        }
    }
}
