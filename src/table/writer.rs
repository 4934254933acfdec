//! Spreadsheet output for result tables.
//!
//! Results are always written as `.xlsx` with a single worksheet, a header
//! row and no index column. The output path is derived from the input path:
//! `<input without extension>_<suffix>.xlsx`.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::{CellValue, Table};
use crate::error::DataError;

/// Extension of every file we write.
pub const OUTPUT_EXTENSION: &str = "xlsx";

/// Which operation produced the output; decides the file name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSuffix {
    /// Exact-match duplicate rows
    Duplicates,
    /// Fuzzy-marked table
    Marked,
    /// Percentage-scaled table
    Increased,
}

impl OutputSuffix {
    /// The suffix text.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Duplicates => "duplicates",
            Self::Marked => "marked",
            Self::Increased => "increased",
        }
    }
}

/// Derive the output path for `input`.
///
/// # Example
///
/// ```
/// use datadupe::table::{output_path, OutputSuffix};
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     output_path(Path::new("/data/sales.csv"), OutputSuffix::Marked),
///     PathBuf::from("/data/sales_marked.xlsx")
/// );
/// ```
#[must_use]
pub fn output_path(input: &Path, suffix: OutputSuffix) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{stem}_{}.{OUTPUT_EXTENSION}", suffix.as_str());
    match input.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Write `table` to `path` as an `.xlsx` workbook.
///
/// The workbook is serialised in memory first; the file is only created once
/// that has succeeded and is removed again if writing it fails.
///
/// # Errors
///
/// - [`DataError::Write`] if the table cannot be represented in a workbook
/// - [`DataError::Io`] if the file cannot be created or written
pub fn write(table: &Table, path: &Path) -> Result<(), DataError> {
    let buffer = render(table).map_err(|e| DataError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut file = File::create(path).map_err(|e| DataError::io(path, e))?;
    if let Err(e) = file.write_all(&buffer).and_then(|()| file.sync_all()) {
        drop(file);
        if let Err(rm) = fs::remove_file(path) {
            log::warn!("Failed to remove partial output {}: {}", path.display(), rm);
        }
        return Err(DataError::io(path, e));
    }

    log::info!(
        "Wrote {} rows x {} columns to {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(())
}

fn render(table: &Table) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, to_col(col)?, name, &header_format)?;
    }

    for (idx, row) in table.rows().iter().enumerate() {
        let r = to_row(idx + 1)?;
        for (col, cell) in row.iter().enumerate() {
            let c = to_col(col)?;
            match cell {
                CellValue::Number(n) if n.is_finite() => {
                    worksheet.write_number(r, c, *n)?;
                }
                CellValue::Number(n) if n.is_infinite() => {
                    worksheet.write_string(r, c, if *n > 0.0 { "inf" } else { "-inf" })?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
                CellValue::Number(_) | CellValue::Missing => {}
            }
        }
    }

    workbook.save_to_buffer()
}

fn to_row(idx: usize) -> Result<u32, XlsxError> {
    u32::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}

fn to_col(idx: usize) -> Result<u16, XlsxError> {
    u16::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::load;
    use tempfile::TempDir;

    #[test]
    fn test_output_path_suffixes() {
        let input = Path::new("/data/report.xls");
        assert_eq!(
            output_path(input, OutputSuffix::Duplicates),
            PathBuf::from("/data/report_duplicates.xlsx")
        );
        assert_eq!(
            output_path(input, OutputSuffix::Increased),
            PathBuf::from("/data/report_increased.xlsx")
        );
    }

    #[test]
    fn test_output_path_keeps_inner_dots() {
        assert_eq!(
            output_path(Path::new("q1.sales.csv"), OutputSuffix::Marked),
            PathBuf::from("q1.sales_marked.xlsx")
        );
    }

    #[test]
    fn test_write_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut table = Table::new(vec!["id".into(), "name".into(), "flag".into()]);
        table
            .push_row(vec![1.0.into(), "alpha".into(), true.into()])
            .unwrap();
        table
            .push_row(vec![2.5.into(), CellValue::Missing, false.into()])
            .unwrap();

        write(&table, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.columns(), table.columns());
        assert_eq!(loaded.rows(), table.rows());
    }

    #[test]
    fn test_write_to_missing_directory_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_such_dir").join("out.xlsx");
        let table = Table::new(vec!["a".into()]);

        assert!(matches!(write(&table, &path), Err(DataError::Io { .. })));
        assert!(!path.exists());
    }
}
