//! In-memory table model shared by every operation.
//!
//! A [`Table`] is an ordered list of named columns and an ordered list of
//! rows, each row positionally aligned with the columns. Row order is the
//! only identity a row has besides its content, so every transform keeps it.
//!
//! # Example
//!
//! ```
//! use datadupe::table::{CellValue, ColumnKind, Table};
//!
//! let mut table = Table::new(vec!["id".to_string(), "name".to_string()]);
//! table.push_row(vec![CellValue::Number(1.0), CellValue::from("alice")]).unwrap();
//! table.push_row(vec![CellValue::Number(2.0)]).unwrap();
//!
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.cell(1, 1), Some(&CellValue::Missing));
//! assert_eq!(table.column_kind(0), ColumnKind::Numeric);
//! assert_eq!(table.column_kind(1), ColumnKind::Text);
//! ```

pub mod loader;
pub mod writer;

use std::fmt;

use serde::Serialize;

use crate::error::DataError;

pub use loader::load;
pub use writer::{output_path, write, OutputSuffix};

/// Name of the flag column appended by the fuzzy detector.
pub const DUPLICATE_FLAG_COLUMN: &str = "IsDuplicate";

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Numeric value
    Number(f64),
    /// Free text
    Text(String),
    /// Boolean value (flag columns, spreadsheet booleans)
    Bool(bool),
    /// No value
    Missing,
}

impl CellValue {
    /// Whether the cell holds no value.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Numeric reading of the cell.
    ///
    /// `Text` cells whose trimmed content parses as a number count as numeric.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => parse_number(s),
            Self::Bool(_) | Self::Missing => None,
        }
    }

    /// String form used for fuzzy comparison, trimmed of surrounding whitespace.
    #[must_use]
    pub fn as_key(&self) -> String {
        self.to_string().trim().to_string()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::Text(s) => f.write_str(s),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Missing => Ok(()),
        }
    }
}

/// Render a number the way a person would type it: integral values without
/// a fractional part, everything else in shortest round-trip form.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Parse a field as a number, ignoring surrounding whitespace.
#[must_use]
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Semantic kind of a column, derived from its current content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every present cell parses as a number
    Numeric,
    /// At least one present cell is not a number
    Text,
}

/// An ordered, column-aligned table of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create an empty table with the given column names.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row. Short rows are padded with [`CellValue::Missing`].
    ///
    /// # Errors
    ///
    /// Returns the number of cells if the row is wider than the table.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) -> Result<(), usize> {
        if row.len() > self.columns.len() {
            return Err(row.len());
        }
        row.resize(self.columns.len(), CellValue::Missing);
        self.rows.push(row);
        Ok(())
    }

    /// Cell at `(row, column)`.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Index of the column named `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of the column named `name`, or a [`DataError::MissingColumn`].
    ///
    /// The error carries the closest existing column name when one is close
    /// enough to be a plausible typo.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingColumn`] if no column has that name.
    pub fn require_column(&self, name: &str) -> Result<usize, DataError> {
        self.column_index(name)
            .ok_or_else(|| DataError::MissingColumn {
                column: name.to_string(),
                suggestion: self.suggest_column(name),
            })
    }

    fn suggest_column(&self, name: &str) -> Option<String> {
        self.columns
            .iter()
            .map(|c| (strsim::jaro_winkler(&c.to_lowercase(), &name.to_lowercase()), c))
            .filter(|(score, _)| *score > 0.8)
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, c)| c.clone())
    }

    /// Iterate over the cells of one column.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |r| &r[column])
    }

    /// Classify a column from its current content.
    ///
    /// A column is numeric iff every present cell parses as a number. A column
    /// with no present cells at all counts as numeric (there is nothing in it
    /// that is not a number).
    #[must_use]
    pub fn column_kind(&self, column: usize) -> ColumnKind {
        let numeric = self
            .column_values(column)
            .filter(|v| !v.is_missing())
            .all(|v| v.as_number().is_some());
        if numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        }
    }

    /// New table holding only the rows at `indices`, in the given order.
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// New table with column `name` set to `values`.
    ///
    /// An existing column of that name is overwritten in place; otherwise the
    /// column is appended. Column names stay unique either way.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if `values` does not have one entry per row.
    #[must_use]
    pub fn with_column(&self, name: &str, values: Vec<CellValue>) -> Self {
        debug_assert_eq!(values.len(), self.rows.len());
        let existing = self.column_index(name);
        let mut columns = self.columns.clone();
        if existing.is_none() {
            columns.push(name.to_string());
        }
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let mut row = row.clone();
                match existing {
                    Some(idx) => row[idx] = value,
                    None => row.push(value),
                }
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// New table where `f` has rewritten every cell of column `column`.
    #[must_use]
    pub fn map_column<F>(&self, column: usize, f: F) -> Self
    where
        F: Fn(&CellValue) -> CellValue,
    {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row[column] = f(&row[column]);
                row
            })
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }
}
