//! End-to-end operations: load, validate, compute, write.
//!
//! Each operation runs to completion on the calling thread and either
//! returns an [`Outcome`] or a [`DataError`]. The target column is checked
//! before any detection work starts, and the output file is written last,
//! after every computation has succeeded. The input file is only read.
//!
//! # Example
//!
//! ```no_run
//! use datadupe::ops::{run_duplicates, Method, Outcome};
//! use datadupe::duplicates::FuzzyConfig;
//! use std::path::Path;
//!
//! let outcome = run_duplicates(
//!     Path::new("contacts.xlsx"),
//!     "Email",
//!     Method::ExactMatch,
//!     &FuzzyConfig::default(),
//! )
//! .unwrap();
//!
//! if let Outcome::Success { output_path, .. } = outcome {
//!     println!("Saved to {}", output_path.display());
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::duplicates::{find_exact_duplicates, find_fuzzy_duplicates, FuzzyConfig};
use crate::error::DataError;
use crate::table::{self, OutputSuffix};
use crate::transform;

/// Duplicate detection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Method {
    /// Whole-value equality
    ExactMatch,
    /// Partial similarity at or above a threshold
    ThresholdMatch,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactMatch => write!(f, "Exact Match"),
            Self::ThresholdMatch => write!(f, "Threshold Match"),
        }
    }
}

/// What an operation found, alongside the written file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Summary {
    /// Indices (0-based) of rows written by exact matching
    DuplicateRows(Vec<usize>),
    /// Number of rows flagged by threshold matching
    FlaggedRows(usize),
    /// Columns rescaled by the percentage transform
    ScaledColumns(Vec<String>),
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateRows(rows) => write!(f, "Duplicate values found in rows: {rows:?}"),
            Self::FlaggedRows(count) => write!(f, "{count} rows marked as duplicates"),
            Self::ScaledColumns(cols) if cols.is_empty() => write!(f, "No numeric columns found"),
            Self::ScaledColumns(cols) => write!(f, "Scaled columns: {}", cols.join(", ")),
        }
    }
}

/// Result surface of every operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Outcome {
    /// A result file was written.
    Success {
        /// Where the result was written
        output_path: PathBuf,
        /// What was found
        summary: Summary,
    },
    /// Exact matching found no duplicate values; nothing was written.
    NoDuplicates,
}

/// Write rows whose `column` value occurs more than once to
/// `<input>_duplicates.xlsx`.
///
/// # Errors
///
/// Returns a [`DataError`] if loading, column lookup or writing fails.
pub fn exact_match(path: &Path, column: &str) -> Result<Outcome, DataError> {
    let table = table::load(path)?;
    let col = table.require_column(column)?;

    let Some(outcome) = find_exact_duplicates(&table, col) else {
        return Ok(Outcome::NoDuplicates);
    };

    let output_path = table::output_path(path, OutputSuffix::Duplicates);
    table::write(&outcome.table, &output_path)?;
    Ok(Outcome::Success {
        output_path,
        summary: Summary::DuplicateRows(outcome.rows),
    })
}

/// Write the input with an `IsDuplicate` column to `<input>_marked.xlsx`.
///
/// The file is written even when no row is flagged.
///
/// # Errors
///
/// Returns a [`DataError`] if loading, column lookup or writing fails.
pub fn threshold_match(
    path: &Path,
    column: &str,
    config: &FuzzyConfig,
) -> Result<Outcome, DataError> {
    let table = table::load(path)?;
    let col = table.require_column(column)?;

    let outcome = find_fuzzy_duplicates(&table, col, config);

    let output_path = table::output_path(path, OutputSuffix::Marked);
    table::write(&outcome.table, &output_path)?;
    Ok(Outcome::Success {
        output_path,
        summary: Summary::FlaggedRows(outcome.flagged),
    })
}

/// Write the input with every numeric column scaled by `percentage` percent
/// to `<input>_increased.xlsx`.
///
/// # Errors
///
/// Returns a [`DataError`] if loading or writing fails.
pub fn increase_percentage(path: &Path, percentage: f64) -> Result<Outcome, DataError> {
    let table = table::load(path)?;

    let outcome = transform::scale(&table, percentage);

    let output_path = table::output_path(path, OutputSuffix::Increased);
    table::write(&outcome.table, &output_path)?;
    Ok(Outcome::Success {
        output_path,
        summary: Summary::ScaledColumns(outcome.scaled_columns),
    })
}

/// Run the duplicate detector selected by `method`.
///
/// `config` is only consulted for [`Method::ThresholdMatch`].
///
/// # Errors
///
/// Returns a [`DataError`] if the selected operation fails.
pub fn run_duplicates(
    path: &Path,
    column: &str,
    method: Method,
    config: &FuzzyConfig,
) -> Result<Outcome, DataError> {
    log::debug!("Running {} on {} (column '{}')", method, path.display(), column);
    match method {
        Method::ExactMatch => exact_match(path, column),
        Method::ThresholdMatch => threshold_match(path, column, config),
    }
}
