//! Structured error handling and exit codes.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Errors produced by the table core (loading, detection, scaling, writing).
///
/// Every variant carries a message suitable for showing to the user verbatim.
#[derive(Debug, Error)]
pub enum DataError {
    /// The input file extension is not one we know how to read.
    #[error("Unsupported file format: {}. Please provide a CSV or Excel file.", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The requested column does not exist in the loaded table.
    #[error("Column '{column}' not found in the file.{}", suggestion_suffix(.suggestion))]
    MissingColumn {
        /// Column name as requested
        column: String,
        /// Closest existing column name, if any is reasonably close
        suggestion: Option<String>,
    },

    /// File content is malformed for its declared format.
    #[error("Failed to parse {}: {message}", path.display())]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// Reading the input or writing the output failed at the OS level.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The spreadsheet could not be serialised.
    #[error("Failed to write {}: {message}", path.display())]
    Write {
        /// Output file
        path: PathBuf,
        /// What went wrong
        message: String,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" Did you mean '{s}'?"))
        .unwrap_or_default()
}

impl DataError {
    /// Build a parse error for `path`.
    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Build an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Exit codes for the DataDupe application.
///
/// - 0: Success (operation completed and an output file was written)
/// - 1: General error (bad input, missing column, I/O failure)
/// - 2: No duplicates found (completed normally, nothing written)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: an output file was written.
    Success = 0,
    /// General error: the operation failed.
    GeneralError = 1,
    /// No duplicates: exact matching found nothing to write.
    NoDuplicates = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DD000",
            Self::GeneralError => "DD001",
            Self::NoDuplicates => "DD002",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
