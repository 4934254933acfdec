//! JSON output formatter for operation results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "result": {
//!     "status": "success",
//!     "output_path": "/data/contacts_duplicates.xlsx",
//!     "summary": { "kind": "duplicate_rows", "value": [1, 2, 4] }
//!   },
//!   "exit_code": 0,
//!   "exit_code_name": "DD000"
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::error::ExitCode;
use crate::ops::Outcome;

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// What the operation produced
    pub result: &'a Outcome,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DD000")
    pub exit_code_name: &'static str,
}

impl<'a> JsonOutput<'a> {
    /// Create a new JSON output for `outcome`.
    #[must_use]
    pub fn new(outcome: &'a Outcome, exit_code: ExitCode) -> Self {
        Self {
            result: outcome,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON followed by a newline to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        let json = self.to_json_pretty().map_err(std::io::Error::other)?;
        writeln!(writer, "{json}")
    }
}
