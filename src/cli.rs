//! Command-line interface definitions for DataDupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! The CLI follows standard conventions with global options (verbosity, color, output) and
//! one subcommand per operation.
//!
//! # Example
//!
//! ```bash
//! # Rows whose Email value occurs more than once
//! datadupe duplicates contacts.csv --column Email
//!
//! # Mark near-duplicate company names (score >= 85)
//! datadupe duplicates companies.xlsx --column Name --method threshold --threshold 85
//!
//! # Raise every numeric column by 7.5%
//! datadupe increase prices.xlsx --percentage 7.5
//!
//! # Machine-readable result
//! datadupe --json increase prices.xlsx -p -10
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::ops::Method;

/// Duplicate row finder and numeric rescaler for CSV and Excel tables.
///
/// DataDupe reads a CSV or Excel file, finds rows that share a value in one
/// column (exactly or by fuzzy similarity) or rescales every numeric column,
/// and writes the result next to the input as an .xlsx file.
#[derive(Debug, Parser)]
#[command(name = "datadupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print the result as JSON instead of a message
    #[arg(long, global = true)]
    pub json: bool,

    /// Print errors as structured JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for DataDupe.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find duplicate rows by the value in one column
    Duplicates(DuplicateArgs),
    /// Increase every numeric column by a percentage
    Increase(IncreaseArgs),
}

/// Arguments for the duplicates subcommand.
#[derive(Debug, Args)]
pub struct DuplicateArgs {
    /// CSV or Excel file to read
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Column to compare
    #[arg(short, long, value_name = "NAME")]
    pub column: String,

    /// Matching method
    #[arg(short, long, value_enum, default_value = "exact")]
    pub method: MethodArg,

    /// Minimum similarity score (threshold method only; default 90)
    ///
    /// Intended range is 0-100. Values outside it are used as given.
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    pub threshold: Option<i32>,

    /// Worker threads for threshold matching (default: one per core)
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,
}

/// Arguments for the increase subcommand.
#[derive(Debug, Args)]
pub struct IncreaseArgs {
    /// CSV or Excel file to read
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Percentage to add to every numeric value (negative to decrease)
    #[arg(short, long, value_name = "PERCENT", allow_negative_numbers = true)]
    pub percentage: f64,
}

/// Matching method as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Whole-value equality
    Exact,
    /// Partial similarity at or above the threshold
    Threshold,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Exact => Method::ExactMatch,
            MethodArg::Threshold => Method::ThresholdMatch,
        }
    }
}

impl std::fmt::Display for MethodArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MethodArg::Exact => write!(f, "exact"),
            MethodArg::Threshold => write!(f, "threshold"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_help() {
        // --help causes an early exit, which is an error in try_parse_from
        let result = Cli::try_parse_from(["datadupe", "--help"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_duplicates_basic() {
        let cli =
            Cli::try_parse_from(["datadupe", "duplicates", "data.csv", "--column", "ID"]).unwrap();
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Commands::Duplicates(args) => {
                assert_eq!(args.path, PathBuf::from("data.csv"));
                assert_eq!(args.column, "ID");
                assert_eq!(args.method, MethodArg::Exact);
                assert_eq!(args.threshold, None);
            }
            _ => panic!("Expected Duplicates command"),
        }
    }

    #[test]
    fn test_cli_parse_threshold_method() {
        let cli = Cli::try_parse_from([
            "datadupe",
            "-v",
            "duplicates",
            "data.xlsx",
            "-c",
            "Name",
            "-m",
            "threshold",
            "-t",
            "80",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Duplicates(args) => {
                assert_eq!(args.method, MethodArg::Threshold);
                assert_eq!(args.threshold, Some(80));
                assert_eq!(Method::from(args.method), Method::ThresholdMatch);
            }
            _ => panic!("Expected Duplicates command"),
        }
    }

    #[test]
    fn test_cli_threshold_is_not_clamped() {
        let cli = Cli::try_parse_from([
            "datadupe", "duplicates", "a.csv", "-c", "x", "-t", "-5",
        ])
        .unwrap();
        match cli.command {
            Commands::Duplicates(args) => assert_eq!(args.threshold, Some(-5)),
            _ => panic!("Expected Duplicates command"),
        }
    }

    #[test]
    fn test_cli_parse_increase_negative() {
        let cli = Cli::try_parse_from(["datadupe", "increase", "a.csv", "--percentage", "-12.5"])
            .unwrap();
        match cli.command {
            Commands::Increase(args) => {
                assert_eq!(args.path, PathBuf::from("a.csv"));
                assert_eq!(args.percentage, -12.5);
            }
            _ => panic!("Expected Increase command"),
        }
    }

    #[test]
    fn test_cli_missing_column_is_error() {
        let result = Cli::try_parse_from(["datadupe", "duplicates", "a.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_missing_percentage_is_error() {
        let result = Cli::try_parse_from(["datadupe", "increase", "a.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["datadupe", "-v", "-q", "increase", "a.csv", "-p", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "datadupe",
            "increase",
            "a.csv",
            "-p",
            "1",
            "--json",
            "--config",
            "my.toml",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("my.toml")));
    }

    #[test]
    fn test_cli_invalid_method() {
        let result =
            Cli::try_parse_from(["datadupe", "duplicates", "a.csv", "-c", "x", "-m", "soundex"]);
        assert!(result.is_err());
    }
}
