//! DataDupe - duplicate row finder and numeric rescaler for tables
//!
//! Reads a CSV or Excel file into a [`table::Table`], then either finds rows
//! that share a value in one column (exactly, or by partial string
//! similarity) or scales every numeric column by a percentage. Results are
//! written next to the input as `.xlsx`.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod ops;
pub mod output;
pub mod progress;
pub mod table;
pub mod transform;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::ExitCode;
use crate::ops::{Method, Outcome};
use crate::output::{JsonOutput, TextOutput};
use crate::progress::Progress;

/// Run the application for parsed command-line arguments.
///
/// Prints the result (text or JSON) to stdout and returns the exit code to
/// use. Failures are returned to the caller, which decides how to report
/// them.
///
/// # Errors
///
/// Returns an error if the selected operation fails.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet, cli.no_color);

    let mut config = match cli.config {
        Some(ref path) => Config::load_from_path(path.clone()),
        None => Config::load(),
    };
    config.merge_cli(&cli);
    log::debug!("Effective configuration: {:?}", config);

    let outcome = match &cli.command {
        Commands::Duplicates(args) => {
            let method = Method::from(args.method);
            let mut fuzzy = config.fuzzy_config();
            if config.progress && method == Method::ThresholdMatch {
                fuzzy = fuzzy.with_progress_callback(Arc::new(Progress::new(false)));
            }
            ops::run_duplicates(&args.path, &args.column, method, &fuzzy).with_context(|| {
                format!("{} failed for {}", method, args.path.display())
            })?
        }
        Commands::Increase(args) => ops::increase_percentage(&args.path, args.percentage)
            .with_context(|| format!("Percentage increase failed for {}", args.path.display()))?,
    };

    let code = match outcome {
        Outcome::Success { .. } => ExitCode::Success,
        Outcome::NoDuplicates => ExitCode::NoDuplicates,
    };

    if cli.json {
        JsonOutput::new(&outcome, code)
            .write_to(std::io::stdout().lock())
            .context("Failed to write JSON output")?;
    } else if !cli.quiet {
        println!("{}", TextOutput::new(&outcome, !cli.no_color).render());
    }

    Ok(code)
}
