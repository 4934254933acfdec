//! Logging setup for DataDupe.
//!
//! Uses the `log` facade with an `env_logger` backend. The level comes from,
//! in priority order:
//!
//! 1. `RUST_LOG` (if set)
//! 2. `--quiet` (errors only) or `-v` / `-vv` (debug / trace)
//! 3. Info
//!
//! Debug builds prefix records with a timestamp and, when verbose, the
//! module path. Release builds print level and message only.
//!
//! ```rust,no_run
//! use datadupe::logging::init_logging;
//!
//! init_logging(1, false, false);
//! log::debug!("visible with -v");
//! ```

use std::env;
use std::io::Write;

use env_logger::{Builder, WriteStyle};
use log::LevelFilter;

/// Initialize the logger from CLI flags.
///
/// Must be called at most once per process. A second call is ignored with a
/// debug message rather than panicking.
pub fn init_logging(verbose: u8, quiet: bool, no_color: bool) {
    let mut builder = Builder::new();
    let from_env = env::var("RUST_LOG").is_ok();

    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(level_for(verbose, quiet));
    }
    if no_color {
        builder.write_style(WriteStyle::Never);
    }
    apply_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
        return;
    }
    if from_env {
        log::debug!("Log level taken from RUST_LOG");
    } else {
        log::debug!("Log level: {:?}", level_for(verbose, quiet));
    }
}

/// Map CLI flags to a level filter. `quiet` wins over `verbose`.
fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

#[cfg(debug_assertions)]
fn apply_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let style = buf.default_level_style(record.level());
        let ts = buf.timestamp_seconds();
        if verbose > 0 {
            writeln!(
                buf,
                "{ts} {style}{:<5}{style:#} [{}] {}",
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{ts} {style}{:<5}{style:#} {}", record.level(), record.args())
        }
    });
}

#[cfg(not(debug_assertions))]
fn apply_format(builder: &mut Builder, _verbose: u8) {
    builder.format(|buf, record| {
        let style = buf.default_level_style(record.level());
        writeln!(buf, "{style}{:<5}{style:#} {}", record.level(), record.args())
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_default() {
        assert_eq!(level_for(0, false), LevelFilter::Info);
    }

    #[test]
    fn test_level_verbose_and_trace() {
        assert_eq!(level_for(1, false), LevelFilter::Debug);
        assert_eq!(level_for(2, false), LevelFilter::Trace);
        assert_eq!(level_for(5, false), LevelFilter::Trace);
    }

    #[test]
    fn test_level_quiet_overrides_verbose() {
        assert_eq!(level_for(0, true), LevelFilter::Error);
        assert_eq!(level_for(2, true), LevelFilter::Error);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logging(0, true, true);
        init_logging(0, true, true);
    }
}
