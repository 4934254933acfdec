//! Threshold-based (fuzzy) duplicate marking.
//!
//! Every pair of rows `(i, j)` with `i < j` is scored with [`partial_ratio`]
//! on the trimmed string form of the target column. When the score reaches
//! the threshold both rows are flagged. A row's flag is the OR over every
//! pair it takes part in, so the order pairs are evaluated in does not
//! matter; rows are split across a rayon pool and flags are set through
//! `AtomicBool`s.
//!
//! # Example
//!
//! ```
//! use datadupe::duplicates::{find_fuzzy_duplicates, FuzzyConfig};
//! use datadupe::table::{CellValue, Table};
//!
//! let mut table = Table::new(vec!["name".to_string()]);
//! for name in ["Acme Corp", "Acme Corp.", "Globex"] {
//!     table.push_row(vec![CellValue::from(name)]).unwrap();
//! }
//!
//! let outcome = find_fuzzy_duplicates(&table, 0, &FuzzyConfig::default());
//! assert_eq!(outcome.flags, vec![true, true, false]);
//! assert_eq!(outcome.flagged, 2);
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::similarity::partial_ratio;
use crate::progress::ProgressCallback;
use crate::table::{CellValue, Table, DUPLICATE_FLAG_COLUMN};

/// Threshold used when none is given.
pub const DEFAULT_THRESHOLD: i32 = 90;

/// Configuration for the fuzzy scan.
#[derive(Clone)]
pub struct FuzzyConfig {
    /// Minimum score (inclusive) for a pair to count as duplicates.
    /// Not clamped: values above 100 never match, values at or below 0 always do.
    pub threshold: i32,
    /// Worker threads for pair evaluation; 0 means rayon's default.
    pub threads: usize,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FuzzyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzyConfig")
            .field("threshold", &self.threshold)
            .field("threads", &self.threads)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            threads: 0,
            progress_callback: None,
        }
    }
}

impl FuzzyConfig {
    /// Set the match threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the number of worker threads (0 = rayon default).
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Result of a fuzzy scan.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyOutcome {
    /// Input table with the `IsDuplicate` column appended
    pub table: Table,
    /// Per-row duplicate flags, in row order
    pub flags: Vec<bool>,
    /// Number of rows flagged
    pub flagged: usize,
}

/// Comparison keys for a column: string form, trimmed.
#[must_use]
pub fn comparison_keys(table: &Table, column: usize) -> Vec<String> {
    table.column_values(column).map(CellValue::as_key).collect()
}

/// Flag rows whose key scores at least `threshold` against some other row.
///
/// Single-threaded reference scan in plain upper-triangular order.
#[must_use]
pub fn scan_sequential(keys: &[String], threshold: i32) -> Vec<bool> {
    let mut flags = vec![false; keys.len()];
    for i in 0..keys.len() {
        for j in i + 1..keys.len() {
            if i32::from(partial_ratio(&keys[i], &keys[j])) >= threshold {
                flags[i] = true;
                flags[j] = true;
            }
        }
    }
    flags
}

/// Parallel version of [`scan_sequential`]; produces the same flags.
///
/// Each worker takes a row `i` and scores it against every `j > i`. Flags
/// only ever go from false to true, so relaxed atomic stores suffice.
#[must_use]
pub fn scan_parallel(keys: &[String], config: &FuzzyConfig) -> Vec<bool> {
    let n = keys.len();
    let flags: Vec<AtomicBool> = (0..n).map(|_| AtomicBool::new(false)).collect();
    let completed = AtomicUsize::new(0);

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start("fuzzy", n);
    }

    let work = || {
        (0..n).into_par_iter().for_each(|i| {
            let key = &keys[i];
            for j in i + 1..n {
                if i32::from(partial_ratio(key, &keys[j])) >= config.threshold {
                    log::trace!("Rows {} and {} match: {:?} ~ {:?}", i, j, key, keys[j]);
                    flags[i].store(true, Ordering::Relaxed);
                    flags[j].store(true, Ordering::Relaxed);
                }
            }
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref callback) = config.progress_callback {
                callback.on_progress(done);
            }
        });
    };

    if config.threads == 0 {
        work();
    } else {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
        {
            Ok(pool) => pool.install(work),
            Err(e) => {
                log::warn!(
                    "Failed to create thread pool ({}), using global pool with {} threads",
                    e,
                    rayon::current_num_threads()
                );
                work();
            }
        }
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end("fuzzy");
    }

    flags.into_iter().map(AtomicBool::into_inner).collect()
}

/// Mark fuzzy duplicates in `column`.
///
/// Always returns a table: the input plus an `IsDuplicate` boolean column.
///
/// # Panics
///
/// Panics if `column` is out of range; validate it with
/// [`Table::require_column`] first.
#[must_use]
pub fn find_fuzzy_duplicates(table: &Table, column: usize, config: &FuzzyConfig) -> FuzzyOutcome {
    let n = table.row_count();
    log::info!(
        "Threshold match: comparing {} rows ({} pairs) on column '{}' at threshold {}",
        n,
        n * n.saturating_sub(1) / 2,
        table.columns()[column],
        config.threshold
    );

    let keys = comparison_keys(table, column);
    let flags = scan_parallel(&keys, config);
    let flagged = flags.iter().filter(|&&f| f).count();

    log::info!("Threshold match complete: {} of {} rows flagged", flagged, n);

    let marked = table.with_column(
        DUPLICATE_FLAG_COLUMN,
        flags.iter().copied().map(CellValue::Bool).collect(),
    );
    FuzzyOutcome {
        table: marked,
        flags,
        flagged,
    }
}
