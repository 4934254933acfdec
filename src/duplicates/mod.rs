//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Exact matching: group rows by a column value (see [`exact`])
//! - Threshold matching: pairwise partial similarity (see [`fuzzy`])
//! - The partial similarity score itself (see [`similarity`])

pub mod exact;
pub mod fuzzy;
pub mod similarity;

pub use exact::{find_exact_duplicates, ExactOutcome};
pub use fuzzy::{
    comparison_keys, find_fuzzy_duplicates, scan_parallel, scan_sequential, FuzzyConfig,
    FuzzyOutcome, DEFAULT_THRESHOLD,
};
pub use similarity::{partial_ratio, MatchBlock, SequenceMatcher};
