//! Property-based tests for duplicate detection, similarity and scaling.

use datadupe::duplicates::{
    find_exact_duplicates, partial_ratio, scan_parallel, scan_sequential, FuzzyConfig,
};
use datadupe::table::{CellValue, Table};
use datadupe::transform::scale;
use proptest::prelude::*;
use std::collections::HashMap;

fn table_from_keys(keys: &[String]) -> Table {
    let mut table = Table::new(vec!["key".into(), "pos".into()]);
    for (i, key) in keys.iter().enumerate() {
        table
            .push_row(vec![CellValue::from(key.as_str()), CellValue::Number(i as f64)])
            .unwrap();
    }
    table
}

proptest! {
    #[test]
    fn prop_exact_rows_are_exactly_the_repeated_values(
        keys in prop::collection::vec("[a-c]{0,2}", 0..30)
    ) {
        let table = table_from_keys(&keys);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for key in &keys {
            *counts.entry(key.as_str()).or_default() += 1;
        }
        let expected: Vec<usize> = keys
            .iter()
            .enumerate()
            .filter(|(_, k)| counts[k.as_str()] > 1)
            .map(|(i, _)| i)
            .collect();

        match find_exact_duplicates(&table, 0) {
            None => prop_assert!(expected.is_empty()),
            Some(outcome) => {
                prop_assert_eq!(&outcome.rows, &expected);
                prop_assert_eq!(outcome.table.row_count(), expected.len());
                for (out_row, &src_row) in outcome.table.rows().iter().zip(&expected) {
                    prop_assert_eq!(out_row, &table.rows()[src_row]);
                }
            }
        }
    }

    #[test]
    fn prop_partial_ratio_bounds_and_identity(a in "[a-e ]{0,12}", b in "[a-e ]{0,12}") {
        let score = partial_ratio(&a, &b);
        prop_assert!(score <= 100);
        prop_assert_eq!(partial_ratio(&a, &a), 100);
        if a.is_empty() != b.is_empty() {
            prop_assert_eq!(score, 0);
        }
    }

    #[test]
    fn prop_substring_scores_full(s in "[a-z]{1,10}", pre in "[a-z]{0,5}", post in "[a-z]{0,5}") {
        let long = format!("{pre}{s}{post}");
        prop_assert_eq!(partial_ratio(&s, &long), 100);
    }

    #[test]
    fn prop_parallel_scan_matches_sequential(
        keys in prop::collection::vec("[ab]{0,4}", 0..25),
        threshold in 0i32..=100
    ) {
        let config = FuzzyConfig::default().with_threshold(threshold).with_threads(2);
        let sequential = scan_sequential(&keys, threshold);
        prop_assert_eq!(scan_parallel(&keys, &config), sequential.clone());

        // A row is flagged iff some other row scores at or above the threshold
        for (i, &flag) in sequential.iter().enumerate() {
            let any = (0..keys.len()).any(|j| {
                let (lo, hi) = (i.min(j), i.max(j));
                j != i && i32::from(partial_ratio(&keys[lo], &keys[hi])) >= threshold
            });
            prop_assert_eq!(flag, any);
        }
    }

    #[test]
    fn prop_zero_percent_is_identity(values in prop::collection::vec(-1e6f64..1e6, 1..20)) {
        let mut table = Table::new(vec!["v".into()]);
        for v in &values {
            table.push_row(vec![CellValue::Number(*v)]).unwrap();
        }
        let outcome = scale(&table, 0.0);
        prop_assert_eq!(outcome.table.rows(), table.rows());
        prop_assert_eq!(outcome.scaled_columns, vec!["v".to_string()]);
    }
}
