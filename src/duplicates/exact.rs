//! Exact-value duplicate detection.
//!
//! Rows are grouped by the value in one column; every group with two or more
//! members is a duplicate group. The result holds the union of those groups
//! in original row order.
//!
//! # Example
//!
//! ```
//! use datadupe::duplicates::find_exact_duplicates;
//! use datadupe::table::{CellValue, Table};
//!
//! let mut table = Table::new(vec!["ID".to_string()]);
//! for id in [1.0, 2.0, 2.0, 3.0, 3.0, 3.0] {
//!     table.push_row(vec![CellValue::Number(id)]).unwrap();
//! }
//!
//! let outcome = find_exact_duplicates(&table, 0).expect("duplicates");
//! assert_eq!(outcome.rows, vec![1, 2, 3, 4, 5]);
//! ```

use std::collections::HashMap;

use crate::table::{CellValue, Table};

/// Hashable equality class of a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Number(u64),
    Text(String),
    Bool(bool),
    Missing,
}

impl From<&CellValue> for GroupKey {
    fn from(value: &CellValue) -> Self {
        match value {
            // Fold -0.0 into 0.0 so equal numbers share a bit pattern.
            CellValue::Number(n) => Self::Number((n + 0.0).to_bits()),
            CellValue::Text(s) => Self::Text(s.clone()),
            CellValue::Bool(b) => Self::Bool(*b),
            CellValue::Missing => Self::Missing,
        }
    }
}

/// Rows found by exact matching.
#[derive(Debug, Clone, PartialEq)]
pub struct ExactOutcome {
    /// Indices of duplicate rows (0-based, ascending)
    pub rows: Vec<usize>,
    /// Number of distinct values that occur more than once
    pub groups: usize,
    /// The duplicate rows as a table, in original order
    pub table: Table,
}

/// Find rows whose value in `column` occurs at least twice.
///
/// Missing values form one equality class of their own, so two missing
/// cells are duplicates of each other. Returns `None` when every value is
/// unique; in that case nothing should be written.
///
/// # Panics
///
/// Panics if `column` is out of range; validate it with
/// [`Table::require_column`] first.
#[must_use]
pub fn find_exact_duplicates(table: &Table, column: usize) -> Option<ExactOutcome> {
    log::info!(
        "Exact match: grouping {} rows by column '{}'",
        table.row_count(),
        table.columns()[column]
    );

    let mut groups: HashMap<GroupKey, Vec<usize>> = HashMap::new();
    for (idx, value) in table.column_values(column).enumerate() {
        groups.entry(GroupKey::from(value)).or_default().push(idx);
    }

    let mut rows: Vec<usize> = Vec::new();
    let mut group_count = 0;
    for members in groups.values().filter(|m| m.len() > 1) {
        log::debug!(
            "Duplicate value in {} rows: {:?}",
            members.len(),
            table.cell(members[0], column)
        );
        group_count += 1;
        rows.extend_from_slice(members);
    }

    if rows.is_empty() {
        log::info!("Exact match: no duplicate values");
        return None;
    }

    rows.sort_unstable();
    log::info!(
        "Exact match complete: {} duplicate rows in {} groups",
        rows.len(),
        group_count
    );

    Some(ExactOutcome {
        table: table.select_rows(&rows),
        rows,
        groups: group_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_column(values: Vec<CellValue>) -> Table {
        let mut t = Table::new(vec!["v".into()]);
        for v in values {
            t.push_row(vec![v]).unwrap();
        }
        t
    }

    #[test]
    fn test_exact_groups_numbers() {
        let t = single_column([1.0, 2.0, 2.0, 3.0, 3.0, 3.0].map(CellValue::Number).to_vec());
        let outcome = find_exact_duplicates(&t, 0).unwrap();
        assert_eq!(outcome.rows, vec![1, 2, 3, 4, 5]);
        assert_eq!(outcome.groups, 2);
        assert_eq!(outcome.table.row_count(), 5);
    }

    #[test]
    fn test_exact_all_unique_is_none() {
        let t = single_column(vec!["a".into(), "b".into(), "c".into()]);
        assert!(find_exact_duplicates(&t, 0).is_none());
    }

    #[test]
    fn test_exact_empty_table_is_none() {
        let t = Table::new(vec!["v".into()]);
        assert!(find_exact_duplicates(&t, 0).is_none());
    }

    #[test]
    fn test_exact_keeps_input_order_not_group_order() {
        let t = single_column(vec!["b".into(), "a".into(), "b".into(), "a".into()]);
        let outcome = find_exact_duplicates(&t, 0).unwrap();
        assert_eq!(outcome.rows, vec![0, 1, 2, 3]);
        assert_eq!(outcome.table.cell(0, 0), Some(&CellValue::from("b")));
        assert_eq!(outcome.table.cell(1, 0), Some(&CellValue::from("a")));
    }

    #[test]
    fn test_exact_missing_values_match_each_other() {
        let t = single_column(vec![CellValue::Missing, "x".into(), CellValue::Missing]);
        let outcome = find_exact_duplicates(&t, 0).unwrap();
        assert_eq!(outcome.rows, vec![0, 2]);
    }

    #[test]
    fn test_exact_is_case_and_whitespace_sensitive() {
        let t = single_column(vec!["Bob".into(), "bob".into(), "Bob ".into()]);
        assert!(find_exact_duplicates(&t, 0).is_none());
    }

    #[test]
    fn test_exact_signed_zero() {
        let t = single_column(vec![CellValue::Number(0.0), CellValue::Number(-0.0)]);
        assert_eq!(find_exact_duplicates(&t, 0).unwrap().rows, vec![0, 1]);
    }

    #[test]
    fn test_exact_only_looks_at_target_column() {
        let mut t = Table::new(vec!["key".into(), "other".into()]);
        t.push_row(vec!["k1".into(), "same".into()]).unwrap();
        t.push_row(vec!["k2".into(), "same".into()]).unwrap();
        assert!(find_exact_duplicates(&t, 0).is_none());
        assert_eq!(find_exact_duplicates(&t, 1).unwrap().rows, vec![0, 1]);
    }
}
