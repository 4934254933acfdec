//! Uniform percentage rescaling of numeric columns.
//!
//! Every column whose present cells all parse as numbers is multiplied by
//! `1 + percentage / 100`; every other column is copied unchanged. The
//! percentage is not clamped. Identifier-like numeric columns are scaled too.

use crate::table::{CellValue, ColumnKind, Table};

/// Result of a scaling pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleOutcome {
    /// Scaled table, same shape and order as the input
    pub table: Table,
    /// Names of the columns that were scaled
    pub scaled_columns: Vec<String>,
}

/// Multiplier applied for `percentage`.
#[must_use]
pub fn factor(percentage: f64) -> f64 {
    1.0 + percentage / 100.0
}

/// Scale all numeric columns of `table` by `percentage` percent.
///
/// Missing cells stay missing. Text cells in a numeric column that hold a
/// number become numbers.
///
/// # Example
///
/// ```
/// use datadupe::table::{CellValue, Table};
/// use datadupe::transform::scale;
///
/// let mut table = Table::new(vec!["price".to_string(), "sku".to_string()]);
/// table.push_row(vec![CellValue::Number(10.0), CellValue::from("A-1")]).unwrap();
///
/// let outcome = scale(&table, 100.0);
/// assert_eq!(outcome.table.cell(0, 0), Some(&CellValue::Number(20.0)));
/// assert_eq!(outcome.table.cell(0, 1), Some(&CellValue::from("A-1")));
/// assert_eq!(outcome.scaled_columns, vec!["price".to_string()]);
/// ```
#[must_use]
pub fn scale(table: &Table, percentage: f64) -> ScaleOutcome {
    let multiplier = factor(percentage);
    log::info!(
        "Scaling numeric columns by {}% (factor {})",
        percentage,
        multiplier
    );

    let mut result = table.clone();
    let mut scaled_columns = Vec::new();
    for (idx, name) in table.columns().iter().enumerate() {
        if table.column_kind(idx) != ColumnKind::Numeric {
            log::debug!("Column '{}' is not numeric, leaving unchanged", name);
            continue;
        }
        log::debug!("Scaling column '{}'", name);
        result = result.map_column(idx, |cell| match cell.as_number() {
            Some(n) => CellValue::Number(n * multiplier),
            None => cell.clone(),
        });
        scaled_columns.push(name.clone());
    }

    log::info!("Scaled {} of {} columns", scaled_columns.len(), table.column_count());
    ScaleOutcome {
        table: result,
        scaled_columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new(vec!["id".into(), "name".into(), "price".into()]);
        t.push_row(vec![1.0.into(), "a".into(), 10.0.into()]).unwrap();
        t.push_row(vec![2.0.into(), "b".into(), CellValue::Missing])
            .unwrap();
        t.push_row(vec![3.0.into(), "c".into(), 4.5.into()]).unwrap();
        t
    }

    #[test]
    fn test_factor() {
        assert_eq!(factor(0.0), 1.0);
        assert_eq!(factor(100.0), 2.0);
        assert_eq!(factor(-50.0), 0.5);
        assert_eq!(factor(-200.0), -1.0);
    }

    #[test]
    fn test_scale_zero_is_identity() {
        let t = sample();
        let outcome = scale(&t, 0.0);
        assert_eq!(outcome.table, t);
    }

    #[test]
    fn test_scale_doubles_and_keeps_missing() {
        let outcome = scale(&sample(), 100.0);
        assert_eq!(outcome.table.cell(0, 2), Some(&CellValue::Number(20.0)));
        assert_eq!(outcome.table.cell(1, 2), Some(&CellValue::Missing));
        assert_eq!(outcome.table.cell(2, 2), Some(&CellValue::Number(9.0)));
        // Identifier columns are numeric too
        assert_eq!(outcome.table.cell(2, 0), Some(&CellValue::Number(6.0)));
        assert_eq!(outcome.scaled_columns, vec!["id", "price"]);
    }

    #[test]
    fn test_scale_negative_halves() {
        let outcome = scale(&sample(), -50.0);
        assert_eq!(outcome.table.cell(0, 2), Some(&CellValue::Number(5.0)));
        assert_eq!(outcome.table.cell(1, 1), Some(&CellValue::from("b")));
    }

    #[test]
    fn test_scale_leaves_text_and_bool_columns() {
        let mut t = Table::new(vec!["flag".into(), "mixed".into()]);
        t.push_row(vec![true.into(), "1".into()]).unwrap();
        t.push_row(vec![false.into(), "x".into()]).unwrap();
        let outcome = scale(&t, 10.0);
        assert_eq!(outcome.table, t);
        assert!(outcome.scaled_columns.is_empty());
    }

    #[test]
    fn test_scale_numeric_text_cells() {
        let mut t = Table::new(vec!["n".into()]);
        t.push_row(vec![" 4 ".into()]).unwrap();
        t.push_row(vec![2.0.into()]).unwrap();
        let outcome = scale(&t, 50.0);
        assert_eq!(outcome.table.cell(0, 0), Some(&CellValue::Number(6.0)));
        assert_eq!(outcome.table.cell(1, 0), Some(&CellValue::Number(3.0)));
    }

    #[test]
    fn test_scale_does_not_mutate_input() {
        let t = sample();
        let before = t.clone();
        let _ = scale(&t, 25.0);
        assert_eq!(t, before);
    }
}
