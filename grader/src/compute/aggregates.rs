//! Plain column aggregates and the elementwise product.
//!
//! Numeric coercion goes through [`CellValue::as_number`]; values that do
//! not coerce are excluded from numeric aggregates. Empty-set conventions
//! are deliberately non-mathematical to keep output types uniform:
//! `average`, `min` and `max` of zero values all yield 0 rather than an
//! error or an infinity.

use super::Execution;
use crate::error::GraderError;
use crate::types::ExpectedValue;
use util::dataset::{CellValue, Dataset};

/// Sum of the numeric values; also reports how many cells were used.
pub fn sum(values: &[&CellValue]) -> (f64, usize) {
    let numbers: Vec<f64> = values.iter().filter_map(|c| c.as_number()).collect();
    (numbers.iter().sum(), numbers.len())
}

/// Average of the numeric values; 0 when there are none.
pub fn average(values: &[&CellValue]) -> (f64, usize) {
    let (total, used) = sum(values);
    if used == 0 {
        (0.0, 0)
    } else {
        (total / used as f64, used)
    }
}

/// Minimum of the numeric values; 0 when there are none.
pub fn min(values: &[&CellValue]) -> f64 {
    values
        .iter()
        .filter_map(|c| c.as_number())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))))
        .unwrap_or(0.0)
}

/// Maximum of the numeric values; 0 when there are none.
pub fn max(values: &[&CellValue]) -> f64 {
    values
        .iter()
        .filter_map(|c| c.as_number())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .unwrap_or(0.0)
}

/// Count of cells holding (or coercing to) a number.
pub fn count(values: &[&CellValue]) -> usize {
    values.iter().filter(|c| c.as_number().is_some()).count()
}

/// Count of non-empty cells.
pub fn counta(values: &[&CellValue]) -> usize {
    values.iter().filter(|c| !c.is_empty()).count()
}

/// Elementwise multiply across the named columns, then sum.
///
/// Columns of unequal length are truncated to the shortest one rather than
/// erroring; strict spreadsheet behavior errors on the mismatch, so the
/// relaxation is surfaced as a warning in the execution details.
/// Non-numeric cells contribute 0 to their product.
pub fn sumproduct(dataset: &Dataset, columns: &[String]) -> Result<Execution, GraderError> {
    let mut resolved: Vec<Vec<f64>> = Vec::with_capacity(columns.len());
    for name in columns {
        let cells = super::column_values(dataset, name)?;
        resolved.push(cells.iter().map(|c| c.as_number().unwrap_or(0.0)).collect());
    }

    let mut details = Vec::new();
    let shortest = resolved.iter().map(Vec::len).min().unwrap_or(0);
    if resolved.iter().any(|col| col.len() != shortest) {
        tracing::warn!(shortest, "sumproduct columns truncated to shortest length");
        details.push(format!("columns truncated to {shortest} rows"));
    }

    let total: f64 = (0..shortest)
        .map(|i| resolved.iter().map(|col| col[i]).product::<f64>())
        .sum();

    details.push(format!(
        "product of {} columns over {shortest} rows",
        columns.len()
    ));
    Ok(Execution { value: ExpectedValue::Number(total), details })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[f64]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::Number(*v)).collect()
    }

    fn refs(cells: &[CellValue]) -> Vec<&CellValue> {
        cells.iter().collect()
    }

    #[test]
    fn test_sum_skips_non_numeric() {
        let owned = vec![
            CellValue::Number(10.0),
            CellValue::Text("Paris".to_string()),
            CellValue::Text("5".to_string()),
            CellValue::Empty,
        ];
        let (total, used) = sum(&refs(&owned));
        assert_eq!(total, 15.0);
        assert_eq!(used, 2);
    }

    #[test]
    fn test_empty_set_conventions() {
        let owned: Vec<CellValue> = vec![CellValue::Empty, CellValue::Text("x".to_string())];
        let values = refs(&owned);
        assert_eq!(average(&values).0, 0.0);
        assert_eq!(min(&values), 0.0);
        assert_eq!(max(&values), 0.0);
    }

    #[test]
    fn test_min_max() {
        let owned = cells(&[30.0, 10.0, 50.0]);
        let values = refs(&owned);
        assert_eq!(min(&values), 10.0);
        assert_eq!(max(&values), 50.0);
    }

    #[test]
    fn test_negative_min_is_not_clamped_to_zero() {
        let owned = cells(&[-5.0, -2.0]);
        assert_eq!(min(&refs(&owned)), -5.0);
        assert_eq!(max(&refs(&owned)), -2.0);
    }

    #[test]
    fn test_count_and_counta() {
        let owned = vec![
            CellValue::Number(1.0),
            CellValue::Text("x".to_string()),
            CellValue::Text("2".to_string()),
            CellValue::Empty,
        ];
        let values = refs(&owned);
        assert_eq!(count(&values), 2);
        assert_eq!(counta(&values), 3);
    }

    #[test]
    fn test_sumproduct() {
        let ds = Dataset::new(
            vec!["Qty".to_string(), "Price".to_string()],
            vec![
                vec![CellValue::Number(2.0), CellValue::Number(10.0)],
                vec![CellValue::Number(3.0), CellValue::Number(5.0)],
            ],
        )
        .unwrap();
        let execution =
            sumproduct(&ds, &["Qty".to_string(), "Price".to_string()]).unwrap();
        assert_eq!(execution.value, ExpectedValue::Number(35.0));
    }

    #[test]
    fn test_sumproduct_treats_non_numeric_as_zero() {
        let ds = Dataset::new(
            vec!["A".to_string(), "B".to_string()],
            vec![
                vec![CellValue::Number(2.0), CellValue::Text("x".to_string())],
                vec![CellValue::Number(3.0), CellValue::Number(5.0)],
            ],
        )
        .unwrap();
        let execution = sumproduct(&ds, &["A".to_string(), "B".to_string()]).unwrap();
        assert_eq!(execution.value, ExpectedValue::Number(15.0));
    }
}
