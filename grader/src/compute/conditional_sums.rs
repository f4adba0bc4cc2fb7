//! Criteria-driven aggregates: `countif`, `countifs`, `sumif`, `sumifs`
//! and `averageif`.
//!
//! Multi-criteria variants AND their `(column, criteria)` pairs row by
//! row. Missing numeric values in the summed column are treated as 0, so
//! a partial row (criteria present, value missing) is effectively excluded
//! from the total without failing the whole computation.

use super::{Execution, column_values};
use crate::computation::ResolvedCriteria;
use crate::criteria;
use crate::error::GraderError;
use crate::types::ExpectedValue;
use util::dataset::{CellValue, Dataset};

/// Count of values satisfying the criteria.
pub fn countif(values: &[&CellValue], criteria_expr: &str) -> usize {
    values
        .iter()
        .filter(|v| criteria::matches(v, Some(criteria_expr)))
        .count()
}

/// Count of rows satisfying every `(column, criteria)` pair.
pub fn countifs(dataset: &Dataset, entries: &[ResolvedCriteria]) -> Result<Execution, GraderError> {
    let matched = matching_rows(dataset, entries)?.len();
    Ok(Execution {
        value: ExpectedValue::Number(matched as f64),
        details: vec![format!(
            "{matched} of {} rows match all {} criteria",
            dataset.rows.len(),
            entries.len()
        )],
    })
}

/// Sum of `sum_column` over rows satisfying one `(column, criteria)` pair.
pub fn sumif(
    dataset: &Dataset,
    criteria_column: &str,
    criteria_expr: &str,
    sum_column: &str,
) -> Result<Execution, GraderError> {
    let entry = ResolvedCriteria {
        column: criteria_column.to_string(),
        criteria: criteria_expr.to_string(),
    };
    sum_over_matches(dataset, sum_column, std::slice::from_ref(&entry))
}

/// Sum of `sum_column` over rows satisfying every `(column, criteria)` pair.
pub fn sumifs(
    dataset: &Dataset,
    sum_column: &str,
    entries: &[ResolvedCriteria],
) -> Result<Execution, GraderError> {
    sum_over_matches(dataset, sum_column, entries)
}

/// Average of `average_column` over rows satisfying the criteria; 0 when
/// no row matches.
pub fn averageif(
    dataset: &Dataset,
    criteria_column: &str,
    criteria_expr: &str,
    average_column: &str,
) -> Result<Execution, GraderError> {
    let entry = ResolvedCriteria {
        column: criteria_column.to_string(),
        criteria: criteria_expr.to_string(),
    };
    let rows = matching_rows(dataset, std::slice::from_ref(&entry))?;
    let value_index = dataset
        .column_index(average_column)
        .ok_or_else(|| GraderError::ColumnNotFound(average_column.to_string()))?;

    let total: f64 = rows
        .iter()
        .map(|&row| dataset.rows[row][value_index].as_number().unwrap_or(0.0))
        .sum();
    let average = if rows.is_empty() { 0.0 } else { total / rows.len() as f64 };

    Ok(Execution {
        value: ExpectedValue::Number(average),
        details: vec![format!(
            "averaged '{average_column}' over {} matching rows",
            rows.len()
        )],
    })
}

fn sum_over_matches(
    dataset: &Dataset,
    sum_column: &str,
    entries: &[ResolvedCriteria],
) -> Result<Execution, GraderError> {
    let rows = matching_rows(dataset, entries)?;
    let value_index = dataset
        .column_index(sum_column)
        .ok_or_else(|| GraderError::ColumnNotFound(sum_column.to_string()))?;

    // Missing numeric values count as 0: partial rows drop out of the sum.
    let total: f64 = rows
        .iter()
        .map(|&row| dataset.rows[row][value_index].as_number().unwrap_or(0.0))
        .sum();

    Ok(Execution {
        value: ExpectedValue::Number(total),
        details: vec![format!(
            "summed '{sum_column}' over {} matching rows",
            rows.len()
        )],
    })
}

/// Indices of rows whose every `(column, criteria)` pair matches. All
/// criteria columns must exist.
fn matching_rows(
    dataset: &Dataset,
    entries: &[ResolvedCriteria],
) -> Result<Vec<usize>, GraderError> {
    let mut indexed: Vec<(usize, &str)> = Vec::with_capacity(entries.len());
    for entry in entries {
        let index = dataset
            .column_index(&entry.column)
            .ok_or_else(|| GraderError::ColumnNotFound(entry.column.clone()))?;
        indexed.push((index, entry.criteria.as_str()));
    }

    Ok((0..dataset.rows.len())
        .filter(|&row| {
            indexed
                .iter()
                .all(|(col, expr)| criteria::matches(&dataset.rows[row][*col], Some(expr)))
        })
        .collect())
}
