//! # Computation Executor Module
//!
//! Runs a resolved [`Computation`] against a dataset and produces the
//! expected answer for a checkpoint. Execution is pure and deterministic:
//! the same `(computation, dataset)` pair always yields the same value.
//!
//! Variant semantics live in the submodules: plain aggregates and
//! elementwise products in [`aggregates`], criteria-driven aggregates in
//! [`conditional_sums`], row/header lookups in [`lookups`]. Dispatch and
//! the shared column plumbing live here.

pub mod aggregates;
pub mod conditional_sums;
pub mod lookups;

use crate::computation::Computation;
use crate::criteria;
use crate::error::GraderError;
use crate::types::ExpectedValue;
use util::dataset::{CellValue, Dataset};

/// Outcome of executing one computation: the expected value plus
/// execution details for diagnostics (row counts, truncation warnings).
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub value: ExpectedValue,
    pub details: Vec<String>,
}

impl Execution {
    fn number(value: f64, detail: String) -> Self {
        Execution { value: ExpectedValue::Number(value), details: vec![detail] }
    }
}

/// Execute a resolved computation against a dataset.
///
/// Fails with [`GraderError::ColumnNotFound`] when a named column is
/// absent from the headers (an authoring-time defect once the resolver
/// has run against the real dataset). Lookup misses are not failures;
/// they yield the [`ExpectedValue::NotFound`] sentinel.
pub fn execute(computation: &Computation, dataset: &Dataset) -> Result<Execution, GraderError> {
    match computation {
        Computation::Sum { column } => {
            let values = column_values(dataset, column)?;
            let (sum, used) = aggregates::sum(&values);
            Ok(Execution::number(
                sum,
                format!("summed {used} numeric values in '{column}'"),
            ))
        }
        Computation::Average { column } => {
            let values = column_values(dataset, column)?;
            let (avg, used) = aggregates::average(&values);
            Ok(Execution::number(
                avg,
                format!("averaged {used} numeric values in '{column}'"),
            ))
        }
        Computation::Min { column } => {
            let values = column_values(dataset, column)?;
            Ok(Execution::number(
                aggregates::min(&values),
                format!("minimum of '{column}'"),
            ))
        }
        Computation::Max { column } => {
            let values = column_values(dataset, column)?;
            Ok(Execution::number(
                aggregates::max(&values),
                format!("maximum of '{column}'"),
            ))
        }
        Computation::Count { column } => {
            let values = column_values(dataset, column)?;
            Ok(Execution::number(
                aggregates::count(&values) as f64,
                format!("counted numeric values in '{column}'"),
            ))
        }
        Computation::CountA { column } => {
            let values = column_values(dataset, column)?;
            Ok(Execution::number(
                aggregates::counta(&values) as f64,
                format!("counted non-empty values in '{column}'"),
            ))
        }
        Computation::CountIf { column, criteria } => {
            let values = column_values(dataset, column)?;
            let matched = conditional_sums::countif(&values, criteria);
            Ok(Execution::number(
                matched as f64,
                format!("{matched} of {} values in '{column}' match '{criteria}'", values.len()),
            ))
        }
        Computation::CountIfs { criteria } => conditional_sums::countifs(dataset, criteria),
        Computation::SumIf { criteria_column, criteria, sum_column } => {
            conditional_sums::sumif(dataset, criteria_column, criteria, sum_column)
        }
        Computation::SumIfs { sum_column, criteria } => {
            conditional_sums::sumifs(dataset, sum_column, criteria)
        }
        Computation::AverageIf { criteria_column, criteria, average_column } => {
            conditional_sums::averageif(dataset, criteria_column, criteria, average_column)
        }
        Computation::Lookup { search_column, search_value, return_column, approximate } => {
            if *approximate {
                lookups::approximate_lookup(dataset, search_column, search_value, return_column)
            } else {
                lookups::exact_lookup(dataset, search_column, search_value, return_column)
            }
        }
        Computation::IndexMatch { search_column, search_value, return_column } => {
            lookups::index_match(dataset, search_column, search_value, return_column)
        }
        Computation::HLookup { search_value, row_index } => {
            lookups::hlookup(dataset, search_value, *row_index)
        }
        Computation::SumProduct { columns } => aggregates::sumproduct(dataset, columns),
        Computation::Conditional { value, condition, if_true, if_false } => {
            let payload = criteria::evaluate_condition(value, condition, if_true, if_false);
            Ok(Execution {
                value: ExpectedValue::Text(payload.to_string()),
                details: vec![format!("condition '{condition}' evaluated")],
            })
        }
        // Manual checkpoints carry an authored expected value; there is
        // nothing to compute here.
        Computation::Manual => Err(GraderError::MissingField(
            "manual computation requires an authored expected_value".to_string(),
        )),
    }
}

/// Cells of a named column, or [`GraderError::ColumnNotFound`].
pub(crate) fn column_values<'a>(
    dataset: &'a Dataset,
    name: &str,
) -> Result<Vec<&'a CellValue>, GraderError> {
    let index = dataset
        .column_index(name)
        .ok_or_else(|| GraderError::ColumnNotFound(name.to_string()))?;
    Ok(dataset.column(index))
}

/// Render a found cell as an expected value.
pub(crate) fn cell_to_expected(cell: &CellValue) -> ExpectedValue {
    match cell {
        CellValue::Number(n) => ExpectedValue::Number(*n),
        CellValue::Text(s) => ExpectedValue::Text(s.clone()),
        CellValue::Empty => ExpectedValue::Text(String::new()),
    }
}
