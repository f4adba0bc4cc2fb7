//! Per-column statistics, computed once per dataset.
//!
//! The stats feed two consumers: the column resolver (which needs type
//! classification, distinct counts and top values to pick a plausible
//! column) and diagnostics. They are a pure derivation of the dataset and
//! live for one grading or generation pass.

use super::{CellValue, Dataset};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Classification of a column's dominant content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Text,
    Date,
    Empty,
}

/// Derived summary for one column.
///
/// Numeric fields are populated only for `Numeric` columns; `distinct_count`
/// and `top_values` only for `Text` columns (ranked by frequency, top 5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub name: String,
    pub column_type: ColumnType,
    pub sum: Option<f64>,
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
    pub distinct_count: Option<usize>,
    pub top_values: Vec<(String, usize)>,
}

/// Compute stats for every column of the dataset, in header order.
pub fn compute_stats(dataset: &Dataset) -> Vec<ColumnStats> {
    let stats: Vec<ColumnStats> = dataset
        .headers
        .iter()
        .enumerate()
        .map(|(idx, name)| column_stats(name, &dataset.column(idx)))
        .collect();
    tracing::debug!(
        columns = stats.len(),
        rows = dataset.rows.len(),
        "computed column statistics"
    );
    stats
}

fn column_stats(name: &str, cells: &[&CellValue]) -> ColumnStats {
    let non_empty: Vec<&CellValue> = cells.iter().copied().filter(|c| !c.is_empty()).collect();
    let column_type = classify(&non_empty);

    let mut stats = ColumnStats {
        name: name.to_string(),
        column_type,
        sum: None,
        average: None,
        min: None,
        max: None,
        median: None,
        distinct_count: None,
        top_values: Vec::new(),
    };

    match column_type {
        ColumnType::Numeric => {
            let mut values: Vec<f64> = non_empty.iter().filter_map(|c| c.as_number()).collect();
            if values.is_empty() {
                return stats;
            }
            let sum: f64 = values.iter().sum();
            stats.sum = Some(sum);
            stats.average = Some(sum / values.len() as f64);
            stats.min = Some(values.iter().copied().fold(f64::INFINITY, f64::min));
            stats.max = Some(values.iter().copied().fold(f64::NEG_INFINITY, f64::max));
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let mid = values.len() / 2;
            stats.median = Some(if values.len() % 2 == 0 {
                (values[mid - 1] + values[mid]) / 2.0
            } else {
                values[mid]
            });
        }
        ColumnType::Text | ColumnType::Date => {
            let mut counts: HashMap<String, usize> = HashMap::new();
            for cell in &non_empty {
                *counts.entry(cell.as_text()).or_insert(0) += 1;
            }
            stats.distinct_count = Some(counts.len());
            let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
            // Frequency descending; ties broken alphabetically for determinism.
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            ranked.truncate(5);
            stats.top_values = ranked;
        }
        ColumnType::Empty => {}
    }

    stats
}

/// Classify by the majority of non-empty cells: numeric if more than half
/// coerce to numbers, date if more than half parse as dates, else text.
fn classify(non_empty: &[&CellValue]) -> ColumnType {
    if non_empty.is_empty() {
        return ColumnType::Empty;
    }
    let numeric = non_empty.iter().filter(|c| c.as_number().is_some()).count();
    if numeric * 2 > non_empty.len() {
        return ColumnType::Numeric;
    }
    let dates = non_empty
        .iter()
        .filter(|c| parse_date(&c.as_text()).is_some())
        .count();
    if dates * 2 > non_empty.len() {
        return ColumnType::Date;
    }
    ColumnType::Text
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text.trim(), fmt).ok())
}
