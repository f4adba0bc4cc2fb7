//! Row and header lookups: exact, approximate, index/match and hlookup.
//!
//! All lookup misses yield the [`ExpectedValue::NotFound`] sentinel, never
//! an error: "no matching row" is a legitimate expected answer that is
//! persisted and compared as-is at grading time.

use super::{Execution, cell_to_expected, column_values};
use crate::error::GraderError;
use crate::types::ExpectedValue;
use util::dataset::{CellValue, Dataset};

/// First row whose search cell equals the search value; numbers compare
/// numerically, text case-insensitively.
pub fn exact_lookup(
    dataset: &Dataset,
    search_column: &str,
    search_value: &CellValue,
    return_column: &str,
) -> Result<Execution, GraderError> {
    let keys = column_values(dataset, search_column)?;
    let returns = column_values(dataset, return_column)?;

    for (row, key) in keys.iter().enumerate() {
        if lookup_equals(key, search_value) {
            return Ok(found(returns[row], row));
        }
    }
    Ok(not_found())
}

/// Closest-below bracket lookup over a column the caller sorted ascending.
///
/// Scans rows in order and keeps the last row whose key is less than or
/// equal to the search value; a search value below the first key yields
/// the not-found sentinel. This mirrors bracket tables (tax brackets,
/// grade scales) rather than nearest-value search. The engine does not
/// sort and does not verify the ordering.
pub fn approximate_lookup(
    dataset: &Dataset,
    search_column: &str,
    search_value: &CellValue,
    return_column: &str,
) -> Result<Execution, GraderError> {
    let keys = column_values(dataset, search_column)?;
    let returns = column_values(dataset, return_column)?;
    let Some(target) = search_value.as_number() else {
        return Ok(not_found());
    };

    let mut best: Option<usize> = None;
    for (row, key) in keys.iter().enumerate() {
        match key.as_number() {
            Some(k) if k <= target => best = Some(row),
            _ => {}
        }
    }

    Ok(match best {
        Some(row) => found(returns[row], row),
        None => not_found(),
    })
}

/// First-match positional lookup: the row index where the search column
/// equals the search value, read back from the return column.
pub fn index_match(
    dataset: &Dataset,
    search_column: &str,
    search_value: &CellValue,
    return_column: &str,
) -> Result<Execution, GraderError> {
    let keys = column_values(dataset, search_column)?;
    let returns = column_values(dataset, return_column)?;

    match keys.iter().position(|key| lookup_equals(key, search_value)) {
        Some(row) => Ok(found(returns[row], row)),
        None => Ok(not_found()),
    }
}

/// Horizontal lookup across the headers, which act as logical row 1.
///
/// `row_index` is 1-based counting the header row itself: 1 returns the
/// header, 2 the first data row, and so on. An unknown header or an
/// out-of-range row yields the sentinel.
pub fn hlookup(
    dataset: &Dataset,
    search_value: &str,
    row_index: usize,
) -> Result<Execution, GraderError> {
    let Some(col) = dataset
        .headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(search_value))
    else {
        return Ok(not_found());
    };

    if row_index == 0 {
        return Ok(not_found());
    }
    if row_index == 1 {
        return Ok(Execution {
            value: ExpectedValue::Text(dataset.headers[col].clone()),
            details: vec!["matched the header row".to_string()],
        });
    }

    match dataset.rows.get(row_index - 2) {
        Some(row) => Ok(found(&row[col], row_index - 2)),
        None => Ok(not_found()),
    }
}

fn lookup_equals(cell: &CellValue, search: &CellValue) -> bool {
    match (cell.as_number(), search.as_number()) {
        (Some(a), Some(b)) => a == b,
        _ => cell.as_text().eq_ignore_ascii_case(&search.as_text()),
    }
}

fn found(cell: &CellValue, row: usize) -> Execution {
    Execution {
        value: cell_to_expected(cell),
        details: vec![format!("matched row {}", row + 1)],
    }
}

fn not_found() -> Execution {
    Execution {
        value: ExpectedValue::NotFound,
        details: vec!["no matching row".to_string()],
    }
}
