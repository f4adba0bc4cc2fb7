//! Tabular dataset model consumed by the grading engine.
//!
//! A [`Dataset`] is the immutable input every computation runs against:
//! an ordered list of unique headers plus rows of cells aligned to those
//! headers. The upstream provider is expected to have type-coerced values
//! already (numeric strings arrive as numbers); this module never re-parses
//! raw text into cells.

pub mod stats;

use serde::{Deserialize, Serialize};

/// One cell of a dataset: a number, a text value, or nothing.
///
/// `Empty` covers both missing cells and explicit blanks; numeric
/// aggregates skip it, `counta` counts everything that is not `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// Numeric view of the cell. Text cells are coerced through a standard
    /// float parse ("10" reads as 10.0); anything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Empty => None,
        }
    }

    /// Stringified view, used for criteria matching and display.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// An immutable table: unique ordered headers plus rows aligned to them.
///
/// Construction validates the row-shape invariant (every row has exactly
/// `headers.len()` cells); after that the engine only reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Build a dataset, validating that every row matches the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, String> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(format!(
                    "Row {} has {} cells but the dataset has {} headers",
                    i,
                    row.len(),
                    headers.len()
                ));
            }
        }
        Ok(Dataset { headers, rows })
    }

    /// Find a column by name: case-insensitive exact match first, then
    /// case-insensitive substring containment, first hit wins.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let needle = name.to_lowercase();
        self.headers
            .iter()
            .position(|h| h.to_lowercase() == needle)
            .or_else(|| {
                self.headers
                    .iter()
                    .position(|h| h.to_lowercase().contains(&needle))
            })
    }

    /// All cells of one column, in row order.
    pub fn column(&self, index: usize) -> Vec<&CellValue> {
        self.rows.iter().map(|row| &row[index]).collect()
    }
}
