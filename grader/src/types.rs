//! # Types Module
//!
//! Core data structures shared across the grading engine: checkpoint
//! definitions, learner submissions, per-checkpoint grading results and the
//! hint-usage ledger.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use util::dataset::CellValue;

/// The kind of behavior a checkpoint grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointKind {
    /// The target cell must hold a formula producing an expected value.
    Formula,
    /// The target cell must carry a data-validation rule.
    DataValidation,
}

/// The expected answer of a checkpoint.
///
/// `NotFound` is the lookup sentinel: a lookup that matched no row produces
/// it, it is persisted as-is, and grading compares against it like any
/// other value. It is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedValue {
    Number(f64),
    Text(String),
    NotFound,
}

impl ExpectedValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ExpectedValue::Number(n) => Some(*n),
            ExpectedValue::Text(s) => s.trim().parse::<f64>().ok(),
            ExpectedValue::NotFound => None,
        }
    }
}

/// One gradable unit of an exercise.
///
/// Point values across all checkpoints of one exercise sum to 100; that is
/// enforced by the authoring step and assumed true here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Target cell reference, e.g. `B12`.
    pub cell_ref: String,
    pub kind: CheckpointKind,
    /// Function name that must appear in the formula, if any.
    #[serde(default)]
    pub required_function: Option<String>,
    /// Substring fragments expected in the formula text.
    #[serde(default)]
    pub pattern_fragments: Vec<String>,
    pub points: f64,
    pub expected_value: ExpectedValue,
    /// Numeric tolerance override; when absent the default tolerance
    /// attached at authoring time applies.
    #[serde(default)]
    pub tolerance: Option<f64>,
    /// Up to three progressively more explicit hints.
    #[serde(default)]
    pub hints: Vec<String>,
}

/// Declared data-validation rule kinds on a submitted cell.
///
/// Workbook readers report many kinds the engine does not model
/// (`custom`, `textLength`, ...); those all map to `Other` rather than
/// failing deserialization, so the submission still grades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ValidationKind {
    List,
    Date,
    NumericRange,
    /// Anything the workbook reader reported but the engine does not model.
    Other,
}

impl From<String> for ValidationKind {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "list" => ValidationKind::List,
            "date" => ValidationKind::Date,
            "numeric_range" | "numericrange" | "decimal" | "whole" => {
                ValidationKind::NumericRange
            }
            _ => ValidationKind::Other,
        }
    }
}

/// Validation metadata read off a submitted cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationMetadata {
    pub kind: ValidationKind,
    /// Declared comparison operator, e.g. `between`.
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub minimum: Option<String>,
    #[serde(default)]
    pub maximum: Option<String>,
    /// Declared list items, for `List` validations.
    #[serde(default)]
    pub items: Vec<String>,
}

/// One cell of the learner's submission, as supplied by the workbook
/// reader. Every field may legitimately be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedCell {
    pub cell_ref: String,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub value: Option<CellValue>,
    #[serde(default)]
    pub validation: Option<ValidationMetadata>,
}

/// Result of grading one checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingResult {
    /// The checkpoint's target cell reference.
    pub cell_ref: String,
    /// Points earned, in `0..=possible`.
    pub earned: f64,
    /// The checkpoint's point value.
    pub possible: f64,
    /// Highest contiguously passed tier (0-3): the count of tiers passed
    /// without a gap, so a formula that earns tier 3 points over a failed
    /// tier 2 still reports tier 1. Earned points are the credit record;
    /// this field describes how far the ladder held. Data-validation
    /// checkpoints report 0, 1 or 3 (single-shot grading).
    pub tier: u8,
    /// True when earned points reach the configured pass ratio.
    pub passed: bool,
    /// Human-readable diagnostics, in the order they were produced.
    pub diagnostics: Vec<String>,
}

/// Highest hint level already revealed per checkpoint.
///
/// Levels only ever grow and are capped at the configured maximum; the
/// scorer updates this after each attempt for failed checkpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintUsage(BTreeMap<String, u8>);

impl HintUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently revealed level for a checkpoint (0 if never hinted).
    pub fn level_for(&self, cell_ref: &str) -> u8 {
        self.0.get(cell_ref).copied().unwrap_or(0)
    }

    /// Raise the revealed level for a checkpoint. Lower levels are ignored,
    /// so usage is monotonic by construction.
    pub fn reveal(&mut self, cell_ref: &str, level: u8) {
        let entry = self.0.entry(cell_ref.to_string()).or_insert(0);
        if level > *entry {
            *entry = level;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u8)> {
        self.0.iter()
    }
}
