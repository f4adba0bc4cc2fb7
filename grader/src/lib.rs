//! # Grader Library
//!
//! This module provides the core logic for grading spreadsheet exercises.
//! It supports resolving partially-authored computation specs against a
//! dataset, executing the computations to produce expected answers, grading
//! submitted checkpoints with pluggable strategies, and generating detailed
//! grading reports with scores, feedback and hint escalation.
//!
//! ## Key Concepts
//! - **GradingJob**: The main struct representing a grading job for a
//!   single attempt at an exercise.
//! - **Graders**: Pluggable strategies for grading checkpoint kinds
//!   (formula cells, data-validation cells).
//! - **Feedback**: Automated feedback generation for each checkpoint,
//!   including progressive hint reveal.
//! - **Reports**: Structured output summarizing raw and adjusted scores,
//!   outcome and per-checkpoint results.

pub mod computation;
pub mod compute;
pub mod criteria;
pub mod error;
pub mod feedback;
pub mod graders;
pub mod report;
pub mod resolver;
pub mod scorer;
pub mod traits;
pub mod types;

use crate::computation::{Computation, ComputationSpec};
use crate::error::GraderError;
use crate::feedback::auto_feedback::AutoFeedback;
use crate::graders::formula_grader::FormulaGrader;
use crate::graders::validation_grader::ValidationGrader;
use crate::report::{GradingReport, GradingReportResponse};
use crate::traits::feedback::Feedback;
use crate::traits::grader::CheckpointGrader;
use crate::types::{Checkpoint, CheckpointKind, ExpectedValue, GradingResult, HintUsage, SubmittedCell};

use util::dataset::Dataset;
use util::dataset::stats::ColumnStats;
use util::grading_config::GradingConfig;

/// Represents a grading job for a single attempt at an exercise.
///
/// This struct encapsulates all inputs needed to grade an attempt: the
/// authored checkpoints, the submitted cells read from the learner's
/// workbook, the hint ledger carried over from previous attempts, and the
/// grading configuration.
///
/// # Fields
/// - `checkpoints`: Authored checkpoint definitions, in display order.
/// - `cells`: Submitted cells keyed by cell reference.
/// - `hint_usage`: Hint levels already revealed on previous attempts.
/// - `attempt_number`: The 1-based attempt being graded.
/// - `feedback`: Strategy producing learner-facing messages.
pub struct GradingJob<'a> {
    checkpoints: Vec<Checkpoint>,
    cells: Vec<SubmittedCell>,
    hint_usage: HintUsage,
    attempt_number: u32,
    config: GradingConfig,
    feedback: Box<dyn Feedback + Send + Sync + 'a>,
}

/// Round a float to two decimal places in an efficient manner.
///
/// Uses the common multiply / round / divide trick. Kept local to this
/// module so it's cheap to inline and obvious where rounding is happening.
#[inline]
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

impl<'a> GradingJob<'a> {
    /// Create a new grading job with required inputs.
    ///
    /// # Arguments
    /// * `checkpoints` - Authored checkpoint definitions, in display order.
    /// * `cells` - The submitted cells read from the learner's workbook.
    ///
    /// Defaults: no hints revealed, attempt 1, default configuration and
    /// the [`AutoFeedback`] strategy.
    pub fn new(checkpoints: Vec<Checkpoint>, cells: Vec<SubmittedCell>) -> Self {
        Self {
            checkpoints,
            cells,
            hint_usage: HintUsage::new(),
            attempt_number: 1,
            config: GradingConfig::default_config(),
            feedback: Box::new(AutoFeedback),
        }
    }

    /// Carry over the hint ledger from previous attempts.
    pub fn with_hint_usage(mut self, hint_usage: HintUsage) -> Self {
        self.hint_usage = hint_usage;
        self
    }

    /// Set the 1-based attempt number being graded.
    pub fn with_attempt_number(mut self, attempt_number: u32) -> Self {
        self.attempt_number = attempt_number.max(1);
        self
    }

    /// Override the grading configuration.
    pub fn with_config(mut self, config: GradingConfig) -> Self {
        self.config = config;
        self
    }

    /// Set a custom feedback strategy for this grading job.
    ///
    /// # Arguments
    /// * `feedback` - An implementation of the `Feedback` trait.
    pub fn with_feedback<F: Feedback + Send + Sync + 'a>(mut self, feedback: F) -> Self {
        self.feedback = Box::new(feedback);
        self
    }

    /// Run the grading process and generate a report.
    ///
    /// # Returns
    /// * `Ok(GradingReportResponse)` on success, containing the full report.
    /// * `Err(GraderError)` if feedback assembly fails.
    ///
    /// # Steps
    /// 1. Grades every checkpoint independently, in authored order; a
    ///    checkpoint whose target cell is missing from the submission earns
    ///    0 with a diagnostic, without affecting its siblings.
    /// 2. Aggregates the raw score, applies hint-retention decay, decides
    ///    the outcome band and escalates hints on failed checkpoints.
    /// 3. Assembles feedback with the configured strategy.
    /// 4. Builds the report envelope with an RFC 3339 timestamp.
    pub fn grade(self) -> Result<GradingReportResponse, GraderError> {
        let mut results: Vec<GradingResult> = Vec::with_capacity(self.checkpoints.len());

        for checkpoint in &self.checkpoints {
            let cell = self
                .cells
                .iter()
                .find(|c| c.cell_ref == checkpoint.cell_ref);

            let result = match cell {
                Some(cell) => match checkpoint.kind {
                    CheckpointKind::Formula => FormulaGrader.grade(checkpoint, cell, &self.config),
                    CheckpointKind::DataValidation => {
                        ValidationGrader.grade(checkpoint, cell, &self.config)
                    }
                },
                None => {
                    tracing::debug!(cell_ref = %checkpoint.cell_ref, "target cell missing from submission");
                    GradingResult {
                        cell_ref: checkpoint.cell_ref.clone(),
                        earned: 0.0,
                        possible: checkpoint.points,
                        tier: 0,
                        passed: false,
                        diagnostics: vec![format!(
                            "Cell {} was not found in the submission",
                            checkpoint.cell_ref
                        )],
                    }
                }
            };
            results.push(result);
        }

        let adjustment = scorer::adjust(
            &results,
            &self.hint_usage,
            self.attempt_number,
            &self.config,
        );

        let feedback = self.feedback.assemble_feedback(
            &results,
            &self.checkpoints,
            &adjustment.updated_hints,
        )?;

        tracing::info!(
            raw_score = adjustment.raw_score,
            adjusted_score = adjustment.adjusted_score,
            outcome = ?adjustment.outcome,
            "graded attempt"
        );

        let report = GradingReport {
            created_at: GradingReport::now(),
            attempt_number: self.attempt_number,
            raw_score: adjustment.raw_score,
            adjusted_score: adjustment.adjusted_score,
            penalty: adjustment.penalty,
            outcome: adjustment.outcome,
            checkpoint_results: results,
            feedback,
            hint_usage: adjustment.updated_hints,
        };

        Ok(report.into())
    }
}

/// The fully-resolved expected answer for one checkpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedExpectation {
    pub value: ExpectedValue,
    /// Default numeric tolerance derived from the value's magnitude.
    pub tolerance: f64,
    /// The resolved computation that produced the value. Callers persist
    /// this next to the expected value so grading never re-resolves.
    pub computation: Computation,
    /// Columns the resolver inferred rather than read from the spec.
    pub inferred: Vec<String>,
    /// Execution notes, e.g. column-length truncation warnings.
    pub details: Vec<String>,
}

/// Resolve a computation spec against a dataset and execute it.
///
/// This is the authoring-time convenience that turns a partially-authored
/// spec into a concrete expected value: column and criteria placeholders
/// are resolved from the column statistics, the computation runs over the
/// dataset, and a default tolerance is attached for later grading.
///
/// # Arguments
/// * `spec` - The authored computation, possibly with `auto` placeholders.
/// * `authored` - The authored expected value, required for `manual` specs
///   and passed through unchanged for them.
/// * `dataset` - The exercise dataset.
/// * `stats` - Per-column statistics for `dataset`, in column order.
/// * `config` - Supplies the tolerance parameters.
pub fn compute_expected(
    spec: ComputationSpec,
    authored: Option<ExpectedValue>,
    dataset: &Dataset,
    stats: &[ColumnStats],
    config: &GradingConfig,
) -> Result<ComputedExpectation, GraderError> {
    if let ComputationSpec::Manual = spec {
        let value = authored.ok_or_else(|| {
            GraderError::MissingField(
                "manual computation requires an authored expected_value".to_string(),
            )
        })?;
        let tolerance = match value.as_number() {
            Some(n) => config.default_tolerance(n),
            None => 0.0,
        };
        return Ok(ComputedExpectation {
            value,
            tolerance,
            computation: Computation::Manual,
            inferred: vec![],
            details: vec![],
        });
    }

    let resolution = resolver::resolve(spec, stats);
    if !resolution.fully_authored() {
        tracing::debug!(inferred = ?resolution.inferred, "resolver filled spec placeholders");
    }
    let execution = compute::execute(&resolution.computation, dataset)?;

    let tolerance = match execution.value.as_number() {
        Some(n) => config.default_tolerance(n),
        None => 0.0,
    };

    Ok(ComputedExpectation {
        value: execution.value,
        tolerance,
        computation: resolution.computation,
        inferred: resolution.inferred,
        details: execution.details,
    })
}
