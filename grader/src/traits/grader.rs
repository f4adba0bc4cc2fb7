use crate::types::{Checkpoint, GradingResult, SubmittedCell};
use util::grading_config::GradingConfig;

/// CheckpointGrader is a strategy trait for grading one checkpoint.
/// Each implementation covers one checkpoint kind (formula cells,
/// data-validation cells) and produces a full [`GradingResult`].
pub trait CheckpointGrader: Send + Sync {
    /// Grade one checkpoint against the learner's submitted cell.
    ///
    /// - `checkpoint`: the authored definition (points, expected value,
    ///   required function, fragments, hints).
    /// - `cell`: the submitted cell content read from the workbook.
    /// - `config`: tier weights and thresholds.
    fn grade(
        &self,
        checkpoint: &Checkpoint,
        cell: &SubmittedCell,
        config: &GradingConfig,
    ) -> GradingResult;
}
