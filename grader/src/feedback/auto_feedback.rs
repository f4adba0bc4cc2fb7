//! # AutoFeedback Strategy
//!
//! This module provides the `AutoFeedback` strategy for the grading engine.
//! It implements the [`Feedback`] trait to generate automatic,
//! template-based feedback for each checkpoint from the grading
//! diagnostics.
//!
//! ## Overview
//!
//! - Passed checkpoints produce a short confirmation naming the points
//!   awarded.
//! - Failed checkpoints produce the grading diagnostics followed by the
//!   next hint to reveal, and only that hint: hint texts above the current
//!   level never appear in the output.
//! - Checkpoints whose hint list is shorter than the revealed level fall
//!   back to the last authored hint.

use crate::error::GraderError;
use crate::traits::feedback::{Feedback, FeedbackEntry};
use crate::types::{Checkpoint, GradingResult, HintUsage};

/// Automatic feedback strategy: template-based messages per checkpoint.
///
/// - Summarizes awarded points for passed checkpoints.
/// - Joins diagnostics and appends the next hint for failed checkpoints.
/// - Implements the [`Feedback`] trait for use in a grading job.
#[derive(Debug)]
pub struct AutoFeedback;

impl Feedback for AutoFeedback {
    fn assemble_feedback(
        &self,
        results: &[GradingResult],
        checkpoints: &[Checkpoint],
        hints: &HintUsage,
    ) -> Result<Vec<FeedbackEntry>, GraderError> {
        let mut feedback_entries = Vec::new();

        for result in results {
            let mut message = String::new();

            if result.passed {
                message.push_str(&format!(
                    "Correct: {:.0}/{:.0} points",
                    result.earned, result.possible
                ));
            } else {
                if result.diagnostics.is_empty() {
                    message.push_str("Incorrect");
                } else {
                    message.push_str(&result.diagnostics.join("; "));
                }
                if let Some(hint) = next_hint(result, checkpoints, hints) {
                    message.push_str(&format!(" Hint: {}", hint));
                }
            }

            feedback_entries.push(FeedbackEntry {
                cell_ref: result.cell_ref.clone(),
                message,
            });
        }

        Ok(feedback_entries)
    }
}

/// The hint text to reveal for a failed checkpoint, if any.
///
/// The revealed level comes from the updated hint ledger; level `n` maps to
/// the checkpoint's `n`-th hint (1-based). Checkpoints without hints, or at
/// level 0, reveal nothing.
fn next_hint<'a>(
    result: &GradingResult,
    checkpoints: &'a [Checkpoint],
    hints: &HintUsage,
) -> Option<&'a str> {
    let checkpoint = checkpoints
        .iter()
        .find(|c| c.cell_ref == result.cell_ref)?;
    if checkpoint.hints.is_empty() {
        return None;
    }

    let level = hints.level_for(&result.cell_ref);
    if level == 0 {
        return None;
    }
    let index = usize::from(level - 1).min(checkpoint.hints.len() - 1);
    Some(checkpoint.hints[index].as_str())
}
