//!
//! # Feedback Trait
//!
//! This module defines the [`Feedback`] trait and the [`FeedbackEntry`]
//! struct, used to implement pluggable feedback strategies for the grading
//! engine. Each strategy turns the per-checkpoint results into an ordered
//! list of learner-facing messages, including the next hint to reveal for
//! failed checkpoints (and never any hint beyond it).
//!

use crate::error::GraderError;
use crate::types::{Checkpoint, GradingResult, HintUsage};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackEntry {
    pub cell_ref: String,
    pub message: String,
}

/// A trait for pluggable feedback strategies.
///
/// # Arguments
/// - `results`: per-checkpoint grading results, in checkpoint order.
/// - `checkpoints`: the matching checkpoint definitions (same order),
///   which carry the hint texts.
/// - `hints`: the updated hint usage after this attempt; the entry for a
///   failed checkpoint names the hint level to reveal now.
///
/// # Returns
/// - `Ok(Vec<FeedbackEntry>)`: an ordered list of feedback entries.
/// - `Err(GraderError)`: if feedback generation fails.
pub trait Feedback {
    fn assemble_feedback(
        &self,
        results: &[GradingResult],
        checkpoints: &[Checkpoint],
        hints: &HintUsage,
    ) -> Result<Vec<FeedbackEntry>, GraderError>;
}
