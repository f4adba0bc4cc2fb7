//! # Scorer Module
//!
//! Aggregates per-checkpoint grading results into the exercise-level
//! scores: the raw score, the hint-decayed adjusted score, the outcome
//! band, and the updated hint ledger for failed checkpoints.

use crate::types::{GradingResult, HintUsage};
use serde::{Deserialize, Serialize};
use util::grading_config::GradingConfig;

/// Exercise-level outcome, decided on the adjusted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseOutcome {
    /// All target competencies validated.
    Mastered,
    Passed,
    NeedsRetry,
}

/// The aggregate scoring of one attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreAdjustment {
    /// Percentage of points earned, 0-100.
    pub raw_score: u32,
    /// Raw score after hint-retention decay, 0-100.
    pub adjusted_score: u32,
    /// `raw_score - adjusted_score`, never negative.
    pub penalty: u32,
    pub outcome: ExerciseOutcome,
    /// Hint usage after escalating failed checkpoints.
    pub updated_hints: HintUsage,
}

/// Computes the raw score as a percentage from a slice of results.
///
/// The score is the ratio of total earned points to total possible
/// points, rounded to the nearest integer. Checkpoints with zero possible
/// points are ignored to prevent division by zero; an empty slice scores 0.
pub fn compute_raw_score(results: &[GradingResult]) -> u32 {
    if results.is_empty() {
        return 0;
    }

    let mut total_earned = 0.0;
    let mut total_possible = 0.0;

    for result in results {
        if result.possible > 0.0 {
            total_earned += result.earned;
            total_possible += result.possible;
        }
    }

    let overall = if total_possible > 0.0 {
        total_earned / total_possible
    } else {
        0.0
    };

    (overall * 100.0).round() as u32
}

/// Apply hint-retention decay and hint escalation to a set of results.
///
/// The retention factor for the *currently revealed* hint level multiplies
/// the earned points of passed checkpoints; the adjusted score is the
/// rounded percentage of the decayed total. For every failed checkpoint
/// the next hint level is `max(attempt_number, previous + 1)`, capped at
/// the configured maximum, so hints never regress and escalate at least
/// one level per failed attempt.
pub fn adjust(
    results: &[GradingResult],
    hint_usage: &HintUsage,
    attempt_number: u32,
    config: &GradingConfig,
) -> ScoreAdjustment {
    let raw_score = compute_raw_score(results);

    let mut total_possible = 0.0;
    let mut total_adjusted = 0.0;
    let mut updated_hints = hint_usage.clone();

    for result in results {
        if result.possible <= 0.0 {
            continue;
        }
        total_possible += result.possible;

        let level = hint_usage.level_for(&result.cell_ref);
        if result.passed {
            total_adjusted += result.earned * config.hints.retention(level);
        } else {
            total_adjusted += result.earned;
            let next = (attempt_number.min(u32::from(config.hints.max_hint_level)) as u8)
                .max(level.saturating_add(1))
                .min(config.hints.max_hint_level);
            updated_hints.reveal(&result.cell_ref, next);
        }
    }

    let adjusted_score = if total_possible > 0.0 {
        ((total_adjusted / total_possible) * 100.0).round() as u32
    } else {
        0
    };
    // Rounding both sides independently could otherwise put adjusted a
    // hair above raw.
    let adjusted_score = adjusted_score.min(raw_score);

    let outcome = if adjusted_score >= config.mastery_mark {
        ExerciseOutcome::Mastered
    } else if adjusted_score >= config.pass_mark {
        ExerciseOutcome::Passed
    } else {
        ExerciseOutcome::NeedsRetry
    };

    ScoreAdjustment {
        raw_score,
        adjusted_score,
        penalty: raw_score - adjusted_score,
        outcome,
        updated_hints,
    }
}
