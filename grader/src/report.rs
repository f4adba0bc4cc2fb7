//! # Grading Report Module
//!
//! This module defines the data structures and response envelope for
//! returning grading results from the engine. It provides a standardized,
//! serializable format for reporting per-checkpoint results, exercise-level
//! scores, feedback and the updated hint ledger to clients.
//!
//! ## Overview
//!
//! The main types are:
//! - [`GradingReport`]: Contains all grading data for an attempt, including
//!   per-checkpoint results, raw and adjusted scores, outcome and feedback.
//! - [`GradingReportResponse`]: A response envelope that wraps a
//!   [`GradingReport`] with success and message fields for API responses.
//!
//! ## JSON Output Example
//!
//! When serialized, the response will look like:
//!
//! ```json
//! {
//!   "success": true,
//!   "message": "Grading complete.",
//!   "data": {
//!     "created_at": "2026-08-30T12:00:00Z",
//!     "attempt_number": 2,
//!     "raw_score": 100,
//!     "adjusted_score": 75,
//!     "penalty": 25,
//!     "outcome": "passed",
//!     "checkpoint_results": [
//!       { "cell_ref": "B12", "earned": 100.0, "possible": 100.0, "tier": 3, "passed": true, "diagnostics": [] }
//!     ],
//!     "feedback": [
//!       { "cell_ref": "B12", "message": "Correct: 100/100 points" }
//!     ],
//!     "hint_usage": { "B12": 2 }
//!   }
//! }
//! ```
//!
//! ## Design Notes
//!
//! - [`GradingReport`] is intended for API output. It contains only
//!   serializable fields and is not used for internal grading logic.
//! - The [`From<GradingReport> for GradingReportResponse`] implementation
//!   provides ergonomic conversion for API handlers.

use crate::scorer::ExerciseOutcome;
use crate::traits::feedback::FeedbackEntry;
use crate::types::{GradingResult, HintUsage};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Represents the final report generated after grading one attempt.
///
/// This struct is designed for API output and contains all information
/// needed to present grading results to the client, including
/// per-checkpoint results, scores, outcome, feedback and the hint ledger
/// the caller must persist for the next attempt.
#[derive(Debug, Serialize)]
pub struct GradingReport {
    /// RFC 3339 timestamp at which the report was created.
    pub created_at: String,
    /// The attempt this report grades, 1-based.
    pub attempt_number: u32,
    /// Percentage of points earned before hint decay (0-100).
    pub raw_score: u32,
    /// Score after hint-retention decay (0-100).
    pub adjusted_score: u32,
    /// `raw_score - adjusted_score`.
    pub penalty: u32,
    pub outcome: ExerciseOutcome,
    /// Per-checkpoint results, in checkpoint order.
    pub checkpoint_results: Vec<GradingResult>,
    /// A list of feedback entries for the attempt.
    pub feedback: Vec<FeedbackEntry>,
    /// Hint levels after this attempt; the caller persists this.
    pub hint_usage: HintUsage,
}

impl GradingReport {
    /// Stamps `created_at` with the current UTC time.
    pub fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// The API response envelope for grading results.
///
/// This struct wraps a [`GradingReport`] and adds top-level `success` and
/// `message` fields for consistency with other API responses.
#[derive(Debug, Serialize)]
pub struct GradingReportResponse {
    /// Indicates the grading was successful.
    success: bool,
    /// A human-readable message for the client.
    message: String,
    /// The detailed grading report.
    data: GradingReport,
}

/// Enables ergonomic conversion from [`GradingReport`] to
/// [`GradingReportResponse`].
impl From<GradingReport> for GradingReportResponse {
    fn from(report: GradingReport) -> Self {
        GradingReportResponse {
            success: true,
            message: "Grading complete.".to_string(),
            data: report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_grading_report_response_serialization() {
        let mut hint_usage = HintUsage::new();
        hint_usage.reveal("B12", 2);
        let report = GradingReport {
            created_at: "2026-08-30T12:00:00Z".to_string(),
            attempt_number: 2,
            raw_score: 100,
            adjusted_score: 75,
            penalty: 25,
            outcome: ExerciseOutcome::Passed,
            checkpoint_results: vec![GradingResult {
                cell_ref: "B12".to_string(),
                earned: 100.0,
                possible: 100.0,
                tier: 3,
                passed: true,
                diagnostics: vec![],
            }],
            feedback: vec![FeedbackEntry {
                cell_ref: "B12".to_string(),
                message: "Correct: 100/100 points".to_string(),
            }],
            hint_usage,
        };
        let response: GradingReportResponse = report.into();
        let value: Value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "Grading complete.");
        assert_eq!(value["data"]["created_at"], "2026-08-30T12:00:00Z");
        assert_eq!(value["data"]["raw_score"], 100);
        assert_eq!(value["data"]["adjusted_score"], 75);
        assert_eq!(value["data"]["penalty"], 25);
        assert_eq!(value["data"]["outcome"], "passed");
        assert_eq!(value["data"]["checkpoint_results"][0]["cell_ref"], "B12");
        assert_eq!(value["data"]["checkpoint_results"][0]["tier"], 3);
        assert_eq!(value["data"]["feedback"][0]["message"], "Correct: 100/100 points");
        assert_eq!(value["data"]["hint_usage"]["B12"], 2);
    }

    #[test]
    fn test_now_is_rfc3339_utc() {
        let stamp = GradingReport::now();
        assert!(stamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
