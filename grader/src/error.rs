//! Grader Error Types
//!
//! This module defines the [`GraderError`] enum, which encapsulates the error
//! conditions the engine can surface while resolving, executing and grading
//! checkpoints. Each variant carries a descriptive payload.
//!
//! Two of these never reach learners: [`GraderError::ColumnNotFound`] marks
//! an authoring-time defect (a spec names a column the dataset does not
//! have) and [`GraderError::UnsupportedComputation`] a configuration error
//! (a raw spec whose `type` discriminator is not a known variant). The
//! caller is expected to catch and log them before grading begins. Lookup
//! misses are not errors at all; they flow through the expected value as a
//! first-class not-found sentinel.

/// Represents all error types that can occur in the grading engine.
#[derive(Debug)]
pub enum GraderError {
    /// A named column is absent from the dataset headers.
    ColumnNotFound(String),
    /// A computation spec uses an unrecognized `type` discriminator.
    /// Produced by [`ComputationSpec::from_json`].
    ///
    /// [`ComputationSpec::from_json`]: crate::computation::ComputationSpec::from_json
    UnsupportedComputation(String),
    /// JSON is malformed or does not match the expected spec schema.
    InvalidJson(String),
    /// A required field is missing from input.
    MissingField(String),
}

impl From<serde_json::Error> for GraderError {
    fn from(err: serde_json::Error) -> Self {
        GraderError::InvalidJson(err.to_string())
    }
}
