//! # Feedback Strategies Module
//!
//! This module provides pluggable feedback strategies for the grading
//! engine. Each strategy implements the [`Feedback`] trait and produces a
//! list of [`FeedbackEntry`]s from the per-checkpoint grading results.
//!
//! ## Available Strategies
//!
//! - [`auto_feedback`]: Generates template-based feedback from grading
//!   diagnostics and reveals the next hint for failed checkpoints.
//!
//! [`Feedback`]: crate::traits::feedback::Feedback
//! [`FeedbackEntry`]: crate::traits::feedback::FeedbackEntry

pub mod auto_feedback;
