//! Shared building blocks for the grading engine.
//!
//! This crate is engine-agnostic: it holds the tabular data model
//! ([`dataset`]), the derived per-column statistics used for heuristic
//! column resolution ([`dataset::stats`]), and the grading configuration
//! ([`grading_config`]) with its serde defaults and file loader.

pub mod dataset;
pub mod grading_config;
