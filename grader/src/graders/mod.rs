pub mod error_rules;
pub mod formula_grader;
pub mod validation_grader;
