//! Data-validation checkpoint grading: single-shot, type-dependent.
//!
//! - `list`: full credit when every expected item appears (substring)
//!   among the declared list items, else half.
//! - `date` / numeric range: full credit when a "between" operator and
//!   both bounds are declared, else half.
//! - any other declared kind: 30% ("acknowledged but unverified").
//! - no validation metadata at all: 0.
//!
//! Expected list items come from the checkpoint's pattern fragments; for
//! data-validation checkpoints those carry the items the rule must offer.

use crate::traits::grader::CheckpointGrader;
use crate::types::{Checkpoint, GradingResult, SubmittedCell, ValidationKind, ValidationMetadata};
use util::grading_config::GradingConfig;

/// Grades `data_validation` checkpoints.
pub struct ValidationGrader;

impl CheckpointGrader for ValidationGrader {
    fn grade(
        &self,
        checkpoint: &Checkpoint,
        cell: &SubmittedCell,
        config: &GradingConfig,
    ) -> GradingResult {
        let Some(validation) = cell.validation.as_ref() else {
            return GradingResult {
                cell_ref: checkpoint.cell_ref.clone(),
                earned: 0.0,
                possible: checkpoint.points,
                tier: 0,
                passed: false,
                diagnostics: vec![format!(
                    "No validation found on cell {}",
                    checkpoint.cell_ref
                )],
            };
        };

        let (ratio, diagnostic) = match validation.kind {
            ValidationKind::List => grade_list(checkpoint, validation),
            ValidationKind::Date | ValidationKind::NumericRange => grade_range(validation),
            ValidationKind::Other => (
                0.3,
                "Validation present but of an unrecognized kind".to_string(),
            ),
        };

        let earned = crate::round2(checkpoint.points * ratio);
        GradingResult {
            cell_ref: checkpoint.cell_ref.clone(),
            earned,
            possible: checkpoint.points,
            tier: if ratio >= 1.0 { 3 } else if ratio > 0.0 { 1 } else { 0 },
            passed: earned >= checkpoint.points * config.checkpoint_pass_ratio,
            diagnostics: vec![diagnostic],
        }
    }
}

fn grade_list(checkpoint: &Checkpoint, validation: &ValidationMetadata) -> (f64, String) {
    let expected = &checkpoint.pattern_fragments;
    let all_present = expected.iter().all(|item| {
        validation
            .items
            .iter()
            .any(|declared| declared.to_lowercase().contains(&item.to_lowercase()))
    });
    if all_present {
        (1.0, "List validation offers every expected item".to_string())
    } else {
        (0.5, "List validation is missing expected items".to_string())
    }
}

fn grade_range(validation: &ValidationMetadata) -> (f64, String) {
    let between = validation
        .operator
        .as_deref()
        .is_some_and(|op| op.to_lowercase().contains("between"));
    if between && validation.minimum.is_some() && validation.maximum.is_some() {
        (1.0, "Range validation declares both bounds".to_string())
    } else {
        (0.5, "Range validation is incomplete".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CheckpointKind, ExpectedValue};

    fn checkpoint(fragments: &[&str]) -> Checkpoint {
        Checkpoint {
            cell_ref: "C3".to_string(),
            kind: CheckpointKind::DataValidation,
            required_function: None,
            pattern_fragments: fragments.iter().map(|s| s.to_string()).collect(),
            points: 20.0,
            expected_value: ExpectedValue::Text(String::new()),
            tolerance: None,
            hints: vec![],
        }
    }

    fn cell(validation: Option<ValidationMetadata>) -> SubmittedCell {
        SubmittedCell {
            cell_ref: "C3".to_string(),
            formula: None,
            value: None,
            validation,
        }
    }

    fn list_validation(items: &[&str]) -> ValidationMetadata {
        ValidationMetadata {
            kind: ValidationKind::List,
            operator: None,
            minimum: None,
            maximum: None,
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_list_full_credit() {
        let result = ValidationGrader.grade(
            &checkpoint(&["Oui", "Non"]),
            &cell(Some(list_validation(&["Oui", "Non", "Peut-être"]))),
            &GradingConfig::default_config(),
        );
        assert_eq!(result.earned, 20.0);
        assert!(result.passed);
    }

    #[test]
    fn test_list_missing_item_is_half_credit() {
        let result = ValidationGrader.grade(
            &checkpoint(&["Oui", "Non"]),
            &cell(Some(list_validation(&["Oui"]))),
            &GradingConfig::default_config(),
        );
        assert_eq!(result.earned, 10.0);
        assert!(!result.passed);
    }

    #[test]
    fn test_range_with_both_bounds() {
        let validation = ValidationMetadata {
            kind: ValidationKind::NumericRange,
            operator: Some("between".to_string()),
            minimum: Some("0".to_string()),
            maximum: Some("20".to_string()),
            items: vec![],
        };
        let result = ValidationGrader.grade(
            &checkpoint(&[]),
            &cell(Some(validation)),
            &GradingConfig::default_config(),
        );
        assert_eq!(result.earned, 20.0);
    }

    #[test]
    fn test_range_missing_bound_is_half_credit() {
        let validation = ValidationMetadata {
            kind: ValidationKind::Date,
            operator: Some("between".to_string()),
            minimum: Some("2024-01-01".to_string()),
            maximum: None,
            items: vec![],
        };
        let result = ValidationGrader.grade(
            &checkpoint(&[]),
            &cell(Some(validation)),
            &GradingConfig::default_config(),
        );
        assert_eq!(result.earned, 10.0);
    }

    #[test]
    fn test_unrecognized_kind_is_thirty_percent() {
        let validation = ValidationMetadata {
            kind: ValidationKind::Other,
            operator: None,
            minimum: None,
            maximum: None,
            items: vec![],
        };
        let result = ValidationGrader.grade(
            &checkpoint(&[]),
            &cell(Some(validation)),
            &GradingConfig::default_config(),
        );
        assert!((result.earned - 6.0).abs() < 1e-9);
        assert!(!result.passed);
    }

    #[test]
    fn test_wire_level_unmodeled_kind_grades_at_thirty_percent() {
        // A kind the engine does not model arrives straight off the wire
        // and must still land on the acknowledged-but-unverified band.
        let validation: ValidationMetadata =
            serde_json::from_str(r#"{"kind": "custom", "operator": "equal"}"#).unwrap();
        let result = ValidationGrader.grade(
            &checkpoint(&[]),
            &cell(Some(validation)),
            &GradingConfig::default_config(),
        );
        assert!((result.earned - 6.0).abs() < 1e-9);
        assert_eq!(result.tier, 1);
    }

    #[test]
    fn test_missing_validation_is_zero() {
        let result = ValidationGrader.grade(
            &checkpoint(&[]),
            &cell(None),
            &GradingConfig::default_config(),
        );
        assert_eq!(result.earned, 0.0);
        assert_eq!(result.diagnostics[0], "No validation found on cell C3");
    }
}
