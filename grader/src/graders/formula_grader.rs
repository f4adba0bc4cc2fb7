//! Formula checkpoint grading: three strictly ordered, additive tiers.
//!
//! Tier 1 (value presence, 50% by default) requires the evaluated value to
//! exist and not be a spreadsheet error marker. A failing tier 1
//! short-circuits the whole checkpoint at 0 points with a single
//! diagnostic: a formula that errors cannot be partially right at a higher
//! tier. Tier 2 (30%) requires the required function name, if any, to
//! appear in the formula text under either of its locale spellings. Tier 3
//! (20%) is a binary gate on the fraction of expected pattern fragments
//! found in the formula text. Missing requirements award their tier
//! automatically.
//!
//! The expected-vs-actual value comparison (within the checkpoint's
//! numeric tolerance) feeds the diagnostics; the tier points themselves
//! follow the value-presence / function-presence / pattern-match bands.

use crate::graders::error_rules;
use crate::traits::grader::CheckpointGrader;
use crate::types::{Checkpoint, ExpectedValue, GradingResult, SubmittedCell};
use util::dataset::CellValue;
use util::grading_config::GradingConfig;

/// Spreadsheet error markers that fail tier 1 outright.
const ERROR_MARKERS: &[&str] = &[
    "#DIV/0!", "#N/A", "#VALUE!", "#REF!", "#NAME?", "#NUM!", "#NULL!", "#ERROR!",
];

/// Function spellings that count as equivalent: one locale's name and its
/// synonym. Checked in both directions.
const FUNCTION_ALIASES: &[(&str, &str)] = &[
    ("SUM", "SOMME"),
    ("AVERAGE", "MOYENNE"),
    ("IF", "SI"),
    ("COUNT", "NB"),
    ("COUNTA", "NBVAL"),
    ("COUNTIF", "NB.SI"),
    ("COUNTIFS", "NB.SI.ENS"),
    ("SUMIF", "SOMME.SI"),
    ("SUMIFS", "SOMME.SI.ENS"),
    ("AVERAGEIF", "MOYENNE.SI"),
    ("VLOOKUP", "RECHERCHEV"),
    ("HLOOKUP", "RECHERCHEH"),
    ("LOOKUP", "RECHERCHE"),
    ("MATCH", "EQUIV"),
    ("SUMPRODUCT", "SOMMEPROD"),
];

/// Grades `formula` checkpoints through the tier bands.
pub struct FormulaGrader;

impl CheckpointGrader for FormulaGrader {
    fn grade(
        &self,
        checkpoint: &Checkpoint,
        cell: &SubmittedCell,
        config: &GradingConfig,
    ) -> GradingResult {
        let mut diagnostics = Vec::new();

        // Tier 1: the cell must evaluate to something that is not an error.
        if !tier1_passes(cell.value.as_ref()) {
            return GradingResult {
                cell_ref: checkpoint.cell_ref.clone(),
                earned: 0.0,
                possible: checkpoint.points,
                tier: 0,
                passed: false,
                diagnostics: vec![format!(
                    "Cell {} has no usable value (missing or spreadsheet error)",
                    checkpoint.cell_ref
                )],
            };
        }

        let mut earned = checkpoint.points * config.tiers.value;
        let mut tier = 1u8;
        diagnostics.push("Cell evaluates to a usable value".to_string());
        compare_value(checkpoint, cell, config, &mut diagnostics);

        let formula = cell.formula.as_deref().unwrap_or("").to_uppercase();

        // Tier 2: required function presence, under either spelling.
        let tier2 = match checkpoint.required_function.as_deref() {
            None => true,
            Some(required) => {
                let found = spellings(required).iter().any(|name| formula.contains(name));
                if found {
                    diagnostics.push(format!("Formula uses {}", required.to_uppercase()));
                } else {
                    diagnostics.push(format!(
                        "Formula does not use the expected function {}",
                        required.to_uppercase()
                    ));
                }
                found
            }
        };
        if tier2 {
            earned += checkpoint.points * config.tiers.function;
            if tier == 1 {
                tier = 2;
            }
        }

        // Tier 3: binary gate on the pattern-fragment match rate.
        let tier3 = if checkpoint.pattern_fragments.is_empty() {
            true
        } else {
            let found = checkpoint
                .pattern_fragments
                .iter()
                .filter(|fragment| formula.contains(&fragment.to_uppercase()))
                .count();
            let rate = found as f64 / checkpoint.pattern_fragments.len() as f64;
            if rate < config.pattern_threshold {
                diagnostics.push(format!(
                    "Formula matches {found} of {} expected fragments",
                    checkpoint.pattern_fragments.len()
                ));
            }
            rate >= config.pattern_threshold
        };
        if tier3 {
            earned += checkpoint.points * config.tiers.pattern;
            if tier == 2 {
                tier = 3;
            }
        }

        diagnostics.extend(error_rules::scan(cell.formula.as_deref().unwrap_or("")));

        let earned = crate::round2(earned);
        GradingResult {
            cell_ref: checkpoint.cell_ref.clone(),
            earned,
            possible: checkpoint.points,
            tier,
            passed: earned >= checkpoint.points * config.checkpoint_pass_ratio,
            diagnostics,
        }
    }
}

fn tier1_passes(value: Option<&CellValue>) -> bool {
    match value {
        None | Some(CellValue::Empty) => false,
        Some(CellValue::Number(_)) => true,
        Some(CellValue::Text(s)) => {
            let upper = s.trim().to_uppercase();
            !ERROR_MARKERS.contains(&upper.as_str())
        }
    }
}

/// Compare the evaluated value against the expected one, within the
/// checkpoint's tolerance, and record the outcome as a diagnostic.
fn compare_value(
    checkpoint: &Checkpoint,
    cell: &SubmittedCell,
    config: &GradingConfig,
    diagnostics: &mut Vec<String>,
) {
    let Some(actual) = cell.value.as_ref() else {
        return;
    };
    match &checkpoint.expected_value {
        ExpectedValue::Number(expected) => {
            let tolerance = checkpoint
                .tolerance
                .unwrap_or_else(|| config.default_tolerance(*expected));
            match actual.as_number() {
                Some(n) if (n - expected).abs() <= tolerance => {
                    diagnostics.push("Value matches the expected result".to_string());
                }
                _ => diagnostics.push(format!(
                    "Value {} differs from the expected result",
                    actual.as_text()
                )),
            }
        }
        ExpectedValue::Text(expected) => {
            if actual.as_text().eq_ignore_ascii_case(expected) {
                diagnostics.push("Value matches the expected result".to_string());
            } else {
                diagnostics.push(format!(
                    "Value {} differs from the expected result",
                    actual.as_text()
                ));
            }
        }
        // The sentinel compares as-is: the learner's cell is expected to
        // show a no-match result such as #N/A, which tier 1 already
        // treats as an error marker, so nothing useful to add here.
        ExpectedValue::NotFound => {}
    }
}

/// The accepted spellings of a required function name.
fn spellings(required: &str) -> Vec<String> {
    let upper = required.to_uppercase();
    let mut names = vec![upper.clone()];
    for (a, b) in FUNCTION_ALIASES {
        if *a == upper {
            names.push((*b).to_string());
        } else if *b == upper {
            names.push((*a).to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkpoint(points: f64) -> Checkpoint {
        Checkpoint {
            cell_ref: "B12".to_string(),
            kind: crate::types::CheckpointKind::Formula,
            required_function: Some("SUM".to_string()),
            pattern_fragments: vec![],
            points,
            expected_value: ExpectedValue::Number(150.0),
            tolerance: None,
            hints: vec![],
        }
    }

    fn cell(formula: &str, value: Option<CellValue>) -> SubmittedCell {
        SubmittedCell {
            cell_ref: "B12".to_string(),
            formula: Some(formula.to_string()),
            value,
            validation: None,
        }
    }

    #[test]
    fn test_scenario_c_full_credit() {
        let result = FormulaGrader.grade(
            &checkpoint(100.0),
            &cell("=SUM(A1:A10)", Some(CellValue::Number(150.0))),
            &GradingConfig::default_config(),
        );
        assert_eq!(result.earned, 100.0);
        assert_eq!(result.tier, 3);
        assert!(result.passed);
    }

    #[test]
    fn test_scenario_d_error_marker_short_circuits() {
        let result = FormulaGrader.grade(
            &checkpoint(100.0),
            &cell("=SUM(A1:A10)", Some(CellValue::Text("#DIV/0!".to_string()))),
            &GradingConfig::default_config(),
        );
        assert_eq!(result.earned, 0.0);
        assert_eq!(result.tier, 0);
        assert!(!result.passed);
        // Short-circuit: exactly one diagnostic, nothing about tiers 2/3.
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_missing_value_short_circuits() {
        let result = FormulaGrader.grade(
            &checkpoint(100.0),
            &cell("=SUM(A1:A10)", None),
            &GradingConfig::default_config(),
        );
        assert_eq!(result.earned, 0.0);
        assert_eq!(result.tier, 0);
    }

    #[test]
    fn test_locale_alias_counts_as_the_required_function() {
        let result = FormulaGrader.grade(
            &checkpoint(100.0),
            &cell("=SOMME(A1:A10)", Some(CellValue::Number(150.0))),
            &GradingConfig::default_config(),
        );
        assert_eq!(result.earned, 100.0);
    }

    #[test]
    fn test_missing_function_loses_tier_two_only() {
        let result = FormulaGrader.grade(
            &checkpoint(100.0),
            &cell("=A1+A2+A3", Some(CellValue::Number(150.0))),
            &GradingConfig::default_config(),
        );
        // 50 (value) + 0 (function) + 20 (no fragments declared). Tier 3
        // points are awarded over the failed tier 2, but the reported tier
        // stays at the highest contiguous rung.
        assert_eq!(result.earned, 70.0);
        assert_eq!(result.tier, 1);
        assert!(result.passed);
    }

    #[test]
    fn test_fragment_gate_is_binary() {
        let mut cp = checkpoint(100.0);
        cp.pattern_fragments = vec![
            "A1:A10".to_string(),
            "SUM".to_string(),
            "B1".to_string(),
        ];
        let config = GradingConfig::default_config();

        // 2 of 3 fragments (0.66) is below the 0.7 gate: tier 3 earns 0.
        let result = FormulaGrader.grade(
            &cp,
            &cell("=SUM(A1:A10)", Some(CellValue::Number(150.0))),
            &config,
        );
        assert_eq!(result.earned, 80.0);

        // All fragments present: full tier 3.
        let result = FormulaGrader.grade(
            &cp,
            &cell("=SUM(A1:A10)+B1", Some(CellValue::Number(150.0))),
            &config,
        );
        assert_eq!(result.earned, 100.0);
    }

    #[test]
    fn test_no_required_function_awards_tier_two() {
        let mut cp = checkpoint(100.0);
        cp.required_function = None;
        let result = FormulaGrader.grade(
            &cp,
            &cell("=150", Some(CellValue::Number(150.0))),
            &GradingConfig::default_config(),
        );
        assert_eq!(result.earned, 100.0);
    }

    #[test]
    fn test_value_mismatch_is_diagnosed_not_penalized() {
        let result = FormulaGrader.grade(
            &checkpoint(100.0),
            &cell("=SUM(A1:A10)", Some(CellValue::Number(151.0))),
            &GradingConfig::default_config(),
        );
        assert_eq!(result.earned, 100.0);
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.contains("differs from the expected result")));
    }

    #[test]
    fn test_tolerance_accepts_near_values() {
        let mut cp = checkpoint(100.0);
        cp.tolerance = Some(2.0);
        let result = FormulaGrader.grade(
            &cp,
            &cell("=SUM(A1:A10)", Some(CellValue::Number(151.0))),
            &GradingConfig::default_config(),
        );
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.contains("matches the expected result")));
    }
}
