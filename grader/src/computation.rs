//! # Computation Spec Module
//!
//! Two closed enums describe the aggregation task behind a checkpoint:
//!
//! - [`ComputationSpec`] is the authored shape. It deserializes from the
//!   JSON produced by the authoring process, where column and criteria
//!   fields may carry the `"auto"` sentinel meaning "not specified, infer
//!   one". The sentinel maps to explicit [`ColumnRef::Auto`] /
//!   [`CriteriaRef::Auto`] variants at the serde boundary.
//! - [`Computation`] is the resolved shape the executor runs. Every column
//!   and criteria field is a concrete string; there is no `Auto` variant,
//!   so an unresolved reference cannot reach execution by construction.
//!
//! The resolver converts the former into the latter exactly once; the
//! resolved spec is serializable so the caller can persist it next to the
//! computed expected value and never re-resolve.

use crate::error::GraderError;
use serde::{Deserialize, Serialize};
use util::dataset::CellValue;

/// A column reference as authored: either a concrete name or the
/// unresolved sentinel (`"auto"` on the wire, case-insensitive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnRef {
    Auto,
    Named(String),
}

impl Default for ColumnRef {
    fn default() -> Self {
        ColumnRef::Auto
    }
}

impl From<String> for ColumnRef {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("auto") {
            ColumnRef::Auto
        } else {
            ColumnRef::Named(s)
        }
    }
}

impl From<ColumnRef> for String {
    fn from(r: ColumnRef) -> Self {
        match r {
            ColumnRef::Auto => "auto".to_string(),
            ColumnRef::Named(name) => name,
        }
    }
}

/// A criteria value as authored: a concrete criteria expression (possibly
/// with an operator prefix or wildcards) or the unresolved sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CriteriaRef {
    Auto,
    Value(String),
}

impl Default for CriteriaRef {
    fn default() -> Self {
        CriteriaRef::Auto
    }
}

impl From<String> for CriteriaRef {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("auto") {
            CriteriaRef::Auto
        } else {
            CriteriaRef::Value(s)
        }
    }
}

impl From<CriteriaRef> for String {
    fn from(r: CriteriaRef) -> Self {
        match r {
            CriteriaRef::Auto => "auto".to_string(),
            CriteriaRef::Value(value) => value,
        }
    }
}

/// One `(column, criteria)` pair of a multi-criteria computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaEntry {
    #[serde(default)]
    pub column: ColumnRef,
    #[serde(default)]
    pub criteria: CriteriaRef,
}

/// The authored computation spec, tagged by `type`.
///
/// This is the closed set of aggregation operations the engine supports;
/// an unknown `type` fails deserialization (surfaced to callers as an
/// unsupported-computation configuration error, never shown to learners).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ComputationSpec {
    Sum {
        #[serde(default)]
        column: ColumnRef,
    },
    Average {
        #[serde(default)]
        column: ColumnRef,
    },
    Min {
        #[serde(default)]
        column: ColumnRef,
    },
    Max {
        #[serde(default)]
        column: ColumnRef,
    },
    Count {
        #[serde(default)]
        column: ColumnRef,
    },
    CountA {
        #[serde(default)]
        column: ColumnRef,
    },
    CountIf {
        #[serde(default)]
        column: ColumnRef,
        #[serde(default)]
        criteria: CriteriaRef,
    },
    CountIfs {
        criteria: Vec<CriteriaEntry>,
    },
    SumIf {
        #[serde(default)]
        criteria_column: ColumnRef,
        #[serde(default)]
        criteria: CriteriaRef,
        /// Defaults to the criteria column (self-referential sum-if).
        #[serde(default)]
        sum_column: Option<ColumnRef>,
    },
    SumIfs {
        #[serde(default)]
        sum_column: ColumnRef,
        criteria: Vec<CriteriaEntry>,
    },
    AverageIf {
        #[serde(default)]
        criteria_column: ColumnRef,
        #[serde(default)]
        criteria: CriteriaRef,
        #[serde(default)]
        average_column: Option<ColumnRef>,
    },
    Lookup {
        #[serde(default)]
        search_column: ColumnRef,
        search_value: CellValue,
        #[serde(default)]
        return_column: ColumnRef,
        #[serde(default)]
        approximate: bool,
    },
    #[serde(rename = "index_match")]
    IndexMatch {
        #[serde(default)]
        search_column: ColumnRef,
        search_value: CellValue,
        #[serde(default)]
        return_column: ColumnRef,
    },
    HLookup {
        search_value: String,
        /// 1-based, counting the header row as row 1.
        row_index: usize,
    },
    SumProduct {
        columns: Vec<ColumnRef>,
    },
    Conditional {
        value: CellValue,
        condition: String,
        if_true: String,
        if_false: String,
    },
    Manual,
}

impl ComputationSpec {
    /// Parse an authored spec from raw JSON, classifying the failure mode.
    ///
    /// An unrecognized `type` discriminator is a configuration error
    /// distinct from malformed JSON: the author picked an operation the
    /// engine does not support. Callers log it before grading begins; it
    /// never reaches learners.
    pub fn from_json(raw: &str) -> Result<Self, GraderError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        match serde_json::from_value::<ComputationSpec>(value.clone()) {
            Ok(spec) => Ok(spec),
            Err(err) => {
                let unknown_type = value
                    .get("type")
                    .and_then(|t| t.as_str())
                    .filter(|_| err.to_string().contains("unknown variant"));
                match unknown_type {
                    Some(kind) => Err(GraderError::UnsupportedComputation(kind.to_string())),
                    None => Err(GraderError::InvalidJson(err.to_string())),
                }
            }
        }
    }
}

/// A resolved `(column, criteria)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCriteria {
    pub column: String,
    pub criteria: String,
}

/// The resolved computation the executor runs: same variants as
/// [`ComputationSpec`], every reference concrete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Computation {
    Sum { column: String },
    Average { column: String },
    Min { column: String },
    Max { column: String },
    Count { column: String },
    CountA { column: String },
    CountIf { column: String, criteria: String },
    CountIfs { criteria: Vec<ResolvedCriteria> },
    SumIf {
        criteria_column: String,
        criteria: String,
        sum_column: String,
    },
    SumIfs {
        sum_column: String,
        criteria: Vec<ResolvedCriteria>,
    },
    AverageIf {
        criteria_column: String,
        criteria: String,
        average_column: String,
    },
    Lookup {
        search_column: String,
        search_value: CellValue,
        return_column: String,
        approximate: bool,
    },
    #[serde(rename = "index_match")]
    IndexMatch {
        search_column: String,
        search_value: CellValue,
        return_column: String,
    },
    HLookup { search_value: String, row_index: usize },
    SumProduct { columns: Vec<String> },
    Conditional {
        value: CellValue,
        condition: String,
        if_true: String,
        if_false: String,
    },
    Manual,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_sentinel_maps_to_explicit_variant() {
        let spec: ComputationSpec =
            serde_json::from_str(r#"{"type": "sum", "column": "auto"}"#).unwrap();
        assert_eq!(spec, ComputationSpec::Sum { column: ColumnRef::Auto });

        let spec: ComputationSpec =
            serde_json::from_str(r#"{"type": "sum", "column": "Amount"}"#).unwrap();
        assert_eq!(
            spec,
            ComputationSpec::Sum { column: ColumnRef::Named("Amount".to_string()) }
        );
    }

    #[test]
    fn test_auto_sentinel_case_insensitive() {
        let spec: ComputationSpec =
            serde_json::from_str(r#"{"type": "countif", "column": "AUTO", "criteria": "Auto"}"#)
                .unwrap();
        assert_eq!(
            spec,
            ComputationSpec::CountIf {
                column: ColumnRef::Auto,
                criteria: CriteriaRef::Auto,
            }
        );
    }

    #[test]
    fn test_missing_column_defaults_to_auto() {
        let spec: ComputationSpec = serde_json::from_str(r#"{"type": "average"}"#).unwrap();
        assert_eq!(spec, ComputationSpec::Average { column: ColumnRef::Auto });
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let parsed = serde_json::from_str::<ComputationSpec>(r#"{"type": "median"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_from_json_classifies_unknown_type() {
        let err = ComputationSpec::from_json(r#"{"type": "median"}"#).unwrap_err();
        match err {
            GraderError::UnsupportedComputation(kind) => assert_eq!(kind, "median"),
            other => panic!("expected UnsupportedComputation, got {other:?}"),
        }
    }

    #[test]
    fn test_from_json_malformed_input_is_invalid_json() {
        let err = ComputationSpec::from_json(r#"{"type": "#).unwrap_err();
        assert!(matches!(err, GraderError::InvalidJson(_)));

        // A known type with a wrongly shaped field is bad JSON, not an
        // unsupported operation.
        let err = ComputationSpec::from_json(r#"{"type": "countifs", "criteria": 3}"#)
            .unwrap_err();
        assert!(matches!(err, GraderError::InvalidJson(_)));
    }

    #[test]
    fn test_from_json_accepts_known_specs() {
        let spec = ComputationSpec::from_json(r#"{"type": "sum", "column": "auto"}"#).unwrap();
        assert_eq!(spec, ComputationSpec::Sum { column: ColumnRef::Auto });
    }

    #[test]
    fn test_lookup_spec_round_trip() {
        let json = r#"{
            "type": "lookup",
            "search_column": "Note",
            "search_value": 11,
            "return_column": "Mention",
            "approximate": true
        }"#;
        let spec: ComputationSpec = serde_json::from_str(json).unwrap();
        match &spec {
            ComputationSpec::Lookup { search_value, approximate, .. } => {
                assert_eq!(*search_value, CellValue::Number(11.0));
                assert!(*approximate);
            }
            other => panic!("expected lookup, got {other:?}"),
        }
        let back: ComputationSpec =
            serde_json::from_str(&serde_json::to_string(&spec).unwrap()).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_resolved_computation_serializes_concrete_columns() {
        let computation = Computation::SumIf {
            criteria_column: "City".to_string(),
            criteria: "Paris".to_string(),
            sum_column: "Amount".to_string(),
        };
        let json = serde_json::to_string(&computation).unwrap();
        assert!(json.contains(r#""type":"sumif""#));
        assert!(json.contains(r#""sum_column":"Amount""#));
    }
}
