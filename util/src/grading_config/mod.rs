//! Grading configuration with serde-backed defaults.
//!
//! Every scoring knob of the engine lives here so that authored exercises
//! can override policy without code changes: tier weights for formula
//! checkpoints, the pattern-fragment gate, pass/mastery thresholds, hint
//! retention factors and the numeric tolerance parameters. Each field has a
//! serde default, so a partial JSON config deserializes into a fully
//! populated [`GradingConfig`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Share of a formula checkpoint's points awarded per tier.
///
/// Tier 1 checks that the cell evaluates to a non-error value, tier 2 that
/// the required function appears in the formula, tier 3 that enough pattern
/// fragments are present. The three weights are expected to sum to 1.0.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct TierWeights {
    #[serde(default = "default_value_weight")]
    pub value: f64,

    #[serde(default = "default_function_weight")]
    pub function: f64,

    #[serde(default = "default_pattern_weight")]
    pub pattern: f64,
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            value: default_value_weight(),
            function: default_function_weight(),
            pattern: default_pattern_weight(),
        }
    }
}

/// Hint reveal policy: retention factor per revealed hint level, applied to
/// earned points of passed checkpoints, and the hard cap on hint levels.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HintPolicy {
    /// Indexed by hint level 0..=3. Level 0 means no hint was revealed.
    #[serde(default = "default_retention_factors")]
    pub retention_factors: Vec<f64>,

    #[serde(default = "default_max_hint_level")]
    pub max_hint_level: u8,
}

impl HintPolicy {
    /// Retention factor for a hint level, clamped to the configured table.
    pub fn retention(&self, level: u8) -> f64 {
        let idx = (level as usize).min(self.retention_factors.len().saturating_sub(1));
        self.retention_factors.get(idx).copied().unwrap_or(1.0)
    }
}

impl Default for HintPolicy {
    fn default() -> Self {
        Self {
            retention_factors: default_retention_factors(),
            max_hint_level: default_max_hint_level(),
        }
    }
}

/// Top-level grading configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GradingConfig {
    #[serde(default)]
    pub tiers: TierWeights,

    /// Minimum fraction of pattern fragments that must appear in the
    /// formula text for tier 3 to be awarded (binary gate, no partial).
    #[serde(default = "default_pattern_threshold")]
    pub pattern_threshold: f64,

    /// Fraction of a checkpoint's points required for its pass flag.
    #[serde(default = "default_checkpoint_pass_ratio")]
    pub checkpoint_pass_ratio: f64,

    /// Adjusted score (0-100) at or above which the exercise is passed.
    #[serde(default = "default_pass_mark")]
    pub pass_mark: u32,

    /// Adjusted score (0-100) at or above which the exercise is mastered.
    #[serde(default = "default_mastery_mark")]
    pub mastery_mark: u32,

    #[serde(default)]
    pub hints: HintPolicy,

    /// Relative part of the default numeric tolerance: |expected| * this.
    #[serde(default = "default_tolerance_relative")]
    pub tolerance_relative: f64,

    /// Absolute floor of the default numeric tolerance.
    #[serde(default = "default_tolerance_floor")]
    pub tolerance_floor: f64,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            tiers: TierWeights::default(),
            pattern_threshold: default_pattern_threshold(),
            checkpoint_pass_ratio: default_checkpoint_pass_ratio(),
            pass_mark: default_pass_mark(),
            mastery_mark: default_mastery_mark(),
            hints: HintPolicy::default(),
            tolerance_relative: default_tolerance_relative(),
            tolerance_floor: default_tolerance_floor(),
        }
    }
}

impl GradingConfig {
    /// The built-in policy: 50/30/20 tiers, 0.7 fragment gate, 70/90
    /// pass/mastery marks, 1.00/0.90/0.75/0.50 retention.
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Load a config from a JSON file. Missing fields fall back to their
    /// defaults; a missing or unreadable file is an error.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        use std::io::ErrorKind;

        let s = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => "Config file not found".to_string(),
            ErrorKind::PermissionDenied => "Permission denied reading config".to_string(),
            _ => format!("Failed to read config ({})", e.kind()),
        })?;

        serde_json::from_str::<GradingConfig>(&s)
            .map_err(|e| format!("Invalid grading config JSON: {e}"))
    }

    /// Default tolerance for a numeric expected value:
    /// `max(|value| * tolerance_relative, tolerance_floor)`.
    pub fn default_tolerance(&self, value: f64) -> f64 {
        (value.abs() * self.tolerance_relative).max(self.tolerance_floor)
    }
}

fn default_value_weight() -> f64 {
    0.5
}

fn default_function_weight() -> f64 {
    0.3
}

fn default_pattern_weight() -> f64 {
    0.2
}

fn default_pattern_threshold() -> f64 {
    0.7
}

fn default_checkpoint_pass_ratio() -> f64 {
    0.7
}

fn default_pass_mark() -> u32 {
    70
}

fn default_mastery_mark() -> u32 {
    90
}

fn default_retention_factors() -> Vec<f64> {
    vec![1.0, 0.9, 0.75, 0.5]
}

fn default_max_hint_level() -> u8 {
    3
}

fn default_tolerance_relative() -> f64 {
    0.0001
}

fn default_tolerance_floor() -> f64 {
    0.01
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GradingConfig::default_config();
        assert_eq!(config.tiers.value, 0.5);
        assert_eq!(config.tiers.function, 0.3);
        assert_eq!(config.tiers.pattern, 0.2);
        assert_eq!(config.pattern_threshold, 0.7);
        assert_eq!(config.pass_mark, 70);
        assert_eq!(config.mastery_mark, 90);
        assert_eq!(config.hints.retention_factors, vec![1.0, 0.9, 0.75, 0.5]);
        assert_eq!(config.hints.max_hint_level, 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GradingConfig = serde_json::from_str(r#"{"pass_mark": 60}"#).unwrap();
        assert_eq!(config.pass_mark, 60);
        assert_eq!(config.mastery_mark, 90);
        assert_eq!(config.tiers.value, 0.5);
    }

    #[test]
    fn test_retention_clamps_out_of_range_levels() {
        let policy = HintPolicy::default();
        assert_eq!(policy.retention(0), 1.0);
        assert_eq!(policy.retention(2), 0.75);
        assert_eq!(policy.retention(3), 0.5);
        // Levels beyond the table clamp to the last factor.
        assert_eq!(policy.retention(9), 0.5);
    }

    #[test]
    fn test_default_tolerance() {
        let config = GradingConfig::default_config();
        // Small values hit the absolute floor.
        assert_eq!(config.default_tolerance(5.0), 0.01);
        // Large values scale relatively.
        assert_eq!(config.default_tolerance(1_000_000.0), 100.0);
        assert_eq!(config.default_tolerance(-1_000_000.0), 100.0);
    }

    #[test]
    fn test_round_trip_serialization() {
        let config = GradingConfig::default_config();
        let json = serde_json::to_string(&config).unwrap();
        let back: GradingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pass_mark, config.pass_mark);
        assert_eq!(back.hints.retention_factors, config.hints.retention_factors);
    }
}
