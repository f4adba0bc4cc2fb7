//! # Criteria Matcher Module
//!
//! Evaluates one cell value against one criteria expression, reproducing
//! spreadsheet criteria semantics: comparison-operator prefixes, `*`/`?`
//! wildcards, and loose equality otherwise. Pure and deterministic; every
//! other component builds on it.

use regex::Regex;
use util::dataset::CellValue;

/// Comparison prefixes, checked in this order. `>=`/`<=` must come before
/// `>`/`<` so the longer prefix wins.
const OPERATORS: &[&str] = &[">=", "<=", "<>", ">", "<"];

/// Test a cell value against a criteria expression.
///
/// - An absent criteria matches every value.
/// - A recognized operator prefix strips the operator, parses the rest as
///   a number and compares numerically; a value that does not coerce to a
///   number never satisfies a numeric comparison.
/// - A remainder containing `*` or `?` is compiled to an anchored,
///   case-insensitive pattern and tested against the stringified value.
/// - Otherwise text compares case-insensitively and numbers loosely
///   (the string "10" equals the number 10).
pub fn matches(value: &CellValue, criteria: Option<&str>) -> bool {
    let Some(criteria) = criteria else {
        return true;
    };
    let criteria = criteria.trim();
    if criteria.is_empty() {
        return true;
    }

    for op in OPERATORS {
        if let Some(rest) = criteria.strip_prefix(op) {
            return numeric_compare(value, op, rest.trim());
        }
    }

    if criteria.contains('*') || criteria.contains('?') {
        return wildcard_matches(criteria, &value.as_text());
    }

    loose_equals(value, criteria)
}

/// Binary condition evaluation for `conditional` computations: returns the
/// designated true/false payload instead of a boolean.
pub fn evaluate_condition<'a>(
    value: &CellValue,
    condition: &str,
    if_true: &'a str,
    if_false: &'a str,
) -> &'a str {
    if matches(value, Some(condition)) {
        if_true
    } else {
        if_false
    }
}

fn numeric_compare(value: &CellValue, op: &str, operand: &str) -> bool {
    let Ok(rhs) = operand.parse::<f64>() else {
        return false;
    };
    // A value that does not coerce to a number fails every comparison,
    // including <> (NaN would otherwise satisfy it).
    let Some(lhs) = value.as_number() else {
        return false;
    };
    match op {
        ">=" => lhs >= rhs,
        "<=" => lhs <= rhs,
        "<>" => lhs != rhs,
        ">" => lhs > rhs,
        "<" => lhs < rhs,
        _ => false,
    }
}

/// Compile a `*`/`?` wildcard criteria into an anchored case-insensitive
/// pattern and test it. `*` matches any run of characters, `?` exactly one.
fn wildcard_matches(criteria: &str, text: &str) -> bool {
    let mut pattern = String::with_capacity(criteria.len() * 2 + 6);
    pattern.push_str("(?i)^");
    for ch in criteria.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');

    match Regex::new(&pattern) {
        Ok(re) => re.is_match(text),
        // All literal characters are escaped, so compilation cannot fail;
        // fall back to a plain case-insensitive comparison regardless.
        Err(_) => text.eq_ignore_ascii_case(criteria),
    }
}

fn loose_equals(value: &CellValue, criteria: &str) -> bool {
    match value {
        CellValue::Text(s) => s.eq_ignore_ascii_case(criteria),
        CellValue::Number(n) => match criteria.parse::<f64>() {
            Ok(c) => *n == c,
            Err(_) => false,
        },
        CellValue::Empty => criteria.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_absent_criteria_matches_everything() {
        assert!(matches(&num(1.0), None));
        assert!(matches(&text("x"), None));
        assert!(matches(&CellValue::Empty, None));
    }

    #[test]
    fn test_numeric_operators() {
        assert!(matches(&num(30.0), Some(">25")));
        assert!(!matches(&num(20.0), Some(">25")));
        assert!(matches(&num(25.0), Some(">=25")));
        assert!(matches(&num(25.0), Some("<=25")));
        assert!(matches(&num(10.0), Some("<25")));
        assert!(matches(&num(10.0), Some("<>25")));
        assert!(!matches(&num(25.0), Some("<>25")));
        assert!(!matches(&text("Paris"), Some("<>25")));
    }

    #[test]
    fn test_longer_prefix_wins() {
        // ">=25" must not be read as ">" with operand "=25".
        assert!(matches(&num(25.0), Some(">=25")));
        assert!(!matches(&num(24.9), Some(">=25")));
    }

    #[test]
    fn test_text_never_satisfies_numeric_comparison() {
        assert!(!matches(&text("Paris"), Some(">10")));
        assert!(!matches(&CellValue::Empty, Some("<10")));
        // But numeric strings coerce.
        assert!(matches(&text("30"), Some(">25")));
    }

    #[test]
    fn test_wildcards() {
        assert!(matches(&text("Paris"), Some("Par*")));
        assert!(matches(&text("paris"), Some("PAR*")));
        assert!(matches(&text("Paris"), Some("P?ris")));
        assert!(!matches(&text("Paris"), Some("P?is")));
        assert!(matches(&text("Paris"), Some("*aris")));
        assert!(!matches(&text("Lyon"), Some("Par*")));
    }

    #[test]
    fn test_wildcard_is_anchored() {
        assert!(!matches(&text("Grand Paris"), Some("Par*")));
        assert!(matches(&text("Grand Paris"), Some("*Par*")));
    }

    #[test]
    fn test_wildcard_escapes_regex_metacharacters() {
        assert!(matches(&text("a.b"), Some("a.b*")));
        assert!(!matches(&text("axb"), Some("a.b*")));
    }

    #[test]
    fn test_case_insensitive_equality() {
        assert!(matches(&text("paris"), Some("PARIS")));
        assert!(!matches(&text("lyon"), Some("PARIS")));
    }

    #[test]
    fn test_loose_numeric_equality() {
        assert!(matches(&num(10.0), Some("10")));
        assert!(!matches(&num(10.0), Some("11")));
        assert!(!matches(&num(10.0), Some("Paris")));
    }

    #[test]
    fn test_evaluate_condition_payloads() {
        assert_eq!(evaluate_condition(&num(15.0), ">10", "Oui", "Non"), "Oui");
        assert_eq!(evaluate_condition(&num(5.0), ">10", "Oui", "Non"), "Non");
        assert_eq!(evaluate_condition(&text("Paris"), "Par*", "yes", "no"), "yes");
    }

    #[test]
    fn test_determinism() {
        for _ in 0..3 {
            assert!(matches(&text("Paris"), Some("Par*")));
            assert!(matches(&num(30.0), Some(">25")));
        }
    }
}
