//! Declarative rule table for common formula-authoring mistakes.
//!
//! Each rule pairs a matcher with a diagnostic message and a severity; the
//! evaluator walks the table in order against the raw formula text and
//! collects the messages of every rule that fires. Rules are advisory:
//! they enrich the diagnostics of a grading result and never change the
//! points earned.

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Advisory,
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Advisory => "note",
            Severity::Warning => "warning",
        }
    }
}

enum Matcher {
    Pattern(Regex),
    Unbalanced,
}

struct ErrorRule {
    matcher: Matcher,
    message: &'static str,
    severity: Severity,
}

impl ErrorRule {
    fn fires(&self, formula: &str) -> bool {
        match &self.matcher {
            Matcher::Pattern(re) => re.is_match(formula),
            Matcher::Unbalanced => {
                let opens = formula.chars().filter(|c| *c == '(').count();
                let closes = formula.chars().filter(|c| *c == ')').count();
                opens != closes
            }
        }
    }
}

/// The rule table, in evaluation order.
fn rules() -> Vec<ErrorRule> {
    let mut table = Vec::new();
    let mut push = |pattern: &str, message: &'static str, severity: Severity| {
        if let Ok(re) = Regex::new(pattern) {
            table.push(ErrorRule { matcher: Matcher::Pattern(re), message, severity });
        }
    };

    push(r"^\s*[^=\s]", "Formula does not start with '='", Severity::Warning);
    push(r";", "Formula uses ';' as argument separator", Severity::Advisory);
    push(r"[+\-*/]{2,}", "Formula contains doubled operators", Severity::Warning);
    push(r"\(\s*\)", "Formula contains an empty argument list", Severity::Warning);
    table.push(ErrorRule {
        matcher: Matcher::Unbalanced,
        message: "Formula has unbalanced parentheses",
        severity: Severity::Warning,
    });
    table
}

/// Scan a formula against the rule table; returns one formatted
/// diagnostic per firing rule, in table order. Empty input fires nothing.
pub fn scan(formula: &str) -> Vec<String> {
    if formula.trim().is_empty() {
        return Vec::new();
    }
    rules()
        .iter()
        .filter(|rule| rule.fires(formula))
        .map(|rule| format!("{}: {}", rule.severity.label(), rule.message))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_formula_fires_nothing() {
        assert!(scan("=SUM(A1:A10)").is_empty());
    }

    #[test]
    fn test_empty_input_fires_nothing() {
        assert!(scan("").is_empty());
        assert!(scan("   ").is_empty());
    }

    #[test]
    fn test_missing_equals_sign() {
        let diagnostics = scan("SUM(A1:A10)");
        assert!(diagnostics.iter().any(|d| d.contains("does not start with '='")));
        assert!(diagnostics[0].starts_with("warning:"));
    }

    #[test]
    fn test_semicolon_separator_is_advisory() {
        let diagnostics = scan("=SOMME(A1;A10)");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].starts_with("note:"));
    }

    #[test]
    fn test_unbalanced_parentheses() {
        let diagnostics = scan("=SUM(A1:A10");
        assert!(diagnostics.iter().any(|d| d.contains("unbalanced parentheses")));
    }

    #[test]
    fn test_rules_report_in_table_order() {
        let diagnostics = scan("SUM(A1;A10");
        assert!(diagnostics[0].contains("does not start with '='"));
        assert!(diagnostics[1].contains("argument separator"));
        assert!(diagnostics[2].contains("unbalanced parentheses"));
    }
}
