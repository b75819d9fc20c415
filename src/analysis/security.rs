//! Heuristic security triage over raw source text.
//!
//! These rules are plain regular expressions. They do not parse the code,
//! so they run on input that fails to parse. They are expected to both miss
//! real issues and flag harmless code; a finding here is a prompt for a
//! human look, not a verified vulnerability.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Call of an interactive input function (case-sensitive).
static INPUT_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"input\(").unwrap());

/// Call of a dynamic evaluation function (case-sensitive).
static EVAL_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"eval\(").unwrap());

/// "execute" followed later on the same line by "sql".
static SQL_EXECUTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)execute.*sql").unwrap());

/// "password", then "=", then "plain", on one line.
static PLAINTEXT_PASSWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)password.*=.*plain").unwrap());

pub const UNSAFE_INPUT: &str = "Potential unsafe input handling";
pub const SQL_INJECTION: &str = "Potential SQL injection risk";
pub const PLAINTEXT_PASSWORD_STORAGE: &str = "Potential plaintext password storage";

/// The fixed set of finding categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityCategory {
    InputValidation,
    PotentialInjectionRisks,
    AuthenticationIssues,
}

impl SecurityCategory {
    pub const ALL: [SecurityCategory; 3] = [
        SecurityCategory::InputValidation,
        SecurityCategory::PotentialInjectionRisks,
        SecurityCategory::AuthenticationIssues,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityCategory::InputValidation => "input_validation",
            SecurityCategory::PotentialInjectionRisks => "potential_injection_risks",
            SecurityCategory::AuthenticationIssues => "authentication_issues",
        }
    }
}

impl fmt::Display for SecurityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Findings per category. Every category is always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityFindings {
    pub input_validation: Vec<String>,
    pub potential_injection_risks: Vec<String>,
    pub authentication_issues: Vec<String>,
}

impl SecurityFindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: SecurityCategory) -> &[String] {
        match category {
            SecurityCategory::InputValidation => &self.input_validation,
            SecurityCategory::PotentialInjectionRisks => &self.potential_injection_risks,
            SecurityCategory::AuthenticationIssues => &self.authentication_issues,
        }
    }

    pub fn push(&mut self, category: SecurityCategory, finding: impl Into<String>) {
        let bucket = match category {
            SecurityCategory::InputValidation => &mut self.input_validation,
            SecurityCategory::PotentialInjectionRisks => &mut self.potential_injection_risks,
            SecurityCategory::AuthenticationIssues => &mut self.authentication_issues,
        };
        bucket.push(finding.into());
    }

    /// Total number of findings across all categories.
    pub fn total(&self) -> usize {
        SecurityCategory::ALL
            .iter()
            .map(|c| self.get(*c).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// (category, finding) pairs in category order.
    pub fn iter(&self) -> impl Iterator<Item = (SecurityCategory, &str)> + '_ {
        SecurityCategory::ALL
            .into_iter()
            .flat_map(move |c| self.get(c).iter().map(move |f| (c, f.as_str())))
    }
}

/// Scan source text. Each rule fires at most once per call.
pub fn scan(text: &str) -> SecurityFindings {
    let mut findings = SecurityFindings::new();

    if INPUT_CALL.is_match(text) || EVAL_CALL.is_match(text) {
        findings.push(SecurityCategory::InputValidation, UNSAFE_INPUT);
    }

    if SQL_EXECUTE.is_match(text) {
        findings.push(SecurityCategory::PotentialInjectionRisks, SQL_INJECTION);
    }

    if PLAINTEXT_PASSWORD.is_match(text) {
        findings.push(
            SecurityCategory::AuthenticationIssues,
            PLAINTEXT_PASSWORD_STORAGE,
        );
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_has_all_categories_empty() {
        let findings = scan("def add(a, b):\n    return a + b\n");
        assert!(findings.is_empty());

        let json = serde_json::to_value(&findings).unwrap();
        for category in SecurityCategory::ALL {
            assert_eq!(json[category.as_str()], serde_json::json!([]));
        }
    }

    #[test]
    fn test_plaintext_password() {
        let findings = scan(r#"password = "plain123""#);
        assert_eq!(
            findings.authentication_issues,
            vec![PLAINTEXT_PASSWORD_STORAGE.to_string()]
        );
        assert!(findings.input_validation.is_empty());
        assert!(findings.potential_injection_risks.is_empty());
    }

    #[test]
    fn test_input_and_eval_fire_once() {
        let findings = scan("name = input('name: ')\nresult = eval(name)\n");
        assert_eq!(findings.input_validation, vec![UNSAFE_INPUT.to_string()]);
        assert_eq!(findings.total(), 1);
    }

    #[test]
    fn test_call_patterns_are_case_sensitive() {
        assert!(scan("EVAL(x)").is_empty());
        assert!(scan("Input (x)").is_empty());
    }

    #[test]
    fn test_sql_execute_is_case_insensitive() {
        let findings = scan("cursor.EXECUTE(\"SELECT * FROM users\" + raw_sql)");
        assert_eq!(findings.potential_injection_risks, vec![SQL_INJECTION.to_string()]);
    }

    #[test]
    fn test_patterns_do_not_span_lines() {
        let findings = scan("cursor.execute(query)\nsql = build()\n");
        assert!(findings.potential_injection_risks.is_empty());
    }

    #[test]
    fn test_scans_unparsable_text() {
        let findings = scan("def broken(:\n    eval(payload\n");
        assert_eq!(findings.get(SecurityCategory::InputValidation).len(), 1);
    }

    #[test]
    fn test_iter_in_category_order() {
        let findings = scan("password = plaintext\nrun = eval(code)\n");
        let categories: Vec<SecurityCategory> = findings.iter().map(|(c, _)| c).collect();
        assert_eq!(
            categories,
            vec![
                SecurityCategory::InputValidation,
                SecurityCategory::AuthenticationIssues,
            ]
        );
    }
}
