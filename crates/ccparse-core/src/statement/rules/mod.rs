//! Rule-based field extraction for card statements.

pub mod derived;
pub mod patterns;

pub use derived::{apply_derived_rules, ADDRESS_RULE, STATEMENT_PERIOD_RULE};
pub use patterns::{registry, rule_set};

use regex::{Captures, Regex};
use tracing::trace;

use super::issuer::IssuerTag;
use crate::models::record::{ExtractedRecord, Field};

/// Which part of a match becomes the field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// A single capture group.
    Group(usize),
    /// The whole matched span.
    Whole,
    /// Two capture groups joined as `"<from> - <to>"`.
    Range { from: usize, to: usize },
}

/// A single field rule: a pattern, the part to keep, and the field it fills.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    pub field: Field,
    pub pattern: Regex,
    pub capture: Capture,
}

impl ExtractionRule {
    /// Build a rule keeping capture group 1.
    pub fn new(field: Field, pattern: &str) -> Self {
        Self::with_capture(field, pattern, Capture::Group(1))
    }

    /// Build a rule with an explicit capture mode.
    ///
    /// Patterns are compiled case-insensitive. They are fixed literals, so
    /// a compile failure is a programming error.
    pub fn with_capture(field: Field, pattern: &str, capture: Capture) -> Self {
        let pattern = Regex::new(&format!("(?i){}", pattern))
            .unwrap_or_else(|e| panic!("invalid pattern for {}: {}", field, e));
        Self {
            field,
            pattern,
            capture,
        }
    }

    /// Apply the rule to the first match in `text`.
    ///
    /// Returns the trimmed value, or `None` if there is no match or the
    /// captured text is blank.
    pub fn apply(&self, text: &str) -> Option<String> {
        let caps = self.pattern.captures(text)?;
        let value = self.select(&caps)?;
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(value.to_string())
    }

    fn select(&self, caps: &Captures<'_>) -> Option<String> {
        match self.capture {
            Capture::Group(n) => caps.get(n).map(|m| m.as_str().to_string()),
            Capture::Whole => caps.get(0).map(|m| m.as_str().to_string()),
            Capture::Range { from, to } => {
                let from = caps.get(from)?.as_str().trim();
                let to = caps.get(to)?.as_str().trim();
                Some(format!("{} - {}", from, to))
            }
        }
    }
}

/// All rules for one issuer.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub tag: IssuerTag,
    pub rules: Vec<ExtractionRule>,
}

impl RuleSet {
    pub fn new(tag: IssuerTag, rules: Vec<ExtractionRule>) -> Self {
        Self { tag, rules }
    }

    /// Rule for a field, if this set has one.
    pub fn rule(&self, field: Field) -> Option<&ExtractionRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    /// Fields this set can extract.
    pub fn fields(&self) -> Vec<Field> {
        self.rules.iter().map(|r| r.field).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Apply every rule in `rules` to `text` independently.
///
/// Each rule contributes at most one value; a rule that does not match
/// leaves its field absent.
pub fn apply_rules(text: &str, rules: &RuleSet) -> ExtractedRecord {
    let mut record = ExtractedRecord::new();

    for rule in &rules.rules {
        if let Some(value) = rule.apply(text) {
            trace!("{} rule matched {} = {:?}", rules.tag, rule.field, value);
            record.set(rule.field, value);
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_trims_capture() {
        let rule = ExtractionRule::new(Field::AccountHolder, r"Name:([^\n]+)");
        assert_eq!(rule.apply("Name:   Jane Doe   \n"), Some("Jane Doe".to_string()));
    }

    #[test]
    fn test_rule_is_case_insensitive() {
        let rule = ExtractionRule::new(Field::NewBalance, r"New\s+Balance:\s*(\d+)");
        assert_eq!(rule.apply("NEW BALANCE: 42"), Some("42".to_string()));
    }

    #[test]
    fn test_rule_uses_first_match() {
        let rule = ExtractionRule::new(Field::NewBalance, r"Balance:\s*(\d+)");
        assert_eq!(rule.apply("Balance: 1\nBalance: 2"), Some("1".to_string()));
    }

    #[test]
    fn test_blank_capture_is_no_match() {
        let rule = ExtractionRule::new(Field::AccountHolder, r"Name:(\s*)\n");
        assert_eq!(rule.apply("Name:   \n"), None);
    }

    #[test]
    fn test_range_capture() {
        let rule = ExtractionRule::with_capture(
            Field::StatementPeriod,
            r"(\d+)\s*to\s*(\d+)",
            Capture::Range { from: 1, to: 2 },
        );
        assert_eq!(rule.apply("1 to 9"), Some("1 - 9".to_string()));
    }

    #[test]
    fn test_apply_rules_is_independent() {
        let rules = RuleSet::new(
            IssuerTag::Generic,
            vec![
                ExtractionRule::new(Field::NewBalance, r"Balance:\s*(\d+)"),
                ExtractionRule::new(Field::CreditLimit, r"Limit:\s*(\d+)"),
            ],
        );

        let record = apply_rules("Limit: 500", &rules);
        assert_eq!(record.get(Field::CreditLimit), Some("500"));
        assert_eq!(record.get(Field::NewBalance), None);
        assert_eq!(record.len(), 1);
    }
}
