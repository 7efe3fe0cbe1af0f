//! Statement parser: issuer rules, generic fallback, derived fields.

use tracing::{debug, info};

use super::issuer::{detect_issuer, IssuerTag};
use super::rules::{apply_derived_rules, apply_rules, rule_set};
use super::{StatementExtractor, DEFAULT_FALLBACK_THRESHOLD};
use crate::models::record::{ExtractedRecord, Field};

/// Result of statement extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Extracted record, including issuer label and caller metadata.
    pub record: ExtractedRecord,
    /// Detected issuer.
    pub issuer: IssuerTag,
    /// Number of fields the issuer rules matched on their own.
    pub issuer_matches: usize,
    /// Whether the generic rules were also applied.
    pub used_fallback: bool,
    /// Fields filled in by the generic rules.
    pub fallback_fields: Vec<Field>,
    /// Consistency warnings for the extracted values.
    pub warnings: Vec<String>,
}

/// Rule-based statement parser.
#[derive(Debug, Clone)]
pub struct StatementParser {
    /// Issuer-rule match count below which generic rules are also applied.
    fallback_threshold: usize,
}

impl StatementParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
        }
    }

    /// Set the fallback threshold.
    pub fn with_fallback_threshold(mut self, threshold: usize) -> Self {
        self.fallback_threshold = threshold;
        self
    }

    pub fn fallback_threshold(&self) -> usize {
        self.fallback_threshold
    }

    /// Parse statement fields from text.
    ///
    /// Issuer values always take precedence; generic values only fill gaps.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        let issuer = detect_issuer(text);
        info!(
            "Parsing statement from {} characters of text, issuer {}",
            text.len(),
            issuer
        );

        let mut record = apply_rules(text, rule_set(issuer));
        let issuer_matches = record.len();

        let used_fallback = issuer_matches < self.fallback_threshold;
        let fallback_fields = if used_fallback {
            debug!(
                "{} issuer matches (threshold {}), applying generic rules",
                issuer_matches, self.fallback_threshold
            );
            let generic = apply_rules(text, rule_set(IssuerTag::Generic));
            record.fill_from(&generic)
        } else {
            Vec::new()
        };

        apply_derived_rules(text, &mut record);
        record.set(Field::Issuer, issuer.label());

        let warnings = record.validate();

        debug!(
            "Extracted {} fields for {} ({} from fallback)",
            record.len(),
            issuer,
            fallback_fields.len()
        );

        ExtractionResult {
            record,
            issuer,
            issuer_matches,
            used_fallback,
            fallback_fields,
            warnings,
        }
    }
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementExtractor for StatementParser {
    fn extract(
        &self,
        text: &str,
        file_name: Option<&str>,
        file_size: Option<&str>,
    ) -> ExtractedRecord {
        let mut record = self.parse(text).record;
        if let Some(name) = file_name {
            record.set(Field::FileName, name);
        }
        if let Some(size) = file_size {
            record.set(Field::FileSize, size);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CHASE_FULL: &str = r#"
        JPMorgan Chase Bank, N.A.
        Account Holder: JOHN SMITH
        Account Number: ****4417
        Statement Date: 02/14/2024
        Payment Due Date: 03/11/2024
        New Balance: $2,480.17
        Minimum Payment: $40.00
        Previous Balance: $1,950.00
        Purchases: $530.17
        Credit Limit: $10,000
        Available Credit: $7,519.83
        Total Fees: $0.00
    "#;

    #[test]
    fn test_issuer_match_above_threshold_skips_fallback() {
        let result = StatementParser::new().parse(CHASE_FULL);

        assert_eq!(result.issuer, IssuerTag::Chase);
        assert!(!result.used_fallback);
        assert!(result.issuer_matches >= 3);
        assert_eq!(result.record.get(Field::Issuer), Some("Chase Bank"));
        assert_eq!(result.record.get(Field::NewBalance), Some("2,480.17"));
        assert_eq!(result.record.get(Field::AccountNumber), Some("4417"));
        // Only the generic rules know "Total Fees".
        assert_eq!(result.record.get(Field::FeesCharged), None);
    }

    #[test]
    fn test_fallback_fills_gaps_only() {
        let text = "Chase\nAccount Number: ****1234\nNew Balance: $1,234.56\nInterest Charged: $12.00";
        let result = StatementParser::new().parse(text);

        assert!(result.used_fallback);
        assert_eq!(result.issuer_matches, 2);
        assert_eq!(result.fallback_fields, vec![Field::InterestCharged]);
        assert_eq!(result.record.get(Field::AccountNumber), Some("1234"));
        assert_eq!(result.record.get(Field::InterestCharged), Some("12.00"));
    }

    #[test]
    fn test_matches_equal_to_threshold_skip_fallback() {
        let text = "Chase\nAccount Number: ****1234\nNew Balance: $1,234.56\n\
                    Minimum Payment: $25.00\nInterest Charged: $12.00";
        let result = StatementParser::new().parse(text);

        assert_eq!(result.issuer_matches, DEFAULT_FALLBACK_THRESHOLD);
        assert!(!result.used_fallback);
        assert!(result.fallback_fields.is_empty());
        assert_eq!(result.record.get(Field::MinimumPayment), Some("25.00"));
        assert_eq!(result.record.get(Field::InterestCharged), None);
    }

    #[test]
    fn test_issuer_value_wins_over_generic() {
        // Amex takes "Total Balance"; generic would also accept "Current Balance" first.
        let text = "American Express\nCurrent Balance: $5.00\nTotal Balance: $900.00";
        let result = StatementParser::new().parse(text);

        assert!(result.used_fallback);
        assert_eq!(result.record.get(Field::NewBalance), Some("900.00"));
    }

    #[test]
    fn test_threshold_override() {
        let text = "Chase\nAccount Number: ****1234\nNew Balance: $1,234.56\nInterest Charged: $12.00";

        let strict = StatementParser::new().with_fallback_threshold(0).parse(text);
        assert!(!strict.used_fallback);
        assert_eq!(strict.record.get(Field::InterestCharged), None);

        let eager = StatementParser::new().with_fallback_threshold(usize::MAX).parse(CHASE_FULL);
        assert!(eager.used_fallback);
        assert_eq!(eager.record.get(Field::FeesCharged), Some("0.00"));
    }

    #[test]
    fn test_derived_fields_ignore_issuer() {
        let text = "Citi\nBilling Period: 01/01/2024 - 01/31/2024\n1 Court St, Boston, MA 02108";
        let result = StatementParser::new().parse(text);

        assert_eq!(result.issuer, IssuerTag::Citi);
        assert_eq!(
            result.record.get(Field::StatementPeriod),
            Some("01/01/2024 - 01/31/2024")
        );
        assert_eq!(
            result.record.get(Field::Address),
            Some("1 Court St, Boston, MA 02108")
        );
    }

    #[test]
    fn test_extract_attaches_metadata() {
        let record = StatementParser::new().extract("", Some("jan.pdf"), Some("12.50 KB"));
        assert_eq!(record.get(Field::FileName), Some("jan.pdf"));
        assert_eq!(record.get(Field::FileSize), Some("12.50 KB"));
        assert_eq!(record.get(Field::Issuer), Some("Unknown Issuer"));
        assert_eq!(record.len(), 3);
    }
}
