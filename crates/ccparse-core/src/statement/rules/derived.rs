//! Composite fields matched against the full text regardless of issuer.

use lazy_static::lazy_static;
use tracing::trace;

use super::{Capture, ExtractionRule};
use crate::models::record::{ExtractedRecord, Field};

lazy_static! {
    /// `Statement Period` / `Billing Period` followed by a dash-separated date range.
    pub static ref STATEMENT_PERIOD_RULE: ExtractionRule = ExtractionRule::with_capture(
        Field::StatementPeriod,
        r"(?:Statement\s+Period|Billing\s+Period)[:\s]+([0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4})\s*-\s*([0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4})",
        Capture::Range { from: 1, to: 2 },
    );

    /// Street number, street name and type, city, two-letter state, ZIP.
    pub static ref ADDRESS_RULE: ExtractionRule = ExtractionRule::with_capture(
        Field::Address,
        r"[0-9]+\s+[A-Za-z\s]+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Way)[,\s]+[A-Za-z\s]+,\s*[A-Z]{2}\s+[0-9]{5}",
        Capture::Whole,
    );
}

/// Derive statement period and address from `text` into `record`.
///
/// Derived values replace whatever the field held before.
pub fn apply_derived_rules(text: &str, record: &mut ExtractedRecord) {
    for rule in [&*STATEMENT_PERIOD_RULE, &*ADDRESS_RULE] {
        if let Some(value) = rule.apply(text) {
            trace!("derived {} = {:?}", rule.field, value);
            record.set(rule.field, value);
        }
    }
}
