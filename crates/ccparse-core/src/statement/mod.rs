//! Credit card statement field extraction.

pub mod issuer;
mod parser;
pub mod rules;

pub use issuer::{detect_issuer, IssuerTag};
pub use parser::{ExtractionResult, StatementParser};

use crate::models::record::ExtractedRecord;

/// Issuer-rule match count below which the generic rules are also applied.
pub const DEFAULT_FALLBACK_THRESHOLD: usize = 3;

/// Trait for statement extractors.
///
/// Extraction is best-effort: any text, including empty or garbled text,
/// yields a record. Fields that cannot be found are left absent.
pub trait StatementExtractor {
    /// Extract a record from text and attach caller-supplied file metadata.
    fn extract(
        &self,
        text: &str,
        file_name: Option<&str>,
        file_size: Option<&str>,
    ) -> ExtractedRecord;
}

/// Extract a statement record with the default parser.
pub fn extract(text: &str, file_name: Option<&str>, file_size: Option<&str>) -> ExtractedRecord {
    StatementParser::new().extract(text, file_name, file_size)
}
