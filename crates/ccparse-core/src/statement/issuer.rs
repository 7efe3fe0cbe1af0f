//! Card issuer detection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Statement issuers with a dedicated rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssuerTag {
    Chase,
    Amex,
    Citi,
    Bofa,
    CapitalOne,
    Generic,
}

/// Identifying tokens per issuer, checked in this order. First match wins.
const ISSUER_TOKENS: [(IssuerTag, &[&str]); 5] = [
    (IssuerTag::Chase, &["chase", "jpmorgan"]),
    (IssuerTag::Amex, &["american express", "amex"]),
    (IssuerTag::Citi, &["citi", "citibank"]),
    (IssuerTag::Bofa, &["bank of america", "bofa"]),
    (IssuerTag::CapitalOne, &["capital one"]),
];

impl IssuerTag {
    /// All tags, generic last.
    pub const ALL: [IssuerTag; 6] = [
        IssuerTag::Chase,
        IssuerTag::Amex,
        IssuerTag::Citi,
        IssuerTag::Bofa,
        IssuerTag::CapitalOne,
        IssuerTag::Generic,
    ];

    /// Registry key.
    pub fn key(&self) -> &'static str {
        match self {
            IssuerTag::Chase => "chase",
            IssuerTag::Amex => "amex",
            IssuerTag::Citi => "citi",
            IssuerTag::Bofa => "bofa",
            IssuerTag::CapitalOne => "capitalOne",
            IssuerTag::Generic => "generic",
        }
    }

    /// Human-readable issuer name stored in the record.
    pub fn label(&self) -> &'static str {
        match self {
            IssuerTag::Chase => "Chase Bank",
            IssuerTag::Amex => "American Express",
            IssuerTag::Citi => "Citibank",
            IssuerTag::Bofa => "Bank of America",
            IssuerTag::CapitalOne => "Capital One",
            IssuerTag::Generic => "Unknown Issuer",
        }
    }
}

impl fmt::Display for IssuerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Detect the statement issuer from raw text.
///
/// Case-insensitive substring checks; text without any issuer token,
/// including empty text, is [`IssuerTag::Generic`].
pub fn detect_issuer(text: &str) -> IssuerTag {
    let lower = text.to_lowercase();

    ISSUER_TOKENS
        .iter()
        .find(|(_, tokens)| tokens.iter().any(|t| lower.contains(t)))
        .map(|(tag, _)| *tag)
        .unwrap_or(IssuerTag::Generic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_each_issuer() {
        assert_eq!(detect_issuer("JPMorgan Chase Bank, N.A."), IssuerTag::Chase);
        assert_eq!(detect_issuer("AMERICAN EXPRESS"), IssuerTag::Amex);
        assert_eq!(detect_issuer("Amex Gold Card"), IssuerTag::Amex);
        assert_eq!(detect_issuer("Citibank N.A."), IssuerTag::Citi);
        assert_eq!(detect_issuer("Bank of America"), IssuerTag::Bofa);
        assert_eq!(detect_issuer("Capital One Quicksilver"), IssuerTag::CapitalOne);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(detect_issuer("Citi ... Chase"), IssuerTag::Chase);
        assert_eq!(detect_issuer("Capital One / Amex"), IssuerTag::Amex);
        assert_eq!(detect_issuer("Bank of America, Citi"), IssuerTag::Citi);
    }

    #[test]
    fn test_no_match_is_generic() {
        assert_eq!(detect_issuer(""), IssuerTag::Generic);
        assert_eq!(detect_issuer("Some Credit Union"), IssuerTag::Generic);
    }

    #[test]
    fn test_labels() {
        assert_eq!(IssuerTag::Chase.label(), "Chase Bank");
        assert_eq!(IssuerTag::Generic.label(), "Unknown Issuer");
        assert_eq!(IssuerTag::CapitalOne.key(), "capitalOne");
    }
}
