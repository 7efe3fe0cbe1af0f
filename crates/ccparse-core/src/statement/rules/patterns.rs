//! Per-issuer rule tables.
//!
//! Each issuer set is narrow and matches that issuer's own statement
//! wording. The generic set is loose and covers the full field vocabulary;
//! it extracts unknown layouts and backs up weak issuer matches.
//!
//! Digits are ASCII `[0-9]`. The regex crate's `\d` also accepts digits
//! from other scripts, which the amount and date parsers cannot read.

use lazy_static::lazy_static;

use super::{ExtractionRule, RuleSet};
use crate::models::record::Field;
use crate::statement::issuer::IssuerTag;

/// Optional colon/space, optional dollar sign, then the amount.
const AMOUNT: &str = r"[:\s]*\$?\s*([0-9,]+\.?[0-9]{0,2})";

/// Mandatory colon/space, then a `M/D/YY[YY]` date.
const DATE: &str = r"[:\s]+([0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4})";

/// Optional colon/space, then a percentage.
const RATE: &str = r"[:\s]*([0-9.]+%)";

/// Holder name up to a newline or the next `Account` label.
const HOLDER: &str = r"[:\s]+([A-Z][A-Za-z\s,\.]+?)(?:\n|Account)";

fn rule(field: Field, pattern: String) -> ExtractionRule {
    ExtractionRule::new(field, &pattern)
}

lazy_static! {
    pub static ref CHASE_RULES: RuleSet = RuleSet::new(IssuerTag::Chase, vec![
        rule(Field::AccountHolder, format!(r"(?:Account\s+Holder|Name\s+on\s+Account){}", HOLDER)),
        rule(Field::AccountNumber, r"Account\s+Number[:\s]*[\*\-]*([0-9]{4,})".to_string()),
        rule(Field::StatementDate, format!(r"Statement\s+(?:Date|Closing\s+Date){}", DATE)),
        rule(Field::PaymentDueDate, format!(r"Payment\s+Due\s+Date{}", DATE)),
        rule(Field::NewBalance, format!(r"New\s+Balance{}", AMOUNT)),
        rule(Field::MinimumPayment, format!(r"Minimum\s+Payment{}", AMOUNT)),
        rule(Field::PreviousBalance, format!(r"Previous\s+Balance{}", AMOUNT)),
        rule(Field::Purchases, format!(r"Purchases{}", AMOUNT)),
        rule(Field::CreditLimit, format!(r"Credit\s+Limit{}", AMOUNT)),
        rule(Field::AvailableCredit, format!(r"Available\s+Credit{}", AMOUNT)),
    ]);

    pub static ref AMEX_RULES: RuleSet = RuleSet::new(IssuerTag::Amex, vec![
        rule(Field::AccountHolder, format!(r"(?:Member\s+Name|Account\s+Holder){}", HOLDER)),
        rule(Field::AccountNumber, r"Account\s+Ending\s+in[:\s]*([0-9]{4,})".to_string()),
        rule(Field::StatementDate, format!(r"(?:Statement|Closing)\s+Date{}", DATE)),
        rule(Field::PaymentDueDate, format!(r"Payment\s+Due{}", DATE)),
        rule(Field::NewBalance, format!(r"(?:New|Total)\s+Balance{}", AMOUNT)),
        rule(Field::MinimumPayment, format!(r"Minimum\s+Payment{}", AMOUNT)),
        rule(Field::PreviousBalance, format!(r"Previous\s+Balance{}", AMOUNT)),
        rule(Field::Purchases, format!(r"Purchases{}", AMOUNT)),
    ]);

    pub static ref CITI_RULES: RuleSet = RuleSet::new(IssuerTag::Citi, vec![
        rule(Field::AccountHolder, format!(r"(?:Name|Account\s+Holder){}", HOLDER)),
        rule(Field::AccountNumber, r"Account[:\s]*[\*\-]*([0-9]{4,})".to_string()),
        rule(Field::StatementDate, format!(r"Statement\s+(?:Closing|Date){}", DATE)),
        rule(Field::PaymentDueDate, format!(r"Payment\s+Due\s+Date{}", DATE)),
        rule(Field::NewBalance, format!(r"New\s+Balance{}", AMOUNT)),
        rule(Field::MinimumPayment, format!(r"Minimum\s+Payment{}", AMOUNT)),
        rule(Field::CreditLimit, format!(r"Credit\s+Limit{}", AMOUNT)),
    ]);

    // Bank of America prints the closing date as the end of the period.
    pub static ref BOFA_RULES: RuleSet = RuleSet::new(IssuerTag::Bofa, vec![
        rule(Field::AccountHolder, format!(r"Account\s+Holder{}", HOLDER)),
        rule(Field::AccountNumber, r"Account\s+Number[:\s]*[0-9]+-([0-9]{4})".to_string()),
        rule(
            Field::StatementDate,
            r"Statement\s+Period[:\s]+[0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}\s*-\s*([0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4})".to_string(),
        ),
        rule(Field::PaymentDueDate, format!(r"Payment\s+Due\s+Date{}", DATE)),
        rule(Field::NewBalance, format!(r"New\s+Balance{}", AMOUNT)),
        rule(Field::MinimumPayment, format!(r"Minimum\s+Payment{}", AMOUNT)),
    ]);

    pub static ref CAPITAL_ONE_RULES: RuleSet = RuleSet::new(IssuerTag::CapitalOne, vec![
        rule(Field::AccountHolder, format!(r"(?:Primary\s+Cardholder|Account\s+Holder){}", HOLDER)),
        rule(Field::AccountNumber, r"Account[:\s]*[\*\-]*([0-9]{4,})".to_string()),
        rule(Field::StatementDate, format!(r"Statement\s+(?:Closing|Date){}", DATE)),
        rule(Field::PaymentDueDate, format!(r"Payment\s+Due\s+Date{}", DATE)),
        rule(Field::NewBalance, format!(r"(?:New|Current)\s+Balance{}", AMOUNT)),
        rule(Field::MinimumPayment, format!(r"Minimum\s+Payment{}", AMOUNT)),
    ]);

    pub static ref GENERIC_RULES: RuleSet = RuleSet::new(IssuerTag::Generic, vec![
        rule(
            Field::AccountHolder,
            r"(?:Name|Account\s+Holder|Cardholder)[:\s]+([A-Z][A-Za-z\s,\.]+?)(?:\n|Account|[0-9])".to_string(),
        ),
        rule(Field::AccountNumber, r"Account\s+(?:Number|#)[:\s]*[\*\-]*([0-9]{4,})".to_string()),
        rule(Field::StatementDate, format!(r"(?:Statement|Closing)\s+Date{}", DATE)),
        rule(Field::PaymentDueDate, format!(r"(?:Payment\s+)?Due\s+Date{}", DATE)),
        rule(Field::ClosingDate, format!(r"Closing\s+Date{}", DATE)),
        rule(Field::NewBalance, format!(r"(?:New|Current|Total)\s+Balance{}", AMOUNT)),
        rule(Field::MinimumPayment, format!(r"Minimum\s+(?:Payment|Due){}", AMOUNT)),
        rule(Field::PreviousBalance, format!(r"Previous\s+Balance{}", AMOUNT)),
        rule(Field::PastDue, format!(r"Past\s+Due(?:\s+Amount)?{}", AMOUNT)),
        rule(Field::Purchases, format!(r"(?:Total\s+)?Purchases{}", AMOUNT)),
        rule(Field::CashAdvances, format!(r"Cash\s+Advances?{}", AMOUNT)),
        rule(Field::BalanceTransfers, format!(r"Balance\s+Transfers?{}", AMOUNT)),
        rule(Field::FeesCharged, format!(r"(?:Fees?\s+Charged|Total\s+Fees){}", AMOUNT)),
        rule(Field::PaymentsCredits, r"(?:Payments?|Credits?)[:\s]*-?\$?\s*([0-9,]+\.?[0-9]{0,2})".to_string()),
        rule(Field::InterestCharged, format!(r"Interest\s+Charged{}", AMOUNT)),
        rule(Field::CreditLimit, format!(r"Credit\s+Limit{}", AMOUNT)),
        rule(Field::AvailableCredit, format!(r"Available\s+Credit{}", AMOUNT)),
        rule(Field::CashLimit, format!(r"Cash\s+(?:Advance\s+)?Limit{}", AMOUNT)),
        rule(Field::AvailableCash, format!(r"Available\s+Cash(?:\s+Advance)?(?:\s+Limit)?{}", AMOUNT)),
        rule(Field::PurchaseApr, format!(r"Purchase\s+APR{}", RATE)),
        rule(Field::CashApr, format!(r"Cash\s+(?:Advance\s+)?APR{}", RATE)),
        rule(Field::PurchasePeriodicRate, format!(r"Purchase\s+(?:Daily\s+)?Periodic\s+Rate{}", RATE)),
        rule(Field::CashPeriodicRate, format!(r"Cash\s+(?:Advance\s+)?(?:Daily\s+)?Periodic\s+Rate{}", RATE)),
    ]);
}

/// Look up the rule set for an issuer.
pub fn rule_set(tag: IssuerTag) -> &'static RuleSet {
    match tag {
        IssuerTag::Chase => &CHASE_RULES,
        IssuerTag::Amex => &AMEX_RULES,
        IssuerTag::Citi => &CITI_RULES,
        IssuerTag::Bofa => &BOFA_RULES,
        IssuerTag::CapitalOne => &CAPITAL_ONE_RULES,
        IssuerTag::Generic => &GENERIC_RULES,
    }
}

/// Every rule set in the registry, generic last.
pub fn registry() -> impl Iterator<Item = &'static RuleSet> {
    IssuerTag::ALL.into_iter().map(rule_set)
}
