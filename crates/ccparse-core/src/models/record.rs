//! Extracted statement record and its field vocabulary.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Every field a statement record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FileName,
    FileSize,
    AccountHolder,
    AccountNumber,
    Address,
    StatementDate,
    PaymentDueDate,
    NewBalance,
    MinimumPayment,
    PreviousBalance,
    PastDue,
    Purchases,
    CashAdvances,
    BalanceTransfers,
    FeesCharged,
    PaymentsCredits,
    InterestCharged,
    CreditLimit,
    AvailableCredit,
    CashLimit,
    AvailableCash,
    #[serde(rename = "purchaseAPR")]
    PurchaseApr,
    #[serde(rename = "cashAPR")]
    CashApr,
    PurchasePeriodicRate,
    CashPeriodicRate,
    StatementPeriod,
    ClosingDate,
    Issuer,
}

impl Field {
    /// All fields in serialization order.
    pub const ALL: [Field; 28] = [
        Field::FileName,
        Field::FileSize,
        Field::AccountHolder,
        Field::AccountNumber,
        Field::Address,
        Field::StatementDate,
        Field::PaymentDueDate,
        Field::NewBalance,
        Field::MinimumPayment,
        Field::PreviousBalance,
        Field::PastDue,
        Field::Purchases,
        Field::CashAdvances,
        Field::BalanceTransfers,
        Field::FeesCharged,
        Field::PaymentsCredits,
        Field::InterestCharged,
        Field::CreditLimit,
        Field::AvailableCredit,
        Field::CashLimit,
        Field::AvailableCash,
        Field::PurchaseApr,
        Field::CashApr,
        Field::PurchasePeriodicRate,
        Field::CashPeriodicRate,
        Field::StatementPeriod,
        Field::ClosingDate,
        Field::Issuer,
    ];

    /// Stable key used in JSON, CSV headers and text output.
    pub fn key(&self) -> &'static str {
        match self {
            Field::FileName => "fileName",
            Field::FileSize => "fileSize",
            Field::AccountHolder => "accountHolder",
            Field::AccountNumber => "accountNumber",
            Field::Address => "address",
            Field::StatementDate => "statementDate",
            Field::PaymentDueDate => "paymentDueDate",
            Field::NewBalance => "newBalance",
            Field::MinimumPayment => "minimumPayment",
            Field::PreviousBalance => "previousBalance",
            Field::PastDue => "pastDue",
            Field::Purchases => "purchases",
            Field::CashAdvances => "cashAdvances",
            Field::BalanceTransfers => "balanceTransfers",
            Field::FeesCharged => "feesCharged",
            Field::PaymentsCredits => "paymentsCredits",
            Field::InterestCharged => "interestCharged",
            Field::CreditLimit => "creditLimit",
            Field::AvailableCredit => "availableCredit",
            Field::CashLimit => "cashLimit",
            Field::AvailableCash => "availableCash",
            Field::PurchaseApr => "purchaseAPR",
            Field::CashApr => "cashAPR",
            Field::PurchasePeriodicRate => "purchasePeriodicRate",
            Field::CashPeriodicRate => "cashPeriodicRate",
            Field::StatementPeriod => "statementPeriod",
            Field::ClosingDate => "closingDate",
            Field::Issuer => "issuer",
        }
    }

    /// Human-readable label for text output.
    pub fn label(&self) -> &'static str {
        match self {
            Field::FileName => "File Name",
            Field::FileSize => "File Size",
            Field::AccountHolder => "Account Holder",
            Field::AccountNumber => "Account Number",
            Field::Address => "Address",
            Field::StatementDate => "Statement Date",
            Field::PaymentDueDate => "Payment Due Date",
            Field::NewBalance => "New Balance",
            Field::MinimumPayment => "Minimum Payment",
            Field::PreviousBalance => "Previous Balance",
            Field::PastDue => "Past Due",
            Field::Purchases => "Purchases",
            Field::CashAdvances => "Cash Advances",
            Field::BalanceTransfers => "Balance Transfers",
            Field::FeesCharged => "Fees Charged",
            Field::PaymentsCredits => "Payments/Credits",
            Field::InterestCharged => "Interest Charged",
            Field::CreditLimit => "Credit Limit",
            Field::AvailableCredit => "Available Credit",
            Field::CashLimit => "Cash Limit",
            Field::AvailableCash => "Available Cash",
            Field::PurchaseApr => "Purchase APR",
            Field::CashApr => "Cash APR",
            Field::PurchasePeriodicRate => "Purchase Periodic Rate",
            Field::CashPeriodicRate => "Cash Periodic Rate",
            Field::StatementPeriod => "Statement Period",
            Field::ClosingDate => "Closing Date",
            Field::Issuer => "Issuer",
        }
    }

    /// Whether the value is supplied by the caller rather than found in text.
    pub fn is_metadata(&self) -> bool {
        matches!(self, Field::FileName | Field::FileSize | Field::Issuer)
    }

    /// Whether the field holds a monetary amount.
    pub fn is_amount(&self) -> bool {
        matches!(
            self,
            Field::NewBalance
                | Field::MinimumPayment
                | Field::PreviousBalance
                | Field::PastDue
                | Field::Purchases
                | Field::CashAdvances
                | Field::BalanceTransfers
                | Field::FeesCharged
                | Field::PaymentsCredits
                | Field::InterestCharged
                | Field::CreditLimit
                | Field::AvailableCredit
                | Field::CashLimit
                | Field::AvailableCash
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown field: {}", s))
    }
}

/// Structured fields pulled from a single statement.
///
/// Every field is optional. `None` means the field was not found and
/// serializes as `null`, never as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecord {
    pub file_name: Option<String>,
    pub file_size: Option<String>,
    pub account_holder: Option<String>,
    pub account_number: Option<String>,
    pub address: Option<String>,
    pub statement_date: Option<String>,
    pub payment_due_date: Option<String>,
    pub new_balance: Option<String>,
    pub minimum_payment: Option<String>,
    pub previous_balance: Option<String>,
    pub past_due: Option<String>,
    pub purchases: Option<String>,
    pub cash_advances: Option<String>,
    pub balance_transfers: Option<String>,
    pub fees_charged: Option<String>,
    pub payments_credits: Option<String>,
    pub interest_charged: Option<String>,
    pub credit_limit: Option<String>,
    pub available_credit: Option<String>,
    pub cash_limit: Option<String>,
    pub available_cash: Option<String>,
    #[serde(rename = "purchaseAPR")]
    pub purchase_apr: Option<String>,
    #[serde(rename = "cashAPR")]
    pub cash_apr: Option<String>,
    pub purchase_periodic_rate: Option<String>,
    pub cash_periodic_rate: Option<String>,
    pub statement_period: Option<String>,
    pub closing_date: Option<String>,
    pub issuer: Option<String>,
}

impl ExtractedRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Set a field value, replacing any previous one.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Set a field value only if it is currently absent.
    ///
    /// Returns `true` if the value was stored.
    pub fn fill(&mut self, field: Field, value: impl Into<String>) -> bool {
        let slot = self.slot_mut(field);
        if slot.is_some() {
            return false;
        }
        *slot = Some(value.into());
        true
    }

    /// Fields that currently hold a value, in serialization order.
    pub fn populated_fields(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| self.get(*f).is_some())
            .collect()
    }

    /// Number of populated fields.
    pub fn len(&self) -> usize {
        Field::ALL.iter().filter(|f| self.get(**f).is_some()).count()
    }

    /// Whether no field holds a value.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy every value from `other` into fields that are still absent here.
    ///
    /// Returns the fields that were filled.
    pub fn fill_from(&mut self, other: &ExtractedRecord) -> Vec<Field> {
        let mut filled = Vec::new();
        for field in Field::ALL {
            if let Some(value) = other.get(field) {
                if self.fill(field, value) {
                    filled.push(field);
                }
            }
        }
        filled
    }

    /// Parse a monetary field as a decimal, ignoring thousands separators.
    pub fn amount(&self, field: Field) -> Option<Decimal> {
        self.get(field).and_then(parse_amount)
    }

    /// Parse a date field written as `MM/DD/YYYY` or `MM/DD/YY`.
    pub fn date(&self, field: Field) -> Option<NaiveDate> {
        self.get(field).and_then(parse_us_date)
    }

    /// Start and end of the statement period, when both parse as dates.
    pub fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        let period = self.get(Field::StatementPeriod)?;
        let (start, end) = period.split_once(" - ")?;
        Some((parse_us_date(start)?, parse_us_date(end)?))
    }

    /// Check record consistency and return a list of warnings.
    ///
    /// These checks never affect extraction; they flag values that are
    /// likely misreads of a noisy document.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.populated_fields().iter().all(|f| f.is_metadata()) {
            issues.push("No statement fields found".to_string());
        }

        if let (Some(statement), Some(due)) = (
            self.date(Field::StatementDate),
            self.date(Field::PaymentDueDate),
        ) {
            if due < statement {
                issues.push(format!(
                    "Payment due date ({}) is before statement date ({})",
                    due, statement
                ));
            }
        }

        if let Some((start, end)) = self.period() {
            if start > end {
                issues.push(format!(
                    "Statement period starts ({}) after it ends ({})",
                    start, end
                ));
            }
        }

        if let (Some(limit), Some(available)) = (
            self.amount(Field::CreditLimit),
            self.amount(Field::AvailableCredit),
        ) {
            if available > limit {
                issues.push(format!(
                    "Available credit ({}) exceeds credit limit ({})",
                    available, limit
                ));
            }
        }

        if let (Some(balance), Some(minimum)) = (
            self.amount(Field::NewBalance),
            self.amount(Field::MinimumPayment),
        ) {
            if minimum > balance {
                issues.push(format!(
                    "Minimum payment ({}) exceeds new balance ({})",
                    minimum, balance
                ));
            }
        }

        issues
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::FileName => &self.file_name,
            Field::FileSize => &self.file_size,
            Field::AccountHolder => &self.account_holder,
            Field::AccountNumber => &self.account_number,
            Field::Address => &self.address,
            Field::StatementDate => &self.statement_date,
            Field::PaymentDueDate => &self.payment_due_date,
            Field::NewBalance => &self.new_balance,
            Field::MinimumPayment => &self.minimum_payment,
            Field::PreviousBalance => &self.previous_balance,
            Field::PastDue => &self.past_due,
            Field::Purchases => &self.purchases,
            Field::CashAdvances => &self.cash_advances,
            Field::BalanceTransfers => &self.balance_transfers,
            Field::FeesCharged => &self.fees_charged,
            Field::PaymentsCredits => &self.payments_credits,
            Field::InterestCharged => &self.interest_charged,
            Field::CreditLimit => &self.credit_limit,
            Field::AvailableCredit => &self.available_credit,
            Field::CashLimit => &self.cash_limit,
            Field::AvailableCash => &self.available_cash,
            Field::PurchaseApr => &self.purchase_apr,
            Field::CashApr => &self.cash_apr,
            Field::PurchasePeriodicRate => &self.purchase_periodic_rate,
            Field::CashPeriodicRate => &self.cash_periodic_rate,
            Field::StatementPeriod => &self.statement_period,
            Field::ClosingDate => &self.closing_date,
            Field::Issuer => &self.issuer,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::FileName => &mut self.file_name,
            Field::FileSize => &mut self.file_size,
            Field::AccountHolder => &mut self.account_holder,
            Field::AccountNumber => &mut self.account_number,
            Field::Address => &mut self.address,
            Field::StatementDate => &mut self.statement_date,
            Field::PaymentDueDate => &mut self.payment_due_date,
            Field::NewBalance => &mut self.new_balance,
            Field::MinimumPayment => &mut self.minimum_payment,
            Field::PreviousBalance => &mut self.previous_balance,
            Field::PastDue => &mut self.past_due,
            Field::Purchases => &mut self.purchases,
            Field::CashAdvances => &mut self.cash_advances,
            Field::BalanceTransfers => &mut self.balance_transfers,
            Field::FeesCharged => &mut self.fees_charged,
            Field::PaymentsCredits => &mut self.payments_credits,
            Field::InterestCharged => &mut self.interest_charged,
            Field::CreditLimit => &mut self.credit_limit,
            Field::AvailableCredit => &mut self.available_credit,
            Field::CashLimit => &mut self.cash_limit,
            Field::AvailableCash => &mut self.available_cash,
            Field::PurchaseApr => &mut self.purchase_apr,
            Field::CashApr => &mut self.cash_apr,
            Field::PurchasePeriodicRate => &mut self.purchase_periodic_rate,
            Field::CashPeriodicRate => &mut self.cash_periodic_rate,
            Field::StatementPeriod => &mut self.statement_period,
            Field::ClosingDate => &mut self.closing_date,
            Field::Issuer => &mut self.issuer,
        }
    }
}

/// Parse a statement amount such as `1,234.56` or `$ 250`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let cleaned = cleaned.trim_end_matches('.');
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned).ok()
}

/// Parse a US-style date (`MM/DD/YYYY` or `MM/DD/YY`).
pub fn parse_us_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let year_len = s.rsplit('/').next().map(str::len).unwrap_or(0);
    let format = if year_len == 2 { "%m/%d/%y" } else { "%m/%d/%Y" };
    NaiveDate::parse_from_str(s, format).ok()
}

/// Format a byte count the way statement records report file size.
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_serializes_as_key() {
        for field in Field::ALL {
            assert_eq!(serde_json::to_value(field).unwrap(), field.key());
            assert_eq!(
                serde_json::from_value::<Field>(serde_json::Value::from(field.key())).unwrap(),
                field
            );
        }
    }

    #[test]
    fn test_field_keys_round_trip() {
        for field in Field::ALL {
            assert_eq!(field.key().parse::<Field>(), Ok(field));
        }
        assert!("notAField".parse::<Field>().is_err());
    }

    #[test]
    fn test_missing_fields_serialize_as_null() {
        let mut record = ExtractedRecord::new();
        record.set(Field::NewBalance, "1,234.56");
        record.set(Field::PurchaseApr, "19.99%");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["newBalance"], "1,234.56");
        assert_eq!(json["purchaseAPR"], "19.99%");
        assert!(json["accountHolder"].is_null());
        assert_eq!(json.as_object().unwrap().len(), Field::ALL.len());
    }

    #[test]
    fn test_fill_never_overwrites() {
        let mut record = ExtractedRecord::new();
        assert!(record.fill(Field::AccountNumber, "1234"));
        assert!(!record.fill(Field::AccountNumber, "9999"));
        assert_eq!(record.get(Field::AccountNumber), Some("1234"));
    }

    #[test]
    fn test_fill_from_returns_filled_fields() {
        let mut primary = ExtractedRecord::new();
        primary.set(Field::NewBalance, "100.00");

        let mut other = ExtractedRecord::new();
        other.set(Field::NewBalance, "999.00");
        other.set(Field::CreditLimit, "5,000");

        let filled = primary.fill_from(&other);
        assert_eq!(filled, vec![Field::CreditLimit]);
        assert_eq!(primary.get(Field::NewBalance), Some("100.00"));
        assert_eq!(primary.len(), 2);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_amount("250"), Some(Decimal::new(250, 0)));
        assert_eq!(parse_amount("1,000."), Some(Decimal::new(1000, 0)));
        assert_eq!(parse_amount(","), None);
    }

    #[test]
    fn test_parse_us_date() {
        assert_eq!(parse_us_date("03/15/2024"), NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(parse_us_date("3/5/24"), NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(parse_us_date("13/45/2024"), None);
    }

    #[test]
    fn test_validate_flags_inconsistencies() {
        let mut record = ExtractedRecord::new();
        record.set(Field::StatementDate, "03/01/2024");
        record.set(Field::PaymentDueDate, "02/01/2024");
        record.set(Field::CreditLimit, "1,000.00");
        record.set(Field::AvailableCredit, "2,000.00");
        record.set(Field::StatementPeriod, "01/31/2024 - 01/01/2024");

        let issues = record.validate();
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn test_validate_empty_record() {
        let mut record = ExtractedRecord::new();
        record.set(Field::Issuer, "Unknown Issuer");
        assert_eq!(record.validate(), vec!["No statement fields found".to_string()]);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(1536), "1.50 KB");
    }
}
