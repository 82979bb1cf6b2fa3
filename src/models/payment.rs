//! Payment model
//!
//! A fee payment received from a student, identified by its receipt number.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ReceiptNo, StudentId, TermId};
use super::money::{Currency, Money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    MobileMoney,
    Check,
}

impl PaymentMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "cash" => Some(Self::Cash),
            "transfer" | "banktransfer" | "bank" => Some(Self::BankTransfer),
            "mobile" | "mobilemoney" => Some(Self::MobileMoney),
            "check" | "cheque" => Some(Self::Check),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Cash => "Cash",
            Self::BankTransfer => "Bank Transfer",
            Self::MobileMoney => "Mobile Money",
            Self::Check => "Check",
        };
        f.pad(label)
    }
}

/// Whether the bursar has confirmed the funds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    #[default]
    Pending,
}

impl VerificationStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "verified" => Some(Self::Verified),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Verified => "Verified",
            Self::Pending => "Pending",
        };
        f.pad(label)
    }
}

/// A recorded fee payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Receipt number, unique
    pub receipt_no: ReceiptNo,

    pub student_id: StudentId,

    /// Term the payment is credited to
    pub term_id: TermId,

    /// Amount received (always positive)
    pub amount: Money,

    pub currency: Currency,

    pub date: NaiveDate,

    pub method: PaymentMethod,

    #[serde(default)]
    pub status: VerificationStatus,

    /// Name of the staff member who recorded the payment (e.g. "J. Moyo")
    pub recorded_by: String,

    #[serde(default)]
    pub notes: String,
}

impl Payment {
    pub fn is_verified(&self) -> bool {
        self.status == VerificationStatus::Verified
    }

    /// Amount formatted in the payment's own currency
    pub fn formatted_amount(&self) -> String {
        self.currency.format(self.amount)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_positive() {
            return Err(format!(
                "Payment amount must be positive, got {}",
                self.formatted_amount()
            ));
        }
        if self.recorded_by.trim().is_empty() {
            return Err("Payment must name the staff member who recorded it".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Payment {
        Payment {
            receipt_no: ReceiptNo::from_parts(2025, 122),
            student_id: StudentId::new("ST-2025-0124"),
            term_id: TermId::from_parts(1, 2025),
            amount: Money::from_units(150),
            currency: Currency::Usd,
            date: NaiveDate::from_ymd_opt(2025, 5, 5).unwrap(),
            method: PaymentMethod::BankTransfer,
            status: VerificationStatus::Verified,
            recorded_by: "J. Moyo".into(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_validate() {
        let mut payment = sample();
        assert!(payment.validate().is_ok());

        payment.amount = Money::zero();
        assert!(payment.validate().is_err());

        payment.amount = Money::from_units(10);
        payment.recorded_by = "  ".into();
        assert!(payment.validate().is_err());
    }

    #[test]
    fn test_formatted_amount() {
        let mut payment = sample();
        assert_eq!(payment.formatted_amount(), "$150.00");
        payment.currency = Currency::Zig;
        payment.amount = Money::from_units(8_750);
        assert_eq!(payment.formatted_amount(), "ZWL 8,750.00");
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(PaymentMethod::parse("transfer"), Some(PaymentMethod::BankTransfer));
        assert_eq!(PaymentMethod::parse("Mobile Money"), Some(PaymentMethod::MobileMoney));
        assert_eq!(PaymentMethod::parse("cheque"), Some(PaymentMethod::Check));
        assert_eq!(PaymentMethod::parse("crypto"), None);
        assert_eq!(PaymentMethod::BankTransfer.to_string(), "Bank Transfer");
    }
}
