//! Fee item model
//!
//! A single billable charge in the school's fee structure, priced in every
//! supported currency.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::FeeItemId;
use super::money::{Currency, Money};

/// How often a fee item is billed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BillingFrequency {
    /// Billed every term
    #[default]
    PerTerm,
    /// Billed once, in the student's enrolment term
    OnceOff,
    /// Billed in the first term of each academic year
    Annual,
}

impl BillingFrequency {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "term" | "perterm" => Some(Self::PerTerm),
            "once" | "onceoff" => Some(Self::OnceOff),
            "annual" | "yearly" => Some(Self::Annual),
            _ => None,
        }
    }
}

impl fmt::Display for BillingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PerTerm => "Per Term",
            Self::OnceOff => "Once-off",
            Self::Annual => "Annual",
        };
        f.pad(label)
    }
}

/// A fee in the fee structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeItem {
    pub id: FeeItemId,

    /// Fee name, unique within the structure (e.g. "Tuition Fee")
    pub name: String,

    /// Price in US dollars
    pub amount_usd: Money,

    /// Price in ZIG
    pub amount_zig: Money,

    #[serde(default)]
    pub frequency: BillingFrequency,

    /// Mandatory for all students
    #[serde(default)]
    pub required: bool,
}

impl FeeItem {
    pub fn new(
        name: impl Into<String>,
        amount_usd: Money,
        amount_zig: Money,
        frequency: BillingFrequency,
        required: bool,
    ) -> Self {
        Self {
            id: FeeItemId::new(),
            name: name.into(),
            amount_usd,
            amount_zig,
            frequency,
            required,
        }
    }

    /// Price of the fee in the given currency
    pub fn amount(&self, currency: Currency) -> Money {
        match currency {
            Currency::Usd => self.amount_usd,
            Currency::Zig => self.amount_zig,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Fee name cannot be empty".into());
        }
        if self.amount_usd.is_negative() || self.amount_zig.is_negative() {
            return Err(format!("Fee amounts cannot be negative: {}", self.name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_by_currency() {
        let fee = FeeItem::new(
            "Tuition Fee",
            Money::from_units(250),
            Money::from_units(875_000),
            BillingFrequency::PerTerm,
            true,
        );
        assert_eq!(fee.amount(Currency::Usd), Money::from_units(250));
        assert_eq!(fee.amount(Currency::Zig), Money::from_units(875_000));
    }

    #[test]
    fn test_validate() {
        let mut fee = FeeItem::new(
            "",
            Money::zero(),
            Money::zero(),
            BillingFrequency::OnceOff,
            false,
        );
        assert!(fee.validate().is_err());
        fee.name = "School Uniform".into();
        assert!(fee.validate().is_ok());
        fee.amount_zig = Money::from_units(-1);
        assert!(fee.validate().is_err());
    }

    #[test]
    fn test_frequency_parse_and_display() {
        assert_eq!(BillingFrequency::parse("term"), Some(BillingFrequency::PerTerm));
        assert_eq!(BillingFrequency::parse("Once-off"), Some(BillingFrequency::OnceOff));
        assert_eq!(BillingFrequency::parse("annual"), Some(BillingFrequency::Annual));
        assert_eq!(BillingFrequency::parse("weekly"), None);
        assert_eq!(BillingFrequency::OnceOff.to_string(), "Once-off");
    }
}
