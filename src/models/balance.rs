//! Fee balance model
//!
//! Balances are derived, never stored: a line carries what was billed and what
//! has been paid, and everything else is computed from those two amounts.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Payment status of a fee line or a whole statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    Paid,
    Partial,
    Unpaid,
}

impl BalanceStatus {
    /// Derive the status from billed and paid amounts
    ///
    /// Nothing outstanding means Paid (this covers zero-billed lines and
    /// overpayments). Otherwise nothing paid means Unpaid, anything else is
    /// Partial.
    pub fn derive(billed: Money, paid: Money) -> Self {
        let balance = billed - paid;
        if !balance.is_positive() {
            Self::Paid
        } else if !paid.is_positive() {
            Self::Unpaid
        } else {
            Self::Partial
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "paid" | "fully paid" => Some(Self::Paid),
            "partial" => Some(Self::Partial),
            "unpaid" => Some(Self::Unpaid),
            _ => None,
        }
    }
}

impl fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Paid => "Paid",
            Self::Partial => "Partial",
            Self::Unpaid => "Unpaid",
        };
        f.pad(label)
    }
}

/// Billed and paid amounts for one fee item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBalance {
    pub fee_name: String,
    pub billed: Money,
    pub paid: Money,
}

impl FeeBalance {
    pub fn new(fee_name: impl Into<String>, billed: Money, paid: Money) -> Self {
        Self {
            fee_name: fee_name.into(),
            billed,
            paid,
        }
    }

    /// billed - paid
    pub fn balance(&self) -> Money {
        self.billed - self.paid
    }

    pub fn status(&self) -> BalanceStatus {
        BalanceStatus::derive(self.billed, self.paid)
    }
}
